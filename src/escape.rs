// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time engine.
//!
//! Every pixel of the output grid is mapped to a starting point on
//! the complex plane, and an iteration function is applied to that
//! point over and over until it either leaves the disc of the escape
//! radius or the iteration limit is reached.  The number of steps
//! taken is what gets stored; the colormaps turn it into a picture.
//!
//! The iteration function is any `Fn(Complex<f64>) -> Complex<f64> +
//! Sync`: a parsed `Polynomial`, the builtin `PowerMap`, or a plain
//! closure.  Because it only reads what it captured, the workers can
//! share it without any locking, and each of them writes only to the
//! rows it was dealt.

use itertools::{Itertools, MinMaxResult};
use log::debug;
use num::Complex;
use std::slice::Chunks;

use crate::error::{JuliaError, Result};
use crate::planes::{Pixel, PlaneMapper, Region};

/// The usual bailout radius for quadratic maps.
pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

/// The iteration counts of a computed grid, stored row by row.  Every
/// cell lies in `0..=max_iterations`.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationGrid {
    width: usize,
    height: usize,
    max_iterations: u32,
    cells: Vec<u32>,
}

impl IterationGrid {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The iteration cap the grid was computed with.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The count at column `x` of row `y`, if that cell exists.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// All counts, row-major.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// The counts one row at a time, top row first.
    pub fn rows(&self) -> Chunks<u32> {
        self.cells.chunks(self.width)
    }

    /// The smallest and largest count present in the grid.
    pub fn min_max(&self) -> (u32, u32) {
        match self.cells.iter().minmax() {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(&only) => (only, only),
            MinMaxResult::MinMax(&min, &max) => (min, max),
        }
    }
}

/// The map `z -> z^order + constant`, the classic Julia iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PowerMap {
    /// The power `z` is raised to.
    pub order: u32,
    /// The constant added after raising.
    pub constant: Complex<f64>,
}

impl PowerMap {
    /// Constructor.
    pub fn new(order: u32, constant: Complex<f64>) -> PowerMap {
        PowerMap { order, constant }
    }

    /// One step of the map.
    #[inline]
    pub fn apply(&self, z: Complex<f64>) -> Complex<f64> {
        z.powu(self.order) + self.constant
    }
}

/// Counts the steps `start` takes to leave the disc whose squared
/// radius is `limit`, up to `max_iterations`.  A point that starts
/// outside the disc takes no steps.
#[inline]
pub fn escape_count<F>(iterate: &F, start: Complex<f64>, max_iterations: u32, limit: f64) -> u32
where
    F: Fn(Complex<f64>) -> Complex<f64>,
{
    let mut z = start;
    let mut count = 0;
    while count < max_iterations && z.norm_sqr() <= limit {
        z = iterate(z);
        count += 1;
    }
    count
}

/// Computes the grid of escape counts for `region`, sampled at
/// `width` by `height` pixels, using one worker per available core.
pub fn compute_grid<F>(
    region: Region,
    width: usize,
    height: usize,
    iterate: F,
    max_iterations: u32,
    escape_radius: f64,
) -> Result<IterationGrid>
where
    F: Fn(Complex<f64>) -> Complex<f64> + Sync,
{
    compute_grid_with_threads(
        region,
        width,
        height,
        iterate,
        max_iterations,
        escape_radius,
        num_cpus::get(),
    )
}

/// The same as `compute_grid`, taking the edges of the region one by
/// one.
#[allow(clippy::too_many_arguments)]
pub fn compute_escape_time_grid<F>(
    real_min: f64,
    real_max: f64,
    imag_min: f64,
    imag_max: f64,
    width: usize,
    height: usize,
    iterate: F,
    max_iterations: u32,
    escape_radius: f64,
) -> Result<IterationGrid>
where
    F: Fn(Complex<f64>) -> Complex<f64> + Sync,
{
    compute_grid(
        Region::new(real_min, real_max, imag_min, imag_max),
        width,
        height,
        iterate,
        max_iterations,
        escape_radius,
    )
}

/// A multi-threaded grid computation that takes a thread count.
/// Rows are dealt round-robin, so worker `k` gets rows `k`, `k +
/// threads`, and so on; that keeps the slow rows through the body of
/// the set spread over every worker.  The result does not depend on
/// the thread count.  A count of zero is treated as one.
#[allow(clippy::too_many_arguments)]
pub fn compute_grid_with_threads<F>(
    region: Region,
    width: usize,
    height: usize,
    iterate: F,
    max_iterations: u32,
    escape_radius: f64,
    threads: usize,
) -> Result<IterationGrid>
where
    F: Fn(Complex<f64>) -> Complex<f64> + Sync,
{
    let plane = PlaneMapper::new(width, height, region)?;
    if !(escape_radius > 0.0 && escape_radius.is_finite()) {
        return Err(JuliaError::InvalidEscapeRadius(escape_radius));
    }
    let limit = escape_radius * escape_radius;
    let threads = threads.max(1).min(height);
    debug!(
        "computing {}x{} grid over {:?}, {} iterations, {} threads",
        width, height, region, max_iterations, threads
    );

    let mut cells = vec![0 as u32; plane.len()];
    {
        let mut assignments: Vec<Vec<(usize, &mut [u32])>> =
            (0..threads).map(|_| vec![]).collect();
        for (row, cells) in cells.chunks_mut(width).enumerate() {
            assignments[row % threads].push((row, cells));
        }

        let plane = &plane;
        let iterate = &iterate;
        crossbeam::scope(|spawner| {
            for rows in assignments {
                spawner.spawn(move |_| {
                    for (row, cells) in rows {
                        for (column, cell) in cells.iter_mut().enumerate() {
                            let start = plane.pixel_to_point(&Pixel(column, row));
                            *cell = escape_count(iterate, start, max_iterations, limit);
                        }
                    }
                });
            }
        })
        .map_err(|_| JuliaError::WorkerPanicked)?;
    }

    Ok(IterationGrid {
        width,
        height,
        max_iterations,
        cells,
    })
}

/// Convenience for the power map `z^order + constant` over the fixed
/// window of side 3 centered at the origin, with the default escape
/// radius.  Identical to calling `compute_grid` with that window and
/// a `PowerMap`.
pub fn power_map_grid(
    width: usize,
    height: usize,
    order: u32,
    constant: Complex<f64>,
    max_iterations: u32,
) -> Result<IterationGrid> {
    let map = PowerMap::new(order, constant);
    compute_grid(
        Region::new(-1.5, 1.5, -1.5, 1.5),
        width,
        height,
        move |z| map.apply(z),
        max_iterations,
        DEFAULT_ESCAPE_RADIUS,
    )
}
