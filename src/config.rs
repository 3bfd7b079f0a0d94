// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! All the knobs of a single render, and the pipeline that turns
//! them into a picture: parse the polynomial, compute the grid, color
//! it in.

use std::time::Instant;

use image::RgbImage;
use log::info;
use num::Complex;

use crate::colormap::ColorMap;
use crate::error::Result;
use crate::escape::{compute_grid_with_threads, IterationGrid, DEFAULT_ESCAPE_RADIUS};
use crate::planes::Region;
use crate::polynomial::parse_polynomial;
use crate::render::render_grid;

/// The polynomial rendered when none is given.
pub const DEFAULT_EXPRESSION: &str = "z^2+(-0.7+0.27015i)";

/// Parameters for one render.  The image is square, `resolution`
/// pixels on a side, covering `range` units of the complex plane
/// around `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The polynomial to iterate.
    pub expression: String,
    /// The middle of the picture.
    pub center: Complex<f64>,
    /// Side length of the square window.
    pub range: f64,
    /// Side length of the image in pixels.
    pub resolution: usize,
    /// Iteration cap per pixel.
    pub max_iterations: u32,
    /// Bailout radius.
    pub escape_radius: f64,
    /// Gradient used to color the counts.
    pub colormap: ColorMap,
    /// Worker threads for the grid computation.
    pub threads: usize,
    /// Lower end of the color scale, if not the smallest count.
    pub color_min: Option<f64>,
    /// Upper end of the color scale, if not the iteration cap.
    pub color_max: Option<f64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            expression: DEFAULT_EXPRESSION.to_string(),
            center: Complex::new(0.0, 0.0),
            range: 3.0,
            resolution: 1080,
            max_iterations: 200,
            escape_radius: DEFAULT_ESCAPE_RADIUS,
            colormap: ColorMap::Jet,
            threads: num_cpus::get(),
            color_min: None,
            color_max: None,
        }
    }
}

/// What a render produced.
#[derive(Debug)]
pub struct Rendering {
    /// The polynomial as it was understood.
    pub canonical: String,
    /// The raw counts.
    pub grid: IterationGrid,
    /// The colored picture.
    pub image: RgbImage,
}

impl RenderConfig {
    /// The window of the complex plane the image covers.
    pub fn region(&self) -> Region {
        Region::centered(self.center, self.range)
    }

    /// Runs the whole pipeline.
    pub fn render(&self) -> Result<Rendering> {
        let started = Instant::now();
        let (polynomial, canonical) = parse_polynomial(&self.expression)?;
        info!("rendering f(z) = {}", canonical);

        let grid = compute_grid_with_threads(
            self.region(),
            self.resolution,
            self.resolution,
            polynomial.evaluator(),
            self.max_iterations,
            self.escape_radius,
            self.threads,
        )?;
        info!(
            "computed {}x{} grid in {:?}",
            grid.width(),
            grid.height(),
            started.elapsed()
        );

        let image = render_grid(&grid, self.colormap, self.color_min, self.color_max);
        info!("colored with {} in {:?}", self.colormap, started.elapsed());

        Ok(Rendering {
            canonical,
            grid,
            image,
        })
    }
}
