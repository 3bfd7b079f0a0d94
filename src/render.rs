// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an iteration grid into an image, and images into files.

use std::path::Path;

use image::{ImageBuffer, RgbImage};
use log::debug;

use crate::colormap::ColorMap;
use crate::error::Result;
use crate::escape::IterationGrid;

/// Colors every cell of `grid` with `colormap`.  The scale runs from
/// the smallest count in the grid to the grid's iteration cap, unless
/// either end is overridden.
pub fn render_grid(
    grid: &IterationGrid,
    colormap: ColorMap,
    min_override: Option<f64>,
    max_override: Option<f64>,
) -> RgbImage {
    let (observed_min, _) = grid.min_max();
    let min = min_override.unwrap_or(f64::from(observed_min));
    let max = max_override.unwrap_or(f64::from(grid.max_iterations()));
    debug!("coloring with {} over [{}, {}]", colormap, min, max);

    // Grids only come out of `PlaneMapper`, which rejects sides wider
    // than `u32`.
    ImageBuffer::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        let count = grid.cells()[y as usize * grid.width() + x as usize];
        colormap.color(f64::from(count), min, max)
    })
}

/// Writes `image` to `path`, in the format named by its extension.
pub fn write_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    image.save(path.as_ref())?;
    debug!("wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::compute_escape_time_grid;
    use image::Rgb;
    use num::Complex;

    fn grid() -> IterationGrid {
        compute_escape_time_grid(
            -2.0,
            2.0,
            -2.0,
            2.0,
            16,
            12,
            |z: Complex<f64>| z * z + Complex::new(-0.1, 0.65),
            30,
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn image_has_the_grid_shape() {
        let image = render_grid(&grid(), ColorMap::Jet, None, None);
        assert_eq!(image.dimensions(), (16, 12));
    }

    #[test]
    fn default_scale_runs_from_observed_minimum_to_cap() {
        let grid = grid();
        let (min, _) = grid.min_max();
        let image = render_grid(&grid, ColorMap::Gray, None, None);
        for (y, row) in grid.rows().enumerate() {
            for (x, &count) in row.iter().enumerate() {
                let pixel = *image.get_pixel(x as u32, y as u32);
                if count == min {
                    assert_eq!(pixel, Rgb([0, 0, 0]));
                }
                if count == grid.max_iterations() {
                    assert_eq!(pixel, Rgb([255, 255, 255]));
                }
            }
        }
    }

    #[test]
    fn overrides_replace_the_scale() {
        let grid = grid();
        let image = render_grid(&grid, ColorMap::Gray, Some(1000.0), Some(2000.0));
        assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn uniform_grid_does_not_fault() {
        let grid = compute_escape_time_grid(
            -0.1,
            0.1,
            -0.1,
            0.1,
            4,
            4,
            |z: Complex<f64>| z * z,
            0,
            2.0,
        )
        .unwrap();
        let image = render_grid(&grid, ColorMap::Viridis, None, None);
        assert!(image.pixels().all(|p| *p == ColorMap::Viridis.color_at(0.0)));
    }

    #[test]
    fn writes_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let image = render_grid(&grid(), ColorMap::Turbo, None, None);
        write_image(&image, &path).unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back, image);
    }

    #[test]
    fn unwritable_paths_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let image = render_grid(&grid(), ColorMap::Jet, None, None);
        assert!(write_image(&image, dir.path().join("grid.unknown-format")).is_err());
    }
}
