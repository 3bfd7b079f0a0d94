// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane bounded by a real and an
//! imaginary range.
use std::convert::TryFrom;

use num::Complex;

use crate::error::{JuliaError, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in an integral plane.  Row 0 is the
/// top of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane sampled by a grid.  Nothing
/// stops `real_min` from equalling or exceeding `real_max`; a
/// degenerate region simply samples the same column (or row) over
/// and over.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Real part of the left edge.
    pub real_min: f64,
    /// Real part of the right edge.
    pub real_max: f64,
    /// Imaginary part of the top row.
    pub imag_min: f64,
    /// Imaginary part of the bottom row.
    pub imag_max: f64,
}

impl Region {
    /// A region from its four edges.
    pub fn new(real_min: f64, real_max: f64, imag_min: f64, imag_max: f64) -> Region {
        Region {
            real_min,
            real_max,
            imag_min,
            imag_max,
        }
    }

    /// A square window of side `range` around `center`.
    pub fn centered(center: Complex<f64>, range: f64) -> Region {
        let half = range / 2.0;
        Region::new(
            center.re - half,
            center.re + half,
            center.im - half,
            center.im + half,
        )
    }

    /// Extent along the real axis.
    pub fn real_span(&self) -> f64 {
        self.real_max - self.real_min
    }

    /// Extent along the imaginary axis.
    pub fn imag_span(&self) -> f64 {
        self.imag_max - self.imag_min
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a region of the complex plane.  Maps pixels of the one
/// to sample points of the other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The right-lower corner of the integral cartesian plane.  The
    /// left-upper is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane being sampled.
    pub region: Region,
    // The distance on the complex plane covered by one pixel, along
    // each axis.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane, and the
    /// region of the complex plane it covers.  Either side being zero,
    /// either side not fitting an image dimension, or a pixel count
    /// that overflows is an error.
    pub fn new(width: usize, height: usize, region: Region) -> Result<PlaneMapper> {
        if width == 0
            || height == 0
            || u32::try_from(width).is_err()
            || u32::try_from(height).is_err()
            || width.checked_mul(height).is_none()
        {
            return Err(JuliaError::InvalidDimensions(width, height));
        }

        let steps = (
            region.real_span() / (width as f64),
            region.imag_span() / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            region,
            steps,
        })
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// sample point at its left-upper corner on the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.region.real_min + (pixel.0 as f64) * self.steps.0,
            self.region.imag_min + (pixel.1 as f64) * self.steps.1,
        )
    }
}
