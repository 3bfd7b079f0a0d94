#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set renderer
//!
//! A Julia set is drawn by taking every point of a window on the
//! complex plane, feeding it to a function over and over, and
//! counting how many steps it takes before the result runs off
//! toward infinity.  Points that never run off belong to the set;
//! the rest are colored by how quickly they left.
//!
//! The function here is any complex polynomial the user cares to
//! type, such as `z^2 + (-0.7+0.27015i)` or `z^5 - 0.5iz + 0.3`.
//! The crate parses it, computes the grid of escape counts on every
//! core available, and colors the grid with one of nineteen
//! gradients.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod colormap;
pub mod config;
pub mod error;
pub mod escape;
pub mod planes;
pub mod polynomial;
pub mod render;

pub use colormap::{color_for, generate_swatch_image, ColorMap};
pub use config::{RenderConfig, Rendering};
pub use error::{JuliaError, Result};
pub use escape::{
    compute_escape_time_grid, compute_grid, compute_grid_with_threads, power_map_grid,
    IterationGrid, PowerMap,
};
pub use planes::Region;
pub use polynomial::{parse_polynomial, Polynomial};
pub use render::{render_grid, write_image};
