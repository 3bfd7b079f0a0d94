// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by the parser, the escape-time
//! engine, the colormaps and the image writer.

use failure::Fail;

/// Everything that can go wrong between reading a polynomial and
/// writing the final image.  None of these are fatal to the process;
/// the caller is expected to fix its input and try again.
#[derive(Debug, Fail)]
pub enum JuliaError {
    /// The input text did not contain a usable polynomial term.
    #[fail(display = "invalid expression: {}", _0)]
    InvalidExpression(String),

    /// A term was found, but its numeric text could not be read.
    #[fail(display = "could not parse coefficient '{}': {}", text, reason)]
    CoefficientParse {
        /// The offending piece of the input.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A grid or image was requested with a zero-sized side.
    #[fail(display = "invalid dimensions {}x{}: both sides must be positive", _0, _1)]
    InvalidDimensions(usize, usize),

    /// The escape radius must be a positive, finite number.
    #[fail(display = "invalid escape radius {}: must be positive and finite", _0)]
    InvalidEscapeRadius(f64),

    /// There is no colormap at this index.
    #[fail(display = "unknown colormap {}", _0)]
    UnknownColorMap(String),

    /// A worker thread died while computing a grid.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The image could not be encoded or written.
    #[fail(display = "could not write image: {}", _0)]
    Image(#[cause] image::ImageError),
}

impl JuliaError {
    pub(crate) fn coefficient(text: &str, reason: &str) -> JuliaError {
        JuliaError::CoefficientParse {
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<image::ImageError> for JuliaError {
    fn from(err: image::ImageError) -> Self {
        JuliaError::Image(err)
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, JuliaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = JuliaError::coefficient("1e+", "not a number");
        assert_eq!(
            err.to_string(),
            "could not parse coefficient '1e+': not a number"
        );
        let err = JuliaError::InvalidDimensions(0, 4);
        assert!(err.to_string().contains("0x4"));
    }
}
