// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Nineteen gradients for turning iteration counts into colors.
//!
//! Every gradient first squeezes its input into `t` in `[0, 1]`
//! relative to a minimum and a maximum, then builds a color from `t`
//! in one of four ways: straight-line segments between fixed
//! breakpoints (Jet, Rainbow), interpolation along a small table of
//! control colors (Turbo, Viridis, Inferno), one affine formula per
//! channel (most of the rest), or a trip through HSV space (HSV,
//! HSV_alt).

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use image::{ImageBuffer, Rgb, RgbImage};
use num::clamp;

use crate::error::{JuliaError, Result};

/// The available gradients.  The discriminant is the stable index
/// used by `color_for`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorMap {
    /// Blue, cyan, yellow, red.
    Jet,
    /// An eight-color approximation of Google's Turbo.
    Turbo,
    /// A six-color approximation of matplotlib's Viridis.
    Viridis,
    /// A six-color approximation of matplotlib's Inferno.
    Inferno,
    /// Black, red, yellow, white.
    Hot,
    /// Cyan to magenta.
    Cool,
    /// Black to white.
    Gray,
    /// White to black.
    GrayInverted,
    /// Magenta to yellow.
    Spring,
    /// Green to yellow.
    Summer,
    /// Red to yellow.
    Autumn,
    /// Blue to cyan-green.
    Winter,
    /// Black to copper.
    Copper,
    /// Light pink to white.
    Pink,
    /// Blue to cyan.
    Ocean,
    /// Brown to light yellow.
    Terrain,
    /// Red, yellow, green, blue.
    Rainbow,
    /// Once around the hue circle at full saturation.
    Hsv,
    /// Around the hue circle while saturation rises from gray.
    HsvAlt,
}

type Channels = (f64, f64, f64);

const TURBO: [Channels; 8] = [
    (0.19, 0.0, 0.5),
    (0.07, 0.15, 0.84),
    (0.0, 0.65, 1.0),
    (0.49, 0.95, 1.0),
    (1.0, 1.0, 0.95),
    (1.0, 0.44, 0.65),
    (0.84, 0.0, 0.15),
    (0.5, 0.0, 0.0),
];

const VIRIDIS: [Channels; 6] = [
    (0.267, 0.004, 0.329),
    (0.282, 0.141, 0.458),
    (0.253, 0.365, 0.659),
    (0.163, 0.659, 0.788),
    (0.128, 0.808, 0.878),
    (0.267, 0.992, 0.984),
];

const INFERNO: [Channels; 6] = [
    (0.001, 0.0, 0.013),
    (0.302, 0.137, 0.295),
    (0.601, 0.287, 0.573),
    (0.903, 0.428, 0.758),
    (1.0, 0.729, 0.964),
    (0.988, 0.998, 0.998),
];

impl ColorMap {
    /// Every colormap, in index order.
    pub const ALL: [ColorMap; 19] = [
        ColorMap::Jet,
        ColorMap::Turbo,
        ColorMap::Viridis,
        ColorMap::Inferno,
        ColorMap::Hot,
        ColorMap::Cool,
        ColorMap::Gray,
        ColorMap::GrayInverted,
        ColorMap::Spring,
        ColorMap::Summer,
        ColorMap::Autumn,
        ColorMap::Winter,
        ColorMap::Copper,
        ColorMap::Pink,
        ColorMap::Ocean,
        ColorMap::Terrain,
        ColorMap::Rainbow,
        ColorMap::Hsv,
        ColorMap::HsvAlt,
    ];

    /// The colormap at `index`, if there is one.
    pub fn from_index(index: usize) -> Option<ColorMap> {
        ColorMap::ALL.get(index).cloned()
    }

    /// The stable index of this colormap.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Jet => "Jet",
            ColorMap::Turbo => "Turbo",
            ColorMap::Viridis => "Viridis",
            ColorMap::Inferno => "Inferno",
            ColorMap::Hot => "Hot",
            ColorMap::Cool => "Cool",
            ColorMap::Gray => "Gray",
            ColorMap::GrayInverted => "Gray Inverted",
            ColorMap::Spring => "Spring",
            ColorMap::Summer => "Summer",
            ColorMap::Autumn => "Autumn",
            ColorMap::Winter => "Winter",
            ColorMap::Copper => "Copper",
            ColorMap::Pink => "Pink",
            ColorMap::Ocean => "Ocean",
            ColorMap::Terrain => "Terrain",
            ColorMap::Rainbow => "Rainbow",
            ColorMap::Hsv => "HSV",
            ColorMap::HsvAlt => "HSV_alt",
        }
    }

    /// The color of `value` on a scale running from `min` to `max`.
    pub fn color(self, value: f64, min: f64, max: f64) -> Rgb<u8> {
        self.color_at(normalize(value, min, max))
    }

    /// The color at position `t` of the gradient.  `t` outside
    /// `[0, 1]` is clamped.
    pub fn color_at(self, t: f64) -> Rgb<u8> {
        let t = if t.is_nan() { 0.0 } else { clamp(t, 0.0, 1.0) };
        let (r, g, b) = match self {
            ColorMap::Jet => jet(t),
            ColorMap::Turbo => lookup(&TURBO, t),
            ColorMap::Viridis => lookup(&VIRIDIS, t),
            ColorMap::Inferno => lookup(&INFERNO, t),
            ColorMap::Hot => (3.0 * t, 3.0 * t - 1.0, 3.0 * t - 2.0),
            ColorMap::Cool => (t, 1.0 - t, 1.0),
            ColorMap::Gray => (t, t, t),
            ColorMap::GrayInverted => (1.0 - t, 1.0 - t, 1.0 - t),
            ColorMap::Spring => (1.0, t, 1.0 - t),
            ColorMap::Summer => (t, 0.5 + 0.5 * t, 0.4),
            ColorMap::Autumn => (1.0, t, 0.0),
            ColorMap::Winter => (0.0, t, 1.0 - 0.5 * t),
            ColorMap::Copper => (t, 0.78125 * t, 0.4975 * t),
            ColorMap::Pink => (1.0, 0.75 + 0.25 * t, 0.75 + 0.25 * t),
            ColorMap::Ocean => (0.0, t, 0.5 + 0.5 * t),
            ColorMap::Terrain => (0.5 + 0.5 * t, 0.4 + 0.6 * t, 0.3 * (1.0 - t)),
            ColorMap::Rainbow => rainbow(t),
            ColorMap::Hsv => hsv(t, 1.0, 1.0),
            ColorMap::HsvAlt => hsv(t, t, 0.9 + t / 10.0),
        };
        Rgb([channel(r), channel(g), channel(b)])
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accepts an index (`"7"`) or a name, ignoring case and treating
/// spaces, dashes and underscores alike (`"gray-inverted"`).
impl FromStr for ColorMap {
    type Err = JuliaError;

    fn from_str(s: &str) -> Result<ColorMap> {
        let wanted = simplify(s);
        if let Ok(index) = wanted.parse::<usize>() {
            return ColorMap::from_index(index)
                .ok_or_else(|| JuliaError::UnknownColorMap(s.to_string()));
        }
        ColorMap::ALL
            .iter()
            .cloned()
            .find(|map| simplify(map.name()) == wanted)
            .ok_or_else(|| JuliaError::UnknownColorMap(s.to_string()))
    }
}

fn simplify(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The color of `value` under the colormap at `index`.
pub fn color_for(index: usize, value: f64, min: f64, max: f64) -> Result<Rgb<u8>> {
    ColorMap::from_index(index)
        .map(|map| map.color(value, min, max))
        .ok_or_else(|| JuliaError::UnknownColorMap(index.to_string()))
}

/// Where `value` falls between `min` and `max`, clamped to `[0, 1]`.
/// An empty or non-finite scale puts everything at 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let t = (value - min) / span;
    if t.is_nan() {
        0.0
    } else {
        clamp(t, 0.0, 1.0)
    }
}

fn channel(x: f64) -> u8 {
    (clamp(x, 0.0, 1.0) * 255.0) as u8
}

fn jet(t: f64) -> Channels {
    if t < 0.25 {
        (0.0, 4.0 * t, 1.0)
    } else if t < 0.5 {
        (0.0, 1.0, 1.0 - 4.0 * (t - 0.25))
    } else if t < 0.75 {
        (4.0 * (t - 0.5), 1.0, 0.0)
    } else {
        (1.0, 1.0 - 4.0 * (t - 0.75), 0.0)
    }
}

fn rainbow(t: f64) -> Channels {
    if t < 0.2 {
        (1.0, 5.0 * t, 0.0)
    } else if t < 0.4 {
        (1.0, 1.0, 5.0 * (t - 0.2))
    } else if t < 0.6 {
        (1.0 - 5.0 * (t - 0.4), 1.0, 0.0)
    } else if t < 0.8 {
        (0.0, 1.0 - 5.0 * (t - 0.6), 1.0)
    } else {
        (0.5 * (t - 0.8), 0.0, 1.0)
    }
}

// Control colors are evenly spaced over [0, 1]; t = 1 lands at the
// end of the last segment.
fn lookup(table: &[Channels], t: f64) -> Channels {
    let segments = table.len() - 1;
    let pos = t * segments as f64;
    let index = (pos as usize).min(segments - 1);
    let frac = pos - index as f64;
    let (r0, g0, b0) = table[index];
    let (r1, g1, b1) = table[index + 1];
    (
        r0 + frac * (r1 - r0),
        g0 + frac * (g1 - g0),
        b0 + frac * (b1 - b0),
    )
}

// Hue in [0, 1] goes once around the circle; 1 is red again.
fn hsv(hue: f64, saturation: f64, value: f64) -> Channels {
    let h = (hue * 6.0) % 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));
    match sector as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    }
}

/// Draws `count` horizontal bands, one per colormap in index order,
/// each `row_height` pixels tall.  Column `x` of every band shows the
/// value `min + (max - min) * x / (width - 1)`.
pub fn generate_swatch_image(
    count: usize,
    width: usize,
    row_height: usize,
    min: f64,
    max: f64,
) -> Result<RgbImage> {
    if count > ColorMap::ALL.len() {
        return Err(JuliaError::UnknownColorMap((count - 1).to_string()));
    }
    let height = count.saturating_mul(row_height);
    let (image_width, image_height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 && width.checked_mul(height).is_some() => (w, h),
        _ => return Err(JuliaError::InvalidDimensions(width, height)),
    };

    let sample = |x: usize| {
        if width > 1 {
            min + (max - min) * (x as f64) / ((width - 1) as f64)
        } else {
            min
        }
    };
    let bands: Vec<Vec<Rgb<u8>>> = ColorMap::ALL[..count]
        .iter()
        .map(|map| (0..width).map(|x| map.color(sample(x), min, max)).collect())
        .collect();

    Ok(ImageBuffer::from_fn(
        image_width,
        image_height,
        |x, y| bands[y as usize / row_height][x as usize],
    ))
}
