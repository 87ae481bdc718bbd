// SPDX-License-Identifier: GPL-3.0-only

//! CPU color filters for strip panels
//!
//! Every filter is a pure function from an RGB buffer to a new buffer of the
//! same dimensions. The input is never modified.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Per-panel color filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// No filter applied
    #[default]
    None,
    /// Black & white / monochrome
    BlackAndWhite,
    /// Sepia tone (warm brownish tint)
    Sepia,
    /// Line art sketch from luminance edges
    LineArt,
}

impl Filter {
    /// Apply this filter, producing a new buffer
    pub fn apply(self, image: &RgbImage) -> RgbImage {
        apply(self, image)
    }
}

/// Apply `filter` to `image`
pub fn apply(filter: Filter, image: &RgbImage) -> RgbImage {
    match filter {
        Filter::None => image.clone(),
        Filter::BlackAndWhite => map_pixels(image, mono),
        Filter::Sepia => map_pixels(image, sepia),
        Filter::LineArt => line_art(image),
    }
}

fn map_pixels(image: &RgbImage, f: impl Fn(f32, f32, f32) -> (f32, f32, f32)) -> RgbImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let (r, g, b) = f(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        );
        *pixel = Rgb([to_byte(r), to_byte(g), to_byte(b)]);
    }
    output
}

/// BT.601 luminance
#[inline]
fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn mono(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let gray = luminance(r, g, b);
    (gray, gray, gray)
}

fn sepia(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let l = luminance(r, g, b);
    (
        (l * 1.2 + 0.1).clamp(0.0, 1.0),
        (l * 0.9 + 0.05).clamp(0.0, 1.0),
        (l * 0.7).clamp(0.0, 1.0),
    )
}

/// Sobel edge detection on luminance, dark lines on white paper
fn line_art(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let luma: Vec<f32> = image
        .pixels()
        .map(|p| luminance(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
        .collect();

    // Clamped sampling so border pixels see their own edge
    let sample = |x: i64, y: i64| -> f32 {
        let x = x.clamp(0, width as i64 - 1) as usize;
        let y = y.clamp(0, height as i64 - 1) as usize;
        luma[y * width as usize + x]
    };

    RgbImage::from_fn(width, height, |px, py| {
        let x = px as i64;
        let y = py as i64;

        let tl = sample(x - 1, y - 1);
        let tm = sample(x, y - 1);
        let tr = sample(x + 1, y - 1);
        let ml = sample(x - 1, y);
        let mr = sample(x + 1, y);
        let bl = sample(x - 1, y + 1);
        let bm = sample(x, y + 1);
        let br = sample(x + 1, y + 1);

        let gx = -tl - 2.0 * ml - bl + tr + 2.0 * mr + br;
        let gy = -tl - 2.0 * tm - tr + bl + 2.0 * bm + br;
        let edge = (gx * gx + gy * gy).sqrt();

        let value = to_byte(1.0 - edge * 2.0);
        Rgb([value, value, value])
    })
}
