// SPDX-License-Identifier: GPL-3.0-only

//! Frame decoding
//!
//! Turns compressed capture bytes into an upright RGB buffer at native
//! resolution. Rotation is applied to the pixels themselves so later stages
//! never need to know how the sensor was mounted.

use crate::errors::DecodeError;
use image::{RgbImage, imageops};
use tracing::debug;

/// Frame rotation in degrees (clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    None,
    /// 90 degrees clockwise
    Rotate90,
    /// 180 degrees (upside down)
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl Rotation {
    /// Create rotation from a degree value, normalised to 0-360.
    ///
    /// Returns `None` for angles that are not a quarter turn.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Rotate90),
            180 => Some(Rotation::Rotate180),
            270 => Some(Rotation::Rotate270),
            _ => None,
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    fn apply(&self, image: RgbImage) -> RgbImage {
        match self {
            Rotation::None => image,
            Rotation::Rotate90 => imageops::rotate90(&image),
            Rotation::Rotate180 => imageops::rotate180(&image),
            Rotation::Rotate270 => imageops::rotate270(&image),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// A raw captured frame, consumed once by [`decode`]
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

/// Decode compressed frame bytes, then rotate and optionally mirror.
///
/// Reflection is a horizontal flip applied after rotation.
pub fn decode(bytes: &[u8], rotation_degrees: i32, reflect: bool) -> Result<RgbImage, DecodeError> {
    let rotation = Rotation::from_degrees(rotation_degrees)
        .ok_or(DecodeError::UnsupportedRotation(rotation_degrees))?;

    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?
        .to_rgb8();

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(DecodeError::Empty);
    }

    let mut upright = rotation.apply(decoded);
    if reflect {
        imageops::flip_horizontal_in_place(&mut upright);
    }

    debug!(
        width = upright.width(),
        height = upright.height(),
        rotation = %rotation,
        reflect,
        "Frame decoded"
    );

    Ok(upright)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    /// 3x2 PNG with a red top-left pixel, everything else black
    fn marked_png() -> Vec<u8> {
        let mut image = RgbImage::new(3, 2);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Rotate90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Rotate270));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_decode_keeps_native_resolution() {
        let image = decode(&marked_png(), 0, false).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_quarter_turn_swaps_dimensions() {
        let image = decode(&marked_png(), 90, false).unwrap();
        assert_eq!(image.dimensions(), (2, 3));
        // Clockwise: the top-left corner moves to the top-right
        assert_eq!(image.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_reflection_mirrors_after_rotation() {
        let image = decode(&marked_png(), 90, true).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 0]));

        let image = decode(&marked_png(), 0, true).unwrap();
        assert_eq!(image.get_pixel(2, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_malformed_and_empty_bytes() {
        assert_eq!(decode(&[], 0, false), Err(DecodeError::Empty));
        assert!(matches!(
            decode(b"definitely not an image", 0, false),
            Err(DecodeError::Malformed(_))
        ));
        assert_eq!(
            decode(&marked_png(), 30, false),
            Err(DecodeError::UnsupportedRotation(30))
        );
    }
}
