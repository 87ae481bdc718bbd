// SPDX-License-Identifier: GPL-3.0-only

//! Thumbnail generation and strip buffer ownership
//!
//! The thumbnail may be the composite itself when no scaling is needed. Both
//! handles are `Arc`s, so the aliased case is tracked by pointer identity and
//! the buffer is released exactly once, when the last handle goes away.

use image::{RgbImage, imageops};
use std::sync::Arc;
use tracing::debug;

/// Fit `src` inside `max` while preserving aspect ratio.
///
/// Dimensions are floored and clamped to `1..=max` on each axis.
pub fn aspect_fit_size(max_width: u32, max_height: u32, src_width: u32, src_height: u32) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (max_width.max(1), max_height.max(1));
    }

    // factor = min(max_w / src_w, max_h / src_h), kept in integers so the
    // limiting axis lands exactly on its bound
    let (max_w, max_h) = (max_width as u64, max_height as u64);
    let (src_w, src_h) = (src_width as u64, src_height as u64);
    let (width, height) = if max_w * src_h <= max_h * src_w {
        (max_w, src_h * max_w / src_w)
    } else {
        (src_w * max_h / src_h, max_h)
    };

    (
        (width as u32).clamp(1, max_width.max(1)),
        (height as u32).clamp(1, max_height.max(1)),
    )
}

/// An assembled strip and its thumbnail
#[derive(Debug, Clone)]
pub struct PhotoStrip {
    composite: Option<Arc<RgbImage>>,
    thumbnail: Arc<RgbImage>,
}

impl PhotoStrip {
    /// Build the thumbnail for `composite`, bounded by `max_width x max_height`
    pub fn new(composite: RgbImage, max_width: u32, max_height: u32) -> Self {
        let composite = Arc::new(composite);
        let (width, height) = composite.dimensions();
        let (thumb_width, thumb_height) = aspect_fit_size(max_width, max_height, width, height);

        let thumbnail = if (thumb_width, thumb_height) == (width, height) {
            debug!(width, height, "Thumbnail shares the composite buffer");
            Arc::clone(&composite)
        } else {
            debug!(thumb_width, thumb_height, "Scaling thumbnail");
            Arc::new(imageops::resize(
                composite.as_ref(),
                thumb_width,
                thumb_height,
                imageops::FilterType::Triangle,
            ))
        };

        Self {
            composite: Some(composite),
            thumbnail,
        }
    }

    /// Full-resolution strip, unless already released
    pub fn composite(&self) -> Option<&Arc<RgbImage>> {
        self.composite.as_ref()
    }

    pub fn thumbnail(&self) -> &Arc<RgbImage> {
        &self.thumbnail
    }

    /// Whether the thumbnail and the composite are the same buffer
    pub fn is_aliased(&self) -> bool {
        self.composite
            .as_ref()
            .is_some_and(|c| Arc::ptr_eq(c, &self.thumbnail))
    }

    /// Drop the full-resolution handle.
    ///
    /// When aliased, the buffer stays alive through the thumbnail handle.
    pub fn release_composite(&mut self) {
        if self.composite.take().is_some() {
            debug!(aliased = Arc::strong_count(&self.thumbnail) > 1, "Composite released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_fit_reference_case() {
        assert_eq!(aspect_fit_size(200, 100, 800, 600), (133, 100));
    }

    #[test]
    fn test_aspect_fit_never_exceeds_bounds() {
        for (mw, mh, sw, sh) in [(200, 100, 800, 600), (64, 64, 1000, 3), (10, 500, 7, 9)] {
            let (w, h) = aspect_fit_size(mw, mh, sw, sh);
            assert!(w <= mw && h <= mh, "{w}x{h} exceeds {mw}x{mh}");
            assert!(w >= 1 && h >= 1);
        }
    }

    #[test]
    fn test_aspect_fit_clamps_to_one_pixel() {
        assert_eq!(aspect_fit_size(64, 64, 10_000, 2), (64, 1));
    }

    #[test]
    fn test_scaled_thumbnail_is_separate_buffer() {
        let strip = PhotoStrip::new(RgbImage::new(800, 600), 200, 100);
        assert_eq!(strip.thumbnail().dimensions(), (133, 100));
        assert!(!strip.is_aliased());
    }

    #[test]
    fn test_exact_fit_aliases_composite() {
        let mut strip = PhotoStrip::new(RgbImage::new(100, 50), 100, 50);
        assert!(strip.is_aliased());
        assert_eq!(Arc::strong_count(strip.thumbnail()), 2);

        strip.release_composite();
        assert!(strip.composite().is_none());
        assert!(!strip.is_aliased());
        assert_eq!(Arc::strong_count(strip.thumbnail()), 1);
    }
}
