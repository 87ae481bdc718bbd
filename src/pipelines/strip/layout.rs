// SPDX-License-Identifier: GPL-3.0-only

//! Strip layout composition
//!
//! Places N equally sized panels on one canvas. Every arrangement is a grid
//! of `columns x rows` cells separated by [`PANEL_PADDING`]:
//!
//! ```text
//!   Vertical        Horizontal            Box (N = 4)
//!  ┌───────┐    ┌─────────────────┐    ┌───────────┐
//!  │ ┌───┐ │    │ ┌───┐┌───┐┌───┐ │    │ ┌───┐┌───┐│
//!  │ │ 0 │ │    │ │ 0 ││ 1 ││ 2 │ │    │ │ 0 ││ 1 ││
//!  │ └───┘ │    │ └───┘└───┘└───┘ │    │ └───┘└───┘│
//!  │ ┌───┐ │    └─────────────────┘    │ ┌───┐┌───┐│
//!  │ │ 1 │ │                           │ │ 2 ││ 3 ││
//!  │ └───┘ │                           │ └───┘└───┘│
//!  └───────┘                           └───────────┘
//! ```

use crate::constants::{BACKGROUND_COLOR, OUTLINE_COLOR, PANEL_PADDING};
use crate::errors::LayoutError;
use image::{Rgb, RgbImage, imageops};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Geometric arrangement of panels on the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arrangement {
    /// One column, panels stacked top to bottom
    #[default]
    Vertical,
    /// One row, panels left to right
    Horizontal,
    /// Two rows of `N / 2` panels
    Box,
}

impl Arrangement {
    /// Get all arrangements for UI iteration
    pub const ALL: [Arrangement; 3] = [
        Arrangement::Vertical,
        Arrangement::Horizontal,
        Arrangement::Box,
    ];

    /// Token used in configuration files and on the command line
    pub fn token(&self) -> &'static str {
        match self {
            Arrangement::Vertical => "vertical",
            Arrangement::Horizontal => "horizontal",
            Arrangement::Box => "box",
        }
    }

    /// Whether `count` panels can be placed
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arrangement::Box => count >= 2 && count % 2 == 0,
            Arrangement::Vertical | Arrangement::Horizontal => count >= 1,
        }
    }

    /// Grid dimensions (columns, rows) for `count` panels
    pub fn grid(&self, count: usize) -> (u32, u32) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        match self {
            Arrangement::Vertical => (1, count),
            Arrangement::Horizontal => (count, 1),
            Arrangement::Box => (count / 2, 2),
        }
    }

    /// Canvas size for `count` panels of `panel_width x panel_height`.
    ///
    /// `None` when a side does not fit in `u32`.
    pub fn canvas_size(&self, count: usize, panel_width: u32, panel_height: u32) -> Option<(u32, u32)> {
        let (columns, rows) = self.grid(count);
        Some((span(columns, panel_width)?, span(rows, panel_height)?))
    }

    /// Canvas size, rejected when the RGB buffer would exceed the image
    /// decoder's default allocation limit
    pub fn checked_canvas(
        &self,
        count: usize,
        panel_width: u32,
        panel_height: u32,
    ) -> Result<(u32, u32), LayoutError> {
        let too_large = || LayoutError::CanvasTooLarge {
            arrangement: *self,
            count,
            panel: (panel_width, panel_height),
        };

        let (width, height) = self
            .canvas_size(count, panel_width, panel_height)
            .ok_or_else(too_large)?;
        let bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(too_large)?;
        if bytes > canvas_budget() {
            return Err(too_large());
        }
        Ok((width, height))
    }

    /// Top-left corner of panel `index`, or `None` past `u32`
    pub fn panel_offset(
        &self,
        index: usize,
        count: usize,
        panel_width: u32,
        panel_height: u32,
    ) -> Option<(u32, u32)> {
        let (columns, _) = self.grid(count);
        let columns = columns.max(1);
        let index = u32::try_from(index).ok()?;
        Some((
            cell_start(index % columns, panel_width)?,
            cell_start(index / columns, panel_height)?,
        ))
    }
}

/// Length of `cells` panels of `extent` pixels, padded on both ends and between
fn span(cells: u32, extent: u32) -> Option<u32> {
    extent
        .checked_mul(cells)?
        .checked_add(PANEL_PADDING.checked_mul(cells.checked_add(1)?)?)
}

/// Start of cell `cell` along one axis
fn cell_start(cell: u32, extent: u32) -> Option<u32> {
    extent
        .checked_add(PANEL_PADDING)?
        .checked_mul(cell)?
        .checked_add(PANEL_PADDING)
}

fn canvas_budget() -> u64 {
    image::Limits::default().max_alloc.unwrap_or(u64::MAX)
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Arrangement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arrangement::ALL
            .into_iter()
            .find(|a| a.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown arrangement '{}'", s))
    }
}

/// Compose `panels` into one strip.
///
/// All panels must share the first panel's dimensions. The inputs are only
/// read; the returned canvas is a new buffer.
pub fn compose(arrangement: Arrangement, panels: &[RgbImage]) -> Result<RgbImage, LayoutError> {
    let count = panels.len();
    if !arrangement.accepts(count) {
        return Err(LayoutError::InvalidCount { arrangement, count });
    }

    let expected = panels[0].dimensions();
    if let Some((index, panel)) = panels
        .iter()
        .enumerate()
        .find(|(_, p)| p.dimensions() != expected)
    {
        return Err(LayoutError::SizeMismatch {
            index,
            expected,
            actual: panel.dimensions(),
        });
    }

    let (panel_width, panel_height) = expected;
    let (width, height) = arrangement.checked_canvas(count, panel_width, panel_height)?;
    debug!(%arrangement, count, width, height, "Composing strip");

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);
    draw_outline(&mut canvas, 0, 0, width - 1, height - 1, OUTLINE_COLOR);

    for (index, panel) in panels.iter().enumerate() {
        let (left, top) = arrangement
            .panel_offset(index, count, panel_width, panel_height)
            .ok_or(LayoutError::CanvasTooLarge {
                arrangement,
                count,
                panel: expected,
            })?;
        imageops::replace(&mut canvas, panel, left as i64, top as i64);
        draw_outline(
            &mut canvas,
            left,
            top,
            left + panel_width - 1,
            top + panel_height - 1,
            OUTLINE_COLOR,
        );
    }

    Ok(canvas)
}

/// Draw a 1px rectangle outline with inclusive corners
fn draw_outline(canvas: &mut RgbImage, left: u32, top: u32, right: u32, bottom: u32, color: Rgb<u8>) {
    for x in left..=right {
        canvas.put_pixel(x, top, color);
        canvas.put_pixel(x, bottom, color);
    }
    for y in top..=bottom {
        canvas.put_pixel(left, y, color);
        canvas.put_pixel(right, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: u32 = PANEL_PADDING;

    fn panels(count: usize, width: u32, height: u32) -> Vec<RgbImage> {
        (0..count)
            .map(|i| RgbImage::from_pixel(width, height, Rgb([i as u8 * 40, 10, 10])))
            .collect()
    }

    #[test]
    fn test_accepts() {
        assert!(Arrangement::Vertical.accepts(1));
        assert!(Arrangement::Horizontal.accepts(3));
        assert!(!Arrangement::Vertical.accepts(0));
        assert!(Arrangement::Box.accepts(2));
        assert!(!Arrangement::Box.accepts(3));
        assert!(!Arrangement::Box.accepts(0));
    }

    #[test]
    fn test_horizontal_canvas() {
        let strip = compose(Arrangement::Horizontal, &panels(3, 20, 10)).unwrap();
        assert_eq!(strip.dimensions(), (3 * 20 + 4 * P, 10 + 2 * P));
    }

    #[test]
    fn test_box_of_six_uses_three_columns() {
        assert_eq!(Arrangement::Box.grid(6), (3, 2));
        assert_eq!(
            Arrangement::Box.panel_offset(4, 6, 10, 10),
            Some((P + 10 + P, P + 10 + P))
        );
    }

    #[test]
    fn test_panels_are_blitted_unscaled() {
        let input = panels(2, 12, 8);
        let strip = compose(Arrangement::Vertical, &input).unwrap();
        // Interior pixel of panel 1 (outline sits on the panel edge)
        let (left, top) = Arrangement::Vertical.panel_offset(1, 2, 12, 8).unwrap();
        assert_eq!(strip.get_pixel(left + 5, top + 4), input[1].get_pixel(5, 4));
    }

    #[test]
    fn test_outlines_and_background() {
        let strip = compose(Arrangement::Vertical, &panels(1, 12, 8)).unwrap();
        assert_eq!(strip.get_pixel(0, 0), &OUTLINE_COLOR);
        assert_eq!(strip.get_pixel(P, P), &OUTLINE_COLOR);
        assert_eq!(strip.get_pixel(P + 11, P + 7), &OUTLINE_COLOR);
        assert_eq!(strip.get_pixel(P / 2, P / 2), &BACKGROUND_COLOR);
    }

    #[test]
    fn test_size_mismatch_reports_first_offender() {
        let mut input = panels(3, 10, 10);
        input[2] = RgbImage::new(11, 10);
        assert_eq!(
            compose(Arrangement::Vertical, &input),
            Err(LayoutError::SizeMismatch {
                index: 2,
                expected: (10, 10),
                actual: (11, 10),
            })
        );
    }

    #[test]
    fn test_geometry_overflow_is_none() {
        assert_eq!(Arrangement::Horizontal.canvas_size(2, u32::MAX / 2, 1), None);
        assert_eq!(Arrangement::Vertical.canvas_size(3, 1, u32::MAX), None);
        assert_eq!(Arrangement::Horizontal.panel_offset(1, 2, u32::MAX, 1), None);
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        // Fits in u32 but is far past the allocation limit
        assert_eq!(
            Arrangement::Horizontal.checked_canvas(20, 8000, 8000),
            Err(LayoutError::CanvasTooLarge {
                arrangement: Arrangement::Horizontal,
                count: 20,
                panel: (8000, 8000),
            })
        );
        assert!(matches!(
            Arrangement::Horizontal.checked_canvas(2, u32::MAX / 2, 1),
            Err(LayoutError::CanvasTooLarge { .. })
        ));
        assert_eq!(
            Arrangement::Box.checked_canvas(4, 40, 30),
            Ok((2 * 40 + 3 * P, 2 * 30 + 3 * P))
        );
    }

    #[test]
    fn test_empty_input_is_invalid_count() {
        assert_eq!(
            compose(Arrangement::Horizontal, &[]),
            Err(LayoutError::InvalidCount {
                arrangement: Arrangement::Horizontal,
                count: 0,
            })
        );
    }
}
