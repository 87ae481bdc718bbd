// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use image::Rgb;

/// Padding between panels and around the strip edge, in pixels
pub const PANEL_PADDING: u32 = 50;

/// Strip background color
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Color of the 1px outlines drawn around panels and the strip edge
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([200, 200, 200]);

/// Default filename prefix for persisted strips
pub const DEFAULT_FILENAME_PREFIX: &str = "Photobooth_";

/// Directory created under the user's pictures folder
pub const DEFAULT_FOLDER_NAME: &str = "photobooth";

/// Default thumbnail bounds (width, height)
pub const DEFAULT_THUMBNAIL_BOUNDS: (u32, u32) = (480, 480);

/// Capacity of the bounded notification channel
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Attempts at finding a free filename before giving up
pub const MAX_FILENAME_ATTEMPTS: u32 = 100;

/// Timestamp layout used in strip filenames (millisecond resolution)
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
