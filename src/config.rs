// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{DEFAULT_FILENAME_PREFIX, DEFAULT_THUMBNAIL_BOUNDS, EVENT_CHANNEL_CAPACITY};
use crate::errors::ConfigError;
use crate::pipelines::strip::{
    Arrangement, EncodingFormat, EncodingQuality, FilterMode, FilterPlan, Frame, SessionRequest,
    StripEncoder,
};
use crate::share::Destination;
use crate::storage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Thumbnail bounds in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ThumbnailBounds {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_THUMBNAIL_BOUNDS.0,
            max_height: DEFAULT_THUMBNAIL_BOUNDS.1,
        }
    }
}

/// Session defaults for the booth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Filter preference applied to every session
    pub filter_mode: FilterMode,
    /// Panel arrangement
    pub arrangement: Arrangement,
    /// Sensor rotation in degrees clockwise
    pub rotation_degrees: i32,
    /// Mirror frames horizontally (selfie mode)
    pub reflect: bool,
    pub thumbnail: ThumbnailBounds,
    /// Directory for persisted strips (default: ~/Pictures/photobooth)
    pub output_dir: Option<PathBuf>,
    /// Filename prefix for persisted strips
    pub filename_prefix: String,
    pub format: EncodingFormat,
    pub quality: EncodingQuality,
    /// Capacity of the notification channel
    pub event_capacity: usize,
    /// Destination identifiers handed to share capabilities
    pub destination_ids: HashMap<Destination, String>,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::default(),
            arrangement: Arrangement::default(),
            rotation_degrees: 0,
            reflect: false,
            thumbnail: ThumbnailBounds::default(),
            output_dir: None,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            format: EncodingFormat::default(),
            quality: EncodingQuality::default(),
            event_capacity: EVENT_CHANNEL_CAPACITY,
            destination_ids: Destination::ALL
                .into_iter()
                .map(|d| (d, d.default_id().to_string()))
                .collect(),
        }
    }
}

impl BoothConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail.max_width == 0 || self.thumbnail.max_height == 0 {
            return Err(ConfigError::Invalid(
                "thumbnail bounds must be at least 1x1".to_string(),
            ));
        }
        if self.filename_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "filename prefix '{}' contains a path separator",
                self.filename_prefix
            )));
        }
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(storage::default_output_dir)
    }

    pub fn encoder(&self) -> StripEncoder {
        StripEncoder::with_settings(self.format, self.quality)
    }

    /// Build a session request for `frames` using these settings
    pub fn session_request(&self, frames: Vec<Frame>) -> SessionRequest {
        SessionRequest {
            frames,
            rotation_degrees: self.rotation_degrees,
            reflect: self.reflect,
            filters: FilterPlan::Mode(self.filter_mode),
            arrangement: self.arrangement,
            thumbnail_bounds: (self.thumbnail.max_width, self.thumbnail.max_height),
            output_dir: self.output_dir(),
            filename_prefix: self.filename_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BoothConfig =
            serde_json::from_str(r#"{ "filter_mode": "sepia-mixed", "arrangement": "box" }"#)
                .unwrap();
        assert_eq!(config.filter_mode, FilterMode::SepiaMixed);
        assert_eq!(config.arrangement, Arrangement::Box);
        assert_eq!(config.filename_prefix, DEFAULT_FILENAME_PREFIX);
        assert_eq!(config.event_capacity, EVENT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_destination_ids_from_json() {
        let config: BoothConfig = serde_json::from_str(
            r#"{ "destination_ids": { "cloud-folder": "team_share" } }"#,
        )
        .unwrap();
        assert_eq!(
            config.destination_ids.get(&Destination::CloudFolder),
            Some(&"team_share".to_string())
        );
    }

    #[test]
    fn test_rejects_zero_thumbnail() {
        let mut config = BoothConfig::default();
        config.thumbnail.max_height = 0;
        assert!(config.validate().is_err());
    }
}
