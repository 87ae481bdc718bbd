// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the photo booth pipeline
//!
//! Stage-local errors ([`DecodeError`], [`LayoutError`]) never leave the
//! assembler directly; they are translated into one [`AssemblyError`] per
//! session. Share rejections are recoverable and carried by
//! [`ShareRejection`].

use crate::pipelines::strip::Arrangement;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Strip assembly errors
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(String),
    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Frame decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No bytes, or the decoded image has zero area
    #[error("frame is empty")]
    Empty,
    /// Bytes could not be decoded as an image
    #[error("malformed frame data: {0}")]
    Malformed(String),
    /// Rotation is not a quarter turn
    #[error("unsupported rotation of {0} degrees")]
    UnsupportedRotation(i32),
    /// The worker processing this frame died
    #[error("frame worker interrupted: {0}")]
    Interrupted(String),
}

/// Layout composition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Panel count is not accepted by the arrangement
    #[error("{arrangement} arrangement cannot hold {count} panels")]
    InvalidCount {
        arrangement: Arrangement,
        count: usize,
    },
    /// A panel's dimensions differ from the first panel
    #[error("panel {index} is {actual:?}, expected {expected:?}")]
    SizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// The canvas does not fit in memory limits
    #[error("{arrangement} canvas for {count} panels of {panel:?} is too large")]
    CanvasTooLarge {
        arrangement: Arrangement,
        count: usize,
        panel: (u32, u32),
    },
    /// The composition worker died
    #[error("composition worker interrupted: {0}")]
    Interrupted(String),
}

/// Session-level assembly errors, each reported once as a distinct event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// A frame failed to decode; no partial strip is produced
    #[error("frame {index} is invalid: {source}")]
    FrameInvalid { index: usize, source: DecodeError },
    /// The arrangement rejected the decoded frames
    #[error("layout failed: {0}")]
    LayoutFailed(#[from] LayoutError),
    /// The strip could not be written to disk
    #[error("failed to persist strip: {0}")]
    PersistFailed(String),
}

/// Reasons a share request is rejected. The destination stays retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareRejection {
    /// The strip has not been persisted yet, or the path does not exist
    #[error("strip is not persisted: {}", .0.display())]
    NotPersisted(PathBuf),
    /// No share capability is registered for the destination
    #[error("no share capability registered")]
    NoCapability,
    /// The capability declined the request
    #[error("share declined: {0}")]
    Declined(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value: {0}")]
    Invalid(String),
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for AssemblyError {
    fn from(err: std::io::Error) -> Self {
        AssemblyError::PersistFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_invalid_names_the_index() {
        let err = AssemblyError::FrameInvalid {
            index: 2,
            source: DecodeError::Empty,
        };
        assert_eq!(err.to_string(), "frame 2 is invalid: frame is empty");
    }

    #[test]
    fn app_error_wraps_each_source() {
        let from_str: AppError = "one or more shares failed".into();
        assert!(matches!(from_str, AppError::Other(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(AppError::from(io), AppError::Storage(_)));

        let config = AppError::from(ConfigError::Invalid("bad prefix".into()));
        assert_eq!(config.to_string(), "Configuration error: invalid value: bad prefix");

        let assembly = AppError::from(AssemblyError::PersistFailed("disk full".into()));
        assert!(matches!(assembly, AppError::Assembly(_)));
    }

    #[test]
    fn io_errors_become_persist_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            AssemblyError::from(io),
            AssemblyError::PersistFailed(_)
        ));
    }
}
