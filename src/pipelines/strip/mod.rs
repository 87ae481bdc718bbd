// SPDX-License-Identifier: GPL-3.0-only

//! Photo strip assembly pipeline
//!
//! ```text
//! Frame bytes × N → Decode → Filter (per panel) → Layout → ┬→ Thumbnail
//!                                                          └→ Encode → Disk I/O
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Decode**: frames are decoded one after another; the first bad frame
//!    aborts the whole session (no partial strips)
//! 2. **Filter**: each panel is filtered on its own worker; panels share no
//!    state, so the only synchronization is the join before layout
//! 3. **Layout**: panels are moved into the composition worker and dropped
//!    there once the canvas exists, whether or not composition succeeds
//! 4. **Thumbnail**: aspect-fit copy, or the composite itself when it already fits
//! 5. **Persist**: encode + write; failure here does not undo the thumbnail
//!
//! All heavy work runs on blocking workers. Dropping the returned future
//! abandons the session and frees every buffer it owns.

pub mod decode;
pub mod encoding;
pub mod filters;
pub mod layout;
pub mod selection;
pub mod thumbnail;

pub use decode::{Frame, Rotation};
pub use encoding::{EncodingFormat, EncodingQuality, StripEncoder};
pub use filters::Filter;
pub use layout::Arrangement;
pub use selection::{FilterMode, FilterPlan};
pub use thumbnail::PhotoStrip;

use crate::errors::{AssemblyError, DecodeError, LayoutError};
use crate::events::{BoothEvent, EventSink};
use image::RgbImage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Everything the capture screen hands over to start a session
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Captured frames in panel order
    pub frames: Vec<Frame>,
    /// Rotation shared by every frame, in degrees clockwise
    pub rotation_degrees: i32,
    /// Mirror every frame horizontally after rotation
    pub reflect: bool,
    pub filters: FilterPlan,
    pub arrangement: Arrangement,
    /// Thumbnail bounds (max width, max height)
    pub thumbnail_bounds: (u32, u32),
    pub output_dir: PathBuf,
    pub filename_prefix: String,
}

/// Outcome of one session, mirroring the events that were emitted
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub thumbnail: Option<Arc<RgbImage>>,
    pub persisted: Option<PathBuf>,
    pub error: Option<AssemblyError>,
}

impl SessionReport {
    fn failed(error: AssemblyError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Both the thumbnail and the persisted file were produced
    pub fn is_complete(&self) -> bool {
        self.thumbnail.is_some() && self.persisted.is_some()
    }
}

/// Strip assembly orchestrator
#[derive(Debug, Clone, Default)]
pub struct StripAssembler {
    encoder: StripEncoder,
}

impl StripAssembler {
    /// Create an assembler writing high quality JPEG
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoder(encoder: StripEncoder) -> Self {
        Self { encoder }
    }

    /// Run a full session, pushing events to `sink` as they happen.
    ///
    /// Emits `ThumbnailReady` then `PersistSucceeded` on success. A decode or
    /// layout failure emits a single `AssemblyFailed` and nothing else. A
    /// persistence failure emits `AssemblyFailed` after `ThumbnailReady`.
    pub async fn assemble(&self, request: SessionRequest, sink: &EventSink) -> SessionReport {
        let session = Uuid::new_v4();
        info!(
            %session,
            frames = request.frames.len(),
            arrangement = %request.arrangement,
            "Starting strip session"
        );

        let (max_width, max_height) = request.thumbnail_bounds;
        let mut strip = match self
            .compose_strip(
                request.frames,
                request.rotation_degrees,
                request.reflect,
                &request.filters,
                request.arrangement,
                (max_width, max_height),
            )
            .await
        {
            Ok(strip) => strip,
            Err(e) => {
                error!(%session, error = %e, "Strip assembly failed");
                sink.emit(BoothEvent::AssemblyFailed(e.clone())).await;
                return SessionReport::failed(e);
            }
        };

        let thumbnail = Arc::clone(strip.thumbnail());
        sink.emit(BoothEvent::ThumbnailReady(Arc::clone(&thumbnail)))
            .await;

        let saved = match strip.composite().cloned() {
            Some(composite) => {
                self.encoder
                    .save(composite, request.output_dir, request.filename_prefix)
                    .await
            }
            None => Err(AssemblyError::PersistFailed(
                "composite was released before persistence".to_string(),
            )),
        };

        // The aliased buffer lives on through `thumbnail`
        let aliased = strip.is_aliased();
        strip.release_composite();
        debug!(%session, aliased, "Full-resolution strip released");

        match saved {
            Ok(path) => {
                info!(%session, path = %path.display(), "Strip session complete");
                sink.emit(BoothEvent::PersistSucceeded(path.clone())).await;
                SessionReport {
                    thumbnail: Some(thumbnail),
                    persisted: Some(path),
                    error: None,
                }
            }
            Err(e) => {
                warn!(%session, error = %e, "Strip persistence failed");
                sink.emit(BoothEvent::AssemblyFailed(e.clone())).await;
                SessionReport {
                    thumbnail: Some(thumbnail),
                    persisted: None,
                    error: Some(e),
                }
            }
        }
    }

    /// Decode, filter and lay out `frames`, then build the thumbnail.
    ///
    /// Produces nothing unless every frame decodes.
    pub async fn compose_strip(
        &self,
        frames: Vec<Frame>,
        rotation_degrees: i32,
        reflect: bool,
        plan: &FilterPlan,
        arrangement: Arrangement,
        thumbnail_bounds: (u32, u32),
    ) -> Result<PhotoStrip, AssemblyError> {
        let filters = plan.resolve(arrangement, frames.len());

        // Decode sequentially; each decoded frame starts filtering right away
        let mut filtering = Vec::with_capacity(frames.len());
        for (index, (frame, filter)) in frames.into_iter().zip(filters).enumerate() {
            let decoded = tokio::task::spawn_blocking(move || {
                decode::decode(&frame.data, rotation_degrees, reflect)
            })
            .await
            .map_err(|e| DecodeError::Interrupted(e.to_string()))
            .and_then(|result| result)
            .map_err(|source| AssemblyError::FrameInvalid { index, source })?;

            debug!(index, ?filter, "Filtering panel");
            filtering.push(tokio::task::spawn_blocking(move || filter.apply(&decoded)));
        }

        let mut panels = Vec::with_capacity(filtering.len());
        for (index, result) in futures::future::join_all(filtering)
            .await
            .into_iter()
            .enumerate()
        {
            let panel = result.map_err(|e| AssemblyError::FrameInvalid {
                index,
                source: DecodeError::Interrupted(e.to_string()),
            })?;
            panels.push(panel);
        }

        let (max_width, max_height) = thumbnail_bounds;
        tokio::task::spawn_blocking(move || {
            let composed = layout::compose(arrangement, &panels);
            // Per-frame buffers are released whether or not layout succeeded
            drop(panels);
            composed.map(|canvas| PhotoStrip::new(canvas, max_width, max_height))
        })
        .await
        .map_err(|e| LayoutError::Interrupted(e.to_string()))?
        .map_err(AssemblyError::from)
    }
}
