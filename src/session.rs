// SPDX-License-Identifier: GPL-3.0-only

//! Booth session: one strip, its thumbnail, and its share records
//!
//! The session object carries all state between the capture screen's calls
//! (start, share, teardown) and reports every outcome on the event channel.

use crate::errors::ShareRejection;
use crate::events::{BoothEvent, EventSink};
use crate::pipelines::strip::{SessionReport, SessionRequest, StripAssembler};
use crate::share::{Destination, ShareOutcome, ShareRegistry, ShareStateMachine};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub struct BoothSession {
    assembler: StripAssembler,
    registry: ShareRegistry,
    events: EventSink,
    thumbnail: Option<Arc<RgbImage>>,
    persisted: Option<PathBuf>,
    shares: Arc<ShareStateMachine>,
}

impl BoothSession {
    pub fn new(assembler: StripAssembler, registry: ShareRegistry, events: EventSink) -> Self {
        let shares = Arc::new(ShareStateMachine::new(registry.clone()));
        Self {
            assembler,
            registry,
            events,
            thumbnail: None,
            persisted: None,
            shares,
        }
    }

    /// Assemble a new strip, replacing any previous one.
    ///
    /// Share records start over for the new strip.
    pub async fn start(&mut self, request: SessionRequest) -> SessionReport {
        self.teardown();
        self.persisted = None;
        self.shares = Arc::new(ShareStateMachine::new(self.registry.clone()));

        let report = self.assembler.assemble(request, &self.events).await;
        self.thumbnail = report.thumbnail.clone();
        self.persisted = report.persisted.clone();
        report
    }

    /// Path of the persisted strip, once written
    pub fn persisted(&self) -> Option<&Path> {
        self.persisted.as_deref()
    }

    pub fn thumbnail(&self) -> Option<&Arc<RgbImage>> {
        self.thumbnail.as_ref()
    }

    /// Share records of the current strip
    pub fn shares(&self) -> &Arc<ShareStateMachine> {
        &self.shares
    }

    /// Handle for share requests that can be moved to other tasks
    pub fn share_handle(&self) -> ShareHandle {
        ShareHandle {
            shares: Arc::clone(&self.shares),
            persisted: self.persisted.clone(),
            events: self.events.clone(),
        }
    }

    /// Request a share of the current strip to `destination`
    pub async fn request_share(&self, destination: Destination) -> ShareOutcome {
        self.share_handle().request(destination).await
    }

    /// Release the retained thumbnail
    pub fn teardown(&mut self) {
        if self.thumbnail.take().is_some() {
            debug!("Thumbnail released");
        }
    }
}

/// Share requests for one strip, usable concurrently from several tasks
#[derive(Clone)]
pub struct ShareHandle {
    shares: Arc<ShareStateMachine>,
    persisted: Option<PathBuf>,
    events: EventSink,
}

impl ShareHandle {
    /// Run the share state machine on a blocking worker and report the outcome.
    ///
    /// `AlreadyMarked` produces no event.
    pub async fn request(&self, destination: Destination) -> ShareOutcome {
        let outcome = match self.persisted.clone() {
            Some(path) => {
                let shares = Arc::clone(&self.shares);
                tokio::task::spawn_blocking(move || shares.request_share(&path, destination))
                    .await
                    .unwrap_or_else(|e| {
                        ShareOutcome::Rejected(ShareRejection::Declined(format!(
                            "share task error: {}",
                            e
                        )))
                    })
            }
            None => ShareOutcome::Rejected(ShareRejection::NotPersisted(PathBuf::new())),
        };

        match &outcome {
            ShareOutcome::Marked => {
                info!(%destination, "Share request marked");
                self.events.emit(BoothEvent::ShareMarked(destination)).await;
            }
            ShareOutcome::AlreadyMarked => {}
            ShareOutcome::Rejected(reason) => {
                self.events
                    .emit(BoothEvent::ShareFailed(destination, reason.clone()))
                    .await;
            }
        }
        outcome
    }
}
