// SPDX-License-Identifier: GPL-3.0-only

//! Notifications delivered to the UI layer
//!
//! Events travel over a bounded channel. Within one event type they arrive in
//! the order they were produced; no order is promised across types.

use crate::errors::{AssemblyError, ShareRejection};
use crate::share::Destination;
use image::RgbImage;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum BoothEvent {
    /// The strip's thumbnail is ready for display
    ThumbnailReady(Arc<RgbImage>),
    /// The strip was written to disk
    PersistSucceeded(PathBuf),
    /// A session stage failed
    AssemblyFailed(AssemblyError),
    /// A destination accepted its share request
    ShareMarked(Destination),
    /// A destination rejected its share request; it may be retried
    ShareFailed(Destination, ShareRejection),
}

impl BoothEvent {
    /// Short name for logging (avoids dumping pixel data)
    pub fn kind(&self) -> &'static str {
        match self {
            BoothEvent::ThumbnailReady(_) => "thumbnail-ready",
            BoothEvent::PersistSucceeded(_) => "persist-succeeded",
            BoothEvent::AssemblyFailed(_) => "assembly-failed",
            BoothEvent::ShareMarked(_) => "share-marked",
            BoothEvent::ShareFailed(..) => "share-failed",
        }
    }
}

/// Sending half of the notification channel
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: mpsc::Sender<BoothEvent>,
}

impl EventSink {
    /// Create a sink and its receiver with room for `capacity` pending events
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BoothEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Deliver `event`, waiting for room in the channel.
    ///
    /// A dropped receiver means the UI is gone; the event is discarded.
    pub async fn emit(&self, event: BoothEvent) {
        if let Err(mpsc::error::SendError(event)) = self.sender.send(event).await {
            debug!(kind = event.kind(), "Event receiver closed, dropping event");
        }
    }
}
