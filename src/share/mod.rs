// SPDX-License-Identifier: GPL-3.0-only

//! One-shot sharing of a persisted strip
//!
//! Each destination gets at most one accepted share call per strip. A
//! destination moves from `NotRequested` to `Marked` once its capability
//! accepts the request and never moves back. Rejections leave it retryable.
//!
//! Every destination has its own lock, held across the capability call, so
//! two concurrent requests for the same destination serialize (the second
//! sees `Marked`) while different destinations proceed independently.

mod outbox;

pub use outbox::OutboxCapability;

use crate::errors::ShareRejection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// External sharing target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    PrintQueue,
    SocialProfile,
    CloudFolder,
}

impl Destination {
    pub const ALL: [Destination; 3] = [
        Destination::PrintQueue,
        Destination::SocialProfile,
        Destination::CloudFolder,
    ];

    /// Identifier handed to the capability when none is configured
    pub fn default_id(&self) -> &'static str {
        match self {
            Destination::PrintQueue => "print_queue",
            Destination::SocialProfile => "profile",
            Destination::CloudFolder => "app_folder",
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Destination::PrintQueue => "print-queue",
            Destination::SocialProfile => "social-profile",
            Destination::CloudFolder => "cloud-folder",
        }
    }

    fn index(&self) -> usize {
        match self {
            Destination::PrintQueue => 0,
            Destination::SocialProfile => 1,
            Destination::CloudFolder => 2,
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Destination::ALL
            .into_iter()
            .find(|d| d.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown destination '{}'", s))
    }
}

/// Opaque share operation provided by a destination
pub trait ShareCapability: Send + Sync {
    /// Hand the file at `path` to the destination. `Err` carries the reason it was declined.
    fn try_send(&self, path: &Path, destination_id: &str) -> Result<(), String>;
}

impl<F> ShareCapability for F
where
    F: Fn(&Path, &str) -> Result<(), String> + Send + Sync,
{
    fn try_send(&self, path: &Path, destination_id: &str) -> Result<(), String> {
        self(path, destination_id)
    }
}

struct Endpoint {
    capability: Arc<dyn ShareCapability>,
    destination_id: String,
}

/// Capabilities and identifiers per destination
#[derive(Default, Clone)]
pub struct ShareRegistry {
    endpoints: HashMap<Destination, Arc<Endpoint>>,
}

impl ShareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `capability` for `destination` under its default identifier
    pub fn register(&mut self, destination: Destination, capability: Arc<dyn ShareCapability>) {
        self.register_with_id(destination, destination.default_id(), capability);
    }

    pub fn register_with_id(
        &mut self,
        destination: Destination,
        destination_id: impl Into<String>,
        capability: Arc<dyn ShareCapability>,
    ) {
        self.endpoints.insert(
            destination,
            Arc::new(Endpoint {
                capability,
                destination_id: destination_id.into(),
            }),
        );
    }

    /// Register the same capability for every destination, using `ids` where given
    pub fn with_capability_for_all(
        capability: Arc<dyn ShareCapability>,
        ids: &HashMap<Destination, String>,
    ) -> Self {
        let mut registry = Self::new();
        for destination in Destination::ALL {
            let id = ids
                .get(&destination)
                .cloned()
                .unwrap_or_else(|| destination.default_id().to_string());
            registry.register_with_id(destination, id, Arc::clone(&capability));
        }
        registry
    }

    fn endpoint(&self, destination: Destination) -> Option<&Arc<Endpoint>> {
        self.endpoints.get(&destination)
    }
}

impl std::fmt::Debug for ShareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.endpoints
                    .iter()
                    .map(|(d, e)| (d, e.destination_id.as_str())),
            )
            .finish()
    }
}

/// Share record state for one destination of one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareState {
    #[default]
    NotRequested,
    Marked,
}

/// Result of a share request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The capability accepted the request; the destination is now marked
    Marked,
    /// An earlier request was accepted; the capability was not called
    AlreadyMarked,
    /// The request was not accepted; the destination can be retried
    Rejected(ShareRejection),
}

/// Per-strip share records
#[derive(Debug)]
pub struct ShareStateMachine {
    registry: ShareRegistry,
    records: [Mutex<ShareState>; 3],
}

impl ShareStateMachine {
    /// Fresh records (all `NotRequested`) for a newly assembled strip
    pub fn new(registry: ShareRegistry) -> Self {
        Self {
            registry,
            records: Default::default(),
        }
    }

    pub fn state(&self, destination: Destination) -> ShareState {
        *self.records[destination.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Destinations that have been marked so far
    pub fn marked(&self) -> Vec<Destination> {
        Destination::ALL
            .into_iter()
            .filter(|d| self.state(*d) == ShareState::Marked)
            .collect()
    }

    /// Request a share of the strip at `path` to `destination`.
    ///
    /// Blocks while the destination's capability runs; call from a blocking
    /// context.
    pub fn request_share(&self, path: &Path, destination: Destination) -> ShareOutcome {
        // A panic inside a capability leaves the record untouched, so a poisoned
        // lock still holds a consistent state
        let mut record = self.records[destination.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if *record == ShareState::Marked {
            debug!(%destination, "Share already marked");
            return ShareOutcome::AlreadyMarked;
        }

        if !path.is_file() {
            warn!(%destination, path = %path.display(), "Share requested before strip was persisted");
            return ShareOutcome::Rejected(ShareRejection::NotPersisted(path.to_path_buf()));
        }

        let Some(endpoint) = self.registry.endpoint(destination) else {
            warn!(%destination, "No share capability registered");
            return ShareOutcome::Rejected(ShareRejection::NoCapability);
        };

        match endpoint
            .capability
            .try_send(path, &endpoint.destination_id)
        {
            Ok(()) => {
                *record = ShareState::Marked;
                info!(%destination, id = %endpoint.destination_id, "Share marked");
                ShareOutcome::Marked
            }
            Err(reason) => {
                warn!(%destination, %reason, "Share declined");
                ShareOutcome::Rejected(ShareRejection::Declined(reason))
            }
        }
    }
}
