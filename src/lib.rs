// SPDX-License-Identifier: GPL-3.0-only

//! Photo Booth - photo strip assembly and one-shot sharing
//!
//! This library turns a burst of captured frames into a single photo strip
//! and tracks sharing of the persisted strip to external destinations.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`pipelines`]: Strip assembly (decode, filter, layout, thumbnail, encode)
//! - [`share`]: Per-strip share records with at-most-once delivery per destination
//! - [`session`]: Session object tying a strip to its share records
//! - [`events`]: Notifications for the UI layer
//! - [`config`]: Booth configuration
//! - [`storage`]: Output directory and filename handling
//!
//! # Example
//!
//! ```no_run
//! use photobooth::{BoothConfig, BoothSession, EventSink, ShareRegistry, StripAssembler};
//! use photobooth::pipelines::strip::Frame;
//!
//! # async fn run(frames: Vec<Vec<u8>>) {
//! let config = BoothConfig::default();
//! let (events, mut receiver) = EventSink::channel(config.event_capacity);
//! let mut session = BoothSession::new(
//!     StripAssembler::with_encoder(config.encoder()),
//!     ShareRegistry::new(),
//!     events,
//! );
//!
//! let request = config.session_request(frames.into_iter().map(Frame::new).collect());
//! let report = session.start(request).await;
//! while let Ok(event) = receiver.try_recv() {
//!     println!("{}", event.kind());
//! }
//! # let _ = report;
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod pipelines;
pub mod session;
pub mod share;
pub mod storage;

// Re-export commonly used types
pub use config::BoothConfig;
pub use events::{BoothEvent, EventSink};
pub use pipelines::strip::{Arrangement, Filter, FilterMode, StripAssembler};
pub use session::{BoothSession, ShareHandle};
pub use share::{Destination, ShareOutcome, ShareRegistry, ShareStateMachine};
