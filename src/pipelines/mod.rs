// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! All heavy operations run on blocking worker threads so the caller's
//! interactive thread never stalls.
//!
//! # Modules
//!
//! - [`strip`]: Photo strip assembly with per-panel filters and JPEG encoding

pub mod strip;
