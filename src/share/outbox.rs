// SPDX-License-Identifier: GPL-3.0-only

//! Local outbox share capability
//!
//! Copies the strip into `<root>/<destination_id>/`, where an external sync
//! agent (print spooler, uploader) can pick it up. A strip already present in
//! the folder counts as delivered, so share records that do not outlive the
//! process still never hand the same strip over twice.

use super::ShareCapability;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OutboxCapability {
    root: PathBuf,
}

impl OutboxCapability {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder a destination's files are dropped into
    pub fn folder(&self, destination_id: &str) -> PathBuf {
        self.root.join(destination_id)
    }
}

impl ShareCapability for OutboxCapability {
    fn try_send(&self, path: &Path, destination_id: &str) -> Result<(), String> {
        let file_name = path
            .file_name()
            .ok_or_else(|| format!("{} has no file name", path.display()))?;

        let folder = self.folder(destination_id);
        std::fs::create_dir_all(&folder)
            .map_err(|e| format!("Failed to create {}: {}", folder.display(), e))?;

        let target = folder.join(file_name);
        if target.exists() {
            debug!(target = %target.display(), "Strip already in outbox");
            return Ok(());
        }
        std::fs::copy(path, &target)
            .map_err(|e| format!("Failed to copy to {}: {}", target.display(), e))?;

        debug!(target = %target.display(), "Strip dropped in outbox");
        Ok(())
    }
}
