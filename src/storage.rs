// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for persisted strips

use crate::constants::{DEFAULT_FOLDER_NAME, FILENAME_TIMESTAMP_FORMAT, MAX_FILENAME_ATTEMPTS};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default directory for persisted strips: `~/Pictures/photobooth`
///
/// Falls back to the home directory, then the working directory.
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_FOLDER_NAME)
}

/// Create `dir` and its parents if needed
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    if !dir.is_dir() {
        return Err(io::Error::other(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    Ok(())
}

/// Generate a strip filename from the current local time
pub fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Local::now().format(FILENAME_TIMESTAMP_FORMAT);
    format!("{}{}.{}", prefix, timestamp, extension)
}

/// Write `data` to a fresh file in `dir`.
///
/// The file is opened with `create_new`, so concurrent writers never share a
/// path; on a clash a `_N` counter is appended to the stem.
pub fn write_new_file(dir: &Path, prefix: &str, extension: &str, data: &[u8]) -> io::Result<PathBuf> {
    let base = generate_filename(prefix, extension);
    let stem = base
        .strip_suffix(&format!(".{}", extension))
        .unwrap_or(&base)
        .to_string();

    for attempt in 0..MAX_FILENAME_ATTEMPTS {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{}_{}.{}", stem, attempt, extension)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(data).and_then(|_| file.sync_all()) {
                    // Don't leave a truncated strip behind
                    let _ = std::fs::remove_file(&path);
                    return Err(e);
                }
                debug!(path = %path.display(), bytes = data.len(), "Wrote strip file");
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!(path = %path.display(), "Filename taken, trying next");
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free filename for {} in {}", base, dir.display()),
    ))
}

/// Find the most recently modified strip in `dir`
///
/// Only JPEG and PNG files starting with `prefix` are considered.
pub async fn latest_strip(dir: PathBuf, prefix: String) -> Option<PathBuf> {
    tokio::task::spawn_blocking(move || {
        let mut files: Vec<(std::time::SystemTime, PathBuf)> = std::fs::read_dir(&dir)
            .ok()?
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                let name = path.file_name()?.to_string_lossy().into_owned();
                let ext = path.extension()?.to_string_lossy().into_owned();
                let is_image = ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("png");
                if !is_image || !name.starts_with(&prefix) {
                    return None;
                }
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, path))
            })
            .collect();

        // Newest first; name breaks ties since timestamps sort lexically
        files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        files.into_iter().next().map(|(_, path)| path)
    })
    .await
    .ok()
    .flatten()
}
