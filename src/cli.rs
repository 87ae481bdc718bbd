// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for booth operations
//!
//! This module provides command-line functionality for:
//! - Assembling a strip from frame files
//! - Sharing a persisted strip through a local outbox
//! - Finding the newest persisted strip

use photobooth::errors::{AppError, AppResult};
use photobooth::pipelines::strip::Frame;
use photobooth::share::OutboxCapability;
use photobooth::storage;
use photobooth::{
    BoothConfig, BoothEvent, BoothSession, Destination, EventSink, ShareOutcome, ShareRegistry,
    ShareStateMachine, StripAssembler,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parse `WIDTHxHEIGHT`
pub fn parse_bounds(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: u32 = width.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let height: u32 = height.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    if width == 0 || height == 0 {
        return Err("bounds must be at least 1x1".to_string());
    }
    Ok((width, height))
}

/// Load the config file if given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> AppResult<BoothConfig> {
    match path {
        Some(path) => Ok(BoothConfig::load(path)?),
        None => Ok(BoothConfig::default()),
    }
}

fn outbox_registry(config: &BoothConfig, outbox: &Path) -> ShareRegistry {
    ShareRegistry::with_capability_for_all(
        Arc::new(OutboxCapability::new(outbox)),
        &config.destination_ids,
    )
}

/// Assemble a strip from frame files, then optionally share it
pub fn assemble(
    config: &BoothConfig,
    frame_paths: &[PathBuf],
    destinations: &[Destination],
    outbox: Option<PathBuf>,
) -> AppResult<()> {
    let frames = frame_paths
        .iter()
        .map(|path| {
            std::fs::read(path)
                .map(Frame::new)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let registry = match &outbox {
        Some(outbox) => outbox_registry(config, outbox),
        None => ShareRegistry::new(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let (events, mut receiver) = EventSink::channel(config.event_capacity);
        let printer = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                print_event(&event);
            }
        });

        let mut session = BoothSession::new(
            StripAssembler::with_encoder(config.encoder()),
            registry,
            events,
        );

        println!("Assembling {} frames...", frame_paths.len());
        let report = session.start(config.session_request(frames)).await;

        if report.persisted.is_some() {
            let handle = session.share_handle();
            let requests = destinations.iter().map(|destination| {
                let handle = handle.clone();
                let destination = *destination;
                async move { handle.request(destination).await }
            });
            futures::future::join_all(requests).await;
        }

        session.teardown();
        drop(session);
        let _ = printer.await;

        match report.error {
            Some(e) => Err(AppError::from(e)),
            None => Ok(()),
        }
    })
}

/// Share an already persisted strip.
///
/// Share records live for one invocation; a strip already present in a
/// destination's outbox folder counts as delivered and is not copied again.
pub fn share(
    config: &BoothConfig,
    strip: &Path,
    destinations: &[Destination],
    outbox: &Path,
) -> AppResult<()> {
    let machine = ShareStateMachine::new(outbox_registry(config, outbox));
    let mut failed = false;

    for destination in destinations {
        match machine.request_share(strip, *destination) {
            ShareOutcome::Marked => println!("Shared to {}", destination),
            ShareOutcome::AlreadyMarked => println!("Already shared to {}", destination),
            ShareOutcome::Rejected(reason) => {
                eprintln!("Share to {} failed: {}", destination, reason);
                failed = true;
            }
        }
    }

    if failed {
        return Err("one or more shares failed".into());
    }
    Ok(())
}

/// Print the newest persisted strip
pub fn latest(config: &BoothConfig) -> AppResult<()> {
    let dir = config.output_dir();
    let rt = tokio::runtime::Runtime::new()?;
    let latest = rt.block_on(storage::latest_strip(dir.clone(), config.filename_prefix.clone()));

    match latest {
        Some(path) => println!("{}", path.display()),
        None => println!("No strips found in {}", dir.display()),
    }
    Ok(())
}

fn print_event(event: &BoothEvent) {
    match event {
        BoothEvent::ThumbnailReady(thumbnail) => {
            println!("Thumbnail ready: {}x{}", thumbnail.width(), thumbnail.height())
        }
        BoothEvent::PersistSucceeded(path) => println!("Strip saved: {}", path.display()),
        BoothEvent::AssemblyFailed(e) => eprintln!("Assembly failed: {}", e),
        BoothEvent::ShareMarked(destination) => println!("Shared to {}", destination),
        BoothEvent::ShareFailed(destination, reason) => {
            eprintln!("Share to {} failed: {}", destination, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse_bounds("200x100"), Ok((200, 100)));
        assert_eq!(parse_bounds("64X48"), Ok((64, 48)));
        assert!(parse_bounds("0x10").is_err());
        assert!(parse_bounds("200").is_err());
    }
}
