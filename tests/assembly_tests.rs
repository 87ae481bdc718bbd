// SPDX-License-Identifier: MPL-2.0

//! Integration tests for full strip sessions

use image::{ImageFormat, Rgb, RgbImage};
use photobooth::constants::PANEL_PADDING;
use photobooth::errors::{AssemblyError, DecodeError};
use photobooth::pipelines::strip::{FilterPlan, Frame, SessionRequest};
use photobooth::{Arrangement, BoothEvent, EventSink, FilterMode, StripAssembler};
use std::io::Cursor;
use std::path::Path;
use tokio::sync::mpsc;

const P: u32 = PANEL_PADDING;

fn png_frame(width: u32, height: u32) -> Frame {
    let image = RgbImage::from_pixel(width, height, Rgb([200, 80, 40]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    Frame::new(bytes)
}

fn request(frames: Vec<Frame>, arrangement: Arrangement, output_dir: &Path) -> SessionRequest {
    SessionRequest {
        frames,
        rotation_degrees: 0,
        reflect: false,
        filters: FilterPlan::Mode(FilterMode::BlackAndWhiteMixed),
        arrangement,
        thumbnail_bounds: (64, 64),
        output_dir: output_dir.to_path_buf(),
        filename_prefix: "Strip_".to_string(),
    }
}

fn drain(receiver: &mut mpsc::Receiver<BoothEvent>) -> Vec<BoothEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_session_emits_thumbnail_then_persist() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, mut receiver) = EventSink::channel(8);
    let frames = (0..4).map(|_| png_frame(40, 30)).collect();

    let report = StripAssembler::new()
        .assemble(request(frames, Arrangement::Vertical, dir.path()), &sink)
        .await;
    assert!(report.is_complete());

    let events = drain(&mut receiver);
    assert_eq!(events.len(), 2);
    match &events[0] {
        BoothEvent::ThumbnailReady(thumbnail) => {
            assert!(thumbnail.width() <= 64 && thumbnail.height() <= 64);
        }
        other => panic!("expected thumbnail first, got {}", other.kind()),
    }
    match &events[1] {
        BoothEvent::PersistSucceeded(path) => {
            assert_eq!(Some(path), report.persisted.as_ref());
            assert!(path.starts_with(dir.path()));
        }
        other => panic!("expected persist second, got {}", other.kind()),
    }
}

#[tokio::test]
async fn test_persisted_strip_reloads_at_full_size() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, _receiver) = EventSink::channel(8);
    let frames = (0..4).map(|_| png_frame(40, 30)).collect();

    let report = StripAssembler::new()
        .assemble(request(frames, Arrangement::Box, dir.path()), &sink)
        .await;

    let path = report.persisted.unwrap();
    let reloaded = image::open(&path).unwrap();
    assert_eq!(
        (reloaded.width(), reloaded.height()),
        (2 * 40 + 3 * P, 2 * 30 + 3 * P)
    );
}

#[tokio::test]
async fn test_decode_failure_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("strips");
    let (sink, mut receiver) = EventSink::channel(8);
    let frames = vec![
        png_frame(40, 30),
        png_frame(40, 30),
        Frame::new(b"definitely not an image".to_vec()),
        png_frame(40, 30),
    ];

    let report = StripAssembler::new()
        .assemble(request(frames, Arrangement::Vertical, &out), &sink)
        .await;

    assert!(report.thumbnail.is_none());
    assert!(report.persisted.is_none());

    let events = drain(&mut receiver);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        BoothEvent::AssemblyFailed(AssemblyError::FrameInvalid {
            index: 2,
            source: DecodeError::Malformed(_)
        })
    ));
    assert!(!out.exists(), "No output should be written");
}

#[tokio::test]
async fn test_persist_failure_keeps_thumbnail() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let (sink, mut receiver) = EventSink::channel(8);
    let frames = (0..2).map(|_| png_frame(40, 30)).collect();

    let report = StripAssembler::new()
        .assemble(request(frames, Arrangement::Horizontal, &blocker), &sink)
        .await;

    assert!(report.thumbnail.is_some());
    assert!(report.persisted.is_none());

    let events = drain(&mut receiver);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], BoothEvent::ThumbnailReady(_)));
    assert!(matches!(
        events[1],
        BoothEvent::AssemblyFailed(AssemblyError::PersistFailed(_))
    ));
}

#[tokio::test]
async fn test_box_with_odd_count_fails_layout() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, mut receiver) = EventSink::channel(8);
    let frames = (0..3).map(|_| png_frame(20, 20)).collect();

    let report = StripAssembler::new()
        .assemble(request(frames, Arrangement::Box, dir.path()), &sink)
        .await;

    assert!(matches!(report.error, Some(AssemblyError::LayoutFailed(_))));
    let events = drain(&mut receiver);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), "assembly-failed");
}
