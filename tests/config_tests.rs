// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use photobooth::errors::ConfigError;
use photobooth::pipelines::strip::FilterPlan;
use photobooth::{Arrangement, BoothConfig, Destination, FilterMode};
use std::path::PathBuf;

#[test]
fn test_config_default() {
    let config = BoothConfig::default();

    assert_eq!(config.arrangement, Arrangement::Vertical);
    assert_eq!(config.filter_mode, FilterMode::None);
    assert!(!config.reflect, "Reflection should be off by default");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booth.json");
    std::fs::write(
        &path,
        r#"{ "arrangement": "box", "filter_mode": "sepia-mixed", "reflect": true }"#,
    )
    .unwrap();

    let config = BoothConfig::load(&path).unwrap();
    assert_eq!(config.arrangement, Arrangement::Box);
    assert_eq!(config.filter_mode, FilterMode::SepiaMixed);
    assert!(config.reflect);
    assert_eq!(
        config.filename_prefix,
        BoothConfig::default().filename_prefix
    );
}

#[test]
fn test_config_destination_ids_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booth.json");
    std::fs::write(
        &path,
        r#"{ "destination_ids": { "print-queue": "lobby_printer" } }"#,
    )
    .unwrap();

    let config = BoothConfig::load(&path).unwrap();
    assert_eq!(
        config.destination_ids.get(&Destination::PrintQueue),
        Some(&"lobby_printer".to_string())
    );
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();

    let zero = dir.path().join("zero.json");
    std::fs::write(&zero, r#"{ "thumbnail": { "max_width": 0, "max_height": 10 } }"#).unwrap();
    assert!(matches!(
        BoothConfig::load(&zero),
        Err(ConfigError::Invalid(_))
    ));

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    assert!(matches!(
        BoothConfig::load(&garbage),
        Err(ConfigError::Parse { .. })
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        BoothConfig::load(&missing),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_session_request_carries_settings() {
    let config = BoothConfig {
        arrangement: Arrangement::Horizontal,
        filter_mode: FilterMode::BlackAndWhite,
        rotation_degrees: 90,
        output_dir: Some(PathBuf::from("/tmp/strips")),
        ..BoothConfig::default()
    };

    let request = config.session_request(Vec::new());
    assert_eq!(request.arrangement, Arrangement::Horizontal);
    assert_eq!(request.rotation_degrees, 90);
    assert_eq!(request.filters, FilterPlan::Mode(FilterMode::BlackAndWhite));
    assert_eq!(request.output_dir, PathBuf::from("/tmp/strips"));
}
