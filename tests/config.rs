//! Config persistence tests

use notegrid::config::GridConfig;
use notegrid::model::{GridModel, Size};
use tempfile::tempdir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = GridConfig::load_from(&dir.path().join("config.yaml"));
    assert_eq!(config, GridConfig::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = GridConfig {
        theme: "light".to_string(),
        quantize_denominator: 8,
        double_click_ms: 250,
        ..GridConfig::default()
    };

    config.save_to(&path).unwrap();
    assert_eq!(GridConfig::load_from(&path), config);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "quantize_enabled: false\nkey_height: 16\n").unwrap();

    let config = GridConfig::load_from(&path);
    assert!(!config.quantize_enabled);
    assert_eq!(config.key_height, 16.0);
    assert_eq!(config.timebase, GridConfig::default().timebase);
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "timebase: [not, a, number").unwrap();
    assert_eq!(GridConfig::load_from(&path), GridConfig::default());
}

#[test]
fn test_config_drives_new_model() {
    let config = GridConfig {
        quantize_denominator: 4,
        quantize_enabled: false,
        auto_scroll: false,
        ..GridConfig::default()
    };
    let model = GridModel::new(config, Size::new(640.0, 480.0)).unwrap();
    assert_eq!(model.view.quantizer.denominator(), 4);
    assert!(!model.view.quantizer.is_enabled());
    assert!(!model.view.auto_scroll);
}

#[test]
fn test_invalid_zoom_in_config_is_rejected() {
    let config = GridConfig {
        pixels_per_tick: -1.0,
        ..GridConfig::default()
    };
    assert!(GridModel::new(config, Size::new(640.0, 480.0)).is_err());
}
