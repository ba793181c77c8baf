use super::*;
use crate::assets::naming::MAX_FRAMES;

#[test]
fn empty_object_uses_hero_defaults() {
    let cfg = PlayerConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PlayerConfig::default());
    assert_eq!(cfg.canvas_id, "hero-canvas");
    assert_eq!(cfg.frames.range().unwrap().len(), 163);
    assert_eq!(cfg.loading_fade(), Duration::from_millis(500));
}

#[test]
fn partial_frames_block_keeps_other_defaults() {
    let json = r#"{ "frames": { "start": 1, "end": 10, "extension": "png" } }"#;
    let cfg = PlayerConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.frames.start, 1);
    assert_eq!(cfg.frames.end, 10);
    assert_eq!(cfg.frames.extension, "png");
    assert_eq!(cfg.frames.prefix, "ezgif");
    assert_eq!(cfg.scroll_hint_threshold, 0.05);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PlayerConfig::from_reader(r#"{ "fps": 30 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn inverted_range_fails_validation() {
    let json = r#"{ "frames": { "start": 20, "end": 10 } }"#;
    let err = PlayerConfig::from_reader(json.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn threshold_outside_unit_interval_fails_validation() {
    let cfg = PlayerConfig {
        scroll_hint_threshold: 1.5,
        ..PlayerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn oversized_frame_range_fails_validation() {
    let json = r#"{ "frames": { "start": 0, "end": 4294967295 } }"#;
    let err = PlayerConfig::from_reader(json.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
    assert!(err.to_string().contains("more than 10000"));

    let mut cfg = PlayerConfig::default();
    cfg.frames.start = 1;
    cfg.frames.end = MAX_FRAMES as u32;
    assert!(cfg.validate().is_ok());
    cfg.frames.end += 1;
    assert!(cfg.validate().is_err());
}
