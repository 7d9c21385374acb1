use super::*;
use crate::export::format::ExportFormat;

#[test]
fn empty_object_yields_defaults() {
    let cfg = BoothConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, BoothConfig::default());
    assert_eq!(cfg.countdown_secs.secs(), 3);
    assert_eq!(cfg.timings.capture.settle_ms, 1500);
    assert_eq!(cfg.timings.export_delay_ms, 200);
    assert_eq!(cfg.export.pixel_ratio, 2.0);
}

#[test]
fn fields_parse_from_json() {
    let json = r#"{
        "countdown_secs": 5,
        "timings": { "tick_ms": 500, "export_delay_ms": 50 },
        "export": { "format": "jpg", "jpeg_quality": 0.8 },
        "default_theme": "pixel-heart",
        "default_filter": "noir",
        "font_path": "/tmp/font.ttf"
    }"#;
    let cfg = BoothConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.countdown_secs, CountdownSecs::Five);
    assert_eq!(cfg.timings.capture.tick_ms, 500);
    assert_eq!(cfg.timings.capture.flash_ms, 200);
    assert_eq!(cfg.export.format, ExportFormat::Jpg);
    assert_eq!(cfg.default_theme, ThemeId::PixelHeart);

    let opts = cfg.edit_options(1, None);
    assert_eq!(opts.export_delay, Duration::from_millis(50));
    assert_eq!(opts.export.jpeg_quality, 0.8);
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"countdown_secs": 4}"#,
        r#"{"export": {"pixel_ratio": 0}}"#,
        r#"{"export": {"jpeg_quality": 1.5}}"#,
        r#"{"default_filter": "glitter"}"#,
        r#"{"timings": {"tick_ms": 0}}"#,
        "not json",
    ] {
        assert!(BoothConfig::from_reader(json.as_bytes()).is_err(), "{json}");
    }
}

#[test]
fn missing_file_is_an_io_error_with_the_path() {
    let err = BoothConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, BoothError::Other(_)));
    assert!(err.to_string().contains("/definitely/not/here.json"));
}

#[test]
fn font_override_ignores_empty_values() {
    let cfg = BoothConfig::default().with_font_override(Some("/fonts/a.ttf"));
    assert_eq!(cfg.font_path.as_deref(), Some(Path::new("/fonts/a.ttf")));
    let cfg = cfg.with_font_override(Some(""));
    assert_eq!(cfg.font_path.as_deref(), Some(Path::new("/fonts/a.ttf")));
    let cfg = cfg.with_font_override(None::<PathBuf>);
    assert!(cfg.font_path.is_some());
}
