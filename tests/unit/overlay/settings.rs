use super::*;
use crate::symbol::encoder::ErrorCorrection;

#[test]
fn defaults_match_the_element() {
    let s = OverlaySettings::default();
    assert_eq!((s.scale(), s.x(), s.y(), s.border()), (1, 10, 10, 2));
    assert_eq!(s.template(), "%t");
    assert_eq!(s.encoding(), &EncodeParams::default());
    s.validate().unwrap();
}

#[test]
fn setters_reject_out_of_range_values() {
    let mut s = OverlaySettings::default();
    assert!(s.set_scale(0).is_err());
    assert!(s.set_scale(256).is_err());
    s.set_scale(255).unwrap();
    assert!(s.set_x(MAX_COORD + 1).is_err());
    assert!(s.set_y(u32::MAX).is_err());
    assert!(s.set_border(u32::MAX).is_err());
    s.set_border(0).unwrap();
    assert!(
        s.set_encoding(EncodeParams {
            version: 41,
            ..EncodeParams::default()
        })
        .is_err()
    );
    // Rejected values leave the previous ones in place.
    assert_eq!((s.scale(), s.x(), s.border()), (255, 10, 0));
}

#[test]
fn render_config_mirrors_settings() {
    let mut s = OverlaySettings::default();
    s.set_scale(4).unwrap();
    s.set_x(7).unwrap();
    s.set_y(9).unwrap();
    s.set_border(3).unwrap();
    assert_eq!(
        s.render_config(),
        RenderConfig {
            scale: 4,
            border: 3,
            x: 7,
            y: 9
        }
    );
}

#[test]
fn json_partial_document_uses_defaults() {
    let json = r#"{ "scale": 3, "format": "n=%n", "encoding": { "ec_level": "q" } }"#;
    let s = OverlaySettings::from_reader(json.as_bytes()).unwrap();
    assert_eq!(s.scale(), 3);
    assert_eq!(s.x(), DEFAULT_X);
    assert_eq!(s.template(), "n=%n");
    assert_eq!(s.encoding().ec_level, ErrorCorrection::Q);
}

#[test]
fn json_rejects_unknown_keys_and_bad_values() {
    let err = OverlaySettings::from_reader(r#"{ "string": "x" }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, QrStampError::Serde(_)));

    let err = OverlaySettings::from_reader(r#"{ "scale": 0 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, QrStampError::Validation(_)));
}

#[test]
fn json_round_trips() {
    let mut s = OverlaySettings::default();
    s.set_template("%f %w");
    let back = OverlaySettings::from_reader(s.to_json().unwrap().as_bytes()).unwrap();
    assert_eq!(back, s);
}

#[test]
fn from_path_reports_missing_file() {
    let err = OverlaySettings::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
