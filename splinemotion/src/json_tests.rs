use crate::json::TrackDocument;
use crate::{
    Curve, Error, MixerConfig, MovementTrackData, NavigatorConfig, ResponseCurve, UpVector,
};
use glam::Vec3;

#[test]
fn json_document_parses_all_sections() {
    let json = r#"
{
  "format": "1.0",
  "name": "walk-to-door",
  "mixer": { "origin": 0.1, "switchEpsilon": 0.05 },
  "navigator": { "turnSpeed": 180, "orientToPath": false, "speedParameter": "moveSpeed", "up": [0, 0, 1] },
  "clips": [
    { "name": "approach", "duration": 2.0, "start": 0.25, "end": 0.5, "switchPath": 1 },
    { "name": "stroll", "duration": 4, "end": 1.0, "progress": "none", "driveSpeed": false,
      "speed": { "base": 1.5, "curve": [{ "time": 0, "value": 0 }, { "time": 1, "value": 1 }] } }
  ]
}
"#;

    let doc = TrackDocument::from_json_str(json).expect("parse");
    assert_eq!(doc.track.name, "walk-to-door");
    assert!((doc.mixer.origin - 0.1).abs() < 1e-6);
    assert!((doc.mixer.switch_epsilon - 0.05).abs() < 1e-9);
    assert_eq!(doc.navigator.turn_speed, 180.0);
    assert!(!doc.navigator.orient_to_path);
    assert_eq!(doc.navigator.speed_parameter.as_deref(), Some("moveSpeed"));
    assert_eq!(doc.navigator.up, UpVector::Fixed(Vec3::Z));

    let (index, approach) = doc.track.clip("approach").expect("approach");
    assert_eq!(index, 0);
    assert_eq!(approach.duration, 2.0);
    assert_eq!(approach.switch_path, Some(1));
    assert_eq!(approach.start_param, Some(0.25));
    assert_eq!(approach.progress, Some(ResponseCurve::identity()));
    assert!(approach.speed.is_none());
    assert!(approach.drive_speed);

    let (_, stroll) = doc.track.clip("stroll").expect("stroll");
    assert!(stroll.progress.is_none());
    assert!(!stroll.drive_speed);
    let speed = stroll.speed.as_ref().expect("speed curve");
    assert!((speed.base_speed - 1.5).abs() < 1e-6);
    assert_eq!(speed.curve, ResponseCurve::identity());
}

#[test]
fn json_defaults_fill_missing_sections() {
    let json = r#"{ "clips": [ { "name": "a", "duration": 1 } ] }"#;
    let doc = TrackDocument::from_json_str(json).expect("parse");

    assert_eq!(doc.track.name, "");
    assert_eq!(doc.mixer, MixerConfig::default());
    assert_eq!(doc.navigator, NavigatorConfig::default());
    let clip = &doc.track.clips[0];
    assert_eq!(clip.end_param, 1.0);
    assert_eq!(clip.start_param, None);
    assert_eq!(clip.progress, Some(ResponseCurve::identity()));
    assert_eq!(clip.switch_path, None);
}

#[test]
fn json_speed_without_curve_is_constant() {
    let json = r#"{ "clips": [ { "name": "a", "duration": 1, "speed": { "base": 3 } } ] }"#;
    let doc = TrackDocument::from_json_str(json).expect("parse");
    let speed = doc.track.clips[0].speed.as_ref().expect("speed");
    assert_eq!(speed.base_speed, 3.0);
    assert_eq!(speed.curve.evaluate(0.0), 1.0);
    assert_eq!(speed.curve.evaluate(0.9), 1.0);
}

#[test]
fn json_speed_parameter_null_disables_readout() {
    let json = r#"{ "navigator": { "speedParameter": null, "up": "path" }, "clips": [] }"#;
    let doc = TrackDocument::from_json_str(json).expect("parse");
    assert_eq!(doc.navigator.speed_parameter, None);
    assert_eq!(doc.navigator.up, UpVector::Path);
    assert!(doc.track.clips.is_empty());
}

#[test]
fn json_rejects_bad_navigator_values() {
    for navigator in [
        r#"{ "up": "sideways" }"#,
        r#"{ "up": [0, 1] }"#,
        r#"{ "speedParameter": 3 }"#,
    ] {
        let json = format!(r#"{{ "navigator": {navigator}, "clips": [] }}"#);
        assert!(
            matches!(TrackDocument::from_json_str(&json), Err(Error::JsonParse { .. })),
            "{navigator} should be rejected"
        );
    }

    let json = r#"{ "navigator": { "turnSpeed": -5 }, "clips": [] }"#;
    assert!(matches!(
        TrackDocument::from_json_str(json),
        Err(Error::InvalidValue { .. })
    ));
}

#[test]
fn json_curve_keys_parse_interpolation() {
    let json = r#"
{
  "clips": [
    { "name": "ease", "duration": 1, "progress": [
      { "time": 0, "value": 0, "curve": [0.25, 0.0, 0.75, 1.0] },
      { "time": 0.5, "value": 0.5, "curve": "stepped" },
      { "time": 0.8, "value": 0.9, "curve": "linear" },
      { "time": 1, "value": 1 }
    ] }
  ]
}
"#;
    let data = MovementTrackData::from_json_str(json).expect("parse");
    let keys = &data.clips[0].progress.as_ref().expect("progress").keys;
    assert_eq!(keys.len(), 4);
    assert_eq!(
        keys[0].curve,
        Curve::Bezier {
            cx1: 0.25,
            cy1: 0.0,
            cx2: 0.75,
            cy2: 1.0
        }
    );
    assert_eq!(keys[1].curve, Curve::Stepped);
    assert_eq!(keys[2].curve, Curve::Linear);
    assert_eq!(keys[3].curve, Curve::Linear);
}

#[test]
fn json_curve_presets() {
    let json = r#"
{
  "clips": [
    { "name": "held", "duration": 1, "progress": 0.4 },
    { "name": "plain", "duration": 1, "progress": "linear" }
  ]
}
"#;
    let data = MovementTrackData::from_json_str(json).expect("parse");
    let held = data.clips[0].progress.as_ref().expect("progress");
    assert!((held.evaluate(0.0) - 0.4).abs() < 1e-6);
    assert!((held.evaluate(1.0) - 0.4).abs() < 1e-6);
    assert_eq!(
        data.clips[1].progress.as_ref(),
        Some(&ResponseCurve::identity())
    );
}

#[test]
fn json_rejects_malformed_curves() {
    for progress in [
        r#""wobbly""#,
        r#"[{ "time": 0, "value": 0, "curve": "cubic" }]"#,
        r#"[{ "time": 0, "value": 0, "curve": [0.1, 0.2, 0.3] }]"#,
        r#"[{ "time": 0, "value": 0, "curve": [0.1, "a", 0.3, 0.4] }]"#,
        r#"{ "time": 0 }"#,
    ] {
        let json =
            format!(r#"{{ "clips": [ {{ "name": "a", "duration": 1, "progress": {progress} }} ] }}"#);
        assert!(
            matches!(
                TrackDocument::from_json_str(&json),
                Err(Error::JsonInvalidCurve { .. })
            ),
            "{progress} should be rejected"
        );
    }
}

#[test]
fn json_validates_curve_key_order() {
    let json = r#"
{ "clips": [ { "name": "a", "duration": 1, "progress": [
  { "time": 0.8, "value": 0 }, { "time": 0.2, "value": 1 }
] } ] }
"#;
    assert!(matches!(
        TrackDocument::from_json_str(json),
        Err(Error::InvalidValue { .. })
    ));
}

#[test]
fn json_validates_mixer_settings() {
    let json = r#"{ "mixer": { "origin": 2.0 }, "clips": [] }"#;
    assert!(matches!(
        TrackDocument::from_json_str(json),
        Err(Error::InvalidValue { .. })
    ));
}

#[test]
fn json_format_major_version_must_match() {
    let ok = r#"{ "format": "1.3", "clips": [] }"#;
    TrackDocument::from_json_str(ok).expect("minor versions are accepted");

    for format in ["2.0", "beta", ""] {
        let json = format!(r#"{{ "format": "{format}", "clips": [] }}"#);
        assert!(
            matches!(
                TrackDocument::from_json_str(&json),
                Err(Error::JsonFormatVersion { .. })
            ),
            "format {format:?} should be rejected"
        );
    }
}

#[test]
fn json_syntax_errors_are_reported() {
    assert!(matches!(
        TrackDocument::from_json_str("{ \"clips\": [ "),
        Err(Error::JsonParse { .. })
    ));
    assert!(matches!(
        TrackDocument::from_json_str(r#"{ "clips": [ { "duration": 1 } ] }"#),
        Err(Error::JsonParse { .. })
    ));
}
