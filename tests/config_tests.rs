//! Configuration loading and validation, plus the JSON data exchange.

use noteflake::config::{CATEGORY10, MAX_FOLD};
use noteflake::{
    frame_to_json, project, tracks_from_json, AngleMode, Error, LayoutConfig, LayoutMode,
    MandalaDistance, RayAssignment, Symmetry, ViewSize,
};
use pretty_assertions::assert_eq;

#[test]
fn empty_object_is_the_default_config() {
    let config = LayoutConfig::from_json_str("{}").unwrap();
    assert_eq!(config, LayoutConfig::default());
    assert_eq!(config.max_radius, 5.0);
    assert_eq!(config.palette.len(), CATEGORY10.len());
}

#[test]
fn mode_and_tunables_can_be_overridden() {
    let json = r#"{
        "mode": { "kind": "mirrored-six-fold", "distance": "note-index", "symmetry": { "fold": 8, "mirror": false } },
        "angle_mode": "atan2",
        "max_radius": 3.5,
        "mandala": { "whole_fraction": 0.4 }
    }"#;
    let config = LayoutConfig::from_json_str(json).unwrap();
    assert_eq!(
        config.mode,
        LayoutMode::MirroredSixFold {
            distance: MandalaDistance::NoteIndex,
            symmetry: Symmetry::new(8, false),
        }
    );
    assert_eq!(config.angle_mode, AngleMode::Atan2);
    assert_eq!(config.max_radius, 3.5);
    assert_eq!(config.mandala.whole_fraction, 0.4);
    assert_eq!(config.mandala.time_inner_dots, 12.0);
}

#[test]
fn variant_fields_default_when_omitted() {
    let config = LayoutConfig::from_json_str(r#"{ "mode": { "kind": "sequential-ray" } }"#).unwrap();
    assert_eq!(
        config.mode,
        LayoutMode::SequentialRay {
            rays: RayAssignment::PitchClass
        }
    );
    let config = LayoutConfig::from_json_str(r#"{ "mode": { "kind": "multi-track-ray" } }"#).unwrap();
    assert_eq!(config.mode, LayoutMode::MultiTrackRay);
}

#[test]
fn zero_fold_is_rejected() {
    let json = r#"{ "mode": { "kind": "mirrored-six-fold", "symmetry": { "fold": 0 } } }"#;
    let err = LayoutConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn oversized_fold_is_rejected() {
    let json = r#"{ "mode": { "kind": "mirrored-six-fold", "symmetry": { "fold": 4000000000 } } }"#;
    let err = LayoutConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");

    let mut config = LayoutConfig::with_mode(LayoutMode::MirroredSixFold {
        distance: MandalaDistance::StartTime,
        symmetry: Symmetry::new(MAX_FOLD, true),
    });
    assert!(config.validate().is_ok());
    config.mode = LayoutMode::MirroredSixFold {
        distance: MandalaDistance::StartTime,
        symmetry: Symmetry::new(MAX_FOLD + 1, true),
    };
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn documented_mode_tag_is_kind() {
    let config =
        LayoutConfig::from_json_str(r#"{ "mode": { "kind": "multi-track-ray" } }"#).unwrap();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["mode"]["kind"], "multi-track-ray");
}

#[test]
fn bad_numbers_are_rejected() {
    let mut config = LayoutConfig::default();
    config.ray.whole_fraction = 0.0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

    let mut config = LayoutConfig::default();
    config.max_radius = -1.0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

    let mut config = LayoutConfig::default();
    config.palette.clear();
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn unknown_fields_are_json_errors() {
    let err = LayoutConfig::from_json_str(r#"{ "radius": 4 }"#).unwrap_err();
    assert!(matches!(err, Error::Json(_)), "got {err:?}");
}

#[test]
fn mode_names_parse() {
    assert_eq!("mandala".parse::<LayoutMode>().unwrap(), LayoutMode::default());
    assert_eq!("tracks".parse::<LayoutMode>().unwrap(), LayoutMode::MultiTrackRay);
    assert_eq!(
        "sequential-index".parse::<LayoutMode>().unwrap(),
        LayoutMode::SequentialRay {
            rays: RayAssignment::NoteIndex
        }
    );
    assert!("spiral".parse::<LayoutMode>().is_err());
}

#[test]
fn window_size_loses_shell_margins() {
    assert_eq!(ViewSize::from_window(800.0, 600.0), ViewSize::new(780.0, 400.0));
    assert_eq!(ViewSize::from_window(10.5, 150.0), ViewSize::new(0.0, 0.0));
    assert_eq!(ViewSize::default(), ViewSize::new(780.0, 400.0));
}

#[test]
fn frames_round_trip_through_json_tracks() {
    let tracks = tracks_from_json(
        r#"[[{"start":0,"end":1,"pitch":60},{"start":1,"end":2,"pitch":62}]]"#,
    )
    .unwrap();
    assert_eq!(tracks[0].len(), 2);

    let frame = project(&tracks, ViewSize::new(400.0, 400.0), &LayoutConfig::default());
    let json = frame_to_json(&frame).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["commands"].as_array().unwrap().len(), frame.len());
    assert_eq!(value["skipped_notes"], 0);
}
