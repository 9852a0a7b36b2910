//! Property-based tests for normalization, presets, compilation and validation

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use scrcpy_launch::config::{
    CameraFacing, DeviceSettings, GamepadMode, KeyboardMode, MouseMode, Preset, RecordFormat, VideoSource,
};
use scrcpy_launch::validation::{self, CommandConfiguration};
use scrcpy_launch::{Capability, Version, compile};

// Strategy for video and audio fields
fn media_fields() -> impl Strategy<Value = (u32, u32, u32, &'static str, bool, bool, bool, u32, &'static str)> {
    (
        any::<u32>(),
        0u32..4096,
        0u32..240,
        prop::sample::select(vec!["h264", "h265", "av1"]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec![64_000u32, 128_000, 256_000]),
        prop::sample::select(vec!["opus", "aac", "flac", "raw"]),
    )
}

// Strategy for display and window fields
fn display_fields() -> impl Strategy<Value = (u32, u32, String, i32, i32, i32, u32, bool, bool, String)> {
    (
        0u32..4,
        prop::sample::select(vec![0u32, 90, 180, 270]),
        "([0-9]{1,4}:[0-9]{1,4}:[0-9]{1,3}:[0-9]{1,3})?",
        -1i32..4,
        any::<i32>(),
        any::<i32>(),
        0u32..2000,
        any::<bool>(),
        any::<bool>(),
        "[A-Za-z ]{0,12}",
    )
}

// Strategy for behavior, mode and session fields
fn mode_fields() -> impl Strategy<
    Value = (
        (bool, bool, bool, bool, bool, bool),
        (VideoSource, CameraFacing, String),
        (KeyboardMode, MouseMode, GamepadMode),
        (bool, String, RecordFormat),
        (bool, String, u32, bool),
    ),
> {
    (
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        ),
        (
            prop::sample::select(vec![VideoSource::Display, VideoSource::Camera]),
            prop::sample::select(vec![CameraFacing::Front, CameraFacing::Back, CameraFacing::External]),
            "([0-9]{3,4}x[0-9]{3,4})?",
        ),
        (
            prop::sample::select(vec![KeyboardMode::Default, KeyboardMode::Sdk, KeyboardMode::Uhid, KeyboardMode::Aoa]),
            prop::sample::select(vec![MouseMode::Default, MouseMode::Uhid, MouseMode::Disabled]),
            prop::sample::select(vec![GamepadMode::Disabled, GamepadMode::Uhid, GamepadMode::Aoa]),
        ),
        (
            any::<bool>(),
            "(/tmp/[a-z]{1,8}(\\.mp4|\\.mkv|\\.MKV)?)?",
            prop::sample::select(vec![RecordFormat::Mp4, RecordFormat::Mkv]),
        ),
        (any::<bool>(), "([0-9]{3,4}x[0-9]{3,4})?", 0u32..640, any::<bool>()),
    )
}

fn arb_settings() -> impl Strategy<Value = DeviceSettings> {
    (media_fields(), display_fields(), mode_fields(), "[A-Za-z0-9 ]{0,10}").prop_map(|(media, display, modes, name)| {
        let mut s = DeviceSettings::default();
        s.name = name;
        (
            s.bitrate,
            s.max_size,
            s.max_fps,
            s.video_codec,
            s.no_video,
            s.audio_forwarding,
            s.microphone_forwarding,
            s.audio_bitrate,
            s.audio_codec,
        ) = (
            media.0,
            media.1,
            media.2,
            media.3.to_string(),
            media.4,
            media.5,
            media.6,
            media.7,
            media.8.to_string(),
        );
        (
            s.display_id,
            s.rotation,
            s.crop,
            s.lock_video_orientation,
            s.window_x,
            s.window_y,
            s.window_width,
            s.always_on_top,
            s.fullscreen,
            s.window_title,
        ) = display;
        let (behavior, source, input, recording, virtual_display) = modes;
        (s.no_control, s.turn_screen_off, s.stay_awake, s.show_touches, s.power_off_on_close, s.no_power_on) =
            behavior;
        (s.video_source, s.camera_facing, s.camera_size) = source;
        (s.keyboard_mode, s.mouse_mode, s.gamepad_mode) = input;
        (s.recording_enabled, s.record_file, s.record_format) = recording;
        (s.virtual_display, s.virtual_display_resolution, s.virtual_display_dpi, s.otg_mode) = virtual_display;
        s
    })
}

/// Subset of the record's fields selected by the bits of `mask`
fn partial_record(settings: &DeviceSettings, mask: u64) -> Map<String, Value> {
    settings
        .to_fields()
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| mask & (1 << (idx % 64)) != 0)
        .map(|(_, entry)| entry)
        .collect()
}

fn arb_version() -> impl Strategy<Value = Version> {
    (0u32..5, 0u32..10, 0u32..10).prop_map(|(major, minor, patch)| Version::parse(&format!("{major}.{minor}.{patch}")))
}

// Option values that exercise both active and inactive conflict members
fn arb_option_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!(true)),
        Just(json!(false)),
        Just(json!("")),
        Just(json!("camera")),
        Just(json!("display")),
        Just(json!(0)),
        Just(json!(2)),
        Just(json!(null)),
    ]
}

fn conflict_member() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "turn-screen-off",
        "show-touches",
        "no-control",
        "keyboard",
        "video-source",
        "display-id",
        "camera-id",
        "camera-facing",
        "otg",
        "tcpip",
        "new-display",
        "crop",
        "no-audio",
        "require-audio",
    ])
}

proptest! {
    /// Property: normalize fills every field and keeps every supplied one
    #[test]
    fn prop_normalization_totality(settings in arb_settings(), mask in any::<u64>()) {
        let partial = partial_record(&settings, mask);
        let normalized = DeviceSettings::normalize(&partial).to_fields();

        prop_assert_eq!(normalized.len(), DeviceSettings::field_names().len());
        for (key, value) in &partial {
            prop_assert_eq!(normalized.get(key), Some(value), "field {} changed", key);
        }
    }

    /// Property: normalizing twice changes nothing
    #[test]
    fn prop_normalization_idempotent(settings in arb_settings(), mask in any::<u64>()) {
        let once = DeviceSettings::normalize(&partial_record(&settings, mask));
        let twice = DeviceSettings::normalize(&once.to_fields());
        prop_assert_eq!(once, twice);
    }

    /// Property: a preset restores everything but the session fields
    #[test]
    fn prop_preset_round_trip(settings in arb_settings()) {
        let preset = Preset::from_settings(&settings.name, &settings);
        let stored = serde_json::to_value(&preset).unwrap();
        let loaded: Preset = serde_json::from_value(stored).unwrap();

        let mut expected = settings.clone();
        expected.clear_session_fields();
        prop_assert_eq!(loaded.to_settings(), expected);
        prop_assert_eq!(&loaded.id, &preset.id);
    }

    /// Property: OTG mode always compiles to selector, id and the OTG flag
    #[test]
    fn prop_otg_exclusivity(mut settings in arb_settings(), id in "[A-Za-z0-9]{1,16}") {
        settings.otg_mode = true;
        let args = compile(&id, &settings);
        prop_assert_eq!(args, vec!["-s".to_string(), id, "--otg".to_string()]);
    }

    /// Property: the vector always starts with the device selector and id
    #[test]
    fn prop_identity_first(settings in arb_settings(), id in "[A-Za-z0-9:.]{1,21}") {
        let args = compile(&id, &settings);
        prop_assert!(args.len() >= 2);
        prop_assert_eq!(&args[0], "-s");
        prop_assert_eq!(&args[1], &id);
    }

    /// Property: record-format never appears before its record path
    #[test]
    fn prop_record_format_follows_record(settings in arb_settings()) {
        let args = compile("X", &settings);
        if let Some(format_at) = args.iter().position(|a| a == "--record-format") {
            let record_at = args.iter().position(|a| a == "--record");
            prop_assert_eq!(record_at.map(|at| at + 2), Some(format_at));
        }
    }

    /// Property: a capability available at v1 is available at every later version
    #[test]
    fn prop_capability_monotonic(a in arb_version(), b in arb_version()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        for capability in Capability::ALL {
            if low.supports(capability) {
                prop_assert!(high.supports(capability), "{:?} lost between {} and {}", capability, low, high);
            }
        }
    }

    /// Property: conflict detection does not depend on insertion order
    #[test]
    fn prop_conflict_symmetry(
        first in conflict_member(),
        second in conflict_member(),
        a in arb_option_value(),
        b in arb_option_value(),
    ) {
        prop_assume!(first != second);
        let mut forward = CommandConfiguration::new();
        forward.set(first, a.clone());
        forward.set(second, b.clone());

        let mut backward = CommandConfiguration::new();
        backward.set(second, b);
        backward.set(first, a);

        let forward = validation::validate(&forward, None);
        let backward = validation::validate(&backward, None);
        prop_assert_eq!(&forward.warnings, &backward.warnings);
        prop_assert_eq!(&forward.errors, &backward.errors);
        prop_assert_eq!(forward.is_valid, backward.is_valid);
    }

    /// Property: validation is total over arbitrary option maps
    #[test]
    fn prop_validation_never_panics(
        entries in prop::collection::vec(("[a-z-]{1,16}", arb_option_value()), 0..12),
    ) {
        let mut config = CommandConfiguration::new();
        for (name, value) in entries {
            config.set(&name, value);
        }
        let report = validation::validate(&config, None);
        prop_assert_eq!(report.is_valid, report.errors.is_empty());
    }
}
