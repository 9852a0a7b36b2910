//! End-to-end scenarios: stored records through compile, preview and validation

use serde_json::{Value, json};
use std::time::{Duration, Instant};

use scrcpy_launch::config::{DeviceSettings, SettingsStore};
use scrcpy_launch::options::conflicts::CONFLICT_RULES;
use scrcpy_launch::validation::{self, CommandConfiguration, DeviceInfo, ErrorCode, Severity};
use scrcpy_launch::{Capabilities, Version, compile, format};

fn partial(value: Value) -> DeviceSettings {
    DeviceSettings::normalize_value(&value)
}

fn options(pairs: &[(&str, Value)]) -> CommandConfiguration {
    pairs
        .iter()
        .fold(CommandConfiguration::new(), |config, (name, value)| config.with(name, value.clone()))
}

#[test]
fn test_camera_mode_scenario() {
    let settings = partial(json!({
        "videoSource": "camera",
        "displayId": 2,
        "crop": "100:200:0:0",
        "turnScreenOff": true
    }));
    let args = compile("DEV1", &settings);

    assert!(args.contains(&"--video-source=camera".to_string()));
    for suppressed in ["--display-id", "--crop", "--turn-screen-off"] {
        assert!(!args.iter().any(|a| a == suppressed), "{suppressed} should be suppressed");
    }
}

#[test]
fn test_default_omission_scenario() {
    assert_eq!(compile("DEV1", &DeviceSettings::default()), vec!["-s", "DEV1"]);
    assert_eq!(format(&compile("DEV1", &DeviceSettings::default())), "scrcpy -s DEV1");
}

#[test]
fn test_conflict_detection_scenario() {
    let report = validation::validate(
        &options(&[("turn-screen-off", json!(true)), ("show-touches", json!(true))]),
        None,
    );
    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, ErrorCode::OptionConflict);
    assert_eq!(report.warnings[0].severity, Severity::Warning);
}

#[test]
fn test_invalid_value_scenario() {
    let report = validation::validate(&options(&[("max-size", json!(-1))]), None);
    assert!(!report.is_valid);
    assert!(report.errors.iter().any(|e| e.code == ErrorCode::ValueTooLow));
}

#[test]
fn test_api_gate_scenario() {
    let config = options(&[("max-fps", json!(60))]);

    let old = validation::validate(&config, Some(&DeviceInfo { android_version: 28 }));
    assert!(old.errors.iter().any(|e| e.code == ErrorCode::ApiLevelTooLow));

    let current = validation::validate(&config, Some(&DeviceInfo { android_version: 29 }));
    assert!(!current.errors.iter().any(|e| e.code == ErrorCode::ApiLevelTooLow));
}

#[test]
fn test_preview_quotes_window_title() {
    let settings = partial(json!({ "windowTitle": "Living Room TV", "maxSize": 1280 }));
    assert_eq!(
        format(&compile("192.168.1.20:5555", &settings)),
        "scrcpy -s 192.168.1.20:5555 --max-size 1280 --window-title \"Living Room TV\""
    );
}

#[test]
fn test_old_tool_version_restricts_before_compiling() {
    let settings = partial(json!({
        "videoSource": "camera",
        "keyboardMode": "uhid",
        "virtualDisplay": true,
        "audioCodec": "aac"
    }));

    // 2.1 predates camera mirroring, UHID input and virtual displays
    let version = Version::from_version_output("scrcpy 2.1.1 <https://github.com/Genymobile/scrcpy>\n");
    let restricted = Capabilities::resolve(Some(&version)).restrict(&settings);
    let args = compile("DEV1", &restricted);
    assert_eq!(args, vec!["-s", "DEV1", "--audio-codec", "aac"]);

    // Unknown version disables everything gated
    let nothing = Capabilities::resolve(None).restrict(&settings);
    assert_eq!(compile("DEV1", &nothing), vec!["-s", "DEV1"]);
}

#[test]
fn test_stored_record_validates_through_option_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(
        &path,
        serde_json::to_string(&json!({
            "deviceSettings": [
                ["R58M", { "cameraId": "1", "videoSource": "camera", "cameraFacing": "back" }],
                ["PIXEL", { "maxSize": 1080, "showTouches": true }]
            ]
        }))
        .unwrap(),
    )
    .unwrap();

    let store = SettingsStore::load_from(&path).unwrap();

    // An explicit camera id replaces the facing on the command line
    let r58m = store.device_settings("R58M");
    assert_eq!(compile("R58M", &r58m), vec!["-s", "R58M", "--video-source=camera", "--camera-id=1"]);
    let camera = CommandConfiguration::from_settings(&r58m);
    assert!(validation::validate(&camera, None).is_valid);

    // Supplied directly, the same pair is still a blocking conflict
    let report = validation::validate(
        &options(&[("camera-id", json!("1")), ("camera-facing", json!("back"))]),
        None,
    );
    assert!(!report.is_valid);
    assert!(report.errors.iter().any(|e| e.message.contains("camera ID and facing")));

    let pixel = CommandConfiguration::from_settings(&store.device_settings("PIXEL"));
    assert!(validation::validate(&pixel, None).is_valid);
}

#[test]
fn test_preset_applied_through_store_keeps_recording() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut store = SettingsStore::default();
    let mut source = DeviceSettings::default();
    source.max_size = 1024;
    source.fullscreen = true;
    let id = store.add_preset("Couch", vec!["tv".to_string()], &source);

    let mut target = DeviceSettings::default();
    target.recording_enabled = true;
    target.record_file = "/tmp/session.mp4".to_string();
    store.set_device_settings("DEV2", target);
    store.save_to(&path).unwrap();

    let mut store = SettingsStore::load_from(&path).unwrap();
    let applied = store.apply_preset("DEV2", &id).unwrap();
    assert_eq!(
        compile("DEV2", &applied),
        vec!["-s", "DEV2", "--max-size", "1024", "--fullscreen", "--record", "/tmp/session.mp4"]
    );
}

#[test]
fn test_validation_performance() {
    assert!(CONFLICT_RULES.len() >= 15);

    let config = options(&[
        ("max-size", json!(1920)),
        ("video-bit-rate", json!(4_000_000)),
        ("max-fps", json!(60)),
        ("video-codec", json!("h265")),
        ("crop", json!("1080:1920:0:0")),
        ("turn-screen-off", json!(true)),
        ("show-touches", json!(true)),
        ("no-control", json!(true)),
        ("keyboard", json!("uhid")),
        ("tcpip", json!("192.168.1.20:5555")),
    ]);
    let device = DeviceInfo { android_version: 33 };

    // Warm the registry and index
    let _ = validation::validate(&config, Some(&device));

    let start = Instant::now();
    let report = validation::validate(&config, Some(&device));
    let elapsed = start.elapsed();

    assert!(report.is_valid);
    assert!(elapsed < Duration::from_millis(50), "validation took {elapsed:?}");
}
