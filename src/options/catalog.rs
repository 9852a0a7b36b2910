//! Option metadata table

use serde_json::Value;

use super::OptionCategory::*;
use super::OptionDefault::{Number, Text};
use super::OptionType::{Boolean, Enum, Number as Num, String as Str};
use super::{OptionDescriptor as Opt, OptionDescriptor};
use crate::constants::RECORD_EXTENSIONS;
use crate::validation::{ErrorCode, ValidationIssue};

const IPV4_ENDPOINT: &str =
    r"^(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(:\d{1,5})?(\+\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})?$";

/// Recording path must end in a container extension the tool can write
fn record_extension(option: &str, value: &Value) -> Option<ValidationIssue> {
    let path = value.as_str()?;
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.contains(['/', '\\']));
    match ext {
        Some(ext) if RECORD_EXTENSIONS.contains(&ext.as_str()) => None,
        _ => Some(ValidationIssue::error(
            option,
            ErrorCode::InvalidFormat,
            format!("Recording file must end in one of: {}", RECORD_EXTENSIONS.join(", ")),
        )),
    }
}

/// Orientation is given in quarter turns
fn quarter_turn(option: &str, value: &Value) -> Option<ValidationIssue> {
    let degrees = value.as_f64()?;
    if degrees % 90.0 == 0.0 {
        None
    } else {
        Some(ValidationIssue::error(option, ErrorCode::InvalidEnumValue, "Must be one of: 0, 90, 180, 270"))
    }
}

pub static OPTIONS: &[OptionDescriptor] = &[
    // Connection & device selection
    Opt::new("select-usb", Boolean, Connection, "Use USB device (if exactly one connected)").short("d"),
    Opt::new("select-tcpip", Boolean, Connection, "Use TCP/IP device (if exactly one connected)").short("e"),
    Opt::new("serial", Str, Connection, "Device serial number (mandatory if multiple devices)").short("s"),
    Opt::new("tcpip", Str, Connection, "Configure TCP/IP connection").pattern(IPV4_ENDPOINT),
    Opt::new("force-adb-forward", Boolean, Connection, "Force ADB forwarding"),
    Opt::new("no-cleanup", Boolean, Connection, "Leave the server and reverse tunnel on the device on exit"),
    Opt::new("time-limit", Num, Connection, "Stop mirroring after this many seconds").min(0.0).default(Number(0.0)),
    Opt::new("otg", Boolean, Connection, "Enable OTG mode"),
    // Video
    Opt::new("max-size", Num, Video, "Max width/height (0 = unlimited)").short("m").min(0.0).default(Number(0.0)),
    Opt::new("video-bit-rate", Num, Video, "Bit rate (supports K/M suffixes)")
        .short("b")
        .min(1.0)
        .default(Number(8_000_000.0)),
    Opt::new("max-fps", Num, Video, "Frame rate limit").min(1.0).min_api(29),
    Opt::new("video-codec", Enum, Video, "Video codec")
        .allowed(&["h264", "h265", "av1"])
        .default(Text("h264")),
    Opt::new("video-encoder", Str, Video, "Use a specific MediaCodec encoder"),
    Opt::new("video-buffer", Num, Video, "Video buffering delay in ms").min(0.0).default(Number(0.0)),
    Opt::new("crop", Str, Video, "Crop video (width:height:x:y)").pattern(r"^\d+:\d+:\d+:\d+$"),
    Opt::new("no-video", Boolean, Video, "Disable video"),
    Opt::new("no-playback", Boolean, Video, "Disable video and audio playback on the computer"),
    Opt::new("video-source", Enum, Video, "Video source")
        .allowed(&["display", "camera"])
        .default(Text("display")),
    Opt::new("display-id", Num, Video, "Display ID to mirror").min(0.0).default(Number(0.0)),
    Opt::new("orientation", Num, Video, "Display orientation in degrees")
        .min(0.0)
        .max(270.0)
        .custom(quarter_turn)
        .default(Number(0.0)),
    Opt::new("lock-video-orientation", Num, Video, "Lock capture orientation (0-3)").min(0.0).max(3.0),
    Opt::new("display-buffer", Num, Video, "Display buffering delay in ms").min(0.0).default(Number(0.0)),
    Opt::new("v4l2-sink", Str, Video, "Output to a V4L2 loopback device").pattern(r"^/dev/video\d+$"),
    Opt::new("v4l2-buffer", Num, Video, "V4L2 buffering delay in ms").min(0.0).default(Number(0.0)),
    // Audio
    Opt::new("audio-bit-rate", Num, Audio, "Audio bit rate").min(1.0).default(Number(128_000.0)),
    Opt::new("audio-codec", Enum, Audio, "Audio codec")
        .allowed(&["opus", "aac", "flac", "raw"])
        .default(Text("opus")),
    Opt::new("audio-source", Enum, Audio, "Audio source")
        .allowed(&["output", "mic", "playback"])
        .default(Text("output")),
    Opt::new("no-audio", Boolean, Audio, "Disable audio"),
    Opt::new("require-audio", Boolean, Audio, "Require audio"),
    // Control
    Opt::new("no-control", Boolean, Control, "Disable device control"),
    Opt::new("show-touches", Boolean, Control, "Show touches on device"),
    Opt::new("keyboard", Enum, Control, "Keyboard input mode")
        .allowed(&["disabled", "sdk", "uhid", "aoa"])
        .default(Text("sdk")),
    Opt::new("mouse", Enum, Control, "Mouse input mode")
        .allowed(&["disabled", "sdk", "uhid", "aoa"])
        .default(Text("sdk")),
    Opt::new("gamepad", Enum, Control, "Gamepad input mode")
        .allowed(&["disabled", "uhid", "aoa"])
        .default(Text("disabled")),
    Opt::new("raw-key-events", Boolean, Control, "Send raw key events"),
    Opt::new("prefer-text", Boolean, Control, "Prefer text input"),
    Opt::new("start-app", Str, Control, "Start an Android app by package name"),
    // Camera
    Opt::new("camera-id", Str, Camera, "Camera ID to use"),
    Opt::new("camera-facing", Enum, Camera, "Camera facing direction").allowed(&["front", "back", "external"]),
    Opt::new("camera-size", Str, Camera, "Camera resolution (e.g., 1920x1080)").pattern(r"^\d+x\d+$"),
    Opt::new("camera-ar", Str, Camera, "Camera aspect ratio (e.g., 16:9)").pattern(r"^\d+:\d+$"),
    // Device behavior
    Opt::new("stay-awake", Boolean, Device, "Keep device awake while plugged in").short("w"),
    Opt::new("turn-screen-off", Boolean, Device, "Turn screen off immediately").short("S"),
    Opt::new("power-off-on-close", Boolean, Device, "Turn the device screen off when closing"),
    Opt::new("no-power-on", Boolean, Device, "Do not power on the device on start"),
    // Window
    Opt::new("fullscreen", Boolean, Window, "Start in fullscreen").short("f"),
    Opt::new("always-on-top", Boolean, Window, "Keep the window above others"),
    Opt::new("window-borderless", Boolean, Window, "Disable window decorations"),
    Opt::new("window-title", Str, Window, "Set a custom window title"),
    Opt::new("window-x", Num, Window, "Initial window horizontal position").default(Number(0.0)),
    Opt::new("window-y", Num, Window, "Initial window vertical position").default(Number(0.0)),
    Opt::new("window-width", Num, Window, "Initial window width").min(0.0).default(Number(0.0)),
    Opt::new("window-height", Num, Window, "Initial window height").min(0.0).default(Number(0.0)),
    Opt::new("new-display", Boolean, Window, "Create new display"),
    // Recording
    Opt::new("record", Str, Recording, "Record to file").short("r").custom(record_extension),
    Opt::new("record-format", Enum, Recording, "Force recording container")
        .allowed(RECORD_EXTENSIONS),
];
