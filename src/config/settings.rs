//! Per-device mirroring settings
//!
//! `DeviceSettings` is the flat, always-total record the UI edits and the
//! argument compiler consumes. Stored records may come from an older schema
//! and miss fields; `normalize` fills them from the defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

use crate::constants::defaults;

/// Fields that only make sense for one session and never travel in presets
pub const SESSION_FIELDS: [&str; 3] = ["recordingEnabled", "recordFile", "recordFormat"];

// ==============================================================================
// Enumerated field types
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardMode {
    #[default]
    Default,
    Sdk,
    Uhid,
    Aoa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseMode {
    #[default]
    Default,
    Sdk,
    Uhid,
    Aoa,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamepadMode {
    #[default]
    Disabled,
    Uhid,
    Aoa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    #[default]
    Display,
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    #[default]
    Front,
    Back,
    External,
}

/// Recording container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Mp4,
    Mkv,
}

macro_rules! impl_as_str {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_as_str!(KeyboardMode { Default => "default", Sdk => "sdk", Uhid => "uhid", Aoa => "aoa" });
impl_as_str!(MouseMode { Default => "default", Sdk => "sdk", Uhid => "uhid", Aoa => "aoa", Disabled => "disabled" });
impl_as_str!(GamepadMode { Disabled => "disabled", Uhid => "uhid", Aoa => "aoa" });
impl_as_str!(VideoSource { Display => "display", Camera => "camera" });
impl_as_str!(CameraFacing { Front => "front", Back => "back", External => "external" });
impl_as_str!(RecordFormat { Mp4 => "mp4", Mkv => "mkv" });

// ==============================================================================
// Settings record
// ==============================================================================

/// Complete set of mirroring settings for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSettings {
    // Identity
    pub name: String,

    // Video
    /// Video bit rate in bits per second
    pub bitrate: u32,
    /// Max width/height, 0 = unlimited
    pub max_size: u32,
    /// Frame rate cap, 0 = uncapped
    pub max_fps: u32,
    pub video_codec: String,
    pub video_encoder: String,
    /// Video buffer in ms
    pub video_buffer: u32,

    // Video source
    pub video_source: VideoSource,
    pub camera_facing: CameraFacing,
    /// `WIDTHxHEIGHT`
    pub camera_size: String,
    pub camera_id: String,

    // Audio
    pub audio_forwarding: bool,
    pub audio_bitrate: u32,
    pub audio_codec: String,
    pub microphone_forwarding: bool,
    pub no_audio: bool,

    // Video toggles
    pub no_video: bool,
    pub no_playback: bool,

    // Display
    pub display_id: u32,
    /// Orientation in degrees
    pub rotation: u32,
    /// `width:height:x:y`
    pub crop: String,
    /// -1 = unlocked
    pub lock_video_orientation: i32,
    pub display_buffer: u32,

    // Window
    pub window_x: i32,
    pub window_y: i32,
    pub window_width: u32,
    pub window_height: u32,
    pub always_on_top: bool,
    pub window_borderless: bool,
    pub fullscreen: bool,
    pub window_title: String,

    // Behavior
    pub no_control: bool,
    pub turn_screen_off: bool,
    pub stay_awake: bool,
    pub show_touches: bool,
    pub power_off_on_close: bool,
    pub no_power_on: bool,

    // Recording (session only)
    pub recording_enabled: bool,
    pub record_file: String,
    pub record_format: RecordFormat,

    // Input modes
    pub keyboard_mode: KeyboardMode,
    pub mouse_mode: MouseMode,
    pub gamepad_mode: GamepadMode,

    // V4L2 sink
    pub v4l2_sink: String,
    pub v4l2_buffer: u32,

    // Virtual display
    pub virtual_display: bool,
    /// `WIDTHxHEIGHT`, empty = device default
    pub virtual_display_resolution: String,
    pub virtual_display_dpi: u32,
    pub start_app: String,

    // OTG
    pub otg_mode: bool,

    // Network
    pub no_cleanup: bool,
    pub force_adb_forward: bool,
    /// Seconds, 0 = unlimited
    pub time_limit: u32,

    // Wireless connection
    pub ip_address: String,
    pub port: u16,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            bitrate: defaults::VIDEO_BIT_RATE,
            max_size: 0,
            max_fps: 0,
            video_codec: defaults::VIDEO_CODEC.to_string(),
            video_encoder: String::new(),
            video_buffer: 0,
            video_source: VideoSource::Display,
            camera_facing: CameraFacing::Front,
            camera_size: String::new(),
            camera_id: String::new(),
            audio_forwarding: true,
            audio_bitrate: defaults::AUDIO_BIT_RATE,
            audio_codec: defaults::AUDIO_CODEC.to_string(),
            microphone_forwarding: false,
            no_audio: false,
            no_video: false,
            no_playback: false,
            display_id: 0,
            rotation: 0,
            crop: String::new(),
            lock_video_orientation: defaults::LOCK_VIDEO_ORIENTATION,
            display_buffer: 0,
            window_x: 0,
            window_y: 0,
            window_width: 0,
            window_height: 0,
            always_on_top: false,
            window_borderless: false,
            fullscreen: false,
            window_title: String::new(),
            no_control: false,
            turn_screen_off: false,
            stay_awake: false,
            show_touches: false,
            power_off_on_close: false,
            no_power_on: false,
            recording_enabled: false,
            record_file: String::new(),
            record_format: RecordFormat::Mp4,
            keyboard_mode: KeyboardMode::Default,
            mouse_mode: MouseMode::Default,
            gamepad_mode: GamepadMode::Disabled,
            v4l2_sink: String::new(),
            v4l2_buffer: 0,
            virtual_display: false,
            virtual_display_resolution: String::new(),
            virtual_display_dpi: 0,
            start_app: String::new(),
            otg_mode: false,
            no_cleanup: false,
            force_adb_forward: false,
            time_limit: 0,
            ip_address: String::new(),
            port: defaults::WIRELESS_PORT,
        }
    }
}

/// Default record as a JSON object keyed by storage field names
fn default_fields() -> Map<String, Value> {
    match serde_json::to_value(DeviceSettings::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

impl DeviceSettings {
    /// Storage names of every schema field
    pub fn field_names() -> Vec<String> {
        default_fields().keys().cloned().collect()
    }

    /// Fill a partial (possibly older-schema) record from the defaults.
    ///
    /// Shallow merge: each known field present in `partial` replaces the
    /// default. Unknown keys are ignored; values of the wrong type are
    /// dropped with a warning and the default is kept.
    pub fn normalize(partial: &Map<String, Value>) -> Self {
        let mut merged = default_fields();
        let known: Vec<(&String, &Value)> = partial
            .iter()
            .filter(|(key, _)| {
                let is_known = merged.contains_key(key.as_str());
                if !is_known {
                    debug!(field = %key, "Ignoring unknown settings field");
                }
                is_known
            })
            .collect();

        let mut fast = merged.clone();
        for (key, value) in &known {
            fast.insert((*key).clone(), (*value).clone());
        }
        if let Ok(settings) = serde_json::from_value::<DeviceSettings>(Value::Object(fast)) {
            return settings;
        }

        // Some value doesn't fit its field: merge one field at a time
        for (key, value) in known {
            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            match serde_json::from_value::<DeviceSettings>(Value::Object(candidate)) {
                Ok(_) => {
                    merged.insert(key.clone(), value.clone());
                }
                Err(e) => {
                    warn!(field = %key, value = %value, error = %e, "Dropping invalid settings value, using default");
                }
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or_default()
    }

    /// Normalize any JSON value; non-objects yield the defaults
    pub fn normalize_value(raw: &Value) -> Self {
        match raw {
            Value::Object(map) => Self::normalize(map),
            other => {
                warn!(value = %other, "Settings record is not an object, using defaults");
                Self::default()
            }
        }
    }

    /// Settings as a JSON object keyed by storage field names
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Reset the session-only recording fields to their defaults
    pub fn clear_session_fields(&mut self) {
        let defaults = DeviceSettings::default();
        self.recording_enabled = defaults.recording_enabled;
        self.record_file = defaults.record_file;
        self.record_format = defaults.record_format;
    }

    /// `ip:port` device id for wireless connections, if an address is set
    pub fn wireless_serial(&self) -> Option<String> {
        let ip = self.ip_address.trim();
        if ip.is_empty() {
            None
        } else {
            Some(format!("{}:{}", ip, self.port))
        }
    }
}
