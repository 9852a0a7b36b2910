//! Tool version parsing and capability gating
//!
//! Versions that cannot be parsed collapse to `0.0.0`, which disables every
//! gated capability instead of failing configuration load.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info};

use crate::config::{DeviceSettings, GamepadMode, KeyboardMode, MouseMode, VideoSource};
use crate::constants::thresholds;

/// Parsed tool version. Ordering and equality ignore `raw`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub raw: String,
}

/// Leading decimal digits of a component, or 0
fn parse_component(part: Option<&str>) -> u32 {
    let Some(part) = part else {
        return 0;
    };
    let digits: &str = {
        let trimmed = part.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().unwrap_or(0)
}

impl Version {
    /// Parse `"3.3.4"` style text. Missing or non-numeric components become 0.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split('.');
        let major = parse_component(parts.next());
        let minor = parse_component(parts.next());
        let patch = parse_component(parts.next());
        Self {
            major,
            minor,
            patch,
            raw: text.to_string(),
        }
    }

    /// Extract the version from the tool's `--version` banner
    /// (`"scrcpy 3.3.4 <https://github.com/Genymobile/scrcpy>"`).
    pub fn from_version_output(output: &str) -> Self {
        let first_line = output
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("");

        match first_line.split_whitespace().nth(1) {
            Some(token) => Self::parse(token),
            None => {
                debug!(banner = %first_line, "No version token in tool output, using 0.0.0");
                Self::parse("")
            }
        }
    }

    pub fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    /// `major.minor >= threshold`; patch is ignored since features land on minor releases
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }

    pub fn supports(&self, capability: Capability) -> bool {
        let (major, minor) = capability.threshold();
        self.at_least(major, minor)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        } else {
            f.write_str(&self.raw)
        }
    }
}

/// Version-gated features of the mirroring tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Audio,
    NoVideo,
    Camera,
    UhidInput,
    Gamepad,
    VirtualDisplay,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::Audio,
        Capability::NoVideo,
        Capability::Camera,
        Capability::UhidInput,
        Capability::Gamepad,
        Capability::VirtualDisplay,
    ];

    pub fn threshold(self) -> (u32, u32) {
        match self {
            Capability::Audio => thresholds::AUDIO,
            Capability::NoVideo => thresholds::NO_VIDEO,
            Capability::Camera => thresholds::CAMERA,
            Capability::UhidInput => thresholds::UHID_INPUT,
            Capability::Gamepad => thresholds::GAMEPAD,
            Capability::VirtualDisplay => thresholds::VIRTUAL_DISPLAY,
        }
    }
}

/// Capability flags resolved once from the installed tool version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_audio: bool,
    pub can_no_video: bool,
    pub can_camera: bool,
    pub can_uhid_input: bool,
    pub can_gamepad: bool,
    pub can_virtual_display: bool,
}

impl Capabilities {
    /// Flags for a detected version; no version means nothing is available
    pub fn resolve(version: Option<&Version>) -> Self {
        let Some(v) = version else {
            return Self::default();
        };
        Self {
            can_audio: v.supports(Capability::Audio),
            can_no_video: v.supports(Capability::NoVideo),
            can_camera: v.supports(Capability::Camera),
            can_uhid_input: v.supports(Capability::UhidInput),
            can_gamepad: v.supports(Capability::Gamepad),
            can_virtual_display: v.supports(Capability::VirtualDisplay),
        }
    }

    /// Every capability enabled (used when the tool version is not known to the caller)
    pub fn all() -> Self {
        Self {
            can_audio: true,
            can_no_video: true,
            can_camera: true,
            can_uhid_input: true,
            can_gamepad: true,
            can_virtual_display: true,
        }
    }

    /// Copy of `settings` with fields the installed tool cannot honour reset to defaults
    pub fn restrict(&self, settings: &DeviceSettings) -> DeviceSettings {
        let defaults = DeviceSettings::default();
        let mut out = settings.clone();
        let mut reset: Vec<&'static str> = Vec::new();

        if !self.can_audio {
            if out.audio_bitrate != defaults.audio_bitrate
                || out.audio_codec != defaults.audio_codec
                || out.microphone_forwarding
            {
                reset.push("audio");
            }
            out.audio_bitrate = defaults.audio_bitrate;
            out.audio_codec = defaults.audio_codec.clone();
            out.microphone_forwarding = false;
            // Pre-2.0 builds have no audio and no --no-audio flag either
            out.audio_forwarding = defaults.audio_forwarding;
            out.no_audio = false;
        }
        if !self.can_no_video && out.no_video {
            reset.push("noVideo");
            out.no_video = false;
        }
        if !self.can_camera && out.video_source == VideoSource::Camera {
            reset.push("videoSource");
            out.video_source = VideoSource::Display;
        }
        if !self.can_uhid_input {
            if matches!(out.keyboard_mode, KeyboardMode::Uhid | KeyboardMode::Aoa) {
                reset.push("keyboardMode");
                out.keyboard_mode = KeyboardMode::Default;
            }
            if matches!(out.mouse_mode, MouseMode::Uhid | MouseMode::Aoa) {
                reset.push("mouseMode");
                out.mouse_mode = MouseMode::Default;
            }
        }
        if !self.can_gamepad && out.gamepad_mode != GamepadMode::Disabled {
            reset.push("gamepadMode");
            out.gamepad_mode = GamepadMode::Disabled;
        }
        if !self.can_virtual_display && out.virtual_display {
            reset.push("virtualDisplay");
            out.virtual_display = false;
        }

        if !reset.is_empty() {
            info!(fields = ?reset, "Reset settings unsupported by installed tool version");
        }
        out
    }
}
