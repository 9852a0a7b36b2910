//! Application-wide constants
//!
//! This module contains the magic numbers and string literals shared between
//! the settings schema, the argument compiler and the validation engine,
//! providing a single source of truth for constant values.

/// Mirroring tool invocation constants
pub mod tool {
    /// Program name prefixed to the preview string
    pub const PROGRAM: &str = "scrcpy";

    /// Device selector flag (always the first argument)
    pub const SERIAL_FLAG: &str = "-s";

    /// Standalone OTG flag
    pub const OTG_FLAG: &str = "--otg";
}

/// Minimum tool versions (major, minor) at which features appeared
pub mod thresholds {
    /// Audio forwarding
    pub const AUDIO: (u32, u32) = (2, 0);

    /// Audio-only mode (`--no-video`)
    pub const NO_VIDEO: (u32, u32) = (2, 1);

    /// Camera mirroring (`--video-source=camera`)
    pub const CAMERA: (u32, u32) = (2, 2);

    /// UHID/AOA keyboard and mouse emulation
    pub const UHID_INPUT: (u32, u32) = (2, 4);

    /// Gamepad forwarding
    pub const GAMEPAD: (u32, u32) = (2, 7);

    /// Virtual display (`--new-display`)
    pub const VIRTUAL_DISPLAY: (u32, u32) = (3, 0);
}

/// Schema default values referenced outside the settings record
pub mod defaults {
    /// Video bit rate in bits per second
    pub const VIDEO_BIT_RATE: u32 = 8_000_000;

    /// Audio bit rate in bits per second
    pub const AUDIO_BIT_RATE: u32 = 128_000;

    pub const VIDEO_CODEC: &str = "h264";

    pub const AUDIO_CODEC: &str = "opus";

    /// `-1` means the capture orientation is not locked
    pub const LOCK_VIDEO_ORIENTATION: i32 = -1;

    /// ADB wireless port
    pub const WIRELESS_PORT: u16 = 5555;
}

/// Store file location
pub mod store {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "scrcpy-launch";

    /// Store filename
    pub const FILENAME: &str = "store.json";
}

/// Recording containers the tool can write, by file extension
pub const RECORD_EXTENSIONS: &[&str] = &["mp4", "mkv", "m4a", "mka", "opus", "aac", "flac", "wav"];
