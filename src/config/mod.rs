//! Settings schema and persistence for scrcpy-launch
//!
//! This module provides:
//! - **settings**: the total `DeviceSettings` record, its defaults and normalization
//! - **preset**: portable presets without the session-only recording fields
//! - **store**: JSON persistence of device settings, presets and device names

pub mod preset;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use preset::Preset;
pub use settings::{
    CameraFacing, DeviceSettings, GamepadMode, KeyboardMode, MouseMode, RecordFormat, VideoSource,
    SESSION_FIELDS,
};
pub use store::SettingsStore;
