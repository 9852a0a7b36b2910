//! Settings-to-argv compiler and validation engine for the scrcpy front-end
//!
//! - [`config`]: the per-device settings record, presets and the JSON store
//! - [`version`]: tool version parsing and capability flags
//! - [`options`]: declarative option registry and conflict rules
//! - [`validation`]: evaluates an option map into a [`ValidityReport`]
//! - [`command`]: compiles settings into an argument vector and preview string

#![forbid(unsafe_code)]

pub mod command;
pub mod config;
pub mod constants;
pub mod options;
pub mod validation;
pub mod version;

pub use command::{compile, format};
pub use config::{DeviceSettings, Preset, SettingsStore};
pub use validation::{CommandConfiguration, DeviceInfo, ValidityReport, validate};
pub use version::{Capabilities, Capability, Version};
