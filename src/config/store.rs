//! JSON store for device settings, presets and device names
//!
//! Stands in for the front-end's local storage. Records are kept as
//! `(key, record)` pairs and normalized on load, so files written by older
//! versions keep working.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::preset::Preset;
use super::settings::DeviceSettings;

/// On-disk store document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsStore {
    #[serde(default, deserialize_with = "deserialize_device_settings")]
    pub device_settings: Vec<(String, DeviceSettings)>,
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default)]
    pub device_names: Vec<(String, String)>,
}

/// Accepts partial records and fills them from the defaults
fn deserialize_device_settings<'de, D>(deserializer: D) -> Result<Vec<(String, DeviceSettings)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<(String, Value)> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(serial, record)| {
            let settings = DeviceSettings::normalize_value(&record);
            (serial, settings)
        })
        .collect())
}

impl SettingsStore {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::store::APP_DIR);
        path.push(crate::constants::store::FILENAME);
        path
    }

    /// Load the store from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load the store from `path`; a missing file is an empty store
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Store file not found, starting empty");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store from {:?}", path))?;
        let store: SettingsStore = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store JSON from {:?}", path))?;

        info!(
            devices = store.device_settings.len(),
            presets = store.presets.len(),
            "Loaded settings store"
        );
        Ok(store)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize store to JSON")?;
        fs::write(path, json).with_context(|| format!("Failed to write store to {:?}", path))?;

        info!(path = %path.display(), "Saved settings store");
        Ok(())
    }

    pub fn device_name(&self, serial: &str) -> Option<&str> {
        self.device_names
            .iter()
            .find(|(s, _)| s == serial)
            .map(|(_, name)| name.as_str())
    }

    pub fn set_device_name(&mut self, serial: &str, name: &str) {
        match self.device_names.iter_mut().find(|(s, _)| s == serial) {
            Some(entry) => entry.1 = name.to_string(),
            None => self.device_names.push((serial.to_string(), name.to_string())),
        }
    }

    /// Settings for `serial`, or defaults; an unnamed record picks up the stored device name
    pub fn device_settings(&self, serial: &str) -> DeviceSettings {
        let mut settings = self
            .device_settings
            .iter()
            .find(|(s, _)| s == serial)
            .map(|(_, settings)| settings.clone())
            .unwrap_or_default();

        if settings.name.is_empty() {
            if let Some(name) = self.device_name(serial) {
                settings.name = name.to_string();
            }
        }
        settings
    }

    pub fn set_device_settings(&mut self, serial: &str, settings: DeviceSettings) {
        match self.device_settings.iter_mut().find(|(s, _)| s == serial) {
            Some(entry) => entry.1 = settings,
            None => self.device_settings.push((serial.to_string(), settings)),
        }
    }

    /// Save `settings` as a new preset and return its id
    pub fn add_preset(&mut self, name: &str, tags: Vec<String>, settings: &DeviceSettings) -> String {
        let preset = Preset::from_settings(name, settings).with_tags(tags);
        let id = preset.id.clone();
        info!(preset = %name, id = %id, "Created preset");
        self.presets.push(preset);
        id
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Remove a preset by id; returns whether one was removed
    pub fn remove_preset(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.id != id);
        let removed = self.presets.len() != before;
        if !removed {
            warn!(id = %id, "No preset to remove");
        }
        removed
    }

    /// Apply a preset to a device's stored settings and return the result
    pub fn apply_preset(&mut self, serial: &str, id: &str) -> Option<DeviceSettings> {
        let preset = self.preset(id)?.clone();
        let applied = preset.apply_to(&self.device_settings(serial));
        info!(serial = %serial, preset = %preset.name(), "Applied preset to device");
        self.set_device_settings(serial, applied.clone());
        Some(applied)
    }
}
