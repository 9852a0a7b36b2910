//! Named, portable settings presets
//!
//! A preset is a `DeviceSettings` without the session-only recording fields.
//! On disk it is a flat record (`{id, name, tags, favorite, ...fields}`); on
//! load it goes through the same default-fill as device settings, so presets
//! written by older versions gain the fields added since.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::settings::{DeviceSettings, SESSION_FIELDS};

/// Named settings snapshot with presentation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PresetRecord", from = "PresetRecord")]
pub struct Preset {
    pub id: String,
    /// Free-form labels for filtering; not part of the settings
    pub tags: Vec<String>,
    pub favorite: bool,
    // Invariant: session fields hold their defaults
    settings: DeviceSettings,
}

/// Flat storage shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PresetRecord {
    #[serde(default)]
    id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    favorite: bool,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<Preset> for PresetRecord {
    fn from(preset: Preset) -> Self {
        let mut fields = preset.settings.to_fields();
        for key in SESSION_FIELDS {
            fields.remove(key);
        }
        Self {
            id: preset.id,
            tags: preset.tags,
            favorite: preset.favorite,
            fields,
        }
    }
}

impl From<PresetRecord> for Preset {
    fn from(mut record: PresetRecord) -> Self {
        for key in SESSION_FIELDS {
            record.fields.remove(key);
        }
        let id = if record.id.is_empty() {
            new_id()
        } else {
            record.id
        };
        Self {
            id,
            tags: record.tags,
            favorite: record.favorite,
            settings: DeviceSettings::normalize(&record.fields),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Preset {
    /// Snapshot `settings` under `name` with a fresh id
    pub fn from_settings(name: &str, settings: &DeviceSettings) -> Self {
        let mut settings = settings.clone();
        settings.clear_session_fields();
        settings.name = name.to_string();
        Self {
            id: new_id(),
            tags: Vec::new(),
            favorite: false,
            settings,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    /// Full settings record; session-only fields carry schema defaults
    pub fn to_settings(&self) -> DeviceSettings {
        let mut settings = self.settings.clone();
        settings.clear_session_fields();
        settings
    }

    /// Load this preset onto a device's current settings.
    ///
    /// The device keeps its own name and its session-only recording fields.
    pub fn apply_to(&self, current: &DeviceSettings) -> DeviceSettings {
        let mut settings = self.to_settings();
        settings.name = current.name.clone();
        settings.recording_enabled = current.recording_enabled;
        settings.record_file = current.record_file.clone();
        settings.record_format = current.record_format;
        settings
    }
}
