//! Option registry
//!
//! Declarative metadata for every command-line option the validator knows
//! about: value type, category, default, constraints and minimum Android API
//! level. The table lives in [`catalog`]; this module indexes it by canonical
//! name and short alias once per process.

pub mod catalog;
pub mod conflicts;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::validation::ValidationIssue;

pub use conflicts::{ConflictIndex, ConflictRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Boolean,
    String,
    Number,
    Enum,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionCategory {
    Connection,
    Video,
    Audio,
    Camera,
    Control,
    Window,
    Recording,
    Device,
    Otg,
    Misc,
}

/// Registry default, compared against supplied JSON values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionDefault {
    Bool(bool),
    Number(f64),
    Text(&'static str),
}

impl OptionDefault {
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (OptionDefault::Bool(b), Value::Bool(v)) => b == v,
            (OptionDefault::Number(n), Value::Number(v)) => v.as_f64() == Some(*n),
            (OptionDefault::Text(t), Value::String(v)) => t == v,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            OptionDefault::Bool(b) => Value::Bool(*b),
            OptionDefault::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            OptionDefault::Text(t) => Value::String((*t).to_string()),
        }
    }
}

/// Extra check run after the built-in constraints
pub type CustomValidator = fn(option: &str, value: &Value) -> Option<ValidationIssue>;

/// Value constraints for one option
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Regex source, compiled once in [`OptionRegistry::new`]
    pub pattern: Option<&'static str>,
    pub allowed_values: &'static [&'static str],
    pub custom: Option<CustomValidator>,
}

impl ValidationRule {
    pub const NONE: ValidationRule = ValidationRule {
        required: false,
        min: None,
        max: None,
        pattern: None,
        allowed_values: &[],
        custom: None,
    };
}

/// Immutable metadata for one option
#[derive(Debug, Clone, Copy)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub short_name: Option<&'static str>,
    pub option_type: OptionType,
    pub category: OptionCategory,
    pub description: &'static str,
    pub default: Option<OptionDefault>,
    pub validation: ValidationRule,
    pub min_api_level: Option<u32>,
}

impl OptionDescriptor {
    pub const fn new(
        name: &'static str,
        option_type: OptionType,
        category: OptionCategory,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            short_name: None,
            option_type,
            category,
            description,
            default: None,
            validation: ValidationRule::NONE,
            min_api_level: None,
        }
    }

    pub const fn short(mut self, short_name: &'static str) -> Self {
        self.short_name = Some(short_name);
        self
    }

    pub const fn required(mut self) -> Self {
        self.validation.required = true;
        self
    }

    pub const fn default(mut self, default: OptionDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.validation.min = Some(min);
        self
    }

    pub const fn max(mut self, max: f64) -> Self {
        self.validation.max = Some(max);
        self
    }

    pub const fn pattern(mut self, pattern: &'static str) -> Self {
        self.validation.pattern = Some(pattern);
        self
    }

    pub const fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.validation.allowed_values = values;
        self
    }

    pub const fn custom(mut self, validator: CustomValidator) -> Self {
        self.validation.custom = Some(validator);
        self
    }

    pub const fn min_api(mut self, level: u32) -> Self {
        self.min_api_level = Some(level);
        self
    }
}

/// Option table indexed by name and alias
pub struct OptionRegistry {
    options: &'static [OptionDescriptor],
    by_name: HashMap<&'static str, usize>,
    patterns: HashMap<&'static str, Regex>,
}

static REGISTRY: LazyLock<OptionRegistry> = LazyLock::new(|| OptionRegistry::new(catalog::OPTIONS));

/// Process-wide registry built from [`catalog::OPTIONS`]
pub fn registry() -> &'static OptionRegistry {
    &REGISTRY
}

/// Look up an option by canonical name or short alias
pub fn describe(name: &str) -> Option<&'static OptionDescriptor> {
    registry().describe(name)
}

impl OptionRegistry {
    pub fn new(options: &'static [OptionDescriptor]) -> Self {
        let mut by_name = HashMap::with_capacity(options.len() * 2);
        let mut patterns = HashMap::new();

        for (idx, option) in options.iter().enumerate() {
            by_name.entry(option.name).or_insert(idx);
            if let Some(short) = option.short_name {
                by_name.entry(short).or_insert(idx);
            }
            if let Some(source) = option.validation.pattern {
                // Table patterns are literals covered by tests
                let regex = Regex::new(source).expect("option pattern must be a valid regex");
                patterns.insert(option.name, regex);
            }
        }

        debug!(options = options.len(), patterns = patterns.len(), "Built option registry");
        Self {
            options,
            by_name,
            patterns,
        }
    }

    /// Exact match on canonical name or short alias; no fuzzy matching
    pub fn describe(&self, name: &str) -> Option<&'static OptionDescriptor> {
        let options = self.options;
        self.by_name.get(name).map(|&idx| &options[idx])
    }

    pub fn pattern(&self, option: &str) -> Option<&Regex> {
        self.patterns.get(option)
    }

    pub fn options(&self) -> &'static [OptionDescriptor] {
        self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
