//! Validation engine
//!
//! Evaluates the options a caller supplied against the option registry and
//! the conflict rules. Everything is returned as data in a [`ValidityReport`];
//! nothing here fails or panics on user input.

mod report;
mod settings;

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::trace;

use crate::options::{self, ConflictIndex, OptionDescriptor, OptionRegistry, OptionType};
use crate::options::conflicts;

pub use report::{
    CommandConfiguration, DeviceInfo, ErrorCode, OptionState, Severity, ValidationIssue, ValidityReport,
};

/// Registry and conflict index to validate against
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a OptionRegistry,
    conflicts: &'a ConflictIndex,
}

impl Validator<'static> {
    /// Validator over the built-in tables
    pub fn standard() -> Self {
        Self {
            registry: options::registry(),
            conflicts: conflicts::conflict_index(),
        }
    }
}

/// Validate `config` against the built-in tables
pub fn validate(config: &CommandConfiguration, device: Option<&DeviceInfo>) -> ValidityReport {
    Validator::standard().validate(config, device)
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a OptionRegistry, conflicts: &'a ConflictIndex) -> Self {
        Self { registry, conflicts }
    }

    /// Check every supplied option, then every conflict rule touching them.
    ///
    /// Only error-severity findings make the report invalid.
    pub fn validate(&self, config: &CommandConfiguration, device: Option<&DeviceInfo>) -> ValidityReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut option_states = BTreeMap::new();

        for (name, value) in &config.options {
            let state = self.validate_option(name, value, device);
            if let Some(error) = &state.error {
                errors.push(error.clone());
            }
            option_states.insert(name.clone(), state);
        }

        for conflict in self.check_conflicts(config) {
            if let Some(state) = option_states.get_mut(&conflict.option) {
                match conflict.severity {
                    Severity::Error => {
                        state.is_valid = false;
                        state.error.get_or_insert_with(|| conflict.clone());
                    }
                    Severity::Warning => {
                        state.warning.get_or_insert_with(|| conflict.clone());
                    }
                }
            }
            match conflict.severity {
                Severity::Error => errors.push(conflict),
                Severity::Warning => warnings.push(conflict),
            }
        }

        trace!(
            options = config.options.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "Validated configuration"
        );

        ValidityReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            option_states,
        }
    }

    /// Validate one option value; stops at the first failure
    pub fn validate_option(&self, name: &str, value: &Value, device: Option<&DeviceInfo>) -> OptionState {
        let Some(option) = self.registry.describe(name) else {
            return OptionState::invalid(ValidationIssue::error(
                name,
                ErrorCode::UnknownOption,
                format!("Unknown option: {name}"),
            ));
        };

        if let (Some(min_api), Some(device)) = (option.min_api_level, device) {
            if device.android_version < min_api {
                return OptionState::invalid(ValidationIssue::error(
                    name,
                    ErrorCode::ApiLevelTooLow,
                    format!("Requires Android API {min_api}+ (current: {})", device.android_version),
                ));
            }
        }

        let rule = &option.validation;
        let is_empty = matches!(value, Value::Null) || value.as_str() == Some("");
        if rule.required && is_empty {
            return OptionState::invalid(ValidationIssue::error(
                name,
                ErrorCode::RequiredOptionMissing,
                "This option is required",
            ));
        }

        if value.is_null() {
            return OptionState::valid();
        }

        if let Some(issue) = self.check_type(name, option, value) {
            return OptionState::invalid(issue);
        }

        if let Some(custom) = rule.custom {
            if let Some(issue) = custom(name, value) {
                return OptionState::invalid(issue);
            }
        }

        OptionState::valid()
    }

    fn check_type(&self, name: &str, option: &OptionDescriptor, value: &Value) -> Option<ValidationIssue> {
        let rule = &option.validation;
        match option.option_type {
            OptionType::Number => {
                let Some(number) = value.as_f64() else {
                    return Some(ValidationIssue::error(name, ErrorCode::InvalidNumber, "Must be a valid number"));
                };
                if let Some(min) = rule.min {
                    if number < min {
                        return Some(ValidationIssue::error(
                            name,
                            ErrorCode::ValueTooLow,
                            format!("Must be at least {min}"),
                        ));
                    }
                }
                if let Some(max) = rule.max {
                    if number > max {
                        return Some(ValidationIssue::error(
                            name,
                            ErrorCode::ValueTooHigh,
                            format!("Must be at most {max}"),
                        ));
                    }
                }
                None
            }
            OptionType::String => {
                let Some(text) = value.as_str() else {
                    return Some(ValidationIssue::error(name, ErrorCode::InvalidString, "Must be a string"));
                };
                match self.registry.pattern(option.name) {
                    Some(pattern) if !pattern.is_match(text) => {
                        Some(ValidationIssue::error(name, ErrorCode::InvalidFormat, "Invalid format"))
                    }
                    _ => None,
                }
            }
            OptionType::Enum => {
                let allowed = rule.allowed_values;
                let in_set = value.as_str().is_some_and(|text| allowed.contains(&text));
                if allowed.is_empty() || in_set {
                    None
                } else {
                    Some(ValidationIssue::error(
                        name,
                        ErrorCode::InvalidEnumValue,
                        format!("Must be one of: {}", allowed.join(", ")),
                    ))
                }
            }
            OptionType::Boolean | OptionType::Array => None,
        }
    }

    /// Whether a supplied option counts towards a conflict
    fn is_active(&self, name: &str, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return false;
        };
        let Some(option) = self.registry.describe(name) else {
            // Unregistered members count whenever present
            return true;
        };
        if option.default.is_some_and(|default| default.matches(value)) {
            return false;
        }
        match option.option_type {
            OptionType::Boolean => value.as_bool() == Some(true),
            OptionType::String => value.as_str() != Some(""),
            _ => true,
        }
    }

    /// Conflict findings for the supplied options, one per firing rule.
    ///
    /// Short aliases match the rules of their long option; a finding names
    /// the key as supplied.
    pub fn check_conflicts(&self, config: &CommandConfiguration) -> Vec<ValidationIssue> {
        let canonical = |key: &str| self.registry.describe(key).map(|option| option.name);

        let mut supplied: HashMap<&str, (&str, &Value)> = HashMap::new();
        for (key, value) in &config.options {
            let name = canonical(key.as_str()).unwrap_or(key.as_str());
            supplied.entry(name).or_insert((key.as_str(), value));
        }

        let mut findings = Vec::new();
        let mut processed: HashSet<usize> = HashSet::new();

        for key in config.options.keys() {
            let name = canonical(key.as_str()).unwrap_or(key.as_str());
            for (rule_id, rule) in self.conflicts.rules_for(name) {
                if !processed.insert(rule_id) {
                    continue;
                }

                let mut active = rule.options.iter().filter_map(|member| {
                    let &(supplied_key, value) = supplied.get(member)?;
                    self.is_active(member, Some(value)).then_some(supplied_key)
                });
                let (Some(first), Some(_)) = (active.next(), active.next()) else {
                    continue;
                };
                findings.push(ValidationIssue::conflict(first, rule.reason, rule.severity));
            }
        }

        findings
    }
}
