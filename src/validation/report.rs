//! Validation inputs and results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Whether a finding blocks launching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownOption,
    RequiredOptionMissing,
    InvalidNumber,
    InvalidString,
    InvalidFormat,
    InvalidEnumValue,
    ValueTooLow,
    ValueTooHigh,
    ApiLevelTooLow,
    OptionConflict,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownOption => "UNKNOWN_OPTION",
            ErrorCode::RequiredOptionMissing => "REQUIRED_OPTION_MISSING",
            ErrorCode::InvalidNumber => "INVALID_NUMBER",
            ErrorCode::InvalidString => "INVALID_STRING",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidEnumValue => "INVALID_ENUM_VALUE",
            ErrorCode::ValueTooLow => "VALUE_TOO_LOW",
            ErrorCode::ValueTooHigh => "VALUE_TOO_HIGH",
            ErrorCode::ApiLevelTooLow => "API_LEVEL_TOO_LOW",
            ErrorCode::OptionConflict => "OPTION_CONFLICT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding, attributed to an option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub option: String,
    pub message: String,
    pub code: ErrorCode,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(option: &str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            option: option.to_string(),
            message: message.into(),
            code,
            severity: Severity::Error,
        }
    }

    pub fn conflict(option: &str, reason: &str, severity: Severity) -> Self {
        Self {
            option: option.to_string(),
            message: format!("Conflict: {reason}"),
            code: ErrorCode::OptionConflict,
            severity,
        }
    }
}

/// Validity of a single supplied option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionState {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ValidationIssue>,
}

impl OptionState {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
            warning: None,
        }
    }

    pub fn invalid(issue: ValidationIssue) -> Self {
        Self {
            is_valid: false,
            error: Some(issue),
            warning: None,
        }
    }
}

/// Device capabilities that affect validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Android API level
    pub android_version: u32,
}

/// Options explicitly chosen by the caller, keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandConfiguration {
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl CommandConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: &str, value: impl Into<Value>) -> Self {
        self.options.insert(option.to_string(), value.into());
        self
    }

    pub fn set(&mut self, option: &str, value: impl Into<Value>) {
        self.options.insert(option.to_string(), value.into());
    }
}

/// Result of validating one configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub option_states: BTreeMap<String, OptionState>,
}

impl ValidityReport {
    /// Whether launching should be blocked
    pub fn has_blocking_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every finding (errors first) attributed to `option`
    pub fn issues_for<'a>(&'a self, option: &'a str) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |issue| issue.option == option)
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors.iter().chain(self.warnings.iter()).any(|i| i.code == code)
    }
}
