//! Conflict rules between options
//!
//! Rules are plain data. [`ConflictIndex`] maps each option name to the rules
//! that mention it so validation only looks at rules touching supplied options.
//! Some rules name options the compiler never produces; they stay in the
//! table as documented data even though they cannot fire from settings.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::validation::Severity::{self, Error, Warning};

/// Options that should not be active together
#[derive(Debug, Clone, Copy)]
pub struct ConflictRule {
    pub options: &'static [&'static str],
    pub reason: &'static str,
    pub severity: Severity,
}

const fn rule(options: &'static [&'static str], reason: &'static str, severity: Severity) -> ConflictRule {
    ConflictRule {
        options,
        reason,
        severity,
    }
}

pub static CONFLICT_RULES: &[ConflictRule] = &[
    rule(&["turn-screen-off", "show-touches"], "Cannot show touches on a turned off screen", Warning),
    rule(&["no-control", "keyboard"], "Control is disabled, keyboard options are irrelevant", Warning),
    rule(&["no-control", "mouse"], "Control is disabled, mouse options are irrelevant", Warning),
    rule(&["video-source", "display-id"], "Camera source does not use display IDs", Error),
    rule(&["camera-id", "camera-facing"], "Cannot specify both camera ID and facing", Error),
    rule(&["camera-size", "max-size"], "Camera size conflicts with max size constraint", Warning),
    rule(&["camera-size", "camera-ar"], "Camera size conflicts with aspect ratio constraint", Warning),
    rule(&["otg", "tcpip"], "OTG is USB-only, TCP/IP is network", Error),
    rule(&["no-video", "video-codec"], "Video disabled, codec options are irrelevant", Warning),
    rule(&["no-video", "crop"], "Video disabled, crop options are irrelevant", Warning),
    rule(&["no-control", "show-touches"], "Control disabled, touch display is irrelevant", Warning),
    rule(&["new-display", "otg"], "Virtual displays may not work in OTG mode", Warning),
    rule(&["require-audio", "no-audio"], "Contradictory audio requirements", Error),
    rule(&["force-adb-forward", "tcpip"], "Forwarding not needed for TCP/IP connections", Warning),
    rule(&["raw-key-events", "prefer-text"], "Conflicting input modes", Error),
    rule(&["video-source", "crop"], "Camera source does not use display cropping", Warning),
    rule(&["new-display", "display-id"], "A virtual display replaces the mirrored display", Warning),
    rule(&["new-display", "crop"], "Cropping does not apply to a virtual display", Warning),
    rule(&["no-control", "turn-screen-off"], "Control disabled, the screen cannot be turned off", Warning),
    rule(&["no-control", "stay-awake"], "Control disabled, stay awake has no effect", Warning),
];

/// Inverted index from option name to rule positions
pub struct ConflictIndex {
    rules: &'static [ConflictRule],
    by_option: HashMap<&'static str, Vec<usize>>,
}

static INDEX: LazyLock<ConflictIndex> = LazyLock::new(|| ConflictIndex::new(CONFLICT_RULES));

/// Process-wide index built from [`CONFLICT_RULES`]
pub fn conflict_index() -> &'static ConflictIndex {
    &INDEX
}

impl ConflictIndex {
    pub fn new(rules: &'static [ConflictRule]) -> Self {
        let mut by_option: HashMap<&'static str, Vec<usize>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            for option in rule.options {
                by_option.entry(*option).or_default().push(idx);
            }
        }
        Self { rules, by_option }
    }

    /// Rules mentioning `option`, as `(rule id, rule)` pairs
    pub fn rules_for(&self, option: &str) -> impl Iterator<Item = (usize, &'static ConflictRule)> + '_ {
        let rules = self.rules;
        self.by_option
            .get(option)
            .into_iter()
            .flatten()
            .map(move |&idx| (idx, &rules[idx]))
    }

    pub fn rules(&self) -> &'static [ConflictRule] {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_has_two_members() {
        for rule in CONFLICT_RULES {
            assert!(rule.options.len() >= 2, "rule '{}' is too small", rule.reason);
        }
    }

    #[test]
    fn test_index_covers_every_member() {
        let index = conflict_index();
        for (idx, rule) in CONFLICT_RULES.iter().enumerate() {
            for option in rule.options {
                assert!(index.rules_for(option).any(|(id, _)| id == idx));
            }
        }
    }

    #[test]
    fn test_rules_for_unknown_option_is_empty() {
        assert_eq!(conflict_index().rules_for("fullscreen").count(), 0);
    }

    #[test]
    fn test_no_control_rules() {
        let reasons: Vec<&str> = conflict_index()
            .rules_for("no-control")
            .map(|(_, rule)| rule.reason)
            .collect();
        assert_eq!(reasons.len(), 5);
        assert!(reasons.contains(&"Control disabled, touch display is irrelevant"));
    }
}
