//! Confidence gate
//!
//! Every classified command must clear a per-action minimum confidence
//! before it is handed to the front end. Destructive actions need more
//! certainty than read-only ones.

use crate::command::action::Action;
use crate::command::decision::{GateDecision, ParsedCommand};
use crate::core::error::{GateError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Floor for every action without an explicit entry
pub const DEFAULT_THRESHOLD: f64 = 0.55;

/// Minimum confidence per action
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    default: f64,
    per_action: HashMap<Action, f64>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let per_action = HashMap::from([
            (Action::Delete, 0.80),
            (Action::Merge, 0.75),
            (Action::Write, 0.50),
        ]);
        Self {
            default: DEFAULT_THRESHOLD,
            per_action,
        }
    }
}

/// On-disk layout of a threshold file
///
/// ```toml
/// default = 0.55
///
/// [actions]
/// delete = 0.80
/// ```
#[derive(Debug, Deserialize)]
struct ThresholdFile {
    default: Option<f64>,
    #[serde(default)]
    actions: BTreeMap<String, f64>,
}

impl ThresholdTable {
    /// A table with only a floor and no per-action entries
    pub fn uniform(default: f64) -> Result<Self> {
        Ok(Self {
            default: validate(default, "default")?,
            per_action: HashMap::new(),
        })
    }

    /// Set or replace the threshold of one action
    pub fn with_threshold(mut self, action: Action, threshold: f64) -> Result<Self> {
        let threshold = validate(threshold, action.as_str())?;
        self.per_action.insert(action, threshold);
        Ok(self)
    }

    pub fn default_threshold(&self) -> f64 {
        self.default
    }

    pub fn threshold_for(&self, action: Action) -> f64 {
        self.per_action.get(&action).copied().unwrap_or(self.default)
    }

    /// Parse a TOML table; entries override the built-in defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ThresholdFile = toml::from_str(content)?;

        let mut table = Self::default();
        if let Some(default) = file.default {
            table.default = validate(default, "default")?;
        }
        for (name, threshold) in file.actions {
            let action: Action = name
                .parse()
                .map_err(|e| GateError::Config(format!("threshold table: {}", e)))?;
            table = table.with_threshold(action, threshold)?;
        }
        Ok(table)
    }

    /// Load a threshold table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn validate(threshold: f64, name: &str) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(GateError::Config(format!(
            "threshold for {} must be within [0, 1], got {}",
            name, threshold
        )))
    }
}

/// Outcome of checking one command against the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Pass {
        action: Action,
        confidence: f64,
        threshold: f64,
    },
    /// Action outside the vocabulary, or `none`
    NotActionable { confidence: f64 },
    BelowThreshold {
        action: Action,
        confidence: f64,
        threshold: f64,
    },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    pub fn confidence(&self) -> f64 {
        match *self {
            Verdict::Pass { confidence, .. }
            | Verdict::NotActionable { confidence }
            | Verdict::BelowThreshold { confidence, .. } => confidence,
        }
    }

    pub fn threshold(&self) -> Option<f64> {
        match *self {
            Verdict::Pass { threshold, .. } | Verdict::BelowThreshold { threshold, .. } => {
                Some(threshold)
            }
            Verdict::NotActionable { .. } => None,
        }
    }
}

/// Applies a [`ThresholdTable`] to parsed commands
#[derive(Debug, Clone, Default)]
pub struct ConfidenceGate {
    thresholds: ThresholdTable,
}

impl ConfidenceGate {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn check(&self, command: &ParsedCommand) -> Verdict {
        let confidence = command.confidence();
        let action = command
            .action_name()
            .and_then(|name| name.parse::<Action>().ok());

        match action {
            None | Some(Action::None) => Verdict::NotActionable { confidence },
            Some(action) => {
                let threshold = self.thresholds.threshold_for(action);
                if confidence >= threshold {
                    Verdict::Pass {
                        action,
                        confidence,
                        threshold,
                    }
                } else {
                    Verdict::BelowThreshold {
                        action,
                        confidence,
                        threshold,
                    }
                }
            }
        }
    }

    /// Gate a command; rejected commands never reveal the classified action
    pub fn decide(&self, command: ParsedCommand) -> (Verdict, GateDecision) {
        let verdict = self.check(&command);
        let decision = if verdict.is_pass() {
            GateDecision::Accepted(command)
        } else {
            GateDecision::Rejected {
                confidence: verdict.confidence(),
            }
        };
        (verdict, decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(value: serde_json::Value) -> ParsedCommand {
        ParsedCommand::from_value(value).unwrap()
    }

    #[test]
    fn test_default_table() {
        let table = ThresholdTable::default();
        assert_eq!(table.threshold_for(Action::Delete), 0.80);
        assert_eq!(table.threshold_for(Action::Merge), 0.75);
        assert_eq!(table.threshold_for(Action::Write), 0.50);
        assert_eq!(table.threshold_for(Action::Sum), DEFAULT_THRESHOLD);
        assert_eq!(table.threshold_for(Action::Scroll), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_delete_below_threshold_is_rejected() {
        let gate = ConfidenceGate::default();
        let (verdict, decision) =
            gate.decide(command(json!({"action": "delete", "range": "B2:B10", "confidence": 0.7})));
        assert_eq!(
            verdict,
            Verdict::BelowThreshold {
                action: Action::Delete,
                confidence: 0.7,
                threshold: 0.80,
            }
        );
        assert_eq!(decision.to_value(), json!({"action": "none", "confidence": 0.7}));
    }

    #[test]
    fn test_sum_above_default_passes_unchanged() {
        let gate = ConfidenceGate::default();
        let input = json!({"action": "sum", "range": "C2:C8", "confidence": 0.9});
        let (verdict, decision) = gate.decide(command(input.clone()));
        assert!(verdict.is_pass());
        assert_eq!(decision.to_value(), input);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let gate = ConfidenceGate::default();
        let verdict = gate.check(&command(json!({"action": "delete", "confidence": 0.8})));
        assert!(verdict.is_pass());
    }

    #[test]
    fn test_uppercase_action_is_normalized_but_echoed() {
        let gate = ConfidenceGate::default();
        let input = json!({"action": "SORT", "column": "D", "confidence": 0.9});
        let (_, decision) = gate.decide(command(input.clone()));
        assert_eq!(decision.to_value(), input);
    }

    #[test]
    fn test_unknown_action_always_rejected() {
        let gate = ConfidenceGate::default();
        let (verdict, decision) =
            gate.decide(command(json!({"action": "teleport", "confidence": 0.99})));
        assert_eq!(verdict, Verdict::NotActionable { confidence: 0.99 });
        assert_eq!(decision.to_value(), json!({"action": "none", "confidence": 0.99}));
    }

    #[test]
    fn test_none_action_rejected_even_when_confident() {
        let gate = ConfidenceGate::default();
        let verdict = gate.check(&command(json!({"action": "none", "confidence": 1.0})));
        assert_eq!(verdict, Verdict::NotActionable { confidence: 1.0 });
        assert_eq!(verdict.threshold(), None);
    }

    #[test]
    fn test_missing_confidence_is_gated_out() {
        let gate = ConfidenceGate::default();
        for action in Action::ALL {
            let verdict = gate.check(&command(json!({"action": action.as_str()})));
            assert!(!verdict.is_pass(), "{} should be gated", action);
            assert_eq!(verdict.confidence(), 0.0);
        }
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let table = ThresholdTable::from_toml_str(
            r#"
default = 0.6

[actions]
delete = 0.9
Zoom = 0.4
"#,
        )
        .unwrap();
        assert_eq!(table.default_threshold(), 0.6);
        assert_eq!(table.threshold_for(Action::Delete), 0.9);
        assert_eq!(table.threshold_for(Action::Zoom), 0.4);
        // untouched built-in entries survive
        assert_eq!(table.threshold_for(Action::Merge), 0.75);
        assert_eq!(table.threshold_for(Action::Sum), 0.6);
    }

    #[test]
    fn test_toml_rejects_unknown_action() {
        let err = ThresholdTable::from_toml_str("[actions]\nteleport = 0.5\n").unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }

    #[test]
    fn test_toml_rejects_out_of_range() {
        assert!(ThresholdTable::from_toml_str("default = 1.5").is_err());
        assert!(ThresholdTable::from_toml_str("[actions]\nsum = -0.1\n").is_err());
    }

    #[test]
    fn test_empty_toml_is_default_table() {
        assert_eq!(
            ThresholdTable::from_toml_str("").unwrap(),
            ThresholdTable::default()
        );
    }

    #[test]
    fn test_uniform_table() {
        let table = ThresholdTable::uniform(0.0)
            .unwrap()
            .with_threshold(Action::Delete, 1.0)
            .unwrap();
        assert_eq!(table.threshold_for(Action::Write), 0.0);
        assert_eq!(table.threshold_for(Action::Delete), 1.0);
        assert!(ThresholdTable::uniform(f64::NAN).is_err());
    }
}
