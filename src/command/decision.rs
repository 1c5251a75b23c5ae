//! Parsed commands and the final outcome handed back to the web layer

use crate::core::error::GateError;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// A JSON object recovered from the model output
///
/// Only `action` and `confidence` are interpreted; every other field is
/// echoed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedCommand(Map<String, Value>);

impl ParsedCommand {
    /// Wrap a JSON value, refusing anything that is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn has_action(&self) -> bool {
        self.get("action").is_some()
    }

    /// Lowercased action name
    ///
    /// Non-string values are rendered as JSON text so they fall outside the
    /// vocabulary instead of being silently dropped.
    pub fn action_name(&self) -> Option<String> {
        self.get("action").map(|v| match v {
            Value::String(s) => s.trim().to_lowercase(),
            other => other.to_string().to_lowercase(),
        })
    }

    pub fn confidence(&self) -> f64 {
        coerce_confidence(self.get("confidence"))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Coerce a confidence field to a finite float, 0.0 when absent or unusable
///
/// Numeric strings such as `"0.9"` are accepted since some models quote
/// every value.
pub fn coerce_confidence(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|c| c.is_finite()).unwrap_or(0.0)
}

/// Terminal outcome of one interpretation
#[derive(Debug)]
pub enum GateDecision {
    /// The command passed validation and the confidence gate
    Accepted(ParsedCommand),
    /// Not an actionable command, or not confident enough
    Rejected { confidence: f64 },
    Failed(GateError),
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accepted(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GateDecision::Failed(_))
    }

    /// Status the surrounding layer should answer with
    ///
    /// Rejections are successful classifications and map to 200.
    pub fn status(&self) -> u16 {
        match self {
            GateDecision::Failed(e) => e.status(),
            _ => 200,
        }
    }

    /// The JSON shape returned to callers
    pub fn to_value(&self) -> Value {
        match self {
            GateDecision::Accepted(command) => Value::Object(command.as_map().clone()),
            GateDecision::Rejected { confidence } => json!({
                "action": "none",
                "confidence": confidence,
            }),
            GateDecision::Failed(err) => {
                let mut body = json!({
                    "error": err.to_string(),
                    "status": err.status(),
                });
                if let (Some(raw), Some(map)) = (err.raw(), body.as_object_mut()) {
                    map.insert("raw".into(), Value::String(raw.to_string()));
                }
                body
            }
        }
    }
}

impl Serialize for GateDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TransportError;

    fn command(value: Value) -> ParsedCommand {
        ParsedCommand::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(ParsedCommand::from_value(json!([1, 2])).is_none());
        assert!(ParsedCommand::from_value(json!("sum")).is_none());
        assert!(ParsedCommand::from_value(json!({})).is_some());
    }

    #[test]
    fn test_action_name_lowercased() {
        let cmd = command(json!({"action": "SUM"}));
        assert_eq!(cmd.action_name(), Some("sum".to_string()));
        assert!(command(json!({"range": "A1"})).action_name().is_none());
        assert_eq!(
            command(json!({"action": 3})).action_name(),
            Some("3".to_string())
        );
    }

    #[test]
    fn test_get_reads_echoed_fields() {
        let cmd = command(json!({"action": "sort", "column": "D", "order": "desc"}));
        assert_eq!(cmd.get("column"), Some(&json!("D")));
        assert!(cmd.get("range").is_none());
        assert!(cmd.has_action());
        assert!(!command(json!({"column": "D"})).has_action());
    }

    #[test]
    fn test_confidence_coercion() {
        assert_eq!(coerce_confidence(Some(&json!(0.9))), 0.9);
        assert_eq!(coerce_confidence(Some(&json!(1))), 1.0);
        assert_eq!(coerce_confidence(Some(&json!("0.75"))), 0.75);
        assert_eq!(coerce_confidence(Some(&json!("high"))), 0.0);
        assert_eq!(coerce_confidence(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_confidence(Some(&json!(null))), 0.0);
        assert_eq!(coerce_confidence(Some(&json!(true))), 0.0);
        assert_eq!(coerce_confidence(None), 0.0);
    }

    #[test]
    fn test_accepted_echoes_command() {
        let cmd = command(json!({"action": "sum", "range": "C2:C8", "confidence": 0.95}));
        let decision = GateDecision::Accepted(cmd);
        assert_eq!(
            decision.to_value(),
            json!({"action": "sum", "range": "C2:C8", "confidence": 0.95})
        );
        assert_eq!(decision.status(), 200);
    }

    #[test]
    fn test_rejection_shape() {
        let decision = GateDecision::Rejected { confidence: 0.3 };
        assert_eq!(decision.to_value(), json!({"action": "none", "confidence": 0.3}));
        assert_eq!(decision.status(), 200);
        assert!(!decision.is_error());
    }

    #[test]
    fn test_error_shapes() {
        let decision = GateDecision::Failed(GateError::Unparseable {
            raw: "I cannot help with that.".into(),
        });
        assert_eq!(
            decision.to_value(),
            json!({
                "error": "Could not parse command",
                "status": 422,
                "raw": "I cannot help with that.",
            })
        );

        let decision = GateDecision::Failed(TransportError::QuotaExceeded.into());
        let value = decision.to_value();
        assert_eq!(value["status"], 429);
        assert!(value.get("raw").is_none());
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let decision = GateDecision::Rejected { confidence: 0.7 };
        let text = serde_json::to_string(&decision).unwrap();
        assert_eq!(text, r#"{"action":"none","confidence":0.7}"#);
    }
}
