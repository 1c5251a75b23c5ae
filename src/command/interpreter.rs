//! Transcript to gated spreadsheet command
//!
//! One interpretation is one round trip to the completion service:
//! transcript -> prompt -> model -> extract_json -> `action` check -> gate.
//! Nothing is retried and nothing escapes as an error; every outcome is a
//! [`GateDecision`].

use crate::command::decision::GateDecision;
use crate::command::gate::{ConfidenceGate, Verdict};
use crate::core::config::{InterpreterConfig, API_KEY_VAR};
use crate::core::error::{GateError, Result};
use crate::llm::client::{CompletionRequest, CompletionTransport, LlmClient};
use crate::llm::extract::extract_json;
use crate::llm::prompt::COMMAND_SYSTEM_PROMPT;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Stateless interpreter; share it freely between tasks
pub struct CommandInterpreter {
    config: InterpreterConfig,
    gate: ConfidenceGate,
    transport: Arc<dyn CompletionTransport>,
}

impl CommandInterpreter {
    pub fn new(config: InterpreterConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        let gate = ConfidenceGate::new(config.thresholds.clone());
        Self {
            config,
            gate,
            transport,
        }
    }

    /// Build an interpreter backed by the HTTP client
    ///
    /// A missing credential is accepted here and reported on every call.
    pub fn from_config(config: InterpreterConfig) -> Result<Self> {
        if config.credential().is_none() {
            warn!("No {} found; commands will fail until it is set", API_KEY_VAR);
        }
        let api_key = config.credential().unwrap_or_default().to_string();
        let client = match config.timeout {
            Some(timeout) => LlmClient::with_timeout(api_key, config.api_url.clone(), timeout)?,
            None => LlmClient::new(api_key, config.api_url.clone()),
        };
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn gate(&self) -> &ConfidenceGate {
        &self.gate
    }

    /// The request sent for a transcript
    pub fn completion_request(&self, transcript: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            system: COMMAND_SYSTEM_PROMPT.to_string(),
            user: transcript.to_string(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Classify a transcript into a gated spreadsheet command
    pub async fn interpret(&self, transcript: &str) -> GateDecision {
        let span = info_span!("interpret", request_id = %Uuid::new_v4());
        self.interpret_inner(transcript).instrument(span).await
    }

    async fn interpret_inner(&self, transcript: &str) -> GateDecision {
        info!(transcript, "Received voice command");

        if self.config.credential().is_none() {
            let err = GateError::MissingCredential(API_KEY_VAR.to_string());
            error!(transcript, status = err.status(), "{}", err);
            return GateDecision::Failed(err);
        }

        let request = self.completion_request(transcript);
        let raw = match self.transport.complete(&request).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!(
                    transcript,
                    status = e.status(),
                    error = %e,
                    detail = e.detail().unwrap_or_default(),
                    "Completion request failed"
                );
                return GateDecision::Failed(e.into());
            }
        };
        info!(raw = %raw, "Model raw response");

        let Some(command) = extract_json(&raw) else {
            error!(transcript, raw = %raw, "Could not parse JSON from response");
            return GateDecision::Failed(GateError::Unparseable { raw });
        };

        if !command.has_action() {
            error!(transcript, raw = %raw, "Missing 'action' in parsed JSON");
            return GateDecision::Failed(GateError::MissingAction { raw });
        }

        let (verdict, decision) = self.gate.decide(command);
        match verdict {
            Verdict::Pass {
                action,
                confidence,
                threshold,
            } => info!(%action, confidence, threshold, "Command accepted"),
            Verdict::BelowThreshold {
                action,
                confidence,
                threshold,
            } => info!(%action, confidence, threshold, "Command gated: below threshold"),
            Verdict::NotActionable { confidence } => {
                info!(transcript, raw = %raw, confidence, "Command gated: not actionable")
            }
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::action::Action;

    #[test]
    fn test_completion_request_uses_config() {
        let config = InterpreterConfig::default()
            .with_api_key("sk-test")
            .with_model("gpt-test");
        let interpreter = CommandInterpreter::from_config(config).unwrap();
        let request = interpreter.completion_request("sum C2 to C8");
        assert_eq!(request.model, "gpt-test");
        assert_eq!(request.user, "sum C2 to C8");
        assert_eq!(request.system, COMMAND_SYSTEM_PROMPT);
        assert_eq!(request.temperature, 0.0);
    }

    #[test]
    fn test_gate_built_from_config_thresholds() {
        let thresholds = crate::command::gate::ThresholdTable::uniform(0.9).unwrap();
        let config = InterpreterConfig::default().with_thresholds(thresholds);
        let interpreter = CommandInterpreter::from_config(config).unwrap();
        assert_eq!(interpreter.gate().thresholds().threshold_for(Action::Sum), 0.9);
    }
}
