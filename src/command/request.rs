//! JSON body adapter for the voice command endpoint
//!
//! The web layer owns routing; this module only turns a request body into a
//! transcript and a decision into a status plus JSON body.

use crate::command::interpreter::CommandInterpreter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a voice command request: `{"transcript": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceCommandRequest {
    #[serde(default)]
    pub transcript: String,
}

impl VoiceCommandRequest {
    /// Lenient body parsing
    ///
    /// Invalid JSON, a non-object body or a missing / non-string
    /// `transcript` all give an empty transcript.
    pub fn from_body(body: &str) -> Self {
        let transcript = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("transcript").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();
        Self { transcript }
    }
}

/// What the web layer sends back
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCommandResponse {
    pub status: u16,
    pub body: Value,
}

/// Interpret a raw request body and produce the HTTP-ready response
pub async fn handle_voice_command(
    interpreter: &CommandInterpreter,
    body: &str,
) -> VoiceCommandResponse {
    let request = VoiceCommandRequest::from_body(body);
    let decision = interpreter.interpret(&request.transcript).await;
    VoiceCommandResponse {
        status: decision.status(),
        body: decision.to_value(),
    }
}
