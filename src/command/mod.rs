//! Command interpretation pipeline
//!
//! Transcript -> CommandInterpreter -> ParsedCommand -> ConfidenceGate -> GateDecision

pub mod action;
pub mod decision;
pub mod gate;
pub mod interpreter;
pub mod request;

pub use action::Action;
pub use decision::{GateDecision, ParsedCommand};
pub use gate::{ConfidenceGate, ThresholdTable, Verdict};
pub use interpreter::CommandInterpreter;
pub use request::{handle_voice_command, VoiceCommandRequest, VoiceCommandResponse};
