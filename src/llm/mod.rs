//! Completion service access
//!
//! transcript -> prompt -> CompletionTransport -> raw text -> extract_json

pub mod client;
pub mod extract;
pub mod prompt;

pub use client::{CompletionRequest, CompletionTransport, LlmClient};
pub use extract::extract_json;
