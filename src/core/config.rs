//! Interpreter configuration
//!
//! Built once at startup and handed to the interpreter. Nothing in here is
//! mutated after construction.

use crate::command::gate::ThresholdTable;
use crate::core::error::{GateError, Result};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Chat model used when `OPENAI_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible chat completions endpoint
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Environment variable holding the completion service credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Older deployments used a generic name
const LEGACY_API_KEY_VAR: &str = "API_KEY";

/// Replies are a single small JSON object
pub const DEFAULT_MAX_TOKENS: u32 = 256;

#[derive(Clone)]
pub struct InterpreterConfig {
    /// Credential for the completion service
    ///
    /// `None` (or blank) makes every interpretation fail fast with a
    /// configuration error; no request is sent.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    /// Sampling temperature, 0 for the most deterministic output
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,
    pub thresholds: ThresholdTable,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
            thresholds: ThresholdTable::default(),
        }
    }
}

impl fmt::Debug for InterpreterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpreterConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl InterpreterConfig {
    /// Create a config from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// Optional: OPENAI_API_KEY (fallback API_KEY)
    /// Optional: OPENAI_MODEL (defaults to gpt-4o-mini)
    /// Optional: LLM_API_URL (defaults to the OpenAI chat completions API)
    /// Optional: LLM_TIMEOUT_SECS
    /// Optional: VOICE_GATE_THRESHOLDS (path to a TOML threshold table)
    ///
    /// A missing key is not an error here; it is reported per request.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            api_key: non_blank(API_KEY_VAR).or_else(|| non_blank(LEGACY_API_KEY_VAR)),
            ..Self::default()
        };
        if let Some(model) = non_blank("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(url) = non_blank("LLM_API_URL") {
            config.api_url = url;
        }
        if let Some(secs) = non_blank("LLM_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                GateError::Config(format!("LLM_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(path) = non_blank("VOICE_GATE_THRESHOLDS") {
            config.thresholds = ThresholdTable::load(Path::new(&path))?;
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The credential, if one is usable
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
