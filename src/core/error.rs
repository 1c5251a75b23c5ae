use thiserror::Error;

/// Failures of the single round trip to the completion service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("You've exceeded your completion API quota. Check plan & billing.")]
    QuotaExceeded,

    #[error("Invalid API key. Update the API key on the server.")]
    InvalidCredential,

    /// Carries upstream detail for the log; never shown to callers
    #[error("Command processing failed")]
    Unclassified(String),
}

impl TransportError {
    /// HTTP-like status surfaced to the web layer
    pub fn status(&self) -> u16 {
        match self {
            TransportError::QuotaExceeded => 429,
            TransportError::InvalidCredential => 401,
            TransportError::Unclassified(_) => 500,
        }
    }

    /// Upstream detail kept out of the public message
    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::Unclassified(detail) => Some(detail),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Server misconfigured: missing {0}")]
    MissingCredential(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Could not parse command")]
    Unparseable { raw: String },

    #[error("Invalid command format (no 'action')")]
    MissingAction { raw: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl GateError {
    pub fn status(&self) -> u16 {
        match self {
            GateError::Transport(e) => e.status(),
            GateError::Unparseable { .. } | GateError::MissingAction { .. } => 422,
            GateError::MissingCredential(_)
            | GateError::Config(_)
            | GateError::IoError(_)
            | GateError::TomlError(_)
            | GateError::SerdeError(_) => 500,
        }
    }

    /// Raw model output attached to extraction and schema failures
    pub fn raw(&self) -> Option<&str> {
        match self {
            GateError::Unparseable { raw } | GateError::MissingAction { raw } => Some(raw),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
