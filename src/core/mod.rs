pub mod config;
pub mod error;
pub mod logging;

pub use config::InterpreterConfig;
pub use error::{GateError, Result, TransportError};
