//! Error types for Epicycle.
//!
//! This module provides a unified error handling approach using `thiserror`.

use thiserror::Error;

/// Result type alias for Epicycle operations.
pub type Result<T> = std::result::Result<T, EpicycleError>;

/// Errors that can occur in Epicycle.
#[derive(Debug, Error)]
pub enum EpicycleError {
    /// The expression text could not be parsed.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A call to a function name that is not a builtin.
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// The waveform does not depend on its main variable.
    #[error("Expression must be a function of {variable}")]
    MissingVariable { variable: String },

    /// A symbol was evaluated without a value bound to it.
    #[error("No value for symbol: {name}")]
    UnboundSymbol { name: String },

    /// Parameter list does not match the waveform's parameters.
    #[error("Expected {expected} parameter values, got {got}")]
    ParameterCount { expected: usize, got: usize },

    /// Parameter name is not used by the waveform.
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// The waveform evaluated to NaN or infinity.
    #[error("Function is not finite (or not real) at t = {at}")]
    NonFinite { at: f64 },

    /// Sampling grid or slider settings are invalid.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EpicycleError {
    /// Create a Parse error.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an UnknownFunction error.
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(variable: impl Into<String>) -> Self {
        Self::MissingVariable {
            variable: variable.into(),
        }
    }

    /// Create an UnboundSymbol error.
    pub fn unbound_symbol(name: impl Into<String>) -> Self {
        Self::UnboundSymbol { name: name.into() }
    }

    /// Create an InvalidSetting error.
    pub fn invalid_setting(message: impl Into<String>) -> Self {
        Self::InvalidSetting(message.into())
    }
}
