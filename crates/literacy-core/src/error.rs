//! Core error types for literacy-core.
//!
//! Every error in this crate is local and recoverable: the session state
//! machine rejects bad input as a no-op, the codec decodes leniently, and the
//! host surface only fails at attach time.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::Phase;

/// Core error type for literacy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session command or value errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Host widget errors
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Errors raised by the session state machine, word tracker and value codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Word index outside `[0, word_count)`
    #[error("Word index {index} out of range (word count: {word_count})")]
    IndexOutOfRange { index: usize, word_count: usize },

    /// Serialized value could not be decoded
    #[error("Malformed serialized value: {0}")]
    MalformedSerializedValue(String),

    /// Command not valid in the current phase
    #[error("Command '{command}' is not valid in phase {phase:?}")]
    InvalidTransition { phase: Phase, command: &'static str },

    /// Word sits before the selectable window
    #[error("Word index {index} is locked (selectable from {selectable_from})")]
    WordLocked { index: usize, selectable_from: usize },

    /// A session needs at least one word
    #[error("Word list is empty")]
    EmptyWordList,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised while attaching a widget to its host.
#[derive(Error, Debug)]
pub enum HostError {
    /// Readonly inputs are never instrumented
    #[error("Widget '{name}' is readonly")]
    ReadOnly { name: String },

    /// Session could not be constructed
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
