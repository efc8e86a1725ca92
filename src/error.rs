//! Error handling for QC operations.
//!
//! Each layer has its own error type: column lookups, record value/time
//! derivation, message encoding, routines and configuration. [`QcError`]
//! gathers them at the crate boundary.

use std::path::PathBuf;
use thiserror::Error;

/// A named or indexed column does not exist on a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissingColumnError {
    #[error("Line {line_number}: no column named '{name}'")]
    Named { line_number: usize, name: String },

    #[error("Line {line_number}: no column with index {index}")]
    Indexed { line_number: usize, index: usize },
}

/// Failure to populate a record or derive a value from it
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    MissingColumn(#[from] MissingColumnError),

    #[error("Line {line_number}: expected {expected} values, found {found}")]
    ValueCount {
        line_number: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line_number}: value '{value}' in column '{column}' is not a valid number")]
    InvalidNumber {
        line_number: usize,
        column: String,
        value: String,
    },

    #[error("Line {line_number}: cannot parse date/time '{value}' with format '{format}'")]
    InvalidTime {
        line_number: usize,
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Line {line_number}: cannot restore messages")]
    Messages {
        line_number: usize,
        #[source]
        source: MessageError,
    },
}

/// Message construction or rebuild code failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Malformed rebuild code '{code}': {reason}")]
    MalformedCode { code: String, reason: String },

    #[error("No message type registered for tag '{tag}'")]
    UnknownTag { tag: String },

    #[error("Unknown flag '{value}'")]
    UnknownFlag { value: String },

    #[error("Message tag '{tag}' is already registered")]
    DuplicateTag { tag: String },
}

impl MessageError {
    /// Create a malformed code error
    pub fn malformed(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCode {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration or processing failure inside a routine
///
/// Lower-level failures are kept as the source so the full cause chain can be
/// reported.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct RoutineError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RoutineError {
    /// Create a routine error without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a routine error wrapping an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The top-level message of this error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// This error's message followed by the message of each underlying cause
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = vec![self.message.clone()];
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            chain.push(cause.to_string());
            current = cause.source();
        }
        chain
    }
}

/// Configuration loading and validation failure
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse configuration")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum QcError {
    #[error("Routine '{routine}' failed: {source}")]
    Routine {
        routine: String,
        #[source]
        source: RoutineError,
    },

    #[error("Unknown routine '{name}'")]
    UnknownRoutine { name: String },

    #[error(transparent)]
    MissingColumn(#[from] MissingColumnError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl QcError {
    /// Create a routine error tagged with the routine's name
    pub fn routine(routine: impl Into<String>, source: RoutineError) -> Self {
        Self::Routine {
            routine: routine.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, QcError>;
