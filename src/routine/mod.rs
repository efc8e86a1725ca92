//! QC routines
//!
//! A routine is a pluggable rule. It is configured once from an ordered list
//! of string parameters, checked against the column schema, and then scans
//! ordered batches of records, raising messages against them.
//!
//! Routines only read their own configuration while processing
//! (`process_records` takes `&self`), and the batch is borrowed exclusively,
//! so each record has a single writer for the duration of a run.

pub mod constant_value;

#[cfg(test)]
mod tests;

pub use constant_value::{ConstantValueMessage, ConstantValueRoutine};

use crate::error::{QcError, RoutineError};
use crate::message::MessageType;
use crate::record::DataRecord;
use crate::schema::ColumnSchema;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A QC rule run over ordered batches of records
pub trait Routine: fmt::Debug + Send + Sync {
    /// Name the routine is registered under
    fn name(&self) -> &str;

    /// Validate and capture the routine's configuration
    fn initialise(
        &mut self,
        parameters: &[String],
        schema: &dyn ColumnSchema,
    ) -> Result<(), RoutineError>;

    /// Scan a batch of records in order, raising messages against them
    ///
    /// Messages added before a failure stay attached.
    fn process_records(&self, records: &mut [DataRecord]) -> Result<(), RoutineError>;
}

/// Attach a message to a record, reporting a missing column as a routine error
pub fn add_message<M: MessageType>(
    record: &mut DataRecord,
    message: M,
) -> Result<(), RoutineError> {
    let line_number = record.line_number();
    record.add_message(Arc::new(message)).map_err(|source| {
        RoutineError::with_source(
            format!(
                "Error while adding {} message to record on line {}",
                M::TAG,
                line_number
            ),
            source,
        )
    })
}

/// Check that a routine received exactly the parameters it expects
pub fn check_parameter_count(
    parameters: &[String],
    expected: &[&str],
) -> Result<(), RoutineError> {
    if parameters.len() != expected.len() {
        let usage: Vec<String> = expected.iter().map(|p| format!("<{}>", p)).collect();
        return Err(RoutineError::new(format!(
            "Incorrect number of parameters. Must be {}",
            usage.join(",")
        )));
    }
    Ok(())
}

type Factory = fn() -> Box<dyn Routine>;

/// Maps routine names from the configuration to routine constructors
#[derive(Debug, Clone, Default)]
pub struct RoutineRegistry {
    factories: HashMap<String, Factory>,
}

impl RoutineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every routine defined in this crate
    pub fn with_builtin_routines() -> Self {
        let mut registry = Self::new();
        registry.register(ConstantValueRoutine::NAME, || {
            Box::new(ConstantValueRoutine::new())
        });
        registry
    }

    /// Register a routine constructor, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) {
        let name = name.into();
        debug!("Registering routine '{}'", name);
        self.factories.insert(name, factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered routine names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create an uninitialised routine by name
    pub fn create(&self, name: &str) -> Result<Box<dyn Routine>, QcError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| QcError::UnknownRoutine {
                name: name.to_string(),
            })
    }
}
