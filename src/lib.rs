//! QC Routines Library
//!
//! A quality-control framework for time-ordered tabular scientific data.
//!
//! A caller defines a column schema, then runs a sequence of interchangeable
//! validation rules ("routines") over an ordered batch of rows ("records").
//! Routines raise typed messages against specific columns of specific rows,
//! and each message's severity flag is propagated onto the columns it targets.
//!
//! This library provides:
//! - An ordered flag scale (good, questionable, bad)
//! - Records with name and index column lookups and layout-derived time and position
//! - Typed messages with a compact rebuild code form for persistence
//! - A routine contract, a routine registry and a processor that sequences routines
//! - A constant-value routine that flags values stuck for too long
//! - TOML configuration of columns, layout and routines
//!
//! # Example
//!
//! ```no_run
//! use qc_routines::{DataRecord, MessageRegistry, QcConfig, QcProcessor, RoutineRegistry};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> qc_routines::Result<()> {
//! let config = QcConfig::from_file(Path::new("qc.toml"))?;
//! let schema = config.column_config()?;
//! let layout = Arc::new(config.timestamp_layout(&schema)?);
//!
//! let mut records = vec![DataRecord::with_values(
//!     1,
//!     &schema,
//!     layout,
//!     &["2023-06-15", "12:00:00", "-4.15", "50.36", "12.5"],
//! )?];
//!
//! let routines = RoutineRegistry::with_builtin_routines();
//! let processor = QcProcessor::from_config(&config, &schema, &routines)?;
//! let stats = processor.process(&mut records)?;
//! println!("{}", stats.summary());
//!
//! let codes = records[0].rebuild_codes();
//! records[0].set_messages_from_codes(&codes, &MessageRegistry::with_builtin_messages())?;
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod config;
pub mod constants;
pub mod error;
pub mod flag;
pub mod message;
pub mod processor;
pub mod record;
pub mod routine;
pub mod schema;
pub mod stats;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use column::DataColumn;
pub use config::{LayoutConfig, QcConfig, RoutineConfig};
pub use error::{
    ConfigError, MessageError, MissingColumnError, QcError, RecordError, Result, RoutineError,
};
pub use flag::Flag;
pub use message::{
    MessageFields, MessageKey, MessageRegistry, MessageType, QcMessage, RebuildCode,
};
pub use processor::QcProcessor;
pub use record::{DataRecord, RecordLayout, TimestampLayout};
pub use routine::{
    ConstantValueMessage, ConstantValueRoutine, Routine, RoutineRegistry, add_message,
};
pub use schema::{ColumnConfig, ColumnConfigItem, ColumnDefinition, ColumnSchema};
pub use stats::ProcessingStats;
