//! Data records: one row of input with its QC state
//!
//! A record owns its columns and the messages raised against it.
//! [`DataRecord::add_message`] is the only place where messages are attached
//! and column flags change.
//!
//! # Flag propagation
//!
//! Adding a message overwrites the flag of every column it targets with the
//! message's flag. The flag is not escalated, so when several messages target
//! the same column the last one added decides the column's flag.
//!
//! Adding a message is atomic: all targeted columns are resolved before any
//! flag changes, so a message naming a missing column leaves the record as it
//! was. Replacing the message list is atomic in the same way.

pub mod layout;

#[cfg(test)]
mod tests;

pub use layout::{RecordLayout, TimestampLayout};

use crate::column::DataColumn;
use crate::constants::{NO_COLUMN_INDEX, SUMMARY_SEPARATOR};
use crate::error::{MissingColumnError, RecordError};
use crate::flag::Flag;
use crate::message::rebuild::encode_messages;
use crate::message::{MessageRegistry, QcMessage};
use crate::schema::ColumnSchema;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One row of input data
#[derive(Debug, Clone)]
pub struct DataRecord {
    /// Line of the input file this record came from
    line_number: usize,

    /// Columns in index order; position 0 holds the sentinel
    columns: Vec<DataColumn>,

    /// Messages in the order they were raised
    messages: Vec<Arc<dyn QcMessage>>,

    /// Derivation of time and position for this record's format
    layout: Arc<dyn RecordLayout>,
}

impl DataRecord {
    /// Create a record with empty values for every schema column
    ///
    /// The sentinel is inserted at position 0 if the schema did not build one.
    pub fn new(
        line_number: usize,
        schema: &dyn ColumnSchema,
        layout: Arc<dyn RecordLayout>,
    ) -> Self {
        let mut columns = schema.build_columns();
        if columns.first().is_none_or(|column| !column.is_sentinel()) {
            columns.insert(0, DataColumn::sentinel());
        }

        Self {
            line_number,
            columns,
            messages: Vec::new(),
            layout,
        }
    }

    /// Create a record and populate its values
    pub fn with_values<S: AsRef<str>>(
        line_number: usize,
        schema: &dyn ColumnSchema,
        layout: Arc<dyn RecordLayout>,
        values: &[S],
    ) -> Result<Self, RecordError> {
        let mut record = Self::new(line_number, schema, layout);
        record.set_values(values)?;
        Ok(record)
    }

    /// Set all column values from an ordered list, one value per schema column
    pub fn set_values<S: AsRef<str>>(&mut self, values: &[S]) -> Result<(), RecordError> {
        let expected = self.columns.len().saturating_sub(1);
        if values.len() != expected {
            return Err(RecordError::ValueCount {
                line_number: self.line_number,
                expected,
                found: values.len(),
            });
        }

        for (column, value) in self.columns.iter_mut().skip(1).zip(values) {
            column.set_value(value.as_ref());
        }

        Ok(())
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Columns in index order, excluding the sentinel
    pub fn columns(&self) -> &[DataColumn] {
        self.columns.get(1..).unwrap_or_default()
    }

    // =========================================================================
    // Column lookups
    // =========================================================================

    /// Column by 1-based index
    pub fn column_at(&self, index: usize) -> Result<&DataColumn, MissingColumnError> {
        if index == NO_COLUMN_INDEX {
            return Err(self.missing_index(index));
        }
        self.columns
            .get(index)
            .ok_or_else(|| self.missing_index(index))
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Result<&DataColumn, MissingColumnError> {
        let index = self.column_index(name)?;
        self.column_at(index)
    }

    /// Index of the named column
    pub fn column_index(&self, name: &str) -> Result<usize, MissingColumnError> {
        self.columns
            .iter()
            .skip(1)
            .find(|column| column.name() == name)
            .map(DataColumn::index)
            .ok_or_else(|| MissingColumnError::Named {
                line_number: self.line_number,
                name: name.to_string(),
            })
    }

    /// Name of the column at an index
    pub fn column_name(&self, index: usize) -> Result<&str, MissingColumnError> {
        self.column_at(index).map(DataColumn::name)
    }

    /// Names of the columns at a set of indices
    pub fn column_names(
        &self,
        indices: &BTreeSet<usize>,
    ) -> Result<BTreeSet<String>, MissingColumnError> {
        indices
            .iter()
            .map(|&index| self.column_name(index).map(str::to_string))
            .collect()
    }

    /// Check whether a column exists, ignoring case
    pub fn column_exists(&self, name: &str) -> bool {
        self.columns
            .iter()
            .skip(1)
            .any(|column| column.name().eq_ignore_ascii_case(name))
    }

    /// Value of the named column
    pub fn value(&self, name: &str) -> Result<&str, MissingColumnError> {
        self.column(name).map(DataColumn::value)
    }

    /// Value of the column at an index
    pub fn value_at(&self, index: usize) -> Result<&str, MissingColumnError> {
        self.column_at(index).map(DataColumn::value)
    }

    /// Value of the named column parsed as a real number
    pub fn numeric_value(&self, name: &str) -> Result<f64, RecordError> {
        let index = self.column_index(name)?;
        self.numeric_value_at(index)
    }

    /// Value of the column at an index parsed as a real number
    pub fn numeric_value_at(&self, index: usize) -> Result<f64, RecordError> {
        let column = self.column_at(index)?;
        column
            .value()
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidNumber {
                line_number: self.line_number,
                column: column.name().to_string(),
                value: column.value().to_string(),
            })
    }

    fn missing_index(&self, index: usize) -> MissingColumnError {
        MissingColumnError::Indexed {
            line_number: self.line_number,
            index,
        }
    }

    // =========================================================================
    // Time and position
    // =========================================================================

    pub fn time(&self) -> Result<DateTime<Utc>, RecordError> {
        self.layout.time(self)
    }

    pub fn longitude(&self) -> Result<f64, RecordError> {
        self.layout.longitude(self)
    }

    pub fn latitude(&self) -> Result<f64, RecordError> {
        self.layout.latitude(self)
    }

    pub fn date_time_columns(&self) -> BTreeSet<usize> {
        self.layout.date_time_columns()
    }

    pub fn date_time_column_names(&self) -> Result<BTreeSet<String>, MissingColumnError> {
        self.column_names(&self.layout.date_time_columns())
    }

    pub fn longitude_column_name(&self) -> Result<&str, MissingColumnError> {
        self.column_name(self.layout.longitude_column())
    }

    pub fn latitude_column_name(&self) -> Result<&str, MissingColumnError> {
        self.column_name(self.layout.latitude_column())
    }

    // =========================================================================
    // Messages and flags
    // =========================================================================

    /// Messages in the order they were raised
    pub fn messages(&self) -> &[Arc<dyn QcMessage>] {
        &self.messages
    }

    /// Attach a message and set the flag of each column it targets
    pub fn add_message(&mut self, message: Arc<dyn QcMessage>) -> Result<(), MissingColumnError> {
        let targets = self.resolve_targets(message.as_ref())?;
        self.attach(message, &targets);
        Ok(())
    }

    /// Replace all messages, resetting flags and replaying the new messages in order
    ///
    /// Every message is checked before anything changes. If one targets a
    /// missing column the record keeps its previous messages and flags.
    pub fn set_messages(
        &mut self,
        messages: Vec<Arc<dyn QcMessage>>,
    ) -> Result<(), MissingColumnError> {
        let targets = messages
            .iter()
            .map(|message| self.resolve_targets(message.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        self.clear_messages();
        for (message, targets) in messages.into_iter().zip(targets) {
            self.attach(message, &targets);
        }
        Ok(())
    }

    /// Replace all messages with those decoded from persisted rebuild codes
    ///
    /// The record is left unchanged if the codes cannot be decoded or if a
    /// decoded message targets a column the record does not have.
    pub fn set_messages_from_codes(
        &mut self,
        codes: &str,
        registry: &MessageRegistry,
    ) -> Result<(), RecordError> {
        let messages = registry
            .decode(codes)
            .map_err(|source| RecordError::Messages {
                line_number: self.line_number,
                source,
            })?;

        self.set_messages(messages)?;
        Ok(())
    }

    /// All messages encoded as one persisted string
    pub fn rebuild_codes(&self) -> String {
        encode_messages(&self.messages)
    }

    /// Indices of the columns a message flags, all checked to exist
    fn resolve_targets(&self, message: &dyn QcMessage) -> Result<Vec<usize>, MissingColumnError> {
        message
            .column_indices()
            .iter()
            .copied()
            .filter(|&index| index != NO_COLUMN_INDEX)
            .map(|index| self.column_at(index).map(|_| index))
            .collect()
    }

    fn attach(&mut self, message: Arc<dyn QcMessage>, targets: &[usize]) {
        let flag = message.flag();
        for &index in targets {
            self.columns[index].set_flag(flag);
        }
        self.messages.push(message);
    }

    fn clear_messages(&mut self) {
        self.messages.clear();
        for column in self.columns.iter_mut() {
            column.reset_flag();
        }
    }

    /// Whether any message carries the questionable flag
    pub fn has_questionable(&self) -> bool {
        self.has_message_with_flag(Flag::Questionable)
    }

    /// Whether any message carries the bad flag
    pub fn has_bad(&self) -> bool {
        self.has_message_with_flag(Flag::Bad)
    }

    fn has_message_with_flag(&self, flag: Flag) -> bool {
        self.messages.iter().any(|message| message.flag() == flag)
    }

    /// The most severe flag across all columns
    pub fn worst_flag(&self) -> Flag {
        self.columns
            .iter()
            .skip(1)
            .fold(Flag::default(), |worst, column| worst.escalate(column.flag()))
    }

    /// Short texts of all messages joined with "; "
    pub fn message_summaries(&self) -> String {
        self.messages
            .iter()
            .map(|message| message.short_message())
            .collect::<Vec<_>>()
            .join(SUMMARY_SEPARATOR)
    }
}
