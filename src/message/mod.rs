//! QC messages raised by routines
//!
//! A message is an immutable diagnostic event attached to a record. Every
//! message type is built from the same six canonical fields ([`MessageFields`])
//! and identified by a stable tag, which is what allows messages to be
//! persisted as rebuild codes and reconstructed later with their concrete type.
//!
//! # Architecture
//!
//! - [`QcMessage`] - object-safe behaviour shared by all messages; records hold
//!   `Arc<dyn QcMessage>`
//! - [`MessageType`] - implemented by each concrete message type; its
//!   [`MessageType::from_fields`] is the canonical constructor used when
//!   rebuilding from storage, and the convenience constructors are provided on
//!   top of it
//! - [`key`] - grouping identity of a message
//! - [`rebuild`] - the rebuild code text grammar
//! - [`registry`] - tag to decoder dispatch
//!
//! # Equality
//!
//! Two messages compare equal only when both their tags and their fields match.
//! [`QcMessage::same_fields`] compares fields alone.

pub mod key;
pub mod rebuild;
pub mod registry;

pub use key::MessageKey;
pub use rebuild::RebuildCode;
pub use registry::MessageRegistry;

use crate::column::DataColumn;
use crate::constants::{COLUMN_NAME_SEPARATOR, NO_LINE_NUMBER};
use crate::flag::Flag;
use std::collections::BTreeSet;
use std::fmt;

/// The canonical fields every message is built from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageFields {
    /// Line of the input the message applies to, or [`NO_LINE_NUMBER`]
    pub line_number: usize,

    /// Indices of the affected columns
    pub column_indices: BTreeSet<usize>,

    /// Names of the affected columns
    pub column_names: BTreeSet<String>,

    /// Severity of the message
    pub flag: Flag,

    /// The value that caused the message
    pub field_value: String,

    /// Example of a valid value, or a description such as "Between 12 and 24"
    pub valid_value: String,
}

impl MessageFields {
    pub fn new(
        line_number: usize,
        column_indices: BTreeSet<usize>,
        column_names: BTreeSet<String>,
        flag: Flag,
        field_value: impl Into<String>,
        valid_value: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            column_indices,
            column_names,
            flag,
            field_value: field_value.into(),
            valid_value: valid_value.into(),
        }
    }

    /// Fields for a message about a single column
    pub fn single(
        line_number: usize,
        column_index: usize,
        column_name: impl Into<String>,
        flag: Flag,
        field_value: impl Into<String>,
        valid_value: impl Into<String>,
    ) -> Self {
        Self::new(
            line_number,
            BTreeSet::from([column_index]),
            BTreeSet::from([column_name.into()]),
            flag,
            field_value,
            valid_value,
        )
    }

    /// Fields for a message about a column, taking the field value from the column
    pub fn for_column(
        line_number: usize,
        column: &DataColumn,
        flag: Flag,
        valid_value: impl Into<String>,
    ) -> Self {
        Self::for_column_with_value(line_number, column, flag, column.value(), valid_value)
    }

    /// Fields for a message about a column where the offending value is not the
    /// column's own value
    pub fn for_column_with_value(
        line_number: usize,
        column: &DataColumn,
        flag: Flag,
        field_value: impl Into<String>,
        valid_value: impl Into<String>,
    ) -> Self {
        Self::single(
            line_number,
            column.index(),
            column.name(),
            flag,
            field_value,
            valid_value,
        )
    }
}

/// Behaviour shared by all QC messages
pub trait QcMessage: fmt::Debug + Send + Sync {
    /// Stable identifier of the message type, used for grouping and decoding
    fn tag(&self) -> &'static str;

    /// The canonical fields of this message
    fn fields(&self) -> &MessageFields;

    /// Long form of the message text
    fn full_message(&self) -> String;

    /// Short form of the message text
    fn short_message(&self) -> String;

    fn line_number(&self) -> usize {
        self.fields().line_number
    }

    /// Whether the message applies to a single line rather than the whole input
    fn has_line_number(&self) -> bool {
        self.line_number() != NO_LINE_NUMBER
    }

    fn column_indices(&self) -> &BTreeSet<usize> {
        &self.fields().column_indices
    }

    fn column_names(&self) -> &BTreeSet<String> {
        &self.fields().column_names
    }

    fn flag(&self) -> Flag {
        self.fields().flag
    }

    fn field_value(&self) -> &str {
        &self.fields().field_value
    }

    fn valid_value(&self) -> &str {
        &self.fields().valid_value
    }

    /// Column names joined with '|'
    fn column_names_joined(&self) -> String {
        self.column_names()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(COLUMN_NAME_SEPARATOR)
    }

    /// Key for grouping this message with others of the same type and columns
    fn message_key(&self) -> MessageKey {
        MessageKey::new(self.tag(), self.column_indices().clone())
    }

    /// Rebuild code that reconstructs this message
    fn rebuild_code(&self) -> RebuildCode {
        RebuildCode::from_parts(self.tag(), self.fields().clone())
    }

    /// Compare fields only, ignoring the message type
    fn same_fields(&self, other: &dyn QcMessage) -> bool {
        self.fields() == other.fields()
    }
}

/// A concrete message type that can be rebuilt from its canonical fields
///
/// [`MessageType::from_fields`] is the only constructor used when messages are
/// reconstructed from storage. The remaining constructors are defined in terms
/// of it, so every message type offering them can also be rebuilt.
pub trait MessageType: QcMessage + Sized + 'static {
    /// Stable tag for this message type. Must be unique within a registry.
    const TAG: &'static str;

    /// Build a message from its canonical fields
    fn from_fields(fields: MessageFields) -> Self;

    /// Build a message about a single column given by index and name
    fn for_index(
        line_number: usize,
        column_index: usize,
        column_name: impl Into<String>,
        flag: Flag,
        field_value: impl Into<String>,
        valid_value: impl Into<String>,
    ) -> Self {
        Self::from_fields(MessageFields::single(
            line_number,
            column_index,
            column_name,
            flag,
            field_value,
            valid_value,
        ))
    }

    /// Build a message about a column, using the column's value as the field value
    fn for_column(
        line_number: usize,
        column: &DataColumn,
        flag: Flag,
        valid_value: impl Into<String>,
    ) -> Self {
        Self::from_fields(MessageFields::for_column(
            line_number,
            column,
            flag,
            valid_value,
        ))
    }

    /// Build a message about a column with an explicit field value
    fn for_column_with_value(
        line_number: usize,
        column: &DataColumn,
        flag: Flag,
        field_value: impl Into<String>,
        valid_value: impl Into<String>,
    ) -> Self {
        Self::from_fields(MessageFields::for_column_with_value(
            line_number,
            column,
            flag,
            field_value,
            valid_value,
        ))
    }
}

impl PartialEq for dyn QcMessage {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag() && self.fields() == other.fields()
    }
}

impl Eq for dyn QcMessage {}

impl fmt::Display for dyn QcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message())
    }
}
