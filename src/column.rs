//! A single cell of a data record

use crate::constants::{NO_COLUMN_INDEX, SENTINEL_COLUMN_NAME};
use crate::flag::Flag;

/// One column value within a record, together with its current QC flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataColumn {
    /// 1-based column index (0 is the record's sentinel)
    index: usize,

    /// Column name from the schema
    name: String,

    /// Raw value as read from the input
    value: String,

    /// Current QC flag
    flag: Flag,
}

impl DataColumn {
    /// Create an empty column with the default flag
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            value: String::new(),
            flag: Flag::default(),
        }
    }

    /// The reserved column at index 0 of every record
    pub fn sentinel() -> Self {
        Self::new(NO_COLUMN_INDEX, SENTINEL_COLUMN_NAME)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    /// Check whether this is the reserved sentinel column
    pub fn is_sentinel(&self) -> bool {
        self.index == NO_COLUMN_INDEX
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_flag(&mut self, flag: Flag) {
        self.flag = flag;
    }

    /// Reset the flag to the default
    pub fn reset_flag(&mut self) {
        self.flag = Flag::default();
    }
}
