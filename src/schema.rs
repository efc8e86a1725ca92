//! Column schema for QC records.
//!
//! The [`ColumnSchema`] trait is the interface records and routines need from
//! a schema. [`ColumnConfig`] is the standard implementation, built from the
//! column definitions in the QC configuration.

use crate::column::DataColumn;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Configured column as declared in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, unique within the schema
    pub name: String,

    /// Whether values in this column are numeric
    #[serde(default)]
    pub numeric: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, numeric: bool) -> Self {
        Self {
            name: name.into(),
            numeric,
        }
    }
}

/// Schema entry for a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfigItem {
    index: usize,
    name: String,
    numeric: bool,
}

impl ColumnConfigItem {
    /// 1-based column index
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

/// What records and routines need from a column schema
pub trait ColumnSchema: std::fmt::Debug + Send + Sync {
    /// Check whether a column with this name exists
    fn has_column(&self, name: &str) -> bool;

    /// Look up a column's configuration by name
    fn column_config(&self, name: &str) -> Option<&ColumnConfigItem>;

    /// Build the columns of a new record, including the sentinel at index 0
    ///
    /// Records insert the sentinel themselves when it is missing.
    fn build_columns(&self) -> Vec<DataColumn>;
}

/// Ordered column schema
#[derive(Debug, Clone, Default)]
pub struct ColumnConfig {
    columns: Vec<ColumnConfigItem>,
    by_name: HashMap<String, usize>,
}

impl ColumnConfig {
    /// Build a schema from column definitions, numbering columns from 1
    pub fn from_definitions(definitions: &[ColumnDefinition]) -> Result<Self, ConfigError> {
        let mut columns = Vec::with_capacity(definitions.len());
        let mut by_name = HashMap::with_capacity(definitions.len());

        for (position, definition) in definitions.iter().enumerate() {
            let name = definition.name.trim();
            if name.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "Column {} has an empty name",
                    position + 1
                )));
            }

            if by_name.insert(name.to_string(), position).is_some() {
                return Err(ConfigError::invalid(format!(
                    "Column '{}' is defined more than once",
                    name
                )));
            }

            columns.push(ColumnConfigItem {
                index: position + 1,
                name: name.to_string(),
                numeric: definition.numeric,
            });
        }

        debug!("Built column schema with {} columns", columns.len());

        Ok(Self { columns, by_name })
    }

    /// Number of configured columns (excluding the sentinel)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column configuration by 1-based index
    pub fn column_at(&self, index: usize) -> Option<&ColumnConfigItem> {
        index.checked_sub(1).and_then(|i| self.columns.get(i))
    }

    /// Iterate over configured columns in index order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnConfigItem> {
        self.columns.iter()
    }
}

impl ColumnSchema for ColumnConfig {
    fn has_column(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn column_config(&self, name: &str) -> Option<&ColumnConfigItem> {
        self.by_name.get(name).map(|&position| &self.columns[position])
    }

    fn build_columns(&self) -> Vec<DataColumn> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(DataColumn::sentinel());
        columns.extend(
            self.columns
                .iter()
                .map(|item| DataColumn::new(item.index, item.name.clone())),
        );
        columns
    }
}
