//! Format-specific derivation of time and position from a record
//!
//! Different data formats store time and position in different columns. A
//! [`RecordLayout`] tells a record where to find them and how to read them.

use super::DataRecord;
use crate::error::{ConfigError, RecordError};
use crate::schema::ColumnSchema;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Derives time and position for records of one data format
pub trait RecordLayout: fmt::Debug + Send + Sync {
    /// Timestamp of the record
    fn time(&self, record: &DataRecord) -> Result<DateTime<Utc>, RecordError>;

    /// Indices of the column(s) holding date and time
    fn date_time_columns(&self) -> BTreeSet<usize>;

    /// Index of the longitude column
    fn longitude_column(&self) -> usize;

    /// Index of the latitude column
    fn latitude_column(&self) -> usize;

    /// Longitude of the record in decimal degrees
    fn longitude(&self, record: &DataRecord) -> Result<f64, RecordError> {
        record.numeric_value_at(self.longitude_column())
    }

    /// Latitude of the record in decimal degrees
    fn latitude(&self, record: &DataRecord) -> Result<f64, RecordError> {
        record.numeric_value_at(self.latitude_column())
    }
}

/// Layout where the timestamp is spread over one or more text columns
///
/// The values of the date/time columns are joined with a single space, in the
/// configured order, and parsed with a `chrono` format string as UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampLayout {
    date_time_columns: Vec<usize>,
    format: String,
    longitude_column: usize,
    latitude_column: usize,
}

impl TimestampLayout {
    /// Build a layout from column names, resolving them against the schema
    pub fn new<S: AsRef<str>>(
        schema: &dyn ColumnSchema,
        date_time_columns: &[S],
        format: impl Into<String>,
        longitude_column: &str,
        latitude_column: &str,
    ) -> Result<Self, ConfigError> {
        if date_time_columns.is_empty() {
            return Err(ConfigError::invalid("At least one date/time column is required"));
        }

        let date_time_columns = date_time_columns
            .iter()
            .map(|name| resolve(schema, name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            date_time_columns,
            format: format.into(),
            longitude_column: resolve(schema, longitude_column)?,
            latitude_column: resolve(schema, latitude_column)?,
        })
    }

    /// The `chrono` format string used to parse timestamps
    pub fn format(&self) -> &str {
        &self.format
    }
}

fn resolve(schema: &dyn ColumnSchema, name: &str) -> Result<usize, ConfigError> {
    schema
        .column_config(name)
        .map(|item| item.index())
        .ok_or_else(|| ConfigError::invalid(format!("Layout column '{}' does not exist", name)))
}

impl RecordLayout for TimestampLayout {
    fn time(&self, record: &DataRecord) -> Result<DateTime<Utc>, RecordError> {
        let parts = self
            .date_time_columns
            .iter()
            .map(|&index| record.value_at(index).map(str::trim))
            .collect::<Result<Vec<_>, _>>()?;
        let value = parts.join(" ");

        let naive = NaiveDateTime::parse_from_str(&value, &self.format).map_err(|source| {
            RecordError::InvalidTime {
                line_number: record.line_number(),
                value: value.clone(),
                format: self.format.clone(),
                source,
            }
        })?;

        Ok(Utc.from_utc_datetime(&naive))
    }

    fn date_time_columns(&self) -> BTreeSet<usize> {
        self.date_time_columns.iter().copied().collect()
    }

    fn longitude_column(&self) -> usize {
        self.longitude_column
    }

    fn latitude_column(&self) -> usize {
        self.latitude_column
    }
}
