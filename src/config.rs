//! Configuration management and validation.
//!
//! A QC run is described by one TOML document holding the column schema, the
//! layout used to derive time and position from records, and the ordered list
//! of routines to run:
//!
//! ```toml
//! [[columns]]
//! name = "date"
//!
//! [[columns]]
//! name = "sst"
//! numeric = true
//!
//! [layout]
//! date_time_columns = ["date", "time"]
//! date_time_format = "%Y-%m-%d %H:%M:%S"
//! longitude_column = "longitude"
//! latitude_column = "latitude"
//!
//! [[routines]]
//! name = "ConstantValue"
//! parameters = ["sst", "30"]
//! ```

use crate::constants::DEFAULT_DATE_TIME_FORMAT;
use crate::error::ConfigError;
use crate::record::TimestampLayout;
use crate::schema::{ColumnConfig, ColumnDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Where time and position are found in each record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Columns whose values, joined with a space, form the timestamp
    pub date_time_columns: Vec<String>,

    /// `chrono` format of the joined timestamp
    #[serde(default = "default_date_time_format")]
    pub date_time_format: String,

    pub longitude_column: String,

    pub latitude_column: String,
}

fn default_date_time_format() -> String {
    DEFAULT_DATE_TIME_FORMAT.to_string()
}

/// One routine in the QC sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineConfig {
    /// Name the routine is registered under
    pub name: String,

    /// Ordered parameters, interpreted by the routine
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl RoutineConfig {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }
}

/// Complete QC configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcConfig {
    /// Columns in input order
    pub columns: Vec<ColumnDefinition>,

    pub layout: LayoutConfig,

    /// Routines in the order they run
    #[serde(default)]
    pub routines: Vec<RoutineConfig>,
}

impl QcConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading QC configuration from {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: QcConfig = toml::from_str(toml)?;
        config.validate()?;

        debug!(
            "Loaded configuration with {} columns and {} routines",
            config.columns.len(),
            config.routines.len()
        );

        Ok(config)
    }

    /// Add a routine to the end of the sequence
    pub fn with_routine(mut self, routine: RoutineConfig) -> Self {
        self.routines.push(routine);
        self
    }

    /// Check that the columns and layout are consistent
    ///
    /// Routine names and parameters are checked when the routines are created
    /// and initialised.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let schema = self.column_config()?;
        self.timestamp_layout(&schema)?;

        if let Some(position) = self.routines.iter().position(|r| r.name.trim().is_empty()) {
            return Err(ConfigError::invalid(format!(
                "Routine {} has an empty name",
                position + 1
            )));
        }

        Ok(())
    }

    /// Build the column schema
    pub fn column_config(&self) -> Result<ColumnConfig, ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::invalid("No columns defined"));
        }
        ColumnConfig::from_definitions(&self.columns)
    }

    /// Build the record layout against a schema
    pub fn timestamp_layout(&self, schema: &ColumnConfig) -> Result<TimestampLayout, ConfigError> {
        TimestampLayout::new(
            schema,
            &self.layout.date_time_columns,
            self.layout.date_time_format.clone(),
            &self.layout.longitude_column,
            &self.layout.latitude_column,
        )
    }
}
