//! Tests for the QC processor
//!
//! Covers building the routine sequence from configuration and running it
//! over batches, including failure handling.


use crate::config::{LayoutConfig, QcConfig, RoutineConfig};
use crate::schema::ColumnDefinition;

/// Configuration matching the shared test schema with the given routines
pub fn create_test_config(routines: Vec<RoutineConfig>) -> QcConfig {
    QcConfig {
        columns: vec![
            ColumnDefinition::new("date", false),
            ColumnDefinition::new("time", false),
            ColumnDefinition::new("longitude", true),
            ColumnDefinition::new("latitude", true),
            ColumnDefinition::new("sst", true),
            ColumnDefinition::new("comment", false),
        ],
        layout: LayoutConfig {
            date_time_columns: vec!["date".to_string(), "time".to_string()],
            date_time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            longitude_column: "longitude".to_string(),
            latitude_column: "latitude".to_string(),
        },
        routines,
    }
}
