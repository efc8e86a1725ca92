//! Test fixtures shared by the unit tests of every module

use crate::flag::Flag;
use crate::message::{MessageFields, MessageType, QcMessage};
use crate::record::{DataRecord, RecordLayout, TimestampLayout};
use crate::schema::{ColumnConfig, ColumnDefinition};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

/// Column layout of the test schema: date, time, longitude, latitude, sst, comment
pub const DATE_COLUMN: usize = 1;
pub const TIME_COLUMN: usize = 2;
pub const LONGITUDE_COLUMN: usize = 3;
pub const LATITUDE_COLUMN: usize = 4;
pub const SST_COLUMN: usize = 5;
pub const COMMENT_COLUMN: usize = 6;

/// Message type used to exercise behaviour that is not specific to a routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyMessage {
    fields: MessageFields,
}

impl QcMessage for DummyMessage {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn full_message(&self) -> String {
        if self.has_line_number() {
            format!(
                "This is a dummy message for column '{}' on line {}",
                self.column_names_joined(),
                self.fields.line_number
            )
        } else {
            format!(
                "This is a dummy message for column '{}' across the whole file",
                self.column_names_joined()
            )
        }
    }

    fn short_message(&self) -> String {
        "Dummy message".to_string()
    }
}

impl MessageType for DummyMessage {
    const TAG: &'static str = "Dummy";

    fn from_fields(fields: MessageFields) -> Self {
        Self { fields }
    }
}

/// A second test message type with the same shape as [`DummyMessage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherDummyMessage {
    fields: MessageFields,
}

impl QcMessage for OtherDummyMessage {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn full_message(&self) -> String {
        format!("Other dummy message on line {}", self.fields.line_number)
    }

    fn short_message(&self) -> String {
        "Other dummy".to_string()
    }
}

impl MessageType for OtherDummyMessage {
    const TAG: &'static str = "OtherDummy";

    fn from_fields(fields: MessageFields) -> Self {
        Self { fields }
    }
}

/// Create the test schema
pub fn create_test_schema() -> ColumnConfig {
    ColumnConfig::from_definitions(&[
        ColumnDefinition::new("date", false),
        ColumnDefinition::new("time", false),
        ColumnDefinition::new("longitude", true),
        ColumnDefinition::new("latitude", true),
        ColumnDefinition::new("sst", true),
        ColumnDefinition::new("comment", false),
    ])
    .unwrap()
}

/// Create the layout matching the test schema
pub fn create_test_layout() -> Arc<dyn RecordLayout> {
    let schema = create_test_schema();
    Arc::new(
        TimestampLayout::new(
            &schema,
            &["date", "time"],
            "%Y-%m-%d %H:%M:%S",
            "longitude",
            "latitude",
        )
        .unwrap(),
    )
}

/// Create a record observed `minutes` after 2023-06-15 12:00:00 UTC with the given sst value
pub fn create_test_record(line_number: usize, minutes: i64, sst: &str) -> DataRecord {
    let time = Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).unwrap() + Duration::minutes(minutes);
    let date = time.format("%Y-%m-%d").to_string();
    let clock = time.format("%H:%M:%S").to_string();

    DataRecord::with_values(
        line_number,
        &create_test_schema(),
        create_test_layout(),
        &[date.as_str(), clock.as_str(), "-4.15", "50.36", sst, "ok"],
    )
    .unwrap()
}

/// Create one record per (minutes, sst) pair, numbering lines from 1
pub fn create_test_batch(samples: &[(i64, &str)]) -> Vec<DataRecord> {
    samples
        .iter()
        .enumerate()
        .map(|(i, (minutes, sst))| create_test_record(i + 1, *minutes, sst))
        .collect()
}

/// Create a dummy message against a single test column
pub fn create_dummy_message(line_number: usize, column: usize, flag: Flag) -> Arc<dyn QcMessage> {
    let schema = create_test_schema();
    let name = schema.column_at(column).map(|c| c.name().to_string()).unwrap_or_default();
    Arc::new(DummyMessage::for_index(
        line_number,
        column,
        name,
        flag,
        "value",
        "",
    ))
}

/// Send log output to the test harness
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
