//! Integration tests for the full QC pipeline
//!
//! Configuration is loaded from a TOML file, records are built from raw
//! values, the configured routines run over the batch, and the resulting
//! messages are persisted as rebuild codes and restored onto fresh records.

use qc_routines::{
    ColumnSchema, ConstantValueMessage, DataRecord, Flag, MessageRegistry, MessageType,
    QcConfig, QcError, QcMessage, QcProcessor, RecordLayout, RoutineRegistry, TimestampLayout,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[[columns]]
name = "date"

[[columns]]
name = "time"

[[columns]]
name = "lon"
numeric = true

[[columns]]
name = "lat"
numeric = true

[[columns]]
name = "sst"
numeric = true

[[columns]]
name = "salinity"
numeric = true

[layout]
date_time_columns = ["date", "time"]
date_time_format = "%d/%m/%Y %H:%M"
longitude_column = "lon"
latitude_column = "lat"

[[routines]]
name = "ConstantValue"
parameters = ["sst", "30"]

[[routines]]
name = "ConstantValue"
parameters = ["salinity", "15"]
"#;

/// (time, sst, salinity) for each row of the test cruise
const ROWS: &[(&str, &str, &str)] = &[
    ("10:00", "18.2", "35.1"),
    ("10:10", "18.2", "35.1"),
    ("10:20", "18.2", "35.1"),
    ("10:30", "18.2", "35.2"),
    ("10:40", "18.2", "35.3"),
    ("10:50", "18.4", "35.4"),
];

fn load_config() -> QcConfig {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    QcConfig::from_file(file.path()).unwrap()
}

fn build_records(
    schema: &dyn ColumnSchema,
    layout: &Arc<TimestampLayout>,
) -> Vec<DataRecord> {
    ROWS.iter()
        .enumerate()
        .map(|(i, &(time, sst, salinity))| {
            DataRecord::with_values(
                i + 2,
                schema,
                layout.clone(),
                &["15/06/2023", time, "-4.15", "50.36", sst, salinity],
            )
            .unwrap()
        })
        .collect()
}

#[test]
fn test_pipeline_flags_constant_runs() {
    let config = load_config();
    let schema = config.column_config().unwrap();
    let layout = Arc::new(config.timestamp_layout(&schema).unwrap());
    let processor =
        QcProcessor::from_config(&config, &schema, &RoutineRegistry::with_builtin_routines())
            .unwrap();
    let mut records = build_records(&schema, &layout);

    let stats = processor.process(&mut records).unwrap();

    assert_eq!(stats.records, 6);
    assert_eq!(stats.routines_run, 2);

    // sst is constant for 40 minutes over the first five rows
    for record in &records[..5] {
        assert_eq!(record.column("sst").unwrap().flag(), Flag::Bad);
    }
    assert_eq!(records[5].column("sst").unwrap().flag(), Flag::Good);

    // salinity is constant for 20 minutes over the first three rows
    for record in &records[..3] {
        assert_eq!(record.column("salinity").unwrap().flag(), Flag::Bad);
    }
    for record in &records[3..] {
        assert_eq!(record.column("salinity").unwrap().flag(), Flag::Good);
    }

    assert_eq!(records[0].messages().len(), 2);
    assert_eq!(
        records[0].message_summaries(),
        "sst constant for too long; salinity constant for too long"
    );
    assert_eq!(stats.messages, 8);
    assert_eq!(stats.bad_records, 5);
    assert_eq!(stats.findings.len(), 2);

    let message = &records[4].messages()[0];
    assert_eq!(message.tag(), ConstantValueMessage::TAG);
    assert_eq!(message.line_number(), 6);
    assert_eq!(message.field_value(), "40");
    assert_eq!(message.valid_value(), "30");
}

#[test]
fn test_results_survive_persistence() {
    let config = load_config();
    let schema = config.column_config().unwrap();
    let layout = Arc::new(config.timestamp_layout(&schema).unwrap());
    let processor =
        QcProcessor::from_config(&config, &schema, &RoutineRegistry::with_builtin_routines())
            .unwrap();
    let mut records = build_records(&schema, &layout);
    processor.process(&mut records).unwrap();

    let stored: Vec<String> = records.iter().map(DataRecord::rebuild_codes).collect();
    assert!(stored[5].is_empty());

    let registry = MessageRegistry::with_builtin_messages();
    let mut restored = build_records(&schema, &layout);
    for (record, codes) in restored.iter_mut().zip(&stored) {
        record.set_messages_from_codes(codes, &registry).unwrap();
    }

    for (original, restored) in records.iter().zip(&restored) {
        assert_eq!(original.messages().len(), restored.messages().len());
        for (a, b) in original.messages().iter().zip(restored.messages()) {
            assert!(**a == **b);
            assert_eq!(a.full_message(), b.full_message());
        }
        for (a, b) in original.columns().iter().zip(restored.columns()) {
            assert_eq!(a.flag(), b.flag());
        }
        assert_eq!(original.has_bad(), restored.has_bad());
    }
}

#[test]
fn test_layout_derives_time_and_position() {
    let config = load_config();
    let schema = config.column_config().unwrap();
    let layout = Arc::new(config.timestamp_layout(&schema).unwrap());
    let records = build_records(&schema, &layout);

    let time = records[1].time().unwrap();
    assert_eq!(time.to_rfc3339(), "2023-06-15T10:10:00+00:00");
    assert_eq!(records[1].longitude().unwrap(), -4.15);
    assert_eq!(records[1].latitude().unwrap(), 50.36);
    assert_eq!(layout.date_time_columns().len(), 2);
}

#[test]
fn test_invalid_routine_parameters_are_reported() {
    let config = load_config();
    let mut broken = config.clone();
    broken.routines[1].parameters = vec!["salinity".to_string(), "soon".to_string()];
    let schema = broken.column_config().unwrap();

    let error =
        QcProcessor::from_config(&broken, &schema, &RoutineRegistry::with_builtin_routines())
            .unwrap_err();

    match error {
        QcError::Routine { routine, source } => {
            assert_eq!(routine, "ConstantValue");
            assert_eq!(
                source.message(),
                "Max duration parameter must be an integer"
            );
            assert_eq!(source.cause_chain().len(), 2);
        }
        other => panic!("Expected Routine error, got {:?}", other),
    }
}
