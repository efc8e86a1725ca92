use super::*;
use crate::flag::Flag;
use crate::test_support::*;

#[test]
fn test_builtin_registry_creates_constant_value() {
    let registry = RoutineRegistry::with_builtin_routines();

    assert!(registry.contains("ConstantValue"));
    assert_eq!(registry.names(), vec!["ConstantValue"]);

    let routine = registry.create("ConstantValue").unwrap();
    assert_eq!(routine.name(), "ConstantValue");
}

#[test]
fn test_unknown_routine() {
    let registry = RoutineRegistry::with_builtin_routines();

    match registry.create("RangeCheck") {
        Err(QcError::UnknownRoutine { name }) => assert_eq!(name, "RangeCheck"),
        other => panic!("Expected UnknownRoutine error, got {:?}", other),
    }
}

#[test]
fn test_created_routines_are_independent() {
    let registry = RoutineRegistry::with_builtin_routines();
    let schema = create_test_schema();

    let mut first = registry.create("ConstantValue").unwrap();
    first
        .initialise(&["sst".to_string(), "30".to_string()], &schema)
        .unwrap();
    let mut second = registry.create("ConstantValue").unwrap();
    second
        .initialise(&["longitude".to_string(), "60".to_string()], &schema)
        .unwrap();

    assert!(format!("{:?}", first).contains("sst"));
    assert!(format!("{:?}", second).contains("longitude"));
}

#[test]
fn test_add_message_wraps_missing_column() {
    let mut record = create_test_record(11, 0, "12.5");
    let message = DummyMessage::for_index(11, 42, "missing", Flag::Bad, "", "");

    let error = add_message(&mut record, message).unwrap_err();

    let chain = error.cause_chain();
    assert!(chain[0].contains("Dummy"));
    assert!(chain[0].contains("line 11"));
    assert_eq!(chain[1], "Line 11: no column with index 42");
    assert!(record.messages().is_empty());
}

#[test]
fn test_add_message_attaches() {
    let mut record = create_test_record(1, 0, "12.5");
    add_message(
        &mut record,
        DummyMessage::for_index(1, SST_COLUMN, "sst", Flag::Questionable, "12.5", ""),
    )
    .unwrap();

    assert!(record.has_questionable());
}

#[test]
fn test_check_parameter_count() {
    let parameters = vec!["a".to_string()];

    assert!(check_parameter_count(&parameters, &["name"]).is_ok());

    let error = check_parameter_count(&parameters, &["columnName", "maxDuration"]).unwrap_err();
    assert_eq!(
        error.message(),
        "Incorrect number of parameters. Must be <columnName>,<maxDuration>"
    );
}
