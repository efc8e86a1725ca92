//! Detection of values that stay constant for too long
//!
//! A stuck sensor often reports the same value over and over. This routine
//! scans the batch for runs of consecutive records whose target column holds
//! numerically identical values and flags every record of a run as bad when
//! the run spans more than the configured number of minutes.
//!
//! Only runs of more than two records are considered. Instruments sampling
//! hourly can legitimately report the same value twice in a row, which would
//! otherwise always trip a short limit.
//!
//! # Parameters
//!
//! 1. Name of the column to check. Must be numeric.
//! 2. Maximum duration in minutes. Must be a positive integer.

mod message;


pub use message::ConstantValueMessage;

use super::{Routine, add_message, check_parameter_count};
use crate::error::{RecordError, RoutineError};
use crate::flag::Flag;
use crate::message::MessageType;
use crate::record::DataRecord;
use crate::schema::ColumnSchema;
use tracing::debug;

/// Flags runs of constant values that last longer than a limit
#[derive(Debug, Clone, Default)]
pub struct ConstantValueRoutine {
    /// Column to check
    column_name: String,

    /// Longest allowed run, in minutes
    max_duration: i64,
}

impl ConstantValueRoutine {
    pub const NAME: &'static str = "ConstantValue";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn max_duration(&self) -> i64 {
        self.max_duration
    }

    fn value(&self, record: &DataRecord) -> Result<f64, RoutineError> {
        record.numeric_value(&self.column_name).map_err(|source| {
            RoutineError::with_source(
                format!(
                    "Cannot compare values of column '{}' on line {}",
                    self.column_name,
                    record.line_number()
                ),
                source,
            )
        })
    }

    /// Flag every record of a run if it lasted too long
    fn check_duration(&self, run: &mut [DataRecord]) -> Result<(), RoutineError> {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            return Ok(());
        };
        if run.len() <= 2 {
            return Ok(());
        }

        let start = first.time().map_err(|source| self.time_error(first, source))?;
        let end = last.time().map_err(|source| self.time_error(last, source))?;
        let minutes = (end - start).num_seconds() as f64 / 60.0;

        if minutes <= self.max_duration as f64 {
            return Ok(());
        }

        debug!(
            "Column '{}' constant for {} minutes from line {} to line {} (limit {})",
            self.column_name,
            minutes,
            first.line_number(),
            last.line_number(),
            self.max_duration
        );

        for record in run.iter_mut() {
            let line_number = record.line_number();
            let column = record.column(&self.column_name).map_err(|source| {
                RoutineError::with_source(
                    format!("Could not find column '{}' in record", self.column_name),
                    source,
                )
            })?;
            let message = ConstantValueMessage::for_column_with_value(
                line_number,
                column,
                Flag::Bad,
                minutes.to_string(),
                self.max_duration.to_string(),
            );
            add_message(record, message)?;
        }

        Ok(())
    }

    fn time_error(&self, record: &DataRecord, source: RecordError) -> RoutineError {
        RoutineError::with_source(
            format!("Cannot read time of record on line {}", record.line_number()),
            source,
        )
    }
}

impl Routine for ConstantValueRoutine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialise(
        &mut self,
        parameters: &[String],
        schema: &dyn ColumnSchema,
    ) -> Result<(), RoutineError> {
        check_parameter_count(parameters, &["columnName", "maxDuration"])?;

        let column_name = &parameters[0];
        let column = schema
            .column_config(column_name)
            .ok_or_else(|| RoutineError::new(format!("Column '{}' does not exist", column_name)))?;
        if !column.is_numeric() {
            return Err(RoutineError::new(format!(
                "Column '{}' must be numeric",
                column_name
            )));
        }

        let max_duration = parameters[1].trim().parse::<i64>().map_err(|source| {
            RoutineError::with_source("Max duration parameter must be an integer", source)
        })?;
        if max_duration <= 0 {
            return Err(RoutineError::new("Max duration must be greater than zero"));
        }

        self.column_name = column_name.clone();
        self.max_duration = max_duration;

        debug!(
            "Initialised {} routine on column '{}' with limit of {} minutes",
            Self::NAME,
            self.column_name,
            self.max_duration
        );

        Ok(())
    }

    fn process_records(&self, records: &mut [DataRecord]) -> Result<(), RoutineError> {
        let mut run_start = 0;
        let mut run_value: Option<f64> = None;

        // Values are only parsed once there is a neighbour to compare with
        for position in 1..records.len() {
            let constant = match run_value {
                Some(constant) => constant,
                None => self.value(&records[run_start])?,
            };
            let value = self.value(&records[position])?;

            if value == constant {
                run_value = Some(constant);
            } else {
                self.check_duration(&mut records[run_start..position])?;
                run_start = position;
                run_value = Some(value);
            }
        }

        // The run still open at the end of the batch is evaluated too
        self.check_duration(&mut records[run_start..])
    }
}
