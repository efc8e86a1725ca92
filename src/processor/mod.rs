//! Sequencing of QC routines over a batch of records.
//!
//! The processor owns the configured routines and runs them one after another
//! over the same ordered batch. Routines run in configuration order, so later
//! routines see the messages and flags raised by earlier ones. The first
//! routine that fails aborts the batch; messages already added stay attached.

#[cfg(test)]
pub mod tests;

use crate::config::QcConfig;
use crate::error::{QcError, Result};
use crate::record::DataRecord;
use crate::routine::{Routine, RoutineRegistry};
use crate::schema::ColumnSchema;
use crate::stats::ProcessingStats;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs an ordered sequence of initialised routines
#[derive(Debug, Default)]
pub struct QcProcessor {
    routines: Vec<Box<dyn Routine>>,
}

impl QcProcessor {
    /// Create a processor with no routines
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and initialise every routine named in the configuration
    pub fn from_config(
        config: &QcConfig,
        schema: &dyn ColumnSchema,
        registry: &RoutineRegistry,
    ) -> Result<Self> {
        let mut processor = Self::new();

        for routine_config in &config.routines {
            let mut routine = registry.create(&routine_config.name)?;
            routine
                .initialise(&routine_config.parameters, schema)
                .map_err(|source| QcError::routine(&routine_config.name, source))?;
            processor.add_routine(routine);
        }

        if processor.is_empty() {
            warn!("No QC routines configured");
        }

        Ok(processor)
    }

    /// Append an initialised routine to the sequence
    pub fn add_routine(&mut self, routine: Box<dyn Routine>) {
        debug!("Adding routine '{}'", routine.name());
        self.routines.push(routine);
    }

    /// Names of the routines in the order they run
    pub fn routine_names(&self) -> Vec<&str> {
        self.routines.iter().map(|routine| routine.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    /// Run every routine over the batch, in order
    pub fn process(&self, records: &mut [DataRecord]) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        info!(
            "Running {} routines over {} records",
            self.routines.len(),
            records.len()
        );

        for routine in &self.routines {
            debug!("Running routine '{}'", routine.name());
            routine
                .process_records(records)
                .map_err(|source| QcError::routine(routine.name(), source))?;
        }

        let stats = ProcessingStats::from_records(records, self.routines.len());
        info!(
            "QC complete in {}ms: {}",
            start_time.elapsed().as_millis(),
            stats.summary()
        );

        Ok(stats)
    }
}
