//! Statistics for a QC run over one batch of records

use crate::message::MessageKey;
use crate::record::DataRecord;
use std::collections::HashMap;

/// Outcome of running the QC routines over a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingStats {
    /// Number of records in the batch
    pub records: usize,
    /// Number of routines that ran to completion
    pub routines_run: usize,
    /// Total messages attached across all records
    pub messages: usize,
    /// Records with at least one questionable message
    pub questionable_records: usize,
    /// Records with at least one bad message
    pub bad_records: usize,
    /// Message counts grouped by message type and columns
    pub findings: HashMap<MessageKey, usize>,
}

impl ProcessingStats {
    /// Create new empty processing statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from the current state of a batch
    pub fn from_records(records: &[DataRecord], routines_run: usize) -> Self {
        let mut stats = Self {
            routines_run,
            ..Self::default()
        };
        for record in records {
            stats.add_record(record);
        }
        stats
    }

    /// Count one record and its messages
    pub fn add_record(&mut self, record: &DataRecord) {
        self.records += 1;
        self.messages += record.messages().len();

        if record.has_questionable() {
            self.questionable_records += 1;
        }
        if record.has_bad() {
            self.bad_records += 1;
        }

        for message in record.messages() {
            *self.findings.entry(message.message_key()).or_insert(0) += 1;
        }
    }

    /// Number of messages grouped under a key
    pub fn findings_for(&self, key: &MessageKey) -> usize {
        self.findings.get(key).copied().unwrap_or(0)
    }

    /// Percentage of records with at least one bad message
    pub fn bad_rate(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            (self.bad_records as f64 / self.records as f64) * 100.0
        }
    }

    /// Findings sorted by key, for stable reporting
    pub fn sorted_findings(&self) -> Vec<(&MessageKey, usize)> {
        let mut findings: Vec<(&MessageKey, usize)> =
            self.findings.iter().map(|(key, &count)| (key, count)).collect();
        findings.sort_by(|a, b| a.0.cmp(b.0));
        findings
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} records, {} routines, {} messages ({} records questionable, {} records bad)",
            self.records,
            self.routines_run,
            self.messages,
            self.questionable_records,
            self.bad_records
        )
    }
}
