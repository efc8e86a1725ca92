//! Grouping identity of QC messages

use std::collections::BTreeSet;
use std::fmt;

/// Identifies messages raised by the same rule against the same columns
///
/// Two keys are equal when their message tags are equal and their column
/// index sets are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    tag: &'static str,
    column_indices: BTreeSet<usize>,
}

impl MessageKey {
    pub fn new(tag: &'static str, column_indices: BTreeSet<usize>) -> Self {
        Self {
            tag,
            column_indices,
        }
    }

    /// Tag of the message type
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn column_indices(&self) -> &BTreeSet<usize> {
        &self.column_indices
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<String> = self.column_indices.iter().map(usize::to_string).collect();
        write!(f, "{}[{}]", self.tag, indices.join(","))
    }
}
