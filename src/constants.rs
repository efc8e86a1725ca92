//! Constants shared across the QC framework
//!
//! Flag codes, sentinel indices and the delimiters of the rebuild code grammar
//! live here so that encoders, decoders and records agree on them.

// =============================================================================
// Column Sentinels
// =============================================================================

/// Index of the reserved sentinel column at the start of every record.
///
/// Real columns are numbered from 1. A message whose column set contains this
/// index does not refer to a specific column and never changes a column flag.
pub const NO_COLUMN_INDEX: usize = 0;

/// Name carried by the sentinel column. Never matched by name lookups.
pub const SENTINEL_COLUMN_NAME: &str = "";

/// Line number of a message that applies to the whole input rather than one line.
///
/// Input lines are numbered from 1.
pub const NO_LINE_NUMBER: usize = 0;

// =============================================================================
// Flag Codes
// =============================================================================

/// Numeric flag codes used when flags are persisted (WOCE convention)
pub mod flag_codes {
    /// Value passed all checks
    pub const GOOD: i8 = 2;

    /// Value is questionable and should be reviewed
    pub const QUESTIONABLE: i8 = 3;

    /// Value is bad and should not be used
    pub const BAD: i8 = 4;
}

// =============================================================================
// Rebuild Code Grammar
// =============================================================================

/// Delimiters for the rebuild code text grammar
///
/// ```text
/// codes   := token (';' token)*
/// token   := tag '|' line '|' flag '|' indices '|' names '|' field '|' valid
/// indices := count ':' [index (',' index)*]
/// names   := count ':' [name (',' name)*]
/// ```
pub mod rebuild_grammar {
    /// Separates message tokens in a persisted string
    pub const TOKEN_DELIMITER: char = ';';

    /// Separates the fields of a single token
    pub const FIELD_DELIMITER: char = '|';

    /// Separates the members of a column index or column name set
    pub const LIST_DELIMITER: char = ',';

    /// Separates a set's member count from its members
    pub const COUNT_SEPARATOR: char = ':';

    /// Escapes a delimiter or itself inside a value
    pub const ESCAPE: char = '\\';

    /// Number of fields in one token
    pub const FIELD_COUNT: usize = 7;

    /// Characters that must be escaped inside values
    pub const RESERVED: &[char] = &[ESCAPE, TOKEN_DELIMITER, FIELD_DELIMITER, LIST_DELIMITER];
}

// =============================================================================
// Message Text
// =============================================================================

/// Separator between short message texts in a record summary
pub const SUMMARY_SEPARATOR: &str = "; ";

/// Separator used when a message's column names are shown as one string
pub const COLUMN_NAME_SEPARATOR: &str = "|";

/// Human-readable description of a flag code
pub fn flag_code_description(code: i8) -> &'static str {
    match code {
        flag_codes::GOOD => "Good - passed all QC checks",
        flag_codes::QUESTIONABLE => "Questionable - should be reviewed",
        flag_codes::BAD => "Bad - should not be used",
        _ => "Unknown flag code",
    }
}

// =============================================================================
// Configuration Defaults
// =============================================================================

/// `chrono` format used to parse record timestamps when none is configured
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_code_descriptions() {
        assert_eq!(
            flag_code_description(flag_codes::GOOD),
            "Good - passed all QC checks"
        );
        assert_eq!(
            flag_code_description(flag_codes::BAD),
            "Bad - should not be used"
        );
        assert_eq!(flag_code_description(99), "Unknown flag code");
    }

    #[test]
    fn test_grammar_delimiters_are_distinct() {
        use rebuild_grammar::*;

        assert_ne!(TOKEN_DELIMITER, FIELD_DELIMITER);
        assert_ne!(FIELD_DELIMITER, LIST_DELIMITER);
        assert_ne!(TOKEN_DELIMITER, LIST_DELIMITER);
        assert!(RESERVED.contains(&ESCAPE));
    }
}
