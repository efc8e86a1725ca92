//! QC flag severity scale
//!
//! Flags are attached to messages and propagated onto record columns so that
//! downstream consumers can see the outcome of quality control per cell.

use crate::constants::{self, flag_codes};
use crate::error::MessageError;
use std::str::FromStr;

/// Severity of a QC outcome
///
/// Variants are declared in ascending severity, so the derived ordering is
/// the severity ordering: `Good < Questionable < Bad`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Flag {
    /// Value passed all checks. Columns start with this flag.
    #[default]
    Good = flag_codes::GOOD,

    /// Value is questionable and should be reviewed
    Questionable = flag_codes::QUESTIONABLE,

    /// Value is bad and should not be used
    Bad = flag_codes::BAD,
}

impl Flag {
    /// Return the more severe of two flags
    pub fn escalate(self, other: Flag) -> Flag {
        self.max(other)
    }

    /// Numeric code used when the flag is persisted
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Human-readable description of this flag
    pub fn description(self) -> &'static str {
        constants::flag_code_description(self.code())
    }

    /// All flags in ascending severity
    pub fn all_values() -> [Flag; 3] {
        [Flag::Good, Flag::Questionable, Flag::Bad]
    }
}

impl TryFrom<i8> for Flag {
    type Error = MessageError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            flag_codes::GOOD => Ok(Flag::Good),
            flag_codes::QUESTIONABLE => Ok(Flag::Questionable),
            flag_codes::BAD => Ok(Flag::Bad),
            _ => Err(MessageError::UnknownFlag {
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for Flag {
    type Err = MessageError;

    /// Parse a flag from its numeric code or its (case-insensitive) name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i8>() {
            return Flag::try_from(code);
        }

        match trimmed.to_lowercase().as_str() {
            "good" => Ok(Flag::Good),
            "questionable" => Ok(Flag::Questionable),
            "bad" => Ok(Flag::Bad),
            _ => Err(MessageError::UnknownFlag {
                value: s.to_string(),
            }),
        }
    }
}

impl From<Flag> for i8 {
    fn from(flag: Flag) -> Self {
        flag.code()
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_ordering_is_total_and_transitive() {
        assert!(Flag::Good < Flag::Questionable);
        assert!(Flag::Questionable < Flag::Bad);
        assert!(Flag::Good < Flag::Bad);

        for a in Flag::all_values() {
            for b in Flag::all_values() {
                // Exactly one of <, ==, > holds
                let relations = [a < b, a == b, a > b];
                assert_eq!(relations.iter().filter(|r| **r).count(), 1);
            }
        }
    }

    #[test]
    fn test_escalate_is_commutative_and_idempotent() {
        for a in Flag::all_values() {
            assert_eq!(a.escalate(a), a);
            for b in Flag::all_values() {
                assert_eq!(a.escalate(b), b.escalate(a));
                assert!(a.escalate(b) >= a);
                assert!(a.escalate(b) >= b);
            }
        }

        assert_eq!(Flag::Good.escalate(Flag::Bad), Flag::Bad);
        assert_eq!(Flag::Questionable.escalate(Flag::Good), Flag::Questionable);
    }

    #[test]
    fn test_default_flag_is_good() {
        assert_eq!(Flag::default(), Flag::Good);
    }

    #[test]
    fn test_flag_codes() {
        for flag in Flag::all_values() {
            assert_eq!(Flag::try_from(flag.code()).unwrap(), flag);
            assert_eq!(flag.to_string().parse::<Flag>().unwrap(), flag);
        }

        assert_eq!(Flag::Bad.code(), 4);
        assert!(Flag::try_from(7).is_err());
    }

    #[test]
    fn test_parse_flag_names() {
        assert_eq!("GOOD".parse::<Flag>().unwrap(), Flag::Good);
        assert_eq!(" questionable ".parse::<Flag>().unwrap(), Flag::Questionable);
        assert_eq!("Bad".parse::<Flag>().unwrap(), Flag::Bad);

        let err = "terrible".parse::<Flag>().unwrap_err();
        assert!(matches!(err, MessageError::UnknownFlag { .. }));
    }
}
