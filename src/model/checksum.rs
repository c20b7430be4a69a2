//! Session-level integrity signature
//!
//! Modern rippers append a signature over the log body so tampering can
//! be detected. EAC and XLD use proprietary schemes whose recomputation
//! is out of core scope — their signatures are extracted verbatim with
//! `Integrity::Unknown`. whipper appends a plain SHA-256 of the log up
//! to the hash line, which the whipper grammar recomputes and compares.

use serde::{Deserialize, Serialize};

/// Outcome of comparing a claimed hash against a recomputed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Integrity {
    Match,
    Mismatch,
    #[default]
    Unknown,
}

/// The signature claimed by the log and, where the scheme is open, the
/// recomputed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Checksum {
    /// Recomputed signature, empty when the scheme cannot be recomputed
    pub calculated: String,
    /// Signature as claimed in the log, empty when absent
    pub log: String,
    pub integrity: Integrity,
}

impl Checksum {
    /// A signature present in the log but not recomputable.
    pub fn from_log_only(log: String) -> Self {
        Self {
            calculated: String::new(),
            log,
            integrity: Integrity::Unknown,
        }
    }

    /// Compare a claimed signature against a recomputed one.
    /// Case-insensitive, since rippers are inconsistent about hex case.
    pub fn compared(calculated: String, log: String) -> Self {
        let integrity = if calculated.is_empty() || log.is_empty() {
            Integrity::Unknown
        } else if calculated.eq_ignore_ascii_case(&log) {
            Integrity::Match
        } else {
            Integrity::Mismatch
        };
        Self {
            calculated,
            log,
            integrity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compared_match_ignores_case() {
        let c = Checksum::compared("ABCD".into(), "abcd".into());
        assert_eq!(c.integrity, Integrity::Match);
    }

    #[test]
    fn test_compared_mismatch() {
        let c = Checksum::compared("ABCD".into(), "EF01".into());
        assert_eq!(c.integrity, Integrity::Mismatch);
    }

    #[test]
    fn test_missing_side_is_unknown() {
        assert_eq!(Checksum::compared(String::new(), "abcd".into()).integrity, Integrity::Unknown);
        assert_eq!(Checksum::from_log_only("abcd".into()).integrity, Integrity::Unknown);
    }
}
