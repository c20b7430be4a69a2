//! Per-track extraction results
//!
//! Each extracted track (or a whole range, for range rips) carries its
//! filenames, peak level, test/copy hashes, the ripper's error tallies,
//! and any AccurateRip verdicts printed for it.

use serde::{Deserialize, Serialize};

use crate::model::checksum::Integrity;
use crate::time::Time;

// ─── Test and Copy ──────────────────────────────────────────────────

/// The two-pass verification hashes for one track. Both empty when the
/// rip was single-pass. XLD additionally prints a variant computed with
/// null samples skipped, carried in the `_skipzero` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TestAndCopy {
    pub test_hash: String,
    pub copy_hash: String,
    pub test_hash_skipzero: String,
    pub copy_hash_skipzero: String,
    pub integrity: Integrity,
    pub integrity_skipzero: Integrity,
}

/// Either side missing leaves the verdict open; hex case is not
/// significant.
fn compare_hashes(test: &str, copy: &str) -> Integrity {
    if test.is_empty() || copy.is_empty() {
        Integrity::Unknown
    } else if test.eq_ignore_ascii_case(copy) {
        Integrity::Match
    } else {
        Integrity::Mismatch
    }
}

impl TestAndCopy {
    pub fn new(test_hash: String, copy_hash: String) -> Self {
        let integrity = compare_hashes(&test_hash, &copy_hash);
        Self {
            test_hash,
            copy_hash,
            integrity,
            ..Self::default()
        }
    }

    pub fn with_skipzero(
        test_hash: String,
        copy_hash: String,
        test_hash_skipzero: String,
        copy_hash_skipzero: String,
    ) -> Self {
        let integrity = compare_hashes(&test_hash, &copy_hash);
        let integrity_skipzero = compare_hashes(&test_hash_skipzero, &copy_hash_skipzero);
        Self {
            test_hash,
            copy_hash,
            test_hash_skipzero,
            copy_hash_skipzero,
            integrity,
            integrity_skipzero,
        }
    }

    pub fn copy_only(copy_hash: String) -> Self {
        Self {
            copy_hash,
            ..Self::default()
        }
    }
}

// ─── Error Tallies ──────────────────────────────────────────────────

/// One contiguous span the ripper flagged, in track-relative time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackErrorRange {
    pub start: Time,
    pub length: Time,
}

impl TrackErrorRange {
    pub fn new(start: Time, length: Time) -> Self {
        Self { start, length }
    }

    /// A bare position with no reported extent.
    pub fn at(start: Time) -> Self {
        Self {
            start,
            length: Time::default(),
        }
    }
}

/// Count plus the flagged spans for one error category. The count is
/// authoritative; ranges are kept only when the log itemizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackErrorData {
    pub count: u32,
    pub ranges: Vec<TrackErrorRange>,
}

impl TrackErrorData {
    pub fn from_count(count: u32) -> Self {
        Self {
            count,
            ranges: Vec::new(),
        }
    }

    pub fn from_ranges(ranges: Vec<TrackErrorRange>) -> Self {
        Self {
            count: ranges.len() as u32,
            ranges,
        }
    }
}

/// Every error category a grammar can report for a track. Categories a
/// ripper family never prints stay at their zero default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackError {
    pub read: TrackErrorData,
    pub skip: TrackErrorData,
    pub jitter_generic: TrackErrorData,
    pub jitter_edge: TrackErrorData,
    pub jitter_atom: TrackErrorData,
    pub drift: TrackErrorData,
    pub dropped: TrackErrorData,
    pub duplicated: TrackErrorData,
    pub damaged_sectors: TrackErrorData,
    pub inconsistent_err_sectors: TrackErrorData,
    pub missing_samples: TrackErrorData,
}

// ─── AccurateRip ────────────────────────────────────────────────────

/// AccurateRip verdict for one track in one database pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccurateRipStatus {
    Match,
    Mismatch,
    /// Matched only after applying a different pressing offset
    Offsetted,
    NotFound,
    #[default]
    Disabled,
}

/// Submission count behind a verdict. Some layouts print the total for
/// one database version, others across all versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccurateRipConfidenceTotal {
    All(u32),
    Version(u32),
}

/// Offset the verdict applies at, relative to this rip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccurateRipOffset {
    #[default]
    Same,
    /// Different pressing; the value is absent when the log does not
    /// print it
    Different(Option<i32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccurateRipConfidence {
    pub matching: Option<u32>,
    pub total: Option<AccurateRipConfidenceTotal>,
    pub offset: AccurateRipOffset,
}

/// One AccurateRip result line for a track. A track accumulates one
/// unit per database version or pressing the log reports against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccurateRipUnit {
    pub version: Option<u8>,
    pub sign: AccurateRipStatus,
    pub offset_sign: AccurateRipStatus,
    pub status: AccurateRipStatus,
    pub confidence: Option<AccurateRipConfidence>,
}

impl AccurateRipUnit {
    pub fn new(version: Option<u8>, status: AccurateRipStatus) -> Self {
        Self {
            version,
            sign: status,
            offset_sign: status,
            status,
            confidence: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, AccurateRipStatus::Disabled)
    }
}

// ─── Track Entry ────────────────────────────────────────────────────

/// Everything a log claims about one extracted track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrackEntry {
    pub num: u8,
    /// True when this entry covers a whole extracted range, not a
    /// single track
    pub is_range: bool,
    pub aborted: bool,
    pub filenames: Vec<String>,
    pub peak_level: Option<f64>,
    pub pregap_length: Option<Time>,
    pub extraction_speed: Option<f64>,
    pub gain: Option<f64>,
    pub preemphasis: Option<bool>,
    pub test_and_copy: TestAndCopy,
    pub errors: TrackError,
    pub ar_info: Vec<AccurateRipUnit>,
}

impl TrackEntry {
    pub fn new(num: u8) -> Self {
        Self {
            num,
            ..Self::default()
        }
    }

    pub fn range() -> Self {
        Self {
            is_range: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_and_copy_match() {
        let tc = TestAndCopy::new("1A2B3C4D".into(), "1a2b3c4d".into());
        assert_eq!(tc.integrity, Integrity::Match);
    }

    #[test]
    fn test_test_and_copy_mismatch() {
        let tc = TestAndCopy::new("1A2B3C4D".into(), "FFFFFFFF".into());
        assert_eq!(tc.integrity, Integrity::Mismatch);
    }

    #[test]
    fn test_copy_only_is_unknown() {
        let tc = TestAndCopy::copy_only("1A2B3C4D".into());
        assert_eq!(tc.integrity, Integrity::Unknown);
        assert!(tc.test_hash.is_empty());
    }

    #[test]
    fn test_error_data_from_ranges_counts() {
        let data = TrackErrorData::from_ranges(vec![
            TrackErrorRange::at(Time::from_millis(0)),
            TrackErrorRange::at(Time::from_millis(500)),
        ]);
        assert_eq!(data.count, 2);
    }

    #[test]
    fn test_default_track_has_no_errors() {
        let track = TrackEntry::new(3);
        assert_eq!(track.num, 3);
        assert_eq!(track.errors.read.count, 0);
        assert!(!track.is_range);
        assert!(!track.aborted);
    }
}
