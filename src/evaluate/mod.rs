//! Rule-based quality evaluation
//!
//! Each parsed segment is walked against a deduction catalog: a fixed
//! base score of 100, signed integer arithmetic, no clamping. Every
//! finding is an `EvaluationUnit` tying a score delta to a scope, a
//! field, and a human-readable message, so a verdict is always
//! auditable back to the claim that caused it.
//!
//! Scoring policies are pluggable through the `Evaluator` trait; the
//! default registry ships the Cambia profile (`rules`).

pub mod drive_db;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::parser::{ParsedLog, ParsedLogCombined};

// ─── Unit Taxonomy ──────────────────────────────────────────────────

/// Scoring policy that produced an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluatorType {
    Cambia,
    RED,
    OPS,
}

/// What a finding applies to: the whole release, or one track (range
/// rips carry no track number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationUnitScope {
    Release,
    Track(Option<u8>),
}

/// The claim a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationUnitField {
    Encoding,
    RipperVersion,
    Drive,
    Ripper,
    Offset,
    Cache,
    TestAndCopy,
    Encoder,
    Checksum,
    MediaType,
    ReadMode,
    MaxRetryCount,
    AccurateStream,
    C2,
    SilentSamples,
    NullSamples,
    Gap,
    Tag,
    Gain,
    RangeSplit,
    Samples,
    SilentBlocks,
    Normalization,
    Filename,
    ReadError,
    SkipError,
    JitterGenericError,
    JitterEdgeError,
    JitterAtomError,
    DriftError,
    DroppedError,
    DuplicatedError,
    InconsistentErrorSectors,
    DamagedSector,
    Abort,
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationUnitClass {
    Critical,
    Bad,
    Neutral,
    Good,
    Perfect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationUnitData {
    pub scope: EvaluationUnitScope,
    pub field: EvaluationUnitField,
    pub message: String,
    pub class: EvaluationUnitClass,
}

/// One finding plus the magnitude it deducted, rendered as a decimal
/// string (`"20"`; advisories carry `"0"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationUnit {
    pub unit_score: String,
    pub data: EvaluationUnitData,
}

impl EvaluationUnit {
    pub fn new(
        scope: EvaluationUnitScope,
        field: EvaluationUnitField,
        class: EvaluationUnitClass,
        weight: i32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            unit_score: weight.to_string(),
            data: EvaluationUnitData {
                scope,
                field,
                message: message.into(),
                class,
            },
        }
    }
}

/// Verdict for one segment: final score plus every finding behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: String,
    pub evaluation_units: Vec<EvaluationUnit>,
}

impl Evaluation {
    fn score_value(&self) -> i32 {
        self.score.parse().unwrap_or_default()
    }

    fn has_abort(&self) -> bool {
        self.evaluation_units
            .iter()
            .any(|u| u.data.field == EvaluationUnitField::Abort)
    }
}

/// One evaluator's verdicts across all segments of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCombined {
    pub evaluator: EvaluatorType,
    pub combined_score: String,
    pub evaluations: Vec<Evaluation>,
}

// ─── Evaluator Seam ─────────────────────────────────────────────────

/// A scoring policy. `evaluate` judges one segment; `combine` collapses
/// per-segment scores into one number for the whole submission.
pub trait Evaluator {
    fn profile(&self) -> EvaluatorType;

    fn evaluate(&self, log: &ParsedLog) -> Evaluation;

    /// Default combination policy: a segment that aborted is a
    /// superseded attempt and is ignored in favor of its retries; the
    /// worst surviving segment decides. When every segment aborted,
    /// the least bad one stands.
    fn combine(&self, evaluations: &[Evaluation]) -> String {
        let surviving: Vec<i32> = evaluations
            .iter()
            .filter(|e| !e.has_abort())
            .map(Evaluation::score_value)
            .collect();
        let combined = if surviving.is_empty() {
            evaluations
                .iter()
                .map(Evaluation::score_value)
                .max()
                .unwrap_or(100)
        } else {
            surviving.into_iter().min().unwrap_or(100)
        };
        combined.to_string()
    }

    fn evaluate_combined(&self, parsed: &ParsedLogCombined) -> EvaluationCombined {
        let evaluations: Vec<Evaluation> = parsed
            .parsed_logs
            .iter()
            .map(|log| self.evaluate(log))
            .collect();
        EvaluationCombined {
            evaluator: self.profile(),
            combined_score: self.combine(&evaluations),
            evaluations,
        }
    }
}

/// The profiles evaluated for every submission.
pub fn default_evaluators() -> Vec<Box<dyn Evaluator>> {
    vec![Box::new(rules::CambiaEvaluator)]
}

/// Run every registered profile over a parsed submission.
pub fn evaluate_all(parsed: &ParsedLogCombined) -> Vec<EvaluationCombined> {
    default_evaluators()
        .iter()
        .map(|evaluator| evaluator.evaluate_combined(parsed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(score: i32, abort: bool) -> Evaluation {
        let mut units = Vec::new();
        if abort {
            units.push(EvaluationUnit::new(
                EvaluationUnitScope::Release,
                EvaluationUnitField::Abort,
                EvaluationUnitClass::Critical,
                100,
                "Copy aborted",
            ));
        }
        Evaluation {
            score: score.to_string(),
            evaluation_units: units,
        }
    }

    struct Probe;
    impl Evaluator for Probe {
        fn profile(&self) -> EvaluatorType {
            EvaluatorType::Cambia
        }
        fn evaluate(&self, _log: &ParsedLog) -> Evaluation {
            eval(100, false)
        }
    }

    #[test]
    fn test_combine_single_segment() {
        assert_eq!(Probe.combine(&[eval(80, false)]), "80");
    }

    #[test]
    fn test_combine_ignores_aborted_retry() {
        assert_eq!(Probe.combine(&[eval(0, true), eval(90, false)]), "90");
    }

    #[test]
    fn test_combine_takes_worst_survivor() {
        assert_eq!(Probe.combine(&[eval(70, false), eval(95, false)]), "70");
    }

    #[test]
    fn test_combine_all_aborted_takes_best() {
        assert_eq!(Probe.combine(&[eval(-31, true), eval(0, true)]), "0");
    }

    #[test]
    fn test_unit_score_rendering() {
        let unit = EvaluationUnit::new(
            EvaluationUnitScope::Release,
            EvaluationUnitField::ReadMode,
            EvaluationUnitClass::Bad,
            20,
            "Rip mode not secure",
        );
        assert_eq!(unit.unit_score, "20");
        let neutral = EvaluationUnit::new(
            EvaluationUnitScope::Release,
            EvaluationUnitField::Drive,
            EvaluationUnitClass::Neutral,
            0,
            "The drive was not found in the database",
        );
        assert_eq!(neutral.unit_score, "0");
    }
}
