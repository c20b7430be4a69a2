//! # cambia — CD Rip Log Forensics Engine
//!
//! Parses the free-text log files produced by optical-disc ripping
//! programs (EAC, XLD, whipper, …) into a ripper-agnostic structured
//! model, then scores each rip session against a deterministic,
//! auditable rule table so archival communities can judge whether a rip
//! can be trusted bit-for-bit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        handler                               │
//! │  ┌───────────┐ ┌──────────┐ ┌─────────────┐ ┌────────────┐   │
//! │  │ Segmenter │→│ Detector │→│ Per-ripper  │→│ Evaluation │   │
//! │  │ (banners) │ │ (sigs)   │ │ grammars    │ │ engine     │   │
//! │  └───────────┘ └──────────┘ └─────────────┘ └─────┬──────┘   │
//! │                                                   │          │
//! │  ┌────────────────────────────────────────────────▼───────┐  │
//! │  │ Response assembler (identity token + parse + verdicts) │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The whole pipeline is a pure, synchronous transformation: no I/O
//! (except the `parse_path` convenience), no shared mutable state, and
//! read-only grammar/rule tables initialized once. Two identical inputs
//! always produce identical responses.
//!
//! ## Capabilities
//!
//! - **Multi-format parsing**: EAC (0.95 through 1.x, localized logs),
//!   XLD (modern and legacy cdparanoia mode), whipper/morituri
//! - **Combined logs**: one file holding several concatenated rip
//!   sessions is segmented and each session parsed independently
//! - **TOC fingerprints**: FreeDB, AccurateRip, CTDB, and MusicBrainz
//!   disc ids derived from the claimed table of contents
//! - **Rule-based scoring**: weighted, classified deductions with
//!   mutually-exclusive groups and derived compound findings; scores
//!   are unclamped and may go negative
//! - **Evaluator profiles**: scoring policies are pluggable; the
//!   default registry ships the Cambia profile

pub mod decode;
pub mod time;
pub mod model;
pub mod parser;
pub mod evaluate;
pub mod response;
pub mod handler;

// Re-exports for convenience
pub use decode::DecodedText;
pub use model::{Gap, MediaType, Quartet, ReadMode, ReleaseInfo, Ripper};
pub use model::checksum::{Checksum, Integrity};
pub use model::toc::{Toc, TocEntry, TocHash, TocRaw};
pub use model::track::{
    AccurateRipConfidence, AccurateRipConfidenceTotal, AccurateRipOffset, AccurateRipStatus,
    AccurateRipUnit, TestAndCopy, TrackEntry, TrackError, TrackErrorData, TrackErrorRange,
};
pub use parser::{ParsedLog, ParsedLogCombined};
pub use evaluate::{
    Evaluation, EvaluationCombined, EvaluationUnit, EvaluationUnitClass, EvaluationUnitData,
    EvaluationUnitField, EvaluationUnitScope, Evaluator, EvaluatorType,
};
pub use response::CambiaResponse;
pub use handler::{parse_bytes, parse_decoded, parse_path, parse_text, supported_rippers};

use thiserror::Error;

/// Every way a parse call can fail. The display strings are part of the
/// interface contract observed by callers and must not change.
#[derive(Error, Debug)]
pub enum CambiaError {
    /// Input text was empty or pure whitespace
    #[error("Empty request body")]
    EmptyInput,

    /// No supported ripper signature matched any segment
    #[error("Unsupported file")]
    UnsupportedFormat,

    /// A ripper was recognized but a structurally required section
    /// could not be extracted
    #[error("Could not parse log")]
    UnparsableLog,

    /// The path-based entry point could not read the underlying file
    #[error("Could not read file")]
    IoFailure(#[source] std::io::Error),
}

pub type CambiaResult<T> = Result<T, CambiaError>;
