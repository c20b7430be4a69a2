//! Segmentation, ripper detection, and the parsed-log model
//!
//! A submitted file may hold several concatenated rip sessions. The
//! segmenter splits the decoded text at recurring ripper banners, the
//! detector claims each segment for a grammar by signature priority,
//! and each grammar produces one `ParsedLog`. Order is source order
//! throughout.

pub mod eac;
pub mod eac_locale;
pub mod whipper;
pub mod xld;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::model::checksum::Checksum;
use crate::model::toc::Toc;
use crate::model::track::TrackEntry;
use crate::model::{Gap, MediaType, Quartet, ReadMode, ReleaseInfo, Ripper};
use crate::{CambiaError, CambiaResult};

// ─── Parsed Model ───────────────────────────────────────────────────

/// Everything one rip session claims, normalized across ripper
/// families. Settings a log never mentions stay `Unknown`; settings a
/// ripper cannot have are `Unsupported`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLog {
    pub ripper: Ripper,
    /// Version string as printed in the log, empty when absent
    pub ripper_version: String,
    pub release_info: ReleaseInfo,
    /// Language the log labels were written in, BCP 47 primary subtag
    pub language: String,
    pub read_offset: Option<i16>,
    pub combined_rw_offset: Option<i32>,
    pub drive: String,
    pub media_type: MediaType,
    pub accurate_stream: Quartet,
    pub defeat_audio_cache: Quartet,
    pub use_c2: Quartet,
    pub overread: Quartet,
    pub fill_silence: Quartet,
    pub delete_silence: Quartet,
    pub use_null_samples: Quartet,
    pub test_and_copy: Quartet,
    pub normalize: Quartet,
    pub read_mode: ReadMode,
    pub gap_handling: Gap,
    pub checksum: Checksum,
    pub toc: Toc,
    pub tracks: Vec<TrackEntry>,
    pub id3_enabled: Quartet,
    pub audio_encoder: Vec<String>,
}

impl Default for ParsedLog {
    fn default() -> Self {
        Self {
            ripper: Ripper::Other,
            ripper_version: String::new(),
            release_info: ReleaseInfo::default(),
            language: "en".to_owned(),
            read_offset: None,
            combined_rw_offset: None,
            drive: String::new(),
            media_type: MediaType::Unknown,
            accurate_stream: Quartet::Unknown,
            defeat_audio_cache: Quartet::Unknown,
            use_c2: Quartet::Unknown,
            overread: Quartet::Unknown,
            fill_silence: Quartet::Unknown,
            delete_silence: Quartet::Unknown,
            use_null_samples: Quartet::Unknown,
            test_and_copy: Quartet::Unknown,
            normalize: Quartet::Unknown,
            read_mode: ReadMode::Unknown,
            gap_handling: Gap::Unknown,
            checksum: Checksum::default(),
            toc: Toc::default(),
            tracks: Vec::new(),
            id3_enabled: Quartet::Unknown,
            audio_encoder: Vec::new(),
        }
    }
}

impl ParsedLog {
    pub fn for_ripper(ripper: Ripper) -> Self {
        Self {
            ripper,
            ..Self::default()
        }
    }
}

/// All sessions found in one submitted file, source order, plus the
/// encoding the raw bytes were decoded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLogCombined {
    pub parsed_logs: Vec<ParsedLog>,
    pub encoding: String,
}

// ─── Banner Signatures ──────────────────────────────────────────────

/// Banner literals, most specific first. Priority matters: a whipper
/// log quotes nothing EAC-like, but an EAC logfile header can appear
/// without the application banner, so the bare header ranks last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Xld,
    Whipper,
    EacBanner,
    /// `EAC extraction logfile from …` or a localized equivalent;
    /// belongs to the preceding application banner when one exists
    EacHeader,
}

struct Signature {
    literal: &'static str,
    marker: Marker,
}

static SIGNATURES: Lazy<Vec<Signature>> = Lazy::new(|| {
    let mut table = vec![
        Signature { literal: "X Lossless Decoder version", marker: Marker::Xld },
        Signature { literal: "Log created by: whipper", marker: Marker::Whipper },
        Signature { literal: "Log created by: morituri", marker: Marker::Whipper },
        Signature { literal: "Exact Audio Copy V", marker: Marker::EacBanner },
        Signature { literal: "EAC extraction logfile from", marker: Marker::EacHeader },
    ];
    for header in eac_locale::localized_log_headers() {
        table.push(Signature { literal: header, marker: Marker::EacHeader });
    }
    table
});

static SIGNATURE_SCANNER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(SIGNATURES.iter().map(|s| s.literal))
        .expect("static signature table is valid")
});

/// A banner only counts at the start of a line.
fn at_line_start(text: &str, offset: usize) -> bool {
    offset == 0 || text.as_bytes()[offset - 1] == b'\n'
}

fn banner_offsets(text: &str) -> Vec<(usize, Marker)> {
    SIGNATURE_SCANNER
        .find_iter(text)
        .filter(|m| at_line_start(text, m.start()))
        .map(|m| (m.start(), SIGNATURES[m.pattern().as_usize()].marker))
        .collect()
}

// ─── Segmenter ──────────────────────────────────────────────────────

/// Split decoded text into per-session segments at recurring banners.
///
/// An EAC extraction header directly following an application banner is
/// part of that banner's session; a second header (or any new banner)
/// starts a new one. Text with no banner at all comes back as a single
/// segment so the detector can reject it in one place.
pub fn segment_text(text: &str) -> Vec<&str> {
    let offsets = banner_offsets(text);
    if offsets.is_empty() {
        return vec![text];
    }

    let mut splits: Vec<usize> = Vec::new();
    let mut segment_has_header = false;
    for &(offset, marker) in &offsets {
        match marker {
            Marker::EacHeader => {
                if segment_has_header {
                    splits.push(offset);
                }
                segment_has_header = true;
            }
            _ => {
                splits.push(offset);
                segment_has_header = false;
            }
        }
    }

    // Leading prose before the first banner stays in the first segment
    if splits.first() != Some(&0) {
        splits.insert(0, 0);
    }

    let mut segments = Vec::with_capacity(splits.len());
    for (idx, &start) in splits.iter().enumerate() {
        let end = splits.get(idx + 1).copied().unwrap_or(text.len());
        let segment = &text[start..end];
        if !segment.trim().is_empty() {
            segments.push(segment);
        }
    }
    tracing::debug!(segments = segments.len(), "segmented input");
    segments
}

// ─── Detector ───────────────────────────────────────────────────────

/// Claim a segment for a ripper family by signature priority. `None`
/// means no supported family recognizes it.
pub fn detect_ripper(segment: &str) -> Option<Ripper> {
    let mut best: Option<(Marker, usize)> = None;
    for (_, marker) in banner_offsets(segment) {
        let rank = match marker {
            Marker::Xld => 0,
            Marker::Whipper => 1,
            Marker::EacBanner => 2,
            Marker::EacHeader => 3,
        };
        if best.map_or(true, |(_, r)| rank < r) {
            best = Some((marker, rank));
        }
    }
    best.map(|(marker, _)| match marker {
        Marker::Xld => Ripper::XLD,
        Marker::Whipper => Ripper::Whipper,
        Marker::EacBanner | Marker::EacHeader => Ripper::EAC,
    })
}

/// Segment, detect, and parse one decoded text into ordered per-session
/// results. Fails `UnsupportedFormat` only when no segment is claimed
/// by any grammar.
pub fn parse_segments(text: &str) -> CambiaResult<Vec<ParsedLog>> {
    let mut parsed = Vec::new();
    let mut recognized_any = false;

    for segment in segment_text(text) {
        let Some(ripper) = detect_ripper(segment) else {
            tracing::debug!("segment matched no ripper signature");
            continue;
        };
        recognized_any = true;
        let log = match ripper {
            Ripper::EAC => eac::parse(segment)?,
            Ripper::XLD => xld::parse(segment)?,
            Ripper::Whipper => whipper::parse(segment)?,
            other => {
                tracing::warn!(ripper = %other, "no grammar for detected ripper");
                continue;
            }
        };
        parsed.push(log);
    }

    if !recognized_any {
        return Err(CambiaError::UnsupportedFormat);
    }
    Ok(parsed)
}
