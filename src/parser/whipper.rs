//! whipper log grammar
//!
//! whipper (and its morituri ancestor) writes a YAML-shaped log with a
//! fixed two-space indent and, from 0.7.3 on, a trailing `SHA-256 hash`
//! over everything before the hash line. The hash is a standard digest,
//! so unlike the EAC and XLD signatures it is recomputed and verified
//! here.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::model::checksum::Checksum;
use crate::model::toc::{Toc, TocEntry, TocRaw};
use crate::model::track::{
    AccurateRipConfidence, AccurateRipStatus, AccurateRipUnit, TestAndCopy, TrackEntry,
};
use crate::model::{Gap, Quartet, ReadMode, ReleaseInfo, Ripper};
use crate::parser::ParsedLog;
use crate::time::Time;
use crate::{CambiaError, CambiaResult};

// ─── Pattern Tables ─────────────────────────────────────────────────

static CREATED_BY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^Log created by: (whipper|morituri) ([\d.]+)").expect("static pattern")
});

static SECTION_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^  (\d+):\s*$").expect("static pattern"));

static AR_RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"AccurateRip v(\d):\s*\n\s+Result: ([^\n]+)(?:\n\s+Confidence: (\d+))?")
        .expect("static pattern")
});

static SHA256_FOOTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^SHA-256 hash: ([0-9A-Fa-f]{64})\s*$").expect("static pattern")
});

// ─── Entry Point ────────────────────────────────────────────────────

pub fn parse(segment: &str) -> CambiaResult<ParsedLog> {
    let created = CREATED_BY
        .captures(segment)
        .ok_or(CambiaError::UnparsableLog)?;

    let ripper = match &created[1] {
        "whipper" => Ripper::Whipper,
        _ => Ripper::Morituri,
    };
    let mut log = ParsedLog::for_ripper(ripper);
    log.ripper_version = created[2].to_owned();

    // cdparanoia is the only engine whipper drives, and gaps are
    // attached by the ripper itself rather than being a user setting
    log.read_mode = ReadMode::Paranoid;
    log.gap_handling = Gap::Inapplicable;
    log.use_null_samples = Quartet::Unsupported;
    log.id3_enabled = Quartet::Unsupported;
    log.accurate_stream = Quartet::Unsupported;

    parse_ripping_phase(segment, &mut log);
    parse_release(segment, &mut log);
    log.toc = parse_toc(segment);
    log.tracks = parse_tracks(segment);

    log.test_and_copy = if log.tracks.is_empty() {
        Quartet::Unknown
    } else if log.tracks.iter().any(|t| !t.test_and_copy.test_hash.is_empty()) {
        Quartet::True
    } else {
        Quartet::False
    };

    log.checksum = verify_self_checksum(segment);
    Ok(log)
}

// ─── Sections ───────────────────────────────────────────────────────

/// Body of a top-level `Section:` heading: every following line until
/// the next unindented one.
fn section<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    let pattern = format!("\n{}\n", heading);
    let start = if let Some(pos) = text.find(&pattern) {
        pos + pattern.len()
    } else if text.starts_with(&format!("{}\n", heading)) {
        heading.len() + 1
    } else {
        return None;
    };
    let body = &text[start..];
    let end = body
        .lines()
        .scan(0usize, |offset, line| {
            let line_start = *offset;
            *offset += line.len() + 1;
            Some((line_start, line))
        })
        .find(|(_, line)| !line.is_empty() && !line.starts_with(' '))
        .map(|(line_start, _)| line_start)
        .unwrap_or(body.len());
    Some(&body[..end])
}

fn indented_value<'a>(body: &'a str, label: &str) -> Option<&'a str> {
    let prefix = format!("{}:", label);
    body.lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(str::trim)
}

fn parse_ripping_phase(text: &str, log: &mut ParsedLog) {
    let Some(body) = section(text, "Ripping phase information:") else {
        return;
    };
    if let Some(drive) = indented_value(body, "Drive") {
        // whipper percent-encodes the drive string
        log.drive = percent_decode(drive);
    }
    if let Some(value) = indented_value(body, "Defeat audio cache") {
        log.defeat_audio_cache = Quartet::from_yes_no(value);
    }
    if let Some(value) = indented_value(body, "Read offset correction") {
        log.read_offset = value.parse().ok();
    }
    if let Some(value) = indented_value(body, "Overread into lead-in/lead-out") {
        log.overread = Quartet::from_yes_no(value);
    }
}

fn parse_release(text: &str, log: &mut ParsedLog) {
    let Some(body) = section(text, "CD metadata:") else {
        return;
    };
    let artist = indented_value(body, "Artist").unwrap_or_default();
    let title = indented_value(body, "Title").unwrap_or_default();
    log.release_info = ReleaseInfo::new(artist.to_owned(), title.to_owned());
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        // Only a %XX escape with two hex digits decodes; anything else
        // (including a % followed by multi-byte UTF-8) passes through
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            if let Ok(byte) = u8::from_str_radix(&value[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── TOC and Tracks ─────────────────────────────────────────────────

/// Split a section body on its `  N:` entry headers.
fn entries(body: &str) -> Vec<(u32, &str)> {
    let headers: Vec<_> = SECTION_ENTRY.captures_iter(body).collect();
    headers
        .iter()
        .enumerate()
        .filter_map(|(idx, caps)| {
            let num = caps[1].parse().ok()?;
            let start = caps.get(0)?.end();
            let end = headers
                .get(idx + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(body.len());
            Some((num, &body[start..end]))
        })
        .collect()
}

fn parse_toc(text: &str) -> Toc {
    let Some(body) = section(text, "TOC:") else {
        return Toc::default();
    };
    let toc_entries = entries(body)
        .into_iter()
        .filter_map(|(num, block)| {
            Some(TocEntry::new(
                num,
                Time::from_mm_ss_cs(indented_value(block, "Start")?),
                Time::from_mm_ss_cs(indented_value(block, "Length")?),
                indented_value(block, "Start sector")?.parse().ok()?,
                indented_value(block, "End sector")?.parse().ok()?,
            ))
        })
        .collect();
    Toc::new(TocRaw::new(toc_entries))
}

fn parse_tracks(text: &str) -> Vec<TrackEntry> {
    let Some(body) = section(text, "Tracks:") else {
        return Vec::new();
    };
    entries(body)
        .into_iter()
        .map(|(num, block)| {
            let mut track = TrackEntry::new(num as u8);
            if let Some(filename) = indented_value(block, "Filename") {
                track.filenames.push(filename.to_owned());
            }
            track.peak_level = indented_value(block, "Peak level").and_then(|v| v.parse().ok());
            track.pregap_length =
                indented_value(block, "Pre-gap length").map(Time::from_mm_ss_cs);
            track.extraction_speed = indented_value(block, "Extraction speed")
                .and_then(|v| v.trim_end_matches(|c| c == ' ' || c == 'X').parse().ok());

            let test = indented_value(block, "Test CRC").map(str::to_owned);
            let copy = indented_value(block, "Copy CRC").map(str::to_owned);
            track.test_and_copy = match (test, copy) {
                (Some(test), Some(copy)) => TestAndCopy::new(test, copy),
                (None, Some(copy)) => TestAndCopy::copy_only(copy),
                _ => TestAndCopy::default(),
            };

            track.aborted = indented_value(block, "Status")
                .is_some_and(|status| status.contains("Aborted"));
            track.ar_info = parse_ar_results(block);
            track
        })
        .collect()
}

fn parse_ar_results(block: &str) -> Vec<AccurateRipUnit> {
    AR_RESULT
        .captures_iter(block)
        .map(|caps| {
            let result = &caps[2];
            let status = if result.contains("exact match") {
                AccurateRipStatus::Match
            } else if result.contains("differs") {
                AccurateRipStatus::Mismatch
            } else if result.contains("offset") {
                AccurateRipStatus::Offsetted
            } else {
                AccurateRipStatus::NotFound
            };
            let mut unit =
                AccurateRipUnit::new(caps[1].parse().ok(), status);
            if let Some(confidence) = caps.get(3) {
                unit.confidence = Some(AccurateRipConfidence {
                    matching: confidence.as_str().parse().ok(),
                    total: None,
                    offset: Default::default(),
                });
            }
            unit
        })
        .collect()
}

// ─── Self-Checksum ──────────────────────────────────────────────────

/// Recompute the trailing SHA-256 over everything before the hash line
/// and compare it with the claimed value.
fn verify_self_checksum(text: &str) -> Checksum {
    let Some(footer) = SHA256_FOOTER.captures(text) else {
        return Checksum::default();
    };
    let claimed = footer[1].to_owned();
    let body_end = footer.get(0).map(|m| m.start()).unwrap_or_default();
    let calculated = hex::encode(Sha256::digest(text[..body_end].as_bytes()));
    Checksum::compared(calculated, claimed)
}
