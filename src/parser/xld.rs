//! XLD log grammar
//!
//! X Lossless Decoder logs are already line-labeled and English-only.
//! The grammar handles the modern `XLD Secure Ripper` engine, the
//! legacy `Use cdparanoia mode` form, the per-track statistics block
//! with its eleven error counters, and the damaged-sector and
//! suspicious-position lists.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::checksum::Checksum;
use crate::model::toc::{Toc, TocEntry, TocRaw};
use crate::model::track::{
    AccurateRipConfidence, AccurateRipStatus, AccurateRipUnit, TestAndCopy, TrackEntry,
    TrackErrorData, TrackErrorRange,
};
use crate::model::{Gap, MediaType, Quartet, ReadMode, ReleaseInfo, Ripper};
use crate::parser::ParsedLog;
use crate::time::Time;
use crate::{CambiaError, CambiaResult};

// ─── Pattern Tables ─────────────────────────────────────────────────

static VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^X Lossless Decoder version (.+?)\s*$").expect("static pattern")
});

static LOG_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^XLD extraction logfile from .+$").expect("static pattern")
});

static TOC_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+(\d+)\s+\|\s+([\d:.]+)\s+\|\s+([\d:.]+)\s+\|\s+(\d+)\s+\|\s+(\d+)\s*$")
        .expect("static pattern")
});

static TRACK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Track (\d+)\s*$").expect("static pattern"));

static LOG_EOF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^End of status report\s*$").expect("static pattern"));

static FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+Filename\s+:\s+(.+?)\s*$").expect("static pattern"));

static PREGAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+Pre-gap length\s+:\s+([\d:.]+)").expect("static pattern")
});

static PEAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+Peak\s+:\s+([\d.]+)").expect("static pattern"));

static GAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+Track gain\s+:\s+(-?[\d.]+)\s*dB").expect("static pattern")
});

static CRC_TEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+CRC32 hash \(test run\)\s+:\s+([0-9A-Fa-f]{8})").expect("static pattern")
});

static CRC_COPY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+CRC32 hash\s+:\s+([0-9A-Fa-f]{8})").expect("static pattern")
});

static CRC_SKIPZERO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+CRC32 hash \(skip zero\)\s+:\s+([0-9A-Fa-f]{8})").expect("static pattern")
});

static STAT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+(.+?)\s+:\s+(\d+)\s*$").expect("static pattern")
});

static POSITION_LIST_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s+\((\d+)\)\s+([\d:.]+)\s*(?:-\s*([\d:.]+))?\s*$").expect("static pattern")
});

static AR_VERDICT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"->(Accurately ripped|Rip may not be accurate|Track not present in AccurateRip database|Rip accurate with different offset)(?:\s*\(v([12+]+), confidence (\d+)[^)]*\))?",
    )
    .expect("static pattern")
});

static SIGNATURE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-----BEGIN XLD SIGNATURE-----\s*\n([\s\S]+?)\n-----END XLD SIGNATURE-----")
        .expect("static pattern")
});

// ─── Entry Point ────────────────────────────────────────────────────

/// Parse one XLD segment. The version banner is the detector's anchor;
/// the extraction header is the structural requirement.
pub fn parse(segment: &str) -> CambiaResult<ParsedLog> {
    let header = LOG_HEADER
        .find(segment)
        .ok_or(CambiaError::UnparsableLog)?;

    let mut log = ParsedLog::for_ripper(Ripper::XLD);
    log.ripper_version = VERSION
        .captures(segment)
        .map(|c| c[1].to_owned())
        .unwrap_or_default();

    log.release_info = segment[header.end()..]
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(ReleaseInfo::from_header_line)
        .unwrap_or_default();

    // XLD has no null-sample or ID3 settings to report
    log.use_null_samples = Quartet::Unsupported;
    log.id3_enabled = Quartet::Unsupported;

    parse_settings(segment, &mut log);
    log.toc = parse_toc(segment);
    log.tracks = parse_tracks(segment);

    log.test_and_copy = if log.tracks.is_empty() {
        Quartet::Unknown
    } else if log.tracks.iter().any(|t| !t.test_and_copy.test_hash.is_empty()) {
        Quartet::True
    } else {
        Quartet::False
    };

    log.checksum = SIGNATURE_BLOCK
        .captures(segment)
        .map(|c| Checksum::from_log_only(c[1].split_whitespace().collect()))
        .unwrap_or_default();

    Ok(log)
}

// ─── Settings ───────────────────────────────────────────────────────

fn labeled_value<'a>(line: &'a str) -> Option<(&'a str, &'a str)> {
    line.split_once(" : ")
        .map(|(label, value)| (label.trim(), value.trim()))
}

/// XLD prints qualified affirmatives like `OK for the drive with a
/// cache less than 1375KiB`; only the leading token decides.
fn leading_yes_no(value: &str) -> Quartet {
    let token = value.split([' ', ',']).next().unwrap_or_default();
    Quartet::from_yes_no(token)
}

fn parse_settings(text: &str, log: &mut ParsedLog) {
    for line in text.lines() {
        let Some((label, value)) = labeled_value(line) else {
            continue;
        };
        match label {
            "Used drive" => log.drive = value.to_owned(),
            "Media type" => log.media_type = parse_media(value),
            "Ripper mode" => log.read_mode = parse_ripper_mode(value),
            "Use cdparanoia mode" => {
                // Legacy engine line; YES means the cdparanoia engine
                if leading_yes_no(value) == Quartet::True {
                    log.read_mode = ReadMode::Paranoid;
                }
            }
            "Disable audio cache" => log.defeat_audio_cache = leading_yes_no(value),
            "Make use of C2 pointers" => log.use_c2 = leading_yes_no(value),
            "Read offset correction" => log.read_offset = value.parse().ok(),
            "Gap status" => log.gap_handling = parse_gap(value),
            _ => {}
        }
    }
}

fn parse_media(value: &str) -> MediaType {
    if value.contains("Pressed") {
        MediaType::Pressed
    } else if value.contains("CD-Recordable") {
        MediaType::CDR
    } else {
        MediaType::Other
    }
}

fn parse_ripper_mode(value: &str) -> ReadMode {
    if value.contains("Secure") {
        ReadMode::Secure
    } else if value.contains("CDParanoia") || value.contains("Paranoid") {
        ReadMode::Paranoid
    } else if value.contains("Burst") {
        ReadMode::Burst
    } else {
        ReadMode::Unknown
    }
}

fn parse_gap(value: &str) -> Gap {
    if !value.starts_with("Analyzed") {
        return Gap::Unknown;
    }
    if value.contains("Appended (except HTOA)") {
        Gap::AppendNoHtoa
    } else if value.contains("Appended") {
        Gap::Append
    } else if value.contains("Prepended") {
        Gap::Prepend
    } else if value.contains("Discarded") {
        Gap::Discard
    } else {
        Gap::Unknown
    }
}

// ─── TOC and Tracks ─────────────────────────────────────────────────

fn parse_toc(text: &str) -> Toc {
    let entries = TOC_ROW
        .captures_iter(text)
        .filter_map(|c| {
            Some(TocEntry::new(
                c[1].parse().ok()?,
                Time::from_mm_ss_cs(&c[2]),
                Time::from_mm_ss_cs(&c[3]),
                c[4].parse().ok()?,
                c[5].parse().ok()?,
            ))
        })
        .collect();
    Toc::new(TocRaw::new(entries))
}

fn parse_tracks(text: &str) -> Vec<TrackEntry> {
    // Track blocks run from each header to the next, ending at EOF
    let body_end = LOG_EOF.find(text).map(|m| m.start()).unwrap_or(text.len());
    let body = &text[..body_end];

    let headers: Vec<_> = TRACK_HEADER.captures_iter(body).collect();
    let mut tracks = Vec::with_capacity(headers.len());

    for (idx, header) in headers.iter().enumerate() {
        let start = header.get(0).map(|m| m.end()).unwrap_or_default();
        let end = headers
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(body.len());
        let block = &body[start..end];

        // The AccurateRip summary lists `Track 01 : OK` lines; real
        // track blocks always carry a Filename or a statistics section
        if !block.contains("Filename") && !block.contains("Statistics") {
            continue;
        }

        let mut track = TrackEntry::new(header[1].parse().unwrap_or_default());
        parse_track_block(block, &mut track);
        tracks.push(track);
    }
    tracks
}

fn parse_track_block(block: &str, track: &mut TrackEntry) {
    track.filenames = FILENAME
        .captures_iter(block)
        .map(|c| c[1].to_owned())
        .collect();
    track.peak_level = PEAK.captures(block).and_then(|c| c[1].parse().ok());
    track.gain = GAIN.captures(block).and_then(|c| c[1].parse().ok());
    track.pregap_length = PREGAP.captures(block).map(|c| Time::from_mm_ss_cs(&c[1]));
    track.aborted = block.contains("(aborted)");

    let test = CRC_TEST.captures(block).map(|c| c[1].to_owned());
    let skipzero = CRC_SKIPZERO.captures(block).map(|c| c[1].to_owned());
    let copy = CRC_COPY
        .captures_iter(block)
        .map(|c| c[1].to_owned())
        .next();
    track.test_and_copy = match (test, copy) {
        (Some(test), Some(copy)) => TestAndCopy::with_skipzero(
            test,
            copy,
            String::new(),
            skipzero.unwrap_or_default(),
        ),
        (None, Some(copy)) => TestAndCopy::copy_only(copy),
        _ => TestAndCopy::default(),
    };

    parse_statistics(block, track);
    parse_position_lists(block, track);
    track.ar_info = parse_ar_verdicts(block);
}

/// The statistics section is a label/count table; unknown labels are
/// ignored so newer XLD builds degrade gracefully.
fn parse_statistics(block: &str, track: &mut TrackEntry) {
    for caps in STAT_LINE.captures_iter(block) {
        let count: u32 = caps[2].parse().unwrap_or_default();
        if count == 0 {
            continue;
        }
        let slot = match &caps[1] {
            "Read error" => &mut track.errors.read,
            "Skipped (treated as error)" => &mut track.errors.skip,
            "Jitter error (maybe fixed)" => &mut track.errors.jitter_generic,
            "Edge jitter error (maybe fixed)" => &mut track.errors.jitter_edge,
            "Atom jitter error (maybe fixed)" => &mut track.errors.jitter_atom,
            "Drift error (maybe fixed)" => &mut track.errors.drift,
            "Dropped bytes error (maybe fixed)" => &mut track.errors.dropped,
            "Duplicated bytes error (maybe fixed)" => &mut track.errors.duplicated,
            "Inconsistency in error sectors" => &mut track.errors.inconsistent_err_sectors,
            "Damaged sector count" => &mut track.errors.damaged_sectors,
            _ => continue,
        };
        *slot = TrackErrorData::from_count(count);
    }
}

/// Damaged-sector and suspicious-position lists itemize what the
/// counters summarize; the itemized extents replace the bare counts.
fn parse_position_lists(block: &str, track: &mut TrackEntry) {
    for (section, slot) in [
        ("List of damaged sector positions", 0usize),
        ("List of suspicious positions", 1usize),
    ] {
        let Some(start) = block.find(section) else {
            continue;
        };
        let tail = &block[start + section.len()..];
        // A block can carry both lists; stop at the next one
        let tail = match tail.find("List of") {
            Some(next) => &tail[..next],
            None => tail,
        };
        let ranges: Vec<TrackErrorRange> = POSITION_LIST_ENTRY
            .captures_iter(tail)
            .map(|c| {
                let at = Time::from_mm_ss_cs(&c[2]);
                match c.get(3) {
                    Some(end) => {
                        let end = Time::from_mm_ss_cs(end.as_str());
                        let length = end.as_millis().saturating_sub(at.as_millis());
                        TrackErrorRange::new(at, Time::from_millis(length))
                    }
                    None => TrackErrorRange::at(at),
                }
            })
            .collect();
        if ranges.is_empty() {
            continue;
        }
        let data = TrackErrorData::from_ranges(ranges);
        match slot {
            0 => track.errors.damaged_sectors = data,
            _ => track.errors.inconsistent_err_sectors = data,
        }
    }
}

fn parse_ar_verdicts(block: &str) -> Vec<AccurateRipUnit> {
    AR_VERDICT
        .captures_iter(block)
        .map(|caps| {
            let status = match &caps[1] {
                "Accurately ripped" => AccurateRipStatus::Match,
                "Rip may not be accurate" => AccurateRipStatus::Mismatch,
                "Rip accurate with different offset" => AccurateRipStatus::Offsetted,
                _ => AccurateRipStatus::NotFound,
            };
            let version = caps
                .get(2)
                .and_then(|v| v.as_str().chars().next())
                .and_then(|c| c.to_digit(10))
                .map(|d| d as u8);
            let mut unit = AccurateRipUnit::new(version, status);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::checksum::Integrity;

    const MODERN_LOG: &str = "\
X Lossless Decoder version 20230115 (153.4)

XLD extraction logfile from 2023-03-01 12:00:00 +0000

Some Artist / Some Album

Used drive : HL-DT-ST DVDRW  GA32N (revision KC08)
Media type : Pressed CD

Ripper mode             : XLD Secure Ripper
Disable audio cache     : OK for the drive with a cache less than 1375KiB
Make use of C2 pointers : NO
Read offset correction  : 667
Max retry count         : 20
Gap status              : Analyzed, Appended

TOC of the extracted CD
     Track |   Start  |  Length  | Start sector | End sector
    ---------------------------------------------------------
        1  | 00:00:00 | 04:00:00 |         0    |    17999
        2  | 04:00:00 | 03:00:00 |     18000    |    31499

Track 01
    Filename : /Users/me/rips/01 One.flac
    Pre-gap length : 00:02:00

    CRC32 hash (test run)    : 12345678
    CRC32 hash               : 12345678
    CRC32 hash (skip zero)   : 87654321
    AccurateRip v2 signature : A1B2C3D4
        ->Accurately ripped (v2, confidence 20)
    Statistics
        Read error                           : 0
        Jitter error (maybe fixed)           : 0
        Retry sector count                   : 0
        Damaged sector count                 : 0

Track 02
    Filename : /Users/me/rips/02 Two.flac

    CRC32 hash (test run)    : AABBCCDD
    CRC32 hash               : AABBCCDD
        ->Rip may not be accurate (v2, confidence 3)
    Statistics
        Read error                           : 0
        Damaged sector count                 : 2

No errors occurred

End of status report

-----BEGIN XLD SIGNATURE-----
wUHn4fjEyQ3PqLPxzJDVAcME
-----END XLD SIGNATURE-----
";

    #[test]
    fn test_modern_settings() {
        let log = parse(MODERN_LOG).unwrap();
        assert_eq!(log.ripper, Ripper::XLD);
        assert_eq!(log.ripper_version, "20230115 (153.4)");
        assert_eq!(log.read_mode, ReadMode::Secure);
        assert_eq!(log.defeat_audio_cache, Quartet::True);
        assert_eq!(log.use_c2, Quartet::False);
        assert_eq!(log.read_offset, Some(667));
        assert_eq!(log.media_type, MediaType::Pressed);
        assert_eq!(log.gap_handling, Gap::Append);
        assert_eq!(log.use_null_samples, Quartet::Unsupported);
    }

    #[test]
    fn test_modern_tracks() {
        let log = parse(MODERN_LOG).unwrap();
        assert_eq!(log.tracks.len(), 2);
        assert_eq!(log.tracks[0].num, 1);
        assert_eq!(log.tracks[0].test_and_copy.integrity, Integrity::Match);
        assert_eq!(log.tracks[0].test_and_copy.copy_hash_skipzero, "87654321");
        assert_eq!(log.tracks[0].ar_info[0].status, AccurateRipStatus::Match);
        assert_eq!(log.tracks[1].errors.damaged_sectors.count, 2);
        assert_eq!(log.tracks[1].ar_info[0].status, AccurateRipStatus::Mismatch);
        assert_eq!(log.test_and_copy, Quartet::True);
    }

    #[test]
    fn test_signature_extracted() {
        let log = parse(MODERN_LOG).unwrap();
        assert_eq!(log.checksum.log, "wUHn4fjEyQ3PqLPxzJDVAcME");
        assert_eq!(log.checksum.integrity, Integrity::Unknown);
    }

    #[test]
    fn test_legacy_cdparanoia_mode() {
        let text = "\
X Lossless Decoder version 20101212 (127.0)

XLD extraction logfile from 2011-01-01 10:00:00 +0000

Artist / Album

Used drive : MATSHITA DVD-R UJ-868
Use cdparanoia mode : YES (CDParanoia III 10.2 engine)
Read offset correction : 102

Track 01
    Filename : /rips/01.flac

    CRC32 hash               : 01020304

No errors occurred

End of status report
";
        let log = parse(text).unwrap();
        assert_eq!(log.read_mode, ReadMode::Paranoid);
        // Single-pass rip
        assert_eq!(log.test_and_copy, Quartet::False);
        assert_eq!(log.media_type, MediaType::Unknown);
    }

    #[test]
    fn test_cdr_media_type() {
        let text = "\
X Lossless Decoder version 20230115 (153.4)

XLD extraction logfile from 2023-03-01 12:00:00 +0000

A / B

Media type : CD-Recordable

Track 01
    Filename : /rips/01.flac
    CRC32 hash               : 01020304

End of status report
";
        let log = parse(text).unwrap();
        assert_eq!(log.media_type, MediaType::CDR);
    }

    #[test]
    fn test_suspicious_position_list() {
        let text = "\
X Lossless Decoder version 20230115 (153.4)

XLD extraction logfile from 2023-03-01 12:00:00 +0000

A / B

Track 01
    Filename : /rips/01.flac
    CRC32 hash               : 01020304
    Statistics
        Inconsistency in error sectors       : 2
    List of suspicious positions
        (1) 00:12:34
        (2) 00:56:01

End of status report
";
        let log = parse(text).unwrap();
        let errors = &log.tracks[0].errors;
        assert_eq!(errors.inconsistent_err_sectors.count, 2);
        assert_eq!(errors.inconsistent_err_sectors.ranges.len(), 2);
    }

    #[test]
    fn test_missing_header_is_unparsable() {
        assert!(matches!(
            parse("X Lossless Decoder version 20230115\n\nno header here\n"),
            Err(CambiaError::UnparsableLog)
        ));
    }
}
