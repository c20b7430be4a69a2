//! The Cambia scoring profile
//!
//! A fixed-order walk over the deduction catalog. Exclusive groups
//! (read mode, offset, null samples, gap, tag) fire at most one member;
//! track rules emit one unit per offending track; derived rules run
//! last, on top of their prerequisites. Weight-zero units are advisory
//! and never move the score.

use crate::evaluate::{
    drive_db, Evaluation, EvaluationUnit, EvaluationUnitClass as Class,
    EvaluationUnitField as Field, EvaluationUnitScope as Scope, Evaluator, EvaluatorType,
};
use crate::model::checksum::Integrity;
use crate::model::track::TrackEntry;
use crate::model::{Gap, MediaType, Quartet, ReadMode, Ripper};
use crate::parser::ParsedLog;

pub struct CambiaEvaluator;

/// Running score plus the units that explain it.
struct Tally {
    score: i32,
    units: Vec<EvaluationUnit>,
}

impl Tally {
    fn new() -> Self {
        Self {
            score: 100,
            units: Vec::new(),
        }
    }

    fn deduct(&mut self, scope: Scope, field: Field, weight: i32, message: &str) {
        self.score -= weight;
        let class = if weight == 0 { Class::Neutral } else { Class::Bad };
        self.units
            .push(EvaluationUnit::new(scope, field, class, weight, message));
    }

    fn critical(&mut self, field: Field, weight: i32, message: &str) {
        self.score -= weight;
        self.units.push(EvaluationUnit::new(
            Scope::Release,
            field,
            Class::Critical,
            weight,
            message,
        ));
    }

    fn finish(self) -> Evaluation {
        Evaluation {
            score: self.score.to_string(),
            evaluation_units: self.units,
        }
    }
}

impl Evaluator for CambiaEvaluator {
    fn profile(&self) -> EvaluatorType {
        EvaluatorType::Cambia
    }

    fn evaluate(&self, log: &ParsedLog) -> Evaluation {
        let mut tally = Tally::new();

        rule_ripper_version(log, &mut tally);
        rule_read_mode(log, &mut tally);
        rule_cache(log, &mut tally);
        rule_c2(log, &mut tally);
        rule_offset(log, &mut tally);
        rule_null_samples(log, &mut tally);
        rule_gap(log, &mut tally);
        rule_tag(log, &mut tally);
        rule_test_and_copy(log, &mut tally);
        rule_media_type(log, &mut tally);
        rule_range_rip(log, &mut tally);
        rule_filenames(log, &mut tally);
        rule_abort(log, &mut tally);
        rule_track_defects(log, &mut tally);
        rule_derived(log, &mut tally);

        tally.finish()
    }
}

// ─── Version Gates ──────────────────────────────────────────────────

/// Leading numeric component of an EAC version string, so that
/// `0.95 prebeta 5` compares as 0.95 and `1.0 beta 3` as 1.0.
fn eac_version(log: &ParsedLog) -> Option<f64> {
    log.ripper_version.split_whitespace().next()?.parse().ok()
}

fn whipper_version_at_least(log: &ParsedLog, minimum: (u32, u32, u32)) -> bool {
    if log.ripper_version.is_empty() {
        return false;
    }
    let mut parts = log
        .ripper_version
        .split('.')
        .map(|p| p.parse::<u32>().unwrap_or(0));
    let parsed = (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    );
    parsed >= minimum
}

fn rule_ripper_version(log: &ParsedLog, tally: &mut Tally) {
    match log.ripper {
        Ripper::EAC => {
            if eac_version(log).map_or(true, |v| v < 0.99) {
                tally.deduct(
                    Scope::Release,
                    Field::RipperVersion,
                    30,
                    "EAC version older than 0.99",
                );
            }
        }
        Ripper::Whipper | Ripper::Morituri => {
            let ok = log.ripper == Ripper::Whipper && whipper_version_at_least(log, (0, 7, 3));
            if !ok {
                tally.critical(
                    Field::RipperVersion,
                    100,
                    "Logs must be produced by whipper 0.7.3+",
                );
            }
        }
        _ => {}
    }
}

// ─── Settings Rules ─────────────────────────────────────────────────

fn known_nonsecure(log: &ParsedLog) -> bool {
    matches!(log.read_mode, ReadMode::Burst | ReadMode::Fast)
}

fn rule_read_mode(log: &ParsedLog, tally: &mut Tally) {
    if known_nonsecure(log) {
        tally.deduct(Scope::Release, Field::ReadMode, 20, "Rip mode not secure");
    } else if log.read_mode == ReadMode::Unknown {
        tally.deduct(
            Scope::Release,
            Field::ReadMode,
            1,
            "Could not verify read mode",
        );
    }
}

/// An unstated cache setting only matters in secure mode, where the
/// cache is what would silently defeat the re-reads.
fn rule_cache(log: &ParsedLog, tally: &mut Tally) {
    let fires = match log.defeat_audio_cache {
        Quartet::False => true,
        Quartet::Unknown => log.read_mode == ReadMode::Secure,
        _ => false,
    };
    if fires {
        tally.deduct(
            Scope::Release,
            Field::Cache,
            10,
            "\"Defeat audio cache\" should be Yes/true",
        );
    }
}

fn rule_c2(log: &ParsedLog, tally: &mut Tally) {
    if log.use_c2 == Quartet::True {
        tally.deduct(Scope::Release, Field::C2, 10, "C2 pointers were used");
    }
}

fn rule_offset(log: &ParsedLog, tally: &mut Tally) {
    match log.read_offset {
        None => tally.deduct(
            Scope::Release,
            Field::Offset,
            1,
            "Could not verify read offset",
        ),
        Some(claimed) => match drive_db::known_offset(&log.drive) {
            None => tally.deduct(
                Scope::Release,
                Field::Drive,
                0,
                "The drive was not found in the database",
            ),
            Some(known) if known != claimed => tally.deduct(
                Scope::Release,
                Field::Offset,
                5,
                "Incorrect read offset for drive",
            ),
            Some(_) => {}
        },
    }
    if log.combined_rw_offset.is_some() {
        tally.deduct(
            Scope::Release,
            Field::Offset,
            4,
            "Combined read/write offset cannot be verified",
        );
    }
}

fn rule_null_samples(log: &ParsedLog, tally: &mut Tally) {
    if log.ripper != Ripper::EAC {
        return;
    }
    match log.use_null_samples {
        Quartet::False => tally.deduct(
            Scope::Release,
            Field::NullSamples,
            5,
            "Null samples should be used in CRC calculations",
        ),
        // Pre-1.0 EAC does not always print the setting
        Quartet::Unknown if eac_version(log).map_or(true, |v| v < 1.0) => tally.deduct(
            Scope::Release,
            Field::NullSamples,
            0,
            "Could not verify null samples",
        ),
        _ => {}
    }
}

fn rule_gap(log: &ParsedLog, tally: &mut Tally) {
    match log.gap_handling {
        Gap::Unknown => tally.deduct(
            Scope::Release,
            Field::Gap,
            10,
            "Could not verify gap handling",
        ),
        Gap::AppendUndetected | Gap::Prepend | Gap::Discard => {
            tally.deduct(Scope::Release, Field::Gap, 10, "Incorrect gap handling")
        }
        Gap::Append | Gap::AppendNoHtoa | Gap::Inapplicable => {}
    }
}

fn rule_tag(log: &ParsedLog, tally: &mut Tally) {
    if log.ripper != Ripper::EAC {
        return;
    }
    match log.id3_enabled {
        Quartet::Unknown => tally.deduct(
            Scope::Release,
            Field::Tag,
            1,
            "Could not verify id3 tag setting",
        ),
        Quartet::True => tally.deduct(
            Scope::Release,
            Field::Tag,
            1,
            "ID3 tags should not be added to FLAC files",
        ),
        _ => {}
    }
}

fn rule_test_and_copy(log: &ParsedLog, tally: &mut Tally) {
    if log.test_and_copy == Quartet::False {
        tally.deduct(
            Scope::Release,
            Field::TestAndCopy,
            10,
            "Test and copy was not used",
        );
    }
}

fn rule_media_type(log: &ParsedLog, tally: &mut Tally) {
    if log.ripper != Ripper::XLD {
        return;
    }
    if !matches!(log.media_type, MediaType::Pressed | MediaType::Unknown) {
        tally.deduct(Scope::Release, Field::MediaType, 0, "Not a pressed cd");
    }
}

// ─── Track Rules ────────────────────────────────────────────────────

fn track_scope(track: &TrackEntry) -> Scope {
    if track.is_range {
        Scope::Track(None)
    } else {
        Scope::Track(Some(track.num))
    }
}

fn rule_range_rip(log: &ParsedLog, tally: &mut Tally) {
    if log.tracks.iter().any(|t| t.is_range) {
        tally.deduct(Scope::Release, Field::RangeSplit, 30, "Range rip detected");
    }
}

fn rule_filenames(log: &ParsedLog, tally: &mut Tally) {
    let unverifiable = !log.tracks.is_empty()
        && log
            .tracks
            .iter()
            .any(|t| t.filenames.iter().all(|f| f.trim().is_empty()));
    if unverifiable {
        tally.deduct(
            Scope::Release,
            Field::Filename,
            1,
            "Could not verify filename or file extension",
        );
    }
}

fn rule_abort(log: &ParsedLog, tally: &mut Tally) {
    if log.tracks.iter().any(|t| t.aborted) {
        tally.critical(Field::Abort, 100, "Copy aborted");
    }
}

fn rule_track_defects(log: &ParsedLog, tally: &mut Tally) {
    for track in &log.tracks {
        let scope = track_scope(track);
        if track.test_and_copy.integrity == Integrity::Mismatch {
            tally.deduct(scope, Field::Checksum, 30, "CRC mismatch");
        }
        if track.errors.jitter_generic.count > 0 {
            tally.deduct(
                scope,
                Field::JitterGenericError,
                20,
                "Timing problem(s) found",
            );
        }
        if track.errors.inconsistent_err_sectors.count > 0 {
            tally.deduct(
                scope,
                Field::InconsistentErrorSectors,
                20,
                "Suspicious position(s) found",
            );
        }
        if track.errors.damaged_sectors.count > 0 {
            tally.deduct(scope, Field::DamagedSector, 10, "Damaged sectors");
        }
    }
}

// ─── Derived Rules ──────────────────────────────────────────────────

fn rule_derived(log: &ParsedLog, tally: &mut Tally) {
    if !known_nonsecure(log) {
        return;
    }
    if log.test_and_copy == Quartet::False {
        tally.deduct(
            Scope::Release,
            Field::TestAndCopy,
            40,
            "Rip was not done in Secure mode, and T+C was not used - as a result, we cannot verify the authenticity of the rip",
        );
    }
    if log
        .tracks
        .iter()
        .any(|t| t.test_and_copy.integrity == Integrity::Mismatch)
    {
        tally.deduct(
            Scope::Release,
            Field::Checksum,
            20,
            "Rip was not done in Secure mode, and experienced CRC mismatches",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::track::TestAndCopy;

    /// A secure EAC rip with everything verifiable.
    fn clean_eac() -> ParsedLog {
        let mut log = ParsedLog::for_ripper(Ripper::EAC);
        log.ripper_version = "1.6".into();
        log.read_mode = ReadMode::Secure;
        log.defeat_audio_cache = Quartet::True;
        log.use_c2 = Quartet::False;
        log.read_offset = Some(6);
        log.drive = "ASUS BW-16D1HT".into();
        log.use_null_samples = Quartet::True;
        log.gap_handling = Gap::Append;
        log.id3_enabled = Quartet::False;
        log.test_and_copy = Quartet::True;
        let mut track = TrackEntry::new(1);
        track.filenames.push("01 One.flac".into());
        track.test_and_copy = TestAndCopy::new("AABB0011".into(), "AABB0011".into());
        log.tracks.push(track);
        log
    }

    fn score(log: &ParsedLog) -> i32 {
        CambiaEvaluator
            .evaluate(log)
            .score
            .parse()
            .unwrap()
    }

    #[test]
    fn test_clean_rip_is_perfect() {
        let evaluation = CambiaEvaluator.evaluate(&clean_eac());
        assert_eq!(evaluation.score, "100");
        assert!(evaluation.evaluation_units.is_empty());
    }

    #[test]
    fn test_burst_mode_costs_twenty() {
        let mut log = clean_eac();
        log.read_mode = ReadMode::Burst;
        // Cache state is irrelevant outside secure mode
        log.defeat_audio_cache = Quartet::Unknown;
        assert_eq!(score(&log), 80);
    }

    #[test]
    fn test_unknown_cache_in_secure_mode_fires() {
        let mut log = clean_eac();
        log.defeat_audio_cache = Quartet::Unknown;
        assert_eq!(score(&log), 90);
    }

    #[test]
    fn test_old_eac_version() {
        let mut log = clean_eac();
        log.ripper_version = "0.95 prebeta 5".into();
        assert_eq!(score(&log), 70);
    }

    #[test]
    fn test_unknown_drive_is_neutral() {
        let mut log = clean_eac();
        log.drive = "ACME TURBO RIPPER 9000".into();
        let evaluation = CambiaEvaluator.evaluate(&log);
        assert_eq!(evaluation.score, "100");
        assert_eq!(evaluation.evaluation_units.len(), 1);
        assert_eq!(
            evaluation.evaluation_units[0].data.class,
            Class::Neutral
        );
    }

    #[test]
    fn test_wrong_offset_for_known_drive() {
        let mut log = clean_eac();
        log.read_offset = Some(102);
        assert_eq!(score(&log), 95);
    }

    #[test]
    fn test_crc_mismatch_per_track() {
        let mut log = clean_eac();
        let mut bad = TrackEntry::new(2);
        bad.filenames.push("02 Two.flac".into());
        bad.test_and_copy = TestAndCopy::new("00000001".into(), "00000002".into());
        log.tracks.push(bad.clone());
        assert_eq!(score(&log), 70);
        // A second mismatching track deducts again
        let mut worse = bad;
        worse.num = 3;
        log.tracks.push(worse);
        assert_eq!(score(&log), 40);
    }

    #[test]
    fn test_fast_range_rip_goes_negative() {
        let mut log = clean_eac();
        log.read_mode = ReadMode::Fast;
        log.defeat_audio_cache = Quartet::False;
        log.id3_enabled = Quartet::Unknown;
        log.test_and_copy = Quartet::False;
        let mut range = TrackEntry::range();
        range.filenames.push("range.wav".into());
        range.test_and_copy = TestAndCopy::copy_only("AABB0011".into());
        log.tracks = vec![range];
        // 20 mode + 10 cache + 1 tag + 10 tc + 30 range + 40 derived
        assert_eq!(score(&log), -11);
    }

    #[test]
    fn test_abort_is_critical() {
        let mut log = clean_eac();
        log.tracks[0].aborted = true;
        let evaluation = CambiaEvaluator.evaluate(&log);
        assert_eq!(evaluation.score, "0");
        assert!(evaluation
            .evaluation_units
            .iter()
            .any(|u| u.data.field == Field::Abort && u.data.class == Class::Critical));
    }

    #[test]
    fn test_whipper_version_gate() {
        let mut log = ParsedLog::for_ripper(Ripper::Whipper);
        log.ripper_version = "0.5.1".into();
        let evaluation = CambiaEvaluator.evaluate(&log);
        assert!(evaluation
            .evaluation_units
            .iter()
            .any(|u| u.data.message == "Logs must be produced by whipper 0.7.3+"));

        log.ripper_version = "0.7.3".into();
        let evaluation = CambiaEvaluator.evaluate(&log);
        assert!(!evaluation
            .evaluation_units
            .iter()
            .any(|u| u.data.field == Field::RipperVersion));
    }

    #[test]
    fn test_morituri_always_gated() {
        let mut log = ParsedLog::for_ripper(Ripper::Morituri);
        log.ripper_version = "0.2.3".into();
        let evaluation = CambiaEvaluator.evaluate(&log);
        assert!(evaluation
            .evaluation_units
            .iter()
            .any(|u| u.data.class == Class::Critical));
    }

    #[test]
    fn test_xld_media_type_neutral() {
        let mut log = ParsedLog::for_ripper(Ripper::XLD);
        log.media_type = MediaType::CDR;
        let evaluation = CambiaEvaluator.evaluate(&log);
        assert!(evaluation
            .evaluation_units
            .iter()
            .any(|u| u.data.message == "Not a pressed cd" && u.unit_score == "0"));
    }

    #[test]
    fn test_incorrect_gap_handling() {
        let mut log = clean_eac();
        log.gap_handling = Gap::Prepend;
        assert_eq!(score(&log), 90);
        log.gap_handling = Gap::Unknown;
        assert_eq!(score(&log), 90);
        log.gap_handling = Gap::AppendNoHtoa;
        assert_eq!(score(&log), 100);
    }

    #[test]
    fn test_stacked_unverifiable_findings() {
        // Secure rip where cache, gaps, and tagging cannot be
        // confirmed: 10 + 10 + 1
        let mut log = clean_eac();
        log.defeat_audio_cache = Quartet::Unknown;
        log.gap_handling = Gap::Unknown;
        log.id3_enabled = Quartet::Unknown;
        assert_eq!(score(&log), 79);

        // An unverifiable offset shaves one more
        log.read_offset = None;
        assert_eq!(score(&log), 78);
    }
}
