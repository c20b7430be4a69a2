//! End-to-end pipeline coverage over fixture logs: one rip session per
//! family, a combined aborted-plus-retry file, a localized EAC log, and
//! the version gates.

use cambia::{
    parse_text, AccurateRipStatus, EvaluationUnitClass, EvaluationUnitField, Integrity, MediaType,
    Quartet, ReadMode, Ripper,
};

const EAC_CLEAN: &str = include_str!("logs/eac_clean.log");
const EAC_BURST: &str = include_str!("logs/eac_burst.log");
const EAC_ABORTED_RETRY: &str = include_str!("logs/eac_aborted_retry.log");
const EAC_RUSSIAN: &str = include_str!("logs/eac_russian.log");
const XLD_CLEAN: &str = include_str!("logs/xld_clean.log");
const WHIPPER_CLEAN: &str = include_str!("logs/whipper_clean.log");
const WHIPPER_OLD: &str = include_str!("logs/whipper_old.log");

fn combined_score(text: &str) -> String {
    parse_text(text).unwrap().evaluation_combined[0]
        .combined_score
        .clone()
}

#[test]
fn test_clean_eac_rip_scores_full() {
    let response = parse_text(EAC_CLEAN).unwrap();
    assert_eq!(response.parsed.parsed_logs.len(), 1);
    let log = &response.parsed.parsed_logs[0];
    assert_eq!(log.ripper, Ripper::EAC);
    assert_eq!(log.ripper_version, "1.6");
    assert_eq!(log.read_mode, ReadMode::Secure);
    assert_eq!(log.tracks.len(), 2);
    assert_eq!(log.tracks[0].ar_info[0].status, AccurateRipStatus::Match);
    assert_eq!(response.evaluation_combined[0].combined_score, "100");
    assert!(response.evaluation_combined[0].evaluations[0]
        .evaluation_units
        .is_empty());
}

#[test]
fn test_clean_eac_toc_fingerprints_derived() {
    let response = parse_text(EAC_CLEAN).unwrap();
    let toc = &response.parsed.parsed_logs[0].toc;
    assert_eq!(toc.raw.entries.len(), 2);
    assert_eq!(toc.freedb.hash.len(), 8);
    assert!(toc.accurip_tocid.hash.starts_with("dBAR-002-"));
    assert!(!toc.mbz.hash.is_empty());
}

#[test]
fn test_burst_rip_scores_eighty() {
    let response = parse_text(EAC_BURST).unwrap();
    assert_eq!(response.evaluation_combined[0].combined_score, "80");
    let units = &response.evaluation_combined[0].evaluations[0].evaluation_units;
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].data.message, "Rip mode not secure");
    assert_eq!(units[0].unit_score, "20");
}

#[test]
fn test_aborted_session_superseded_by_retry() {
    let response = parse_text(EAC_ABORTED_RETRY).unwrap();
    assert_eq!(response.parsed.parsed_logs.len(), 2);

    let combined = &response.evaluation_combined[0];
    assert!(combined.evaluations[0]
        .evaluation_units
        .iter()
        .any(|u| u.data.field == EvaluationUnitField::Abort
            && u.data.class == EvaluationUnitClass::Critical));
    assert_eq!(combined.evaluations[1].score, "100");
    // The aborted attempt does not drag down the rerun
    assert_eq!(combined.combined_score, "100");
}

#[test]
fn test_russian_log_parses_like_english() {
    let response = parse_text(EAC_RUSSIAN).unwrap();
    let log = &response.parsed.parsed_logs[0];
    assert_eq!(log.language, "ru");
    assert_eq!(log.read_mode, ReadMode::Secure);
    assert_eq!(log.defeat_audio_cache, Quartet::True);
    assert_eq!(log.read_offset, Some(48));
    assert_eq!(log.tracks.len(), 2);
    assert_eq!(log.tracks[1].test_and_copy.integrity, Integrity::Match);
    assert_eq!(response.evaluation_combined[0].combined_score, "100");
}

#[test]
fn test_xld_rip_parses_and_scores() {
    let response = parse_text(XLD_CLEAN).unwrap();
    let log = &response.parsed.parsed_logs[0];
    assert_eq!(log.ripper, Ripper::XLD);
    assert_eq!(log.media_type, MediaType::Pressed);
    assert_eq!(log.read_offset, Some(667));
    assert_eq!(log.tracks.len(), 2);
    assert_eq!(log.tracks[0].test_and_copy.copy_hash_skipzero, "9F8E7D6C");
    assert!(!log.checksum.log.is_empty());
    assert_eq!(response.evaluation_combined[0].combined_score, "100");
}

#[test]
fn test_whipper_self_checksum_verified() {
    let response = parse_text(WHIPPER_CLEAN).unwrap();
    let log = &response.parsed.parsed_logs[0];
    assert_eq!(log.ripper, Ripper::Whipper);
    assert_eq!(log.checksum.integrity, Integrity::Match);
    assert_eq!(log.drive, "HL-DT-ST:BD-RE BH16NS40");
    assert_eq!(response.evaluation_combined[0].combined_score, "100");
}

#[test]
fn test_old_whipper_fails_version_gate() {
    let response = parse_text(WHIPPER_OLD).unwrap();
    assert_eq!(response.evaluation_combined[0].combined_score, "0");
    let units = &response.evaluation_combined[0].evaluations[0].evaluation_units;
    assert!(units
        .iter()
        .any(|u| u.data.message == "Logs must be produced by whipper 0.7.3+"
            && u.data.class == EvaluationUnitClass::Critical));
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse_text(EAC_CLEAN).unwrap();
    let second = parse_text(EAC_CLEAN).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_response_serializes_with_string_scores() {
    let response = parse_text(EAC_BURST).unwrap();
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"combined_score\":\"80\""));
    assert!(json.contains("\"unit_score\":\"20\""));
    assert!(json.contains("\"ripper_version\":\"1.5\""));
}
