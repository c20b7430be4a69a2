//! Table of contents and disc fingerprints
//!
//! The TOC a log claims is both display data and the authenticity
//! anchor: the disc ids that lookup databases key on (FreeDB,
//! AccurateRip, CTDB, MusicBrainz) are all pure functions of the track
//! offsets, so they are derived here once from the raw claimed entries.

use base64::{alphabet::Alphabet, engine::general_purpose::NO_PAD, engine::GeneralPurpose, Engine as _};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::time::Time;

/// Audio CDs address in frames, 75 per second, with a 2-second
/// (150-frame) lead-in before the first sector.
const LEAD_IN_FRAMES: u32 = 150;
const FRAMES_PER_SECOND: u32 = 75;

// ─── Raw Entries ────────────────────────────────────────────────────

/// One TOC row as printed in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub track: u32,
    pub start: Time,
    pub length: Time,
    pub start_sector: u32,
    pub end_sector: u32,
}

impl TocEntry {
    pub fn new(track: u32, start: Time, length: Time, start_sector: u32, end_sector: u32) -> Self {
        Self {
            track,
            start,
            length,
            start_sector,
            end_sector,
        }
    }
}

/// The literal TOC rows, source order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TocRaw {
    pub entries: Vec<TocEntry>,
}

impl TocRaw {
    pub fn new(entries: Vec<TocEntry>) -> Self {
        Self { entries }
    }

    /// Frame of the lead-out (one past the last sector, lead-in
    /// included), the sentinel every disc id algorithm needs.
    fn leadout_frame(&self) -> u32 {
        self.entries
            .last()
            .map(|e| e.end_sector + 1 + LEAD_IN_FRAMES)
            .unwrap_or_default()
    }
}

// ─── Fingerprints ───────────────────────────────────────────────────

/// One derived disc id plus the lookup URL it keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TocHash {
    pub hash: String,
    pub url: String,
}

impl TocHash {
    fn new(hash: String, url: String) -> Self {
        Self { hash, url }
    }
}

/// The claimed TOC plus every fingerprint derived from it. All hashes
/// are empty when the log carried no TOC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Toc {
    pub raw: TocRaw,
    pub freedb: TocHash,
    pub accurip_tocid: TocHash,
    pub ctdb_tocid: TocHash,
    pub mbz: TocHash,
    pub gn: TocHash,
    pub mcdi: TocHash,
}

impl Toc {
    pub fn new(raw: TocRaw) -> Self {
        if raw.entries.is_empty() {
            return Self {
                raw,
                ..Self::default()
            };
        }

        let freedb = freedb_id(&raw);
        let accurip_tocid = accuraterip_id(&raw, &freedb.hash);
        let ctdb_tocid = ctdb_id(&raw);
        let mbz = musicbrainz_id(&raw);
        let gn = gracenote_toc(&raw);
        let mcdi = mcdi_blob(&raw);

        Self {
            raw,
            freedb,
            accurip_tocid,
            ctdb_tocid,
            mbz,
            gn,
            mcdi,
        }
    }
}

// ─── FreeDB ─────────────────────────────────────────────────────────

/// Classic CDDB disc id: checksum byte, playing time, track count.
fn freedb_id(raw: &TocRaw) -> TocHash {
    let mut checksum: u32 = 0;
    for entry in &raw.entries {
        let mut seconds = (entry.start_sector + LEAD_IN_FRAMES) / FRAMES_PER_SECOND;
        while seconds > 0 {
            checksum += seconds % 10;
            seconds /= 10;
        }
    }

    let first_second = (raw.entries[0].start_sector + LEAD_IN_FRAMES) / FRAMES_PER_SECOND;
    let total_seconds = raw.leadout_frame() / FRAMES_PER_SECOND - first_second;
    let track_count = raw.entries.len() as u32;

    let id = ((checksum % 0xFF) << 24) | (total_seconds << 8) | track_count;
    let hash = format!("{:08X}", id);
    let url = format!("https://gnudb.org/cd/{}", hash.to_ascii_lowercase());
    TocHash::new(hash, url)
}

// ─── AccurateRip ────────────────────────────────────────────────────

/// AccurateRip disc ids: plain and weighted sums over track offsets
/// plus the lead-out, rendered as the `dBAR` lookup name.
fn accuraterip_id(raw: &TocRaw, freedb: &str) -> TocHash {
    let mut id1: u32 = 0;
    let mut id2: u32 = 0;

    for (idx, entry) in raw.entries.iter().enumerate() {
        let offset = entry.start_sector;
        id1 = id1.wrapping_add(offset);
        id2 = id2.wrapping_add(offset.max(1).wrapping_mul(idx as u32 + 1));
    }

    let leadout = raw.leadout_frame() - LEAD_IN_FRAMES;
    id1 = id1.wrapping_add(leadout);
    id2 = id2.wrapping_add(leadout.wrapping_mul(raw.entries.len() as u32 + 1));

    let hash = format!(
        "dBAR-{:03}-{:08x}-{:08x}-{}",
        raw.entries.len(),
        id1,
        id2,
        freedb.to_ascii_lowercase()
    );
    let url = format!(
        "http://www.accuraterip.com/accuraterip/{:x}/{:x}/{:x}/{}.bin",
        id1 & 0xF,
        (id1 >> 4) & 0xF,
        (id1 >> 8) & 0xF,
        hash
    );
    TocHash::new(hash, url)
}

// ─── MusicBrainz / CTDB ─────────────────────────────────────────────

/// MusicBrainz and CTDB share the same URL-safe base64 rendering of a
/// SHA-1: `+` → `.`, `/` → `_`, and padding `=` → `-`.
fn disc_id_base64(digest: &[u8]) -> String {
    let alphabet = Alphabet::new(
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._",
    )
    .expect("static alphabet is valid");
    let engine = GeneralPurpose::new(&alphabet, NO_PAD);
    let mut encoded = engine.encode(digest);
    // SHA-1 is 20 bytes, so the canonical form carries one pad char
    encoded.push('-');
    encoded
}

/// MusicBrainz disc id: SHA-1 over first/last track numbers, the
/// lead-out frame, and all 99 offset slots, each as uppercase hex.
fn musicbrainz_id(raw: &TocRaw) -> TocHash {
    let first = raw.entries.first().map(|e| e.track).unwrap_or(1);
    let last = raw.entries.last().map(|e| e.track).unwrap_or(1);

    let mut message = format!("{:02X}{:02X}{:08X}", first, last, raw.leadout_frame());
    for slot in 0..99 {
        let offset = raw
            .entries
            .get(slot)
            .map(|e| e.start_sector + LEAD_IN_FRAMES)
            .unwrap_or(0);
        message.push_str(&format!("{:08X}", offset));
    }

    let hash = disc_id_base64(&Sha1::digest(message.as_bytes()));
    let url = format!(
        "https://musicbrainz.org/cdtoc/{}",
        hash
    );
    TocHash::new(hash, url)
}

/// CTDB TOCID: same rendering as MusicBrainz over the audio offsets
/// and lead-out, without the track-number prefix.
fn ctdb_id(raw: &TocRaw) -> TocHash {
    let mut message = String::new();
    for entry in &raw.entries {
        message.push_str(&format!("{:08X}", entry.start_sector + LEAD_IN_FRAMES));
    }
    message.push_str(&format!("{:08X}", raw.leadout_frame()));

    let hash = disc_id_base64(&Sha1::digest(message.as_bytes()));
    let url = format!("https://db.cuetools.net/?tocid={}", hash);
    TocHash::new(hash, url)
}

// ─── Gracenote / MCDI ───────────────────────────────────────────────

/// Gracenote keys on the literal space-joined offset list.
fn gracenote_toc(raw: &TocRaw) -> TocHash {
    let mut offsets: Vec<String> = raw
        .entries
        .iter()
        .map(|e| (e.start_sector + LEAD_IN_FRAMES).to_string())
        .collect();
    offsets.push(raw.leadout_frame().to_string());
    TocHash::new(offsets.join(" "), String::new())
}

/// Windows MCDI blob equivalent: the offsets as a little-endian u32
/// sequence, hex-rendered.
fn mcdi_blob(raw: &TocRaw) -> TocHash {
    let mut bytes: Vec<u8> = Vec::with_capacity((raw.entries.len() + 1) * 4);
    for entry in &raw.entries {
        bytes.extend_from_slice(&(entry.start_sector + LEAD_IN_FRAMES).to_le_bytes());
    }
    bytes.extend_from_slice(&raw.leadout_frame().to_le_bytes());
    TocHash::new(hex::encode_upper(bytes), String::new())
}
