//! Ripper-agnostic structured model
//!
//! Everything a log *claims* happened during extraction, normalized
//! across ripper families. All values are constructed once per parse
//! call and immutable thereafter.

pub mod checksum;
pub mod toc;
pub mod track;

use serde::{Deserialize, Serialize};

// ─── Ripper Families ────────────────────────────────────────────────

/// The program that produced a log segment. Drives grammar selection.
///
/// Grammar modules exist for EAC, XLD, and Whipper; the remaining
/// variants are recognized names carried for model completeness (the
/// detector never claims a segment for them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ripper {
    EAC,
    XLD,
    Whipper,
    CueRipper,
    DBPA,
    CyanRip,
    EZCD,
    Morituri,
    Rip,
    FreAc,
    Other,
}

impl std::fmt::Display for Ripper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ripper::EAC => "EAC",
            Ripper::XLD => "XLD",
            // Community-facing name is lowercase
            Ripper::Whipper => "whipper",
            Ripper::CueRipper => "CueRipper",
            Ripper::DBPA => "dBpoweramp",
            Ripper::CyanRip => "cyanrip",
            Ripper::EZCD => "EZ CD Audio Converter",
            Ripper::Morituri => "morituri",
            Ripper::Rip => "Rip",
            Ripper::FreAc => "fre:ac",
            Ripper::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

// ─── Claim States ───────────────────────────────────────────────────

/// Four-state outcome for boolean-like settings claimed by a log.
///
/// A log that never mentions a setting yields `Unknown`, never a false
/// `True`; a setting the ripper cannot have at all is `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Quartet {
    True,
    False,
    #[default]
    Unknown,
    Unsupported,
}

impl Quartet {
    /// Map a claimed yes/no token to a state. EAC and XLD both use
    /// bare `Yes`/`No`; XLD additionally prints `OK` for the cache
    /// setting when the drive qualifies.
    pub fn from_yes_no(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "ok" | "true" => Quartet::True,
            "no" | "false" => Quartet::False,
            _ => Quartet::Unknown,
        }
    }
}

/// Read strategy the drive was driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReadMode {
    Secure,
    Paranoid,
    Fast,
    Burst,
    #[default]
    Unknown,
}

impl ReadMode {
    /// Secure and Paranoid both re-read and verify; Fast and Burst
    /// trade verification for speed.
    pub fn is_secure(&self) -> bool {
        matches!(self, ReadMode::Secure | ReadMode::Paranoid)
    }
}

/// How inter-track pre-gap audio was assigned during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gap {
    Append,
    AppendNoHtoa,
    AppendUndetected,
    Prepend,
    Discard,
    #[default]
    Unknown,
    /// The ripper handles gaps internally and never reports a mode
    Inapplicable,
}

/// Physical medium as claimed by the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MediaType {
    Pressed,
    CDR,
    Other,
    #[default]
    Unknown,
}

// ─── Release Metadata ───────────────────────────────────────────────

/// Artist/title pair as claimed in the log header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReleaseInfo {
    pub artist: String,
    pub title: String,
}

impl ReleaseInfo {
    pub fn new(artist: String, title: String) -> Self {
        Self { artist, title }
    }

    /// Split the `Artist / Title` header line the way EAC and XLD
    /// format it. A line with no separator yields an empty claim.
    pub fn from_header_line(line: &str) -> Self {
        match line.split_once(" / ") {
            Some((artist, title)) => {
                Self::new(artist.trim().to_owned(), title.trim().to_owned())
            }
            None => Self::default(),
        }
    }
}
