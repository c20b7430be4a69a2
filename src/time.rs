//! Audio timestamp parsing
//!
//! Rippers print positions and lengths in several layouts: EAC and XLD
//! TOC tables use `mm:ss.ff` (CD frames, 75 per second), XLD error
//! position lists use `mm:ss:cc` (centiseconds), pre-gap lengths use
//! `hh:mm:ss` or `mm:ss:cc` depending on family and version. `Time`
//! normalizes them all to a single millisecond-resolution value that
//! serializes as fractional seconds.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A duration or position within the rip, millisecond resolution.
/// Serializes as `f64` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Time {
    millis: u64,
}

impl Time {
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// `mm:ss` with an optional `.ff` CD-frame suffix (75 frames per
    /// second), the layout of EAC and XLD TOC tables.
    pub fn from_mm_ss(value: &str) -> Self {
        let value = value.trim();
        let (clock, frames) = match value.split_once('.') {
            Some((clock, frames)) => (clock, parse_u64(frames)),
            None => (value, 0),
        };
        let millis = clock_to_millis(clock) + frames * 1000 / 75;
        Self { millis }
    }

    /// `mm:ss:cc` or `mm:ss.cc`, centisecond resolution; three-part
    /// colon layouts are treated as centiseconds, the form XLD uses for
    /// error position lists and EAC for pre-gap lengths.
    pub fn from_mm_ss_cs(value: &str) -> Self {
        let value = value.trim();
        let parts: Vec<&str> = value.split([':', '.']).collect();
        let millis = match parts.as_slice() {
            [mm, ss, cc] => {
                (parse_u64(mm) * 60 + parse_u64(ss)) * 1000 + parse_u64(cc) * 10
            }
            [mm, ss] => (parse_u64(mm) * 60 + parse_u64(ss)) * 1000,
            [ss] => parse_u64(ss) * 1000,
            _ => 0,
        };
        Self { millis }
    }

    /// `h:mm:ss` (or `mm:ss`, or bare seconds).
    pub fn from_h_mm_ss(value: &str) -> Self {
        Self {
            millis: clock_to_millis(value.trim()),
        }
    }

    /// Bare seconds.
    pub fn from_ss(value: &str) -> Self {
        Self {
            millis: parse_u64(value.trim()) * 1000,
        }
    }
}

fn parse_u64(value: &str) -> u64 {
    value.trim().parse::<u64>().unwrap_or_default()
}

/// Colon-separated clock reading, most significant unit first.
fn clock_to_millis(clock: &str) -> u64 {
    clock
        .split(':')
        .fold(0u64, |acc, part| acc * 60 + parse_u64(part))
        * 1000
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Time::from_millis((secs * 1000.0).round() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_ss_with_frames() {
        // 4:03.25 = 243s + 25/75s
        let t = Time::from_mm_ss("4:03.25");
        assert_eq!(t.as_millis(), 243_000 + 25 * 1000 / 75);
    }

    #[test]
    fn test_mm_ss_without_frames() {
        assert_eq!(Time::from_mm_ss("0:13").as_millis(), 13_000);
    }

    #[test]
    fn test_mm_ss_cs_colon_layout() {
        assert_eq!(Time::from_mm_ss_cs("02:45:30").as_millis(), 165_300);
    }

    #[test]
    fn test_mm_ss_cs_two_part() {
        assert_eq!(Time::from_mm_ss_cs("02:45").as_millis(), 165_000);
    }

    #[test]
    fn test_h_mm_ss() {
        assert_eq!(Time::from_h_mm_ss("1:02:03").as_millis(), 3_723_000);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(Time::from_mm_ss("??").as_millis(), 0);
        assert_eq!(Time::from_ss("abc").as_millis(), 0);
    }

    #[test]
    fn test_serializes_as_seconds() {
        let json = serde_json::to_string(&Time::from_millis(1500)).unwrap();
        assert_eq!(json, "1.5");
    }
}
