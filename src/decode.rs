//! Text-decoding boundary
//!
//! The core pipeline only ever consumes already-decoded text together
//! with the name of the encoding it was decoded from. This module is
//! the collaborator that produces that pair for the byte-based entry
//! points: it recognizes the byte-order marks rippers actually emit
//! (EAC writes UTF-16LE, XLD and whipper write UTF-8) and otherwise
//! falls back to UTF-8 with Latin-1 as a last resort. Nothing past this
//! boundary looks at raw bytes again.

/// Decoded log text plus the declared name of its original encoding.
/// The encoding name is recorded verbatim in `ParsedLogCombined`.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: String,
}

impl DecodedText {
    pub fn new(text: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            encoding: encoding.into(),
        }
    }

    /// Decode raw log bytes. BOM-marked UTF-16 (both endians) and UTF-8
    /// are handled exactly; BOM-less input is tried as UTF-8 first and
    /// mapped byte-for-byte from Latin-1 if that fails, so no input is
    /// ever rejected at the decoding stage.
    pub fn from_bytes(raw: &[u8]) -> Self {
        match raw {
            [0xFF, 0xFE, rest @ ..] => Self::new(utf16_to_string(rest, true), "UTF-16LE"),
            [0xFE, 0xFF, rest @ ..] => Self::new(utf16_to_string(rest, false), "UTF-16BE"),
            [0xEF, 0xBB, 0xBF, rest @ ..] => {
                Self::new(String::from_utf8_lossy(rest).into_owned(), "UTF-8")
            }
            _ => match std::str::from_utf8(raw) {
                Ok(text) => Self::new(text, "UTF-8"),
                Err(_) => Self::new(
                    raw.iter().map(|&b| b as char).collect::<String>(),
                    "ISO-8859-1",
                ),
            },
        }
    }
}

fn utf16_to_string(raw: &[u8], little_endian: bool) -> String {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let decoded = DecodedText::from_bytes("plain ascii log".as_bytes());
        assert_eq!(decoded.text, "plain ascii log");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut raw = vec![0xEF, 0xBB, 0xBF];
        raw.extend_from_slice("hello".as_bytes());
        let decoded = DecodedText::from_bytes(&raw);
        assert_eq!(decoded.text, "hello");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn test_utf16le_bom() {
        let mut raw = vec![0xFF, 0xFE];
        for unit in "Exact Audio Copy".encode_utf16() {
            raw.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = DecodedText::from_bytes(&raw);
        assert_eq!(decoded.text, "Exact Audio Copy");
        assert_eq!(decoded.encoding, "UTF-16LE");
    }

    #[test]
    fn test_utf16be_bom() {
        let mut raw = vec![0xFE, 0xFF];
        for unit in "XLD".encode_utf16() {
            raw.extend_from_slice(&unit.to_be_bytes());
        }
        let decoded = DecodedText::from_bytes(&raw);
        assert_eq!(decoded.text, "XLD");
        assert_eq!(decoded.encoding, "UTF-16BE");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let raw = vec![b'c', b'a', b'f', 0xE9];
        let decoded = DecodedText::from_bytes(&raw);
        assert_eq!(decoded.text, "café");
        assert_eq!(decoded.encoding, "ISO-8859-1");
    }
}
