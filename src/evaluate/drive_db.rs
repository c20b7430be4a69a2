//! Embedded drive read-offset table
//!
//! A claimed read-offset correction can only be judged against the
//! drive's known offset. This table carries the common drives from the
//! AccurateRip submission corpus; lookup normalizes vendor padding and
//! revision qualifiers out of the claimed drive string first.

/// Known drives and their read offsets, in samples.
static DRIVE_OFFSETS: &[(&str, i16)] = &[
    ("ASUS BC-12D2HT", 6),
    ("ASUS BW-16D1HT", 6),
    ("ASUS DRW-24B1ST", 6),
    ("HL-DT-ST BD-RE BH16NS40", 6),
    ("HL-DT-ST BD-RE BH16NS55", 6),
    ("HL-DT-ST BD-RE WH16NS40", 6),
    ("HL-DT-ST DVDRAM GH22NS50", 667),
    ("HL-DT-ST DVDRAM GH24NSC0", 6),
    ("HL-DT-ST DVDRAM GSA-H10N", 667),
    ("HL-DT-ST DVDRAM GT30N", 667),
    ("HL-DT-ST DVDRW GA32N", 667),
    ("HL-DT-ST DVDRW GX30N", 667),
    ("LITE-ON DVDRW SOHW-1633S", 12),
    ("LITE-ON IHAS124", 6),
    ("MATSHITA BD-MLT UJ260AF", 103),
    ("MATSHITA CD-RW CW-8124", 98),
    ("MATSHITA DVD-R UJ-868", 102),
    ("MATSHITA DVD-R UJ-875", 102),
    ("MATSHITA DVD+-RW UJ8C2", 103),
    ("OPTIARC BD RW BD-5300S", 48),
    ("OPTIARC DVD RW AD-5280S", 48),
    ("OPTIARC DVD RW AD-7240S", 48),
    ("OPTIARC DVD RW AD-7260S", 48),
    ("PIONEER BD-RW BDR-209D", 667),
    ("PIONEER BD-RW BDR-212D", 667),
    ("PIONEER DVD-RW DVR-216D", 667),
    ("PLEXTOR CD-R PREMIUM2", 30),
    ("PLEXTOR DVDR PX-716A", 30),
    ("PLEXTOR DVDR PX-760A", 30),
    ("PLEXTOR PX-716A", 30),
    ("PLEXTOR PX-W4824A", 98),
    ("SAMSUNG SH-224DB", 6),
    ("SLIMTYPE BD E DS4E1S", 6),
    ("TSSTCORP CDDVDW SH-224BB", 6),
    ("TSSTCORP CDDVDW SH-S223C", 6),
    ("TSSTCORP DVD+-RW TS-L633C", 6),
];

/// Uppercase, drop revision qualifiers, collapse padding. EAC pads
/// vendor/model into columns and XLD appends `(revision …)`.
fn normalize(drive: &str) -> String {
    let stripped = drive.split("(revision").next().unwrap_or(drive);
    // whipper joins vendor and model with a colon
    stripped
        .replace(':', " ")
        .to_ascii_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Known read offset for a claimed drive string, `None` when the drive
/// is not in the table.
pub fn known_offset(drive: &str) -> Option<i16> {
    if drive.trim().is_empty() {
        return None;
    }
    let normalized = normalize(drive);
    DRIVE_OFFSETS
        .iter()
        .find(|(name, _)| normalized.contains(name))
        .map(|&(_, offset)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name() {
        assert_eq!(known_offset("ASUS BW-16D1HT"), Some(6));
    }

    #[test]
    fn test_padded_eac_form() {
        assert_eq!(known_offset("PLEXTOR   PX-716A"), Some(30));
    }

    #[test]
    fn test_revision_qualifier_stripped() {
        assert_eq!(known_offset("HL-DT-ST DVDRW  GA32N (revision KC08)"), Some(667));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(known_offset("Optiarc DVD RW AD-7240S"), Some(48));
    }

    #[test]
    fn test_unknown_drive() {
        assert_eq!(known_offset("ACME TURBO RIPPER 9000"), None);
        assert_eq!(known_offset(""), None);
    }
}
