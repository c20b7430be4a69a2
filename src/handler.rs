//! Public entry points
//!
//! Thin orchestration over the pipeline: empty-input check, decoding,
//! segmentation and parsing, evaluation, response assembly. All entry
//! points are pure functions of their input; `parse_path` is the single
//! convenience that touches the filesystem.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::decode::DecodedText;
use crate::model::Ripper;
use crate::parser::{self, ParsedLogCombined};
use crate::response::CambiaResponse;
use crate::{CambiaError, CambiaResult};

/// Ripper families with a full grammar. Order is detector priority.
pub fn supported_rippers() -> &'static [Ripper] {
    &[Ripper::EAC, Ripper::XLD, Ripper::Whipper]
}

/// Parse already-decoded log text. The identity token is the SHA-256
/// of the text.
pub fn parse_text(text: &str) -> CambiaResult<CambiaResponse> {
    parse_decoded(DecodedText::new(text, "UTF-8"))
}

/// Parse text decoded by an external collaborator, preserving its
/// declared encoding name.
pub fn parse_decoded(decoded: DecodedText) -> CambiaResult<CambiaResponse> {
    if decoded.text.trim().is_empty() {
        return Err(CambiaError::EmptyInput);
    }
    let id = Sha256::digest(decoded.text.as_bytes()).to_vec();
    assemble(id, decoded)
}

/// Parse raw log bytes. An empty `id` is replaced with the SHA-256 of
/// the bytes.
pub fn parse_bytes(id: Vec<u8>, raw: &[u8]) -> CambiaResult<CambiaResponse> {
    if raw.is_empty() {
        return Err(CambiaError::EmptyInput);
    }
    let decoded = DecodedText::from_bytes(raw);
    if decoded.text.trim().is_empty() {
        return Err(CambiaError::EmptyInput);
    }
    let id = if id.is_empty() {
        Sha256::digest(raw).to_vec()
    } else {
        id
    };
    assemble(id, decoded)
}

/// Read a log file and parse it.
pub fn parse_path(path: impl AsRef<Path>) -> CambiaResult<CambiaResponse> {
    let raw = std::fs::read(path.as_ref()).map_err(CambiaError::IoFailure)?;
    parse_bytes(Vec::new(), &raw)
}

fn assemble(id: Vec<u8>, decoded: DecodedText) -> CambiaResult<CambiaResponse> {
    let parsed_logs = parser::parse_segments(&decoded.text)?;
    tracing::debug!(
        sessions = parsed_logs.len(),
        encoding = %decoded.encoding,
        "parsed submission"
    );
    let parsed = ParsedLogCombined {
        parsed_logs,
        encoding: decoded.encoding,
    };
    Ok(CambiaResponse::new(id, parsed))
}
