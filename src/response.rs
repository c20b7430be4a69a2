//! Response assembly
//!
//! The terminal artifact of a parse call: the identity token, the full
//! parsed model, and one verdict per registered evaluator profile, in
//! registry order.

use serde::{Deserialize, Serialize};

use crate::evaluate::{evaluate_all, EvaluationCombined};
use crate::parser::ParsedLogCombined;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CambiaResponse {
    /// Caller-supplied fingerprint, or a content hash assigned at the
    /// handler boundary
    pub id: Vec<u8>,
    pub parsed: ParsedLogCombined,
    pub evaluation_combined: Vec<EvaluationCombined>,
}

impl CambiaResponse {
    pub fn new(id: Vec<u8>, parsed: ParsedLogCombined) -> Self {
        let evaluation_combined = evaluate_all(&parsed);
        Self {
            id,
            parsed,
            evaluation_combined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedLog;

    #[test]
    fn test_response_carries_one_verdict_per_profile() {
        let parsed = ParsedLogCombined {
            parsed_logs: vec![ParsedLog::default()],
            encoding: "UTF-8".to_owned(),
        };
        let response = CambiaResponse::new(vec![1, 2, 3], parsed);
        assert_eq!(response.id, vec![1, 2, 3]);
        assert_eq!(response.evaluation_combined.len(), 1);
        assert_eq!(
            response.evaluation_combined[0].evaluations.len(),
            response.parsed.parsed_logs.len()
        );
    }

    #[test]
    fn test_response_serializes() {
        let parsed = ParsedLogCombined {
            parsed_logs: vec![],
            encoding: "UTF-8".to_owned(),
        };
        let response = CambiaResponse::new(Vec::new(), parsed);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"evaluation_combined\""));
    }
}
