use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic query window for paged reads. A `limit` of 0 means unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// One evaluated action, as appended by the gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionAudit {
    /// Consent anchor supplied with the request, if any.
    pub anchor: Option<String>,
    pub subject_group: String,
    pub purpose_scope: Option<String>,
    /// Per-gate scores keyed by gate name.
    pub evaluator_scores: BTreeMap<String, f64>,
    pub overall_pass: bool,
    /// The full gate context as received, for replay.
    pub raw_context: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

/// One generated consent anchor, as appended by the gateway.
///
/// Carries a one-way hash of the authorizer, never the identity itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnchorAudit {
    pub anchor: String,
    pub subject_group: String,
    pub purpose_scope: String,
    pub hashed_authorizer: String,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_audit_serialization_roundtrip() {
        let mut scores = BTreeMap::new();
        scores.insert("non_harm".to_string(), 0.95);
        scores.insert("boundary".to_string(), 0.90);

        let audit = ActionAudit {
            anchor: Some("CR-abc".into()),
            subject_group: "nz-smokers".into(),
            purpose_scope: Some("population_mortality".into()),
            evaluator_scores: scores,
            overall_pass: true,
            raw_context: serde_json::json!({"confidence": 0.75}),
            recorded_at: Utc::now(),
        };
        let json = serde_json::to_string(&audit).unwrap();
        let restored: ActionAudit = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.evaluator_scores["non_harm"], 0.95);
        assert!(restored.overall_pass);
    }
}
