use serde::{Deserialize, Serialize};

/// The five gates, in their fixed evaluation and reporting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateName {
    NonHarm,
    Truthfulness,
    Consent,
    Boundary,
    Diversity,
}

impl GateName {
    /// All gates in reporting order. `blocking_reasons` entries follow this
    /// order regardless of which gate failed first.
    pub const ALL: [GateName; 5] = [
        GateName::NonHarm,
        GateName::Truthfulness,
        GateName::Consent,
        GateName::Boundary,
        GateName::Diversity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GateName::NonHarm => "non_harm",
            GateName::Truthfulness => "truthfulness",
            GateName::Consent => "consent",
            GateName::Boundary => "boundary",
            GateName::Diversity => "diversity",
        }
    }
}

/// Why a gate passed or blocked: a stable machine-parsable code plus a
/// human-readable message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerdictReason {
    pub code: String,
    pub message: String,
}

/// One gate's result. `score` is `0.0` whenever `pass` is false; scores are
/// only comparable within a single gate's own scale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateVerdict {
    pub pass: bool,
    pub score: f64,
    pub reason: VerdictReason,
}

impl GateVerdict {
    pub fn passed(score: f64, code: &str, message: impl Into<String>) -> Self {
        Self {
            pass: true,
            score,
            reason: VerdictReason {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn blocked(code: &str, message: impl Into<String>) -> Self {
        Self {
            pass: false,
            score: 0.0,
            reason: VerdictReason {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

/// The orchestrator's combined result: all five verdicts, the weighted
/// composite, and the ordered blocking reasons. Immutable once built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositeVerdict {
    pub non_harm: GateVerdict,
    pub truthfulness: GateVerdict,
    pub consent: GateVerdict,
    pub boundary: GateVerdict,
    pub diversity: GateVerdict,
    /// Weighted composite, rounded to three decimals. Forced to 0.0 by a
    /// boundary-gate failure.
    pub composite_score: f64,
    pub overall_pass: bool,
    /// One `"<gate>: <message>"` entry per failing gate, in `GateName::ALL`
    /// order.
    pub blocking_reasons: Vec<String>,
}

impl CompositeVerdict {
    /// The five verdicts paired with their names, in reporting order.
    pub fn verdicts(&self) -> [(GateName, &GateVerdict); 5] {
        [
            (GateName::NonHarm, &self.non_harm),
            (GateName::Truthfulness, &self.truthfulness),
            (GateName::Consent, &self.consent),
            (GateName::Boundary, &self.boundary),
            (GateName::Diversity, &self.diversity),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_verdict_has_zero_score() {
        let v = GateVerdict::blocked("CODE", "message");
        assert!(!v.pass);
        assert_eq!(v.score, 0.0);
        assert_eq!(v.reason.code, "CODE");
    }

    #[test]
    fn gate_names_are_stable() {
        let names: Vec<_> = GateName::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(
            names,
            vec!["non_harm", "truthfulness", "consent", "boundary", "diversity"]
        );
    }

    #[test]
    fn composite_verdict_serialization_roundtrip() {
        let verdict = CompositeVerdict {
            non_harm: GateVerdict::passed(0.95, "NON_HARM_CLEAR", "ok"),
            truthfulness: GateVerdict::passed(0.825, "EVIDENCE_SUFFICIENT", "ok"),
            consent: GateVerdict::passed(0.95, "CONSENT_VERIFIED", "ok"),
            boundary: GateVerdict::passed(0.90, "SCOPE_APPROVED", "ok"),
            diversity: GateVerdict::passed(0.72, "ENSEMBLE_SUFFICIENT", "ok"),
            composite_score: 0.874,
            overall_pass: true,
            blocking_reasons: vec![],
        };
        let json = serde_json::to_string(&verdict).unwrap();
        let restored: CompositeVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.composite_score, 0.874);
        assert!(restored.overall_pass);
    }

    #[test]
    fn verdicts_follow_reporting_order() {
        let verdict = CompositeVerdict {
            non_harm: GateVerdict::passed(0.95, "A", "ok"),
            truthfulness: GateVerdict::passed(0.825, "B", "ok"),
            consent: GateVerdict::passed(0.95, "C", "ok"),
            boundary: GateVerdict::passed(0.90, "D", "ok"),
            diversity: GateVerdict::passed(0.72, "E", "ok"),
            composite_score: 0.874,
            overall_pass: true,
            blocking_reasons: vec![],
        };
        let order: Vec<_> = verdict.verdicts().iter().map(|(name, _)| *name).collect();
        assert_eq!(order.as_slice(), GateName::ALL.as_slice());
    }
}
