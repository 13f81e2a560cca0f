use kauri_kernel_types::{CompositeVerdict, GateContext, GateName, GateVerdict};
use tracing::debug;

use crate::gates;
use crate::policy::PolicyCharter;

/// Composite weights, in `GateName::ALL` order.
const W_NON_HARM: f64 = 0.25;
const W_TRUTHFULNESS: f64 = 0.25;
const W_CONSENT: f64 = 0.15;
const W_BOUNDARY: f64 = 0.20;
const W_DIVERSITY: f64 = 0.15;

/// Composite scores below this line fail even with no blocking reason.
const COMPOSITE_THRESHOLD: f64 = 0.60;

/// Runs the five-gate battery and combines the verdicts.
pub struct GateOrchestrator {
    charter: PolicyCharter,
}

impl GateOrchestrator {
    pub fn new() -> Self {
        Self {
            charter: PolicyCharter::v1(),
        }
    }

    pub fn with_charter(charter: PolicyCharter) -> Self {
        Self { charter }
    }

    pub fn charter(&self) -> &PolicyCharter {
        &self.charter
    }

    /// Evaluate a context against all five gates.
    ///
    /// Every gate runs even after an early failure so the caller always gets
    /// the full diagnostic picture. A boundary failure voids the composite
    /// outright; otherwise the weighted sum applies. Blocking always wins
    /// over the numeric threshold.
    pub fn evaluate(&self, ctx: &GateContext) -> CompositeVerdict {
        let non_harm = gates::non_harm::evaluate(ctx, &self.charter);
        let truthfulness = gates::truthfulness::evaluate(ctx);
        let consent = gates::consent::evaluate(ctx);
        let boundary = gates::boundary::evaluate(ctx, &self.charter);
        let diversity = gates::diversity::evaluate(ctx);

        let blocking_reasons = blocking_reasons(&[
            (GateName::NonHarm, &non_harm),
            (GateName::Truthfulness, &truthfulness),
            (GateName::Consent, &consent),
            (GateName::Boundary, &boundary),
            (GateName::Diversity, &diversity),
        ]);

        // A boundary violation voids all other signal: hard veto, not a
        // weighted contribution.
        let composite_score = if !boundary.pass {
            0.0
        } else {
            round3(
                W_NON_HARM * non_harm.score
                    + W_TRUTHFULNESS * truthfulness.score
                    + W_CONSENT * consent.score
                    + W_BOUNDARY * boundary.score
                    + W_DIVERSITY * diversity.score,
            )
        };

        let overall_pass = blocking_reasons.is_empty() && composite_score >= COMPOSITE_THRESHOLD;

        debug!(
            composite = composite_score,
            pass = overall_pass,
            blocked = blocking_reasons.len(),
            "gate evaluation complete"
        );

        CompositeVerdict {
            non_harm,
            truthfulness,
            consent,
            boundary,
            diversity,
            composite_score,
            overall_pass,
            blocking_reasons,
        }
    }
}

impl Default for GateOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn blocking_reasons(verdicts: &[(GateName, &GateVerdict)]) -> Vec<String> {
    verdicts
        .iter()
        .filter(|(_, verdict)| !verdict.pass)
        .map(|(name, verdict)| format!("{}: {}", name.as_str(), verdict.reason.message))
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
