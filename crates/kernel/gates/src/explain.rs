//! Remediation text for failed or marginal verdicts.
//!
//! A read-only projection over a composite verdict: no core state is
//! touched. Consumed by the transport surface when a request is denied.

use kauri_kernel_types::{CompositeVerdict, GateContext, GateName};

/// Produce one remediation line per failing gate, plus a note when the
/// request cleared every gate but fell under the composite threshold.
pub fn explain(verdict: &CompositeVerdict, ctx: &GateContext) -> Vec<String> {
    let mut lines: Vec<String> = verdict
        .verdicts()
        .iter()
        .filter(|(_, v)| !v.pass)
        .map(|(name, v)| remediation(*name, &v.reason.code, ctx))
        .collect();

    if lines.is_empty() && !verdict.overall_pass {
        lines.push(marginal_note(verdict, ctx));
    }

    lines
}

fn remediation(gate: GateName, code: &str, ctx: &GateContext) -> String {
    let advice = match code {
        "FORBIDDEN_CATEGORY" => {
            "this assessment category is permanently excluded; there is no remediation path"
                .to_string()
        }
        "EQUITY_ACK_REQUIRED" => format!(
            "a population of {} requires an equity acknowledgement; attach one and resubmit",
            ctx.population_size
        ),
        "CONFIDENCE_OUT_OF_RANGE" => {
            "supply confidence as a number between 0 and 1".to_string()
        }
        "CONFIDENCE_BELOW_FLOOR" => format!(
            "confidence {:.2} is below 0.60; strengthen the evidence before resubmitting",
            ctx.confidence
        ),
        "DATA_QUALITY_MISSING" | "DATA_QUALITY_UNTRUSTED" => {
            "re-run the assessment against a vetted dataset and report its quality label"
                .to_string()
        }
        "MODEL_VERSION_MISSING" => {
            "pin and report the model version that produced the evidence".to_string()
        }
        "CONSENT_TOKEN_MISSING" => {
            "derive a consent anchor for this group, purpose, and authorizer, and include it"
                .to_string()
        }
        "CONSENT_MISMATCH" => {
            "the consent token does not reconstruct from the supplied triple; \
             check group, purpose, and authorizer for drift"
                .to_string()
        }
        "PURPOSE_SCOPE_MISSING" | "PURPOSE_SCOPE_UNAPPROVED" => {
            "declare one of the approved purpose scopes".to_string()
        }
        "ENSEMBLE_TOO_NARROW" => {
            "consult at least two models, or record an explicit dissent acknowledgement"
                .to_string()
        }
        other => format!("resolve: {}", other),
    };
    format!("{}: {}", gate.as_str(), advice)
}

fn marginal_note(verdict: &CompositeVerdict, ctx: &GateContext) -> String {
    let mut reductions = Vec::new();
    if !GateContext::has_value(&ctx.jurisdiction) {
        reductions.push("no jurisdiction declared");
    }
    if ctx.patient_facing {
        reductions.push("patient-facing output cap");
    }
    if ctx.model_count < 3 {
        reductions.push("minimum-ensemble score");
    }
    format!(
        "no gate blocked, but the composite {} fell under 0.60 from advisory reductions ({})",
        verdict.composite_score,
        reductions.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::GateOrchestrator;

    #[test]
    fn passing_verdict_needs_no_remediation() {
        let token =
            kauri_kernel_consent::derive("nz-smokers", "population_mortality", "clin-1").unwrap();
        let ctx = GateContext {
            subject_group: "nz-smokers".into(),
            purpose_scope: Some("population_mortality".into()),
            authorizer_id: "clin-1".into(),
            consent_token: Some(token),
            confidence: 0.75,
            data_quality: "good".into(),
            model_version: Some("v1".into()),
            model_count: 2,
            jurisdiction: Some("nz".into()),
            ..Default::default()
        };
        let verdict = GateOrchestrator::new().evaluate(&ctx);
        assert!(explain(&verdict, &ctx).is_empty());
    }

    #[test]
    fn each_failing_gate_gets_one_line() {
        let ctx = GateContext {
            confidence: 0.45,
            model_count: 0,
            ..Default::default()
        };
        let verdict = GateOrchestrator::new().evaluate(&ctx);
        let lines = explain(&verdict, &ctx);
        assert_eq!(lines.len(), verdict.blocking_reasons.len());
        assert!(lines.iter().any(|l| l.starts_with("truthfulness:")));
        assert!(lines.iter().any(|l| l.starts_with("diversity:")));
    }

    #[test]
    fn forbidden_category_is_final() {
        let ctx = GateContext {
            action_category: "insurance_redlining".into(),
            ..Default::default()
        };
        let verdict = GateOrchestrator::new().evaluate(&ctx);
        let lines = explain(&verdict, &ctx);
        assert!(lines
            .iter()
            .any(|l| l.contains("no remediation path")));
    }
}
