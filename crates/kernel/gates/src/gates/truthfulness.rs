use kauri_kernel_types::{GateContext, GateVerdict};

/// Confidence below this floor blocks outright.
const CONFIDENCE_FLOOR: f64 = 0.60;

/// Data-quality labels that block. Any other non-empty label passes; the
/// open set is routed through one predicate so a future whitelist is a
/// one-line change.
fn is_disqualifying_quality(label: &str) -> bool {
    matches!(label, "unknown" | "poor")
}

/// Truthfulness gate.
///
/// Requires in-range confidence above the floor, a trusted data-quality
/// label, and a pinned model version. The pass score rewards confidence:
/// `min(1.0, confidence * 1.1)`.
pub fn evaluate(ctx: &GateContext) -> GateVerdict {
    if !ctx.confidence.is_finite() || !(0.0..=1.0).contains(&ctx.confidence) {
        return GateVerdict::blocked(
            "CONFIDENCE_OUT_OF_RANGE",
            format!("confidence {} is not a real number in [0, 1]", ctx.confidence),
        );
    }

    if ctx.confidence < CONFIDENCE_FLOOR {
        return GateVerdict::blocked(
            "CONFIDENCE_BELOW_FLOOR",
            format!(
                "confidence {:.2} is below the {:.2} floor",
                ctx.confidence, CONFIDENCE_FLOOR
            ),
        );
    }

    let quality = ctx.data_quality.trim();
    if quality.is_empty() {
        return GateVerdict::blocked("DATA_QUALITY_MISSING", "data quality label is missing");
    }
    if is_disqualifying_quality(quality) {
        return GateVerdict::blocked(
            "DATA_QUALITY_UNTRUSTED",
            format!("data quality '{}' is not trusted", quality),
        );
    }

    if !GateContext::has_value(&ctx.model_version) {
        return GateVerdict::blocked("MODEL_VERSION_MISSING", "model version is missing");
    }

    let score = (ctx.confidence * 1.1).min(1.0);
    GateVerdict::passed(score, "EVIDENCE_SUFFICIENT", "evidence meets the bar")
}
