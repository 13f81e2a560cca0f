use kauri_kernel_types::{GateContext, GateVerdict};

/// Diversity gate.
///
/// A single-model assessment is only acceptable when dissent was explicitly
/// acknowledged. Score tiers: 0.95 for a three-model ensemble, 0.80 when
/// dissent is acknowledged, 0.72 for the bare two-model minimum.
pub fn evaluate(ctx: &GateContext) -> GateVerdict {
    if ctx.model_count < 2 && !ctx.dissent_acknowledged {
        return GateVerdict::blocked(
            "ENSEMBLE_TOO_NARROW",
            format!(
                "{} model(s) consulted and no dissent acknowledged",
                ctx.model_count
            ),
        );
    }

    let score = if ctx.model_count >= 3 {
        0.95
    } else if ctx.dissent_acknowledged {
        0.80
    } else {
        // Reachable only at model_count == 2.
        0.72
    };
    GateVerdict::passed(score, "ENSEMBLE_SUFFICIENT", "model diversity is adequate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_ensemble_without_dissent_blocks() {
        for model_count in [0, 1] {
            let ctx = GateContext {
                model_count,
                ..Default::default()
            };
            assert_eq!(evaluate(&ctx).reason.code, "ENSEMBLE_TOO_NARROW");
        }
    }

    #[test]
    fn dissent_acknowledgement_clears_a_narrow_ensemble() {
        let ctx = GateContext {
            model_count: 1,
            dissent_acknowledged: true,
            ..Default::default()
        };
        let verdict = evaluate(&ctx);
        assert!(verdict.pass);
        assert_eq!(verdict.score, 0.80);
    }

    #[test]
    fn three_models_score_highest() {
        let ctx = GateContext {
            model_count: 3,
            ..Default::default()
        };
        assert_eq!(evaluate(&ctx).score, 0.95);
    }

    #[test]
    fn two_models_without_dissent_take_the_minimum_tier() {
        let ctx = GateContext {
            model_count: 2,
            ..Default::default()
        };
        assert_eq!(evaluate(&ctx).score, 0.72);
    }

    #[test]
    fn dissent_outranks_the_minimum_tier_at_two_models() {
        let ctx = GateContext {
            model_count: 2,
            dissent_acknowledged: true,
            ..Default::default()
        };
        assert_eq!(evaluate(&ctx).score, 0.80);
    }
}
