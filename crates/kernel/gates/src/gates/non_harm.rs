use kauri_kernel_types::{GateContext, GateVerdict};

use crate::policy::PolicyCharter;

/// Non-harm gate.
///
/// Hard-blocks forbidden assessment categories and unacknowledged bulk
/// actions; otherwise passes with a reduced score for patient-facing output.
pub fn evaluate(ctx: &GateContext, charter: &PolicyCharter) -> GateVerdict {
    if charter.is_forbidden_category(&ctx.action_category) {
        return GateVerdict::blocked(
            "FORBIDDEN_CATEGORY",
            format!(
                "action category '{}' is permanently excluded",
                ctx.action_category
            ),
        );
    }

    if ctx.population_size > charter.bulk_population_threshold
        && !GateContext::has_value(&ctx.equity_acknowledgement)
    {
        return GateVerdict::blocked(
            "EQUITY_ACK_REQUIRED",
            format!(
                "population of {} exceeds {} without an equity acknowledgement",
                ctx.population_size, charter.bulk_population_threshold
            ),
        );
    }

    let score = if ctx.patient_facing { 0.80 } else { 0.95 };
    GateVerdict::passed(score, "NON_HARM_CLEAR", "no harm indicators present")
}
