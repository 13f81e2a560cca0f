use kauri_kernel_types::{GateContext, GateVerdict};

use crate::policy::PolicyCharter;

/// Boundary gate.
///
/// The purpose scope must be declared and sit inside the charter's approved
/// whitelist. Jurisdiction is advisory: its absence lowers the score but
/// never blocks.
pub fn evaluate(ctx: &GateContext, charter: &PolicyCharter) -> GateVerdict {
    let Some(scope) = ctx
        .purpose_scope
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return GateVerdict::blocked("PURPOSE_SCOPE_MISSING", "purpose scope is missing");
    };

    if !charter.is_approved_scope(scope) {
        return GateVerdict::blocked(
            "PURPOSE_SCOPE_UNAPPROVED",
            format!("purpose scope '{}' is not an approved domain", scope),
        );
    }

    let score = if GateContext::has_value(&ctx.jurisdiction) {
        0.90
    } else {
        0.70
    };
    GateVerdict::passed(score, "SCOPE_APPROVED", "purpose scope is approved")
}
