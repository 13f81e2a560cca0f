use kauri_kernel_types::{GateContext, GateVerdict};

/// Consent gate.
///
/// Requires a consent token that reconstructs from the request's
/// (subject group, purpose scope, authorizer) triple. Consent is binary:
/// the pass score is a fixed 0.95, not gradated.
pub fn evaluate(ctx: &GateContext) -> GateVerdict {
    if !GateContext::has_value(&ctx.consent_token) {
        return GateVerdict::blocked("CONSENT_TOKEN_MISSING", "consent token is missing");
    }

    let validation = kauri_kernel_consent::validate(
        ctx.consent_token.as_deref(),
        &ctx.subject_group,
        ctx.purpose_scope.as_deref().unwrap_or(""),
        &ctx.authorizer_id,
    );

    if !validation.valid {
        return GateVerdict::blocked("CONSENT_MISMATCH", validation.reason);
    }

    GateVerdict::passed(0.95, "CONSENT_VERIFIED", "consent anchor reconstructs")
}
