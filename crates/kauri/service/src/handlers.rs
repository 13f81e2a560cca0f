//! Gateway handlers.
//!
//! Handlers normalize request bodies into kernel inputs, run the gate
//! battery or consent operations, append audits, and hand every response to
//! the seal layer.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use kauri_kernel_custody::{self as custody, ParentReference};
use kauri_kernel_gates::explain;
use kauri_kernel_types::{CompositeVerdict, GateContext};
use kauri_storage::{ActionAudit, AnchorAudit, QueryWindow};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::seal_layer;
use crate::state::AppState;

/// Response body for `POST /v1/actions`.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub allowed: bool,
    pub verdict: CompositeVerdict,
    /// Remediation guidance; empty when the action is allowed.
    pub remediation: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnchorRequest {
    pub subject_group: String,
    pub purpose_scope: String,
    pub authorizer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub anchor: Option<String>,
    #[serde(default)]
    pub subject_group: String,
    #[serde(default)]
    pub purpose_scope: String,
    #[serde(default)]
    pub authorizer_id: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuditQuery {
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn parent_from(body: &Value, headers: &HeaderMap) -> Option<ParentReference> {
    let header = headers
        .get(custody::PARENT_HEADER)
        .and_then(|value| value.to_str().ok());
    custody::extract_parent_reference(body, header)
}

fn invalid_input(
    state: &AppState,
    domain: &str,
    parent: Option<&ParentReference>,
    message: String,
) -> Response {
    seal_layer::deliver(
        &state.sealer,
        domain,
        StatusCode::BAD_REQUEST,
        json!({"error": message, "code": "INVALID_INPUT"}),
        parent,
    )
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Response {
    let body = json!({
        "status": "healthy",
        "version": state.version,
        "uptime": state.uptime(),
    });
    seal_layer::deliver(&state.sealer, "/health", StatusCode::OK, body, None)
}

/// `POST /v1/actions`: gate an action request.
pub async fn submit_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    const DOMAIN: &str = "/v1/actions";
    let parent = parent_from(&body, &headers);

    let ctx: GateContext = match serde_json::from_value(body.clone()) {
        Ok(ctx) => ctx,
        Err(err) => {
            return invalid_input(&state, DOMAIN, parent.as_ref(), err.to_string());
        }
    };

    let verdict = state.orchestrator.evaluate(&ctx);

    let mut evaluator_scores = BTreeMap::new();
    for (name, gate_verdict) in verdict.verdicts() {
        evaluator_scores.insert(name.as_str().to_string(), gate_verdict.score);
    }

    let audit = ActionAudit {
        anchor: ctx.consent_token.clone(),
        subject_group: ctx.subject_group.clone(),
        purpose_scope: ctx.purpose_scope.clone(),
        evaluator_scores,
        overall_pass: verdict.overall_pass,
        raw_context: body,
        recorded_at: Utc::now(),
    };
    if let Err(err) = state.store.record_action(audit).await {
        warn!(error = %err, "action audit append failed");
    }

    let allowed = verdict.overall_pass;
    let remediation = if allowed {
        Vec::new()
    } else {
        explain::explain(&verdict, &ctx)
    };
    let status = if allowed {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };
    let response = ActionResponse {
        allowed,
        verdict,
        remediation,
    };

    match serde_json::to_value(&response) {
        Ok(payload) => seal_layer::deliver(&state.sealer, DOMAIN, status, payload, parent.as_ref()),
        Err(err) => invalid_input(&state, DOMAIN, parent.as_ref(), err.to_string()),
    }
}

/// `POST /v1/consent/anchors`: derive and record a consent anchor.
pub async fn derive_anchor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    const DOMAIN: &str = "/v1/consent/anchors";
    let parent = parent_from(&body, &headers);

    let request: AnchorRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(err) => {
            return invalid_input(&state, DOMAIN, parent.as_ref(), err.to_string());
        }
    };

    let anchor = match kauri_kernel_consent::derive(
        &request.subject_group,
        &request.purpose_scope,
        &request.authorizer_id,
    ) {
        Ok(anchor) => anchor,
        Err(err) => {
            return invalid_input(&state, DOMAIN, parent.as_ref(), err.to_string());
        }
    };

    let audit = AnchorAudit {
        anchor: anchor.clone(),
        subject_group: request.subject_group.clone(),
        purpose_scope: request.purpose_scope.clone(),
        hashed_authorizer: kauri_kernel_consent::hash_authorizer(&request.authorizer_id),
        recorded_at: Utc::now(),
    };
    if let Err(err) = state.store.record_anchor(audit).await {
        warn!(error = %err, "anchor audit append failed");
    }

    let summary =
        kauri_kernel_consent::summarize(&anchor, &request.subject_group, &request.purpose_scope);
    let payload = json!({"anchor": anchor, "summary": summary});
    seal_layer::deliver(
        &state.sealer,
        DOMAIN,
        StatusCode::CREATED,
        payload,
        parent.as_ref(),
    )
}

/// `POST /v1/consent/validate`: check a claimed anchor against a triple.
pub async fn validate_anchor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    const DOMAIN: &str = "/v1/consent/validate";
    let parent = parent_from(&body, &headers);

    let request: ValidateRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(err) => {
            return invalid_input(&state, DOMAIN, parent.as_ref(), err.to_string());
        }
    };

    let validation = kauri_kernel_consent::validate(
        request.anchor.as_deref(),
        &request.subject_group,
        &request.purpose_scope,
        &request.authorizer_id,
    );

    let payload = json!({
        "valid": validation.valid,
        "reason": validation.reason,
        "code": if validation.valid { "CONSENT_VERIFIED" } else { "CONSENT_MISMATCH" },
    });
    seal_layer::deliver(
        &state.sealer,
        DOMAIN,
        StatusCode::OK,
        payload,
        parent.as_ref(),
    )
}

/// `GET /v1/provenance/chain`: current chain head.
pub async fn chain_status(State(state): State<AppState>) -> Response {
    const DOMAIN: &str = "/v1/provenance/chain";
    match state.sealer.chain_head() {
        Ok(head) => {
            let payload = json!({
                "genesis_hash": head.genesis_hash,
                "position": head.position,
                "public_key": head.public_key,
            });
            seal_layer::deliver(&state.sealer, DOMAIN, StatusCode::OK, payload, None)
        }
        Err(err) => seal_layer::deliver(
            &state.sealer,
            DOMAIN,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": err.to_string(), "code": "CHAIN_UNAVAILABLE"}),
            None,
        ),
    }
}

/// `GET /v1/provenance/verify`: replay the chain against its history.
pub async fn chain_verify(State(state): State<AppState>) -> Response {
    const DOMAIN: &str = "/v1/provenance/verify";
    match state.sealer.verify_history() {
        Ok(verified_links) => {
            let payload = json!({"intact": true, "verified_links": verified_links});
            seal_layer::deliver(&state.sealer, DOMAIN, StatusCode::OK, payload, None)
        }
        Err(err) => {
            let payload = json!({
                "intact": false,
                "error": err.to_string(),
                "code": "CHAIN_INTEGRITY",
            });
            seal_layer::deliver(&state.sealer, DOMAIN, StatusCode::CONFLICT, payload, None)
        }
    }
}

/// `GET /v1/audit/actions`: recorded action audits, newest first.
pub async fn list_action_audits(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Response {
    const DOMAIN: &str = "/v1/audit/actions";
    let window = QueryWindow {
        limit: query.limit,
        offset: query.offset,
    };
    match state.store.list_actions(window).await {
        Ok(audits) => {
            let payload = serde_json::to_value(&audits).unwrap_or_else(|_| json!([]));
            seal_layer::deliver(&state.sealer, DOMAIN, StatusCode::OK, payload, None)
        }
        Err(err) => seal_layer::deliver(
            &state.sealer,
            DOMAIN,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": err.to_string(), "code": "STORAGE"}),
            None,
        ),
    }
}

/// `GET /v1/audit/anchors`: recorded anchor audits, newest first.
pub async fn list_anchor_audits(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Response {
    const DOMAIN: &str = "/v1/audit/anchors";
    let window = QueryWindow {
        limit: query.limit,
        offset: query.offset,
    };
    match state.store.list_anchors(window).await {
        Ok(audits) => {
            let payload = serde_json::to_value(&audits).unwrap_or_else(|_| json!([]));
            seal_layer::deliver(&state.sealer, DOMAIN, StatusCode::OK, payload, None)
        }
        Err(err) => seal_layer::deliver(
            &state.sealer,
            DOMAIN,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": err.to_string(), "code": "STORAGE"}),
            None,
        ),
    }
}
