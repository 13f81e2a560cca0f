//! The outbound seal layer.
//!
//! Every payload leaving the gateway goes through [`deliver`]: it is sealed
//! into the provenance chain and the compact receipt rides with the
//! response. Object bodies are *enrichable*: the receipt is embedded as a
//! `_provenance` field. Array and scalar bodies are *opaque*: their shape
//! must not be altered, so the receipt travels in response headers instead.
//!
//! Sealing must never cost the caller their response: on any seal failure
//! the error is logged and the payload is delivered unsealed.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use kauri_kernel_custody::ParentReference;
use kauri_kernel_seal::{ProvenanceReceipt, Sealer};
use serde_json::{Map, Value};
use tracing::warn;

/// Field embedded into enrichable (object) response bodies.
pub const RECEIPT_BODY_FIELD: &str = "_provenance";

/// Header names carrying the compact receipt for opaque bodies.
pub mod headers {
    pub const RECEIPT_ID: &str = "x-kauri-receipt-id";
    pub const SIGNATURE: &str = "x-kauri-signature";
    pub const ARTIFACT_HASH: &str = "x-kauri-artifact-hash";
    pub const PUBLIC_KEY: &str = "x-kauri-public-key";
    pub const CHAIN_POSITION: &str = "x-kauri-chain-position";
    pub const SEALED_AT: &str = "x-kauri-sealed-at";
}

/// How a payload can carry its receipt.
enum ResponseShape {
    /// Record-like body: the receipt embeds in the body itself.
    Enrichable(Map<String, Value>),
    /// Array/scalar body: the shape is preserved and the receipt rides the
    /// side channel (headers).
    Opaque(Value),
}

impl ResponseShape {
    fn classify(payload: Value) -> Self {
        match payload {
            Value::Object(map) => ResponseShape::Enrichable(map),
            other => ResponseShape::Opaque(other),
        }
    }
}

/// Seal and deliver one outbound payload.
pub fn deliver(
    sealer: &Sealer,
    domain: &str,
    status: StatusCode,
    payload: Value,
    parent: Option<&ParentReference>,
) -> Response {
    let envelope = match sealer.seal(&payload, domain, parent) {
        Ok(envelope) => envelope,
        Err(err) => {
            // Non-fatal by design: the response still leaves the process.
            warn!(%domain, error = %err, "seal failed; delivering payload unsealed");
            return (status, Json(payload)).into_response();
        }
    };

    match ResponseShape::classify(payload) {
        ResponseShape::Enrichable(mut map) => {
            match serde_json::to_value(&envelope.receipt) {
                Ok(receipt) => {
                    map.insert(RECEIPT_BODY_FIELD.to_string(), receipt);
                }
                Err(err) => {
                    warn!(%domain, error = %err, "receipt encoding failed; delivering unsealed");
                }
            }
            (status, Json(Value::Object(map))).into_response()
        }
        ResponseShape::Opaque(value) => {
            let headers = receipt_headers(&envelope.receipt);
            (status, headers, Json(value)).into_response()
        }
    }
}

fn receipt_headers(receipt: &ProvenanceReceipt) -> HeaderMap {
    let mut map = HeaderMap::new();
    let pairs = [
        (headers::RECEIPT_ID, receipt.receipt_id.clone()),
        (headers::SIGNATURE, receipt.signature.clone()),
        (headers::ARTIFACT_HASH, receipt.artifact_hash.clone()),
        (headers::PUBLIC_KEY, receipt.public_key.clone()),
        (headers::CHAIN_POSITION, receipt.chain_position.to_string()),
        (headers::SEALED_AT, receipt.timestamp.to_rfc3339()),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            map.insert(name, value);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use kauri_crypto::Keypair;
    use serde_json::json;
    use std::sync::Arc;

    fn sealer() -> Sealer {
        Sealer::new(Arc::new(Keypair::from_seed(&[3u8; 32])))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn object_bodies_are_enriched_in_place() {
        let sealer = sealer();
        let response = deliver(
            &sealer,
            "/v1/actions",
            StatusCode::OK,
            json!({"allowed": true}),
            None,
        );
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["allowed"], json!(true));
        let receipt = &body[RECEIPT_BODY_FIELD];
        assert_eq!(receipt["chain_position"], json!(1));
        assert!(receipt["signature"].as_str().unwrap().len() == 128);
    }

    #[tokio::test]
    async fn opaque_bodies_keep_their_shape_and_use_headers() {
        let sealer = sealer();
        let response = deliver(
            &sealer,
            "/v1/audit/actions",
            StatusCode::OK,
            json!([1, 2, 3]),
            None,
        );

        assert!(response.headers().contains_key(headers::RECEIPT_ID));
        assert_eq!(
            response.headers()[headers::CHAIN_POSITION],
            HeaderValue::from_static("1")
        );

        let body = body_json(response).await;
        assert_eq!(body, json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn consecutive_deliveries_advance_the_chain() {
        let sealer = sealer();
        let first = deliver(&sealer, "/d", StatusCode::OK, json!({}), None);
        let second = deliver(&sealer, "/d", StatusCode::OK, json!({}), None);

        let first = body_json(first).await;
        let second = body_json(second).await;
        assert_eq!(first[RECEIPT_BODY_FIELD]["chain_position"], json!(1));
        assert_eq!(second[RECEIPT_BODY_FIELD]["chain_position"], json!(2));
    }

    #[tokio::test]
    async fn embedded_receipt_verifies() {
        let sealer = sealer();
        let response = deliver(&sealer, "/d", StatusCode::OK, json!({"x": 1}), None);
        let body = body_json(response).await;
        let receipt: ProvenanceReceipt =
            serde_json::from_value(body[RECEIPT_BODY_FIELD].clone()).unwrap();
        receipt.verify().unwrap();
    }
}
