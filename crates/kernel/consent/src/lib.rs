//! Consent anchors: deterministic, self-validating consent identifiers.
//!
//! An anchor is derived from three pieces of evidence (subject group,
//! assessment purpose, authorizer) and carries everything needed to
//! re-check itself: validation recomputes the derivation and compares bytes.
//! No lookup table is consulted.
//!
//! Anchors are immutable and never revoked; revocation is out of scope.

#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every anchor starts with this literal prefix.
pub const ANCHOR_PREFIX: &str = "CR-";

/// Hex digits of the digest kept in the anchor.
const ANCHOR_HEX_LEN: usize = 32;

/// Domain separation for the anchor digest.
const ANCHOR_DOMAIN: &[u8] = b"kauri-consent-anchor-v1:";

/// Errors from anchor derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsentError {
    #[error("invalid input: {0} must be non-empty")]
    InvalidInput(&'static str),
}

/// Result of checking a claimed anchor against a supplied triple.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub reason: String,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: "anchor reconstructs from the supplied triple".into(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Derive the anchor for a (subject group, purpose scope, authorizer) triple.
///
/// `subject_group` and `purpose_scope` are trimmed and lowercased before
/// encoding; `authorizer_id` is trimmed with case preserved. The canonical
/// encoding fixes field order alphabetically, so swapping two scope-like
/// arguments at a call site cannot produce the anchor of the unswapped
/// triple.
pub fn derive(
    subject_group: &str,
    purpose_scope: &str,
    authorizer_id: &str,
) -> Result<String, ConsentError> {
    let group = normalize_scope(subject_group);
    let scope = normalize_scope(purpose_scope);
    let authorizer = authorizer_id.trim();

    if group.is_empty() {
        return Err(ConsentError::InvalidInput("subject_group"));
    }
    if scope.is_empty() {
        return Err(ConsentError::InvalidInput("purpose_scope"));
    }
    if authorizer.is_empty() {
        return Err(ConsentError::InvalidInput("authorizer_id"));
    }

    // Field order here is alphabetical and load-bearing.
    let encoding = format!(
        "authorizer_id={}\npurpose_scope={}\nsubject_group={}\n",
        authorizer, scope, group
    );
    let digest = kauri_crypto::hash_with_domain(ANCHOR_DOMAIN, encoding.as_bytes());
    let hex = kauri_crypto::to_hex(&digest);

    Ok(format!("{}{}", ANCHOR_PREFIX, &hex[..ANCHOR_HEX_LEN]))
}

/// Check a claimed anchor against a supplied triple. Fails closed: a missing
/// or malformed anchor is invalid, never an error.
pub fn validate(
    anchor: Option<&str>,
    subject_group: &str,
    purpose_scope: &str,
    authorizer_id: &str,
) -> Validation {
    let Some(anchor) = anchor.map(str::trim).filter(|a| !a.is_empty()) else {
        return Validation::fail("anchor is missing");
    };
    if !anchor.starts_with(ANCHOR_PREFIX) {
        return Validation::fail(format!("anchor lacks the {} prefix", ANCHOR_PREFIX));
    }

    match derive(subject_group, purpose_scope, authorizer_id) {
        Ok(expected) if expected == anchor => Validation::ok(),
        Ok(_) => Validation::fail("anchor does not reconstruct from the supplied triple"),
        Err(err) => Validation::fail(err.to_string()),
    }
}

/// One-line audit summary of an anchor.
///
/// Deliberately excludes `authorizer_id`: audit logs have broader read access
/// than the consent store, and the authorizer is an identity value. Consumers
/// verifying authorizer identity compare against [`hash_authorizer`] output
/// instead.
pub fn summarize(anchor: &str, subject_group: &str, purpose_scope: &str) -> String {
    format!(
        "consent anchor {} covers group '{}' for purpose '{}'",
        anchor,
        normalize_scope(subject_group),
        normalize_scope(purpose_scope)
    )
}

/// One-way hash of an authorizer identity, for the persistence collaborator.
pub fn hash_authorizer(authorizer_id: &str) -> String {
    kauri_crypto::to_hex(&kauri_crypto::hash_with_domain(
        b"kauri-authorizer-v1:",
        authorizer_id.trim().as_bytes(),
    ))
}

fn normalize_scope(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derivation_is_deterministic_and_normalized() {
        let a = derive("NZ Pop", " Mortality ", "C1").unwrap();
        let b = derive("nz pop", "mortality", "C1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn anchor_shape_is_prefixed_hex() {
        let anchor = derive("nz-smokers", "population_mortality", "clin-1").unwrap();
        assert!(anchor.starts_with(ANCHOR_PREFIX));
        assert_eq!(anchor.len(), ANCHOR_PREFIX.len() + ANCHOR_HEX_LEN);
        assert!(anchor[ANCHOR_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn authorizer_case_is_preserved() {
        let a = derive("g", "s", "Clin-1").unwrap();
        let b = derive("g", "s", "clin-1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn swapped_scope_fields_do_not_collide() {
        let original = derive("nz pop", "mortality", "c1").unwrap();
        let swapped = derive("mortality", "nz pop", "c1").unwrap();
        assert_ne!(original, swapped);
    }

    #[test]
    fn equal_scope_fields_swap_trivially() {
        let original = derive("same", "same", "c1").unwrap();
        let swapped = derive("same", "same", "c1").unwrap();
        assert_eq!(original, swapped);
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert_eq!(
            derive("", "s", "a"),
            Err(ConsentError::InvalidInput("subject_group"))
        );
        assert_eq!(
            derive("g", "   ", "a"),
            Err(ConsentError::InvalidInput("purpose_scope"))
        );
        assert_eq!(
            derive("g", "s", ""),
            Err(ConsentError::InvalidInput("authorizer_id"))
        );
    }

    #[test]
    fn validate_round_trips() {
        let anchor = derive("nz-smokers", "population_mortality", "clin-1").unwrap();
        let result = validate(
            Some(&anchor),
            "nz-smokers",
            "population_mortality",
            "clin-1",
        );
        assert!(result.valid);
    }

    #[test]
    fn validate_fails_closed_on_missing_anchor() {
        assert!(!validate(None, "g", "s", "a").valid);
        assert!(!validate(Some("  "), "g", "s", "a").valid);
    }

    #[test]
    fn validate_rejects_missing_prefix() {
        let result = validate(Some("ab12cd"), "g", "s", "a");
        assert!(!result.valid);
        assert!(result.reason.contains("prefix"));
    }

    #[test]
    fn validate_rejects_wrong_triple() {
        let anchor = derive("g", "s", "a").unwrap();
        assert!(!validate(Some(&anchor), "g", "s", "other").valid);
        assert!(!validate(Some(&anchor), "other", "s", "a").valid);
    }

    #[test]
    fn summarize_never_contains_the_authorizer() {
        let anchor = derive("nz-smokers", "population_mortality", "clin-secret-7").unwrap();
        let summary = summarize(&anchor, "nz-smokers", "population_mortality");
        assert!(!summary.contains("clin-secret-7"));
        assert!(summary.contains("nz-smokers"));
    }

    #[test]
    fn hashed_authorizer_is_one_way_hex() {
        let hashed = hash_authorizer("clin-1");
        assert_eq!(hashed.len(), 64);
        assert_ne!(hashed, "clin-1");
        assert_eq!(hashed, hash_authorizer("  clin-1  "));
    }

    proptest! {
        #[test]
        fn round_trip_law(
            g in "[a-zA-Z0-9 _-]{1,24}",
            s in "[a-zA-Z0-9 _-]{1,24}",
            a in "[a-zA-Z0-9_-]{1,24}",
        ) {
            prop_assume!(!g.trim().is_empty());
            prop_assume!(!s.trim().is_empty());
            prop_assume!(!a.trim().is_empty());
            let anchor = derive(&g, &s, &a).unwrap();
            prop_assert!(validate(Some(&anchor), &g, &s, &a).valid);
        }

        #[test]
        fn swap_collision_requires_equal_fields(
            g in "[a-z0-9-]{1,16}",
            s in "[a-z0-9-]{1,16}",
        ) {
            prop_assume!(g != s);
            let original = derive(&g, &s, "auth").unwrap();
            let swapped = derive(&s, &g, "auth").unwrap();
            prop_assert_ne!(original, swapped);
        }
    }
}
