//! Unverified claim extraction from compact tokens.
//!
//! Conformance scenarios only need to look inside the tokens a target
//! issues — e.g. that the `sub` claim names the account that logged in.
//! No signature verification is performed: inspection, not trust.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while extracting claims from a compact token.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The token is not a well-formed `<header>.<payload>.<signature>`
    /// string with a base64url JSON-object payload.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The payload decoded cleanly but does not contain the claim.
    #[error("claim not found: {0}")]
    NotFound(String),
}

/// Decodes a compact token's payload segment without verification.
///
/// # Errors
///
/// Returns [`ClaimError::Malformed`] when the token does not have exactly
/// three dot-separated segments, the payload is not valid base64url, or
/// it does not decode to a JSON object.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, ClaimError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClaimError::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| ClaimError::Malformed(format!("payload is not base64url: {e}")))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ClaimError::Malformed(format!("payload is not JSON: {e}")))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClaimError::Malformed(format!(
            "payload is not a JSON object: {other}"
        ))),
    }
}

/// Returns the value of a named claim in the token's payload.
///
/// # Errors
///
/// [`ClaimError::Malformed`] when the token cannot be decoded;
/// [`ClaimError::NotFound`] when the payload decodes but lacks the claim.
pub fn claim(token: &str, name: &str) -> Result<Value, ClaimError> {
    let payload = decode_payload(token)?;
    payload
        .get(name)
        .cloned()
        .ok_or_else(|| ClaimError::NotFound(name.to_string()))
}

/// Returns the token's `sub` claim as a string.
///
/// # Errors
///
/// Fails like [`claim`]; a non-string `sub` is reported as malformed.
pub fn subject(token: &str) -> Result<String, ClaimError> {
    match claim(token, "sub")? {
        Value::String(sub) => Ok(sub),
        other => Err(ClaimError::Malformed(format!(
            "sub claim is not a string: {other}"
        ))),
    }
}
