//! Compact token issuance and verification for the stub.
//!
//! Tokens look like JWTs — three base64url segments, a JSON payload with
//! `sub`, `iss`, `iat`, `exp`, and `typ` claims — so the kit's claim
//! extractor can read them. The signature is a SHA-256 digest over the
//! signing secret and the signing input: enough for the stub to recognize
//! its own refresh tokens, and deliberately not a JOSE implementation.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::state::SIGNING_SECRET;

/// Lifetime of issued tokens, surfaced as `expires_in`.
pub const TOKEN_TTL_SECS: u64 = 3600;

/// What a token is for; encoded as the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bearer access token.
    Access,
    /// Refresh token.
    Refresh,
}

impl TokenKind {
    fn claim(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Seconds since the Unix epoch.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Issues a signed compact token for a subject.
#[must_use]
pub fn issue(sub: &str, kind: TokenKind, now: u64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({
        "sub": sub,
        "iss": "tck-stub",
        "iat": now,
        "exp": now + TOKEN_TTL_SECS,
        "typ": kind.claim(),
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    let signing_input = format!("{header}.{payload}");
    format!("{signing_input}.{}", sign(&signing_input))
}

/// Verifies a token's signature, kind, and expiry; returns its subject.
#[must_use]
pub fn verify(token: &str, kind: TokenKind, now: u64) -> Option<String> {
    let mut segments = token.split('.');
    let header = segments.next()?;
    let payload = segments.next()?;
    let signature = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let signing_input = format!("{header}.{payload}");
    if sign(&signing_input) != signature {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    if claims.get("typ")?.as_str()? != kind.claim() {
        return None;
    }
    if claims.get("exp")?.as_u64()? <= now {
        return None;
    }
    Some(claims.get("sub")?.as_str()?.to_string())
}

fn sign(signing_input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(SIGNING_SECRET.as_bytes());
    hasher.update(b".");
    hasher.update(signing_input.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
