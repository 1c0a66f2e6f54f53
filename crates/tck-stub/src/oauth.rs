//! OAuth2 token route.
//!
//! POST `/oauth/token`, form-encoded, three grants:
//!
//! - `password` — username/password against the account store
//! - `refresh_token` — rotates a previously issued pair
//! - `client_credentials` — requires Basic client authentication
//!
//! Everything else is `unsupported_grant_type`. All responses, success
//! and error, carry `Cache-Control: no-store` and `Pragma: no-cache`
//! (RFC 6749 §5.1/§5.2).

use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, PRAGMA};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Form;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::{StubState, CLIENT_ID, CLIENT_SECRET};
use crate::token::{issue, unix_now, verify, TokenKind, TOKEN_TTL_SECS};

/// Form parameters of a token request; everything optional so the
/// handler, not the extractor, decides which error to report.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// OAuth2 grant type.
    pub grant_type: Option<String>,
    /// Username for the password grant.
    pub username: Option<String>,
    /// Password for the password grant.
    pub password: Option<String>,
    /// Refresh token for the refresh grant.
    pub refresh_token: Option<String>,
}

/// POST `/oauth/token`.
pub async fn token(
    State(state): State<StubState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Response {
    match handle_grant(&state, &headers, &request) {
        Ok(body) => with_cache_headers((StatusCode::OK, Json(body)).into_response()),
        Err(err) => with_cache_headers(err.into_response()),
    }
}

/// Dispatches on grant type.
fn handle_grant(
    state: &StubState,
    headers: &HeaderMap,
    request: &TokenRequest,
) -> Result<serde_json::Value, ApiError> {
    let grant_type = request.grant_type.as_deref().unwrap_or("");
    match grant_type {
        "password" => password_grant(state, request),
        "refresh_token" => refresh_grant(request),
        "client_credentials" => client_credentials_grant(headers),
        other => Err(ApiError::bad_request(
            "unsupported_grant_type",
            if other.is_empty() {
                "grant_type is required.".to_string()
            } else {
                format!("Unsupported grant type: {other}")
            },
        )),
    }
}

fn password_grant(
    state: &StubState,
    request: &TokenRequest,
) -> Result<serde_json::Value, ApiError> {
    let account = request
        .username
        .as_deref()
        .zip(request.password.as_deref())
        .and_then(|(username, password)| state.authenticate(username, password))
        .ok_or_else(|| {
            ApiError::bad_request("invalid_grant", "Invalid username or password.")
        })?;

    let now = unix_now();
    let sub = account.href();
    Ok(token_pair(&sub, now, true))
}

fn refresh_grant(request: &TokenRequest) -> Result<serde_json::Value, ApiError> {
    let now = unix_now();
    let sub = request
        .refresh_token
        .as_deref()
        .and_then(|token| verify(token, TokenKind::Refresh, now))
        .ok_or_else(|| ApiError::bad_request("invalid_grant", "Invalid refresh token."))?;

    Ok(token_pair(&sub, now, true))
}

fn client_credentials_grant(headers: &HeaderMap) -> Result<serde_json::Value, ApiError> {
    let (client_id, client_secret) = basic_credentials(headers).ok_or_else(|| {
        ApiError::unauthorized("invalid_client", "Client authentication is required.")
    })?;
    if client_id != CLIENT_ID || client_secret != CLIENT_SECRET {
        return Err(ApiError::unauthorized(
            "invalid_client",
            "Invalid client credentials.",
        ));
    }

    let now = unix_now();
    let sub = format!("/clients/{CLIENT_ID}");
    Ok(token_pair(&sub, now, false))
}

/// Builds a token response body; client-credentials grants get no
/// refresh token.
fn token_pair(sub: &str, now: u64, include_refresh: bool) -> serde_json::Value {
    let mut body = json!({
        "access_token": issue(sub, TokenKind::Access, now),
        "token_type": "Bearer",
        "expires_in": TOKEN_TTL_SECS,
    });
    if include_refresh {
        body["refresh_token"] = json!(issue(sub, TokenKind::Refresh, now));
    }
    body
}

/// Extracts Basic auth credentials from the `Authorization` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// Adds the RFC 6749 cache-suppression headers.
fn with_cache_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    response
}
