//! Login page, login submission, and logout handlers.
//!
//! The login route speaks two dialects, selected by the request's
//! `Accept` and `Content-Type` headers: browsers get an HTML form and a
//! 302 on success, API clients get JSON bodies and a 200. Both set the
//! `access_token` and `refresh_token` session cookies on success, and
//! logout deletes them for everyone, authenticated or not.

use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderName, ACCEPT, CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{AppendHeaders, Html, IntoResponse, Json, Response};
use serde_json::json;

use crate::error::ApiError;
use crate::state::{StoredAccount, StubState};
use crate::token::{issue, unix_now, TokenKind};

/// Name of the access-token session cookie.
pub const ACCESS_COOKIE: &str = "access_token";

/// Name of the refresh-token session cookie.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// GET `/login` — the HTML login form.
pub async fn login_page() -> Html<String> {
    Html(login_form_html(None))
}

/// POST `/login` — authenticates against the account store.
///
/// JSON requests get `{"account": {...}}` on success and a 400 error body
/// on failure; form requests get a 302 to `/` on success and a re-rendered
/// form with an alert on failure. Success always sets both session cookies.
pub async fn login_submit(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let (login, password) = parse_credentials(&headers, &body);
    let account = login
        .as_deref()
        .zip(password.as_deref())
        .and_then(|(login, password)| state.authenticate(login, password));

    match account {
        Some(account) => {
            let cookies = session_cookies(&account);
            if wants_json(&headers) {
                (
                    StatusCode::OK,
                    AppendHeaders(cookies),
                    Json(json!({"account": account.view()})),
                )
                    .into_response()
            } else {
                let mut headers = vec![(LOCATION, "/".to_string())];
                headers.extend(cookies);
                (StatusCode::FOUND, AppendHeaders(headers), ()).into_response()
            }
        }
        None => {
            if wants_json(&headers) {
                ApiError::bad_request("invalid_login", "Invalid username or password.")
                    .into_response()
            } else {
                Html(login_form_html(Some("Invalid username or password."))).into_response()
            }
        }
    }
}

/// GET or POST `/logout` — deletes the session cookies.
///
/// Returns 200 for JSON clients and a 302 to `/` otherwise. Requires no
/// session: logging out while logged out is a no-op that still clears.
pub async fn logout(headers: HeaderMap) -> Response {
    let cookies = deletion_cookies();
    if wants_json(&headers) {
        (StatusCode::OK, AppendHeaders(cookies), ()).into_response()
    } else {
        let mut headers = vec![(LOCATION, "/".to_string())];
        headers.extend(cookies);
        (StatusCode::FOUND, AppendHeaders(headers), ()).into_response()
    }
}

/// GET `/` — landing page, the redirect target after form login/logout.
pub async fn home() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><h1>TCK stub</h1></body></html>")
}

/// GET `/health` — readiness probe for the harness.
pub async fn health() -> &'static str {
    "OK"
}

/// Whether the client asked for JSON.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Pulls `login`/`password` out of a JSON or form-encoded body.
fn parse_credentials(headers: &HeaderMap, body: &str) -> (Option<String>, Option<String>) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if content_type.starts_with("application/json") {
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return (None, None),
        };
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        (field("login"), field("password"))
    } else {
        let mut login = None;
        let mut password = None;
        for (name, value) in url::form_urlencoded::parse(body.as_bytes()) {
            match name.as_ref() {
                "login" => login = Some(value.into_owned()),
                "password" => password = Some(value.into_owned()),
                _ => {}
            }
        }
        (login, password)
    }
}

/// Session cookies carrying a fresh token pair for an account.
fn session_cookies(account: &StoredAccount) -> Vec<(HeaderName, String)> {
    let now = unix_now();
    let sub = account.href();
    let access = issue(&sub, TokenKind::Access, now);
    let refresh = issue(&sub, TokenKind::Refresh, now);
    vec![
        (
            SET_COOKIE,
            format!("{ACCESS_COOKIE}={access}; Path=/; HttpOnly"),
        ),
        (
            SET_COOKIE,
            format!("{REFRESH_COOKIE}={refresh}; Path=/; HttpOnly"),
        ),
    ]
}

/// Cookies that delete the session pair: empty value, epoch expiry.
fn deletion_cookies() -> Vec<(HeaderName, String)> {
    [ACCESS_COOKIE, REFRESH_COOKIE]
        .iter()
        .map(|name| {
            (
                SET_COOKIE,
                format!(
                    "{name}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; HttpOnly"
                ),
            )
        })
        .collect()
}

/// Renders the login form, optionally with a failure alert.
fn login_form_html(alert: Option<&str>) -> String {
    let alert_fragment = alert.map_or(String::new(), |message| {
        format!(r#"<div class="alert alert-danger">{message}</div>"#)
    });
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Log in</title></head>
<body>
{alert_fragment}
<form method="post" action="/login" role="form">
  <label for="login">Username or email</label>
  <input name="login" type="text" id="login">
  <label for="password">Password</label>
  <input name="password" type="password" id="password">
  <button type="submit">Log in</button>
</form>
</body>
</html>
"#
    )
}
