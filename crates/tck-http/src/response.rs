//! Captured responses and declarative assertions.

use std::time::{Duration, SystemTime};

use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use tck_inspect::cookie::is_deleted;
use tck_inspect::html::{parse_document, Element};

use crate::error::{AssertionError, ScenarioError};

/// A response cookie captured from `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct ResponseCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value (empty when the cookie is being cleared).
    pub value: String,
    /// `Expires` attribute, when present.
    pub expires: Option<SystemTime>,
    /// `Max-Age` attribute, when present.
    pub max_age: Option<Duration>,
    /// `Path` attribute, when present.
    pub path: Option<String>,
    /// `Domain` attribute, when present.
    pub domain: Option<String>,
    /// Whether the cookie is `HttpOnly`.
    pub http_only: bool,
}

/// Everything a scenario may assert about: status, headers, cookies, body.
#[derive(Debug)]
pub struct ScenarioResponse {
    status: StatusCode,
    headers: HeaderMap,
    cookies: Vec<ResponseCookie>,
    body: String,
}

impl ScenarioResponse {
    /// Captures a response, consuming its body.
    pub(crate) async fn capture(response: Response) -> Result<Self, ScenarioError> {
        let status = response.status();
        let headers = response.headers().clone();
        let cookies = response
            .cookies()
            .map(|c| ResponseCookie {
                name: c.name().to_string(),
                value: c.value().to_string(),
                expires: c.expires(),
                max_age: c.max_age(),
                path: c.path().map(str::to_string),
                domain: c.domain().map(str::to_string),
                http_only: c.http_only(),
            })
            .collect();
        let body = response.text().await?;
        Ok(Self {
            status,
            headers,
            cookies,
            body,
        })
    }

    /// Response status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Header value as text, when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The captured cookie with the given name, if any.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    /// Asserts the exact response status.
    ///
    /// # Errors
    ///
    /// Fails when the status differs.
    pub fn expect_status(&self, code: u16) -> Result<&Self, AssertionError> {
        if self.status.as_u16() == code {
            Ok(self)
        } else {
            Err(AssertionError::new(
                "status",
                code.to_string(),
                format!("{} (body: {})", self.status, truncate(&self.body)),
            ))
        }
    }

    /// Asserts the `Content-Type` header starts with the given prefix.
    ///
    /// # Errors
    ///
    /// Fails when the header is absent or has a different media type.
    pub fn expect_content_type(&self, prefix: &str) -> Result<&Self, AssertionError> {
        match self.header("content-type") {
            Some(value) if value.starts_with(prefix) => Ok(self),
            other => Err(AssertionError::new(
                "content-type",
                prefix,
                other.unwrap_or("<absent>").to_string(),
            )),
        }
    }

    /// Asserts a header is present with exactly the given value.
    ///
    /// # Errors
    ///
    /// Fails when the header is absent or differs.
    pub fn expect_header(&self, name: &str, expected: &str) -> Result<&Self, AssertionError> {
        match self.header(name) {
            Some(value) if value == expected => Ok(self),
            other => Err(AssertionError::new(
                format!("header {name}"),
                expected,
                other.unwrap_or("<absent>").to_string(),
            )),
        }
    }

    /// Asserts a header is present and contains the given substring.
    ///
    /// # Errors
    ///
    /// Fails when the header is absent or does not contain the needle.
    pub fn expect_header_contains(
        &self,
        name: &str,
        needle: &str,
    ) -> Result<&Self, AssertionError> {
        match self.header(name) {
            Some(value) if value.contains(needle) => Ok(self),
            other => Err(AssertionError::new(
                format!("header {name}"),
                format!("contains {needle:?}"),
                other.unwrap_or("<absent>").to_string(),
            )),
        }
    }

    /// Asserts the redirect `Location` header equals the given target.
    ///
    /// # Errors
    ///
    /// Fails when the header is absent or differs.
    pub fn expect_location(&self, target: &str) -> Result<&Self, AssertionError> {
        self.expect_header("location", target)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Fails when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, AssertionError> {
        serde_json::from_str(&self.body).map_err(|e| {
            AssertionError::new("json body", "valid JSON", format!("{e}: {}", truncate(&self.body)))
        })
    }

    /// Asserts the body is a conformant JSON error: an object with exactly
    /// the keys `error` and `message`, `error` equal to `code`, and a
    /// non-empty `message`.
    ///
    /// # Errors
    ///
    /// Fails when the body deviates from that shape.
    pub fn expect_json_error(&self, code: &str) -> Result<&Self, AssertionError> {
        let value = self.json()?;
        let (error, _message) = error_shape(&value)?;
        if error == code {
            Ok(self)
        } else {
            Err(AssertionError::new("error code", code, error))
        }
    }

    /// Asserts a cookie with the given name was set with a non-empty value.
    ///
    /// # Errors
    ///
    /// Fails when the cookie is absent or empty.
    pub fn expect_cookie(&self, name: &str) -> Result<&ResponseCookie, AssertionError> {
        match self.cookie(name) {
            Some(cookie) if !cookie.value.is_empty() => Ok(cookie),
            Some(_) => Err(AssertionError::new(
                format!("cookie {name}"),
                "non-empty value",
                "empty value".to_string(),
            )),
            None => Err(AssertionError::new(
                format!("cookie {name}"),
                "present",
                "absent".to_string(),
            )),
        }
    }

    /// Asserts a cookie was deleted: either no `Set-Cookie` for it at all,
    /// or one clearing it (empty value with an expiry at or before now, or
    /// a zero `Max-Age`).
    ///
    /// # Errors
    ///
    /// Fails when the cookie was set with a live value.
    pub fn expect_cookie_deleted(&self, name: &str) -> Result<&Self, AssertionError> {
        match self.cookie(name) {
            None => Ok(self),
            Some(cookie) if is_deleted(&cookie.value, cookie.expires, cookie.max_age) => Ok(self),
            Some(cookie) => Err(AssertionError::new(
                format!("cookie {name}"),
                "deleted (empty value, past expiry)",
                format!(
                    "value {:?}, expires {:?}, max-age {:?}",
                    cookie.value, cookie.expires, cookie.max_age
                ),
            )),
        }
    }

    /// Parses the body as an HTML element tree.
    #[must_use]
    pub fn html(&self) -> Element {
        parse_document(&self.body)
    }
}

/// Validates the TCK error-body shape and returns `(error, message)`.
///
/// # Errors
///
/// Fails unless the value is a JSON object with exactly the keys `error`
/// and `message`, both strings, `message` non-empty.
pub fn error_shape(value: &Value) -> Result<(String, String), AssertionError> {
    let Some(object) = value.as_object() else {
        return Err(AssertionError::new(
            "error body",
            "JSON object",
            value.to_string(),
        ));
    };
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    if keys != ["error", "message"] {
        return Err(AssertionError::new(
            "error body keys",
            r#"exactly ["error", "message"]"#,
            format!("{keys:?}"),
        ));
    }
    let error = object
        .get("error")
        .and_then(Value::as_str)
        .ok_or_else(|| AssertionError::new("error field", "string", value.to_string()))?;
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| AssertionError::new("message field", "string", value.to_string()))?;
    if message.is_empty() {
        return Err(AssertionError::new(
            "message field",
            "non-empty string",
            "empty string".to_string(),
        ));
    }
    Ok((error.to_string(), message.to_string()))
}

/// Trims long bodies out of assertion messages.
fn truncate(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < LIMIT)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}…", &body[..cut])
    }
}
