//! Scenario request builder.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::{AssertionError, ScenarioError};
use crate::response::ScenarioResponse;

/// Builds a `reqwest` client suitable for conformance scenarios:
/// redirects disabled, no cookie store, explicit timeout.
///
/// # Errors
///
/// Fails if the TLS backend cannot be initialized.
pub fn scenario_client(timeout: Duration) -> Result<Client, ScenarioError> {
    let client = Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok(client)
}

/// The request body a scenario sends.
#[derive(Debug, Clone)]
enum Body {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
}

/// One HTTP request under construction.
///
/// Every setter consumes and returns the scenario so requests read as a
/// single declarative chain ending in [`Scenario::send`].
#[derive(Debug, Clone)]
pub struct Scenario {
    client: Client,
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    basic_auth: Option<(String, Option<String>)>,
    body: Body,
}

impl Scenario {
    /// Starts a scenario with an arbitrary method.
    #[must_use]
    pub fn request(client: &Client, method: Method, url: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            method,
            url: url.into(),
            headers: Vec::new(),
            cookies: Vec::new(),
            basic_auth: None,
            body: Body::Empty,
        }
    }

    /// Starts a GET scenario.
    #[must_use]
    pub fn get(client: &Client, url: impl Into<String>) -> Self {
        Self::request(client, Method::GET, url)
    }

    /// Starts a POST scenario.
    #[must_use]
    pub fn post(client: &Client, url: impl Into<String>) -> Self {
        Self::request(client, Method::POST, url)
    }

    /// Starts a DELETE scenario.
    #[must_use]
    pub fn delete(client: &Client, url: impl Into<String>) -> Self {
        Self::request(client, Method::DELETE, url)
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Requests a JSON response (`Accept: application/json`).
    #[must_use]
    pub fn accept_json(self) -> Self {
        self.header(ACCEPT.as_str(), "application/json")
    }

    /// Requests an HTML response (`Accept: text/html`).
    #[must_use]
    pub fn accept_html(self) -> Self {
        self.header(ACCEPT.as_str(), "text/html")
    }

    /// Attaches a request cookie.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Sets HTTP Basic authentication credentials.
    #[must_use]
    pub fn basic_auth(mut self, user: impl Into<String>, password: Option<&str>) -> Self {
        self.basic_auth = Some((user.into(), password.map(str::to_string)));
        self
    }

    /// Sets a form-encoded body.
    #[must_use]
    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = Body::Form(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    /// Builds the outgoing header map from the declared headers and
    /// cookies. A name or value that is not legal HTTP is a scenario
    /// authoring bug and fails here rather than sending a request
    /// missing the header.
    fn build_headers(&self) -> Result<HeaderMap, AssertionError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|_| {
                AssertionError::new("request header name", "a valid HTTP header name", name)
            })?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|_| {
                AssertionError::new("request header value", "a valid HTTP header value", value)
            })?;
            headers.append(name, value);
        }
        if !self.cookies.is_empty() {
            let joined = self
                .cookies
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            let value = HeaderValue::try_from(joined.as_str()).map_err(|_| {
                AssertionError::new("request cookie header", "a valid Cookie value", &joined)
            })?;
            headers.append(COOKIE, value);
        }
        Ok(headers)
    }

    /// Sends the request and captures the response.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertion`] when a declared header or
    /// cookie is not legal HTTP, and [`ScenarioError::Transport`] when
    /// the request cannot be sent or the response body not read. A
    /// non-success status is not an error; scenarios assert on it.
    pub async fn send(self) -> Result<ScenarioResponse, ScenarioError> {
        let headers = self.build_headers()?;

        let mut request = self
            .client
            .request(self.method.clone(), &self.url)
            .headers(headers);
        if let Some((user, password)) = &self.basic_auth {
            request = request.basic_auth(user, password.as_deref());
        }
        request = match &self.body {
            Body::Empty => request,
            Body::Form(pairs) => request.form(pairs),
            Body::Json(value) => request.json(value),
        };

        tracing::debug!(method = %self.method, url = %self.url, "sending scenario request");
        let response = request.send().await?;
        ScenarioResponse::capture(response).await
    }
}
