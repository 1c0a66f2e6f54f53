//! JSON Login Conformance Tests
//!
//! The login route, spoken JSON: `POST` with `Accept: application/json`
//! and a `{"login", "password"}` body. Success returns the account
//! representation and sets both session cookies; failure returns a 400
//! with the contract's exact error shape.

use serde_json::json;

use tck_http::Scenario;
use tck_inspect::claims;

use crate::harness::TestHarness;

/// login-json-1: Valid credentials return 200 with the account body.
#[tokio::test]
async fn test_valid_credentials_return_account() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    let response = Scenario::post(&harness.client, harness.config.login_url())
        .accept_json()
        .json(json!({"login": account.username, "password": account.password}))
        .send()
        .await?;

    response
        .expect_status(200)?
        .expect_content_type("application/json")?;
    let body = response.json()?;
    assert_eq!(
        body.pointer("/account/email").and_then(|v| v.as_str()),
        Some(account.email.as_str()),
        "account body must echo the email, got {body}"
    );
    assert!(
        body.pointer("/account/href")
            .and_then(|v| v.as_str())
            .is_some_and(|href| !href.is_empty()),
        "account body must carry an href, got {body}"
    );

    guard.dispose().await?;
    Ok(())
}

/// login-json-2: Successful login sets both session cookies, and the
/// access token's subject names the logged-in account.
#[tokio::test]
async fn test_success_sets_session_cookies() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    let response = Scenario::post(&harness.client, harness.config.login_url())
        .accept_json()
        .json(json!({"login": account.username, "password": account.password}))
        .send()
        .await?;

    response.expect_status(200)?;
    let access = response.expect_cookie("access_token")?;
    response.expect_cookie("refresh_token")?;

    let subject = claims::subject(&access.value)?;
    assert_eq!(subject, account.href, "access token subject must be the account");

    guard.dispose().await?;
    Ok(())
}

/// login-json-3: Wrong password returns 400 with exactly
/// `{"error", "message"}`.
#[tokio::test]
async fn test_invalid_credentials_return_error_shape() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    let response = Scenario::post(&harness.client, harness.config.login_url())
        .accept_json()
        .json(json!({"login": account.username, "password": "wrong-password"}))
        .send()
        .await?;

    response
        .expect_status(400)?
        .expect_content_type("application/json")?
        .expect_json_error("invalid_login")?;

    guard.dispose().await?;
    Ok(())
}

/// login-json-4: A body with no password is rejected with the same
/// error shape, leaking nothing about which field was wrong.
#[tokio::test]
async fn test_missing_password_returns_error_shape() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.login_url())
        .accept_json()
        .json(json!({"login": "someone"}))
        .send()
        .await?;

    response
        .expect_status(400)?
        .expect_json_error("invalid_login")?;

    Ok(())
}

/// login-json-5: Failed login sets no session cookies.
#[tokio::test]
async fn test_failure_sets_no_session_cookies() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.login_url())
        .accept_json()
        .json(json!({"login": "nobody", "password": "nothing"}))
        .send()
        .await?;

    response.expect_status(400)?;
    assert!(
        response.cookie("access_token").is_none(),
        "failed login must not set access_token"
    );
    assert!(
        response.cookie("refresh_token").is_none(),
        "failed login must not set refresh_token"
    );

    Ok(())
}
