//! OAuth2 Token Endpoint Conformance Tests
//!
//! The token route: form-encoded grants, Bearer token responses, the
//! contract's `{error, message}` bodies, and the RFC 6749 cache
//! suppression headers on error responses.
//!
//! Reference: RFC 6749 §4.3 (password), §6 (refresh), §4.4 (client
//! credentials), §5.2 (error responses).

use tck_http::Scenario;
use tck_inspect::claims;

use crate::harness::TestHarness;

/// token-endpoint-1: The password grant returns a full token pair.
#[tokio::test]
async fn test_password_grant_returns_token_pair() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[
            ("grant_type", "password"),
            ("username", account.username.as_str()),
            ("password", account.password.as_str()),
        ])
        .send()
        .await?;

    response
        .expect_status(200)?
        .expect_content_type("application/json")?;
    let body = response.json()?;

    let access_token = body["access_token"].as_str().unwrap_or_default();
    assert!(!access_token.is_empty(), "access_token must be present");
    assert!(
        body["token_type"]
            .as_str()
            .is_some_and(|t| t.eq_ignore_ascii_case("bearer")),
        "token_type must be Bearer, got {body}"
    );
    assert!(
        body["expires_in"].as_u64().is_some_and(|e| e > 0),
        "expires_in must be positive, got {body}"
    );
    assert!(
        body["refresh_token"].as_str().is_some_and(|t| !t.is_empty()),
        "password grant must return a refresh token"
    );

    let subject = claims::subject(access_token)?;
    assert_eq!(subject, account.href, "access token subject must be the account");

    guard.dispose().await?;
    Ok(())
}

/// token-endpoint-2: An unknown grant type returns 400 with
/// `error=unsupported_grant_type` and a non-empty message.
#[tokio::test]
async fn test_unknown_grant_type_is_rejected() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[("grant_type", "foobar_grant")])
        .send()
        .await?;

    response
        .expect_status(400)?
        .expect_json_error("unsupported_grant_type")?;

    Ok(())
}

/// token-endpoint-3: A missing grant type is also unsupported.
#[tokio::test]
async fn test_missing_grant_type_is_rejected() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[("username", "someone")])
        .send()
        .await?;

    response
        .expect_status(400)?
        .expect_json_error("unsupported_grant_type")?;

    Ok(())
}

/// token-endpoint-4: Wrong credentials on the password grant return
/// `invalid_grant`.
#[tokio::test]
async fn test_invalid_password_grant_is_rejected() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[
            ("grant_type", "password"),
            ("username", account.username.as_str()),
            ("password", "wrong-password"),
        ])
        .send()
        .await?;

    response.expect_status(400)?.expect_json_error("invalid_grant")?;

    guard.dispose().await?;
    Ok(())
}

/// token-endpoint-5: The refresh grant rotates the pair.
#[tokio::test]
async fn test_refresh_grant_rotates_tokens() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    let initial = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[
            ("grant_type", "password"),
            ("username", account.username.as_str()),
            ("password", account.password.as_str()),
        ])
        .send()
        .await?;
    initial.expect_status(200)?;
    let refresh_token = initial.json()?["refresh_token"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(!refresh_token.is_empty());

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ])
        .send()
        .await?;

    response.expect_status(200)?;
    let body = response.json()?;
    assert!(
        body["access_token"].as_str().is_some_and(|t| !t.is_empty()),
        "refresh grant must return a new access token"
    );
    assert!(
        body["refresh_token"].as_str().is_some_and(|t| !t.is_empty()),
        "refresh grant must return a new refresh token"
    );

    guard.dispose().await?;
    Ok(())
}

/// token-endpoint-6: A bogus refresh token returns `invalid_grant`.
#[tokio::test]
async fn test_invalid_refresh_token_is_rejected() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", "not-a-refresh-token"),
        ])
        .send()
        .await?;

    response.expect_status(400)?.expect_json_error("invalid_grant")?;

    Ok(())
}

/// token-endpoint-7: The client-credentials grant succeeds with Basic
/// auth and returns no refresh token.
#[tokio::test]
async fn test_client_credentials_grant_returns_access_token_only() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .basic_auth(harness.client_id(), Some(&harness.client_secret()))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    response.expect_status(200)?;
    let body = response.json()?;
    assert!(
        body["access_token"].as_str().is_some_and(|t| !t.is_empty()),
        "client credentials must return an access token"
    );
    assert!(
        body.get("refresh_token").is_none(),
        "client credentials must not return a refresh token, got {body}"
    );

    Ok(())
}

/// token-endpoint-8: Client credentials without Basic auth return 401
/// `invalid_client`.
#[tokio::test]
async fn test_missing_client_auth_is_unauthorized() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    response.expect_status(401)?.expect_json_error("invalid_client")?;

    Ok(())
}

/// token-endpoint-9: A wrong client secret returns 401 `invalid_client`.
#[tokio::test]
async fn test_wrong_client_secret_is_unauthorized() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .basic_auth(harness.client_id(), Some("wrong-secret"))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    response.expect_status(401)?.expect_json_error("invalid_client")?;

    Ok(())
}

/// token-endpoint-10: `GET` against the token route answers 405.
#[tokio::test]
async fn test_get_on_token_route_is_method_not_allowed() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::get(&harness.client, harness.config.token_url())
        .send()
        .await?;

    response.expect_status(405)?;
    Ok(())
}

/// token-endpoint-11: Token error responses disable caching.
#[tokio::test]
async fn test_token_errors_disable_caching() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.token_url())
        .form(&[("grant_type", "foobar_grant")])
        .send()
        .await?;

    response
        .expect_status(400)?
        .expect_header("cache-control", "no-store")?
        .expect_header("pragma", "no-cache")?;

    Ok(())
}
