//! Logout Conformance Tests
//!
//! Logout must work with or without a session, and must actually delete
//! the session cookies: an empty value with an expiry at or before the
//! epoch, not merely a re-issued pair.

use serde_json::json;

use tck_http::Scenario;

use crate::harness::TestHarness;

/// logout-1: An unauthenticated JSON logout returns 200.
#[tokio::test]
async fn test_unauthenticated_json_logout_returns_200() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::post(&harness.client, harness.config.logout_url())
        .accept_json()
        .send()
        .await?;

    response.expect_status(200)?;
    Ok(())
}

/// logout-2: An HTML logout redirects to the root with a `Location`
/// header.
#[tokio::test]
async fn test_html_logout_redirects_to_root() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::get(&harness.client, harness.config.logout_url())
        .accept_html()
        .send()
        .await?;

    response.expect_status(302)?.expect_location("/")?;
    Ok(())
}

/// logout-3: Logout deletes both session cookies.
#[tokio::test]
async fn test_logout_deletes_session_cookies() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;
    let guard = harness.provisioner().create().await?;
    let account = guard.account().clone();

    // Establish a session first.
    let login = Scenario::post(&harness.client, harness.config.login_url())
        .accept_json()
        .json(json!({"login": account.username, "password": account.password}))
        .send()
        .await?;
    login.expect_status(200)?;
    let access = login.expect_cookie("access_token")?.value.clone();
    let refresh = login.expect_cookie("refresh_token")?.value.clone();

    let response = Scenario::post(&harness.client, harness.config.logout_url())
        .accept_json()
        .cookie("access_token", access)
        .cookie("refresh_token", refresh)
        .send()
        .await?;

    response
        .expect_status(200)?
        .expect_cookie_deleted("access_token")?
        .expect_cookie_deleted("refresh_token")?;

    guard.dispose().await?;
    Ok(())
}

/// logout-4: Unauthenticated logout still clears the cookie names.
#[tokio::test]
async fn test_unauthenticated_logout_still_clears_cookies() -> anyhow::Result<()> {
    let harness = TestHarness::new().await?;

    let response = Scenario::get(&harness.client, harness.config.logout_url())
        .accept_html()
        .send()
        .await?;

    response
        .expect_status(302)?
        .expect_cookie_deleted("access_token")?
        .expect_cookie_deleted("refresh_token")?;

    Ok(())
}
