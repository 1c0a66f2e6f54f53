//! Test harness for the conformance suites.
//!
//! Resolves the target (external via `TCK_BASE_URL`, or an in-process
//! reference stub on a random port), builds the scenario client, and
//! waits for the target to answer before any scenario runs.

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use tck_core::config::BASE_URL_ENV;
use tck_core::{init_tracing, TckConfig};
use tck_http::scenario_client;
use tck_provision::Provisioner;
use tck_stub::StubServer;

/// A resolved target plus the client scenarios share.
pub struct TestHarness {
    /// Target configuration (base URL and route paths).
    pub config: TckConfig,
    /// Scenario client: redirects disabled, no cookie store.
    pub client: Client,
    /// Keeps the stub alive for the duration of the test.
    _stub: Option<StubServer>,
}

impl TestHarness {
    /// Creates a harness for the configured target.
    ///
    /// With `TCK_BASE_URL` set, scenarios run against that URL; otherwise
    /// a reference stub is booted and used.
    pub async fn new() -> anyhow::Result<Self> {
        init_tracing();

        let (config, stub) = if std::env::var(BASE_URL_ENV).is_ok() {
            (TckConfig::from_env()?, None)
        } else {
            let stub = StubServer::spawn().await?;
            (TckConfig::new(&stub.base_url), Some(stub))
        };

        let client = scenario_client(config.request_timeout)?;
        wait_for_target(&client, &config.base_url).await?;

        Ok(Self {
            config,
            client,
            _stub: stub,
        })
    }

    /// An account provisioner bound to this target.
    pub fn provisioner(&self) -> Provisioner {
        Provisioner::with_client(self.client.clone(), self.config.clone())
    }

    /// OAuth2 client ID for the client-credentials grant.
    pub fn client_id(&self) -> String {
        std::env::var("TCK_CLIENT_ID").unwrap_or_else(|_| tck_stub::CLIENT_ID.to_string())
    }

    /// OAuth2 client secret for the client-credentials grant.
    pub fn client_secret(&self) -> String {
        std::env::var("TCK_CLIENT_SECRET").unwrap_or_else(|_| tck_stub::CLIENT_SECRET.to_string())
    }
}

/// Waits for the target to answer HTTP at all.
///
/// Any response counts as ready; only connection errors are retried.
async fn wait_for_target(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{base_url}/health");
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(_) => {
                tracing::debug!("target ready after {} attempts", attempt);
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(
                    "target not ready ({}), attempt {}/{}",
                    e,
                    attempt,
                    max_attempts
                );
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("target did not become ready in time")
}
