//! # tck-provision
//!
//! Disposable test-account provisioning against the target's registration
//! route.
//!
//! Scenarios that exercise login or the password grant need a real
//! account on the system under test. [`Provisioner::create`] registers
//! one with generated unique values (so concurrently running suites never
//! collide) and hands back an [`AccountGuard`] that deletes it again —
//! explicitly via [`AccountGuard::dispose`], or best-effort on drop when
//! a test fails before reaching teardown. Cleanup is not transactional;
//! a killed test process can leak accounts on the target.
//!
//! ## Modules
//!
//! - [`account`] - Account data and unique-value generation
//! - [`error`] - Provisioning error type

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod error;

pub use account::{AccountSpec, TestAccount};
pub use error::ProvisionError;

use reqwest::Client;
use serde_json::Value;

use tck_core::TckConfig;

/// Registers and deletes disposable accounts on the target.
#[derive(Debug, Clone)]
pub struct Provisioner {
    client: Client,
    config: TckConfig,
}

impl Provisioner {
    /// Creates a provisioner for a target.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: TckConfig) -> Result<Self, ProvisionError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ProvisionError::Transport)?;
        Ok(Self { client, config })
    }

    /// Creates a provisioner reusing an existing client.
    #[must_use]
    pub fn with_client(client: Client, config: TckConfig) -> Self {
        Self { client, config }
    }

    /// Registers a fresh account with generated unique values.
    ///
    /// # Errors
    ///
    /// Fails when the registration request cannot be sent, returns a
    /// non-success status, or returns a body without an account href.
    pub async fn create(&self) -> Result<AccountGuard, ProvisionError> {
        self.create_from(AccountSpec::generate()).await
    }

    /// Registers an account from an explicit spec.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Provisioner::create`].
    pub async fn create_from(&self, spec: AccountSpec) -> Result<AccountGuard, ProvisionError> {
        let response = self
            .client
            .post(self.config.register_url())
            .json(&spec.registration_body())
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(ProvisionError::Registration {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }

        let href = body
            .pointer("/account/href")
            .and_then(Value::as_str)
            .ok_or_else(|| ProvisionError::MissingHref {
                body: body.to_string(),
            })?
            .to_string();

        let account = TestAccount {
            href,
            email: spec.email,
            username: spec.username,
            password: spec.password,
            given_name: spec.given_name,
            surname: spec.surname,
        };
        tracing::debug!(href = %account.href, "provisioned test account");

        Ok(AccountGuard {
            account,
            client: self.client.clone(),
            base_url: self.config.base_url.clone(),
            disposed: false,
        })
    }
}

/// A provisioned account plus its teardown obligation.
///
/// Prefer [`AccountGuard::dispose`] at the end of a scenario; dropping an
/// undisposed guard spawns a best-effort background delete when a tokio
/// runtime is available, so failed tests still clean up.
#[derive(Debug)]
pub struct AccountGuard {
    account: TestAccount,
    client: Client,
    base_url: String,
    disposed: bool,
}

impl AccountGuard {
    /// The provisioned account.
    #[must_use]
    pub fn account(&self) -> &TestAccount {
        &self.account
    }

    /// Absolute URL of the account resource.
    #[must_use]
    pub fn account_url(&self) -> String {
        if self.account.href.starts_with("http") {
            self.account.href.clone()
        } else {
            format!("{}{}", self.base_url, self.account.href)
        }
    }

    /// Deletes the account on the target.
    ///
    /// # Errors
    ///
    /// Fails when the delete request cannot be sent or the target rejects
    /// it with a status other than success or 404 (already gone).
    pub async fn dispose(mut self) -> Result<(), ProvisionError> {
        self.disposed = true;
        let url = self.account_url();
        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        if status.is_success() || status.as_u16() == 404 {
            tracing::debug!(%url, "deleted test account");
            Ok(())
        } else {
            Err(ProvisionError::Teardown {
                status: status.as_u16(),
                url,
            })
        }
    }
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        let url = self.account_url();
        let client = self.client.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match client.delete(&url).send().await {
                        Ok(response) if response.status().is_success() => {
                            tracing::debug!(%url, "deleted leaked test account");
                        }
                        Ok(response) => {
                            tracing::warn!(%url, status = %response.status(),
                                "could not delete leaked test account");
                        }
                        Err(e) => {
                            tracing::warn!(%url, error = %e,
                                "could not delete leaked test account");
                        }
                    }
                });
            }
            Err(_) => {
                tracing::warn!(%url, "account leaked: no runtime for teardown");
            }
        }
    }
}
