//! # tck-stub
//!
//! In-process reference server implementing the contract the TCK asserts:
//! login (HTML form and JSON), logout with session-cookie deletion, an
//! OAuth2 token route with password / refresh / client-credentials
//! grants, and a registration route with account deletion.
//!
//! The stub exists so the kit exercises itself: when `TCK_BASE_URL` is
//! unset, the conformance harness boots a stub on a random port and runs
//! every suite against it. It keeps accounts in memory and signs tokens
//! with a SHA-256 construction that is inspection-grade, not JOSE-grade.
//!
//! ## Modules
//!
//! - [`accounts`] - Registration and account deletion handlers
//! - [`error`] - Contract-shaped error responses
//! - [`oauth`] - OAuth2 token route
//! - [`router`] - Route table
//! - [`state`] - In-memory account store and client constants
//! - [`token`] - Compact token issuance and verification
//! - [`ui`] - Login page, login submission, logout

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod accounts;
pub mod error;
pub mod oauth;
pub mod router;
pub mod state;
pub mod token;
pub mod ui;

pub use router::create_router;
pub use state::{StubState, CLIENT_ID, CLIENT_SECRET};

use tokio::sync::oneshot;

/// A stub server running on a random local port.
///
/// Shuts down gracefully when dropped.
#[derive(Debug)]
pub struct StubServer {
    /// Base URL of the running stub.
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    /// Binds a random port and serves the stub in a background task.
    ///
    /// # Errors
    ///
    /// Fails when the listener cannot be bound.
    pub async fn spawn() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = create_router(StubState::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::error!("stub server error: {e}");
            }
        });

        tracing::info!("stub server listening on http://{addr}");
        Ok(Self {
            base_url: format!("http://{addr}"),
            shutdown: Some(shutdown_tx),
        })
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
