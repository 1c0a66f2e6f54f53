//! Provisioning error type.

use thiserror::Error;

/// Errors raised while provisioning or tearing down test accounts.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The HTTP request could not be sent or its body not read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registration route rejected the account.
    #[error("registration failed with status {status}: {body}")]
    Registration {
        /// Response status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The registration response carried no account href.
    #[error("registration response has no account href: {body}")]
    MissingHref {
        /// Response body.
        body: String,
    },

    /// The delete request was rejected.
    #[error("account teardown failed with status {status} for {url}")]
    Teardown {
        /// Response status code.
        status: u16,
        /// Account resource URL.
        url: String,
    },
}
