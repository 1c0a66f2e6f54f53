//! Error types for scenario execution.
//!
//! Transport failures and assertion failures are distinct: a refused
//! connection is not the same finding as a wrong status code, and test
//! output should say which one happened.

use thiserror::Error;

/// A failed declarative check against a captured response.
#[derive(Debug, Error)]
#[error("assertion failed: {check} (expected {expected}, got {actual})")]
pub struct AssertionError {
    /// Which check failed.
    pub check: String,
    /// What the scenario expected.
    pub expected: String,
    /// What the response actually held.
    pub actual: String,
}

impl AssertionError {
    /// Creates an assertion failure record.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Errors raised while building or executing a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The HTTP request could not be sent or the response not read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response check failed.
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}
