//! # tck-http
//!
//! HTTP scenario runner and response assertion layer for the TCK.
//!
//! A conformance scenario is one request and a chain of declarative
//! checks against its response. [`Scenario`] builds and sends the
//! request; [`ScenarioResponse`] captures status, headers, cookies, and
//! body, and exposes chainable `expect_*` matchers that fail with a
//! descriptive [`AssertionError`].
//!
//! Two deliberate client properties keep scenarios honest:
//! redirects are never followed (a 302 is an asserted outcome, not a hop
//! to transparently take), and no cookie jar is kept (session state is
//! passed to each scenario explicitly).
//!
//! ## Modules
//!
//! - [`scenario`] - Request builder and client construction
//! - [`response`] - Captured response and assertion matchers
//! - [`error`] - Transport and assertion error types

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod response;
pub mod scenario;

pub use error::{AssertionError, ScenarioError};
pub use response::{ResponseCookie, ScenarioResponse};
pub use scenario::{scenario_client, Scenario};
