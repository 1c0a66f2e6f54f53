//! Framework Integration Conformance Suite
//!
//! Validates a framework integration's login, logout, OAuth2 token, and
//! registration behavior against the fixed contract: status codes,
//! cookies, redirects, JSON error shapes, and HTML form content.
//!
//! ## Targets
//!
//! Set `TCK_BASE_URL` to run against an external system under test.
//! When unset, each scenario boots the in-process reference stub on a
//! random port and runs against that, so the suite is self-checking.
//!
//! ## Test groups
//!
//! Run everything:
//! ```bash
//! cargo test -p tck-conformance-tests
//! ```
//!
//! Run one group:
//! ```bash
//! cargo test -p tck-conformance-tests login_json
//! cargo test -p tck-conformance-tests login_html
//! cargo test -p tck-conformance-tests logout
//! cargo test -p tck-conformance-tests token_endpoint
//! cargo test -p tck-conformance-tests provisioning
//! ```

mod harness;
mod login_json;
mod logout;
mod token_endpoint;
