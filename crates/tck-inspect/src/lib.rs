//! # tck-inspect
//!
//! Pure inspection helpers shared by the conformance suites.
//!
//! Everything in this crate is side-effect free: the scenario runner
//! captures a response, and these helpers answer questions about it —
//! was a session cookie cleared, what does a token's payload claim, does
//! the login page actually contain a login form.
//!
//! ## Modules
//!
//! - [`cookie`] - Cookie deletion check used by logout assertions
//! - [`claims`] - Unverified compact-token claim extraction
//! - [`html`] - Permissive HTML tree, depth-first locator, text flattening

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claims;
pub mod cookie;
pub mod html;

pub use claims::{claim, decode_payload, subject, ClaimError};
pub use html::{parse_document, Element, Node};
