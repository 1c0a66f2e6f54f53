//! # tck-core
//!
//! Target configuration and logging setup for the framework TCK.
//!
//! This crate provides the shared configuration consumed by the scenario
//! runner, the account provisioner, and the conformance suites: where the
//! system under test lives and which routes implement the asserted
//! contract.
//!
//! ## Modules
//!
//! - [`config`] - Target base URL and route paths, environment-driven
//! - [`logging`] - Tracing initialization for test processes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod logging;

pub use config::TckConfig;
pub use logging::init_tracing;
