//! Shared test utilities used across renyi crates.
//!
//! - [`tracing::RecordingLayer`] captures spans and events so tests can assert
//!   instrumentation.
//! - [`proptest_profile::PropertyRunProfile`] reads the property-test case
//!   budget from the environment.

pub mod proptest_profile;
pub mod tracing;
