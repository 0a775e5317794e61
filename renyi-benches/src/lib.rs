//! Benchmark support crate for renyi.
//!
//! Provides parameter types and setup helpers for the Criterion benchmarks
//! that time single trials (graph randomisation plus one analysis) and full
//! threshold sweeps.

pub mod error;
pub mod params;
pub mod setup;
