//! Support library for the `renyi` binary.
//!
//! Exposes the command pipeline and logging setup so tests and doctests can
//! drive a sweep without spawning a subprocess.

pub mod cli;
pub mod logging;
