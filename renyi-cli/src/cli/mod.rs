//! Command-line driver for threshold sweeps.
//!
//! `renyi run` picks an analysis, brackets its theoretical threshold with ten
//! probability points, runs the Monte-Carlo sweep, and writes the results as
//! CSV.

mod commands;
mod output;

pub use commands::{
    Cli, CliError, Command, ComparisonArg, DiameterArgs, Experiment, ExecutionSummary,
    LogProgress, RunCommand, run_cli,
};
pub use output::{CSV_HEADER, CsvSink, render_table};

#[cfg(test)]
mod tests;
