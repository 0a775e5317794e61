//! CSV rendering of sweep results.

use std::io::{self, Write};

use renyi_core::{PointResult, ResultsSink, ResultsTable};

/// Header row written before the point rows.
pub const CSV_HEADER: &str = "probability,expected,successes,trials,success_rate,status";

/// [`ResultsSink`] writing one CSV row per probability point.
///
/// `trials` counts completed trials, so partial and pending rows stay honest.
/// `success_rate` is left empty when no trial ran.
#[derive(Debug)]
pub struct CsvSink<W> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, row: &PointResult) -> io::Result<()> {
        let rate = row
            .success_rate()
            .map(|rate| rate.to_string())
            .unwrap_or_default();
        writeln!(
            self.writer,
            "{},{},{},{},{},{}",
            row.point().probability(),
            row.point().expected(),
            row.successes(),
            row.completed_trials(),
            rate,
            row.status().as_str(),
        )
    }
}

impl<W: Write> ResultsSink for CsvSink<W> {
    type Error = io::Error;

    fn write_table(&mut self, table: &ResultsTable) -> io::Result<()> {
        writeln!(self.writer, "{CSV_HEADER}")?;
        for row in table.rows() {
            self.write_row(row)?;
        }
        self.writer.flush()
    }
}

/// Renders `table` to `writer` as CSV.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use renyi_cli::cli::render_table;
/// # use renyi_core::{ExperimentHarness, NoProgress, ProbabilityPoint, SeededSource};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let harness = ExperimentHarness::builder().with_vertex_count(4).build()?;
/// let points = [ProbabilityPoint::new(1.0, true, 2)?];
/// let table = harness.run_sweep(&points, &SeededSource::new(5), &mut NoProgress)?;
/// let mut buffer = Vec::new();
/// render_table(&table, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "probability,expected,successes,trials,success_rate,status\n1,true,2,2,1,complete\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_table(table: &ResultsTable, writer: impl Write) -> io::Result<()> {
    CsvSink::new(writer).write_table(table)
}
