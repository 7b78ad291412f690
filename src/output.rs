// src/output.rs
// =============================================================================
// Everything the user sees at the end of a run:
// - the URL file (one URL per line, sorted), overwritten or appended to
// - the JSON report for --json
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::dispatch::{IndexSummary, ResultSet, RunReport};

/// Writes `urls` to `path`, one per line, in the order given.
///
/// `append = false` truncates an existing file; `append = true` adds after
/// whatever is already there. The file is created if missing.
pub fn write_urls(path: &Path, urls: &[String], append: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    for url in urls {
        writeln!(writer, "{}", url)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

/// Shape of the --json output.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub domain: &'a str,
    pub indexes: usize,
    pub failed_indexes: Vec<&'a str>,
    pub skipped_lines: usize,
    /// Sorted by index id, not by completion order
    pub per_index: Vec<&'a IndexSummary>,
    pub total_urls: usize,
    pub urls: &'a ResultSet,
}

impl<'a> JsonReport<'a> {
    pub fn new(domain: &'a str, report: &'a RunReport) -> Self {
        let mut failed_indexes: Vec<&str> = report
            .failures
            .iter()
            .map(|failure| failure.index.as_str())
            .collect();
        failed_indexes.sort_unstable();

        Self {
            domain,
            indexes: report.queried(),
            failed_indexes,
            skipped_lines: report.skipped_lines,
            per_index: report.per_index_sorted(),
            total_urls: report.urls.len(),
            urls: &report.urls,
        }
    }
}
