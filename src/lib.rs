// src/lib.rs
// =============================================================================
// Library half of cdx-urls. The binary in main.rs is a thin shell around it.
//
// Modules:
// - cdx: the CDX server (catalog, index queries, record parsing)
// - dispatch: bounded fan-out over the indexes and the merged result
// - config: timeouts, user agent, retry policy
// - cli: argument parsing
// - output: URL file and JSON report
// =============================================================================

pub mod cdx;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod output;
