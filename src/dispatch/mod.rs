// src/dispatch/mod.rs
// =============================================================================
// Fan-out / fan-in over the selected indexes.
//
// - fanout: queries every index with bounded concurrency, retries per
//   policy, and merges the answers into one de-duplicated set
// - results: the types a run produces (per-index outcome, URL set, report)
// =============================================================================

mod fanout;
mod results;

pub use fanout::Dispatcher;
pub use results::{IndexSummary, QueryOutcome, ResultSet, RunReport};
