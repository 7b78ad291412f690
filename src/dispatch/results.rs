// src/dispatch/results.rs
// =============================================================================
// What a run produces.
//
// QueryOutcome is the answer of one index: either its URLs or the error it
// gave up with, never both. RunReport folds outcomes together. Folding is a
// set union, so the order in which outcomes arrive changes nothing but the
// order of the failure and per-index lists (sort those before showing them).
// =============================================================================

use serde::Serialize;
use std::collections::HashSet;

use crate::cdx::{IndexQueryError, ParsedRecords};

#[derive(Debug)]
pub enum QueryOutcome {
    Found { index: String, records: ParsedRecords },
    Failed(IndexQueryError),
}

impl QueryOutcome {
    pub fn index(&self) -> &str {
        match self {
            QueryOutcome::Found { index, .. } => index,
            QueryOutcome::Failed(error) => &error.index,
        }
    }
}

/// De-duplicated URLs, compared by exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<String>")]
pub struct ResultSet {
    urls: HashSet<String>,
}

impl ResultSet {
    pub fn extend<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.urls.extend(urls);
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Lexicographic order, the order used for every kind of output.
    pub fn sorted(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.iter().cloned().collect();
        urls.sort();
        urls
    }
}

impl FromIterator<String> for ResultSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

impl From<ResultSet> for Vec<String> {
    fn from(set: ResultSet) -> Self {
        set.sorted()
    }
}

/// What one index contributed. `urls` is the raw count, before
/// de-duplication; a failed index contributes 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub index: String,
    pub urls: usize,
    pub skipped_lines: usize,
    pub failed: bool,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub urls: ResultSet,
    pub failures: Vec<IndexQueryError>,
    /// In completion order.
    pub per_index: Vec<IndexSummary>,
    pub succeeded: usize,
    pub skipped_lines: usize,
}

impl RunReport {
    pub fn absorb(&mut self, outcome: QueryOutcome) {
        match outcome {
            QueryOutcome::Found { index, records } => {
                self.per_index.push(IndexSummary {
                    index,
                    urls: records.urls.len(),
                    skipped_lines: records.skipped_lines,
                    failed: false,
                });
                self.succeeded += 1;
                self.skipped_lines += records.skipped_lines;
                self.urls.extend(records.urls);
            }
            QueryOutcome::Failed(error) => {
                self.per_index.push(IndexSummary {
                    index: error.index.clone(),
                    urls: 0,
                    skipped_lines: 0,
                    failed: true,
                });
                self.failures.push(error);
            }
        }
    }

    /// Per-index summaries sorted by index id.
    pub fn per_index_sorted(&self) -> Vec<&IndexSummary> {
        let mut summaries: Vec<&IndexSummary> = self.per_index.iter().collect();
        summaries.sort_by(|a, b| a.index.cmp(&b.index));
        summaries
    }

    pub fn queried(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdx::FetchError;

    fn found(index: &str, urls: &[&str]) -> QueryOutcome {
        QueryOutcome::Found {
            index: index.to_string(),
            records: ParsedRecords {
                urls: urls.iter().map(|url| url.to_string()).collect(),
                skipped_lines: 1,
            },
        }
    }

    fn failed(index: &str) -> QueryOutcome {
        QueryOutcome::Failed(IndexQueryError {
            index: index.to_string(),
            attempts: 1,
            source: FetchError::Timeout,
        })
    }

    #[test]
    fn test_absorb_is_union() {
        let mut report = RunReport::default();
        report.absorb(found("a", &["https://x/1", "https://x/2", "https://x/2"]));
        report.absorb(failed("b"));
        report.absorb(found("c", &["https://x/2", "https://x/3"]));

        assert_eq!(report.urls.sorted(), vec!["https://x/1", "https://x/2", "https://x/3"]);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.queried(), 3);
        assert_eq!(report.skipped_lines, 2);

        let summaries: Vec<(&str, usize, usize, bool)> = report
            .per_index_sorted()
            .into_iter()
            .map(|s| (s.index.as_str(), s.urls, s.skipped_lines, s.failed))
            .collect();
        assert_eq!(
            summaries,
            vec![("a", 3, 1, false), ("b", 0, 0, true), ("c", 2, 1, false)]
        );
    }

    #[test]
    fn test_absorb_order_does_not_matter() {
        let mut forward = RunReport::default();
        forward.absorb(found("a", &["u1", "u2"]));
        forward.absorb(found("b", &["u2", "u3"]));
        forward.absorb(found("c", &[]));

        let mut backward = RunReport::default();
        backward.absorb(found("c", &[]));
        backward.absorb(found("b", &["u2", "u3"]));
        backward.absorb(found("a", &["u1", "u2"]));

        assert_eq!(forward.urls, backward.urls);
        assert_eq!(forward.per_index_sorted(), backward.per_index_sorted());
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: ResultSet = ["a", "b", "a"].iter().map(|url| url.to_string()).collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.sorted(), vec!["a", "b"]);
    }

    #[test]
    fn test_serializes_sorted() {
        let set: ResultSet = ["b".to_string(), "a".to_string()].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_outcome_index() {
        assert_eq!(found("CC-MAIN-2024-33", &[]).index(), "CC-MAIN-2024-33");
        assert_eq!(failed("CC-MAIN-2020-05").index(), "CC-MAIN-2020-05");
    }
}
