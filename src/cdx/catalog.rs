// src/cdx/catalog.rs
// =============================================================================
// The index catalog: which archive snapshots exist, and which of them a run
// should query.
//
// Index ids look like "CC-MAIN-2024-33". The year is read from the third
// dash-separated segment (first four characters). Some ids don't follow
// that shape; what happens to them depends on the year filter:
// - no --after / --before: every index is kept, parsable or not
// - any bound set: an index whose year can't be read is dropped
// =============================================================================

use serde::Deserialize;

use super::error::CatalogError;
use super::transport::CdxTransport;

/// One archive snapshot, named by its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDescriptor {
    id: String,
    year: Option<i32>,
}

impl IndexDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let year = parse_year(&id);
        Self { id, year }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `None` when the id has no readable year token.
    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

fn parse_year(id: &str) -> Option<i32> {
    let segment = id.split('-').nth(2)?;
    let token: String = segment.chars().take(4).collect();
    token.parse().ok()
}

/// Half-open year interval: `after <= year < before`, each bound optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub after: Option<i32>,
    pub before: Option<i32>,
}

impl YearRange {
    pub fn new(after: Option<i32>, before: Option<i32>) -> Self {
        Self { after, before }
    }

    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.after.map_or(true, |after| year >= after)
            && self.before.map_or(true, |before| year < before)
    }

    pub fn admits(&self, index: &IndexDescriptor) -> bool {
        if self.is_unbounded() {
            return true;
        }
        index.year().is_some_and(|year| self.contains(year))
    }
}

// Only `id` matters, the server sends more (name, timegate, cdx-api)
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
}

/// Parses a catalog body into descriptors, keeping the server's order.
pub fn parse_catalog(body: &str) -> Result<Vec<IndexDescriptor>, serde_json::Error> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .map(|entry| IndexDescriptor::new(entry.id))
        .collect())
}

/// Fetches the catalog once and applies the year filter.
///
/// No retry: a failure here ends the run.
pub async fn list_indexes<T>(
    transport: &T,
    range: YearRange,
) -> Result<Vec<IndexDescriptor>, CatalogError>
where
    T: CdxTransport + ?Sized,
{
    let body = transport.fetch_catalog().await?;
    let all = parse_catalog(&body)?;
    let total = all.len();

    let selected: Vec<IndexDescriptor> = all
        .into_iter()
        .filter(|index| range.admits(index))
        .collect();

    tracing::debug!(
        total,
        selected = selected.len(),
        after = ?range.after,
        before = ?range.before,
        "index catalog filtered"
    );

    Ok(selected)
}
