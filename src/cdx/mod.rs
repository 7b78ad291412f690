// src/cdx/mod.rs
// =============================================================================
// Everything that talks to (or understands the answers of) a CDX index
// server.
//
// Submodules:
// - error: typed failures for the catalog and for single index queries
// - transport: the HTTP side, behind a trait so tests can swap it out
// - catalog: the list of available indexes and the year filter
// - records: newline-delimited JSON capture records -> URLs
// =============================================================================

mod catalog;
mod error;
mod records;
mod transport;

pub use catalog::{list_indexes, parse_catalog, IndexDescriptor, YearRange};
pub use error::{CatalogError, FetchError, IndexQueryError};
pub use records::{parse_records, ParsedRecords};
pub use transport::{query_url, CdxTransport, HttpTransport};
