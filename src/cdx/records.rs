// src/cdx/records.rs
// =============================================================================
// Turns an index response into URLs.
//
// With output=json the server answers one JSON object per line:
//
//   {"urlkey": "com,example)/", "timestamp": "20240716...", "url": "https://example.com/", ...}
//
// We only keep `url`. A line that isn't JSON, or has no string `url`, is
// skipped and counted; the rest of the response is still used.
// =============================================================================

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CdxRecord {
    url: String,
}

/// URLs found in one response, in response order (duplicates included).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecords {
    pub urls: Vec<String>,
    pub skipped_lines: usize,
}

pub fn parse_records(body: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match serde_json::from_str::<CdxRecord>(line) {
            Ok(record) => parsed.urls.push(record.url),
            Err(_) => parsed.skipped_lines += 1,
        }
    }

    parsed
}
