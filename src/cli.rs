// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Usage:
//   cdx-urls example.com
//   cdx-urls example.com --after 2022 --before 2024 -c 8 -o urls.txt --append
//
// The domain is optional at the clap level so that a missing domain can be
// answered with the usage text and exit code 1 (clap itself would use 2).
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::cdx::YearRange;
use crate::config::{QueryConfig, RetryPolicy, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(
    name = "cdx-urls",
    version = "0.1.0",
    about = "Get every URL a web archive has recorded for a domain, across all of its indexes",
    long_about = "cdx-urls asks the CDX index server which indexes exist, queries each of them \
                  for every URL under the given domain, and prints the de-duplicated, sorted list.\n\n\
                  Simple usage example: cdx-urls example.com"
)]
pub struct Cli {
    /// Domain to search (e.g., example.com)
    pub domain: Option<String>,

    /// Only use indexes from this year onward (e.g., 2022)
    #[arg(long, value_name = "YEAR")]
    pub after: Option<i32>,

    /// Only use indexes before this year (e.g., 2024)
    #[arg(long, value_name = "YEAR")]
    pub before: Option<i32>,

    /// How many indexes to query at the same time
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub concurrency: u16,

    /// Write the URLs to this file instead of printing them
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of overwriting it
    #[arg(long, requires = "output")]
    pub append: bool,

    /// Extra attempts for an index that fails (0 = try once)
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = 1000, value_name = "MS")]
    pub retry_delay_ms: u64,

    /// Per-request timeout for index queries, in seconds
    #[arg(
        long,
        default_value_t = 20,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// CDX server to query
    #[arg(long, env = "CDX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print a JSON report instead of the human-readable summary
    #[arg(long)]
    pub json: bool,

    /// Show debug logs (same as RUST_LOG=cdx_urls=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn year_range(&self) -> YearRange {
        YearRange::new(self.after, self.before)
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            query_timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryPolicy {
                retries: self.retries,
                backoff: Duration::from_millis(self.retry_delay_ms),
            },
            ..QueryConfig::default()
        }
        .with_base_url(&self.base_url)
    }
}
