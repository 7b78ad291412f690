// src/main.rs
// =============================================================================
// Entry point of the cdx-urls CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Fetch the index catalog (once) and apply the year filter
// 3. Query every selected index, up to --concurrency at a time
// 4. Print a summary and the sorted URLs, or write them to --output
//
// Exit codes: 0 = run completed (even with failed indexes), 1 = no domain
// given, 2 = unexpected error (e.g. the output file can't be written).
// =============================================================================

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cdx_urls::cdx::{self, CdxTransport, HttpTransport};
use cdx_urls::cli::Cli;
use cdx_urls::dispatch::{Dispatcher, QueryOutcome, RunReport};
use cdx_urls::output;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,cdx_urls=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(domain) = cli.domain.as_deref() else {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("error: a domain to search is required (e.g., cdx-urls example.com)");
        return Ok(1);
    };

    let transport =
        HttpTransport::new(cli.query_config()).context("Failed to create HTTP client")?;

    let Some(report) = collect(&transport, &cli, domain).await else {
        return Ok(0);
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output::JsonReport::new(domain, &report))?;
        println!("{}", json);
    } else {
        print_summary(&report);
    }

    let urls = report.urls.sorted();
    match &cli.output {
        Some(path) => {
            output::write_urls(path, &urls, cli.append)?;
            if !cli.json {
                let mode = if cli.append { "appended to" } else { "written to" };
                println!("💾 {} URL(s) {} {}", urls.len(), mode, path.display());
            }
        }
        None if !cli.json => {
            for url in &urls {
                println!("{}", url);
            }
        }
        None => {}
    }

    Ok(0)
}

// Catalog + fan-out
//
// Returns None when there is nothing to query: the catalog could not be
// fetched, or no index matched the year filter. Both are reported here.
async fn collect<T>(transport: &T, cli: &Cli, domain: &str) -> Option<RunReport>
where
    T: CdxTransport + ?Sized,
{
    let indexes = match cdx::list_indexes(transport, cli.year_range()).await {
        Ok(indexes) => indexes,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e.to_string().red());
            return None;
        }
    };

    if indexes.is_empty() {
        eprintln!("{}", "❌ No indexes available. Exiting.".red());
        return None;
    }

    let progress = !cli.json;
    if progress {
        println!(
            "{} {}",
            format!("🔍 {} matching indexes selected for:", indexes.len()).blue(),
            domain
        );
    }

    let retry = cli.query_config().retry;
    let report = Dispatcher::new(transport)
        .concurrency(usize::from(cli.concurrency))
        .retry(retry)
        .query_all(domain, &indexes, |outcome| {
            if progress {
                print_outcome(outcome);
            }
        })
        .await;

    Some(report)
}

fn print_outcome(outcome: &QueryOutcome) {
    match outcome {
        QueryOutcome::Found { index, records } => {
            println!(
                "{}",
                format!("✓ {} URLs found in {}", records.urls.len(), index).green()
            );
        }
        // the warning itself is logged by the dispatcher
        QueryOutcome::Failed(error) => {
            println!("{}", format!("✗ 0 URLs from {}", error.index).yellow());
        }
    }
}

fn print_summary(report: &RunReport) {
    println!();
    if !report.failures.is_empty() {
        println!(
            "{}",
            format!(
                "⚠️  {} of {} indexes failed, results are partial",
                report.failures.len(),
                report.queried()
            )
            .yellow()
        );
    }
    println!(
        "{}",
        format!(
            "✅ Total unique URLs across all indexes: {}",
            report.urls.len()
        )
        .green()
        .bold()
    );
}
