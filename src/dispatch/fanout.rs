// src/dispatch/fanout.rs
// =============================================================================
// Queries every selected index for one domain and merges the answers.
//
// How it works:
// 1. Turn each index into a future that queries it (with retries)
// 2. Run up to `concurrency` of those futures at once (buffer_unordered)
// 3. Consume the finished outcomes one at a time in a single loop, which
//    is the only place the URL set is written to
//
// With concurrency = 1 the stream polls one future at a time, so indexes are
// queried strictly in listing order. With more, outcomes arrive in
// whatever order the server answers.
//
// A failing index never stops the run: it becomes a QueryOutcome::Failed
// and the other queries carry on.
// =============================================================================

use futures::stream::{self, StreamExt};

use super::results::{QueryOutcome, RunReport};
use crate::cdx::{parse_records, CdxTransport, IndexDescriptor, IndexQueryError};
use crate::config::RetryPolicy;

pub struct Dispatcher<'a, T: ?Sized> {
    transport: &'a T,
    concurrency: usize,
    retry: RetryPolicy,
}

impl<'a, T> Dispatcher<'a, T>
where
    T: CdxTransport + ?Sized,
{
    /// Sequential, single attempt per index.
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            concurrency: 1,
            retry: RetryPolicy::none(),
        }
    }

    /// Values below 1 are treated as 1.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // Runs the whole fan-out
    //
    // `on_outcome` is called once per index as soon as it finishes, from the
    // aggregating loop (never concurrently), before the outcome is merged.
    pub async fn query_all<F>(
        &self,
        domain: &str,
        indexes: &[IndexDescriptor],
        mut on_outcome: F,
    ) -> RunReport
    where
        F: FnMut(&QueryOutcome),
    {
        tracing::debug!(
            domain,
            indexes = indexes.len(),
            concurrency = self.concurrency,
            attempts = self.retry.attempts(),
            "starting fan-out"
        );

        let mut outcomes = stream::iter(indexes)
            .map(|index| self.query_index(domain, index))
            .buffer_unordered(self.concurrency);

        let mut report = RunReport::default();
        while let Some(outcome) = outcomes.next().await {
            on_outcome(&outcome);
            report.absorb(outcome);
        }

        tracing::debug!(
            domain,
            unique_urls = report.urls.len(),
            failed = report.failures.len(),
            "fan-out finished"
        );

        report
    }

    // One index, up to `retry.attempts()` tries
    async fn query_index(&self, domain: &str, index: &IndexDescriptor) -> QueryOutcome {
        let attempts = self.retry.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.transport.fetch_index(index, domain).await {
                Ok(body) => {
                    let records = parse_records(&body);
                    if records.skipped_lines > 0 {
                        tracing::debug!(
                            index = index.id(),
                            skipped = records.skipped_lines,
                            "skipped unparsable records"
                        );
                    }
                    return QueryOutcome::Found {
                        index: index.id().to_string(),
                        records,
                    };
                }
                Err(error) if attempt < attempts => {
                    tracing::debug!(
                        index = index.id(),
                        attempt,
                        %error,
                        "index query failed, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(error) => {
                    let error = IndexQueryError {
                        index: index.id().to_string(),
                        attempts: attempt,
                        source: error,
                    };
                    tracing::warn!("{}", error);
                    return QueryOutcome::Failed(error);
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why buffer_unordered and not tokio::spawn?
//    - The futures borrow the transport and the domain; spawned tasks would
//      need 'static data (Arc + owned Strings)
//    - buffer_unordered still keeps up to N requests in flight on the same
//      task, which is all an I/O-bound fan-out needs
//
// 2. Why no Mutex around the set?
//    - Only the `while let` loop touches the report, and it runs on one task.
//      The queries themselves return values instead of sharing state.
// -----------------------------------------------------------------------------
