use crate::domain::model::{BatchResult, Identifier, LookupResult};
use crate::domain::ports::{ConfigProvider, FailurePolicy, PhoneLookup, ProgressSink};
use crate::utils::error::{ExtractorError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Runs lookups with at most `concurrency` in flight and hands the results
/// back in input order.
pub struct BatchFetcher<L: PhoneLookup> {
    lookup: Arc<L>,
    concurrency: usize,
    policy: FailurePolicy,
}

impl<L: PhoneLookup + 'static> BatchFetcher<L> {
    pub fn new(lookup: L, concurrency: usize, policy: FailurePolicy) -> Self {
        Self {
            lookup: Arc::new(lookup),
            concurrency: concurrency.max(1),
            policy,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(lookup: L, config: &C) -> Self {
        Self::new(lookup, config.concurrent_requests(), config.failure_policy())
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Progress advances as each lookup completes. Results are re-paired with
    /// their input position, so completion order never leaks into the output.
    /// Dropping the task set aborts any lookup still in flight.
    pub async fn fetch_all(
        &self,
        identifiers: &[Identifier],
        progress: &dyn ProgressSink,
    ) -> Result<BatchResult> {
        tracing::info!(
            "Looking up {} identifiers with {} workers",
            identifiers.len(),
            self.concurrency
        );
        progress.start(identifiers.len() as u64);

        let mut tasks = JoinSet::new();
        let mut positions = HashMap::new();
        let mut results: Vec<Option<LookupResult>> = identifiers.iter().map(|_| None).collect();
        let mut pending = identifiers.iter().enumerate();
        let mut failures = 0usize;

        loop {
            while tasks.len() < self.concurrency {
                let Some((index, identifier)) = pending.next() else {
                    break;
                };
                let lookup = Arc::clone(&self.lookup);
                let identifier = identifier.clone();
                let task = tasks.spawn(async move { lookup.lookup(&identifier).await });
                positions.insert(task.id(), index);
            }

            let Some(joined) = tasks.join_next_with_id().await else {
                break;
            };
            progress.advance();

            let (index, outcome) = match joined {
                Ok((id, outcome)) => (positions.remove(&id), outcome),
                Err(e) => {
                    let index = positions.remove(&e.id());
                    let failure = ExtractorError::LookupTransportError {
                        identifier: index.map(|i| identifiers[i].clone()).unwrap_or_default(),
                        message: format!("lookup task failed: {}", e),
                    };
                    (index, Err(failure))
                }
            };
            let Some(index) = index else {
                continue;
            };

            let result = match outcome {
                Ok(result) => result,
                Err(e) => match self.policy {
                    FailurePolicy::NotFound => {
                        tracing::warn!("{}; recording as not found", e);
                        failures += 1;
                        LookupResult::NotFound
                    }
                    FailurePolicy::Abort => {
                        tracing::error!(
                            "{}; aborting batch with {} lookups in flight",
                            e,
                            tasks.len()
                        );
                        tasks.abort_all();
                        progress.finish();
                        return Err(e);
                    }
                },
            };
            results[index] = Some(result);
        }
        progress.finish();

        let pairs: BatchResult = identifiers
            .iter()
            .cloned()
            .zip(results)
            .map(|(identifier, result)| (identifier, result.unwrap_or(LookupResult::NotFound)))
            .collect();

        let found = pairs.iter().filter(|(_, result)| result.is_found()).count();
        tracing::info!(
            "Batch finished: {} found, {} not found ({} transport failures)",
            found,
            pairs.len() - found,
            failures
        );
        Ok(pairs)
    }
}
