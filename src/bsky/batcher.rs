use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::ProfileView;

use super::appview::ProfileSource;

/// Matches the AppView `getProfiles` per-call limit.
pub const MAX_BATCH_SIZE: usize = 25;

pub const FLUSH_DELAY: Duration = Duration::from_millis(50);

/// `Clone` so one failed upstream call can fan out to every waiter
/// sharing the batch future.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("upstream getProfiles call failed: {0}")]
    Upstream(String),
    #[error("profile request dropped before it resolved")]
    Dropped,
}

/// `Ok(None)` means the upstream response did not include the DID: a
/// valid "not found", distinct from a transport failure.
pub type ProfileResult = Result<Option<ProfileView>, FetchError>;

type SharedFetch = Shared<BoxFuture<'static, ProfileResult>>;

struct PendingFetch {
    did: String,
    tx: oneshot::Sender<ProfileResult>,
}

struct FetchState {
    queue: VecDeque<PendingFetch>,
    // Pending and resolved fetches look the same to callers; entries
    // whose batch failed are evicted so a later call can retry.
    cache: HashMap<String, SharedFetch>,
    // Bumped on every dispatch; a sleeping flush task only fires if
    // the epoch it captured is still current.
    timer_epoch: u64,
}

struct Inner {
    source: Arc<dyn ProfileSource>,
    state: Mutex<FetchState>,
}

/// Coalesces single-profile lookups into batched upstream calls, with
/// in-flight dedupe per DID. Cheap to clone.
#[derive(Clone)]
pub struct ProfileBatchFetcher {
    inner: Arc<Inner>,
}

impl ProfileBatchFetcher {
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(FetchState {
                    queue: VecDeque::new(),
                    cache: HashMap::new(),
                    timer_epoch: 0,
                }),
            }),
        }
    }

    /// The request joins the open batch, which dispatches at
    /// `MAX_BATCH_SIZE` entries or `FLUSH_DELAY` after its first entry,
    /// whichever comes first.
    pub fn fetch_profile(
        &self,
        did: &str,
    ) -> impl std::future::Future<Output = ProfileResult> {
        let mut dispatch_now = None;
        let mut arm_timer = None;

        let fetch = {
            let mut state = self.inner.state.lock();
            if let Some(existing) = state.cache.get(did) {
                return existing.clone();
            }

            let (tx, rx) = oneshot::channel();
            let fetch: SharedFetch = rx
                .map(|res| res.unwrap_or(Err(FetchError::Dropped)))
                .boxed()
                .shared();

            state.cache.insert(did.to_string(), fetch.clone());
            state.queue.push_back(PendingFetch {
                did: did.to_string(),
                tx,
            });

            if state.queue.len() >= MAX_BATCH_SIZE {
                dispatch_now = Some(drain_batch(&mut state));
                if !state.queue.is_empty() {
                    arm_timer = Some(state.timer_epoch);
                }
            } else if state.queue.len() == 1 {
                arm_timer = Some(state.timer_epoch);
            }
            fetch
        };

        if let Some(batch) = dispatch_now {
            self.spawn_dispatch(batch);
        }
        if let Some(epoch) = arm_timer {
            self.arm_flush_timer(epoch);
        }
        fetch
    }

    fn arm_flush_timer(&self, epoch: u64) {
        let fetcher = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(FLUSH_DELAY).await;
            fetcher.flush_if_current(epoch);
        });
    }

    fn flush_if_current(&self, epoch: u64) {
        let batch = {
            let mut state = self.inner.state.lock();
            if state.timer_epoch != epoch || state.queue.is_empty() {
                return;
            }
            drain_batch(&mut state)
        };
        self.spawn_dispatch(batch);
    }

    fn spawn_dispatch(&self, batch: Vec<PendingFetch>) {
        let fetcher = self.clone();
        tokio::spawn(async move {
            fetcher.dispatch(batch).await;
        });
    }

    async fn dispatch(&self, batch: Vec<PendingFetch>) {
        let dids: Vec<String> = batch.iter().map(|item| item.did.clone()).collect();
        tracing::debug!(target: "batcher", size = dids.len(), "dispatching profile batch");

        match self.inner.source.get_profiles(dids.clone()).await {
            Ok(profiles) => {
                let mut by_did: HashMap<String, ProfileView> = profiles
                    .into_iter()
                    .map(|profile| (profile.did.clone(), profile))
                    .collect();
                for item in batch {
                    // A DID absent from the response is "not found",
                    // never an error.
                    let _ = item.tx.send(Ok(by_did.remove(&item.did)));
                }
            }
            Err(err) => {
                tracing::warn!(target: "batcher", error = %err, size = dids.len(), "profile batch failed");
                // Evict before delivering the error, so a waiter that
                // retries the moment it observes the failure cannot hit
                // the stale cached entry.
                {
                    let mut state = self.inner.state.lock();
                    for did in &dids {
                        state.cache.remove(did);
                    }
                }
                for item in batch {
                    let _ = item.tx.send(Err(err.clone()));
                }
            }
        }
    }
}

// Caller holds the lock.
fn drain_batch(state: &mut FetchState) -> Vec<PendingFetch> {
    state.timer_epoch += 1;
    let take = state.queue.len().min(MAX_BATCH_SIZE);
    state.queue.drain(..take).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSource {
        calls: Mutex<Vec<Vec<String>>>,
        fail: Mutex<bool>,
        omit: Vec<String>,
    }

    impl MockSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: Mutex::new(false),
                omit: Vec::new(),
            })
        }

        fn omitting(dids: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: Mutex::new(false),
                omit: dids.iter().map(|d| d.to_string()).collect(),
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().clone()
        }
    }

    impl ProfileSource for MockSource {
        fn get_profiles(
            &self,
            dids: Vec<String>,
        ) -> BoxFuture<'static, Result<Vec<ProfileView>, FetchError>> {
            self.calls.lock().push(dids.clone());
            if *self.fail.lock() {
                return async { Err(FetchError::Upstream("boom".into())) }.boxed();
            }
            let omit = self.omit.clone();
            async move {
                Ok(dids
                    .into_iter()
                    .filter(|did| !omit.contains(did))
                    .map(|did| ProfileView {
                        handle: format!("{}.test", did.trim_start_matches("did:plc:")),
                        did,
                        ..Default::default()
                    })
                    .collect())
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_requests_for_one_did_share_one_upstream_call() {
        let source = MockSource::new();
        let fetcher = ProfileBatchFetcher::new(source.clone());

        let first = fetcher.fetch_profile("did:plc:a");
        let second = fetcher.fetch_profile("did:plc:a");
        let (a, b) = tokio::join!(first, second);

        assert_eq!(a.unwrap().unwrap().did, "did:plc:a");
        assert_eq!(b.unwrap().unwrap().did, "did:plc:a");
        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec!["did:plc:a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn resolved_results_are_cached_for_the_fetcher_lifetime() {
        let source = MockSource::new();
        let fetcher = ProfileBatchFetcher::new(source.clone());

        fetcher.fetch_profile("did:plc:a").await.unwrap();
        let again = fetcher.fetch_profile("did:plc:a").await.unwrap();

        assert_eq!(again.unwrap().did, "did:plc:a");
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overfull_queue_splits_into_size_capped_batches() {
        let source = MockSource::new();
        let fetcher = ProfileBatchFetcher::new(source.clone());

        let fetches: Vec<_> = (0..30)
            .map(|i| fetcher.fetch_profile(&format!("did:plc:n{i}")))
            .collect();
        for result in futures::future::join_all(fetches).await {
            assert!(result.unwrap().is_some());
        }

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].len(), MAX_BATCH_SIZE);
        assert_eq!(calls[1].len(), 5);
        // Batches dispatch in enqueue order.
        assert_eq!(calls[0][0], "did:plc:n0");
        assert_eq!(calls[1][0], "did:plc:n25");
    }

    #[tokio::test(start_paused = true)]
    async fn omitted_did_resolves_to_none_not_an_error() {
        let source = MockSource::omitting(&["did:plc:gone"]);
        let fetcher = ProfileBatchFetcher::new(source.clone());

        let gone = fetcher.fetch_profile("did:plc:gone");
        let here = fetcher.fetch_profile("did:plc:here");
        let (gone, here) = tokio::join!(gone, here);

        assert!(gone.unwrap().is_none());
        assert_eq!(here.unwrap().unwrap().did, "did:plc:here");
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_failure_rejects_every_future_in_the_batch() {
        let source = MockSource::new();
        *source.fail.lock() = true;
        let fetcher = ProfileBatchFetcher::new(source.clone());

        let a = fetcher.fetch_profile("did:plc:a");
        let b = fetcher.fetch_profile("did:plc:b");
        let (a, b) = tokio::join!(a, b);

        assert!(matches!(a, Err(FetchError::Upstream(_))));
        assert!(matches!(b, Err(FetchError::Upstream(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_entries_are_evicted_and_can_be_retried() {
        let source = MockSource::new();
        *source.fail.lock() = true;
        let fetcher = ProfileBatchFetcher::new(source.clone());

        assert!(fetcher.fetch_profile("did:plc:a").await.is_err());

        *source.fail.lock() = false;
        let retried = fetcher.fetch_profile("did:plc:a").await;
        assert_eq!(retried.unwrap().unwrap().did, "did:plc:a");
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_observed_failure_misses_the_cache() {
        let source = MockSource::new();
        *source.fail.lock() = true;
        let fetcher = ProfileBatchFetcher::new(source.clone());

        // A second handle to the failed shared future stays alive across
        // the retry; eviction must not depend on it being dropped.
        let held = fetcher.fetch_profile("did:plc:a");
        assert!(fetcher.fetch_profile("did:plc:a").await.is_err());

        *source.fail.lock() = false;
        let retried = fetcher.fetch_profile("did:plc:a").await;
        assert_eq!(retried.unwrap().unwrap().did, "did:plc:a");
        assert_eq!(source.calls().len(), 2);

        assert!(held.await.is_err());
    }
}
