// ── Debounced artist search ──
//
// Keystrokes restart a quiet-period timer; only when the timer fires is
// the search function called. Timers are cancellable, in-flight requests
// are not: instead every fired request carries a generation number and a
// response older than the newest fired request is discarded.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::model::ArtistSearchResult;

type SearchFuture =
    Pin<Box<dyn Future<Output = Result<Vec<ArtistSearchResult>, CoreError>> + Send>>;
type SearchFn = Arc<dyn Fn(String) -> SearchFuture + Send + Sync>;

/// What the search view renders.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// The latest (trimmed) input.
    pub query: String,
    pub results: Arc<Vec<ArtistSearchResult>>,
    /// A fired request has not answered yet.
    pub in_flight: bool,
    /// Error of the most recent request. Prior results are kept.
    pub last_error: Option<String>,
}

/// Debounces search input and publishes results on a `watch` channel.
///
/// Cheap to clone; clones share the timer and the published state.
#[derive(Clone)]
pub struct SearchDebouncer {
    inner: Arc<DebouncerInner>,
}

struct DebouncerInner {
    search: SearchFn,
    delay: Duration,
    state: watch::Sender<SearchState>,
    pending: Mutex<Option<CancellationToken>>,
    /// Generation of the newest fired request (or clear).
    fired: AtomicU64,
}

impl SearchDebouncer {
    pub fn new<F, Fut>(delay: Duration, search: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<ArtistSearchResult>, CoreError>> + Send + 'static,
    {
        let (state, _) = watch::channel(SearchState::default());
        let search: SearchFn = Arc::new(move |q| Box::pin(search(q)));
        Self {
            inner: Arc::new(DebouncerInner {
                search,
                delay,
                state,
                pending: Mutex::new(None),
                fired: AtomicU64::new(0),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Feed the current input value.
    ///
    /// A non-empty query (re)starts the timer. An empty query cancels any
    /// pending timer and clears the results immediately, without a call.
    /// Must be called from within a tokio runtime.
    pub fn input(&self, raw: &str) {
        let query = raw.trim().to_owned();
        self.cancel_pending();

        if query.is_empty() {
            self.clear();
            return;
        }

        self.inner
            .state
            .send_modify(|s| s.query.clone_from(&query));

        let token = CancellationToken::new();
        *self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    trace!(%query, "search timer cancelled");
                }
                () = tokio::time::sleep(inner.delay) => {
                    inner.fire(query).await;
                }
            }
        });
    }

    /// Cancel any pending timer and empty the result set.
    pub fn clear(&self) {
        self.cancel_pending();
        // Late responses from already-fired requests must not repopulate.
        self.inner.fired.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_modify(|s| *s = SearchState::default());
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    fn cancel_pending(&self) {
        if let Some(token) = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }
}

impl DebouncerInner {
    async fn fire(&self, query: String) {
        let generation = self.fired.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(%query, generation, "search fired");
        self.state.send_modify(|s| s.in_flight = true);

        let outcome = (self.search)(query).await;

        if self.fired.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping stale search response");
            return;
        }

        self.state.send_modify(|s| {
            s.in_flight = false;
            match outcome {
                Ok(results) => {
                    s.results = Arc::new(results);
                    s.last_error = None;
                }
                Err(e) => s.last_error = Some(e.to_string()),
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::model::EntityId;

    fn hit(name: &str) -> ArtistSearchResult {
        ArtistSearchResult {
            id: EntityId::from(name),
            name: name.to_owned(),
            genres: Vec::new(),
            image_url: None,
            has_offenses: false,
            offense_count: 0,
            max_severity: None,
        }
    }

    /// A debouncer whose search echoes the query and records every call.
    fn recording() -> (SearchDebouncer, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let debouncer = SearchDebouncer::new(Duration::from_millis(250), move |q: String| {
            seen.lock().unwrap().push(q.clone());
            async move { Ok(vec![hit(&q)]) }
        });
        (debouncer, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_input_fires_once_with_final_value() {
        let (debouncer, calls) = recording();

        for q in ["d", "dr", "dra", "drak", "drake"] {
            debouncer.input(q);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["drake".to_owned()]);
        let state = debouncer.state();
        assert_eq!(state.query, "drake");
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].name, "drake");
        assert!(!state.in_flight);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_clears_synchronously_without_calling() {
        let (debouncer, calls) = recording();

        debouncer.input("drake");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(debouncer.state().results.len(), 1);

        debouncer.input("dra");
        debouncer.input("   ");
        let state = debouncer.state();
        assert!(state.results.is_empty());
        assert!(state.query.is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_responses_are_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let debouncer = SearchDebouncer::new(Duration::from_millis(250), move |q: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                let latency = if q == "slow" { 500 } else { 10 };
                tokio::time::sleep(Duration::from_millis(latency)).await;
                Ok(vec![hit(&q)])
            }
        });

        debouncer.input("slow");
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.input("fast");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let state = debouncer.state();
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].name, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn errors_keep_previous_results() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(200), |q: String| async move {
            if q == "boom" {
                Err(CoreError::Timeout)
            } else {
                Ok(vec![hit(&q)])
            }
        });

        debouncer.input("drake");
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.input("boom");
        tokio::time::sleep(Duration::from_millis(300)).await;

        let state = debouncer.state();
        assert_eq!(state.results[0].name, "drake");
        assert!(state.last_error.is_some());
        assert!(!state.in_flight);
    }
}
