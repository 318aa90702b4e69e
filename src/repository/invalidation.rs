//! Observable queries
//!
//! Writers bump a version counter after every change to the `items`
//! table. An observed query runs once on subscription and again after each
//! bump, yielding only results that differ from the previous one.

use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::DomainResult;

/// Live query result stream
pub type QueryStream<T> = BoxStream<'static, DomainResult<T>>;

/// Table version counter shared by a store and all of its observers
#[derive(Clone)]
pub struct InvalidationTracker {
    version: Arc<watch::Sender<u64>>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            version: Arc::new(version),
        }
    }

    /// Signal that the table changed
    pub fn notify(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    pub fn observer_count(&self) -> usize {
        self.version.receiver_count()
    }

    /// Turn a re-runnable query into a live stream.
    ///
    /// Ends when every clone of the tracker has been dropped.
    pub fn observe<T, F, Fut>(&self, query: F) -> QueryStream<T>
    where
        T: PartialEq + Clone + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = DomainResult<T>> + Send + 'static,
    {
        let state = Observer {
            rx: self.version.subscribe(),
            query,
            last: None,
            started: false,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if state.started {
                    state.rx.changed().await.ok()?;
                } else {
                    state.started = true;
                }
                let _ = state.rx.borrow_and_update();

                match (state.query)().await {
                    Ok(value) => {
                        if state.last.as_ref() == Some(&value) {
                            continue;
                        }
                        state.last = Some(value.clone());
                        return Some((Ok(value), state));
                    }
                    Err(e) => return Some((Err(e), state)),
                }
            }
        })
        .boxed()
    }
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}

struct Observer<T, F> {
    rx: watch::Receiver<u64>,
    query: F,
    last: Option<T>,
    started: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::timeout;

    fn counter_query(
        value: Arc<Mutex<i32>>,
    ) -> impl FnMut() -> futures::future::Ready<DomainResult<i32>> + Send + 'static {
        move || futures::future::ready(Ok(*value.lock().unwrap()))
    }

    #[tokio::test]
    async fn test_emits_initial_value() {
        let tracker = InvalidationTracker::new();
        let value = Arc::new(Mutex::new(1));
        let mut stream = tracker.observe(counter_query(value));

        assert_eq!(stream.next().await, Some(Ok(1)));
    }

    #[tokio::test]
    async fn test_emits_after_change() {
        let tracker = InvalidationTracker::new();
        let value = Arc::new(Mutex::new(1));
        let mut stream = tracker.observe(counter_query(value.clone()));
        assert_eq!(stream.next().await, Some(Ok(1)));

        *value.lock().unwrap() = 2;
        tracker.notify();

        assert_eq!(stream.next().await, Some(Ok(2)));
    }

    #[tokio::test]
    async fn test_suppresses_unchanged_results() {
        let tracker = InvalidationTracker::new();
        let value = Arc::new(Mutex::new(1));
        let mut stream = tracker.observe(counter_query(value.clone()));
        assert_eq!(stream.next().await, Some(Ok(1)));

        tracker.notify();
        let pending = timeout(Duration::from_millis(50), stream.next()).await;
        assert!(pending.is_err(), "no emission expected for unchanged result");

        *value.lock().unwrap() = 3;
        tracker.notify();
        assert_eq!(stream.next().await, Some(Ok(3)));
    }

    #[tokio::test]
    async fn test_ends_when_tracker_dropped() {
        let tracker = InvalidationTracker::new();
        let mut stream = tracker.observe(counter_query(Arc::new(Mutex::new(0))));
        assert_eq!(stream.next().await, Some(Ok(0)));

        drop(tracker);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_dropping_stream_releases_observer() {
        let tracker = InvalidationTracker::new();
        let stream = tracker.observe(counter_query(Arc::new(Mutex::new(0))));
        assert_eq!(tracker.observer_count(), 1);

        drop(stream);
        assert_eq!(tracker.observer_count(), 0);
    }
}
