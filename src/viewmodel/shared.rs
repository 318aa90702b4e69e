//! Screen state shared with observers
//!
//! `SharedState` keeps the latest value of an upstream query stream in a
//! `watch` channel. The upstream runs only while someone is subscribed,
//! plus a grace period after the last subscriber leaves, so a screen that
//! briefly disappears (rotation, backgrounding) does not restart its query.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::repository::QueryStream;

/// Default grace period before an unobserved upstream is stopped
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Latest-value holder backed by a restartable upstream stream
pub struct SharedState<T> {
    tx: Arc<watch::Sender<T>>,
    demand: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<T> SharedState<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start sharing. `upstream` is called each time the stream needs to
    /// (re)start. Must be called within a Tokio runtime.
    pub fn while_subscribed<F>(initial: T, stop_timeout: Duration, upstream: F) -> Self
    where
        F: Fn() -> QueryStream<T> + Send + 'static,
    {
        let (tx, _) = watch::channel(initial);
        let tx = Arc::new(tx);
        let demand = Arc::new(Notify::new());
        let task = tokio::spawn(drive(tx.clone(), demand.clone(), stop_timeout, upstream));
        Self { tx, demand, task }
    }

    /// Observe the state; the receiver starts at the latest value
    pub fn subscribe(&self) -> watch::Receiver<T> {
        let rx = self.tx.subscribe();
        self.demand.notify_one();
        rx
    }

    /// Latest value, whether or not anyone is subscribed
    pub fn value(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T> Drop for SharedState<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive<T, F>(tx: Arc<watch::Sender<T>>, demand: Arc<Notify>, stop_timeout: Duration, upstream: F)
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> QueryStream<T> + Send + 'static,
{
    loop {
        while tx.receiver_count() == 0 {
            demand.notified().await;
        }

        let mut stream = upstream();
        log::debug!("Shared state upstream started");

        'active: loop {
            tokio::select! {
                next = stream.next() => match next {
                    Some(Ok(value)) => {
                        tx.send_replace(value);
                    }
                    Some(Err(e)) => log::warn!("Skipping failed state update: {}", e),
                    None => {
                        log::debug!("Shared state upstream finished");
                        return;
                    }
                },
                _ = tx.closed() => {
                    tokio::select! {
                        _ = tokio::time::sleep(stop_timeout) => break 'active,
                        _ = demand.notified() => {}
                    }
                }
            }
        }

        drop(stream);
        log::debug!("Shared state upstream stopped after {:?} without subscribers", stop_timeout);
    }
}
