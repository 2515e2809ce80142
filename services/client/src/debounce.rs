//! Keyed debouncing
//!
//! A scheduled task runs once its key has been quiet for the configured
//! delay. Scheduling the same key again aborts the pending task, so only the
//! last of a burst of edits triggers a fetch.

use crate::error::{ClientError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

struct Pending {
    id: u64,
    handle: JoinHandle<()>,
}

/// Cancellable delayed tasks keyed by `K`
pub struct Debouncer<K> {
    delay: Duration,
    pending: Arc<Mutex<HashMap<K, Pending>>>,
    next_id: AtomicU64,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + std::fmt::Debug + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period, replacing any pending task for `key`
    pub fn schedule<F>(&self, key: K, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let delay = self.delay;
        let pending = Arc::clone(&self.pending);
        let task_key = key.clone();

        // Hold the lock across spawn so the task cannot finish before it is registered
        let mut guard = self.pending.lock();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut map = pending.lock();
                if map.get(&task_key).is_some_and(|p| p.id == id) {
                    map.remove(&task_key);
                }
            }
            trace!("Debounced task {:?} firing", task_key);
            task.await;
        });

        if let Some(previous) = guard.insert(key.clone(), Pending { id, handle }) {
            debug!("Superseding pending task for {:?}", key);
            previous.handle.abort();
        }
        Ok(())
    }

    /// Abort the pending task for `key`, returning whether one existed
    pub fn cancel(&self, key: &K) -> bool {
        match self.pending.lock().remove(key) {
            Some(previous) => {
                previous.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, previous) in self.pending.lock().drain() {
            previous.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.lock().contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for (_, previous) in self.pending.lock().drain() {
            previous.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_of_burst_runs() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let runs = Arc::new(Mutex::new(Vec::new()));

        for value in 1..=3 {
            let runs = Arc::clone(&runs);
            debouncer
                .schedule("amount", async move { runs.lock().push(value) })
                .unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        assert!(runs.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(*runs.lock(), vec![3]);
        assert!(!debouncer.is_pending(&"amount"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_full_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        debouncer
            .schedule(1u8, async move {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent_and_cancellable() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let count = Arc::new(AtomicUsize::new(0));
        for key in ["a", "b", "c"] {
            let c = Arc::clone(&count);
            debouncer
                .schedule(key, async move {
                    c.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        assert_eq!(debouncer.pending_count(), 3);
        assert!(debouncer.cancel(&"b"));
        assert!(!debouncer.cancel(&"b"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(100));
            let c = Arc::clone(&count);
            debouncer
                .schedule((), async move {
                    c.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_schedule_without_runtime() {
        let debouncer = Debouncer::new(Duration::from_millis(1));
        assert!(matches!(
            debouncer.schedule(0u8, async {}),
            Err(ClientError::NoRuntime)
        ));
    }
}
