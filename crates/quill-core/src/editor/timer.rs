use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Holds at most one pending background task. Replacing or dropping the
/// slot aborts the task it held.
#[derive(Debug, Default)]
pub(crate) struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    /// Spawn `task` on the current runtime in place of the pending one.
    ///
    /// Outside a tokio runtime nothing is spawned, the pending task is
    /// cancelled and `false` is returned.
    pub(crate) fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(runtime) => {
                self.replace(runtime.spawn(task));
                true
            }
            Err(_) => {
                tracing::warn!("No tokio runtime, background task skipped");
                self.cancel();
                false
            }
        }
    }

    pub(crate) fn replace(&self, handle: JoinHandle<()>) {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    pub(crate) fn cancel(&self) {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_task(counter: Arc<AtomicUsize>, delay: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_aborts_previous() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slot = TaskSlot::default();

        slot.replace(counting_task(counter.clone(), Duration::from_secs(1)));
        slot.replace(counting_task(counter.clone(), Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_spawn_outside_runtime_is_skipped() {
        let slot = TaskSlot::default();

        assert!(!slot.spawn(async {}));
        assert!(!slot.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_replaces_pending_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slot = TaskSlot::default();

        for _ in 0..3 {
            let counter = counter.clone();
            assert!(slot.spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let slot = TaskSlot::default();
            slot.replace(counting_task(counter.clone(), Duration::from_secs(1)));
            assert!(slot.is_pending());
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
