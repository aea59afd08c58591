use crate::transport::{RecordTransport, TransportError};
use rearc_model::FlatRecord;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

struct Inner {
    transport: Arc<dyn RecordTransport>,
    /// Latest encoded record awaiting autosave, if any.
    pending: Mutex<Option<FlatRecord>>,
    /// Serializes every submit, periodic and explicit alike.
    submit_lock: tokio::sync::Mutex<()>,
}

/// Background autosave for one protocol editing session.
///
/// The UI queues a freshly encoded record after each edit burst; the
/// timer submits the newest one per tick. A failed autosave is kept for
/// the next tick and logged, never surfaced. Explicit saves go through
/// [`Autosaver::save_now`], take the same submit lock, and report their
/// error to the caller with no automatic retry.
pub struct Autosaver {
    inner: Arc<Inner>,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    pub fn start(transport: Arc<dyn RecordTransport>, interval: Duration) -> Self {
        let inner = Arc::new(Inner {
            transport,
            pending: Mutex::new(None),
            submit_lock: tokio::sync::Mutex::new(()),
        });
        let (stop, mut stopped) = watch::channel(false);
        let task_inner = Arc::clone(&inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => tick(&task_inner).await,
                    _ = stopped.changed() => break,
                }
            }
        });
        Self { inner, stop, handle }
    }

    /// Hand the newest encoded record to the next autosave tick,
    /// replacing any not-yet-submitted predecessor.
    pub fn queue(&self, record: FlatRecord) {
        if let Ok(mut pending) = self.inner.pending.lock() {
            *pending = Some(record);
        }
    }

    /// Explicit user-triggered save. Supersedes anything queued for
    /// autosave and surfaces transport failures to the caller.
    pub async fn save_now(&self, record: FlatRecord) -> Result<(), TransportError> {
        let _guard = self.inner.submit_lock.lock().await;
        if let Ok(mut pending) = self.inner.pending.lock() {
            pending.take();
        }
        self.inner.transport.submit(&record).await
    }

    /// Stop scheduling. An in-flight submit finishes first; nothing new
    /// is issued afterwards.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

async fn tick(inner: &Inner) {
    let record = match inner.pending.lock() {
        Ok(mut pending) => pending.take(),
        Err(_) => None,
    };
    let Some(record) = record else {
        return;
    };
    let _guard = inner.submit_lock.lock().await;
    match inner.transport.submit(&record).await {
        Ok(()) => debug!("autosave submitted"),
        Err(error) => {
            warn!(%error, "autosave failed, retrying on next tick");
            // Keep the failed record unless a newer one arrived while
            // we were submitting.
            if let Ok(mut pending) = inner.pending.lock() {
                if pending.is_none() {
                    *pending = Some(record);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockTransport {
        submitted: AtomicUsize,
        failing: AtomicBool,
    }

    #[async_trait]
    impl RecordTransport for MockTransport {
        async fn submit(&self, _record: &FlatRecord) -> Result<(), TransportError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(TransportError::Unreachable("connection refused".into()))
            } else {
                self.submitted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    fn record() -> FlatRecord {
        [("record_id".to_string(), "1".to_string())]
            .into_iter()
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn queued_record_is_submitted_on_tick() {
        let transport = Arc::new(MockTransport::default());
        let saver = Autosaver::start(transport.clone(), Duration::from_secs(30));
        saver.queue(record());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(transport.submitted.load(Ordering::SeqCst), 1);

        // Nothing queued: the next tick submits nothing.
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(transport.submitted.load(Ordering::SeqCst), 1);
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_autosave_retries_on_next_tick() {
        let transport = Arc::new(MockTransport::default());
        transport.failing.store(true, Ordering::SeqCst);
        let saver = Autosaver::start(transport.clone(), Duration::from_secs(30));
        saver.queue(record());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(transport.submitted.load(Ordering::SeqCst), 0);

        transport.failing.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(transport.submitted.load(Ordering::SeqCst), 1);
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_save_surfaces_the_error() {
        let transport = Arc::new(MockTransport::default());
        transport.failing.store(true, Ordering::SeqCst);
        let saver = Autosaver::start(transport.clone(), Duration::from_secs(30));

        let result = saver.save_now(record()).await;
        assert!(matches!(result, Err(TransportError::Unreachable(_))));
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_scheduled_after_shutdown() {
        let transport = Arc::new(MockTransport::default());
        let saver = Autosaver::start(transport.clone(), Duration::from_secs(30));
        saver.queue(record());
        saver.shutdown().await;

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.submitted.load(Ordering::SeqCst), 0);
    }
}
