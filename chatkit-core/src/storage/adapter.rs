//! Background writer for container persistence.
//!
//! Mutations must not wait on storage, so every storage operation is queued
//! to a dedicated thread that applies jobs strictly in submission order.
//! Reads go through the same queue and therefore observe all earlier writes.
//! Failures are logged and dropped here; nothing is reported to callers.

use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, oneshot};

use super::traits::KeyValueStore;

enum Job {
    Set {
        key: String,
        value: String,
    },
    Delete {
        key: String,
    },
    Load {
        key: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a background writer bound to one [`KeyValueStore`].
///
/// Cloning the handle shares the writer. The writer thread stops once every
/// handle has been dropped and the queue is drained.
#[derive(Clone)]
pub struct PersistenceAdapter {
    jobs: mpsc::UnboundedSender<Job>,
}

impl PersistenceAdapter {
    /// Starts a writer thread for `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (jobs, mut queue) = mpsc::unbounded_channel();
        let spawned = thread::Builder::new()
            .name("chatkit-persistence".to_string())
            .spawn(move || {
                while let Some(job) = queue.blocking_recv() {
                    apply(store.as_ref(), job);
                }
                log::debug!("persistence writer stopped");
            });
        if let Err(err) = spawned {
            log::error!("failed to start persistence writer, state will not be persisted: {err}");
        }
        Self { jobs }
    }

    /// Queues a write of `value` under `key`.
    pub fn set(&self, key: &str, value: String) {
        self.submit(Job::Set {
            key: key.to_string(),
            value,
        });
    }

    /// Queues a delete of `key`.
    pub fn delete(&self, key: &str) {
        self.submit(Job::Delete {
            key: key.to_string(),
        });
    }

    /// Queues a read of `key`.
    ///
    /// The receiver yields `None` when the key is absent, the read failed, or
    /// the writer is gone.
    #[must_use]
    pub fn load(&self, key: &str) -> oneshot::Receiver<Option<String>> {
        let (reply, value) = oneshot::channel();
        self.submit(Job::Load {
            key: key.to_string(),
            reply,
        });
        value
    }

    /// Blocks until every job queued before this call has been applied.
    ///
    /// Use [`Self::flush_async`] from async code.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn flush(&self) {
        // An error means the writer is gone and there is nothing left to wait for.
        let _ = self.flush_marker().blocking_recv();
    }

    /// Async variant of [`Self::flush`].
    pub async fn flush_async(&self) {
        let _ = self.flush_marker().await;
    }

    fn flush_marker(&self) -> oneshot::Receiver<()> {
        let (reply, done) = oneshot::channel();
        self.submit(Job::Flush { reply });
        done
    }

    fn submit(&self, job: Job) {
        if self.jobs.send(job).is_err() {
            log::warn!("persistence writer is not running, dropping storage job");
        }
    }
}

fn apply(store: &dyn KeyValueStore, job: Job) {
    match job {
        Job::Set { key, value } => {
            if let Err(err) = store.set(key.clone(), value) {
                log::warn!("failed to persist `{key}`: {err}");
            }
        }
        Job::Delete { key } => {
            if let Err(err) = store.delete(key.clone()) {
                log::warn!("failed to delete `{key}`: {err}");
            }
        }
        Job::Load { key, reply } => {
            let value = store.get(key.clone()).unwrap_or_else(|err| {
                log::warn!("failed to read `{key}`: {err}");
                None
            });
            // The caller may have stopped waiting.
            let _ = reply.send(value);
        }
        Job::Flush { reply } => {
            let _ = reply.send(());
        }
    }
}
