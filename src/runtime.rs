//! Runtime for processing conversations
//!
//! Each conversation gets its own worker task, so events for one
//! (user, line) pair are handled strictly one after another while
//! different conversations proceed in parallel.

mod executor;
pub mod traits;


pub use executor::{Outcome, Processed, SessionLifecycle};
pub use traits::*;

use crate::state_machine::{Event, InboundEvent, SessionKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};

type Workers = Arc<RwLock<HashMap<SessionKey, WorkerHandle>>>;

/// Handle to a running conversation worker
#[derive(Clone)]
struct WorkerHandle {
    event_tx: mpsc::UnboundedSender<Event>,
    /// Events reserved or queued but not yet handled. Incremented under the
    /// registry read lock, so a worker holding the write lock that sees zero
    /// knows nobody is about to send to it.
    pending: Arc<AtomicUsize>,
}

/// Manager for all conversation workers
pub struct RuntimeManager {
    lifecycle: Arc<SessionLifecycle>,
    workers: Workers,
    completed_tx: broadcast::Sender<Processed>,
    idle_timeout: Duration,
}

impl RuntimeManager {
    pub fn new(lifecycle: SessionLifecycle, idle_timeout: Duration) -> Self {
        let (completed_tx, _) = broadcast::channel(256);
        Self {
            lifecycle: Arc::new(lifecycle),
            workers: Arc::new(RwLock::new(HashMap::new())),
            completed_tx,
            idle_timeout,
        }
    }

    /// Queue an event for its conversation. Returns as soon as the event is
    /// queued; the outcome is published to subscribers.
    pub async fn dispatch(&self, inbound: InboundEvent) {
        let InboundEvent { key, event } = inbound;

        let handle = self.reserve(key).await;
        let Err(mpsc::error::SendError(event)) = handle.event_tx.send(event) else {
            return;
        };

        // The worker died without deregistering; replace it once
        handle.pending.fetch_sub(1, Ordering::SeqCst);
        tracing::error!(user_id = %key.user_id, line_id = %key.line_id, "Conversation worker gone, restarting");
        {
            let mut workers = self.workers.write().await;
            if workers
                .get(&key)
                .is_some_and(|h| h.event_tx.same_channel(&handle.event_tx))
            {
                workers.remove(&key);
            }
        }

        let handle = self.reserve(key).await;
        if handle.event_tx.send(event).is_err() {
            handle.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::error!(user_id = %key.user_id, line_id = %key.line_id, "Dropping event, worker unavailable");
        }
    }

    /// Subscribe to completion records
    pub fn subscribe(&self) -> broadcast::Receiver<Processed> {
        self.completed_tx.subscribe()
    }

    pub fn lifecycle(&self) -> &SessionLifecycle {
        &self.lifecycle
    }

    /// Number of conversations with a live worker
    pub async fn active_workers(&self) -> usize {
        self.workers.read().await.len()
    }

    /// Get or start the worker for a conversation, reserving one pending slot
    async fn reserve(&self, key: SessionKey) -> WorkerHandle {
        {
            let workers = self.workers.read().await;
            if let Some(handle) = workers.get(&key) {
                handle.pending.fetch_add(1, Ordering::SeqCst);
                return handle.clone();
            }
        }

        let mut workers = self.workers.write().await;
        let handle = workers
            .entry(key)
            .or_insert_with(|| self.spawn_worker(key))
            .clone();
        handle.pending.fetch_add(1, Ordering::SeqCst);
        handle
    }

    fn spawn_worker(&self, key: SessionKey) -> WorkerHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker = Worker {
            key,
            event_rx,
            pending: pending.clone(),
            lifecycle: self.lifecycle.clone(),
            workers: self.workers.clone(),
            completed_tx: self.completed_tx.clone(),
            idle_timeout: self.idle_timeout,
        };
        tokio::spawn(worker.run());

        WorkerHandle { event_tx, pending }
    }
}

struct Worker {
    key: SessionKey,
    event_rx: mpsc::UnboundedReceiver<Event>,
    pending: Arc<AtomicUsize>,
    lifecycle: Arc<SessionLifecycle>,
    workers: Workers,
    completed_tx: broadcast::Sender<Processed>,
    idle_timeout: Duration,
}

impl Worker {
    async fn run(mut self) {
        let SessionKey { user_id, line_id } = self.key;
        tracing::debug!(%user_id, %line_id, "Conversation worker started");

        loop {
            match tokio::time::timeout(self.idle_timeout, self.event_rx.recv()).await {
                Ok(Some(event)) => {
                    let processed = self
                        .lifecycle
                        .handle(&InboundEvent::new(self.key, event))
                        .await;
                    self.pending.fetch_sub(1, Ordering::SeqCst);
                    report(&processed);
                    let _ = self.completed_tx.send(processed);
                }
                Ok(None) => break,
                Err(_) => {
                    let mut workers = self.workers.write().await;
                    if self.pending.load(Ordering::SeqCst) == 0 {
                        if workers
                            .get(&self.key)
                            .is_some_and(|h| Arc::ptr_eq(&h.pending, &self.pending))
                        {
                            workers.remove(&self.key);
                        }
                        break;
                    }
                }
            }
        }

        tracing::debug!(%user_id, %line_id, "Conversation worker stopped");
    }
}

fn report(processed: &Processed) {
    let SessionKey { user_id, line_id } = processed.key;
    match &processed.outcome {
        Outcome::Advanced => tracing::info!(
            %user_id,
            %line_id,
            from = %processed.previous_state,
            to = %processed.next_state,
            effect = processed.effect,
            "Event processed"
        ),
        Outcome::FellBack { reason } => tracing::warn!(
            %user_id,
            %line_id,
            from = %processed.previous_state,
            to = %processed.next_state,
            reason = %reason,
            "Event processed with fallback"
        ),
        Outcome::SaveFailed { reason } => tracing::error!(
            %user_id,
            %line_id,
            from = %processed.previous_state,
            reason = %reason,
            "Event processed but session not saved"
        ),
    }
}
