//! Repository events
//!
//! A [`Repository`](super::Repository) emits exactly one event per refresh
//! cycle: [`RepositoryEvent::Refreshed`] when all three queries succeeded, or
//! [`RepositoryEvent::Error`] when one of them failed.
//!
//! Events reach two kinds of listeners:
//!
//! - callback observers, invoked synchronously on the task that owns the
//!   repository while it processes completions
//! - [`EventSubscription`]s, which receive a copy over a broadcast channel
//!   and may live on any task

use tokio::sync::broadcast;

/// Outcome of a refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryEvent {
    /// The visible lists were replaced with a fresh snapshot
    Refreshed,
    /// A query failed; the visible lists were left untouched
    Error {
        /// Process exit status, -1 when the process never ran or timed out
        exit_code: i32,
        /// Trimmed stderr of the failed query, or a description of the failure
        message: String,
    },
}

impl RepositoryEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, RepositoryEvent::Error { .. })
    }
}

/// Identifies a registered observer so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&RepositoryEvent) + Send + 'static>;

/// Receives events published after it was created
pub struct EventSubscription {
    receiver: broadcast::Receiver<RepositoryEvent>,
}

impl EventSubscription {
    /// Wait for the next event. Returns `None` once the repository is gone.
    pub async fn recv(&mut self) -> Option<RepositoryEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!("Repository event subscriber lagged by {} events", count);
                }
            }
        }
    }

    /// Next event if one is already waiting
    pub fn try_recv(&mut self) -> Option<RepositoryEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!("Repository event subscriber lagged by {} events", count);
                }
                Err(_) => return None,
            }
        }
    }
}

/// Fan-out of repository events to observers and subscriptions
pub struct EventBus {
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    sender: broadcast::Sender<RepositoryEvent>,
}

impl EventBus {
    /// Bus whose subscriptions buffer up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            observers: Vec::new(),
            next_observer: 0,
            sender,
        }
    }

    /// Register a callback; it runs for every later event
    pub fn observe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&RepositoryEvent) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every observer in registration order, then to
    /// subscriptions
    pub fn publish(&mut self, event: &RepositoryEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
        // No receivers is not an error
        let _ = self.sender.send(event.clone());
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
