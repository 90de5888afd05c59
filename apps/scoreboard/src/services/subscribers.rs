use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Change notification sent to every subscriber after a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StateChanged { version: u64 },
    StateReplaced { version: u64 },
    Reset { version: u64 },
}

impl SessionEvent {
    pub fn version(&self) -> u64 {
        match self {
            SessionEvent::StateChanged { version }
            | SessionEvent::StateReplaced { version }
            | SessionEvent::Reset { version } => *version,
        }
    }
}

/// Observers keyed by an opaque token handed out at subscribe time.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: DashMap<Uuid, mpsc::UnboundedSender<SessionEvent>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    pub fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<SessionEvent>) {
        let token = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(token, tx);
        (token, rx)
    }

    /// Returns whether the token was registered.
    pub fn unsubscribe(&self, token: Uuid) -> bool {
        self.subscribers.remove(&token).is_some()
    }

    /// Deliver to everyone; receivers that have been dropped are pruned.
    pub fn broadcast(&self, event: SessionEvent) {
        self.subscribers
            .retain(|_, tx| tx.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
