//! Domain event system: lets surfaces watch a turn without coupling to it.
//!
//! The agent publishes events as a turn progresses; the console subscribes to
//! show search activity while the user waits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The model produced a response inside the agent loop
    ResponseGenerated {
        conversation_id: String,
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool was invoked
    ToolExecuted {
        tool_name: String,
        input: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The loop used every allowed cycle without a final answer
    IterationLimitReached {
        conversation_id: String,
        iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// The fallback summarizer was asked to produce the answer
    FallbackInvoked {
        conversation_id: String,
        steps: usize,
        timestamp: DateTime<Utc>,
    },

    /// A user turn finished and the answer was recorded
    TurnCompleted {
        conversation_id: String,
        used_fallback: bool,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
