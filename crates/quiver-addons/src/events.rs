use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiver_core::types::{AddonDescriptor, AddonState};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Addon lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AddonEvent {
    /// An addon was installed (possibly degraded)
    Install { descriptor: AddonDescriptor },

    /// An addon directory was removed
    Uninstall { name: String },
}

impl AddonEvent {
    /// Dotted event name observers subscribe to
    pub fn name(&self) -> &'static str {
        match self {
            AddonEvent::Install { .. } => "addons.install",
            AddonEvent::Uninstall { .. } => "addons.uninstall",
        }
    }
}

/// Event metadata envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID (UUID v4)
    pub event_id: String,

    /// Event timestamp (UTC)
    pub timestamp: DateTime<Utc>,

    /// Addon name (for indexing)
    pub addon_name: String,

    /// State before event
    pub state_before: Option<AddonState>,

    /// State after event
    pub state_after: AddonState,

    /// The actual event payload
    pub event: AddonEvent,
}

impl EventEnvelope {
    pub fn new(
        addon_name: String,
        state_before: Option<AddonState>,
        state_after: AddonState,
        event: AddonEvent,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            addon_name,
            state_before,
            state_after,
            event,
        }
    }

    pub fn install(descriptor: AddonDescriptor, state_after: AddonState) -> Self {
        Self::new(
            descriptor.name.clone(),
            Some(AddonState::Staged),
            state_after,
            AddonEvent::Install { descriptor },
        )
    }

    pub fn uninstall(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            name.clone(),
            Some(AddonState::Committed),
            AddonState::Removed,
            AddonEvent::Uninstall { name },
        )
    }

    /// Dotted event name
    pub fn name(&self) -> &'static str {
        self.event.name()
    }
}

/// Fire-and-forget event sink
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn emit(&self, envelope: EventEnvelope);
}

/// Publishes onto a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn emit(&self, envelope: EventEnvelope) {
        let name = envelope.name();
        // No subscribers is fine
        if self.sender.send(envelope).is_err() {
            debug!("No subscribers for {}", name);
        }
    }
}

/// Logs every event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

#[async_trait]
impl EventPublisher for TracingPublisher {
    async fn emit(&self, envelope: EventEnvelope) {
        info!(
            event_id = %envelope.event_id,
            "{} {}",
            envelope.name(),
            envelope.addon_name
        );
    }
}
