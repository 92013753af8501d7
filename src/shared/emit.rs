use tokio::sync::broadcast;
use tracing::trace;

use super::events::AppEvent;

/// Buffered events per subscriber before the slowest one starts lagging
const EVENT_CAPACITY: usize = 64;

/// Fan-out of orchestrator events to whatever is rendering them
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit an event to all subscribers
pub fn emit_event(bus: &EventBus, event: AppEvent) {
    // No subscribers is normal for headless use
    if let Err(e) = bus.tx.send(event) {
        trace!("Event dropped, no subscribers: {:?}", e.0);
    }
}
