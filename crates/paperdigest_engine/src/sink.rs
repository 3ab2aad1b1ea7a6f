use std::sync::mpsc;

use crate::EngineEvent;

/// Receives everything the engine publishes back to the controller.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        // The receiver is gone once the front-end shuts down; nothing to do then.
        let _ = self.tx.send(event);
    }
}
