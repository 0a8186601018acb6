//! Editor event bus.
//!
//! Fire-and-forget notifications to the surrounding application. The core
//! never waits on listeners; sending with no receivers is fine.

use ebb_document::{EmailDesignJson, NodeId};
use tokio::sync::broadcast;

/// Events published by the document model and the emission pipeline.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// Fresh markup for the current document state.
    MjmlChanged { mjml: String },
    /// Fresh compiled HTML (only on successful compilation).
    HtmlChanged { html: String },
    /// Persistence-ready snapshot envelope.
    DesignJsonChanged { design: EmailDesignJson },
    /// Generic "the document changed" notification, once per emission pass.
    Changed,
    AttributeChanged {
        node_id: NodeId,
        key: String,
        value: String,
    },
    NodeDeleted {
        node_id: NodeId,
    },
    NodeMoved {
        node_id: NodeId,
        from_parent_id: NodeId,
        to_parent_id: NodeId,
    },
    NodeDuplicated {
        original_id: NodeId,
        new_id: NodeId,
    },
}

/// Broadcast fan-out for [`EditorEvent`].
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: EditorEvent) {
        // No receivers is not an error; notifications are best-effort.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
