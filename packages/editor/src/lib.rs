//! # ebb-editor
//!
//! Live document model for the email editor: mutation API, snapshot
//! undo/redo, and the debounced emission pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: DocumentModel + mutation API      │
//! │  - snapshot-for-undo around every mutation  │
//! │  - silent no-ops on missing targets         │
//! └─────────────────────────────────────────────┘
//!                     ↓ schedule
//! ┌─────────────────────────────────────────────┐
//! │ pipeline: debounced emission task           │
//! │  - serialize → compile → snapshot → events  │
//! └─────────────────────────────────────────────┘
//!                     ↓ broadcast
//! ┌─────────────────────────────────────────────┐
//! │ events: EditorEvent fan-out                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Compilation to final HTML is delegated through the [`MjmlCompiler`]
//! trait; the core never blocks on it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ebb_editor::{DocumentModel, pipeline::DEFAULT_DEBOUNCE};
//!
//! let mut model = DocumentModel::new();
//! model.attach_compiler(compiler, DEFAULT_DEBOUNCE);
//!
//! let body_id = model.document().body.id.clone();
//! model.insert_node(&body_id, 0, ebb_document::factory::create_section(vec![], Default::default()));
//! model.undo();
//! ```

pub mod compiler;
pub mod document;
pub mod errors;
pub mod events;
pub mod history;
pub mod pipeline;

pub use compiler::{CompileError, CompiledEmail, MjmlCompiler};
pub use document::DocumentModel;
pub use errors::{EditorError, EditorResult};
pub use events::{EditorEvent, EventBus};
pub use history::History;
pub use pipeline::{Emitter, DEFAULT_DEBOUNCE};

// Re-export the model types callers hold when mutating.
pub use ebb_document::{ConditionalRule, EmailDesignJson, EmailDocument, EmailNode, NodeId};
