//! # Document Model
//!
//! Owns the live email document and exposes the mutation API. Every
//! mutation follows the same discipline:
//!
//! ```text
//! find target → (absent: return, no snapshot, no emission)
//!             → snapshot whole document for undo
//!             → mutate in place
//!             → emit node-level event where one is defined
//!             → schedule a debounced emission pass
//! ```
//!
//! Mutations never return errors; not-found and boundary conditions are
//! no-ops signalled by `bool`/`Option` returns.

use std::sync::Arc;
use std::time::Duration;

use ebb_document::factory::create_default_document;
use ebb_document::model::is_native_design;
use ebb_document::{
    mjml_to_document, ConditionalRule, EmailDesignJson, EmailDocument, EmailNode, NodeId,
};
use ebb_document::tree;

use crate::compiler::MjmlCompiler;
use crate::errors::{EditorError, EditorResult};
use crate::events::{EditorEvent, EventBus};
use crate::history::History;
use crate::pipeline::Emitter;

/// Live document plus history, events, and the optional emission pipeline.
///
/// Usable without a runtime when no compiler is attached; mutations then
/// simply skip the emission scheduling.
pub struct DocumentModel {
    doc: EmailDocument,
    history: History,
    bus: EventBus,
    emitter: Option<Emitter>,
}

impl DocumentModel {
    /// Model over the factory default document.
    pub fn new() -> Self {
        Self::with_document(create_default_document())
    }

    pub fn with_document(doc: EmailDocument) -> Self {
        Self {
            doc,
            history: History::new(),
            bus: EventBus::new(),
            emitter: None,
        }
    }

    /// Attach a compiler and start the emission pipeline. Requires a tokio
    /// runtime. Subsequent mutations schedule debounced emission passes.
    pub fn attach_compiler(&mut self, compiler: Arc<dyn MjmlCompiler>, debounce: Duration) {
        self.emitter = Some(Emitter::spawn(compiler, self.bus.clone(), debounce));
    }

    pub fn document(&self) -> &EmailDocument {
        &self.doc
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn emitter(&self) -> Option<&Emitter> {
        self.emitter.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn schedule_emit(&self) {
        if let Some(emitter) = &self.emitter {
            emitter.schedule(self.doc.clone());
        }
    }

    /// Run an emission pass immediately, bypassing the debounce window.
    pub async fn trigger_emit(&self) -> EditorResult<()> {
        match &self.emitter {
            Some(emitter) => emitter.flush(self.doc.clone()).await,
            None => Err(EditorError::PipelineUnavailable),
        }
    }

    /// Set `attributes[key] = value`; an empty value unsets the key (empty
    /// string is not a storable attribute value).
    pub fn update_node_attribute(&mut self, node_id: &str, key: &str, value: &str) -> bool {
        if tree::find_node(&self.doc.body, node_id).is_none() {
            return false;
        }
        self.history.commit(&self.doc);
        if let Some(node) = tree::find_node_mut(&mut self.doc.body, node_id) {
            if value.is_empty() {
                node.attributes.shift_remove(key);
            } else {
                node.attributes.insert(key.to_string(), value.to_string());
            }
        }
        self.bus.emit(EditorEvent::AttributeChanged {
            node_id: node_id.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        });
        self.schedule_emit();
        true
    }

    /// Set or clear the node's conditional-rendering rule.
    pub fn update_node_condition(
        &mut self,
        node_id: &str,
        condition: Option<ConditionalRule>,
    ) -> bool {
        if tree::find_node(&self.doc.body, node_id).is_none() {
            return false;
        }
        self.history.commit(&self.doc);
        if let Some(node) = tree::find_node_mut(&mut self.doc.body, node_id) {
            node.condition = condition;
        }
        self.schedule_emit();
        true
    }

    /// Replace a node's opaque HTML payload. Permissive about the node's
    /// kind; the serializer only reads the payload for content kinds.
    pub fn update_node_content(&mut self, node_id: &str, html_content: &str) -> bool {
        if tree::find_node(&self.doc.body, node_id).is_none() {
            return false;
        }
        self.history.commit(&self.doc);
        if let Some(node) = tree::find_node_mut(&mut self.doc.body, node_id) {
            node.html_content = Some(html_content.to_string());
        }
        self.schedule_emit();
        true
    }

    /// Set or delete a default-style entry for a tag. The per-tag map is
    /// created on first use; an empty value deletes the key.
    pub fn update_head_style(&mut self, tag: &str, key: &str, value: &str) {
        self.history.commit(&self.doc);
        let styles = self
            .doc
            .head_attributes
            .default_styles
            .entry(tag.to_string())
            .or_default();
        if value.is_empty() {
            styles.shift_remove(key);
        } else {
            styles.insert(key.to_string(), value.to_string());
        }
        self.schedule_emit();
    }

    pub fn update_preview_text(&mut self, text: &str) {
        self.history.commit(&self.doc);
        self.doc.head_attributes.preview_text = text.to_string();
        self.schedule_emit();
    }

    /// Insert under `parent_id` at `index`, clamped to the current length.
    pub fn insert_node(&mut self, parent_id: &str, index: usize, node: EmailNode) -> bool {
        if tree::find_node(&self.doc.body, parent_id).is_none() {
            return false;
        }
        self.history.commit(&self.doc);
        if let Some(parent) = tree::find_node_mut(&mut self.doc.body, parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, node);
        }
        self.schedule_emit();
        true
    }

    /// Insert a sequence immediately after a reference sibling.
    pub fn insert_nodes_after(&mut self, ref_node_id: &str, nodes: Vec<EmailNode>) -> bool {
        if tree::find_parent(&self.doc.body, ref_node_id).is_none() {
            return false;
        }
        self.history.commit(&self.doc);
        if let Some(parent) = tree::find_parent_mut(&mut self.doc.body, ref_node_id) {
            if let Some(position) = parent.children.iter().position(|c| c.id == ref_node_id) {
                for (offset, node) in nodes.into_iter().enumerate() {
                    parent.children.insert(position + 1 + offset, node);
                }
            }
        }
        self.schedule_emit();
        true
    }

    /// Remove a node. Removing the body root or a missing node is a no-op.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        if node_id == self.doc.body.id || tree::find_node(&self.doc.body, node_id).is_none() {
            return false;
        }
        self.history.commit(&self.doc);
        tree::remove_node(&mut self.doc.body, node_id);
        self.bus.emit(EditorEvent::NodeDeleted {
            node_id: node_id.to_string(),
        });
        self.schedule_emit();
        true
    }

    /// Re-parent a node, reporting the origin parent in the event. All
    /// failure modes of the underlying move (missing endpoints, cycles)
    /// are checked before the snapshot so no-ops leave history untouched.
    pub fn move_node_to(&mut self, node_id: &str, new_parent_id: &str, new_index: usize) -> bool {
        let Some(node) = tree::find_node(&self.doc.body, node_id) else {
            return false;
        };
        if node_id == self.doc.body.id {
            return false;
        }
        if tree::find_node(node, new_parent_id).is_some() {
            return false;
        }
        if tree::find_node(&self.doc.body, new_parent_id).is_none() {
            return false;
        }
        let from_parent_id = tree::find_parent(&self.doc.body, node_id)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| node_id.to_string());

        self.history.commit(&self.doc);
        let moved = tree::move_node(&mut self.doc.body, node_id, new_parent_id, new_index);
        if moved {
            self.bus.emit(EditorEvent::NodeMoved {
                node_id: node_id.to_string(),
                from_parent_id,
                to_parent_id: new_parent_id.to_string(),
            });
            self.schedule_emit();
        }
        moved
    }

    /// Swap with the previous sibling. `false` at the boundary or when the
    /// node/parent is missing; no snapshot is taken in that case.
    pub fn move_node_up(&mut self, node_id: &str) -> bool {
        self.swap_with_sibling(node_id, -1)
    }

    /// Swap with the next sibling. Same contract as [`move_node_up`](Self::move_node_up).
    pub fn move_node_down(&mut self, node_id: &str) -> bool {
        self.swap_with_sibling(node_id, 1)
    }

    fn swap_with_sibling(&mut self, node_id: &str, direction: isize) -> bool {
        let Some(parent) = tree::find_parent(&self.doc.body, node_id) else {
            return false;
        };
        let Some(position) = parent.children.iter().position(|c| c.id == node_id) else {
            return false;
        };
        let Some(target) = position.checked_add_signed(direction) else {
            return false;
        };
        if target >= parent.children.len() {
            return false;
        }
        let parent_id = parent.id.clone();

        self.history.commit(&self.doc);
        if let Some(parent) = tree::find_node_mut(&mut self.doc.body, &parent_id) {
            parent.children.swap(position, target);
        }
        self.bus.emit(EditorEvent::NodeMoved {
            node_id: node_id.to_string(),
            from_parent_id: parent_id.clone(),
            to_parent_id: parent_id,
        });
        self.schedule_emit();
        true
    }

    /// Clone a subtree with fresh identifiers and insert the clone right
    /// after the original. Returns the clone's root id.
    pub fn duplicate_node(&mut self, node_id: &str) -> Option<NodeId> {
        let parent = tree::find_parent(&self.doc.body, node_id)?;
        let position = parent.children.iter().position(|c| c.id == node_id)?;
        let parent_id = parent.id.clone();
        let clone = tree::clone_subtree(&parent.children[position]);
        let new_id = clone.id.clone();

        self.history.commit(&self.doc);
        if let Some(parent) = tree::find_node_mut(&mut self.doc.body, &parent_id) {
            parent.children.insert(position + 1, clone);
        }
        self.bus.emit(EditorEvent::NodeDuplicated {
            original_id: node_id.to_string(),
            new_id: new_id.clone(),
        });
        self.schedule_emit();
        Some(new_id)
    }

    /// Wholesale document swap, recorded in history like any mutation.
    pub fn replace_document(&mut self, new_doc: EmailDocument) {
        self.history.commit(&self.doc);
        self.doc = new_doc;
        self.schedule_emit();
    }

    pub fn undo(&mut self) -> bool {
        let applied = self.history.undo(&mut self.doc);
        if applied {
            self.schedule_emit();
        }
        applied
    }

    pub fn redo(&mut self) -> bool {
        let applied = self.history.redo(&mut self.doc);
        if applied {
            self.schedule_emit();
        }
        applied
    }

    /// Load persisted state, degrading gracefully: a native JSON envelope
    /// is adopted verbatim; otherwise (foreign shape, malformed envelope,
    /// or no JSON at all) the markup is parsed; otherwise the factory
    /// default. History is cleared; loading is not undoable.
    pub fn load_design(&mut self, mjml: &str, design_json: Option<&serde_json::Value>) {
        self.doc = resolve_design_input(mjml, design_json);
        self.history.clear();
        self.schedule_emit();
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_design_input(mjml: &str, design_json: Option<&serde_json::Value>) -> EmailDocument {
    if let Some(value) = design_json {
        if is_native_design(value) {
            match serde_json::from_value::<EmailDesignJson>(value.clone()) {
                Ok(design) => return design.document,
                Err(err) => {
                    tracing::warn!(error = %err, "malformed native design, falling back to markup");
                }
            }
        } else {
            tracing::warn!("foreign design JSON, falling back to markup");
        }
    }

    let trimmed = mjml.trim();
    if trimmed.is_empty() {
        return create_default_document();
    }
    match mjml_to_document(trimmed) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(error = %err, "unparseable markup, using default");
            create_default_document()
        }
    }
}
