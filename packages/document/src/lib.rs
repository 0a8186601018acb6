//! # ebb-document
//!
//! Document model and bidirectional serialization core for the email
//! editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: typed tree (EmailDocument/EmailNode) │
//! └─────────────────────────────────────────────┘
//!        ↑ factory / templates build it
//!        ↑ tree primitives mutate it
//!        ↓ serializer: document → markup
//!        ↑ parser: markup → document
//! ```
//!
//! The serializer and parser are inverses over every document the model
//! can produce: ids survive through `ebb-node-<id>` class markers,
//! conditional rules through `mj-raw` comment directives, and re-serializing
//! a parsed document yields byte-identical markup.

pub mod error;
pub mod factory;
pub mod id_generator;
pub mod model;
pub mod parser;
pub mod serializer;
pub mod templates;
pub mod tree;

pub use error::{ParseError, ParseResult};
pub use id_generator::new_id;
pub use model::{
    is_native_design, AttrMap, ConditionOperator, ConditionalRule, EmailDesignJson, EmailDocument,
    EmailNode, FontRef, HeadAttributes, NodeClass, NodeId, NodeKind, DESIGN_VERSION, EDITOR_MARKER,
    NODE_CLASS_PREFIX,
};
pub use parser::mjml_to_document;
pub use serializer::document_to_mjml;
