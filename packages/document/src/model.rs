//! Typed email document model.
//!
//! The tree is a plain owned structure: containers exclusively own their
//! children, there are no back-pointers, and "find parent" is a search
//! (see `tree`). Node kinds partition into three behavioral classes and
//! both serializers dispatch on that partition exhaustively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque node identifier, unique for the lifetime of the process.
pub type NodeId = String;

/// Attribute map. Insertion order is kept so serialization is byte-stable.
pub type AttrMap = IndexMap<String, String>;

/// Marker identifying JSON envelopes produced by this editor.
pub const EDITOR_MARKER: &str = "mesagoo-email-editor";

/// Current persistence envelope version.
pub const DESIGN_VERSION: u32 = 1;

/// Class prefix injected into every serialized node for UI correlation.
pub const NODE_CLASS_PREFIX: &str = "ebb-node-";

/// Behavioral class of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// No children, no text content; attributes only.
    SelfClosing,
    /// A single opaque HTML payload, no children.
    Content,
    /// An ordered sequence of children, no text payload.
    Container,
}

/// Closed set of node kinds. Serde names double as markup tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "mj-body")]
    Body,
    #[serde(rename = "mj-section")]
    Section,
    #[serde(rename = "mj-column")]
    Column,
    #[serde(rename = "mj-text")]
    Text,
    #[serde(rename = "mj-image")]
    Image,
    #[serde(rename = "mj-button")]
    Button,
    #[serde(rename = "mj-divider")]
    Divider,
    #[serde(rename = "mj-spacer")]
    Spacer,
    #[serde(rename = "mj-social")]
    Social,
    #[serde(rename = "mj-social-element")]
    SocialElement,
    #[serde(rename = "mj-hero")]
    Hero,
    #[serde(rename = "mj-wrapper")]
    Wrapper,
}

impl NodeKind {
    /// Markup tag name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Body => "mj-body",
            NodeKind::Section => "mj-section",
            NodeKind::Column => "mj-column",
            NodeKind::Text => "mj-text",
            NodeKind::Image => "mj-image",
            NodeKind::Button => "mj-button",
            NodeKind::Divider => "mj-divider",
            NodeKind::Spacer => "mj-spacer",
            NodeKind::Social => "mj-social",
            NodeKind::SocialElement => "mj-social-element",
            NodeKind::Hero => "mj-hero",
            NodeKind::Wrapper => "mj-wrapper",
        }
    }

    /// Classify a markup tag name. `None` for tags outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "mj-body" => NodeKind::Body,
            "mj-section" => NodeKind::Section,
            "mj-column" => NodeKind::Column,
            "mj-text" => NodeKind::Text,
            "mj-image" => NodeKind::Image,
            "mj-button" => NodeKind::Button,
            "mj-divider" => NodeKind::Divider,
            "mj-spacer" => NodeKind::Spacer,
            "mj-social" => NodeKind::Social,
            "mj-social-element" => NodeKind::SocialElement,
            "mj-hero" => NodeKind::Hero,
            "mj-wrapper" => NodeKind::Wrapper,
            _ => return None,
        })
    }

    pub fn class(self) -> NodeClass {
        match self {
            NodeKind::Divider | NodeKind::Spacer | NodeKind::Image | NodeKind::SocialElement => {
                NodeClass::SelfClosing
            }
            NodeKind::Text | NodeKind::Button => NodeClass::Content,
            NodeKind::Body
            | NodeKind::Section
            | NodeKind::Column
            | NodeKind::Social
            | NodeKind::Hero
            | NodeKind::Wrapper => NodeClass::Container,
        }
    }
}

/// Conditional-inclusion operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Exists,
    NotExists,
}

impl ConditionOperator {
    /// Whether this operator compares against a value.
    pub fn takes_value(self) -> bool {
        !matches!(self, ConditionOperator::Exists | ConditionOperator::NotExists)
    }
}

/// Conditional-rendering rule attached to a node. When present, the whole
/// subtree is wrapped in comment directives at serialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub variable: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A single node in the email layout tree.
///
/// `kind` determines which payload is populated: containers use `children`,
/// content kinds use `html_content`, self-closing kinds use neither. The
/// model does not enforce parent/child kind compatibility beyond what
/// callers construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub attributes: AttrMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EmailNode>,
    #[serde(
        rename = "htmlContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub html_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionalRule>,
}

/// Registered web font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRef {
    pub name: String,
    pub href: String,
}

/// Head-level document attributes: per-tag default styles, fonts, preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadAttributes {
    #[serde(rename = "defaultStyles", default)]
    pub default_styles: IndexMap<String, AttrMap>,
    #[serde(default)]
    pub fonts: Vec<FontRef>,
    #[serde(rename = "previewText", default)]
    pub preview_text: String,
}

/// A complete email document: head attributes plus a single body tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDocument {
    pub version: u32,
    #[serde(rename = "headAttributes")]
    pub head_attributes: HeadAttributes,
    pub body: EmailNode,
}

/// Persistence envelope wrapping a document, tagged so native snapshots can
/// be told apart from foreign JSON shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDesignJson {
    #[serde(rename = "_editor")]
    pub editor: String,
    #[serde(rename = "_version")]
    pub version: u32,
    pub document: EmailDocument,
}

impl EmailDesignJson {
    /// Wrap a document in the current envelope.
    pub fn wrap(document: EmailDocument) -> Self {
        Self {
            editor: EDITOR_MARKER.to_string(),
            version: DESIGN_VERSION,
            document,
        }
    }
}

/// True when the JSON value is a native persisted snapshot (recognized by
/// the editor marker and an integer version).
pub fn is_native_design(value: &serde_json::Value) -> bool {
    value.get("_editor").and_then(|v| v.as_str()) == Some(EDITOR_MARKER)
        && value.get("_version").map(|v| v.is_u64()).unwrap_or(false)
        && value.get("document").is_some()
}
