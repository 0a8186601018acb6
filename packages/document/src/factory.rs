//! Node factories.
//!
//! One constructor per node kind, each allocating a fresh identifier and
//! merging caller attributes over per-kind defaults. Factories are pure
//! apart from id allocation; repeated calls never share an identifier.

use crate::id_generator::new_id;
use crate::model::{AttrMap, EmailDocument, EmailNode, HeadAttributes, NodeKind};

/// Build an attribute map from literal pairs, keeping insertion order.
pub fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn merge_defaults(defaults: AttrMap, overrides: AttrMap) -> AttrMap {
    let mut merged = defaults;
    merged.extend(overrides);
    merged
}

fn container(kind: NodeKind, children: Vec<EmailNode>, attributes: AttrMap) -> EmailNode {
    EmailNode {
        id: new_id(),
        kind,
        attributes,
        children,
        html_content: None,
        condition: None,
    }
}

fn leaf(kind: NodeKind, attributes: AttrMap, html_content: Option<String>) -> EmailNode {
    EmailNode {
        id: new_id(),
        kind,
        attributes,
        children: Vec::new(),
        html_content,
        condition: None,
    }
}

pub fn create_body(children: Vec<EmailNode>, extra: AttrMap) -> EmailNode {
    container(NodeKind::Body, children, extra)
}

pub fn create_section(children: Vec<EmailNode>, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[("background-color", "#ffffff"), ("padding", "20px 0")]);
    container(NodeKind::Section, children, merge_defaults(defaults, extra))
}

pub fn create_column(children: Vec<EmailNode>) -> EmailNode {
    container(NodeKind::Column, children, AttrMap::new())
}

pub fn create_column_with(children: Vec<EmailNode>, extra: AttrMap) -> EmailNode {
    container(NodeKind::Column, children, extra)
}

pub fn create_wrapper(children: Vec<EmailNode>, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[("padding", "20px 0")]);
    container(NodeKind::Wrapper, children, merge_defaults(defaults, extra))
}

pub fn create_hero(children: Vec<EmailNode>, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[("mode", "fluid-height"), ("padding", "40px 25px")]);
    container(NodeKind::Hero, children, merge_defaults(defaults, extra))
}

pub fn create_social(children: Vec<EmailNode>, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[
        ("font-size", "13px"),
        ("icon-size", "20px"),
        ("mode", "horizontal"),
    ]);
    container(NodeKind::Social, children, merge_defaults(defaults, extra))
}

pub fn create_social_element(platform: &str, href: &str, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[("name", platform), ("href", href)]);
    leaf(
        NodeKind::SocialElement,
        merge_defaults(defaults, extra),
        None,
    )
}

pub fn create_text(html_content: &str, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[
        ("padding", "10px 25px"),
        ("font-size", "13px"),
        ("line-height", "1.5"),
    ]);
    leaf(
        NodeKind::Text,
        merge_defaults(defaults, extra),
        Some(html_content.to_string()),
    )
}

pub fn create_button(html_content: &str, extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[
        ("background-color", "#414141"),
        ("color", "#ffffff"),
        ("font-size", "13px"),
        ("border-radius", "3px"),
        ("padding", "10px 25px"),
    ]);
    leaf(
        NodeKind::Button,
        merge_defaults(defaults, extra),
        Some(html_content.to_string()),
    )
}

pub fn create_image(extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[("padding", "10px 25px")]);
    leaf(NodeKind::Image, merge_defaults(defaults, extra), None)
}

pub fn create_divider(extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[
        ("border-width", "1px"),
        ("border-color", "#cccccc"),
        ("padding", "10px 25px"),
    ]);
    leaf(NodeKind::Divider, merge_defaults(defaults, extra), None)
}

pub fn create_spacer(extra: AttrMap) -> EmailNode {
    let defaults = attrs(&[("height", "20px")]);
    leaf(NodeKind::Spacer, merge_defaults(defaults, extra), None)
}

/// A blank starting document: one section, one column, one placeholder
/// text block.
pub fn create_default_document() -> EmailDocument {
    EmailDocument {
        version: 1,
        head_attributes: HeadAttributes::default(),
        body: create_body(
            vec![create_section(
                vec![create_column(vec![create_text(
                    r#"<p style="margin: 0; text-align: center;">Start building your email here.</p>"#,
                    attrs(&[("align", "center"), ("font-size", "14px"), ("color", "#999999")]),
                )])],
                AttrMap::new(),
            )],
            AttrMap::new(),
        ),
    }
}
