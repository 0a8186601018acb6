//! Model → markup serialization.
//!
//! `document_to_mjml` is total and deterministic: the same document always
//! yields byte-identical markup. Every emitted node carries an
//! `ebb-node-<id>` token in its `css-class` attribute so compiled HTML
//! fragments can be mapped back to model nodes, and conditional rules are
//! encoded as `mj-raw` comment directives the downstream compiler passes
//! through untouched.

use crate::model::{
    ConditionOperator, ConditionalRule, EmailDocument, EmailNode, HeadAttributes, NodeClass,
    NODE_CLASS_PREFIX,
};

/// Serialize a whole document to the markup dialect.
pub fn document_to_mjml(doc: &EmailDocument) -> String {
    let head = serialize_head(&doc.head_attributes);
    let body = serialize_node(&doc.body, 2);
    format!("<mjml>\n{head}\n{body}\n</mjml>")
}

fn serialize_head(head: &HeadAttributes) -> String {
    let mut parts: Vec<String> = vec!["  <mj-head>".to_string()];

    for font in &head.fonts {
        parts.push(format!(
            "    <mj-font name=\"{}\" href=\"{}\" />",
            escape_attr(&font.name),
            escape_attr(&font.href)
        ));
    }

    if !head.preview_text.is_empty() {
        parts.push(format!(
            "    <mj-preview>{}</mj-preview>",
            escape_text(&head.preview_text)
        ));
    }

    if !head.default_styles.is_empty() {
        parts.push("    <mj-attributes>".to_string());
        for (tag, styles) in &head.default_styles {
            let attr_str = styles
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_attr(v)))
                .collect::<Vec<_>>()
                .join(" ");
            parts.push(format!("      <{tag} {attr_str} />"));
        }
        parts.push("    </mj-attributes>".to_string());
    }

    parts.push("  </mj-head>".to_string());
    parts.join("\n")
}

fn serialize_node(node: &EmailNode, indent: usize) -> String {
    let pad = " ".repeat(indent);

    // A conditional rule wraps the node's whole output in a comment pair.
    if let Some(condition) = &node.condition {
        let inner = serialize_node_inner(node, indent);
        let directive = build_condition_directive(condition);
        return format!(
            "{pad}<mj-raw><!-- {directive} --></mj-raw>\n{inner}\n{pad}<mj-raw><!--[endif]--></mj-raw>"
        );
    }

    serialize_node_inner(node, indent)
}

fn build_condition_directive(condition: &ConditionalRule) -> String {
    let variable = &condition.variable;
    if !condition.operator.takes_value() {
        return match condition.operator {
            ConditionOperator::NotExists => format!("[if not {variable}]"),
            _ => format!("[if {variable}]"),
        };
    }
    let op = match condition.operator {
        ConditionOperator::Equals => "==",
        ConditionOperator::NotEquals => "!=",
        ConditionOperator::Contains => "contains",
        ConditionOperator::NotContains => "not_contains",
        ConditionOperator::Exists | ConditionOperator::NotExists => unreachable!(),
    };
    let value = condition.value.as_deref().unwrap_or("");
    format!("[if {variable} {op} \"{value}\"]")
}

fn serialize_node_inner(node: &EmailNode, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let tag = node.kind.tag();

    // Merge the node marker into css-class. An existing key keeps its
    // position; a fresh one is appended.
    let mut all_attrs = node.attributes.clone();
    let marker = format!("{NODE_CLASS_PREFIX}{}", node.id);
    let merged_class = match all_attrs.get("css-class") {
        Some(existing) if !existing.is_empty() => format!("{existing} {marker}"),
        _ => marker,
    };
    all_attrs.insert("css-class".to_string(), merged_class);

    let attr_str = all_attrs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_attr(v)))
        .collect::<Vec<_>>()
        .join(" ");
    let attr_str = if attr_str.is_empty() {
        String::new()
    } else {
        format!(" {attr_str}")
    };

    match node.kind.class() {
        NodeClass::SelfClosing => format!("{pad}<{tag}{attr_str} />"),
        NodeClass::Content => {
            // Raw passthrough: html_content is already markup.
            let content = node.html_content.as_deref().unwrap_or("");
            format!("{pad}<{tag}{attr_str}>\n{pad}  {content}\n{pad}</{tag}>")
        }
        NodeClass::Container => {
            if node.children.is_empty() {
                return format!("{pad}<{tag}{attr_str}></{tag}>");
            }
            let children = node
                .children
                .iter()
                .map(|c| serialize_node(c, indent + 2))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{pad}<{tag}{attr_str}>\n{children}\n{pad}</{tag}>")
        }
    }
}

pub(crate) fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{
        attrs, create_body, create_button, create_column, create_default_document, create_section,
        create_text,
    };
    use crate::model::{AttrMap, FontRef};

    #[test]
    fn default_document_serializes_with_markers() {
        let doc = create_default_document();
        let mjml = document_to_mjml(&doc);

        assert!(mjml.starts_with("<mjml>\n  <mj-head>"));
        assert!(mjml.ends_with("</mjml>"));
        let body_id = &doc.body.id;
        assert!(mjml.contains(&format!("css-class=\"ebb-node-{body_id}\"")));
        assert!(mjml.contains("<mj-section"));
        assert!(mjml.contains("<mj-column"));
        assert!(mjml.contains("<mj-text"));
    }

    #[test]
    fn marker_appends_to_existing_class() {
        let mut text = create_text("hi", AttrMap::new());
        text.attributes
            .insert("css-class".to_string(), "fancy".to_string());
        let id = text.id.clone();
        let out = serialize_node(&text, 0);
        assert!(out.contains(&format!("css-class=\"fancy ebb-node-{id}\"")));
    }

    #[test]
    fn head_block_lists_fonts_preview_and_default_styles() {
        let mut doc = create_default_document();
        doc.head_attributes.fonts.push(FontRef {
            name: "Inter".to_string(),
            href: "https://fonts.example/inter".to_string(),
        });
        doc.head_attributes.preview_text = "Hello & welcome".to_string();
        doc.head_attributes
            .default_styles
            .entry("mj-text".to_string())
            .or_default()
            .insert("color".to_string(), "#333333".to_string());

        let mjml = document_to_mjml(&doc);
        assert!(mjml.contains(
            "    <mj-font name=\"Inter\" href=\"https://fonts.example/inter\" />"
        ));
        assert!(mjml.contains("    <mj-preview>Hello &amp; welcome</mj-preview>"));
        assert!(mjml.contains("    <mj-attributes>"));
        assert!(mjml.contains("      <mj-text color=\"#333333\" />"));
    }

    #[test]
    fn empty_head_omits_optional_blocks() {
        let doc = create_default_document();
        let mjml = document_to_mjml(&doc);
        assert!(mjml.contains("  <mj-head>\n  </mj-head>"));
        assert!(!mjml.contains("mj-attributes"));
        assert!(!mjml.contains("mj-preview"));
    }

    #[test]
    fn attribute_values_are_escaped_content_is_not() {
        let text = create_text(
            "<p>a &amp; b</p>",
            attrs(&[("container-background-color", "\"x\" <y> & z")]),
        );
        let out = serialize_node(&text, 0);
        assert!(out.contains("container-background-color=\"&quot;x&quot; &lt;y&gt; &amp; z\""));
        assert!(out.contains("  <p>a &amp; b</p>"));
    }

    #[test]
    fn empty_attribute_values_are_skipped() {
        let mut text = create_text("hi", AttrMap::new());
        text.attributes.insert("align".to_string(), String::new());
        let out = serialize_node(&text, 0);
        assert!(!out.contains("align="));
    }

    #[test]
    fn empty_container_is_an_open_close_pair() {
        let column = create_column(vec![]);
        let out = serialize_node(&column, 4);
        let id = &column.id;
        assert_eq!(
            out,
            format!("    <mj-column css-class=\"ebb-node-{id}\"></mj-column>")
        );
    }

    #[test]
    fn condition_wraps_node_in_comment_directives() {
        let mut section = create_section(vec![create_column(vec![])], AttrMap::new());
        section.condition = Some(ConditionalRule {
            variable: "vip".to_string(),
            operator: ConditionOperator::Equals,
            value: Some("true".to_string()),
        });
        let out = serialize_node(&section, 4);

        assert!(out.starts_with("    <mj-raw><!-- [if vip == \"true\"] --></mj-raw>\n"));
        assert!(out.ends_with("    <mj-raw><!--[endif]--></mj-raw>"));
        let open = out.find("<!-- [if").unwrap();
        let section_pos = out.find("<mj-section").unwrap();
        let endif = out.find("<!--[endif]-->").unwrap();
        assert!(open < section_pos && section_pos < endif);
    }

    #[test]
    fn existence_operators_take_no_value() {
        let exists = build_condition_directive(&ConditionalRule {
            variable: "vip".to_string(),
            operator: ConditionOperator::Exists,
            value: None,
        });
        assert_eq!(exists, "[if vip]");

        let not_exists = build_condition_directive(&ConditionalRule {
            variable: "vip".to_string(),
            operator: ConditionOperator::NotExists,
            value: None,
        });
        assert_eq!(not_exists, "[if not vip]");

        let not_contains = build_condition_directive(&ConditionalRule {
            variable: "plan".to_string(),
            operator: ConditionOperator::NotContains,
            value: Some("pro".to_string()),
        });
        assert_eq!(not_contains, "[if plan not_contains \"pro\"]");
    }

    #[test]
    fn serialization_is_deterministic() {
        let doc = EmailDocument {
            version: 1,
            head_attributes: HeadAttributes::default(),
            body: create_body(
                vec![create_section(
                    vec![create_column(vec![create_button(
                        "Click me",
                        attrs(&[("align", "center")]),
                    )])],
                    AttrMap::new(),
                )],
                AttrMap::new(),
            ),
        };
        assert_eq!(document_to_mjml(&doc), document_to_mjml(&doc));
    }
}
