//! Markup → model parsing.
//!
//! `mjml_to_document` is the inverse of the serializer over the documents
//! it produces, with tolerance for hand-authored markup in the same
//! dialect. The parser is a cursor over the source: the content kinds
//! carry raw HTML terminated only by their own closing tag, so tokenizing
//! up front is not an option.
//!
//! Node identifiers are recovered from `ebb-node-<id>` tokens in
//! `css-class` (and stripped back out, so repeated round trips do not
//! accumulate markers); nodes without a marker get a fresh id. Conditional
//! comment directives in `mj-raw` are folded back into a `ConditionalRule`
//! on the element they precede, and the comment pair is discarded.
//! Unrecognized attributes are preserved verbatim; unrecognized elements
//! are skipped with balanced scanning.

use crate::error::{ParseError, ParseResult};
use crate::factory::create_body;
use crate::id_generator::new_id;
use crate::model::{
    AttrMap, ConditionOperator, ConditionalRule, EmailDocument, EmailNode, FontRef,
    HeadAttributes, NodeClass, NodeId, NodeKind, NODE_CLASS_PREFIX,
};

/// Parse a markup string into a document.
pub fn mjml_to_document(source: &str) -> ParseResult<EmailDocument> {
    Parser::new(source).parse_document()
}

struct Parser<'src> {
    src: &'src str,
    pos: usize,
}

enum RawDirective {
    /// `<!-- [if …] -->` opening a conditional wrap.
    Open(ConditionalRule),
    /// `<!--[endif]-->` closing one.
    Close,
    /// Anything else inside `mj-raw`; dropped.
    Other,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self { src: source, pos: 0 }
    }

    fn parse_document(&mut self) -> ParseResult<EmailDocument> {
        self.skip_whitespace();
        self.expect("<")?;
        let root = self.read_name()?;
        if root != "mjml" {
            return Err(ParseError::unexpected_token(self.pos, "mjml", root));
        }
        self.parse_attributes()?;
        self.expect(">")?;

        let mut head = HeadAttributes::default();
        let mut body: Option<EmailNode> = None;
        let mut pending: Option<ConditionalRule> = None;

        loop {
            self.skip_whitespace();
            if self.eat("</mjml>") {
                break;
            }
            if self.is_at_end() {
                return Err(ParseError::unexpected_eof(self.pos));
            }
            if self.starts_with("<!--") {
                self.skip_comment()?;
                continue;
            }
            if self.starts_with("<") && !self.starts_with("</") {
                self.expect("<")?;
                let tag = self.read_name()?;
                match tag.as_str() {
                    "mj-head" => {
                        self.parse_attributes()?;
                        self.expect(">")?;
                        head = self.parse_head()?;
                    }
                    "mj-raw" => match self.parse_raw_directive()? {
                        RawDirective::Open(rule) => pending = Some(rule),
                        RawDirective::Close | RawDirective::Other => pending = None,
                    },
                    _ => {
                        if let Some(mut node) = self.parse_element_body(&tag)? {
                            if let Some(rule) = pending.take() {
                                node.condition = Some(rule);
                            }
                            if node.kind == NodeKind::Body && body.is_none() {
                                body = Some(node);
                            }
                        }
                    }
                }
                continue;
            }
            // Stray text or a dangling close tag between top-level blocks.
            self.skip_until_tag();
        }

        Ok(EmailDocument {
            version: 1,
            head_attributes: head,
            body: body.unwrap_or_else(|| create_body(Vec::new(), AttrMap::new())),
        })
    }

    // ─── Head ───

    fn parse_head(&mut self) -> ParseResult<HeadAttributes> {
        let mut head = HeadAttributes::default();
        loop {
            self.skip_whitespace();
            if self.eat("</mj-head>") {
                return Ok(head);
            }
            if self.is_at_end() {
                return Err(ParseError::unexpected_eof(self.pos));
            }
            if self.starts_with("<!--") {
                self.skip_comment()?;
                continue;
            }
            if !self.starts_with("<") || self.starts_with("</") {
                self.skip_until_tag();
                continue;
            }
            self.expect("<")?;
            let tag = self.read_name()?;
            match tag.as_str() {
                "mj-font" => {
                    let attrs = self.parse_attributes()?;
                    self.finish_empty_element(&tag)?;
                    head.fonts.push(FontRef {
                        name: attrs.get("name").cloned().unwrap_or_default(),
                        href: attrs.get("href").cloned().unwrap_or_default(),
                    });
                }
                "mj-preview" => {
                    self.parse_attributes()?;
                    if !self.eat("/>") {
                        self.expect(">")?;
                        let raw = self.read_until("</mj-preview>")?;
                        head.preview_text = unescape(raw.trim());
                    }
                }
                "mj-attributes" => {
                    self.parse_attributes()?;
                    if !self.eat("/>") {
                        self.expect(">")?;
                        loop {
                            self.skip_whitespace();
                            if self.eat("</mj-attributes>") {
                                break;
                            }
                            if self.is_at_end() {
                                return Err(ParseError::unexpected_eof(self.pos));
                            }
                            self.expect("<")?;
                            let style_tag = self.read_name()?;
                            let styles = self.parse_attributes()?;
                            self.finish_empty_element(&style_tag)?;
                            head.default_styles.insert(style_tag, styles);
                        }
                    }
                }
                _ => {
                    self.parse_attributes()?;
                    self.skip_unknown_element(&tag)?;
                }
            }
        }
    }

    // ─── Body tree ───

    /// Parse an element whose `<` and tag name have been consumed. Returns
    /// `None` for tags outside the closed kind set (skipped, balanced).
    fn parse_element_body(&mut self, tag: &str) -> ParseResult<Option<EmailNode>> {
        let mut attributes = self.parse_attributes()?;
        let Some(kind) = NodeKind::from_tag(tag) else {
            self.skip_unknown_element(tag)?;
            return Ok(None);
        };
        let id = extract_marker(&mut attributes);

        let mut children = Vec::new();
        let mut html_content = None;
        match kind.class() {
            NodeClass::SelfClosing => {
                self.finish_empty_element(tag)?;
            }
            NodeClass::Content => {
                if !self.eat("/>") {
                    self.expect(">")?;
                    let close = format!("</{tag}>");
                    let raw = self.read_until(&close)?;
                    html_content = Some(raw.trim().to_string());
                } else {
                    html_content = Some(String::new());
                }
            }
            NodeClass::Container => {
                if !self.eat("/>") {
                    self.expect(">")?;
                    children = self.parse_children(tag)?;
                    self.expect(&format!("</{tag}>"))?;
                }
            }
        }

        Ok(Some(EmailNode {
            id,
            kind,
            attributes,
            children,
            html_content,
            condition: None,
        }))
    }

    fn parse_children(&mut self, parent_tag: &str) -> ParseResult<Vec<EmailNode>> {
        let close = format!("</{parent_tag}>");
        let mut children = Vec::new();
        let mut pending: Option<ConditionalRule> = None;

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                return Err(ParseError::unexpected_eof(self.pos));
            }
            if self.starts_with(&close) {
                // Caller consumes the close tag.
                return Ok(children);
            }
            if self.starts_with("</") {
                return Err(ParseError::unexpected_token(
                    self.pos,
                    close,
                    self.peek_snippet(),
                ));
            }
            if self.starts_with("<!--") {
                self.skip_comment()?;
                continue;
            }
            if self.starts_with("<") {
                self.expect("<")?;
                let tag = self.read_name()?;
                if tag == "mj-raw" {
                    match self.parse_raw_directive()? {
                        RawDirective::Open(rule) => pending = Some(rule),
                        RawDirective::Close | RawDirective::Other => pending = None,
                    }
                    continue;
                }
                if let Some(mut node) = self.parse_element_body(&tag)? {
                    if let Some(rule) = pending.take() {
                        node.condition = Some(rule);
                    }
                    children.push(node);
                }
                continue;
            }
            // Loose text inside a container is not part of the model.
            self.skip_until_tag();
        }
    }

    /// `mj-raw` after its tag name: classify the wrapped comment.
    fn parse_raw_directive(&mut self) -> ParseResult<RawDirective> {
        self.parse_attributes()?;
        if self.eat("/>") {
            return Ok(RawDirective::Other);
        }
        self.expect(">")?;
        let inner = self.read_until("</mj-raw>")?.trim();
        let Some(comment) = inner
            .strip_prefix("<!--")
            .and_then(|s| s.strip_suffix("-->"))
        else {
            return Ok(RawDirective::Other);
        };
        let comment = comment.trim();
        if comment == "[endif]" {
            return Ok(RawDirective::Close);
        }
        if comment.starts_with("[if") {
            return parse_condition_directive(comment, self.pos).map(RawDirective::Open);
        }
        Ok(RawDirective::Other)
    }

    // ─── Low-level helpers ───

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    fn eat(&mut self, pat: &str) -> bool {
        if self.starts_with(pat) {
            self.pos += pat.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, pat: &str) -> ParseResult<()> {
        if self.eat(pat) {
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(self.pos))
        } else {
            Err(ParseError::unexpected_token(
                self.pos,
                pat,
                self.peek_snippet(),
            ))
        }
    }

    fn peek_snippet(&self) -> String {
        self.rest().chars().take(16).collect()
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn skip_until_tag(&mut self) {
        // Never stalls: callers only reach this off a non-'<' position.
        match self.rest().find('<') {
            Some(offset) if offset > 0 => self.pos += offset,
            Some(_) => self.pos += 1,
            None => self.pos = self.src.len(),
        }
    }

    fn read_name(&mut self) -> ParseResult<String> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(ParseError::unexpected_token(
                self.pos,
                "name",
                self.peek_snippet(),
            ));
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    /// Consume everything up to `pat`, returning the skipped slice and
    /// advancing past the pattern itself.
    fn read_until(&mut self, pat: &str) -> ParseResult<&'src str> {
        match self.rest().find(pat) {
            Some(offset) => {
                let slice = &self.src[self.pos..self.pos + offset];
                self.pos += offset + pat.len();
                Ok(slice)
            }
            None => Err(ParseError::unexpected_eof(self.src.len())),
        }
    }

    fn skip_comment(&mut self) -> ParseResult<()> {
        self.expect("<!--")?;
        self.read_until("-->")?;
        Ok(())
    }

    fn parse_attributes(&mut self) -> ParseResult<AttrMap> {
        let mut map = AttrMap::new();
        loop {
            self.skip_whitespace();
            match self.rest().chars().next() {
                None => return Err(ParseError::unexpected_eof(self.pos)),
                Some('>') | Some('/') => return Ok(map),
                Some(_) => {}
            }
            let name = self.read_name()?;
            self.skip_whitespace();
            if self.eat("=") {
                self.skip_whitespace();
                self.expect("\"")?;
                let raw = self.read_until("\"")?;
                map.insert(name, unescape(raw));
            } else {
                // Bare attribute; value-less, treated as unset.
                map.insert(name, String::new());
            }
        }
    }

    /// After attributes of an element that carries no payload: accept
    /// either `/>` or an immediate open/close pair.
    fn finish_empty_element(&mut self, tag: &str) -> ParseResult<()> {
        if self.eat("/>") {
            return Ok(());
        }
        self.expect(">")?;
        self.skip_whitespace();
        self.expect(&format!("</{tag}>"))
    }

    /// Skip an element outside the closed kind set, balancing nested
    /// occurrences of the same tag.
    fn skip_unknown_element(&mut self, tag: &str) -> ParseResult<()> {
        if self.eat("/>") {
            return Ok(());
        }
        self.expect(">")?;
        let open = format!("<{tag}");
        let close = format!("</{tag}>");
        let mut depth = 1usize;
        loop {
            let Some(offset) = self.rest().find('<') else {
                return Err(ParseError::unexpected_eof(self.src.len()));
            };
            self.pos += offset;
            if self.eat(&close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            } else if self.starts_with(&open)
                && matches!(
                    self.rest().as_bytes().get(open.len()),
                    Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'>') | Some(b'/')
                )
            {
                self.pos += open.len();
                let gt = self
                    .rest()
                    .find('>')
                    .ok_or_else(|| ParseError::unexpected_eof(self.src.len()))?;
                let self_closing = self.rest().as_bytes().get(gt.wrapping_sub(1)) == Some(&b'/');
                self.pos += gt + 1;
                if !self_closing {
                    depth += 1;
                }
            } else {
                self.pos += 1;
            }
        }
    }
}

/// Pull the `ebb-node-<id>` marker out of `css-class`, restoring the
/// attribute to its pre-serialization value (dropped entirely when the
/// marker was its only token). Falls back to a fresh id.
fn extract_marker(attributes: &mut AttrMap) -> NodeId {
    let Some(class) = attributes.get("css-class").cloned() else {
        return new_id();
    };
    let mut id: Option<NodeId> = None;
    let mut kept: Vec<&str> = Vec::new();
    for token in class.split_whitespace() {
        match token.strip_prefix(NODE_CLASS_PREFIX) {
            Some(rest) if !rest.is_empty() => {
                if id.is_none() {
                    id = Some(rest.to_string());
                }
            }
            _ => kept.push(token),
        }
    }
    if kept.is_empty() {
        attributes.shift_remove("css-class");
    } else if let Some(value) = attributes.get_mut("css-class") {
        *value = kept.join(" ");
    }
    id.unwrap_or_else(new_id)
}

/// Reverse the serializer's directive encoding: `[if var == "v"]` and
/// friends back into a `ConditionalRule`.
fn parse_condition_directive(text: &str, pos: usize) -> ParseResult<ConditionalRule> {
    let inner = text
        .strip_prefix("[if")
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| ParseError::invalid_markup(pos, "malformed conditional directive"))?
        .trim();

    if let Some(variable) = inner.strip_prefix("not ") {
        return Ok(ConditionalRule {
            variable: variable.trim().to_string(),
            operator: ConditionOperator::NotExists,
            value: None,
        });
    }

    let variable: String = inner
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    if variable.is_empty() {
        return Err(ParseError::invalid_markup(pos, "conditional without variable"));
    }
    let rest = inner[variable.len()..].trim();
    if rest.is_empty() {
        return Ok(ConditionalRule {
            variable,
            operator: ConditionOperator::Exists,
            value: None,
        });
    }

    let (operator, value_part) = if let Some(v) = rest.strip_prefix("==") {
        (ConditionOperator::Equals, v)
    } else if let Some(v) = rest.strip_prefix("!=") {
        (ConditionOperator::NotEquals, v)
    } else if let Some(v) = rest.strip_prefix("not_contains") {
        (ConditionOperator::NotContains, v)
    } else if let Some(v) = rest.strip_prefix("contains") {
        (ConditionOperator::Contains, v)
    } else {
        return Err(ParseError::invalid_markup(
            pos,
            format!("unknown conditional operator in {text:?}"),
        ));
    };

    let value = value_part
        .trim()
        .trim_start_matches('"')
        .trim_end_matches('"')
        .to_string();
    Ok(ConditionalRule {
        variable,
        operator,
        value: Some(value),
    })
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        if let Some(tail) = rest.strip_prefix("&amp;") {
            out.push('&');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("&quot;") {
            out.push('"');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("&lt;") {
            out.push('<');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("&gt;") {
            out.push('>');
            rest = tail;
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}
