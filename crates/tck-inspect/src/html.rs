//! HTML fragment location for form-content assertions.
//!
//! The HTML scenarios only need to answer two questions about a page: does
//! it contain a given element (say, `<input name="login">` at any depth),
//! and what does a fragment's text say once markup is stripped. That calls
//! for a small permissive parser producing a read-only element tree plus
//! two traversals — not a spec-grade HTML implementation. Tag and
//! attribute names are matched case-insensitively; unclosed tags are
//! closed at end of input; comments and doctypes are skipped.

/// One node in a parsed document: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with tag, attributes, and children.
    Element(Element),
    /// Character data, entity-decoded.
    Text(String),
}

/// A parsed HTML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name, lowercased.
    pub tag: String,
    /// Attributes in document order, names lowercased.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Returns the value of a named attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first search for the first element with the given tag whose
    /// named attribute's value contains `needle`. The receiver itself is
    /// a candidate. Returns `None` when no element matches at any depth.
    #[must_use]
    pub fn find(&self, tag: &str, attr: &str, needle: &str) -> Option<&Element> {
        if self.tag.eq_ignore_ascii_case(tag)
            && self.attr(attr).is_some_and(|v| v.contains(needle))
        {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(el) => el.find(tag, attr, needle),
            Node::Text(_) => None,
        })
    }

    /// Depth-first search for the first element with the given tag.
    #[must_use]
    pub fn find_tag(&self, tag: &str) -> Option<&Element> {
        if self.tag.eq_ignore_ascii_case(tag) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(el) => el.find_tag(tag),
            Node::Text(_) => None,
        })
    }

    /// Flattens the element's descendant text into one normalized string:
    /// own text and each child's flattened text in order, whitespace runs
    /// collapsed to single spaces, ends trimmed.
    #[must_use]
    pub fn flatten_text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Elements that never have content or a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Elements whose content is raw text until the matching close tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Parses one HTML document into an element tree.
///
/// The returned element is a synthetic `#document` root; real content
/// hangs beneath it. Parsing never fails: malformed input degrades to
/// text nodes or implicitly closed elements.
#[must_use]
pub fn parse_document(input: &str) -> Element {
    let mut stack: Vec<Element> = vec![Element {
        tag: "#document".to_string(),
        ..Element::default()
    }];
    let mut scanner = Scanner { input, pos: 0 };

    while !scanner.done() {
        match scanner.rest().find('<') {
            None => {
                push_text(&mut stack, scanner.rest());
                break;
            }
            Some(offset) => {
                if offset > 0 {
                    push_text(&mut stack, &scanner.rest()[..offset]);
                    scanner.bump(offset);
                }
                consume_markup(&mut scanner, &mut stack);
            }
        }
    }

    // Implicitly close anything left open.
    while stack.len() > 1 {
        let el = stack.pop().unwrap_or_default();
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Element(el));
        }
    }
    stack.pop().unwrap_or_default()
}

fn push_text(stack: &mut [Element], raw: &str) {
    if raw.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.children.push(Node::Text(decode_entities(raw)));
    }
}

/// Consumes one construct starting at `<`.
fn consume_markup(scanner: &mut Scanner<'_>, stack: &mut Vec<Element>) {
    let rest = scanner.rest();
    if rest.starts_with("<!--") {
        match rest.find("-->") {
            Some(end) => scanner.bump(end + 3),
            None => scanner.finish(),
        }
    } else if rest.starts_with("<!") || rest.starts_with("<?") {
        match rest.find('>') {
            Some(end) => scanner.bump(end + 1),
            None => scanner.finish(),
        }
    } else if rest.starts_with("</") {
        scanner.bump(2);
        let name = scanner.take_name();
        scanner.skip_past('>');
        close_element(stack, &name);
    } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
        scanner.bump(1);
        open_element(scanner, stack);
    } else {
        // A bare '<' that opens nothing; treat it as text.
        push_text(stack, "<");
        scanner.bump(1);
    }
}

/// Parses a start tag (name and attributes) and pushes or appends it.
fn open_element(scanner: &mut Scanner<'_>, stack: &mut Vec<Element>) {
    let tag = scanner.take_name();
    let mut element = Element {
        tag: tag.clone(),
        ..Element::default()
    };

    let mut self_closing = false;
    loop {
        scanner.skip_whitespace();
        let rest = scanner.rest();
        if rest.is_empty() {
            break;
        }
        if rest.starts_with("/>") {
            scanner.bump(2);
            self_closing = true;
            break;
        }
        if rest.starts_with('>') {
            scanner.bump(1);
            break;
        }
        if rest.starts_with('/') {
            scanner.bump(1);
            continue;
        }
        let name = scanner.take_attr_name();
        if name.is_empty() {
            scanner.bump_char();
            continue;
        }
        scanner.skip_whitespace();
        let value = if scanner.rest().starts_with('=') {
            scanner.bump(1);
            scanner.skip_whitespace();
            scanner.take_attr_value()
        } else {
            String::new()
        };
        element.attrs.push((name, value));
    }

    if self_closing || VOID_TAGS.contains(&tag.as_str()) {
        if let Some(top) = stack.last_mut() {
            top.children.push(Node::Element(element));
        }
    } else if RAW_TEXT_TAGS.contains(&tag.as_str()) {
        let raw = scanner.take_raw_text(&tag);
        if !raw.is_empty() {
            element.children.push(Node::Text(raw));
        }
        if let Some(top) = stack.last_mut() {
            top.children.push(Node::Element(element));
        }
    } else {
        stack.push(element);
    }
}

/// Closes the innermost open element with the given tag, appending every
/// element popped on the way. An unmatched close tag is ignored.
fn close_element(stack: &mut Vec<Element>, tag: &str) {
    let Some(depth) = stack
        .iter()
        .rposition(|el| el.tag.eq_ignore_ascii_case(tag))
    else {
        return;
    };
    if depth == 0 {
        // Never pop the synthetic root.
        return;
    }
    while stack.len() > depth {
        let el = stack.pop().unwrap_or_default();
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Element(el));
        }
    }
}

/// Decodes the handful of entities that matter for text assertions.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let Some(end) = rest.find(';').filter(|&e| e <= 12) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..end];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            "nbsp" => out.push(' '),
            _ => {
                let decoded = entity
                    .strip_prefix('#')
                    .and_then(|digits| digits.parse::<u32>().ok())
                    .and_then(char::from_u32);
                match decoded {
                    Some(c) => out.push(c),
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                        continue;
                    }
                }
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Cursor over the input string.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn bump(&mut self, n: usize) {
        self.pos += n;
    }

    fn bump_char(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn finish(&mut self) {
        self.pos = self.input.len();
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn skip_past(&mut self, c: char) {
        match self.rest().find(c) {
            Some(offset) => self.bump(offset + c.len_utf8()),
            None => self.finish(),
        }
    }

    /// Reads a tag name: ASCII alphanumerics and hyphens, lowercased.
    fn take_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '-')
            .unwrap_or(rest.len());
        let name = rest[..len].to_ascii_lowercase();
        self.bump(len);
        name
    }

    /// Reads an attribute name: anything up to whitespace, `=`, `>`, `/`.
    fn take_attr_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let name = rest[..len].to_ascii_lowercase();
        self.bump(len);
        name
    }

    /// Reads a quoted or unquoted attribute value.
    fn take_attr_value(&mut self) -> String {
        let rest = self.rest();
        let mut chars = rest.chars();
        match chars.next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                match body.find(quote) {
                    Some(end) => {
                        let value = decode_entities(&body[..end]);
                        self.bump(end + 2);
                        value
                    }
                    None => {
                        let value = decode_entities(body);
                        self.finish();
                        value
                    }
                }
            }
            _ => {
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                let value = decode_entities(&rest[..len]);
                self.bump(len);
                value
            }
        }
    }

    /// Consumes raw text up to `</tag`, then past the closing `>`.
    fn take_raw_text(&mut self, tag: &str) -> String {
        let close = format!("</{tag}");
        match find_ignore_ascii_case(self.rest(), &close) {
            Some(offset) => {
                let raw = self.rest()[..offset].to_string();
                self.bump(offset);
                self.skip_past('>');
                raw
            }
            None => {
                let raw = self.rest().to_string();
                self.finish();
                raw
            }
        }
    }
}

/// Byte-wise case-insensitive substring search for an ASCII needle.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
