//! Parse Module for the pyx Compiler
//!
//! Built-in markup grammar. Scans Python source for markup occurrences in
//! expression position and produces the `jsx_*` concrete syntax tree consumed by
//! the classifier. Host code is not modelled beyond what is needed to find
//! occurrences: strings and comments are skipped, brackets are balanced, and
//! markup nested inside `{...}` splices is recorded under an `expression` node.

use lazy_static::lazy_static;
use std::collections::HashSet;
use std::ops::Range;
use tracing::debug;

use crate::syntax::{MarkupParser, NodeKind, SyntaxNode};

lazy_static! {
    /// Keywords after which `<` opens markup rather than comparing.
    static ref MARKUP_KEYWORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("return");
        s.insert("yield");
        s.insert("else");
        s.insert("and");
        s.insert("or");
        s.insert("not");
        s.insert("in");
        s.insert("if");
        s.insert("lambda");
        s.insert("await");
        s
    };

    static ref STRING_PREFIXES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for p in ["r", "u", "b", "f", "br", "rb", "fr", "rf"] {
            s.insert(p);
        }
        s
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanningParser;

impl ScanningParser {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupParser for ScanningParser {
    fn parse(&self, source: &str) -> SyntaxNode {
        let mut scanner = Scanner::new(source);
        // Module mode only stops at end of input.
        let occurrences = scanner.scan_host(HostMode::Module).unwrap_or_default();
        SyntaxNode::branch(NodeKind::Module, 0..source.len(), occurrences)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER STATE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostMode {
    Module,
    /// Inside `{...}`; stops before the matching `}`.
    Braced,
}

/// What the previous significant host token was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Open,
    Keyword,
    Operand,
}

impl Last {
    fn allows_markup(self) -> bool {
        !matches!(self, Last::Operand)
    }
}

#[derive(Debug)]
struct ScanFailure {
    offset: usize,
    message: &'static str,
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Significant host tokens of the last `{...}` scanned, without comments.
    host_span: Range<usize>,
}

/// Tag names take the same letters as host identifiers, so `<é/>` is markup.
fn is_tag_start(c: u8) -> bool {
    is_ident_start(c)
}

fn is_tag_continue(c: u8) -> bool {
    is_ident_continue(c) || matches!(c, b'-' | b'.' | b':')
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            host_span: 0..0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_ws(&mut self) {
        self.eat_while(|c| c.is_ascii_whitespace());
    }

    fn token(&mut self, len: usize) -> SyntaxNode {
        let node = SyntaxNode::leaf(NodeKind::Token, self.pos..self.pos + len);
        self.pos += len;
        node
    }

    fn fail(&self, message: &'static str) -> ScanFailure {
        ScanFailure {
            offset: self.pos,
            message,
        }
    }

    fn starts_markup(&self, at: usize) -> bool {
        match self.byte_at(at + 1) {
            Some(b'>') => true,
            Some(c) => is_tag_start(c),
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HOST CODE
    // ═══════════════════════════════════════════════════════════════════════════

    fn scan_host(&mut self, mode: HostMode) -> Result<Vec<SyntaxNode>, ScanFailure> {
        let start = self.pos;
        let mut occurrences = Vec::new();
        let mut depth = 0usize;
        let mut last = Last::Start;
        let mut first_token = None;
        let mut last_token_end = start;

        while let Some(c) = self.peek() {
            let token_start = self.pos;
            let significant = match c {
                b'\n' => {
                    if depth == 0 && mode == HostMode::Module {
                        last = Last::Start;
                    }
                    self.pos += 1;
                    false
                }
                c if c.is_ascii_whitespace() => {
                    self.pos += 1;
                    false
                }
                b'\\' => {
                    let continuation = self.byte_at(self.pos + 1) == Some(b'\n');
                    self.pos = (self.pos + 2).min(self.bytes.len());
                    !continuation
                }
                b'#' => {
                    self.eat_while(|c| c != b'\n');
                    false
                }
                b'\'' | b'"' => {
                    self.skip_host_string(mode)?;
                    last = Last::Operand;
                    true
                }
                c if is_ident_start(c) => {
                    let word_start = self.pos;
                    self.eat_while(is_ident_continue);
                    let word = self.src.get(word_start..self.pos).unwrap_or_default();
                    let quoted = matches!(self.peek(), Some(b'\'' | b'"'));
                    if quoted && STRING_PREFIXES.contains(word.to_ascii_lowercase().as_str()) {
                        self.skip_host_string(mode)?;
                        last = Last::Operand;
                    } else if MARKUP_KEYWORDS.contains(word) {
                        last = Last::Keyword;
                    } else {
                        last = Last::Operand;
                    }
                    true
                }
                c if c.is_ascii_digit() => {
                    self.eat_while(|c| c.is_ascii_alphanumeric() || c == b'.' || c == b'_');
                    last = Last::Operand;
                    true
                }
                b'(' | b'[' | b'{' => {
                    depth += 1;
                    self.pos += 1;
                    last = Last::Open;
                    true
                }
                b')' | b']' | b'}' => {
                    if c == b'}' && depth == 0 && mode == HostMode::Braced {
                        // Comments and whitespace before the `}` stay out of the span.
                        self.host_span = first_token.unwrap_or(start)..last_token_end;
                        return Ok(occurrences);
                    }
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                    last = Last::Operand;
                    true
                }
                b'<' if last.allows_markup() && self.starts_markup(self.pos) => {
                    occurrences.push(self.parse_occurrence());
                    last = Last::Operand;
                    true
                }
                b';' => {
                    self.pos += 1;
                    last = Last::Start;
                    true
                }
                _ => {
                    self.pos += 1;
                    last = Last::Open;
                    true
                }
            };
            if significant {
                first_token.get_or_insert(token_start);
                last_token_end = self.pos;
            }
        }

        match mode {
            HostMode::Module => Ok(occurrences),
            HostMode::Braced => Err(ScanFailure {
                offset: start,
                message: "unterminated `{`",
            }),
        }
    }

    /// Skips a Python string literal starting at the opening quote.
    fn skip_host_string(&mut self, mode: HostMode) -> Result<(), ScanFailure> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        let triple = [quote; 3];
        let is_triple = self.bytes[self.pos..].starts_with(&triple);
        self.pos += if is_triple { 3 } else { 1 };

        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
                continue;
            }
            if is_triple {
                if self.bytes[self.pos..].starts_with(&triple) {
                    self.pos += 3;
                    return Ok(());
                }
            } else if c == quote {
                self.pos += 1;
                return Ok(());
            } else if c == b'\n' {
                break;
            }
            self.pos += 1;
        }

        match mode {
            // Leave malformed host code to the host language.
            HostMode::Module => Ok(()),
            HostMode::Braced => Err(ScanFailure {
                offset: start,
                message: "unterminated string literal",
            }),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MARKUP
    // ═══════════════════════════════════════════════════════════════════════════

    /// One top-level `jsx` node. Malformed markup becomes a `jsx` node wrapping an
    /// `ERROR` node placed at the failure offset.
    fn parse_occurrence(&mut self) -> SyntaxNode {
        let start = self.pos;
        match self.parse_markup() {
            Ok(node) => SyntaxNode::branch(NodeKind::Jsx, start..node.end(), vec![node]),
            Err(failure) => {
                debug!(offset = failure.offset, "malformed markup: {}", failure.message);
                let offset = failure.offset.min(self.bytes.len());
                let mut end = (offset + 1).min(self.bytes.len()).max(start + 1);
                while !self.src.is_char_boundary(end) {
                    end += 1;
                }
                self.pos = end;
                let error = SyntaxNode::leaf(NodeKind::Error, offset..end);
                SyntaxNode::branch(NodeKind::Jsx, start..end, vec![error])
            }
        }
    }

    fn parse_markup(&mut self) -> Result<SyntaxNode, ScanFailure> {
        if self.byte_at(self.pos + 1) == Some(b'>') {
            return self.parse_fragment();
        }

        let start = self.pos;
        let mut parts = vec![self.token(1)];
        self.skip_ws();
        parts.push(self.tag_name()?);

        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'/') if self.byte_at(self.pos + 1) == Some(b'>') => {
                    parts.push(self.token(2));
                    let tag =
                        SyntaxNode::branch(NodeKind::JsxSelfClosingElement, start..self.pos, parts);
                    return Ok(SyntaxNode::branch(
                        NodeKind::JsxElement,
                        start..self.pos,
                        vec![tag],
                    ));
                }
                Some(b'>') => {
                    parts.push(self.token(1));
                    let opening =
                        SyntaxNode::branch(NodeKind::JsxOpeningElement, start..self.pos, parts);
                    let mut children = vec![opening];
                    children.extend(self.parse_children()?);
                    children.push(self.parse_closing_element()?);
                    return Ok(SyntaxNode::branch(
                        NodeKind::JsxElement,
                        start..self.pos,
                        children,
                    ));
                }
                Some(b'{') => parts.push(self.parse_spread_attribute()?),
                Some(c) if is_tag_start(c) => parts.push(self.parse_attribute()?),
                _ => return Err(self.fail("expected attribute, `>` or `/>`")),
            }
        }
    }

    fn parse_fragment(&mut self) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        let mut children = vec![self.token(2)];
        children.extend(self.parse_children()?);

        let close_start = self.pos;
        self.pos += 2;
        self.skip_ws();
        if self.peek() != Some(b'>') {
            return Err(self.fail("fragment must be closed by `</>`"));
        }
        self.pos += 1;
        children.push(SyntaxNode::leaf(NodeKind::Token, close_start..self.pos));

        Ok(SyntaxNode::branch(
            NodeKind::JsxFragment,
            start..self.pos,
            children,
        ))
    }

    /// Children up to (not including) the next `</`.
    fn parse_children(&mut self) -> Result<Vec<SyntaxNode>, ScanFailure> {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.fail("unterminated element")),
                Some(b'<') if self.byte_at(self.pos + 1) == Some(b'/') => return Ok(children),
                Some(b'<') if self.starts_markup(self.pos) => children.push(self.parse_markup()?),
                Some(b'<') => return Err(self.fail("`<` in text must open a tag")),
                Some(b'{') => children.push(self.parse_braced(NodeKind::JsxCode)?),
                Some(_) => {
                    let start = self.pos;
                    self.eat_while(|c| c != b'<' && c != b'{');
                    children.push(SyntaxNode::leaf(NodeKind::JsxText, start..self.pos));
                }
            }
        }
    }

    fn parse_closing_element(&mut self) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        let mut parts = vec![self.token(2)];
        self.skip_ws();
        parts.push(self.tag_name()?);
        self.skip_ws();
        if self.peek() != Some(b'>') {
            return Err(self.fail("expected `>` to end closing tag"));
        }
        parts.push(self.token(1));
        Ok(SyntaxNode::branch(
            NodeKind::JsxClosingElement,
            start..self.pos,
            parts,
        ))
    }

    fn tag_name(&mut self) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_tag_start(c) => {
                self.eat_while(is_tag_continue);
                Ok(SyntaxNode::leaf(NodeKind::Identifier, start..self.pos))
            }
            _ => Err(self.fail("expected a name")),
        }
    }

    /// `{expr}` as either a `jsx_code` child or an `interpolation` attribute value.
    fn parse_braced(&mut self, kind: NodeKind) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        let open = self.token(1);
        let nested = self.scan_host(HostMode::Braced)?;
        let expr_span = self.host_span.clone();
        let close = self.token(1);

        let children = if expr_span.is_empty() {
            vec![open, close]
        } else {
            let expression = SyntaxNode::branch(NodeKind::Expression, expr_span, nested);
            vec![open, expression, close]
        };
        Ok(SyntaxNode::branch(kind, start..self.pos, children))
    }

    fn parse_spread_attribute(&mut self) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        let open = self.token(1);
        self.skip_ws();
        let marker = if self.starts_with("...") {
            self.token(3)
        } else if self.starts_with("**") {
            self.token(2)
        } else {
            return Err(self.fail("expected `...` or `**` in spread attribute"));
        };

        let nested = self.scan_host(HostMode::Braced)?;
        let expr_span = self.host_span.clone();
        if expr_span.is_empty() {
            return Err(self.fail("spread attribute needs an expression"));
        }
        let expression = SyntaxNode::branch(NodeKind::Expression, expr_span, nested);
        let close = self.token(1);

        Ok(SyntaxNode::branch(
            NodeKind::JsxSpreadAttribute,
            start..self.pos,
            vec![open, marker, expression, close],
        ))
    }

    fn parse_attribute(&mut self) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        let name = self.tag_name()?;

        let after_name = self.pos;
        self.skip_ws();
        if self.peek() != Some(b'=') {
            self.pos = after_name;
            return Ok(SyntaxNode::branch(
                NodeKind::JsxAttribute,
                start..after_name,
                vec![name],
            ));
        }

        let equals = self.token(1);
        self.skip_ws();
        let value = match self.peek() {
            Some(b'"' | b'\'') => self.parse_string()?,
            Some(b'{') => self.parse_braced(NodeKind::Interpolation)?,
            Some(b'<') if self.starts_markup(self.pos) => self.parse_markup()?,
            Some(c) if is_tag_continue(c) => {
                let value_start = self.pos;
                self.eat_while(is_tag_continue);
                SyntaxNode::leaf(NodeKind::Identifier, value_start..self.pos)
            }
            _ => return Err(self.fail("expected attribute value")),
        };

        Ok(SyntaxNode::branch(
            NodeKind::JsxAttribute,
            start..self.pos,
            vec![name, equals, value],
        ))
    }

    fn parse_string(&mut self) -> Result<SyntaxNode, ScanFailure> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        let mut children = vec![self.token(1)];

        let content_start = self.pos;
        self.eat_while(|c| c != quote);
        if self.peek().is_none() {
            return Err(ScanFailure {
                offset: start,
                message: "unterminated attribute string",
            });
        }
        if self.pos > content_start {
            children.push(SyntaxNode::leaf(
                NodeKind::StringContent,
                content_start..self.pos,
            ));
        }
        children.push(self.token(1));

        Ok(SyntaxNode::branch(NodeKind::String, start..self.pos, children))
    }
}
