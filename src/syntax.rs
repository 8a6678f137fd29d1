//! Concrete Syntax Tree for Markup Occurrences
//!
//! The tree handed to the classifier by a [`MarkupParser`]. Nodes carry a type tag
//! from a fixed vocabulary, a byte span into the source they were parsed from, and
//! their ordered children. The tree is read-only once built.

use std::ops::Range;

// ═══════════════════════════════════════════════════════════════════════════════
// NODE VOCABULARY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Jsx,
    JsxElement,
    JsxFragment,
    JsxSelfClosingElement,
    JsxOpeningElement,
    JsxClosingElement,
    JsxAttribute,
    JsxSpreadAttribute,
    JsxText,
    JsxCode,
    String,
    Interpolation,
    Identifier,
    Expression,
    StringContent,
    /// Anonymous punctuation token (`<`, `/>`, `{`, `=` ...).
    Token,
    Error,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::Jsx => "jsx",
            NodeKind::JsxElement => "jsx_element",
            NodeKind::JsxFragment => "jsx_fragment",
            NodeKind::JsxSelfClosingElement => "jsx_self_closing_element",
            NodeKind::JsxOpeningElement => "jsx_opening_element",
            NodeKind::JsxClosingElement => "jsx_closing_element",
            NodeKind::JsxAttribute => "jsx_attribute",
            NodeKind::JsxSpreadAttribute => "jsx_spread_attribute",
            NodeKind::JsxText => "jsx_text",
            NodeKind::JsxCode => "jsx_code",
            NodeKind::String => "string",
            NodeKind::Interpolation => "interpolation",
            NodeKind::Identifier => "identifier",
            NodeKind::Expression => "expression",
            NodeKind::StringContent => "string_content",
            NodeKind::Token => "token",
            NodeKind::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTAX NODE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Range<usize>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(kind: NodeKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn branch(kind: NodeKind, span: Range<usize>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            span,
            children,
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Pre-order search: the first node of `kind` at or below `self`.
    pub fn find_first(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        if self.kind == kind {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_first(kind))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The grammar collaborator: turns host source text into a tree whose root is a
/// `module` node. Implementations must be deterministic for a given input.
pub trait MarkupParser {
    fn parse(&self, source: &str) -> SyntaxNode;
}

/// Locator query: the leftmost, outermost markup occurrence, if any remain.
pub fn find_next_markup(root: &SyntaxNode) -> Option<&SyntaxNode> {
    root.find_first(NodeKind::Jsx)
}
