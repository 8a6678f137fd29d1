//! Node classification and IR construction.
//!
//! [`classify`] recognizes which markup construct a concrete node is by its type
//! tag and child shape; [`IrBuilder`] dispatches on the result and assembles the
//! IR. Any shape outside the fixed vocabulary is a structural error.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{CompileError, SourceLocation};
use crate::ir::{Children, ElementIr, IrNode, PropValue};
use crate::runtime::Tag;
use crate::syntax::{NodeKind, SyntaxNode};

lazy_static! {
    /// ASCII whitespace other than the plain space character. Unicode spaces
    /// such as U+00A0 are text.
    static ref NON_SPACE_WHITESPACE: Regex = Regex::new(r"[\t\n\x0B\x0C\r]+").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE CLASSIFIER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub enum Construct<'n> {
    SelfClosingElement {
        name: &'n SyntaxNode,
        attributes: &'n [SyntaxNode],
    },
    ElementPair {
        name: &'n SyntaxNode,
        attributes: &'n [SyntaxNode],
        children: &'n [SyntaxNode],
        closing_name: &'n SyntaxNode,
    },
    Fragment {
        children: &'n [SyntaxNode],
    },
    Attribute {
        name: &'n SyntaxNode,
        value: Option<&'n SyntaxNode>,
    },
    SpreadAttribute {
        expression: &'n SyntaxNode,
    },
    Text(&'n SyntaxNode),
    CodeSplice {
        expression: &'n SyntaxNode,
    },
}

/// Why a node failed classification, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub offset: usize,
    pub detail: String,
}

fn mismatch(node: &SyntaxNode, detail: impl Into<String>) -> ShapeMismatch {
    ShapeMismatch {
        offset: node.start(),
        detail: detail.into(),
    }
}

fn is(node: &SyntaxNode, kind: NodeKind) -> bool {
    node.kind == kind
}

/// `[token, identifier, attr*, token]` as used by both tag forms.
fn tag_parts(node: &SyntaxNode) -> Result<(&SyntaxNode, &[SyntaxNode]), ShapeMismatch> {
    let parts = &node.children;
    if node.child_count() < 3
        || !is(&parts[0], NodeKind::Token)
        || !is(&parts[1], NodeKind::Identifier)
        || !is(&parts[parts.len() - 1], NodeKind::Token)
    {
        return Err(mismatch(node, format!("malformed `{}`", node.kind)));
    }
    Ok((&parts[1], &parts[2..parts.len() - 1]))
}

pub fn classify(node: &SyntaxNode) -> Result<Construct<'_>, ShapeMismatch> {
    let children = &node.children;
    match node.kind {
        NodeKind::Jsx => match children.as_slice() {
            [inner] if matches!(inner.kind, NodeKind::JsxElement | NodeKind::JsxFragment) => {
                classify(inner)
            }
            [inner] if inner.kind == NodeKind::Error => Err(mismatch(inner, "malformed markup")),
            _ => Err(mismatch(node, "`jsx` must wrap one element or fragment")),
        },
        NodeKind::JsxElement => match children.as_slice() {
            [tag] if is(tag, NodeKind::JsxSelfClosingElement) => {
                let (name, attributes) = tag_parts(tag)?;
                Ok(Construct::SelfClosingElement { name, attributes })
            }
            [opening, inner @ .., closing]
                if is(opening, NodeKind::JsxOpeningElement)
                    && is(closing, NodeKind::JsxClosingElement) =>
            {
                let (name, attributes) = tag_parts(opening)?;
                let closing_name = match closing.children.as_slice() {
                    [open, name, close]
                        if is(open, NodeKind::Token)
                            && is(name, NodeKind::Identifier)
                            && is(close, NodeKind::Token) =>
                    {
                        name
                    }
                    _ => return Err(mismatch(closing, "malformed `jsx_closing_element`")),
                };
                Ok(Construct::ElementPair {
                    name,
                    attributes,
                    children: inner,
                    closing_name,
                })
            }
            _ => Err(mismatch(node, "element is neither self-closing nor an opening/closing pair")),
        },
        NodeKind::JsxFragment => match children.as_slice() {
            [open, inner @ .., close] if is(open, NodeKind::Token) && is(close, NodeKind::Token) => {
                Ok(Construct::Fragment { children: inner })
            }
            _ => Err(mismatch(node, "malformed `jsx_fragment`")),
        },
        NodeKind::JsxAttribute => match children.as_slice() {
            [name] if is(name, NodeKind::Identifier) => Ok(Construct::Attribute { name, value: None }),
            [name, eq, value] if is(name, NodeKind::Identifier) && is(eq, NodeKind::Token) => {
                Ok(Construct::Attribute {
                    name,
                    value: Some(value),
                })
            }
            _ => Err(mismatch(node, "malformed `jsx_attribute`")),
        },
        NodeKind::JsxSpreadAttribute => match children.as_slice() {
            [_, _, expression, _] if is(expression, NodeKind::Expression) => {
                Ok(Construct::SpreadAttribute { expression })
            }
            _ => Err(mismatch(node, "malformed `jsx_spread_attribute`")),
        },
        NodeKind::JsxText => Ok(Construct::Text(node)),
        NodeKind::JsxCode => match children.as_slice() {
            [_, expression, _] if is(expression, NodeKind::Expression) => {
                Ok(Construct::CodeSplice { expression })
            }
            [_, _] => Err(mismatch(node, "empty code splice")),
            _ => Err(mismatch(node, "malformed `jsx_code`")),
        },
        NodeKind::Error => Err(mismatch(node, "malformed markup")),
        other => Err(mismatch(node, format!("unexpected `{}` node", other))),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IR BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct IrBuilder<'a> {
    source: &'a str,
    file: &'a str,
    check_closing_tags: bool,
}

impl<'a> IrBuilder<'a> {
    pub fn new(source: &'a str, file: &'a str) -> Self {
        Self {
            source,
            file,
            check_closing_tags: true,
        }
    }

    pub fn check_closing_tags(mut self, enabled: bool) -> Self {
        self.check_closing_tags = enabled;
        self
    }

    fn location(&self, offset: usize) -> SourceLocation {
        SourceLocation::from_offset(self.source, offset)
    }

    fn structure_error(&self, m: ShapeMismatch) -> CompileError {
        CompileError::SyntaxStructure {
            file: self.file.to_string(),
            location: self.location(m.offset),
            detail: m.detail,
        }
    }

    fn classify(&self, node: &'a SyntaxNode) -> Result<Construct<'a>, CompileError> {
        classify(node).map_err(|m| self.structure_error(m))
    }

    /// Entry point: a `jsx` node (or a bare element/fragment) to its IR.
    pub fn visit_jsx(&self, node: &'a SyntaxNode) -> Result<IrNode, CompileError> {
        match self.classify(node)? {
            Construct::SelfClosingElement { name, attributes } => {
                self.visit_self_closing_element(name, attributes)
            }
            Construct::ElementPair {
                name,
                attributes,
                children,
                closing_name,
            } => self.visit_element_pair(name, attributes, children, closing_name),
            Construct::Fragment { children } => self.visit_fragment(children),
            _ => Err(self.structure_error(mismatch(node, "expected an element or fragment"))),
        }
        .map(IrNode::Element)
    }

    fn visit_self_closing_element(
        &self,
        name: &'a SyntaxNode,
        attributes: &'a [SyntaxNode],
    ) -> Result<ElementIr, CompileError> {
        let mut element = ElementIr::new(Tag::Name(name.text(self.source).to_string()));
        self.element_attributes(attributes, &mut element)?;
        Ok(element)
    }

    fn visit_element_pair(
        &self,
        name: &'a SyntaxNode,
        attributes: &'a [SyntaxNode],
        children: &'a [SyntaxNode],
        closing_name: &'a SyntaxNode,
    ) -> Result<ElementIr, CompileError> {
        let opening = name.text(self.source);
        let closing = closing_name.text(self.source);
        if self.check_closing_tags && opening != closing {
            return Err(CompileError::TagMismatch {
                file: self.file.to_string(),
                location: self.location(closing_name.start()),
                opening: opening.to_string(),
                closing: closing.to_string(),
            });
        }

        let mut element = ElementIr::new(Tag::Name(opening.to_string()));
        self.element_attributes(attributes, &mut element)?;
        element.children = self.element_children(children)?;
        Ok(element)
    }

    fn visit_fragment(&self, children: &'a [SyntaxNode]) -> Result<ElementIr, CompileError> {
        let mut element = ElementIr::new(Tag::Fragment);
        element.children = self.element_children(children)?;
        Ok(element)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Attributes
    // ───────────────────────────────────────────────────────────────────────────

    fn element_attributes(
        &self,
        nodes: &'a [SyntaxNode],
        element: &mut ElementIr,
    ) -> Result<(), CompileError> {
        for node in nodes {
            match self.classify(node)? {
                Construct::Attribute { name, value } => {
                    let value = match value {
                        None => PropValue::BooleanTrue,
                        Some(v) => self.visit_attribute_value(v)?,
                    };
                    // Repeated names keep their first position, last value wins.
                    element
                        .props
                        .insert(name.text(self.source).to_string(), value);
                }
                Construct::SpreadAttribute { expression } => {
                    element
                        .spread_props
                        .push(expression.text(self.source).to_string());
                }
                _ => {
                    return Err(self.structure_error(mismatch(
                        node,
                        format!("`{}` is not an attribute", node.kind),
                    )))
                }
            }
        }
        Ok(())
    }

    fn visit_attribute_value(&self, node: &'a SyntaxNode) -> Result<PropValue, CompileError> {
        match node.kind {
            NodeKind::String => Ok(PropValue::StringLiteral(self.visit_string(node))),
            NodeKind::Interpolation => match node.children.as_slice() {
                [_, expression, _] if expression.kind == NodeKind::Expression => Ok(
                    PropValue::CodeSplice(expression.text(self.source).to_string()),
                ),
                _ => Err(self.structure_error(mismatch(node, "empty attribute interpolation"))),
            },
            other => Err(CompileError::UnsupportedAttribute {
                file: self.file.to_string(),
                location: self.location(node.start()),
                kind: other.to_string(),
            }),
        }
    }

    /// Quoted attribute text, without the quotes.
    fn visit_string(&self, node: &'a SyntaxNode) -> String {
        match node.children.as_slice() {
            [_, inner @ .., _] => inner.iter().map(|n| n.text(self.source)).collect(),
            _ => String::new(),
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Children
    // ───────────────────────────────────────────────────────────────────────────

    fn element_children(
        &self,
        nodes: &'a [SyntaxNode],
    ) -> Result<Option<Children>, CompileError> {
        let children = nodes
            .iter()
            .map(|node| self.visit_child(node))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Children::collapse(children))
    }

    fn visit_child(&self, node: &'a SyntaxNode) -> Result<IrNode, CompileError> {
        match self.classify(node)? {
            Construct::Text(text) => Ok(self.visit_text(text)),
            Construct::CodeSplice { expression } => {
                Ok(IrNode::CodeSplice(expression.text(self.source).to_string()))
            }
            Construct::SelfClosingElement { .. }
            | Construct::ElementPair { .. }
            | Construct::Fragment { .. } => self.visit_jsx(node),
            _ => Err(self.structure_error(mismatch(
                node,
                format!("`{}` is not a valid child", node.kind),
            ))),
        }
    }

    fn visit_text(&self, node: &'a SyntaxNode) -> IrNode {
        let raw = node.text(self.source);
        IrNode::StringLiteral(NON_SPACE_WHITESPACE.replace_all(raw, "").into_owned())
    }
}

/// Builds the IR of one markup node using default settings.
pub fn build_ir(node: &SyntaxNode, source: &str, file: &str) -> Result<IrNode, CompileError> {
    IrBuilder::new(source, file).visit_jsx(node)
}
