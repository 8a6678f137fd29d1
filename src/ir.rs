//! Intermediate representation of one markup occurrence.
//!
//! Built by the visitor, printed by codegen, discarded once serialized.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EvalError;
use crate::runtime::{Element, Props, Tag, Value, CHILDREN};
use crate::scope::Scope;
use crate::static_eval;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum IrNode {
    /// Markup text with non-space whitespace already stripped.
    StringLiteral(String),
    /// Host-language source spliced verbatim.
    CodeSplice(String),
    Element(ElementIr),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum PropValue {
    BooleanTrue,
    StringLiteral(String),
    CodeSplice(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Children {
    Single(Box<IrNode>),
    Many(Vec<IrNode>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementIr {
    pub tag: Tag,
    pub props: IndexMap<String, PropValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
    /// Spread expressions, in source order. Always placed after named props.
    pub spread_props: Vec<String>,
}

impl ElementIr {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            props: IndexMap::new(),
            children: None,
            spread_props: Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHILDREN NORMALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

fn is_blank_text(node: &IrNode) -> bool {
    matches!(node, IrNode::StringLiteral(text) if text.trim().is_empty())
}

impl Children {
    /// Drops whitespace-only text, then: nothing left → `None`, exactly one →
    /// `Single`, otherwise `Many` in document order.
    pub fn collapse(nodes: Vec<IrNode>) -> Option<Children> {
        let mut kept: Vec<IrNode> = nodes.into_iter().filter(|n| !is_blank_text(n)).collect();
        match kept.len() {
            0 => None,
            1 => kept.pop().map(|only| Children::Single(Box::new(only))),
            _ => Some(Children::Many(kept)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INSTANTIATION
// ═══════════════════════════════════════════════════════════════════════════════

impl IrNode {
    /// Builds the runtime value that compiled code for this IR would produce,
    /// evaluating code splices against `scope`.
    pub fn instantiate(&self, scope: &Scope) -> Result<Value, EvalError> {
        match self {
            IrNode::StringLiteral(text) => Ok(Value::Str(text.clone())),
            IrNode::CodeSplice(code) => static_eval::evaluate(code, scope),
            IrNode::Element(element) => element.instantiate(scope).map(Value::from),
        }
    }
}

impl Children {
    fn instantiate(&self, scope: &Scope) -> Result<Value, EvalError> {
        match self {
            Children::Single(node) => node.instantiate(scope),
            Children::Many(nodes) => nodes
                .iter()
                .map(|n| n.instantiate(scope))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }
}

impl ElementIr {
    pub fn instantiate(&self, scope: &Scope) -> Result<Element, EvalError> {
        let mut props = Props::new();
        for (name, value) in &self.props {
            let value = match value {
                PropValue::BooleanTrue => Value::Bool(true),
                PropValue::StringLiteral(text) => Value::Str(text.clone()),
                PropValue::CodeSplice(code) => static_eval::evaluate(code, scope)?,
            };
            props.insert(name.clone(), value);
        }

        // Real children replace a `children` attribute in place.
        if let Some(children) = &self.children {
            props.insert(CHILDREN.to_string(), children.instantiate(scope)?);
        }

        for spread in &self.spread_props {
            match static_eval::evaluate(spread, scope)? {
                Value::Map(extra) => props.extend(extra),
                _ => return Err(EvalError::NotAMapping(spread.clone())),
            }
        }

        Ok(Element::with_props(self.tag.clone(), props))
    }
}
