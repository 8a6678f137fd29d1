//! Codegen module for the pyx compiler
//!
//! Pretty-prints IR as Python source that rebuilds the runtime tree:
//!
//! ```text
//! Element("div", {"className": "a", "children": ["Hi ", name], **extra})
//! ```
//!
//! The printer is pure: an IR value plus [`CodegenRules`] in, text out.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ir::{Children, ElementIr, IrNode, PropValue};
use crate::runtime::{Tag, CHILDREN, FRAGMENT};

lazy_static! {
    /// Spread operands that need no parentheses after `**`.
    static ref SIMPLE_OPERAND_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// RULES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenRules {
    pub element_constructor: String,
    pub fragment_marker: String,
    pub spread_operator: String,
    pub true_literal: String,
}

impl Default for CodegenRules {
    fn default() -> Self {
        Self {
            element_constructor: "Element".to_string(),
            fragment_marker: FRAGMENT.to_string(),
            spread_operator: "**".to_string(),
            true_literal: "True".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRINTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Double-quoted literal; JSON escapes are valid Python escapes.
pub fn quote_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

pub struct Codegen<'r> {
    rules: &'r CodegenRules,
}

impl<'r> Codegen<'r> {
    pub fn new(rules: &'r CodegenRules) -> Self {
        Self { rules }
    }

    pub fn serialize(&self, node: &IrNode) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: &IrNode, out: &mut String) {
        match node {
            IrNode::StringLiteral(text) => out.push_str(&quote_string(text)),
            IrNode::CodeSplice(code) => out.push_str(code),
            IrNode::Element(element) => self.write_element(element, out),
        }
    }

    fn write_element(&self, element: &ElementIr, out: &mut String) {
        out.push_str(&self.rules.element_constructor);
        out.push('(');
        match &element.tag {
            Tag::Name(name) => out.push_str(&quote_string(name)),
            Tag::Fragment => out.push_str(&self.rules.fragment_marker),
        }
        out.push_str(", ");
        self.write_props(element, out);
        out.push(')');
    }

    /// Named props in declaration order, children (replacing a `children`
    /// attribute in place, else last), then spreads in source order.
    fn write_props(&self, element: &ElementIr, out: &mut String) {
        let mut entries: Vec<String> = Vec::with_capacity(element.props.len() + 1);
        let mut children_written = false;

        for (name, value) in &element.props {
            if name == CHILDREN {
                if let Some(children) = &element.children {
                    entries.push(self.entry(name, |out| self.write_children(children, out)));
                    children_written = true;
                    continue;
                }
            }
            entries.push(self.entry(name, |out| self.write_prop_value(value, out)));
        }

        if let (false, Some(children)) = (children_written, &element.children) {
            entries.push(self.entry(CHILDREN, |out| self.write_children(children, out)));
        }

        for spread in &element.spread_props {
            entries.push(self.spread(spread));
        }

        out.push('{');
        out.push_str(&entries.join(", "));
        out.push('}');
    }

    fn entry(&self, name: &str, write_value: impl FnOnce(&mut String)) -> String {
        let mut entry = quote_string(name);
        entry.push_str(": ");
        write_value(&mut entry);
        entry
    }

    fn spread(&self, expression: &str) -> String {
        if SIMPLE_OPERAND_RE.is_match(expression) {
            format!("{}{}", self.rules.spread_operator, expression)
        } else {
            format!("{}({})", self.rules.spread_operator, expression)
        }
    }

    fn write_prop_value(&self, value: &PropValue, out: &mut String) {
        match value {
            PropValue::BooleanTrue => out.push_str(&self.rules.true_literal),
            PropValue::StringLiteral(text) => out.push_str(&quote_string(text)),
            PropValue::CodeSplice(code) => out.push_str(code),
        }
    }

    fn write_children(&self, children: &Children, out: &mut String) {
        match children {
            Children::Single(node) => self.write_node(node, out),
            Children::Many(nodes) => {
                out.push('[');
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_node(node, out);
                }
                out.push(']');
            }
        }
    }
}

/// Serializes with the default Python rules.
pub fn serialize(node: &IrNode) -> String {
    Codegen::new(&CodegenRules::default()).serialize(node)
}
