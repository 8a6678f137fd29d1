//! Runtime values produced by compiled code and consumed by the renderer.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

pub const FRAGMENT: &str = "Fragment";
pub const CHILDREN: &str = "children";

/// Ordered element properties; declaration order is rendering order.
pub type Props = IndexMap<String, Value>;

// ═══════════════════════════════════════════════════════════════════════════════
// TAG
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    Name(String),
    /// Render children only, no wrapping tag.
    Fragment,
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Tag::Name(name) => name,
            Tag::Fragment => FRAGMENT,
        }
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::Name(name.to_string())
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::Name(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: Tag,
    pub props: Props,
}

impl Element {
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
        }
    }

    pub fn fragment() -> Self {
        Self {
            tag: Tag::Fragment,
            props: Props::new(),
        }
    }

    pub fn with_props(tag: impl Into<Tag>, props: Props) -> Self {
        Self {
            tag: tag.into(),
            props,
        }
    }

    pub fn prop(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }

    pub fn children(self, children: impl Into<Value>) -> Self {
        self.prop(CHILDREN, children)
    }

    pub fn get_children(&self) -> Option<&Value> {
        self.props.get(CHILDREN)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALUE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Props),
    Element(Box<Element>),
}

impl Value {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Python-style `repr`, used for items nested in lists and maps.
    fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write_repr(f)?;
                }
                f.write_str("]")
            }
            Value::Map(props) => {
                f.write_str("{")?;
                for (i, (key, value)) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{}': ", key)?;
                    value.write_repr(f)?;
                }
                f.write_str("}")
            }
            Value::Element(element) => write!(f, "Element({})", element.tag.name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Value::Element(Box::new(element))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Props> for Value {
    fn from(props: Props) -> Self {
        Value::Map(props)
    }
}
