//! Renderer: resolves a runtime tree into HTML-like text.
//!
//! One-shot and stateless. Components are looked up in the [`Environment`]
//! passed to each call; errors they raise come back to the caller untouched.

use tracing::trace;

use crate::error::RenderError;
use crate::runtime::{Element, Props, Tag, Value, CHILDREN};
use crate::scope::{Binding, Environment};

/// Check if a tag name names a component (starts with an uppercase letter)
pub fn is_component_tag(tag_name: &str) -> bool {
    tag_name
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

pub fn render(value: &Value, env: &Environment) -> Result<String, RenderError> {
    let mut out = String::new();
    render_into(value, env, &mut out)?;
    Ok(out)
}

pub fn render_element(element: &Element, env: &Environment) -> Result<String, RenderError> {
    let mut out = String::new();
    render_element_into(element, env, &mut out)?;
    Ok(out)
}

fn render_into(value: &Value, env: &Environment, out: &mut String) -> Result<(), RenderError> {
    if let Some(element) = value.as_element() {
        return render_element_into(element, env, out);
    }
    match value {
        // Sequences flatten: each item rendered in order, no separator.
        Value::List(items) => {
            for item in items {
                render_into(item, env, out)?;
            }
            Ok(())
        }
        other => {
            out.push_str(&other.to_string());
            Ok(())
        }
    }
}

fn render_children(
    children: Option<&Value>,
    env: &Environment,
    out: &mut String,
) -> Result<(), RenderError> {
    match children {
        None | Some(Value::None) => Ok(()),
        Some(children) => render_into(children, env, out),
    }
}

fn render_element_into(
    element: &Element,
    env: &Environment,
    out: &mut String,
) -> Result<(), RenderError> {
    let name = match &element.tag {
        Tag::Fragment => return render_children(element.get_children(), env, out),
        Tag::Name(name) => name,
    };

    let binding = env.resolve(name);
    if let Some(Binding::Fragment) = binding {
        return render_children(element.get_children(), env, out);
    }

    if is_component_tag(name) {
        return match binding {
            Some(Binding::Component(component)) => {
                trace!(component = %name, "rendering component");
                let rendered = component(&element.props)?;
                render_into(&rendered, env, out)
            }
            _ => Err(RenderError::NameResolution { name: name.clone() }),
        };
    }

    let mut inner = String::new();
    render_children(element.get_children(), env, &mut inner)?;
    let attrs = render_attrs(&element.props);

    out.push('<');
    out.push_str(name);
    if !attrs.is_empty() {
        out.push(' ');
        out.push_str(&attrs);
    }

    if inner.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        out.push_str(&inner);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    Ok(())
}

/// `true` renders as a bare name, `false` is dropped, anything else is
/// `name="value"`. Space-joined in declaration order; `children` is skipped.
pub fn render_attrs(props: &Props) -> String {
    props
        .iter()
        .filter(|(name, _)| name.as_str() != CHILDREN)
        .filter_map(|(name, value)| match value {
            Value::Bool(true) => Some(name.clone()),
            Value::Bool(false) => None,
            other => Some(format!("{}=\"{}\"", name, other)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
