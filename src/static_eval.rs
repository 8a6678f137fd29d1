//! Static Expression Evaluator for the pyx Compiler
//!
//! Reads the subset of Python that codegen emits back into runtime values:
//! `Element(tag, {...})` calls, dict and list displays, `**spread` entries,
//! string/number/`True`/`False`/`None` literals and bare names looked up in a
//! [`Scope`]. Anything else is rejected rather than guessed at.

use crate::error::EvalError;
use crate::runtime::{Element, Props, Tag, Value, FRAGMENT};
use crate::scope::Scope;

const ELEMENT_CONSTRUCTOR: &str = "Element";

/// Evaluates one expression. Trailing input is an error.
pub fn evaluate(source: &str, scope: &Scope) -> Result<Value, EvalError> {
    let mut reader = Reader::new(source, scope);
    let value = reader.value()?;
    reader.skip_ws();
    if reader.pos < reader.bytes.len() {
        return Err(reader.unexpected("trailing input"));
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    scope: &'a Scope,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str, scope: &'a Scope) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            scope,
        }
    }

    fn unexpected(&self, message: &str) -> EvalError {
        EvalError::Unexpected {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: u8) -> Result<(), EvalError> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected `{}`", c as char)))
        }
    }

    /// Consumes `c` if it is next.
    fn eat(&mut self, c: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Result<Value, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some(b'"' | b'\'') => self.string().map(Value::Str),
            Some(b'{') => self.dict().map(Value::Map),
            Some(b'[') => self.list().map(Value::List),
            Some(b'(') => {
                self.pos += 1;
                let inner = self.value()?;
                self.expect(b')')?;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() || c == b'-' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let name = self.name();
                match name {
                    "True" => Ok(Value::Bool(true)),
                    "False" => Ok(Value::Bool(false)),
                    "None" => Ok(Value::None),
                    ELEMENT_CONSTRUCTOR if self.eat(b'(') => self.element_call(),
                    other => self
                        .scope
                        .get(other)
                        .cloned()
                        .ok_or_else(|| EvalError::UnboundName(other.to_string())),
                }
            }
            _ => Err(self.unexpected("expected a value")),
        }
    }

    fn name(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn number(&mut self) -> Result<Value, EvalError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.' || c == b'_' || c == b'e' || c == b'E')
        {
            self.pos += 1;
        }
        let text = self.src[start..self.pos].replace('_', "");
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Int(n));
        }
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::Unexpected {
                offset: start,
                message: format!("invalid number `{}`", text),
            })
    }

    /// `Element(` already consumed.
    fn element_call(&mut self) -> Result<Value, EvalError> {
        self.skip_ws();
        let tag = match self.peek() {
            Some(b'"' | b'\'') => Tag::Name(self.string()?),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let name = self.name();
                match self.scope.get(name) {
                    Some(Value::Str(bound)) => Tag::Name(bound.clone()),
                    Some(_) => return Err(self.unexpected("tag must be a string")),
                    None if name == FRAGMENT => Tag::Fragment,
                    None => return Err(EvalError::UnboundName(name.to_string())),
                }
            }
            _ => return Err(self.unexpected("expected a tag")),
        };

        let props = if self.eat(b',') {
            self.skip_ws();
            if self.peek() == Some(b')') {
                Props::new()
            } else {
                self.dict()?
            }
        } else {
            Props::new()
        };
        self.eat(b',');
        self.expect(b')')?;

        Ok(Value::from(Element::with_props(tag, props)))
    }

    fn dict(&mut self) -> Result<Props, EvalError> {
        self.expect(b'{')?;
        let mut props = Props::new();
        loop {
            if self.eat(b'}') {
                return Ok(props);
            }
            self.skip_ws();
            if self.bytes[self.pos..].starts_with(b"**") {
                self.pos += 2;
                let operand_start = self.pos;
                match self.value()? {
                    Value::Map(extra) => props.extend(extra),
                    _ => {
                        let operand = self.src[operand_start..self.pos].trim().to_string();
                        return Err(EvalError::NotAMapping(operand));
                    }
                }
            } else {
                let key = match self.peek() {
                    Some(b'"' | b'\'') => self.string()?,
                    _ => return Err(self.unexpected("dict keys must be strings")),
                };
                self.expect(b':')?;
                let value = self.value()?;
                props.insert(key, value);
            }
            if !self.eat(b',') {
                self.expect(b'}')?;
                return Ok(props);
            }
        }
    }

    fn list(&mut self) -> Result<Vec<Value>, EvalError> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            if self.eat(b']') {
                return Ok(items);
            }
            items.push(self.value()?);
            if !self.eat(b',') {
                self.expect(b']')?;
                return Ok(items);
            }
        }
    }

    fn string(&mut self) -> Result<String, EvalError> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        self.pos += 1;
        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.pos += 2;
                continue;
            }
            self.pos += 1;
            if c == quote {
                let inner = &self.src[start + 1..self.pos - 1];
                return Ok(unescape_string(inner));
            }
        }
        Err(EvalError::Unexpected {
            offset: start,
            message: "unterminated string".to_string(),
        })
    }
}

/// Unescape basic string escape sequences
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('/') => result.push('/'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('u') => {
                let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => result.push(decoded),
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}
