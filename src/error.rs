use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_SYNTAX_STRUCTURE: &str = "PYX001";
pub const ERR_UNSUPPORTED_ATTRIBUTE: &str = "PYX002";
pub const ERR_TAG_MISMATCH: &str = "PYX003";

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE LOCATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte offset plus the 1-based line/column it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let column = source[line_start..offset].chars().count() as u32 + 1;

        Self {
            offset,
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} (byte {})", self.line, self.column, self.offset)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILE ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile-time failures. Any of these aborts compilation of the current file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CompileError {
    #[error("[{code}] {file}:{location}: unrecognized markup structure: {detail}", code = ERR_SYNTAX_STRUCTURE)]
    SyntaxStructure {
        file: String,
        location: SourceLocation,
        detail: String,
    },

    #[error("[{code}] {file}:{location}: unsupported attribute value node `{kind}`", code = ERR_UNSUPPORTED_ATTRIBUTE)]
    UnsupportedAttribute {
        file: String,
        location: SourceLocation,
        kind: String,
    },

    #[error("[{code}] {file}:{location}: closing tag `{closing}` does not match opening tag `{opening}`", code = ERR_TAG_MISMATCH)]
    TagMismatch {
        file: String,
        location: SourceLocation,
        opening: String,
        closing: String,
    },
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::SyntaxStructure { .. } => ERR_SYNTAX_STRUCTURE,
            CompileError::UnsupportedAttribute { .. } => ERR_UNSUPPORTED_ATTRIBUTE,
            CompileError::TagMismatch { .. } => ERR_TAG_MISMATCH,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            CompileError::SyntaxStructure { location, .. }
            | CompileError::UnsupportedAttribute { location, .. }
            | CompileError::TagMismatch { location, .. } => *location,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDER ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no component named `{name}` is bound in the resolution environment")]
    NameResolution { name: String },

    /// Raised by a component's own code, passed through untouched.
    #[error(transparent)]
    Component(#[from] anyhow::Error),
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATIC EVALUATION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unexpected input at byte {offset}: {message}")]
    Unexpected { offset: usize, message: String },

    #[error("name `{0}` is not bound in the evaluation scope")]
    UnboundName(String),

    #[error("`**{0}` does not evaluate to an element's properties")]
    NotAMapping(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRIVER ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),
}
