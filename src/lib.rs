//! # pyx Compiler
//!
//! Markup syntax embedded in Python expressions, compiled ahead of time.
//!
//! ## Compile time
//!
//! 1. **Scan**: a [`MarkupParser`] turns the file into a `module` tree whose
//!    `jsx` nodes are the markup occurrences.
//! 2. **Classify and build**: [`visitor`] matches each node against the fixed
//!    `jsx_*` shapes and builds an [`IrNode`].
//! 3. **Serialize**: [`codegen`] prints the IR as an `Element(...)` call.
//! 4. **Rewrite**: [`transform`] splices the call over the occurrence and
//!    reparses, until no markup is left.
//!
//! ## Run time
//!
//! Compiled code builds [`Element`] trees; [`render()`] resolves them against an
//! explicit [`Environment`] of components and returns the final text.

pub mod cache;
pub mod codegen;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod finalize;
pub mod ir;
pub mod parse;
pub mod render;
pub mod runtime;
pub mod scope;
pub mod static_eval;
pub mod syntax;
pub mod transform;
pub mod visitor;

#[cfg(test)]
mod codegen_tests;
#[cfg(test)]
mod parse_tests;
#[cfg(test)]
mod static_eval_tests;

pub use codegen::{serialize, Codegen, CodegenRules};
pub use driver::{load_options, BuildSummary, Driver};
pub use error::{CompileError, DriverError, EvalError, RenderError, SourceLocation};
pub use ir::{Children, ElementIr, IrNode, PropValue};
pub use parse::ScanningParser;
pub use render::{render, render_element};
pub use runtime::{Element, Props, Tag, Value};
pub use scope::{Binding, Environment, Scope};
pub use syntax::{MarkupParser, NodeKind, SyntaxNode};
pub use transform::{compile, CompileOptions, CompileResult, Compiler};
pub use visitor::build_ir;
