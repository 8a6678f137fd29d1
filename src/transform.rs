//! Transform Module for the pyx Compiler
//!
//! The rewrite loop: find the leftmost remaining markup occurrence, build its
//! IR, serialize it, splice the text over the occurrence and reparse. Repeats
//! until the parser reports no markup. Each iteration reparses the whole file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, trace};

use crate::codegen::{Codegen, CodegenRules};
use crate::error::CompileError;
use crate::ir::IrNode;
use crate::parse::ScanningParser;
use crate::syntax::{find_next_markup, MarkupParser, NodeKind, SyntaxNode};
use crate::visitor::IrBuilder;

pub const DEFAULT_PRELUDE: &str = "from jsx import Element, Fragment";

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Extension of markup sources picked up by discovery.
    pub input_extension: String,
    /// Extension of the sibling file written for each source.
    pub output_extension: String,
    /// Line written above compiled output. Empty disables it.
    pub prelude: String,
    /// Reject `<a>...</b>` pairs with a tag mismatch error.
    pub check_closing_tags: bool,
    pub cache_dir: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            input_extension: "pyx".to_string(),
            output_extension: "py".to_string(),
            prelude: DEFAULT_PRELUDE.to_string(),
            check_closing_tags: true,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub code: String,
    /// Number of splices the loop performed.
    pub rewrites: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Compiler<P: MarkupParser = ScanningParser> {
    parser: P,
    options: CompileOptions,
    rules: CodegenRules,
}

impl Compiler<ScanningParser> {
    pub fn new(options: CompileOptions) -> Self {
        Self::with_parser(ScanningParser::new(), options)
    }
}

impl Default for Compiler<ScanningParser> {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl<P: MarkupParser> Compiler<P> {
    pub fn with_parser(parser: P, options: CompileOptions) -> Self {
        Self {
            parser,
            options,
            rules: CodegenRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: CodegenRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    fn builder<'a>(&self, source: &'a str, file: &'a str) -> IrBuilder<'a> {
        IrBuilder::new(source, file).check_closing_tags(self.options.check_closing_tags)
    }

    /// Builds every occurrence of the original text, nested ones included, so
    /// a failure is reported at its position in the file as written.
    pub fn check(&self, source: &str, file: &str) -> Result<(), CompileError> {
        let tree = self.parser.parse(source);
        let builder = self.builder(source, file);
        let mut occurrences = Vec::new();
        collect_markup(&tree, &mut occurrences);
        for node in occurrences {
            builder.visit_jsx(node)?;
        }
        Ok(())
    }

    /// IR of each top-level occurrence, in byte order.
    pub fn occurrences(&self, source: &str, file: &str) -> Result<Vec<IrNode>, CompileError> {
        let tree = self.parser.parse(source);
        let builder = self.builder(source, file);
        tree.children
            .iter()
            .filter(|node| node.kind == NodeKind::Jsx)
            .map(|node| builder.visit_jsx(node))
            .collect()
    }

    pub fn compile(&self, source: &str, file: &str) -> Result<CompileResult, CompileError> {
        self.check(source, file)?;

        let codegen = Codegen::new(&self.rules);
        let mut code = source.to_string();
        let mut rewrites = 0;

        loop {
            let tree = self.parser.parse(&code);
            let Some(node) = find_next_markup(&tree) else {
                break;
            };

            let ir = self.builder(&code, file).visit_jsx(node)?;
            let replacement = codegen.serialize(&ir);
            let span = node.span.clone();
            trace!(file, start = span.start, end = span.end, "{}", replacement);

            code.replace_range(span, &replacement);
            rewrites += 1;
        }

        debug!(file, rewrites, "rewrite loop reached a fixed point");
        Ok(CompileResult { code, rewrites })
    }
}

/// Pre-order: outermost first, then left to right.
fn collect_markup<'n>(node: &'n SyntaxNode, out: &mut Vec<&'n SyntaxNode>) {
    if node.kind == NodeKind::Jsx {
        out.push(node);
    }
    for child in &node.children {
        collect_markup(child, out);
    }
}

/// Compiles with default options and the built-in parser.
pub fn compile(source: &str, file: &str) -> Result<CompileResult, CompileError> {
    Compiler::<ScanningParser>::default().compile(source, file)
}
