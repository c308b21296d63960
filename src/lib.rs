//! A hand-written recursive-descent parser for a Doxygen-like inline
//! documentation comment dialect (spec.md §1 OVERVIEW): backslash/at
//! commands, a subset of HTML, auto-detected lists, description lists,
//! tables, verbatim capture, and a section hierarchy, all built into a
//! typed [`ast::DocNode`] tree for downstream visitors to walk.

pub mod ast;
pub mod context;
pub mod debug;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod status;
pub mod tables;
pub mod token;

use ast::DocTree;
use context::ParserContext;
use diagnostics::{Diagnostic, DiagnosticSink, VecSink};
use lexer::DocLexer;
use token::LexerState;

/// The outcome of a parse: the finished tree plus every diagnostic
/// collected along the way (SPEC_FULL.md §6, resolving spec.md §9's "Open
/// question — diagnostic channel").
#[derive(Debug)]
pub struct ParseResult {
    pub tree: DocTree,
    pub diagnostics: Vec<Diagnostic>,
}

/// Entry point (spec.md §6): parses `input`, attributing its first line to
/// `start_line`, and returns the finished tree together with every
/// diagnostic reported while building it. Diagnostics are collected rather
/// than streamed; callers who want them reported as they occur (e.g. the
/// CLI, to a colorized terminal) should use
/// [`validating_parse_doc_with_sink`] instead.
pub fn validating_parse_doc(file_name: &str, start_line: u32, input: &str) -> ParseResult {
    let mut sink = VecSink::new();
    let tree = validating_parse_doc_with_sink(file_name, start_line, input, &mut sink);
    ParseResult {
        tree,
        diagnostics: sink.0,
    }
}

/// Like [`validating_parse_doc`], but diagnostics are reported directly to
/// the caller-supplied `sink` instead of being collected in memory.
pub fn validating_parse_doc_with_sink(file_name: &str, start_line: u32, input: &str, sink: &mut dyn DiagnosticSink) -> DocTree {
    let lexer = Box::new(DocLexer::new(input, start_line));
    let mut ctx = ParserContext::new(file_name, lexer, sink);
    let _ = parser::root::parse_root(&mut ctx);

    debug_assert_eq!(
        ctx.lexer.state(),
        LexerState::Para,
        "lexer state must be restored to Para by the time the root production returns"
    );

    if debug::is_set(debug::DebugFlag::PrintTree) {
        debug::print_tree(&ctx.tree);
    }

    ctx.tree
}
