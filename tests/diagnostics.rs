//! Diagnostic channel and style-argument behavior (spec.md §9's two
//! resolved open questions).

use docblock_parser::ast::DocNode;
use docblock_parser::diagnostics::{Diagnostic, DiagnosticSink, Severity, VecSink};
use docblock_parser::validating_parse_doc_with_sink;

#[test]
fn vec_sink_collects_in_order() {
    let mut sink = VecSink::new();
    sink.report(Diagnostic::new("f", 1, Severity::Warning, "first"));
    sink.report(Diagnostic::new("f", 2, Severity::Error, "second"));
    assert_eq!(sink.0.len(), 2);
    assert_eq!(sink.0[0].message, "first");
    assert_eq!(sink.0[1].severity, Severity::Error);
}

#[test]
fn with_sink_reports_directly_without_an_owned_copy() {
    let mut sink = VecSink::new();
    let tree = validating_parse_doc_with_sink("f", 1, "<dd>orphan</dd>", &mut sink);
    assert!(
        sink.0.iter().any(|d| d.message.contains("<dd>")),
        "expected a diagnostic about the orphaned <dd>, got {:?}",
        sink.0
    );
    assert!(matches!(tree.root().value(), DocNode::Root));
}

/// Resolved "Open question — style-argument terminator": `\b foo bar`
/// bolds only `foo`; `bar` is ordinary trailing text.
#[test]
fn style_command_argument_is_a_single_token() {
    let mut sink = VecSink::new();
    let tree = validating_parse_doc_with_sink("f", 1, "\\b foo bar", &mut sink);
    let root = tree.root();
    let mut saw_close_before_bar = false;
    let mut seen_close = false;
    for node in root.descendants() {
        match node.value() {
            DocNode::StyleChange { is_open: false, .. } => seen_close = true,
            DocNode::Word(w) if w == "bar" => saw_close_before_bar = seen_close,
            _ => {}
        }
    }
    assert!(saw_close_before_bar, "expected the Bold span to close before \"bar\"");
}
