//! Property tests for the structural invariants spec.md §8 requires of
//! every parse, regardless of input (well-nested tree, style balance,
//! container purity, section monotonicity, whitespace idempotence,
//! totality).

use docblock_parser::ast::{DocNode, HtmlListKind};
use docblock_parser::validating_parse_doc;
use ego_tree::NodeRef;
use proptest::prelude::*;

fn parse(input: &str) -> docblock_parser::ParseResult {
    validating_parse_doc("invariants.rs", 1, input)
}

/// Every child's parent, walked back up through `ego_tree`, is the node
/// that appended it.
fn assert_well_nested(node: NodeRef<'_, DocNode>) {
    for child in node.children() {
        assert_eq!(
            child.parent().map(|p| p.id()),
            Some(node.id()),
            "child {:?} does not report its actual parent",
            child.value()
        );
        assert_well_nested(child);
    }
}

/// No container in the tree has two adjacent `WhiteSpace` children.
fn assert_no_adjacent_whitespace(node: NodeRef<'_, DocNode>) {
    let mut prev_was_whitespace = false;
    for child in node.children() {
        let is_ws = matches!(child.value(), DocNode::WhiteSpace(_));
        assert!(
            !(is_ws && prev_was_whitespace),
            "found two adjacent WhiteSpace children under {:?}",
            node.value()
        );
        prev_was_whitespace = is_ws;
        assert_no_adjacent_whitespace(child);
    }
}

/// `HtmlList` only ever contains `HtmlListItem`; `HtmlRow` only `HtmlCell`;
/// `HtmlDescList` strictly alternates `HtmlDescTitle`/`HtmlDescData`;
/// `HtmlTable` has at most one `HtmlCaption`, appearing first.
fn assert_container_purity(node: NodeRef<'_, DocNode>) {
    match node.value() {
        DocNode::HtmlList(_) => {
            for child in node.children() {
                assert!(
                    matches!(child.value(), DocNode::HtmlListItem),
                    "HtmlList child was {:?}, not HtmlListItem",
                    child.value()
                );
            }
        }
        DocNode::HtmlRow => {
            for child in node.children() {
                assert!(
                    matches!(child.value(), DocNode::HtmlCell { .. }),
                    "HtmlRow child was {:?}, not HtmlCell",
                    child.value()
                );
            }
        }
        DocNode::HtmlDescList => {
            let mut expect_title = true;
            for child in node.children() {
                match child.value() {
                    DocNode::HtmlDescTitle if expect_title => expect_title = false,
                    DocNode::HtmlDescData if !expect_title => expect_title = true,
                    other => panic!("HtmlDescList out of Title/Data alternation at {other:?}"),
                }
            }
        }
        DocNode::HtmlTable => {
            let captions = node
                .children()
                .enumerate()
                .filter(|(_, c)| matches!(c.value(), DocNode::HtmlCaption))
                .collect::<Vec<_>>();
            assert!(captions.len() <= 1, "HtmlTable has more than one HtmlCaption");
            if let Some((idx, _)) = captions.first() {
                assert_eq!(*idx, 0, "HtmlTable's HtmlCaption does not appear first");
            }
        }
        _ => {}
    }
    for child in node.children() {
        assert_container_purity(child);
    }
}

/// Every direct `Section` child of a `Section(level = L)` has level `L+1`.
fn assert_section_monotonicity(node: NodeRef<'_, DocNode>) {
    if let DocNode::Section { level, .. } = node.value() {
        for child in node.children() {
            if let DocNode::Section { level: child_level, .. } = child.value() {
                assert_eq!(*child_level, level + 1, "section nesting skipped a level");
            }
        }
    }
    for child in node.children() {
        assert_section_monotonicity(child);
    }
}

/// A `StyleChange` stack, walked depth-first within one `Para`, never sees
/// a close that doesn't match the most recently opened style at the same
/// depth, and every open is eventually closed.
fn assert_style_balance_in_para(node: NodeRef<'_, DocNode>) {
    if matches!(node.value(), DocNode::Para) {
        let mut stack: Vec<(docblock_parser::ast::StyleKind, u32)> = Vec::new();
        for child in node.children() {
            if let DocNode::StyleChange { style, depth, is_open } = child.value() {
                if *is_open {
                    stack.push((*style, *depth));
                } else {
                    let top = stack.pop().expect("style close without a matching open");
                    assert_eq!(top, (*style, *depth), "style close does not match innermost open");
                }
            }
        }
        assert!(stack.is_empty(), "paragraph ended with unclosed styles: {stack:?}");
    }
    for child in node.children() {
        assert_style_balance_in_para(child);
    }
}

#[test]
fn well_nested_tree_simple_input() {
    let result = parse("Hello <b>bold</b> world");
    assert_well_nested(result.tree.root());
}

#[test]
fn well_nested_tree_nested_sections() {
    let result = parse("intro\n\\section sec1 First\nbody\n\\subsection sub1 Nested\nmore\n");
    assert_well_nested(result.tree.root());
}

#[test]
fn whitespace_never_adjacent() {
    let result = parse("a   b\t\tc\nd");
    assert_no_adjacent_whitespace(result.tree.root());
}

#[test]
fn container_purity_lists_and_tables() {
    let result = parse("<ul><li>one</li><li>two</li></ul>");
    assert_container_purity(result.tree.root());

    let result = parse("<table><caption>Cap</caption><tr><td>a</td><th>b</th></tr></table>");
    assert_container_purity(result.tree.root());

    let result = parse("<dl><dt>term</dt><dd>def</dd></dl>");
    assert_container_purity(result.tree.root());
}

#[test]
fn section_levels_are_monotonic() {
    let result = parse("\\section top Top\nintro\n\\subsection sub Sub\nbody\n");
    assert_section_monotonicity(result.tree.root());
}

#[test]
fn style_spans_balance_with_auto_close() {
    let result = parse("<b>bold <i>and italic</b> trailing</i>");
    assert_style_balance_in_para(result.tree.root());
}

#[test]
fn parser_never_panics_on_pathological_input() {
    for input in [
        "",
        "\\",
        "<",
        "</ul>",
        "\\section",
        "\\param",
        "\\~lang",
        "-# \n-# \n",
        "<table><tr><td></table>",
        "\\internal\n\\internal\n",
        "&notanentity;",
    ] {
        let _ = parse(input);
    }
}

proptest! {
    /// Any finite string of "paragraph-ish" characters parses to
    /// completion without panicking and yields a well-nested tree.
    #[test]
    fn totality_on_arbitrary_text(s in "[ -~\n]{0,80}") {
        let result = parse(&s);
        assert_well_nested(result.tree.root());
    }

    /// Interleaving `<b>`/`<i>`/`<code>` open/close tags in any order never
    /// panics and always leaves the tree's style spans balanced once the
    /// paragraph is finished.
    #[test]
    fn style_balance_under_arbitrary_tag_soup(tags in prop::collection::vec(prop::sample::select(vec!["<b>", "</b>", "<i>", "</i>", "<code>", "</code>", "word "]), 0..12)) {
        let input: String = tags.concat();
        let result = parse(&input);
        assert_style_balance_in_para(result.tree.root());
    }
}

#[test]
fn auto_list_grouping() {
    let result = parse("- item A\n- item B\n");
    let root = result.tree.root();
    let list = root
        .descendants()
        .find(|n| matches!(n.value(), DocNode::AutoList { .. }))
        .expect("expected an AutoList in the tree");
    let items: Vec<_> = list.children().collect();
    assert_eq!(items.len(), 2, "expected exactly two AutoListItem children");
    for item in &items {
        assert!(matches!(item.value(), DocNode::AutoListItem));
    }
}

#[test]
fn html_unordered_list_shape() {
    let result = parse("<ul><li>one</li><li>two</li></ul>");
    let root = result.tree.root();
    let list = root
        .descendants()
        .find(|n| matches!(n.value(), DocNode::HtmlList(HtmlListKind::Unordered)))
        .expect("expected an unordered HtmlList");
    assert_eq!(list.children().count(), 2);
}

#[test]
fn param_and_return_sections() {
    let result = parse("\\param x the input\n\\return the output");
    let root = result.tree.root();
    let sections: Vec<_> = root
        .descendants()
        .filter(|n| matches!(n.value(), DocNode::SimpleSect { .. }))
        .collect();
    assert_eq!(sections.len(), 2, "expected a Param section and a Return section");
    match sections[0].value() {
        DocNode::SimpleSect { kind, parameters } => {
            assert_eq!(*kind, docblock_parser::ast::SimpleSectKind::Param);
            assert_eq!(parameters, &vec!["x".to_string()]);
        }
        _ => unreachable!(),
    }
    match sections[1].value() {
        DocNode::SimpleSect { kind, .. } => {
            assert_eq!(*kind, docblock_parser::ast::SimpleSectKind::Return);
        }
        _ => unreachable!(),
    }
}

#[test]
fn language_switch_opens_sibling_language_blocks() {
    let result = parse("\\~english Hello \\~german Hallo");
    let root = result.tree.root();
    let langs: Vec<&str> = root
        .descendants()
        .filter_map(|n| match n.value() {
            DocNode::Language(tag) => Some(tag.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(langs, vec!["english", "german"], "expected two sibling Language blocks in source order");
}

#[test]
fn mismatched_heading_levels_still_parse_with_a_diagnostic() {
    let result = parse("<h2>Title</h2><h1>Oops</h1>");
    let root = result.tree.root();
    let has_h2 = root
        .descendants()
        .any(|n| matches!(n.value(), DocNode::HtmlHeader(2)));
    assert!(has_h2, "expected an HtmlHeader(2) node");
    assert!(
        !result.diagnostics.is_empty(),
        "expected a diagnostic noting the mismatched </h1>"
    );
}

#[test]
fn ref_target_and_trailing_words() {
    let result = parse("See \\ref myId for details");
    let root = result.tree.root();
    let r = root
        .descendants()
        .find(|n| matches!(n.value(), DocNode::Ref(_)))
        .expect("expected a Ref node");
    match r.value() {
        DocNode::Ref(target) => assert_eq!(target, "myId"),
        _ => unreachable!(),
    }
    let words: Vec<String> = r
        .children()
        .filter_map(|c| match c.value() {
            DocNode::Word(w) => Some(w.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(words, vec!["for".to_string(), "details".to_string()]);
}
