//! Per-invocation parser state (spec.md §5 / §9 "Global parse state").
//!
//! Every stack and scratch slot that the original design treats as
//! process-wide lives here instead, as a field of one `ParserContext` built
//! fresh inside `validating_parse_doc` and threaded through every
//! production by `&mut` reference. Two independent parses never share
//! state, so the parser is safe to run on multiple threads as long as each
//! thread owns its own context.

use crate::ast::{new_tree, DocNode, DocTree, NodeId, StyleKind};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::tables::SectionRegistry;
use crate::token::{Lexer, LexerState, Scratch, TokenKind};

/// One open inline-style span: the style and the node-stack depth at which
/// it was opened (spec.md §4.1).
#[derive(Debug, Clone, Copy)]
pub struct StyleFrame {
    pub style: StyleKind,
    pub depth_at_open: u32,
}

pub struct ParserContext<'a> {
    pub file_name: String,
    pub tree: DocTree,
    pub lexer: Box<dyn Lexer + 'a>,
    pub sink: &'a mut dyn DiagnosticSink,
    pub sections: SectionRegistry,

    /// Every block production pushes its own node id on entry and pops on
    /// exit; `len()` is the current nesting depth.
    node_stack: Vec<NodeId>,
    style_stack: Vec<StyleFrame>,

    /// One-deep pushback slot for a command name the paragraph loop decided
    /// to "unput" across a return boundary (spec.md §4.3, §9 "Re-parsing a
    /// stashed command": kept on the context, not the lexer).
    pushback: Option<String>,

    /// Indent/enum-flag of the most recently seen `LISTITEM`/`ENDLIST`
    /// token, so a caller that receives `Status::ListItemToken` or
    /// `Status::EndListToken` several stack frames away from where the
    /// token was actually read (spec.md §4.6 `AutoList`'s do-while test)
    /// can still inspect it, mirroring the original design's shared mutable
    /// token scratch without making it global.
    pub last_list_indent: i32,
    pub last_list_is_enum: bool,

    /// A `\section`/`\subsection` read in full (level, id, optional title)
    /// but not yet placed in the tree: `Status::Section` carries no payload
    /// of its own, so the data waits here for the body loop that receives
    /// the status (spec.md §4.7 section nesting).
    pending_section: Option<(u8, String, Option<String>)>,
}

impl<'a> ParserContext<'a> {
    pub fn new(file_name: impl Into<String>, lexer: Box<dyn Lexer + 'a>, sink: &'a mut dyn DiagnosticSink) -> Self {
        ParserContext {
            file_name: file_name.into(),
            tree: new_tree(),
            lexer,
            sink,
            sections: SectionRegistry::new(),
            node_stack: Vec::new(),
            style_stack: Vec::new(),
            pushback: None,
            last_list_indent: 0,
            last_list_is_enum: false,
            pending_section: None,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    // --- node stack ----------------------------------------------------

    pub fn depth(&self) -> u32 {
        self.node_stack.len() as u32
    }

    pub fn push_node(&mut self, id: NodeId) {
        self.node_stack.push(id);
    }

    /// Pops the node stack, asserting it matches `id` (spec.md §7: a
    /// node-stack pop mismatch is a fatal parser bug, not an input error).
    pub fn pop_node(&mut self, id: NodeId) {
        let top = self.node_stack.pop();
        debug_assert_eq!(top, Some(id), "node stack pop mismatch");
    }

    pub fn current_node(&self) -> NodeId {
        *self
            .node_stack
            .last()
            .unwrap_or(&self.tree.root().id())
    }

    pub fn append_child(&mut self, parent: NodeId, node: DocNode) -> NodeId {
        self.tree.get_mut(parent).append(node).id()
    }

    /// Appends a run of whitespace characters, merging into `parent`'s last
    /// child if it is already a `WhiteSpace` node instead of creating an
    /// adjacent one. The lexer can emit a line's trailing newline and its
    /// indent as two separate `Whitespace` tokens; this keeps the idempotence
    /// invariant (spec.md §8: no two adjacent `WhiteSpace` children) true
    /// regardless of how many tokens the run was split across.
    pub fn append_whitespace(&mut self, parent: NodeId, chars: &str) {
        let merge_into = self
            .tree
            .get(parent)
            .and_then(|n| n.last_child())
            .filter(|n| matches!(n.value(), DocNode::WhiteSpace(_)))
            .map(|n| n.id());
        match merge_into {
            Some(id) => {
                if let DocNode::WhiteSpace(text) = self.tree.get_mut(id).unwrap().value() {
                    text.push_str(chars);
                }
            }
            None => {
                self.append_child(parent, DocNode::WhiteSpace(chars.to_string()));
            }
        }
    }

    // --- style stack -----------------------------------------------------

    pub fn open_style(&mut self, style: StyleKind) {
        self.style_stack.push(StyleFrame {
            style,
            depth_at_open: self.depth(),
        });
    }

    /// Attempts to close `style`. Per spec.md §4.1: the stack must be
    /// non-empty, the top record must match `style`, and its
    /// `depth_at_open` must equal the current depth; any mismatch is a
    /// diagnostic and no pop occurs.
    pub fn close_style(&mut self, style: StyleKind, line: u32) -> bool {
        match self.style_stack.last() {
            Some(frame) if frame.style == style && frame.depth_at_open == self.depth() => {
                self.style_stack.pop();
                true
            }
            _ => {
                self.diag(
                    line,
                    Severity::Warning,
                    format!("found closing style {style:?} without a matching open at the same depth"),
                );
                false
            }
        }
    }

    /// Auto-closes every style opened at or above `depth`, synthesizing a
    /// close node for each so downstream traversals see a balanced tree
    /// (spec.md §7 balance-violation recovery). Called when a paragraph
    /// ends with unclosed spans.
    pub fn close_styles_at_or_above(&mut self, depth: u32, parent: NodeId, line: u32) {
        while let Some(frame) = self.style_stack.last().copied() {
            if frame.depth_at_open < depth {
                break;
            }
            self.style_stack.pop();
            self.diag(
                line,
                Severity::Warning,
                format!("end of paragraph without end of style {:?}", frame.style),
            );
            self.append_child(
                parent,
                DocNode::StyleChange {
                    style: frame.style,
                    depth: frame.depth_at_open,
                    is_open: false,
                },
            );
        }
    }

    // --- ancestor predicates (spec.md §4.1; must not allocate) ----------

    fn has_ancestor(&self, id: NodeId, pred: impl Fn(&DocNode) -> bool) -> bool {
        self.tree
            .get(id)
            .expect("node id from this context's own tree")
            .ancestors()
            .any(|n| pred(n.value()))
    }

    pub fn inside_pre(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| matches!(n, DocNode::HtmlPre))
    }

    pub fn inside_li(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| {
            matches!(n, DocNode::HtmlListItem | DocNode::AutoListItem | DocNode::SimpleListItem)
        })
    }

    pub fn inside_ul(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| matches!(n, DocNode::HtmlList(crate::ast::HtmlListKind::Unordered)))
    }

    pub fn inside_ol(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| matches!(n, DocNode::HtmlList(crate::ast::HtmlListKind::Ordered)))
    }

    pub fn inside_lang(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| matches!(n, DocNode::Language(_)))
    }

    /// Whether `id` sits inside an already-open `SimpleSect` body, used to
    /// decide whether a further simple-section-starting command should
    /// bubble as `Status::SimpleSec` instead of opening a nested section
    /// (spec.md §4.7).
    pub fn inside_ancestor_simple_sect(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| matches!(n, DocNode::SimpleSect { .. }))
    }

    pub fn inside_simple_list_item(&self, id: NodeId) -> bool {
        self.has_ancestor(id, |n| matches!(n, DocNode::SimpleListItem))
    }

    pub fn find_auto_list_ancestor(&self, id: NodeId) -> Option<NodeId> {
        self.tree
            .get(id)
            .expect("node id from this context's own tree")
            .ancestors()
            .find(|n| matches!(n.value(), DocNode::AutoList { .. }))
            .map(|n| n.id())
    }

    // --- pushback slot ---------------------------------------------------

    pub fn stash_command(&mut self, name: impl Into<String>) {
        debug_assert!(self.pushback.is_none(), "pushback slot is one-deep only");
        self.pushback = Some(name.into());
    }

    pub fn take_stashed_command(&mut self) -> Option<String> {
        self.pushback.take()
    }

    /// Stashes a fully-read `\section`/`\subsection` command (level, id,
    /// optional title) across the `Status::Section` return boundary: the
    /// status itself carries no payload, so the data waits here for
    /// whichever caller receives it (spec.md §4.6 "Root / Internal /
    /// Section").
    pub fn stash_section(&mut self, level: u8, id: impl Into<String>, title: Option<String>) {
        self.pending_section = Some((level, id.into(), title));
    }

    pub fn take_stashed_section(&mut self) -> Option<(u8, String, Option<String>)> {
        self.pending_section.take()
    }

    // --- lexer state scoped guard (spec.md §5) ---------------------------

    /// Runs `f` with the lexer switched to `state`, restoring `Para` state
    /// on return regardless of how `f` finished (spec.md §9 "Goto-based
    /// unwinding" → scoped-guard pattern).
    pub fn with_state<T>(&mut self, state: LexerState, f: impl FnOnce(&mut Self) -> T) -> T {
        self.lexer.set_state(state);
        let result = f(self);
        self.lexer.set_state(LexerState::Para);
        result
    }

    pub fn current_line(&self) -> u32 {
        self.lexer.current_line()
    }

    /// Advances the lexer and returns the token kind together with a
    /// snapshot of the scratch record, so callers can freely make further
    /// `&mut self` calls (e.g. `append_child`) without fighting the borrow
    /// checker over `self.lexer`.
    pub fn next_token(&mut self) -> (TokenKind, Scratch) {
        let kind = self.lexer.next();
        (kind, self.lexer.scratch().clone())
    }

    pub fn diag(&mut self, line: u32, severity: Severity, message: impl Into<String>) {
        self.sink.report(Diagnostic::new(self.file_name.clone(), line, severity, message));
    }
}
