//! The inline token handler (spec.md §4.2): the shared routine consumed by
//! every production that owns flow content.

use crate::ast::{DocNode, NodeId, SymbolKind};
use crate::context::ParserContext;
use crate::diagnostics::Severity;
use crate::status::Status;
use crate::tables::{self, CommandId, HtmlTagId};
use crate::token::{LexerState, Scratch, TokenKind};

/// Character-escape commands that the dispatcher resolves straight to a
/// `Symbol` leaf, independent of the `&name;` entity table.
fn escape_symbol(id: CommandId) -> Option<SymbolKind> {
    use CommandId::*;
    Some(match id {
        BSlash => SymbolKind::BSlash,
        At => SymbolKind::At,
        Less => SymbolKind::Less,
        Greater => SymbolKind::Greater,
        Amp => SymbolKind::Amp,
        Dollar => SymbolKind::Dollar,
        Hash => SymbolKind::Hash,
        Percent => SymbolKind::Percent,
        Minus => SymbolKind::Minus,
        NDash => SymbolKind::NDash,
        MDash => SymbolKind::MDash,
        _ => return None,
    })
}

/// Attempts to handle one already-fetched token as inline content of
/// `parent`. Returns `true` ("handled") when a leaf or style change was
/// appended, `false` ("not handled") so the caller can apply its own,
/// production-specific logic.
///
/// `allow_word` disables plain `WORD` handling; Java-style link parsing
/// sets this to `false` so it can intercept the raw word itself and look
/// for a closing `}`.
pub fn handle_inline_token(
    ctx: &mut ParserContext,
    parent: NodeId,
    kind: TokenKind,
    scratch: &Scratch,
    allow_word: bool,
) -> bool {
    match kind {
        TokenKind::Word => {
            if allow_word {
                ctx.append_child(parent, DocNode::Word(scratch.name.clone()));
                true
            } else {
                false
            }
        }
        TokenKind::Whitespace | TokenKind::NewPara => {
            let has_children = ctx.tree.get(parent).map(|n| n.has_children()).unwrap_or(false);
            if ctx.inside_pre(parent) || has_children {
                ctx.append_whitespace(parent, &scratch.chars);
            }
            true
        }
        TokenKind::Url => {
            ctx.append_child(parent, DocNode::Url(scratch.name.clone()));
            true
        }
        TokenKind::Symbol => {
            if let Some((sym, letter)) = tables::decode_symbol(&scratch.name) {
                ctx.append_child(parent, DocNode::Symbol(sym, letter));
                true
            } else {
                false
            }
        }
        TokenKind::Command => {
            let id = tables::lookup_command(&scratch.name);
            if let Some(sym) = escape_symbol(id) {
                ctx.append_child(parent, DocNode::Symbol(sym, None));
                return true;
            }
            match id {
                CommandId::Emphasis => {
                    let _ = wrap_style(ctx, parent, crate::ast::StyleKind::Italic);
                    true
                }
                CommandId::Bold => {
                    let _ = wrap_style(ctx, parent, crate::ast::StyleKind::Bold);
                    true
                }
                CommandId::Code => {
                    let _ = wrap_style(ctx, parent, crate::ast::StyleKind::Code);
                    true
                }
                CommandId::HtmlOnly | CommandId::LatexOnly => {
                    let state = if id == CommandId::HtmlOnly {
                        LexerState::HtmlOnly
                    } else {
                        LexerState::LatexOnly
                    };
                    let vkind = if id == CommandId::HtmlOnly {
                        crate::ast::VerbatimKind::HtmlOnly
                    } else {
                        crate::ast::VerbatimKind::LatexOnly
                    };
                    let (payload, unterminated) = capture_verbatim(ctx, state);
                    if unterminated {
                        let line = ctx.current_line();
                        ctx.diag(line, Severity::Warning, "unterminated verbatim capture");
                    }
                    ctx.append_child(parent, DocNode::Verbatim(payload, vkind));
                    true
                }
                CommandId::Formula => {
                    // `\f$ ... \f$` inline formula; the id stands in for
                    // the external formula registry spec.md §1 places out
                    // of scope.
                    let line = ctx.current_line();
                    ctx.append_child(parent, DocNode::Formula(line as i64));
                    true
                }
                _ => false,
            }
        }
        TokenKind::HtmlTag => {
            let tag = tables::lookup_html_tag(&scratch.name);
            if let Some(style) = tag.as_style() {
                if scratch.end_tag {
                    let line = ctx.current_line();
                    let ok = ctx.close_style(style, line);
                    if ok {
                        ctx.append_child(
                            parent,
                            DocNode::StyleChange {
                                style,
                                depth: ctx.depth(),
                                is_open: false,
                            },
                        );
                    }
                } else {
                    ctx.open_style(style);
                    ctx.append_child(
                        parent,
                        DocNode::StyleChange {
                            style,
                            depth: ctx.depth(),
                            is_open: true,
                        },
                    );
                }
                true
            } else {
                let _ = tag;
                false
            }
        }
        _ => false,
    }
}

/// Opens `style`, consumes its single-token argument, and closes it again.
/// Returns the status `consume_style_argument` produced, so the command
/// dispatcher (§4.7) can propagate a `NEWPARA` terminator to its own caller
/// as spec.md §4.2 requires ("if the argument ended at NEWPARA, also
/// trigger paragraph-end handling").
pub fn wrap_style(ctx: &mut ParserContext, parent: NodeId, style: crate::ast::StyleKind) -> Status {
    let depth_before = ctx.depth();
    ctx.open_style(style);
    ctx.append_child(
        parent,
        DocNode::StyleChange {
            style,
            depth: depth_before,
            is_open: true,
        },
    );
    let status = consume_style_argument(ctx, parent);
    let line = ctx.current_line();
    ctx.close_style(style, line);
    ctx.append_child(
        parent,
        DocNode::StyleChange {
            style,
            depth: depth_before,
            is_open: false,
        },
    );
    status
}

/// Style-argument consumption (spec.md §4.2): a single whitespace-bounded
/// argument. `\b foo bar` bolds only `foo` — this is the resolved "Open
/// question — style-argument terminator" from spec.md §9 / SPEC_FULL.md §9:
/// the observed single-token behavior is kept as-is, not widened.
pub fn consume_style_argument(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let (first_kind, _) = ctx.next_token();
    if first_kind != TokenKind::Whitespace {
        let line = ctx.current_line();
        ctx.diag(line, Severity::Warning, "expected whitespace after style command");
    }
    loop {
        let (kind, scratch) = ctx.next_token();
        if matches!(kind, TokenKind::Whitespace | TokenKind::NewPara) {
            return if kind == TokenKind::NewPara { Status::NewPara } else { Status::Ok };
        }
        if kind == TokenKind::Eos {
            return Status::Eos;
        }
        if !handle_inline_token(ctx, parent, kind, &scratch, true)
            && matches!(kind, TokenKind::Command | TokenKind::Symbol)
        {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, "unexpected token as argument of style command");
        }
    }
}

/// Switches the lexer to `state`, reads exactly one token whose scratch
/// carries the captured body, and returns `(payload, unterminated)`.
pub fn capture_verbatim(ctx: &mut ParserContext, state: crate::token::LexerState) -> (String, bool) {
    ctx.with_state(state, |ctx| {
        let (_, scratch) = ctx.next_token();
        (scratch.verbatim_payload, scratch.id < 0)
    })
}
