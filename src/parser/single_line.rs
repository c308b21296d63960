//! The single-line / inline-container productions of spec.md §4.6: `Title`,
//! `Ref`, `DotFile`, `Image`, `IndexEntry`, `SecRefItem`, `HtmlCaption`,
//! `HtmlHeader`, `HtmlDescTitle`, `HRef`, and the Java-style `Link`.
//!
//! All of them consume tokens through the shared inline handler and differ
//! only in which terminator ends them and, for `Link`, in how `WORD` tokens
//! are intercepted.

use crate::ast::{DocNode, ImageRenderer, NodeId};
use crate::context::ParserContext;
use crate::diagnostics::Severity;
use crate::status::Status;
use crate::token::{LexerState, Scratch, TokenKind};

use super::inline::handle_inline_token;

/// Consumes inline tokens into `node_id`, switching to `state` first if
/// given, until end-of-stream. Any command/symbol the inline handler
/// rejects is diagnosed but scanning continues (spec.md §4.2).
fn consume_to_eos(ctx: &mut ParserContext, node_id: NodeId, state: Option<LexerState>) -> Status {
    let body = |ctx: &mut ParserContext| loop {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Eos {
            return Status::Eos;
        }
        if !handle_inline_token(ctx, node_id, kind, &scratch, true) && matches!(kind, TokenKind::Command | TokenKind::Symbol) {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, format!("unknown {} at line {line}", describe(kind, &scratch)));
        }
    };
    match state {
        Some(s) => ctx.with_state(s, body),
        None => body(ctx),
    }
}

fn describe(kind: TokenKind, scratch: &Scratch) -> String {
    match kind {
        TokenKind::Command => format!("command \\{}", scratch.name),
        TokenKind::Symbol => format!("symbol {}", scratch.name),
        _ => "token".to_string(),
    }
}

/// Reads one bare word under `state` (used to read a target/filename before
/// the remaining content of a Ref/DotFile/Image/SecRefItem production).
pub fn read_one_word(ctx: &mut ParserContext, state: LexerState) -> Option<String> {
    ctx.with_state(state, |ctx| {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Word {
            Some(scratch.name)
        } else {
            None
        }
    })
}

/// `Title`: used by `SimpleSect(User)` ("par"). Scans under `Title` state
/// until end-of-stream.
pub fn parse_title(ctx: &mut ParserContext, parent: NodeId) -> (NodeId, Status) {
    let id = ctx.append_child(parent, DocNode::Title);
    ctx.push_node(id);
    let status = consume_to_eos(ctx, id, Some(LexerState::Title));
    ctx.pop_node(id);
    (id, status)
}

/// `Ref(target)`: target is the first word under `Ref` state; anything
/// after becomes child content (spec.md §8 scenario 2).
pub fn parse_ref(ctx: &mut ParserContext, parent: NodeId) -> NodeId {
    let target = read_one_word(ctx, LexerState::Ref).unwrap_or_default();
    let id = ctx.append_child(parent, DocNode::Ref(target));
    ctx.push_node(id);
    consume_to_eos(ctx, id, Some(LexerState::Ref));
    ctx.pop_node(id);
    id
}

pub fn parse_sec_ref_item(ctx: &mut ParserContext, parent: NodeId) -> NodeId {
    let target = read_one_word(ctx, LexerState::Ref).unwrap_or_default();
    let id = ctx.append_child(parent, DocNode::SecRefItem(target));
    ctx.push_node(id);
    consume_to_eos(ctx, id, Some(LexerState::Ref));
    ctx.pop_node(id);
    id
}

pub fn parse_dot_file(ctx: &mut ParserContext, parent: NodeId) -> NodeId {
    let file = read_one_word(ctx, LexerState::File).unwrap_or_default();
    let id = ctx.append_child(parent, DocNode::DotFile(file));
    ctx.push_node(id);
    consume_to_eos(ctx, id, Some(LexerState::Title));
    ctx.pop_node(id);
    id
}

pub fn parse_image(ctx: &mut ParserContext, parent: NodeId, renderer: ImageRenderer) -> NodeId {
    let file = read_one_word(ctx, LexerState::File).unwrap_or_default();
    let id = ctx.append_child(parent, DocNode::Image(file, renderer));
    ctx.push_node(id);
    consume_to_eos(ctx, id, Some(LexerState::Title));
    ctx.pop_node(id);
    id
}

/// `IndexEntry`: a mandatory leading whitespace, then inline content until
/// `WHITESPACE`/`NEWPARA` (consumed as the terminator).
pub fn parse_index_entry(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let (first, _) = ctx.next_token();
    if first != TokenKind::Whitespace {
        let line = ctx.current_line();
        ctx.diag(line, Severity::Warning, "expected whitespace after \\addindex");
    }
    let id = ctx.append_child(parent, DocNode::IndexEntry);
    ctx.push_node(id);
    let status = loop {
        let (kind, scratch) = ctx.next_token();
        if matches!(kind, TokenKind::Whitespace | TokenKind::NewPara) {
            break Status::Ok;
        }
        if kind == TokenKind::Eos {
            break Status::Eos;
        }
        handle_inline_token(ctx, id, kind, &scratch, true);
    };
    ctx.pop_node(id);
    status
}

/// `HtmlCaption`: inline content until `</caption>`.
pub fn parse_html_caption(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let id = ctx.append_child(parent, DocNode::HtmlCaption);
    ctx.push_node(id);
    let status = loop {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Eos {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, "unexpected end of comment while inside <caption>");
            break Status::Eos;
        }
        if kind == TokenKind::HtmlTag && scratch.end_tag && scratch.name == "caption" {
            break Status::Ok;
        }
        if !handle_inline_token(ctx, id, kind, &scratch, true) {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, format!("unexpected token inside <caption> at line {line}"));
        }
    };
    ctx.pop_node(id);
    status
}

/// `HtmlHeader(level)`: inline content until the matching `</hN>`. A
/// mismatched closing level is diagnosed but still terminates (spec.md
/// §4.6).
pub fn parse_html_header(ctx: &mut ParserContext, parent: NodeId, level: u8) -> Status {
    let id = ctx.append_child(parent, DocNode::HtmlHeader(level));
    ctx.push_node(id);
    let status = loop {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Eos {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, format!("unexpected end of comment while inside <h{level}>"));
            break Status::Eos;
        }
        if kind == TokenKind::HtmlTag && scratch.end_tag && matches!(scratch.name.as_str(), "h1" | "h2" | "h3") {
            let closed_level: u8 = scratch.name[1..].parse().unwrap_or(0);
            if closed_level != level {
                let line = ctx.current_line();
                ctx.diag(line, Severity::Warning, format!("</{}> does not match opening <h{level}>", scratch.name));
            }
            break Status::Ok;
        }
        if !handle_inline_token(ctx, id, kind, &scratch, true) {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, format!("unexpected token inside header at line {line}"));
        }
    };
    ctx.pop_node(id);
    status
}

/// `HtmlDescTitle`: inline content, terminated by a `<dd>` start tag
/// (returns `Status::DescData` to request the body) or ignored on a
/// `</dt>` end tag (spec.md §4.6).
pub fn parse_html_desc_title(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let id = ctx.append_child(parent, DocNode::HtmlDescTitle);
    ctx.push_node(id);
    let status = loop {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Eos {
            break Status::Eos;
        }
        if kind == TokenKind::HtmlTag && !scratch.end_tag && scratch.name == "dd" {
            break Status::DescData;
        }
        if kind == TokenKind::HtmlTag && scratch.end_tag && scratch.name == "dt" {
            continue; // ignored
        }
        if !handle_inline_token(ctx, id, kind, &scratch, true) {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, format!("unexpected token inside <dt> at line {line}"));
        }
    };
    ctx.pop_node(id);
    status
}

/// `HRef(url)`: inline content until `</a>`. `url` was already read from
/// the originating `<a href="...">` start tag's options.
pub fn parse_href(ctx: &mut ParserContext, parent: NodeId, url: String) -> Status {
    let id = ctx.append_child(parent, DocNode::HRef(url));
    ctx.push_node(id);
    let status = loop {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Eos {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, "unexpected end of comment while inside <a>");
            break Status::Eos;
        }
        if kind == TokenKind::HtmlTag && scratch.end_tag && scratch.name == "a" {
            break Status::Ok;
        }
        handle_inline_token(ctx, id, kind, &scratch, true);
    };
    ctx.pop_node(id);
    status
}

/// Java-style `\link`: on any `WORD` token, a bare `}` closes the link;
/// a `}` embedded mid-word splits — the prefix is appended as a `Word`,
/// and the suffix is reported back via `leftover` for the caller to
/// re-inject into the enclosing paragraph (spec.md §4.6).
pub fn parse_link(ctx: &mut ParserContext, parent: NodeId, target: String, java_style: bool) -> (Status, Option<String>) {
    let id = ctx.append_child(parent, DocNode::Link(target));
    ctx.push_node(id);
    let mut leftover = None;
    let status = ctx.with_state(LexerState::Link, |ctx| loop {
        let (kind, scratch) = ctx.next_token();
        if kind == TokenKind::Eos {
            break if java_style {
                let line = ctx.current_line();
                ctx.diag(line, Severity::Warning, "unterminated \\javalink, expected a closing '}'");
                Status::Eos
            } else {
                Status::Eos
            };
        }
        if java_style && kind == TokenKind::Word {
            if scratch.name == "}" {
                break Status::Ok;
            }
            if let Some(pos) = scratch.name.find('}') {
                let (prefix, suffix) = scratch.name.split_at(pos);
                if !prefix.is_empty() {
                    ctx.append_child(id, DocNode::Word(prefix.to_string()));
                }
                leftover = Some(suffix[1..].to_string());
                break Status::Ok;
            }
            ctx.append_child(id, DocNode::Word(scratch.name.clone()));
            continue;
        }
        if java_style && kind == TokenKind::Command && scratch.name == "endlink" {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Warning, "\\endlink command found inside a \\javalink section");
            break Status::Ok;
        }
        if !java_style && kind == TokenKind::Command && scratch.name == "endlink" {
            break Status::Ok;
        }
        handle_inline_token(ctx, id, kind, &scratch, true);
    });
    ctx.pop_node(id);
    (status, leftover)
}
