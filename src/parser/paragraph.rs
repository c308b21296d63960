//! `Para` (spec.md §4.4 / §4.6): the central production. Every other block
//! production that "owns a body" ultimately delegates to this one.

use crate::ast::{DocNode, NodeId};
use crate::context::ParserContext;
use crate::diagnostics::Severity;
use crate::status::Status;
use crate::token::TokenKind;

use super::inline::handle_inline_token;
use super::{commands, html, lists};

/// Parses the content of `parent` (already pushed by the caller) as one
/// paragraph: every token not absorbed by the shared inline handler is
/// either delegated to a child production or ends the paragraph with a
/// status the caller interprets (spec.md §2 "Control flow", §4.8).
pub fn parse_para(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let depth = ctx.depth();
    loop {
        let (kind, scratch) = ctx.next_token();
        if handle_inline_token(ctx, parent, kind, &scratch, true) {
            continue;
        }
        match kind {
            TokenKind::Eos => {
                ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                return Status::Eos;
            }
            TokenKind::NewPara => {
                ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                return Status::NewPara;
            }
            TokenKind::ListItem => {
                ctx.last_list_indent = scratch.indent;
                ctx.last_list_is_enum = scratch.is_enum_list;

                if let Some(list_id) = ctx.find_auto_list_ancestor(parent) {
                    let outer_indent = match ctx.tree.get(list_id).unwrap().value() {
                        DocNode::AutoList { indent, .. } => *indent,
                        _ => unreachable!(),
                    };
                    if outer_indent >= scratch.indent {
                        // belongs to an enclosing list; bubble up unchanged.
                        ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                        return Status::ListItemToken;
                    }
                }

                let status = lists::parse_auto_list(ctx, parent, scratch.indent, scratch.is_enum_list);
                match status {
                    Status::SimpleSec => {
                        // The list ended because a simple-section command
                        // was seen; reparse it at this level (spec.md §4.6,
                        // mirroring the original's `goto reparsetoken`),
                        // looping in case the new section itself immediately
                        // bubbles another one.
                        let mut st = status;
                        while st == Status::SimpleSec {
                            let name = ctx.take_stashed_command().expect("Status::SimpleSec always stashes a command name");
                            st = commands::dispatch_command(ctx, parent, &name);
                        }
                        if st != Status::Ok {
                            ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                            return st;
                        }
                        continue;
                    }
                    Status::EndListToken => {
                        if scratch.indent > ctx.last_list_indent {
                            ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                            return Status::EndListToken;
                        }
                        continue;
                    }
                    _ => {
                        ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                        return status;
                    }
                }
            }
            TokenKind::EndList => {
                let belongs_here = ctx
                    .find_auto_list_ancestor(parent)
                    .map(|list_id| match ctx.tree.get(list_id).unwrap().value() {
                        DocNode::AutoList { indent, .. } => *indent >= scratch.indent,
                        _ => false,
                    })
                    .unwrap_or(false);
                ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                if belongs_here {
                    return Status::EndListToken;
                }
                let line = ctx.current_line();
                ctx.diag(line, Severity::Warning, "end of list marker found without a matching list");
                return Status::EndListToken;
            }
            TokenKind::Command => {
                let id = crate::tables::lookup_command(&scratch.name);
                if id.is_simple_section_starter() && ctx.inside_ancestor_simple_sect(parent) {
                    ctx.stash_command(scratch.name.clone());
                    ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                    return Status::SimpleSec;
                }
                if scratch.name == "li" && ctx.inside_simple_list_item(parent) {
                    ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                    return Status::ListItem;
                }
                // A simple-section command whose own body ran into another
                // simple-section command bubbles `Status::SimpleSec` with
                // the new command's name stashed; reparse it right here
                // (spec.md §4.7, mirroring the original's `goto
                // reparsetoken`) so siblings like `\param`/`\return` land
                // under the same paragraph rather than splitting it.
                let mut status = commands::dispatch_command(ctx, parent, &scratch.name);
                while status == Status::SimpleSec {
                    let name = ctx.take_stashed_command().expect("Status::SimpleSec always stashes a command name");
                    status = commands::dispatch_command(ctx, parent, &name);
                }
                if status == Status::Ok {
                    continue;
                }
                ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                return status;
            }
            TokenKind::HtmlTag => {
                let status = html::dispatch_tag(ctx, parent, &scratch);
                if status == Status::Ok {
                    continue;
                }
                ctx.close_styles_at_or_above(depth, parent, ctx.current_line());
                return status;
            }
            TokenKind::Symbol => {
                let line = ctx.current_line();
                ctx.diag(line, Severity::Warning, format!("unsupported symbol &{}; ", scratch.name));
                continue;
            }
            TokenKind::Word | TokenKind::Whitespace | TokenKind::Url => unreachable!("absorbed by the inline handler"),
        }
    }
}
