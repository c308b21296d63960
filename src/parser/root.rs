//! The top-level compound productions (spec.md §4.6): `Root`, `Section`,
//! `Internal`, `Language`, and `SecRefList`/`SecRefItem`. Grounded on
//! `DocRoot::parse`, `DocSection::parse`, `DocInternal::parse`,
//! `DocLanguage::parse`, and `DocSecRefList::parse` in
//! `examples/original_source/src/docparser.cpp`.

use crate::ast::DocNode;
use crate::ast::NodeId;
use crate::context::ParserContext;
use crate::diagnostics::Severity;
use crate::status::Status;
use crate::token::TokenKind;

use super::paragraph::parse_para;

/// Builds `Para` children of `parent` until a structural status (end of
/// stream, a new section, `\internal`) ends the run. Any `ListItemToken`
/// that escapes all the way here is a genuine error: no enclosing
/// production claimed it (spec.md §4.6's note on `Root`/`Section`/
/// `Internal` all sharing this loop).
///
/// Unlike the original, empty paragraphs are not elided from the tree: a
/// `Para` with no children is a harmless leftover rather than a structural
/// defect, and removing an already-appended child from the middle of a
/// sibling list is not something this crate's arena wrapper exposes
/// cheaply. Recorded as a deliberate simplification in DESIGN.md.
fn parse_paragraphs(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let mut status;
    loop {
        let para_id = ctx.append_child(parent, DocNode::Para);
        ctx.push_node(para_id);
        status = parse_para(ctx, para_id);
        ctx.pop_node(para_id);

        if status == Status::ListItemToken {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Error, format!("invalid list item found at line {line}"));
        }
        if matches!(status, Status::Eos | Status::Section | Status::Internal) {
            break;
        }
    }
    status
}

/// `Root`: spec.md §4.6. Paragraphs, then any number of level-1 sections,
/// then (at most) one `Internal` block.
pub fn parse_root(ctx: &mut ParserContext) -> Status {
    let root_id = ctx.root_id();
    ctx.push_node(root_id);
    let mut status = parse_paragraphs(ctx, root_id);

    while status == Status::Section {
        let (level, id, title) = ctx.take_stashed_section().expect("Status::Section always carries pending section data");
        if level != 1 {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Error, format!("expected level 1 section, found a section with level {level} at line {line}"));
            break;
        }
        status = parse_section(ctx, root_id, level, id, title);
    }

    if status == Status::Internal {
        let internal_id = ctx.append_child(root_id, DocNode::Internal);
        ctx.push_node(internal_id);
        status = parse_internal_body(ctx, internal_id);
        ctx.pop_node(internal_id);
    }

    ctx.pop_node(root_id);
    status
}

/// `Section(level, id, title)`: spec.md §3/§4.6. A section at level `L`
/// accepts only level `L+1` sections as children; a sibling at level `L`
/// terminates it (bubbling `Status::Section` back up with the pending data
/// intact for the caller to consume); anything else is a level-mismatch
/// diagnostic that stops the parse outright, mirroring the original's
/// `retval=0` on mismatch.
pub fn parse_section(ctx: &mut ParserContext, parent: NodeId, level: u8, id: String, title: Option<String>) -> Status {
    let sec_id = ctx.append_child(parent, DocNode::Section { level, id, title });
    ctx.push_node(sec_id);
    let mut status = parse_paragraphs(ctx, sec_id);

    while status == Status::Section {
        let (child_level, child_id, child_title) =
            ctx.take_stashed_section().expect("Status::Section always carries pending section data");
        if child_level == level {
            // Sibling section: bubble up unconsumed for the enclosing
            // Section/Root loop to pick up.
            ctx.stash_section(child_level, child_id, child_title);
            break;
        }
        if child_level != level + 1 {
            let line = ctx.current_line();
            ctx.diag(
                line,
                Severity::Error,
                format!("expected level {} section, found a section with level {child_level} at line {line}", level + 1),
            );
            status = Status::Eos;
            break;
        }
        status = parse_section(ctx, sec_id, child_level, child_id, child_title);
    }

    ctx.pop_node(sec_id);
    status
}

/// `Internal`: like `Section` but demands level-1 children and treats a
/// second `\internal` command found inside as a (diagnosed) no-op rather
/// than nesting.
fn parse_internal_body(ctx: &mut ParserContext, internal_id: NodeId) -> Status {
    let mut status = parse_paragraphs(ctx, internal_id);

    while status == Status::Section {
        let (level, id, title) = ctx.take_stashed_section().expect("Status::Section always carries pending section data");
        if level != 1 {
            let line = ctx.current_line();
            ctx.diag(line, Severity::Error, format!("expected level 1 section, found a section with level {level} at line {line}"));
            break;
        }
        status = parse_section(ctx, internal_id, level, id, title);
    }

    if status == Status::Internal {
        let line = ctx.current_line();
        ctx.diag(line, Severity::Error, format!("\\internal command found inside internal section at line {line}"));
    }
    status
}

/// `Language(lang)`: one or more `Para` children, continuing for as long as
/// a paragraph ends with `NEWPARA` (spec.md §4.6).
pub fn parse_language(ctx: &mut ParserContext, parent: NodeId, lang: String) -> Status {
    let lang_id = ctx.append_child(parent, DocNode::Language(lang));
    ctx.push_node(lang_id);
    let mut status;
    loop {
        let para_id = ctx.append_child(lang_id, DocNode::Para);
        ctx.push_node(para_id);
        status = parse_para(ctx, para_id);
        ctx.pop_node(para_id);
        if status != Status::NewPara {
            break;
        }
    }
    ctx.pop_node(lang_id);
    status
}

/// `SecRefList`: opened by `\secreflist`. Consumes `\secrefitem <target>`
/// entries until `\endsecreflist`, end of stream, or an unrelated token.
pub fn parse_sec_ref_list(ctx: &mut ParserContext, parent: NodeId) {
    let list_id = ctx.append_child(parent, DocNode::SecRefList);
    ctx.push_node(list_id);

    let mut tok = ctx.next_token();
    while tok.0 == TokenKind::Whitespace {
        tok = ctx.next_token();
    }

    loop {
        match tok.0 {
            TokenKind::Eos => break,
            TokenKind::Command => {
                let id = crate::tables::lookup_command(&tok.1.name);
                match id {
                    crate::tables::CommandId::SecRefItem => {
                        let (ws, _) = ctx.next_token();
                        if ws != TokenKind::Whitespace {
                            let line = ctx.current_line();
                            ctx.diag(line, Severity::Error, format!("expected whitespace after \\secrefitem command at line {line}"));
                        } else {
                            super::single_line::parse_sec_ref_item(ctx, list_id);
                        }
                    }
                    crate::tables::CommandId::EndSecRefList => break,
                    _ => {
                        let line = ctx.current_line();
                        ctx.diag(line, Severity::Error, format!("illegal command \\{} as part of a \\secreflist at line {line}", tok.1.name));
                        break;
                    }
                }
            }
            _ => {
                let line = ctx.current_line();
                ctx.diag(line, Severity::Error, format!("unexpected token inside section reference list at line {line}"));
                break;
            }
        }
        tok = ctx.next_token();
    }

    ctx.pop_node(list_id);
}
