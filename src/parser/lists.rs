//! Auto-list and simple-list productions (spec.md §4.6).

use crate::ast::DocNode;
use crate::ast::NodeId;
use crate::context::ParserContext;
use crate::status::Status;

use super::paragraph::parse_para;

/// `AutoListItem`: wraps exactly one `Para`.
fn parse_auto_list_item(ctx: &mut ParserContext, list_id: NodeId) -> Status {
    let item_id = ctx.append_child(list_id, DocNode::AutoListItem);
    ctx.push_node(item_id);
    let para_id = ctx.append_child(item_id, DocNode::Para);
    ctx.push_node(para_id);
    let status = parse_para(ctx, para_id);
    ctx.pop_node(para_id);
    ctx.pop_node(item_id);
    status
}

/// `AutoList`: builds `AutoListItem` children until a `LISTITEM` at a
/// different `(indent, isEnumerated)` stops matching (spec.md §4.6).
/// Returns the status that ended the list, for the caller (`parse_para`'s
/// `ListItem` branch) to interpret.
pub fn parse_auto_list(ctx: &mut ParserContext, parent: NodeId, indent: i32, is_enum: bool) -> Status {
    let list_id = ctx.append_child(parent, DocNode::AutoList { indent, is_enumerated: is_enum });
    ctx.push_node(list_id);
    let mut status;
    loop {
        status = parse_auto_list_item(ctx, list_id);
        if status == Status::ListItemToken && ctx.last_list_indent == indent && ctx.last_list_is_enum == is_enum {
            continue;
        }
        break;
    }
    ctx.pop_node(list_id);
    status
}

/// `SimpleListItem`: wraps exactly one `Para`.
fn parse_simple_list_item(ctx: &mut ParserContext, list_id: NodeId) -> Status {
    let item_id = ctx.append_child(list_id, DocNode::SimpleListItem);
    ctx.push_node(item_id);
    let para_id = ctx.append_child(item_id, DocNode::Para);
    ctx.push_node(para_id);
    let status = parse_para(ctx, para_id);
    ctx.pop_node(para_id);
    ctx.pop_node(item_id);
    status
}

/// `SimpleList`: opened by the `\li` command; builds `SimpleListItem`
/// children while each item's paragraph keeps returning `ListItem` (i.e.
/// the body hit another `\li`).
pub fn parse_simple_list(ctx: &mut ParserContext, parent: NodeId) -> Status {
    let list_id = ctx.append_child(parent, DocNode::SimpleList);
    ctx.push_node(list_id);
    let mut status;
    loop {
        status = parse_simple_list_item(ctx, list_id);
        if status == Status::ListItem {
            continue;
        }
        break;
    }
    ctx.pop_node(list_id);
    status
}
