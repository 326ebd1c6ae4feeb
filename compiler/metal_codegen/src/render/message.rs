//! Message sends.

use metal_ir::{Expr, MessageSend, NodeKind};
use metal_template::{Bindings, ConstructId};

use super::structs::escape_c;
use super::{stmts, Node};
use crate::runtime::TYPE_DESCRIPTOR_PREFIX;

pub(super) fn identity(send: &MessageSend) -> ConstructId {
    ConstructId::named(NodeKind::MessageSend.as_str(), send.selector.as_str())
}

/// `slots` sizes the payload arrays; it is never zero so the frame stays
/// valid C for a message without parameters.
pub(super) fn bindings<'a>(func: &'a str, send: &'a MessageSend) -> Bindings<Node<'a>> {
    let nparms = send.args.len();
    Bindings::new()
        .node("receiver", Node::Expr(&send.receiver))
        .text("selector", escape_c(&send.selector))
        .text("selector_length", send.selector.len().to_string())
        .text("nparms", nparms.to_string())
        .text("slots", nparms.max(1).to_string())
        .seq(
            "msg_parms",
            send.args
                .iter()
                .enumerate()
                .map(|(index, value)| Node::MsgParm { index, value }),
        )
        .seq("on_pass", stmts(func, &send.on_pass))
        .seq("on_fail", stmts(func, &send.on_fail))
}

/// Each payload value is copied into a temporary `__parmN` of its type, so
/// any expression can be sent.
pub(super) fn parm_bindings(index: usize, value: &Expr) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("index", index.to_string())
        .text("type", value.ty.as_str())
        .text("type_desc", format!("{TYPE_DESCRIPTOR_PREFIX}{}", value.ty))
        .node("value", Node::Expr(value))
}
