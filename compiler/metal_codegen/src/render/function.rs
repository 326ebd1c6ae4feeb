//! Function declarations, definitions and argument records.
//!
//! Calls go through a per-function argument record `Name_args`. The caller
//! owns the record, declared as a local of the same name; the callee
//! receives a pointer to it first, then its inbound parameters by value.
//! Outbound parameters are record members the callee writes through a local
//! alias.

use metal_ir::{FuncDef, NodeKind, Param};
use metal_template::{Bindings, ConstructId};

use super::{stmts, Node};

pub(super) fn identity(func: &FuncDef) -> ConstructId {
    ConstructId::named(NodeKind::FuncDef.as_str(), func.name.as_str())
}

/// Declarations and definitions share the signature template; only a
/// definition names the record parameter.
pub(super) fn signature_bindings(func: &FuncDef, named: bool) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("name", func.name.as_str())
        .flag("named", named)
        .seq("func_parms", func.inbound().map(Node::InboundParam))
}

pub(super) fn declaration_bindings(func: &FuncDef) -> Bindings<Node<'_>> {
    Bindings::new().node("signature", Node::Signature { func, named: false })
}

pub(super) fn definition_bindings(func: &FuncDef) -> Bindings<Node<'_>> {
    Bindings::new()
        .node("signature", Node::Signature { func, named: true })
        .seq(
            "outbound_parms",
            func.outbound().map(|param| Node::OutboundAlias {
                func: &func.name,
                param,
            }),
        )
        .seq("records", func.record_callees().into_iter().map(Node::RecordLocal))
        .seq("body", stmts(&func.name, &func.body))
        .flag("falls_through", func.falls_through())
}

/// A function without outbound parameters still gets a record, so every
/// call site can pass one.
pub(super) fn record_bindings(func: &FuncDef) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("name", func.name.as_str())
        .flag("has_outbound", func.outbound().next().is_some())
        .seq("record_fields", func.outbound().map(Node::RecordField))
}

pub(super) fn param_bindings(param: &Param) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("type", param.ty.as_str())
        .text("name", param.name.as_str())
}

pub(super) fn alias_bindings<'a>(func: &'a str, param: &'a Param) -> Bindings<Node<'a>> {
    param_bindings(param).text("func_name", func)
}
