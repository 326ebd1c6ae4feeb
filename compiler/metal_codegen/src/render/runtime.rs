//! The runtime preamble, rendered from the contract descriptors.

use metal_template::{Bindings, TemplateKey};

use super::Node;
use crate::runtime::{FnSignature, RuntimeContract, RuntimeField, RuntimeItem};

pub(super) fn preamble_bindings(contract: &RuntimeContract) -> Bindings<Node<'_>> {
    Bindings::new()
        .seq("rte_types", contract.items.iter().map(Node::RuntimeItem))
        .seq("rte_funcs", contract.externs.iter().map(Node::RuntimeExtern))
}

pub(super) fn item_key(item: &RuntimeItem) -> TemplateKey<'static> {
    match item {
        RuntimeItem::Struct { .. } => TemplateKey::Frame("rte_struct"),
        RuntimeItem::FnType(_) => TemplateKey::Frame("rte_fn_type"),
    }
}

pub(super) fn item_bindings(item: &RuntimeItem) -> Bindings<Node<'_>> {
    match item {
        RuntimeItem::Struct { name, doc, fields } => Bindings::new()
            .text("name", *name)
            .text("doc", *doc)
            .seq("fields", fields.iter().map(Node::RuntimeField)),
        RuntimeItem::FnType(sig) => signature(sig).text("doc", sig.doc),
    }
}

pub(super) fn field_bindings(field: &RuntimeField) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("type", field.ty)
        .text("name", field.name)
        .flag("flexible", field.flexible)
}

pub(super) fn extern_bindings(sig: &FnSignature) -> Bindings<Node<'_>> {
    signature(sig)
}

fn signature<'a>(sig: &FnSignature) -> Bindings<Node<'a>> {
    Bindings::new()
        .text("ret", sig.ret)
        .text("name", sig.name)
        .text("params", sig.param_list())
}
