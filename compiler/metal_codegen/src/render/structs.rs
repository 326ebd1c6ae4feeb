//! Struct definitions, string constants and globals.

use std::fmt::Write as _;

use metal_ir::{GlobalVar, NodeKind, StringConstant, StructDef, StructMember};
use metal_template::{Bindings, ConstructId, TemplateKey};

use super::Node;

pub(super) fn identity(def: &StructDef) -> ConstructId {
    ConstructId::named(NodeKind::StructDef.as_str(), def.name.as_str())
}

/// Members keep declaration order: it is the memory layout.
pub(super) fn bindings(def: &StructDef) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("name", def.name.as_str())
        .seq("members", def.members.iter().map(Node::Member))
}

pub(super) fn member_key(member: &StructMember) -> TemplateKey<'static> {
    if member.array_len.is_some() {
        TemplateKey::Frame("struct_array_member")
    } else {
        TemplateKey::Frame("struct_member")
    }
}

pub(super) fn member_bindings(member: &StructMember) -> Bindings<Node<'_>> {
    let bindings = Bindings::new()
        .text("type", member.ty.as_str())
        .text("name", member.name.as_str());
    match member.array_len {
        Some(len) => bindings.text("size", len.to_string()),
        None => bindings,
    }
}

pub(super) fn constant_identity(constant: &StringConstant) -> ConstructId {
    ConstructId::named(NodeKind::StringConstant.as_str(), constant.name.as_str())
}

/// `length` is the byte length of the unescaped value.
pub(super) fn constant_bindings(constant: &StringConstant) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("name", constant.name.as_str())
        .text("length", constant.value.len().to_string())
        .text("value", escape_c(&constant.value))
}

pub(super) fn global_identity(global: &GlobalVar) -> ConstructId {
    ConstructId::named(NodeKind::Global.as_str(), global.name.as_str())
}

pub(super) fn global_bindings(global: &GlobalVar) -> Bindings<Node<'_>> {
    Bindings::new()
        .text("type", global.ty.as_str())
        .text("name", global.name.as_str())
        .flag("has_init", !global.init.is_empty())
        .seq("inits", global.init.iter().map(Node::Expr))
}

/// Escape `value` for a C string literal.
///
/// Bytes outside printable ASCII become three-digit octal escapes, which
/// cannot swallow a following digit the way `\x` escapes do.
pub(super) fn escape_c(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b' '..=b'~' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out
}
