//! Construct renderers.
//!
//! [`Node`] is a borrowed view of everything a backend can render: AST
//! items, the pieces the calling convention derives from them (signatures,
//! argument records, parameter aliases) and the runtime preamble. Each
//! submodule describes one family of constructs: which template it uses,
//! how to name it in a diagnostic and what it binds.

mod call;
mod expr;
mod function;
mod message;
mod module;
mod runtime;
mod structs;

use metal_ir::{
    CallArg, Expr, FuncDef, GlobalVar, Param, Stmt, StringConstant, StructDef, StructMember,
};
use metal_template::{Bindings, Construct, ConstructId, TemplateKey};

use crate::runtime::{FnSignature, RuntimeContract, RuntimeField, RuntimeItem};

pub(crate) use module::render_module;

/// Every frame a backend must define.
pub const REQUIRED_FRAMES: &[&str] = &[
    "module",
    "preamble",
    "rte_struct",
    "rte_field",
    "rte_fn_type",
    "rte_extern",
    "struct",
    "struct_member",
    "struct_array_member",
    "string_constant",
    "global_struct",
    "func_signature",
    "func_declaration",
    "func_definition",
    "func_args_record",
    "func_inbound_parm",
    "func_outbound_parm",
    "func_record_local",
    "func_local",
    "func_call",
    "func_call_pred",
    "func_call_outbound_parm",
    "func_call_inbound_parm",
    "func_pass",
    "func_fail",
    "msg_send",
    "msg_parm",
];

/// Statements of `body` as nodes of function `func`.
pub(crate) fn stmts<'a>(func: &'a str, body: &'a [Stmt]) -> impl Iterator<Item = Node<'a>> {
    body.iter().map(move |stmt| Node::Stmt { func, stmt })
}

/// A renderable construct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<'a> {
    /// A whole compilation unit whose sections are already rendered.
    Unit(Box<module::Unit<'a>>),
    Preamble(&'a RuntimeContract),
    RuntimeItem(&'a RuntimeItem),
    RuntimeField(&'a RuntimeField),
    RuntimeExtern(&'a FnSignature),
    Struct(&'a StructDef),
    Member(&'a StructMember),
    Constant(&'a StringConstant),
    Global(&'a GlobalVar),
    /// The argument record of a function.
    ArgsRecord(&'a FuncDef),
    /// An outbound parameter as a member of its argument record.
    RecordField(&'a Param),
    FuncDecl(&'a FuncDef),
    FuncDef(&'a FuncDef),
    /// `named` names the argument-record parameter, as a definition needs.
    Signature {
        func: &'a FuncDef,
        named: bool,
    },
    InboundParam(&'a Param),
    /// Local alias of an outbound parameter into the argument record.
    OutboundAlias {
        func: &'a str,
        param: &'a Param,
    },
    /// A statement in the body of `func`.
    Stmt {
        func: &'a str,
        stmt: &'a Stmt,
    },
    /// The argument record a function declares for a callee.
    RecordLocal(&'a str),
    CallArg {
        caller: &'a str,
        callee: &'a str,
        arg: &'a CallArg,
    },
    MsgParm {
        index: usize,
        value: &'a Expr,
    },
    Expr(&'a Expr),
}

impl Construct for Node<'_> {
    fn key(&self) -> TemplateKey<'_> {
        match self {
            Node::Unit(_) => TemplateKey::Frame("module"),
            Node::Preamble(_) => TemplateKey::Frame("preamble"),
            Node::RuntimeItem(item) => runtime::item_key(item),
            Node::RuntimeField(_) => TemplateKey::Frame("rte_field"),
            Node::RuntimeExtern(_) => TemplateKey::Frame("rte_extern"),
            Node::Struct(_) => TemplateKey::Frame("struct"),
            Node::Member(member) => structs::member_key(member),
            Node::Constant(_) => TemplateKey::Frame("string_constant"),
            Node::Global(_) => TemplateKey::Frame("global_struct"),
            Node::ArgsRecord(_) => TemplateKey::Frame("func_args_record"),
            Node::RecordField(_) => TemplateKey::Frame("struct_member"),
            Node::FuncDecl(_) => TemplateKey::Frame("func_declaration"),
            Node::FuncDef(_) => TemplateKey::Frame("func_definition"),
            Node::Signature { .. } => TemplateKey::Frame("func_signature"),
            Node::InboundParam(_) => TemplateKey::Frame("func_inbound_parm"),
            Node::OutboundAlias { .. } => TemplateKey::Frame("func_outbound_parm"),
            Node::Stmt { stmt, .. } => call::stmt_key(stmt),
            Node::RecordLocal(_) => TemplateKey::Frame("func_record_local"),
            Node::CallArg { arg, .. } => call::arg_key(arg),
            Node::MsgParm { .. } => TemplateKey::Frame("msg_parm"),
            Node::Expr(expr) => expr::key(expr),
        }
    }

    fn identity(&self) -> ConstructId {
        match self {
            Node::Unit(unit) => module::identity(unit),
            Node::Preamble(_) => ConstructId::new("runtime preamble"),
            Node::RuntimeItem(item) => ConstructId::named("runtime type", item.name()),
            Node::RuntimeField(field) => ConstructId::named("runtime field", field.name),
            Node::RuntimeExtern(sig) => ConstructId::named("runtime function", sig.name),
            Node::Struct(def) => structs::identity(def),
            Node::Member(member) => ConstructId::named("member", member.name.as_str()),
            Node::Constant(constant) => structs::constant_identity(constant),
            Node::Global(global) => structs::global_identity(global),
            Node::ArgsRecord(func) => {
                ConstructId::named("argument record", format!("{}_args", func.name))
            }
            Node::RecordField(param) | Node::InboundParam(param) => {
                ConstructId::named("parameter", param.name.as_str())
            }
            Node::OutboundAlias { param, .. } => {
                ConstructId::named("outbound parameter", param.name.as_str())
            }
            Node::FuncDecl(func) | Node::FuncDef(func) | Node::Signature { func, .. } => {
                function::identity(func)
            }
            Node::Stmt { stmt, .. } => call::stmt_identity(stmt),
            Node::RecordLocal(callee) => {
                ConstructId::named("argument record", format!("{callee}_args"))
            }
            Node::CallArg { callee, .. } => ConstructId::named("call argument", *callee),
            Node::MsgParm { index, .. } => ConstructId::named("message parameter", index.to_string()),
            Node::Expr(expr) => expr::identity(expr),
        }
    }

    fn bindings(&self) -> Bindings<Self> {
        match self {
            Node::Unit(unit) => module::bindings(unit),
            Node::Preamble(contract) => runtime::preamble_bindings(*contract),
            Node::RuntimeItem(item) => runtime::item_bindings(*item),
            Node::RuntimeField(field) => runtime::field_bindings(*field),
            Node::RuntimeExtern(sig) => runtime::extern_bindings(*sig),
            Node::Struct(def) => structs::bindings(*def),
            Node::Member(member) => structs::member_bindings(*member),
            Node::Constant(constant) => structs::constant_bindings(*constant),
            Node::Global(global) => structs::global_bindings(*global),
            Node::ArgsRecord(func) => function::record_bindings(*func),
            Node::RecordField(param) | Node::InboundParam(param) => {
                function::param_bindings(*param)
            }
            Node::FuncDecl(func) => function::declaration_bindings(*func),
            Node::FuncDef(func) => function::definition_bindings(*func),
            Node::Signature { func, named } => function::signature_bindings(*func, *named),
            Node::OutboundAlias { func, param } => function::alias_bindings(*func, *param),
            Node::Stmt { func, stmt } => call::stmt_bindings(*func, *stmt),
            Node::RecordLocal(callee) => Bindings::new().text("name", *callee),
            Node::CallArg {
                caller,
                callee,
                arg,
            } => call::arg_bindings(*caller, *callee, *arg),
            Node::MsgParm { index, value } => message::parm_bindings(*index, *value),
            Node::Expr(expr) => expr::bindings(*expr),
        }
    }
}
