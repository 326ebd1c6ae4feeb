//! Statements: calls, predicate calls, locals, pass and fail.

use metal_ir::{CallArg, FuncCall, NodeKind, Stmt};
use metal_template::{Bindings, ConstructId, TemplateKey};

use super::{message, stmts, Node};

pub(super) fn stmt_key(stmt: &Stmt) -> TemplateKey<'static> {
    TemplateKey::Frame(match stmt {
        Stmt::Call(_) => "func_call",
        Stmt::Predicate(_) => "func_call_pred",
        Stmt::Send(_) => "msg_send",
        Stmt::Local(_) => "func_local",
        Stmt::Pass => "func_pass",
        Stmt::Fail => "func_fail",
    })
}

pub(super) fn stmt_identity(stmt: &Stmt) -> ConstructId {
    match stmt {
        Stmt::Call(call) => ConstructId::named(NodeKind::FuncCall.as_str(), call.name.as_str()),
        Stmt::Predicate(pred) => ConstructId::named(
            NodeKind::FuncCallPredicate.as_str(),
            pred.call.name.as_str(),
        ),
        Stmt::Send(send) => message::identity(send),
        Stmt::Local(local) => ConstructId::named(NodeKind::LocalDecl.as_str(), local.name.as_str()),
        Stmt::Pass => ConstructId::new("pass"),
        Stmt::Fail => ConstructId::new("fail"),
    }
}

pub(super) fn stmt_bindings<'a>(func: &'a str, stmt: &'a Stmt) -> Bindings<Node<'a>> {
    match stmt {
        Stmt::Call(call) => call_bindings(func, call),
        // Both branches are always bound: an empty one still renders as an
        // empty block.
        Stmt::Predicate(pred) => call_bindings(func, &pred.call)
            .seq("on_pass", stmts(func, &pred.on_pass))
            .seq("on_fail", stmts(func, &pred.on_fail)),
        Stmt::Send(send) => message::bindings(func, send),
        Stmt::Local(local) => {
            let bindings = Bindings::new()
                .text("type", local.ty.as_str())
                .text("name", local.name.as_str())
                .flag("is_typed_ref", local.is_typed_ref)
                .flag("has_init", local.init.is_some());
            match &local.init {
                Some(init) => bindings.node("expr", Node::Expr(init)),
                None => bindings,
            }
        }
        Stmt::Pass | Stmt::Fail => Bindings::new(),
    }
}

fn call_bindings<'a>(caller: &'a str, call: &'a FuncCall) -> Bindings<Node<'a>> {
    Bindings::new().text("name", call.name.as_str()).seq(
        "args",
        call.args.iter().map(move |arg| Node::CallArg {
            caller,
            callee: &call.name,
            arg,
        }),
    )
}

pub(super) fn arg_key(arg: &CallArg) -> TemplateKey<'static> {
    match arg {
        CallArg::Record => TemplateKey::Frame("func_call_outbound_parm"),
        CallArg::Inbound(_) => TemplateKey::Frame("func_call_inbound_parm"),
    }
}

/// A function calling itself passes on the record pointer it was given;
/// any other callee gets the address of the caller's local record.
pub(super) fn arg_bindings<'a>(
    caller: &'a str,
    callee: &'a str,
    arg: &'a CallArg,
) -> Bindings<Node<'a>> {
    match arg {
        CallArg::Record => Bindings::new()
            .text("func_name", callee)
            .flag("own_record", caller == callee),
        CallArg::Inbound(expr) => Bindings::new().node("leaf", Node::Expr(expr)),
    }
}
