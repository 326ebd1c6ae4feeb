//! Expressions.
//!
//! Every expression form renders through the operator table, keyed by the
//! node's type category. Nesting is taken as given: nothing is reordered or
//! parenthesized here.

use metal_ir::{Expr, ExprKind};
use metal_template::{Bindings, ConstructId, OperatorKey, TemplateKey};

use super::Node;

fn symbol(expr: &Expr) -> &'static str {
    match &expr.kind {
        ExprKind::Binary { op, .. } => op.as_symbol(),
        ExprKind::Unary { op, .. } => op.as_symbol(),
        ExprKind::Paren(_) => "paren",
        ExprKind::Cast(_) => "cast",
        ExprKind::IdRef(_) => "id_ref",
        ExprKind::IdVal(_) => "id_val",
        ExprKind::Literal(_) => "lit",
        ExprKind::Sizeof(_) => "sizeof",
        ExprKind::IsNull(_) => "isnull",
    }
}

pub(super) fn key(expr: &Expr) -> TemplateKey<'_> {
    TemplateKey::Operator {
        category: &expr.ty,
        symbol: symbol(expr),
    }
}

pub(super) fn identity(expr: &Expr) -> ConstructId {
    let key = OperatorKey::new(expr.ty.as_str(), symbol(expr));
    match &expr.kind {
        ExprKind::Binary { .. } => ConstructId::operator("binary op", key),
        ExprKind::Unary { .. } => ConstructId::operator("unary op", key),
        ExprKind::IdRef(name) | ExprKind::IdVal(name) => ConstructId {
            name: Some(name.clone()),
            ..ConstructId::operator("identifier", key)
        },
        _ => ConstructId::operator("expression", key),
    }
}

/// Properties bind only `value`; they have no right operand.
pub(super) fn bindings(expr: &Expr) -> Bindings<Node<'_>> {
    match &expr.kind {
        ExprKind::Binary { left, right, .. } => Bindings::new()
            .node("left", Node::Expr(left))
            .node("right", Node::Expr(right)),
        ExprKind::Unary { operand, .. } => Bindings::new().node("operand", Node::Expr(operand)),
        ExprKind::Paren(child) => Bindings::new().node("child", Node::Expr(child)),
        ExprKind::Cast(inner) => Bindings::new()
            .text("new_type", expr.ty.as_str())
            .node("old_value", Node::Expr(inner)),
        ExprKind::IdRef(name) | ExprKind::IdVal(name) => {
            Bindings::new().text("name", name.as_str())
        }
        ExprKind::Literal(text) => Bindings::new().text("value", text.as_str()),
        ExprKind::Sizeof(inner) | ExprKind::IsNull(inner) => {
            Bindings::new().node("value", Node::Expr(inner))
        }
    }
}
