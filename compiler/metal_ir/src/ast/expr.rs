//! Expression nodes.
//!
//! Nesting is already precedence-correct when it arrives: every
//! parenthesization the target needs is an explicit [`ExprKind::Paren`] node.

use super::operators::{BinaryOp, UnaryOp};

/// A typed expression.
///
/// `ty` is the type category the resolver picked for operator selection
/// (`string`, `struct`, `word`, a user type name, ...). For operator nodes it
/// names the operand category, not the result type: `a == b` on strings
/// carries `string`. For casts it is also the target type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: String,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Paren(Box<Expr>),
    /// Conversion of the inner value to `Expr::ty`.
    Cast(Box<Expr>),
    /// Identifier accessed through a reference.
    IdRef(String),
    /// Identifier accessed by value.
    IdVal(String),
    /// Literal text, already in target syntax.
    Literal(String),
    /// `x.sizeof`
    Sizeof(Box<Expr>),
    /// `x.isnull`
    IsNull(Box<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind, ty: impl Into<String>) -> Self {
        Expr {
            kind,
            ty: ty.into(),
        }
    }

    pub fn id_val(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(ExprKind::IdVal(name.into()), ty)
    }

    pub fn id_ref(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(ExprKind::IdRef(name.into()), ty)
    }

    pub fn literal(text: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(text.into()), ty)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let ty = operand.ty.clone();
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    /// Parenthesize `inner`, keeping its category.
    pub fn paren(inner: Expr) -> Self {
        let ty = inner.ty.clone();
        Self::new(ExprKind::Paren(Box::new(inner)), ty)
    }

    pub fn cast(inner: Expr, to: impl Into<String>) -> Self {
        Self::new(ExprKind::Cast(Box::new(inner)), to)
    }

    /// `inner.sizeof`, resolved against the operand's category.
    pub fn sizeof(inner: Expr) -> Self {
        let ty = inner.ty.clone();
        Self::new(ExprKind::Sizeof(Box::new(inner)), ty)
    }

    /// `inner.isnull`, resolved against the operand's category.
    pub fn is_null(inner: Expr) -> Self {
        let ty = inner.ty.clone();
        Self::new(ExprKind::IsNull(Box::new(inner)), ty)
    }

    /// Nesting depth of this expression tree (a leaf is 1).
    pub fn depth(&self) -> usize {
        match &self.kind {
            ExprKind::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            ExprKind::Unary { operand: inner, .. }
            | ExprKind::Paren(inner)
            | ExprKind::Cast(inner)
            | ExprKind::Sizeof(inner)
            | ExprKind::IsNull(inner) => 1 + inner.depth(),
            ExprKind::IdRef(_) | ExprKind::IdVal(_) | ExprKind::Literal(_) => 1,
        }
    }
}
