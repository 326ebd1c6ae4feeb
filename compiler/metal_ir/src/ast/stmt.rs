//! Statements of a function body.
//!
//! There is no statement-list node: bodies and branch blocks are plain
//! `Vec<Stmt>` sequences.

use super::expr::Expr;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    Call(FuncCall),
    Predicate(FuncCallPredicate),
    Send(MessageSend),
    Local(LocalDecl),
    /// Report success.
    Pass,
    /// Report failure.
    Fail,
}

/// A plain call whose boolean result is discarded.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncCall {
    pub name: String,
    pub args: Vec<CallArg>,
}

impl FuncCall {
    pub fn new(name: impl Into<String>, args: Vec<CallArg>) -> Self {
        FuncCall {
            name: name.into(),
            args,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallArg {
    /// Pointer to the callee's argument record. The caller's definition
    /// declares one record per such callee; a function calling itself
    /// passes the record it was given.
    Record,
    Inbound(Expr),
}

/// A call that branches on its boolean result.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncCallPredicate {
    pub call: FuncCall,
    pub on_pass: Vec<Stmt>,
    pub on_fail: Vec<Stmt>,
}

/// Dynamic dispatch of `selector` to the handler registered for the
/// receiver's type, branching on the handler's result.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageSend {
    /// Expression yielding the receiver's type descriptor pointer.
    pub receiver: Expr,
    pub selector: String,
    /// Payload values, copied into temporaries of their type category.
    pub args: Vec<Expr>,
    pub on_pass: Vec<Stmt>,
    pub on_fail: Vec<Stmt>,
}

/// A local variable declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDecl {
    pub name: String,
    pub ty: String,
    /// Declared as a typed reference (pointer) rather than a value.
    pub is_typed_ref: bool,
    pub init: Option<Expr>,
}
