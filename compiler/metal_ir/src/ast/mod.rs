//! AST node definitions.

mod expr;
mod items;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind};
pub use items::{FuncDef, GlobalVar, Module, Param, ParamDirection, StringConstant, StructDef, StructMember};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{CallArg, FuncCall, FuncCallPredicate, LocalDecl, MessageSend, Stmt};

/// Kind tag of a node, used to identify the offending construct in errors.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Module,
    StructDef,
    FuncDef,
    FuncCall,
    FuncCallPredicate,
    MessageSend,
    LocalDecl,
    Expr,
    StringConstant,
    Global,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::StructDef => "struct",
            Self::FuncDef => "function",
            Self::FuncCall => "call",
            Self::FuncCallPredicate => "predicate call",
            Self::MessageSend => "message send",
            Self::LocalDecl => "local",
            Self::Expr => "expression",
            Self::StringConstant => "string constant",
            Self::Global => "global",
        }
    }
}
