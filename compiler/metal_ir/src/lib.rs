//! Typed AST for the metal backend.
//!
//! The parser, semantic analyzer and type resolver live upstream. By the time
//! a tree reaches this crate every name is resolved, every struct layout is
//! fixed, every parameter has a direction, and every expression carries a
//! non-empty type category used for operator selection.
//!
//! # Node shapes
//!
//! ```text
//! Module
//!  ├── StructDef*      (members in layout order)
//!  ├── StringConstant*
//!  ├── GlobalVar*      (struct-typed, member initializers in layout order)
//!  └── FuncDef*        (params: inbound | outbound, body: Stmt*)
//!        └── Stmt: Call | Predicate | Send | Local | Pass | Fail
//!              └── Expr: Binary | Unary | Paren | Cast | IdRef | IdVal
//!                        | Literal | Sizeof | IsNull
//! ```

pub mod ast;

pub use ast::{
    BinaryOp, CallArg, Expr, ExprKind, FuncCall, FuncCallPredicate, FuncDef, GlobalVar, LocalDecl,
    MessageSend, Module, NodeKind, Param, ParamDirection, Stmt, StringConstant, StructDef,
    StructMember, UnaryOp,
};
