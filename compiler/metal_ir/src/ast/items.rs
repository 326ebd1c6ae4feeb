//! Module-level items: structs, string constants, globals and functions.

use super::expr::Expr;
use super::stmt::{CallArg, FuncCall, Stmt};

/// One compilation unit.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub name: String,
    pub doc: Option<String>,
    pub structs: Vec<StructDef>,
    pub constants: Vec<StringConstant>,
    pub globals: Vec<GlobalVar>,
    pub funcs: Vec<FuncDef>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            ..Module::default()
        }
    }
}

/// A struct whose member order is its memory layout.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructDef {
    pub name: String,
    pub doc: Option<String>,
    pub members: Vec<StructMember>,
}

impl StructDef {
    pub fn new(name: impl Into<String>, members: Vec<StructMember>) -> Self {
        StructDef {
            name: name.into(),
            doc: None,
            members,
        }
    }
}

/// A struct member: `type name` or, with `array_len`, `type name[len]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructMember {
    pub name: String,
    /// Target type, copied verbatim into the output.
    pub ty: String,
    pub array_len: Option<u64>,
}

impl StructMember {
    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        StructMember {
            name: name.into(),
            ty: ty.into(),
            array_len: None,
        }
    }

    pub fn array(name: impl Into<String>, ty: impl Into<String>, len: u64) -> Self {
        StructMember {
            name: name.into(),
            ty: ty.into(),
            array_len: Some(len),
        }
    }
}

/// A module-level string constant.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringConstant {
    pub name: String,
    pub value: String,
}

/// A module-level variable of struct type.
///
/// `init` lists member initializers in layout order; an empty list
/// zero-initializes the variable.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalVar {
    pub name: String,
    pub ty: String,
    pub doc: Option<String>,
    pub init: Vec<Expr>,
}

impl GlobalVar {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, init: Vec<Expr>) -> Self {
        GlobalVar {
            name: name.into(),
            ty: ty.into(),
            doc: None,
            init,
        }
    }
}

/// Parameter direction under the call-by-record convention.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamDirection {
    /// Read-only, passed by value.
    Inbound,
    /// Populated by the callee through the caller-owned argument record.
    Outbound,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub direction: ParamDirection,
}

impl Param {
    pub fn inbound(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: ty.into(),
            direction: ParamDirection::Inbound,
        }
    }

    pub fn outbound(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: ty.into(),
            direction: ParamDirection::Outbound,
        }
    }
}

/// A function definition.
///
/// Functions report success or failure through their boolean return; any
/// further results travel through outbound parameters.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncDef {
    pub name: String,
    pub doc: Option<String>,
    /// Declared parameters in source order.
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

impl FuncDef {
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        FuncDef {
            name: name.into(),
            doc: None,
            params,
            body,
        }
    }

    /// Inbound parameters in source order.
    pub fn inbound(&self) -> impl Iterator<Item = &Param> {
        self.params
            .iter()
            .filter(|p| p.direction == ParamDirection::Inbound)
    }

    /// Outbound parameters in source order.
    pub fn outbound(&self) -> impl Iterator<Item = &Param> {
        self.params
            .iter()
            .filter(|p| p.direction == ParamDirection::Outbound)
    }

    /// Callees whose argument record this function passes, in first-use
    /// order. The function itself is left out: it already holds a pointer
    /// to its own record.
    pub fn record_callees(&self) -> Vec<&str> {
        let mut callees = Vec::new();
        collect_record_callees(&self.body, &mut callees);
        callees.retain(|name| *name != self.name);
        callees
    }

    /// Whether control can reach the end of the body without a `Pass` or
    /// `Fail`.
    pub fn falls_through(&self) -> bool {
        !matches!(self.body.last(), Some(Stmt::Pass | Stmt::Fail))
    }
}

fn collect_record_callees<'a>(body: &'a [Stmt], callees: &mut Vec<&'a str>) {
    for stmt in body {
        match stmt {
            Stmt::Call(call) => note_record_callee(call, callees),
            Stmt::Predicate(pred) => {
                note_record_callee(&pred.call, callees);
                collect_record_callees(&pred.on_pass, callees);
                collect_record_callees(&pred.on_fail, callees);
            }
            Stmt::Send(send) => {
                collect_record_callees(&send.on_pass, callees);
                collect_record_callees(&send.on_fail, callees);
            }
            Stmt::Local(_) | Stmt::Pass | Stmt::Fail => {}
        }
    }
}

fn note_record_callee<'a>(call: &'a FuncCall, callees: &mut Vec<&'a str>) {
    let passes_record = call.args.iter().any(|arg| matches!(arg, CallArg::Record));
    if passes_record && !callees.contains(&call.name.as_str()) {
        callees.push(&call.name);
    }
}
