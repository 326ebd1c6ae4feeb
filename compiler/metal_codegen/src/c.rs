//! The built-in C backend.
//!
//! Template text lives under `templates/c/` and is compiled into the crate.

use crate::backend::BackendSource;
use crate::runtime::RuntimeContract;

pub const MODULE: &str = include_str!("../templates/c/module.c.tmpl");
pub const RUNTIME: &str = include_str!("../templates/c/runtime.c.tmpl");
pub const STRUCT: &str = include_str!("../templates/c/struct.c.tmpl");
pub const FUNC: &str = include_str!("../templates/c/func.c.tmpl");
pub const MSG: &str = include_str!("../templates/c/msg.c.tmpl");
pub const OPERATORS: &str = include_str!("../templates/c/ops.c.tmpl");

/// Frame files, by file name.
pub const FRAMES: &[(&str, &str)] = &[
    ("module.c.tmpl", MODULE),
    ("runtime.c.tmpl", RUNTIME),
    ("struct.c.tmpl", STRUCT),
    ("func.c.tmpl", FUNC),
    ("msg.c.tmpl", MSG),
];

/// Sequence placeholders and the text placed between their elements.
pub const SEQUENCES: &[(&str, &str)] = &[
    ("members", "\n"),
    ("record_fields", "\n"),
    ("func_parms", ""),
    ("outbound_parms", "\n"),
    ("records", "\n"),
    ("body", "\n"),
    ("args", ", "),
    ("on_pass", "\n"),
    ("on_fail", "\n"),
    ("msg_parms", "\n"),
    ("inits", ", "),
    ("rte_types", "\n\n"),
    ("fields", "\n"),
    ("rte_funcs", "\n"),
];

pub const SOURCE: BackendSource<'static> = BackendSource {
    name: "c",
    frames: FRAMES,
    operators: ("ops.c.tmpl", OPERATORS),
    sequences: SEQUENCES,
    contract: &RuntimeContract::C,
};
