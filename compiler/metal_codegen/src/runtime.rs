//! Runtime contract descriptors.
//!
//! Generated code is linked against a small runtime: a string type, type
//! descriptors, message records with a handler cache, memory acquisition and
//! a string compare. This module is the single description of that surface.
//! The preamble of every unit is rendered from it, so the declarations the
//! emitted code sees and the ones the templates assume cannot drift apart.
//!
//! Field and parameter types are written against the preamble's own
//! typedefs: `word` for the configured word type, `metal_char` for the
//! configured character type.

/// Prefix of the per-type descriptor symbol the runtime defines for each
/// declared type (`metal_type_Point`).
pub const TYPE_DESCRIPTOR_PREFIX: &str = "metal_type_";

/// One member of a runtime aggregate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuntimeField {
    pub name: &'static str,
    pub ty: &'static str,
    /// Trailing flexible array member (`ty name[]`).
    pub flexible: bool,
}

impl RuntimeField {
    const fn new(name: &'static str, ty: &'static str) -> Self {
        RuntimeField {
            name,
            ty,
            flexible: false,
        }
    }

    const fn flexible(name: &'static str, ty: &'static str) -> Self {
        RuntimeField {
            name,
            ty,
            flexible: true,
        }
    }
}

/// A function signature: return type, name and parameter types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnSignature {
    pub name: &'static str,
    pub ret: &'static str,
    pub params: &'static [&'static str],
    pub doc: &'static str,
}

impl FnSignature {
    /// Parameter types joined for a C parameter list.
    pub fn param_list(&self) -> String {
        if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params.join(", ")
        }
    }
}

/// A type the runtime defines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeItem {
    Struct {
        name: &'static str,
        doc: &'static str,
        fields: &'static [RuntimeField],
    },
    /// A function pointer type.
    FnType(FnSignature),
}

impl RuntimeItem {
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeItem::Struct { name, .. } => *name,
            RuntimeItem::FnType(sig) => sig.name,
        }
    }
}

/// Everything generated code may assume about its runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuntimeContract {
    /// Types in declaration order; later items may refer to earlier ones.
    pub items: &'static [RuntimeItem],
    /// Functions the emitted code may call. Declared, never defined here.
    pub externs: &'static [FnSignature],
}

impl RuntimeContract {
    /// The contract of the C runtime.
    pub const C: RuntimeContract = RuntimeContract {
        items: &[
            RuntimeItem::Struct {
                name: "string",
                doc: "Length-prefixed string.",
                fields: &[
                    RuntimeField::new("length", "word"),
                    RuntimeField::new("str", "metal_char*"),
                ],
            },
            RuntimeItem::Struct {
                name: "metal_type",
                doc: "Runtime type descriptor, one per declared type.",
                fields: &[
                    RuntimeField::new("type_id", "word"),
                    RuntimeField::new("type_name", "string"),
                    RuntimeField::new("message_table", "void*"),
                ],
            },
            RuntimeItem::Struct {
                name: "metal_msg",
                doc: "A message: parameter types followed by the parameter payload.",
                fields: &[
                    RuntimeField::new("nparms", "word"),
                    RuntimeField::new("parm_type", "metal_type**"),
                    RuntimeField::flexible("parms", "void*"),
                ],
            },
            RuntimeItem::FnType(FnSignature {
                name: "metal_msg_handler_fn",
                ret: "bool",
                params: &["metal_msg*"],
                doc: "Handler implementing a message for one type.",
            }),
            RuntimeItem::Struct {
                name: "metal_msg_handler",
                doc: "Call-site handler cache for the receiver type it was filled for.",
                fields: &[
                    RuntimeField::new("handler", "metal_msg_handler_fn"),
                    RuntimeField::new("cached", "bool"),
                    RuntimeField::new("receiver", "const void*"),
                ],
            },
        ],
        externs: &[
            FnSignature {
                name: "acquire_memory",
                ret: "bool",
                params: &["word*", "word"],
                doc: "Acquire a block from the pool; false when exhausted.",
            },
            FnSignature {
                name: "release_memory",
                ret: "bool",
                params: &["word*", "word"],
                doc: "Return a block to the pool.",
            },
            FnSignature {
                name: "compare_strings",
                ret: "int",
                params: &["const string*", "const string*"],
                doc: "Three-way compare; a null string orders first.",
            },
            FnSignature {
                name: "__rte_find_handler",
                ret: "bool",
                params: &["metal_msg_handler_fn*", "const void*", "const string*"],
                doc: "Look up the handler for a selector on a type.",
            },
            FnSignature {
                name: "__rte_insert_handler",
                ret: "bool",
                params: &["void*", "const string*", "metal_msg_handler_fn*"],
                doc: "Register a handler for a selector on a type.",
            },
        ],
    };

    pub fn item(&self, name: &str) -> Option<&'static RuntimeItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn extern_fn(&self, name: &str) -> Option<&'static FnSignature> {
        self.externs.iter().find(|f| f.name == name)
    }

    /// Whether emitted code may call `name`.
    pub fn allows_call(&self, name: &str) -> bool {
        self.extern_fn(name).is_some()
    }
}
