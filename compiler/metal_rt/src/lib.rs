//! Reference model of the metal runtime.
//!
//! Generated C code assumes a runtime with type descriptors, per-type
//! message handler tables, handler caches and a string compare.
//! This crate models that surface in safe Rust so its semantics can be
//! exercised and tested without a C toolchain.
//!
//! ```text
//! TypeRegistry ──► TypeDescriptor (one per declared type)
//!                        └── HandlerTable (selector → Handler)
//!                                 ▲
//!   (type, selector): HandlerSlot ┘  first successful lookup fills the slot
//! ```
//!
//! All tables live in an explicit [`TypeRegistry`] handed to whoever runs
//! the program; nothing here is process-global.

mod error;
mod handler;
mod message;
mod registry;
mod string;

pub use error::RuntimeError;
pub use handler::{Handler, HandlerSlot, HandlerTable, SlotState};
pub use message::Message;
pub use registry::{TypeDescriptor, TypeIndex, TypeRegistry};
pub use string::compare_strings;
