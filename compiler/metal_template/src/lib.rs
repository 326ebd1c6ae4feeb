//! Template substitution engine for the metal backend.
//!
//! A backend is a table of named templates. Rendering a construct looks up
//! its template, builds a binding context for it, and substitutes every
//! placeholder, recursively rendering child constructs through their own
//! templates.
//!
//! # Architecture
//!
//! ```text
//! frame file ──► loader ──► TemplateStore   (kind → Template)
//! ops file   ──► loader ──► OperatorTable   ((category, symbol) → Template)
//!                                  │
//!     Construct ──► Resolver ◄─────┘
//!     (key, bindings)   │
//!                       ▼
//!                  target text
//! ```
//!
//! Template bodies are parsed once, at load time, into a closed tree of
//! [`Fragment`]s. A body the parser cannot read is a
//! [`RenderError::MalformedTemplate`] before any rendering starts.
//!
//! Everything here is immutable after load and `Send + Sync`, so one store
//! can serve any number of concurrent render calls.

mod binding;
mod error;
mod filter;
mod fragment;
pub mod loader;
mod operators;
mod resolver;
mod store;

pub use binding::{Binding, Bindings, Shape};
pub use error::{ConstructId, OperatorKey, RenderError, DEFAULT_CATEGORY};
pub use filter::Filter;
pub use fragment::{Condition, Fragment, Placeholder, Separators, Template};
pub use operators::{OpEntry, OperatorTable, OPERATOR_SYMBOLS};
pub use resolver::{Construct, Resolver, TemplateKey, ID_PLACEHOLDER};
pub use store::{TemplateStore, TemplateStoreBuilder};
