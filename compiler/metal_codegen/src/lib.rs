//! Template-driven code emission for metal.
//!
//! A backend is a set of templates plus the runtime contract the emitted
//! code links against. Rendering walks the typed AST and fills templates;
//! the only target-specific knowledge in Rust code is the contract.
//!
//! # Architecture
//!
//! ```text
//!   BackendSource (frame files, ops file, separators, contract)
//!        ↓  Backend::load
//!   Backend (TemplateStore + OperatorTable + BackendConfig)
//!        ↓  Backend::render_module
//!   preamble → structs → constants → globals → declarations → definitions
//!        ↓  format::reformat
//!   CodegenResult (C source, or errors and no code)
//! ```
//!
//! Top-level declarations render concurrently with rayon; each render call
//! builds its own binding context and shares only the immutable backend.

mod backend;
pub mod c;
mod config;
mod docs;
mod format;
mod render;
pub mod runtime;

pub use backend::{Backend, BackendRegistry, BackendSource};
pub use config::BackendConfig;
pub use docs::document_module;
pub use format::{reformat, DEDENT_MARK, INDENT_MARK};
pub use metal_template::RenderError;
pub use render::{Node, REQUIRED_FRAMES};
pub use runtime::RuntimeContract;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=metal_codegen=debug` or `RUST_LOG=metal_template=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Result of code generation for one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodegenResult {
    /// Generated source (empty if errors occurred).
    pub code: String,
    /// Errors encountered during codegen.
    pub errors: Vec<CodegenError>,
    /// Whether codegen succeeded.
    pub success: bool,
}

impl CodegenResult {
    /// Create a successful result with generated code.
    pub fn success(code: String) -> Self {
        Self {
            code,
            errors: Vec::new(),
            success: true,
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: String::new(),
            errors: vec![CodegenError {
                message: message.into(),
                construct: None,
            }],
            success: false,
        }
    }

    /// Check if codegen failed.
    pub fn has_errors(&self) -> bool {
        !self.success || !self.errors.is_empty()
    }
}

impl From<RenderError> for CodegenResult {
    fn from(err: RenderError) -> Self {
        Self {
            code: String::new(),
            errors: vec![CodegenError::from(err)],
            success: false,
        }
    }
}

/// A code generation error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodegenError {
    pub message: String,
    /// The construct being rendered, e.g. `function 'Name'`.
    pub construct: Option<String>,
}

impl From<RenderError> for CodegenError {
    fn from(err: RenderError) -> Self {
        CodegenError {
            construct: err.construct().map(ToString::to_string),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CodegenError {}
