//! Loaded backends and the registry that selects them.

use std::sync::Arc;

use metal_ir::Module;
use metal_template::{ConstructId, OperatorTable, RenderError, Resolver, TemplateStore};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::BackendConfig;
use crate::render::{self, Node, REQUIRED_FRAMES};
use crate::runtime::RuntimeContract;
use crate::{c, format, CodegenResult};

/// Template text and tables describing one target syntax.
#[derive(Copy, Clone, Debug)]
pub struct BackendSource<'a> {
    pub name: &'a str,
    /// Frame files as `(file name, text)`.
    pub frames: &'a [(&'a str, &'a str)],
    /// The operator file as `(file name, text)`.
    pub operators: (&'a str, &'a str),
    /// Sequence placeholders as `(name, separator)`.
    pub sequences: &'a [(&'a str, &'a str)],
    pub contract: &'static RuntimeContract,
}

/// A backend ready to render: parsed templates, operator table and config.
///
/// Immutable once loaded; share it freely across threads.
#[derive(Debug)]
pub struct Backend {
    name: String,
    config: BackendConfig,
    store: TemplateStore,
    ops: OperatorTable,
    contract: &'static RuntimeContract,
}

impl Backend {
    /// Parse every template of `source`.
    ///
    /// A malformed body, an operator without `default` coverage or a missing
    /// frame fails here, before anything is rendered.
    pub fn load(source: &BackendSource<'_>, config: BackendConfig) -> Result<Self, RenderError> {
        let mut builder = TemplateStore::builder()
            .comment(config.one_line_comment.as_str())
            .global("word_type", config.word_type.as_str())
            .global("char_type", config.char_type.as_str());
        for (name, separator) in source.sequences {
            builder = builder.sequence(*name, *separator);
        }
        for (file, text) in source.frames {
            builder = builder.frame_file(*file, *text);
        }
        let store = builder.build()?;

        if let Some(missing) = REQUIRED_FRAMES.iter().find(|name| store.frame(name).is_none()) {
            return Err(RenderError::MissingTemplate {
                name: (*missing).to_string(),
                construct: ConstructId::named("backend", source.name),
            });
        }

        let (ops_file, ops_text) = source.operators;
        let ops = OperatorTable::parse(ops_file, ops_text, store.separators())?;

        tracing::debug!(
            backend = source.name,
            frames = store.len(),
            operators = ops.len(),
            "loaded backend"
        );

        Ok(Backend {
            name: source.name.to_string(),
            config,
            store,
            ops,
            contract: source.contract,
        })
    }

    /// The built-in C backend.
    pub fn c(config: BackendConfig) -> Result<Self, RenderError> {
        Self::load(&c::SOURCE, config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn contract(&self) -> &'static RuntimeContract {
        self.contract
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.ops
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.ops)
    }

    /// Render and format a single construct.
    pub fn render(&self, node: &Node<'_>) -> Result<String, RenderError> {
        let text = self.resolver().render(node)?;
        Ok(format::reformat(&text, &self.config.indent))
    }

    /// Render one compilation unit.
    pub fn render_module(&self, module: &Module) -> Result<String, RenderError> {
        render::render_module(self, module)
    }

    /// Render one compilation unit into a [`CodegenResult`]. On failure the
    /// result holds no code.
    pub fn generate(&self, module: &Module) -> CodegenResult {
        match self.render_module(module) {
            Ok(code) => CodegenResult::success(code),
            Err(err) => {
                tracing::debug!(module = %module.name, error = %err, "render failed");
                CodegenResult::from(err)
            }
        }
    }
}

/// Backends by identifier.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: RwLock<FxHashMap<String, Arc<Backend>>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the C backend under `"c"`.
    pub fn with_builtin() -> Result<Self, RenderError> {
        let registry = Self::new();
        registry.register(Backend::c(BackendConfig::default())?);
        Ok(registry)
    }

    /// Add `backend` under its name, returning the backend it replaced.
    pub fn register(&self, backend: Backend) -> Option<Arc<Backend>> {
        self.backends
            .write()
            .insert(backend.name.clone(), Arc::new(backend))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Backend>> {
        self.backends.read().get(name).cloned()
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.backends.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
