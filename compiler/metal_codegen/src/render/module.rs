//! Module rendering.
//!
//! A unit is laid out in a fixed order: runtime preamble, struct
//! definitions (user structs, then argument records), constants, globals,
//! function declarations, function definitions. Later sections only refer
//! to earlier ones, so no dependency sort is needed.
//!
//! Top-level declarations are independent of each other and render in
//! parallel; the fragments are joined back in declaration order. Each one
//! renders under its own scope, its position in the unit, so labels never
//! collide and do not depend on scheduling.

use metal_ir::{Module, NodeKind};
use metal_template::{Bindings, ConstructId, RenderError, Resolver};
use rayon::prelude::*;

use super::Node;
use crate::backend::Backend;
use crate::format;

/// A compilation unit with its sections already rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit<'a> {
    module: &'a Module,
    preamble: String,
    struct_definitions: String,
    constants: String,
    globals: String,
    func_declarations: String,
    func_definitions: String,
}

pub(super) fn identity(unit: &Unit<'_>) -> ConstructId {
    ConstructId::named(NodeKind::Module.as_str(), unit.module.name.as_str())
}

pub(super) fn bindings<'a>(unit: &Unit<'a>) -> Bindings<Node<'a>> {
    Bindings::new()
        .text("name", unit.module.name.as_str())
        .text("preamble", unit.preamble.as_str())
        .text("struct_definitions", unit.struct_definitions.as_str())
        .text("constants", unit.constants.as_str())
        .text("globals", unit.globals.as_str())
        .text("func_declarations", unit.func_declarations.as_str())
        .text("func_definitions", unit.func_definitions.as_str())
}

/// Render and format one compilation unit.
///
/// The first failing declaration, in declaration order, aborts the unit;
/// no partial text is returned.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        module = %module.name,
        structs = module.structs.len(),
        funcs = module.funcs.len(),
    )
)]
pub(crate) fn render_module(backend: &Backend, module: &Module) -> Result<String, RenderError> {
    let mut sections = Sections {
        resolver: backend.resolver(),
        parallel: backend.config().parallel,
        next_scope: 0,
    };

    let preamble = sections.render(&[Node::Preamble(backend.contract())], "")?;
    let struct_definitions = render_structs(&mut sections, module)?;
    let constants: Vec<_> = module.constants.iter().map(Node::Constant).collect();
    let constants = sections.render(&constants, "\n")?;
    let globals: Vec<_> = module.globals.iter().map(Node::Global).collect();
    let globals = sections.render(&globals, "\n")?;
    let (func_declarations, func_definitions) = render_functions(&mut sections, module)?;

    let unit = Node::Unit(Box::new(Unit {
        module,
        preamble,
        struct_definitions,
        constants,
        globals,
        func_declarations,
        func_definitions,
    }));
    let text = sections.render(&[unit], "")?;
    Ok(format::reformat(&text, &backend.config().indent))
}

#[tracing::instrument(level = "debug", skip_all, fields(count = module.structs.len()))]
fn render_structs(sections: &mut Sections<'_>, module: &Module) -> Result<String, RenderError> {
    let nodes: Vec<_> = module
        .structs
        .iter()
        .map(Node::Struct)
        .chain(module.funcs.iter().map(Node::ArgsRecord))
        .collect();
    sections.render(&nodes, "\n\n")
}

#[tracing::instrument(level = "debug", skip_all, fields(count = module.funcs.len()))]
fn render_functions(
    sections: &mut Sections<'_>,
    module: &Module,
) -> Result<(String, String), RenderError> {
    let declarations: Vec<_> = module.funcs.iter().map(Node::FuncDecl).collect();
    let definitions: Vec<_> = module.funcs.iter().map(Node::FuncDef).collect();
    Ok((
        sections.render(&declarations, "\n")?,
        sections.render(&definitions, "\n\n")?,
    ))
}

/// Renders the sections of one unit, numbering top-level nodes in order.
struct Sections<'s> {
    resolver: Resolver<'s>,
    parallel: bool,
    next_scope: usize,
}

impl Sections<'_> {
    fn render(&mut self, nodes: &[Node<'_>], separator: &str) -> Result<String, RenderError> {
        let base = self.next_scope;
        self.next_scope += nodes.len();
        let resolver = self.resolver;
        let rendered: Vec<Result<String, RenderError>> = if self.parallel {
            nodes
                .par_iter()
                .enumerate()
                .map(|(i, node)| resolver.render_scoped(node, base + i))
                .collect()
        } else {
            nodes
                .iter()
                .enumerate()
                .map(|(i, node)| resolver.render_scoped(node, base + i))
                .collect()
        };
        let parts = rendered.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(separator))
    }
}
