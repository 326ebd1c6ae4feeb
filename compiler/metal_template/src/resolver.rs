//! Rendering constructs through their templates.
//!
//! Every template instance rendered takes the next number of its render
//! call, depth first, and sees it as `$(id)`. Labels created by
//! `$!create_label` are derived from that number, so they are unique within
//! one render call and the same on every run. Callers rendering several
//! pieces of one output pass each piece its own scope.

use std::cell::Cell;

use rustc_hash::FxHashMap;

use crate::binding::{Binding, Bindings, Shape};
use crate::error::{ConstructId, RenderError};
use crate::fragment::{Condition, Fragment, Placeholder};
use crate::operators::OperatorTable;
use crate::store::TemplateStore;

/// Which template renders a construct.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TemplateKey<'a> {
    /// A named frame in the [`TemplateStore`].
    Frame(&'static str),
    /// An operator template, resolved by operand type category.
    Operator {
        category: &'a str,
        symbol: &'static str,
    },
}

/// Something that renders through a template.
///
/// Implementors describe themselves: which template they use, how to name
/// them in a diagnostic, and the binding context for their placeholders.
/// Children appear in the bindings as further `Self` values and are rendered
/// recursively.
pub trait Construct: Sized {
    fn key(&self) -> TemplateKey<'_>;

    fn identity(&self) -> ConstructId;

    fn bindings(&self) -> Bindings<Self>;
}

/// Placeholder bound to the number of the template instance being rendered.
pub const ID_PLACEHOLDER: &str = "id";

/// Numbering of the template instances of one render call.
struct Ids {
    scope: usize,
    next: Cell<usize>,
}

impl Ids {
    fn new(scope: usize) -> Self {
        Ids {
            scope,
            next: Cell::new(0),
        }
    }

    fn take(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}_{n}", self.scope)
    }
}

/// One template instance: the construct, its bindings, its number and the
/// labels its template created.
struct Instance<'n, N: Construct> {
    node: &'n N,
    bindings: Bindings<N>,
    id: String,
    labels: FxHashMap<String, String>,
}

/// Renders constructs against one backend's templates.
#[derive(Copy, Clone, Debug)]
pub struct Resolver<'s> {
    store: &'s TemplateStore,
    ops: &'s OperatorTable,
}

impl<'s> Resolver<'s> {
    pub fn new(store: &'s TemplateStore, ops: &'s OperatorTable) -> Self {
        Resolver { store, ops }
    }

    pub fn store(&self) -> &'s TemplateStore {
        self.store
    }

    pub fn operators(&self) -> &'s OperatorTable {
        self.ops
    }

    /// Render `node` and everything beneath it.
    ///
    /// Pure: the same node against the same templates always yields the same
    /// text, and nothing is written anywhere on failure.
    pub fn render<N: Construct>(&self, node: &N) -> Result<String, RenderError> {
        self.render_scoped(node, 0)
    }

    /// Render `node` with instance numbers drawn from `scope`. Pieces of one
    /// output rendered under distinct scopes never share a label.
    pub fn render_scoped<N: Construct>(&self, node: &N, scope: usize) -> Result<String, RenderError> {
        self.render_in(node, &Ids::new(scope))
    }

    fn render_in<N: Construct>(&self, node: &N, ids: &Ids) -> Result<String, RenderError> {
        metal_stack::ensure_sufficient_stack(|| self.render_node(node, ids))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(construct = %node.identity()))]
    fn render_node<N: Construct>(&self, node: &N, ids: &Ids) -> Result<String, RenderError> {
        let template = match node.key() {
            TemplateKey::Frame(name) => {
                self.store
                    .frame(name)
                    .ok_or_else(|| RenderError::MissingTemplate {
                        name: name.to_string(),
                        construct: node.identity(),
                    })?
            }
            TemplateKey::Operator { category, symbol } => self.ops.resolve(category, symbol)?,
        };
        let mut instance = Instance {
            node,
            bindings: node.bindings(),
            id: ids.take(),
            labels: FxHashMap::default(),
        };
        self.assign_labels(template.fragments(), &mut instance)?;
        let mut out = String::new();
        self.expand(template.fragments(), &instance, ids, &mut out)?;
        Ok(out)
    }

    /// Run the label directives of the branches that will be taken: every
    /// `$!create_label` first, then every `$!prefix_label`.
    fn assign_labels<N: Construct>(
        &self,
        fragments: &[Fragment],
        instance: &mut Instance<'_, N>,
    ) -> Result<(), RenderError> {
        let mut directives = Vec::new();
        self.label_directives(fragments, instance, &mut directives)?;

        let mut created = 0;
        for fragment in &directives {
            if let Fragment::CreateLabel(name) = fragment {
                let label = format!("L{}_{created}", instance.id);
                instance.labels.insert(name.clone(), label);
                created += 1;
            }
        }
        for fragment in &directives {
            if let Fragment::PrefixLabel { name, prefix } = fragment {
                let Some(label) = instance.labels.get_mut(name) else {
                    return Err(RenderError::MissingBinding {
                        placeholder: name.clone(),
                        construct: instance.node.identity(),
                    });
                };
                if !label.starts_with(prefix.as_str()) {
                    label.insert_str(0, prefix);
                }
            }
        }
        Ok(())
    }

    fn label_directives<'f, N: Construct>(
        &self,
        fragments: &'f [Fragment],
        instance: &Instance<'_, N>,
        out: &mut Vec<&'f Fragment>,
    ) -> Result<(), RenderError> {
        for fragment in fragments {
            match fragment {
                Fragment::CreateLabel(_) | Fragment::PrefixLabel { .. } => out.push(fragment),
                Fragment::Conditional {
                    condition: Condition::Flag(flag),
                    then,
                    otherwise,
                } => {
                    let taken = self.condition(flag, instance)?;
                    self.label_directives(if taken { then } else { otherwise }, instance, out)?;
                }
                Fragment::Literal(_) | Fragment::Scalar(_) | Fragment::Sequence { .. } => {}
            }
        }
        Ok(())
    }

    fn expand<N: Construct>(
        &self,
        fragments: &[Fragment],
        instance: &Instance<'_, N>,
        ids: &Ids,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let node = instance.node;
        for fragment in fragments {
            match fragment {
                Fragment::Literal(text) => out.push_str(text),
                Fragment::Scalar(placeholder) => {
                    let value = if let Some(label) = instance.labels.get(&placeholder.name) {
                        label.clone()
                    } else {
                        match instance.bindings.get(&placeholder.name) {
                            Some(Binding::Text(text)) => text.clone(),
                            Some(Binding::Node(child)) => self.render_in(child, ids)?,
                            Some(other) => {
                                return Err(arity(placeholder, node, Shape::Scalar, other.shape()))
                            }
                            None if placeholder.name == ID_PLACEHOLDER => instance.id.clone(),
                            None => self.global(placeholder, node)?.to_string(),
                        }
                    };
                    out.push_str(&placeholder.apply_filters(value));
                }
                Fragment::Sequence {
                    placeholder,
                    separator,
                } => {
                    let children = match instance.bindings.get(&placeholder.name) {
                        Some(Binding::Seq(children)) => children,
                        Some(other) => {
                            return Err(arity(placeholder, node, Shape::Sequence, other.shape()))
                        }
                        None => {
                            self.global(placeholder, node)?;
                            return Err(arity(placeholder, node, Shape::Sequence, Shape::Text));
                        }
                    };
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            out.push_str(separator);
                        }
                        out.push_str(&placeholder.apply_filters(self.render_in(child, ids)?));
                    }
                }
                Fragment::Conditional {
                    condition: Condition::Flag(flag),
                    then,
                    otherwise,
                } => {
                    let taken = self.condition(flag, instance)?;
                    self.expand(if taken { then } else { otherwise }, instance, ids, out)?;
                }
                Fragment::CreateLabel(_) | Fragment::PrefixLabel { .. } => {}
            }
        }
        Ok(())
    }

    /// A flag is true when bound to `true` or to non-empty text. An unbound
    /// flag falls back to the global of the same name.
    fn condition<N: Construct>(
        &self,
        flag: &str,
        instance: &Instance<'_, N>,
    ) -> Result<bool, RenderError> {
        match instance.bindings.get(flag) {
            Some(Binding::Flag(value)) => Ok(*value),
            Some(Binding::Text(text)) => Ok(!text.is_empty()),
            Some(other) => Err(RenderError::ArityMismatch {
                placeholder: flag.to_string(),
                construct: instance.node.identity(),
                expected: Shape::Flag,
                found: other.shape(),
            }),
            None => match self.store.global(flag) {
                Some(text) => Ok(!text.is_empty()),
                None => Err(RenderError::MissingBinding {
                    placeholder: flag.to_string(),
                    construct: instance.node.identity(),
                }),
            },
        }
    }

    fn global<N: Construct>(
        &self,
        placeholder: &Placeholder,
        node: &N,
    ) -> Result<&'s str, RenderError> {
        self.store
            .global(&placeholder.name)
            .ok_or_else(|| RenderError::MissingBinding {
                placeholder: placeholder.name.clone(),
                construct: node.identity(),
            })
    }
}

fn arity<N: Construct>(
    placeholder: &Placeholder,
    node: &N,
    expected: Shape,
    found: Shape,
) -> RenderError {
    RenderError::ArityMismatch {
        placeholder: placeholder.name.clone(),
        construct: node.identity(),
        expected,
        found,
    }
}
