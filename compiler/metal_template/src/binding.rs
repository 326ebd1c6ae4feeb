//! Binding contexts.
//!
//! A binding context maps placeholder names to values for exactly one render
//! call. It is built by value and only ever read through `&Bindings`, so a
//! sibling render can never observe another's bindings.

use std::fmt;

use rustc_hash::FxHashMap;

/// Value bound to a placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding<N> {
    /// Spliced verbatim.
    Text(String),
    /// Drives `$!if` regions.
    Flag(bool),
    /// Rendered through its own template.
    Node(N),
    /// Each element rendered through its own template, then joined with the
    /// placeholder's separator.
    Seq(Vec<N>),
}

impl<N> Binding<N> {
    pub fn shape(&self) -> Shape {
        match self {
            Binding::Text(_) => Shape::Text,
            Binding::Flag(_) => Shape::Flag,
            Binding::Node(_) => Shape::Node,
            Binding::Seq(_) => Shape::Sequence,
        }
    }
}

/// Shape of a bound value, for arity diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Text,
    Flag,
    Node,
    Sequence,
    /// Text or a single node.
    Scalar,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Text => "text",
            Shape::Flag => "a flag",
            Shape::Node => "a node",
            Shape::Sequence => "a sequence",
            Shape::Scalar => "text or a node",
        })
    }
}

/// Placeholder name → value, scoped to one render call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bindings<N> {
    map: FxHashMap<&'static str, Binding<N>>,
}

impl<N> Default for Bindings<N> {
    fn default() -> Self {
        Bindings {
            map: FxHashMap::default(),
        }
    }
}

impl<N> Bindings<N> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.map.insert(name, Binding::Text(value.into()));
        self
    }

    #[must_use]
    pub fn flag(mut self, name: &'static str, value: bool) -> Self {
        self.map.insert(name, Binding::Flag(value));
        self
    }

    #[must_use]
    pub fn node(mut self, name: &'static str, node: N) -> Self {
        self.map.insert(name, Binding::Node(node));
        self
    }

    #[must_use]
    pub fn seq(mut self, name: &'static str, nodes: impl IntoIterator<Item = N>) -> Self {
        self.map
            .insert(name, Binding::Seq(nodes.into_iter().collect()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding<N>> {
        self.map.get(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
