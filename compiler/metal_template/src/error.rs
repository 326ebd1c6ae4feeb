//! Error taxonomy for template loading and rendering.
//!
//! Every error is structural and deterministic: the same inputs always fail
//! the same way, so none of them is retried and none degrades to blank text.

use std::fmt;

use crate::binding::Shape;

/// Category used when no type-specific operator template exists.
pub const DEFAULT_CATEGORY: &str = "default";

/// A `(type-category, symbol)` pair selecting an operator template.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct OperatorKey {
    pub category: String,
    pub symbol: String,
}

impl OperatorKey {
    pub fn new(category: impl Into<String>, symbol: impl Into<String>) -> Self {
        OperatorKey {
            category: category.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.symbol)
    }
}

/// Identity of the construct being rendered when an error occurred.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConstructId {
    /// Node kind, e.g. `function` or `binary op`.
    pub kind: &'static str,
    pub name: Option<String>,
    pub operator: Option<OperatorKey>,
}

impl ConstructId {
    pub fn new(kind: &'static str) -> Self {
        ConstructId {
            kind,
            name: None,
            operator: None,
        }
    }

    pub fn named(kind: &'static str, name: impl Into<String>) -> Self {
        ConstructId {
            kind,
            name: Some(name.into()),
            operator: None,
        }
    }

    pub fn operator(kind: &'static str, key: OperatorKey) -> Self {
        ConstructId {
            kind,
            name: None,
            operator: Some(key),
        }
    }
}

impl fmt::Display for ConstructId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind)?;
        if let Some(name) = &self.name {
            write!(f, " '{name}'")?;
        }
        if let Some(key) = &self.operator {
            write!(f, " '{key}'")?;
        }
        Ok(())
    }
}

/// Failure while loading a backend or rendering a compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A placeholder has no entry in the binding context or the store's
    /// global bindings.
    #[error("missing binding `{placeholder}` in {construct}")]
    MissingBinding {
        placeholder: String,
        construct: ConstructId,
    },

    /// A placeholder is bound to the wrong shape of value.
    #[error("placeholder `{placeholder}` in {construct} expects {expected}, found {found}")]
    ArityMismatch {
        placeholder: String,
        construct: ConstructId,
        expected: Shape,
        found: Shape,
    },

    /// Neither a type-specific nor a `default` template exists.
    #[error("unsupported operator `{symbol}` for type `{category}`")]
    UnresolvedOperator { category: String, symbol: String },

    /// A template source the loader cannot parse.
    #[error("malformed template `{template}` at offset {offset}: {reason}")]
    MalformedTemplate {
        template: String,
        offset: usize,
        reason: String,
    },

    /// A construct names a frame the store does not contain.
    #[error("no template `{name}` for {construct}")]
    MissingTemplate {
        name: String,
        construct: ConstructId,
    },
}

impl RenderError {
    pub(crate) fn malformed(
        template: impl Into<String>,
        offset: usize,
        reason: impl Into<String>,
    ) -> Self {
        RenderError::MalformedTemplate {
            template: template.into(),
            offset,
            reason: reason.into(),
        }
    }

    /// Construct the error is attributed to, when it has one.
    pub fn construct(&self) -> Option<&ConstructId> {
        match self {
            RenderError::MissingBinding { construct, .. }
            | RenderError::ArityMismatch { construct, .. }
            | RenderError::MissingTemplate { construct, .. } => Some(construct),
            RenderError::UnresolvedOperator { .. } | RenderError::MalformedTemplate { .. } => {
                None
            }
        }
    }
}
