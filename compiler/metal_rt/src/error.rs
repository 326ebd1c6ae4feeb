use crate::registry::TypeIndex;

/// Failure of a runtime operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("no type with index {0}")]
    UnknownType(TypeIndex),

    /// A selector may be bound to one handler per type.
    #[error("type `{type_name}` already handles `{selector}`")]
    DuplicateHandler { type_name: String, selector: String },

    #[error("message carries {parms} parameters but {types} parameter types")]
    ParameterCount { types: usize, parms: usize },

    #[error("handler expects {expected} parameters, message has {found}")]
    ArityMismatch { expected: usize, found: usize },
}
