//! Message records.

use std::any::Any;
use std::fmt;

use crate::error::RuntimeError;
use crate::registry::TypeIndex;

/// A message: one type descriptor per parameter, then the payload.
///
/// Handlers read parameters by position and check the arity they expect
/// before touching the payload.
pub struct Message {
    parm_types: Vec<TypeIndex>,
    parms: Vec<Box<dyn Any + Send>>,
}

impl Message {
    /// A message with no parameters.
    pub fn empty() -> Self {
        Message {
            parm_types: Vec::new(),
            parms: Vec::new(),
        }
    }

    /// Pair parameter types with payload values; the counts must agree.
    pub fn new(
        parm_types: Vec<TypeIndex>,
        parms: Vec<Box<dyn Any + Send>>,
    ) -> Result<Self, RuntimeError> {
        if parm_types.len() != parms.len() {
            return Err(RuntimeError::ParameterCount {
                types: parm_types.len(),
                parms: parms.len(),
            });
        }
        Ok(Message { parm_types, parms })
    }

    /// Append one parameter.
    #[must_use]
    pub fn with_parm<T: Any + Send>(mut self, ty: TypeIndex, value: T) -> Self {
        self.parm_types.push(ty);
        self.parms.push(Box::new(value));
        self
    }

    pub fn nparms(&self) -> usize {
        self.parms.len()
    }

    pub fn parm_types(&self) -> &[TypeIndex] {
        &self.parm_types
    }

    /// Fail unless the message carries exactly `expected` parameters.
    pub fn check_arity(&self, expected: usize) -> Result<(), RuntimeError> {
        if self.nparms() == expected {
            Ok(())
        } else {
            Err(RuntimeError::ArityMismatch {
                expected,
                found: self.nparms(),
            })
        }
    }

    /// Parameter `index` as a `T`, or `None` if out of range or of another
    /// Rust type.
    pub fn parm<T: Any>(&self, index: usize) -> Option<&T> {
        self.parms.get(index)?.downcast_ref()
    }

    pub fn parm_mut<T: Any>(&mut self, index: usize) -> Option<&mut T> {
        self.parms.get_mut(index)?.downcast_mut()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("parm_types", &self.parm_types)
            .field("nparms", &self.parms.len())
            .finish()
    }
}
