//! Message handlers, per-type handler tables and call-site caches.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::RuntimeError;
use crate::message::Message;

/// A handler implementing one selector for one type. Returns whether the
/// message succeeded.
pub type Handler = Arc<dyn Fn(&mut Message) -> bool + Send + Sync>;

/// Selector → handler for one type.
#[derive(Default)]
pub struct HandlerTable {
    handlers: RwLock<FxHashMap<String, Handler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, selector: &str) -> Option<Handler> {
        self.handlers.read().get(selector).cloned()
    }

    /// Bind `selector` to `handler`. A selector already bound keeps its
    /// handler; the second binding is an error.
    pub fn insert(
        &self,
        type_name: &str,
        selector: &str,
        handler: Handler,
    ) -> Result<(), RuntimeError> {
        let mut handlers = self.handlers.write();
        if handlers.contains_key(selector) {
            return Err(RuntimeError::DuplicateHandler {
                type_name: type_name.to_string(),
                selector: selector.to_string(),
            });
        }
        handlers.insert(selector.to_string(), handler);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        let mut selectors: Vec<_> = handlers.keys().collect();
        selectors.sort_unstable();
        f.debug_struct("HandlerTable")
            .field("selectors", &selectors)
            .finish()
    }
}

/// What a [`HandlerSlot`] holds.
pub enum SlotState<'a> {
    Unresolved,
    Resolved(&'a Handler),
}

/// The cached handler of one (receiver type, selector) pair.
///
/// Starts unresolved and is filled by the first successful lookup. A filled
/// slot is never cleared or overwritten.
#[derive(Default)]
pub struct HandlerSlot {
    handler: OnceLock<Handler>,
}

impl HandlerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SlotState<'_> {
        match self.handler.get() {
            Some(handler) => SlotState::Resolved(handler),
            None => SlotState::Unresolved,
        }
    }

    pub fn get(&self) -> Option<&Handler> {
        self.handler.get()
    }

    /// Return the cached handler, or run `lookup` and cache what it finds.
    ///
    /// A failed lookup leaves the slot unresolved so a later send retries.
    pub fn resolve(&self, lookup: impl FnOnce() -> Option<Handler>) -> Option<&Handler> {
        if let Some(handler) = self.handler.get() {
            return Some(handler);
        }
        let found = lookup()?;
        Some(self.handler.get_or_init(|| found))
    }
}

impl fmt::Debug for HandlerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.state() {
            SlotState::Unresolved => "HandlerSlot(unresolved)",
            SlotState::Resolved(_) => "HandlerSlot(resolved)",
        })
    }
}
