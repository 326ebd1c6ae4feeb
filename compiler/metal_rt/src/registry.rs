//! Type descriptors and the registry that owns them.
//!
//! The registry is populated while a program starts up and read from then
//! on. Descriptors are handed out as `Arc`s so a lookup never holds the
//! registry lock while a handler runs.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::RuntimeError;
use crate::handler::{Handler, HandlerSlot, HandlerTable};
use crate::message::Message;

/// Index of a type descriptor within its registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIndex(pub u32);

impl fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runtime description of one declared type.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub id: TypeIndex,
    pub name: String,
    pub handlers: HandlerTable,
}

#[derive(Debug, Default)]
struct Tables {
    types: Vec<Arc<TypeDescriptor>>,
    by_name: FxHashMap<String, TypeIndex>,
}

/// Every type descriptor of a running program.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    tables: RwLock<Tables>,
    /// Dispatch cache, one slot per (receiver type, selector).
    slots: RwLock<FxHashMap<(TypeIndex, String), Arc<HandlerSlot>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, returning its index. A name registered before keeps
    /// its original index.
    pub fn register(&self, name: &str) -> TypeIndex {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let mut tables = self.tables.write();
        // Another thread may have registered it between the two locks.
        if let Some(id) = tables.by_name.get(name) {
            return *id;
        }
        let id = TypeIndex(u32::try_from(tables.types.len()).unwrap_or(u32::MAX));
        tables.types.push(Arc::new(TypeDescriptor {
            id,
            name: name.to_string(),
            handlers: HandlerTable::new(),
        }));
        tables.by_name.insert(name.to_string(), id);
        tracing::debug!(type_name = name, id = id.0, "registered type");
        id
    }

    pub fn lookup(&self, name: &str) -> Option<TypeIndex> {
        self.tables.read().by_name.get(name).copied()
    }

    pub fn descriptor(&self, id: TypeIndex) -> Option<Arc<TypeDescriptor>> {
        let index = usize::try_from(id.0).ok()?;
        self.tables.read().types.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().types.is_empty()
    }

    /// Bind `selector` on type `receiver` to `handler`.
    pub fn insert_handler(
        &self,
        receiver: TypeIndex,
        selector: &str,
        handler: Handler,
    ) -> Result<(), RuntimeError> {
        let descriptor = self
            .descriptor(receiver)
            .ok_or(RuntimeError::UnknownType(receiver))?;
        descriptor
            .handlers
            .insert(&descriptor.name, selector, handler)
    }

    /// The dispatch slot for `selector` on `receiver`, created unresolved on
    /// first use.
    pub fn slot(&self, receiver: TypeIndex, selector: &str) -> Arc<HandlerSlot> {
        let key = (receiver, selector.to_string());
        if let Some(slot) = self.slots.read().get(&key) {
            return Arc::clone(slot);
        }
        Arc::clone(self.slots.write().entry(key).or_default())
    }

    /// Resolve the handler for `selector` on `receiver`.
    ///
    /// The tables are consulted until the first successful lookup for this
    /// (receiver, selector) pair; from then on the cached handler answers.
    pub fn find_handler(&self, receiver: TypeIndex, selector: &str) -> Option<Handler> {
        self.slot(receiver, selector)
            .resolve(|| {
                tracing::trace!(receiver = receiver.0, selector, "handler cache miss");
                self.descriptor(receiver)?.handlers.find(selector)
            })
            .cloned()
    }

    /// Send `msg` to `receiver`. False when no handler is found or the
    /// handler reports failure.
    pub fn send(&self, receiver: TypeIndex, selector: &str, msg: &mut Message) -> bool {
        match self.find_handler(receiver, selector) {
            Some(handler) => handler(msg),
            None => false,
        }
    }
}
