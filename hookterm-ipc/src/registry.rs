//! Live context registry.

use crate::error::IpcError;
use crate::router::{ContextDirectory, select_targets};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Id → context map. Ids start at 1 and are never reused within a process.
pub struct ContextRegistry<C> {
    next_id: u64,
    contexts: BTreeMap<u64, Rc<C>>,
}

impl<C> Default for ContextRegistry<C> {
    fn default() -> Self {
        Self {
            next_id: 1,
            contexts: BTreeMap::new(),
        }
    }
}

impl<C> ContextRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: u64, context: Rc<C>) {
        if self.contexts.insert(id, context).is_some() {
            log::warn!("Context {} replaced in registry", id);
        }
    }

    pub fn remove(&mut self, id: u64) -> Option<Rc<C>> {
        self.contexts.remove(&id)
    }

    pub fn get(&self, id: u64) -> Option<Rc<C>> {
        self.contexts.get(&id).cloned()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.contexts.keys().copied().collect()
    }

    /// Every context in id order.
    pub fn all(&self) -> Vec<Rc<C>> {
        self.contexts.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn resolve(&self, dest: Option<u64>) -> Result<Vec<Rc<C>>, IpcError> {
        select_targets(dest, |id| self.get(id), || self.all())
    }
}

impl<C> ContextDirectory for ContextRegistry<C> {
    fn ids(&self) -> Vec<u64> {
        ContextRegistry::ids(self)
    }
}
