//! In-process document store

use super::{Binding, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

pub struct MemoryStore {
    bound: BTreeSet<Binding>,
    docs: RwLock<HashMap<(Binding, String), String>>,
}

impl MemoryStore {
    /// Store with every binding bound
    pub fn new() -> Self {
        Self::with_bindings(&Binding::ALL)
    }

    /// Store where only the given bindings are bound
    pub fn with_bindings(bindings: &[Binding]) -> Self {
        Self {
            bound: bindings.iter().copied().collect(),
            docs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn is_bound(&self, binding: Binding) -> bool {
        self.bound.contains(&binding)
    }

    async fn get(&self, binding: Binding, key: &str) -> StoreResult<Option<String>> {
        if !self.is_bound(binding) {
            return Err(StoreError::Unbound(binding));
        }
        let docs = self.docs.read().await;
        Ok(docs.get(&(binding, key.to_string())).cloned())
    }

    async fn put(&self, binding: Binding, key: &str, value: String) -> StoreResult<()> {
        if !self.is_bound(binding) {
            return Err(StoreError::Unbound(binding));
        }
        self.docs
            .write()
            .await
            .insert((binding, key.to_string()), value);
        Ok(())
    }
}
