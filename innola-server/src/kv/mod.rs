//! Key-value document store
//!
//! Every resource is one JSON document under a fixed key inside a binding
//! (a logical namespace). Handlers load the whole document, change it, and
//! write the whole document back. There is no locking or versioning: two
//! writers racing on the same document can lose an update.
//!
//! Backends:
//! - [`MemoryStore`]: process-local map (tests, demos)
//! - [`RedbStore`]: embedded file-backed store, one table per binding
//! - [`CloudflareKvStore`]: Workers KV REST API

mod cloudflare;
mod memory;
mod redb_store;

pub use cloudflare::{CLOUDFLARE_API_BASE, CloudflareKvConfig, CloudflareKvStore};
pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Logical namespace a document lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binding {
    Board,
    Events,
    Members,
    Tickets,
}

impl Binding {
    pub const ALL: [Binding; 4] = [
        Binding::Board,
        Binding::Events,
        Binding::Members,
        Binding::Tickets,
    ];

    /// Binding name as configured (`MEMBERS_KV`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Board => "BOARD_KV",
            Self::Events => "EVENTS_KV",
            Self::Members => "MEMBERS_KV",
            Self::Tickets => "TICKETS_KV",
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A document address: binding + key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocKey {
    pub binding: Binding,
    pub key: &'static str,
}

impl DocKey {
    pub const fn new(binding: Binding, key: &'static str) -> Self {
        Self { binding, key }
    }
}

pub const BOARD_MEMBERS: DocKey = DocKey::new(Binding::Board, "board_members");
pub const DASHBOARD_TASKS: DocKey = DocKey::new(Binding::Board, "dashboard_tasks");
pub const ADMIN_USERS: DocKey = DocKey::new(Binding::Board, "admin_users");
pub const VILLAGE_POSITIONS: DocKey = DocKey::new(Binding::Board, "village_positions");
pub const ALL_EVENTS: DocKey = DocKey::new(Binding::Events, "all_events");
pub const ALL_MEMBERS: DocKey = DocKey::new(Binding::Members, "all_members");
pub const ALL_TICKETS: DocKey = DocKey::new(Binding::Tickets, "all_tickets");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not configured")]
    Unbound(Binding),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("KV request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("KV API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Storage task failed: {0}")]
    Task(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw document storage: opaque JSON text per key per binding
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Whether the binding has backing storage
    fn is_bound(&self, binding: Binding) -> bool;

    /// Read a document; `None` when the key was never written
    async fn get(&self, binding: Binding, key: &str) -> StoreResult<Option<String>>;

    /// Replace a document
    async fn put(&self, binding: Binding, key: &str, value: String) -> StoreResult<()>;
}

/// Typed access to the document store
#[derive(Clone)]
pub struct Documents {
    store: Arc<dyn DocumentStore>,
}

impl Documents {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn is_bound(&self, binding: Binding) -> bool {
        self.store.is_bound(binding)
    }

    /// Fail with [`StoreError::Unbound`] before any other work is done
    pub fn ensure_bound(&self, binding: Binding) -> StoreResult<()> {
        if self.store.is_bound(binding) {
            Ok(())
        } else {
            Err(StoreError::Unbound(binding))
        }
    }

    /// Load and decode a document; `None` when it does not exist yet
    pub async fn load<T: DeserializeOwned>(&self, doc: DocKey) -> StoreResult<Option<T>> {
        self.ensure_bound(doc.binding)?;
        let Some(raw) = self.store.get(doc.binding, doc.key).await? else {
            tracing::debug!(binding = %doc.binding, key = doc.key, "Document not found");
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)?;
        Ok(Some(value))
    }

    /// Load a document, falling back to its empty form
    pub async fn load_or_default<T: DeserializeOwned + Default>(&self, doc: DocKey) -> StoreResult<T> {
        Ok(self.load(doc).await?.unwrap_or_default())
    }

    /// Encode and write a whole document
    pub async fn save<T: Serialize>(&self, doc: DocKey, value: &T) -> StoreResult<()> {
        self.ensure_bound(doc.binding)?;
        let raw = serde_json::to_string(value)?;
        self.store.put(doc.binding, doc.key, raw).await?;
        tracing::debug!(binding = %doc.binding, key = doc.key, "Document saved");
        Ok(())
    }
}
