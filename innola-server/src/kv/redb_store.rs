//! redb-based document store: one table per binding, key = document key,
//! value = JSON text

use super::{Binding, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;

const BOARD_TABLE: TableDefinition<&str, &str> = TableDefinition::new("board_kv");
const EVENTS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("events_kv");
const MEMBERS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("members_kv");
const TICKETS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("tickets_kv");

fn table_for(binding: Binding) -> TableDefinition<'static, &'static str, &'static str> {
    match binding {
        Binding::Board => BOARD_TABLE,
        Binding::Events => EVENTS_TABLE,
        Binding::Members => MEMBERS_TABLE,
        Binding::Tickets => TICKETS_TABLE,
    }
}

#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database file
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Initialize tables so readers never see a missing table
        let write_txn = db.begin_write()?;
        for binding in Binding::ALL {
            let _ = write_txn.open_table(table_for(binding))?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read(&self, binding: Binding, key: &str) -> StoreResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(binding))?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn write(&self, binding: Binding, key: &str, value: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_for(binding))?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RedbStore {
    fn is_bound(&self, _binding: Binding) -> bool {
        true
    }

    async fn get(&self, binding: Binding, key: &str) -> StoreResult<Option<String>> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.read(binding, &key))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn put(&self, binding: Binding, key: &str, value: String) -> StoreResult<()> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.write(binding, &key, &value))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}
