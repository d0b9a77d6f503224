//! Task rows in a local redb file.
//!
//! Used when no hosted store is configured. One table, keyed by the row's
//! uuid bytes, values postcard-encoded.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    task_query::TaskQuery,
    task_store::{StoreError, TaskStore},
};
use crate::{
    new_task::NewTask,
    task::{Task, TaskId},
    task_priority::TaskPriority,
    task_status::TaskStatus,
};

const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");

/// On-disk shape. Kept separate from `Task` so the id stays a real uuid.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTask {
    id: Uuid,
    user_id: String,
    title: String,
    course: String,
    due_at: DateTime<FixedOffset>,
    priority: TaskPriority,
    status: TaskStatus,
}

impl From<StoredTask> for Task {
    fn from(row: StoredTask) -> Self {
        Task {
            id: TaskId(row.id.to_string()),
            user_id: row.user_id,
            title: row.title,
            course: row.course,
            due_at: row.due_at,
            priority: row.priority,
            status: row.status,
        }
    }
}

fn encode(row: &StoredTask) -> Result<Vec<u8>, StoreError> {
    postcard::to_allocvec(row).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<StoredTask, StoreError> {
    postcard::from_bytes(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>,
}

impl DataContext {
    /// Open (or create) the file and make sure the table exists.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TASKS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(DataContext { db: Arc::new(db) })
    }

    fn insert_row(&self, task: NewTask) -> Result<Task, StoreError> {
        let row = StoredTask {
            id: Uuid::new_v4(),
            user_id: task.user_id,
            title: task.title,
            course: task.course,
            due_at: task.due_at,
            priority: task.priority,
            status: task.status,
        };
        let bytes = encode(&row)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            tasks_table.insert(row.id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(row.into())
    }

    fn select_rows(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let tasks_table = read_txn.open_table(TASKS_TABLE)?;

        let mut tasks = Vec::new();
        for entry in tasks_table.iter()? {
            let (_, value) = entry?;
            tasks.push(Task::from(decode(value.value())?));
        }
        Ok(query.apply(tasks.iter()))
    }

    /// Read one row for the tenant, inside an open write transaction.
    fn owned_row(table: &redb::Table<'_, &'static [u8], &'static [u8]>, key: &Uuid, tenant: &str) -> Result<Option<StoredTask>, StoreError> {
        let row = match table.get(key.as_bytes().as_slice())? {
            Some(data) => decode(data.value())?,
            None => return Ok(None),
        };
        Ok((row.user_id == tenant).then_some(row))
    }

    fn update_row(&self, tenant: &str, id: &TaskId, status: TaskStatus) -> Result<Option<Task>, StoreError> {
        let Ok(key) = Uuid::parse_str(&id.0) else {
            return Ok(None);
        };

        let write_txn = self.db.begin_write()?;
        let updated;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let Some(mut row) = Self::owned_row(&tasks_table, &key, tenant)? else {
                return Ok(None);
            };
            row.status = status;
            let bytes = encode(&row)?;
            tasks_table.insert(key.as_bytes().as_slice(), bytes.as_slice())?;
            updated = row;
        }
        write_txn.commit()?;
        Ok(Some(updated.into()))
    }

    fn delete_row(&self, tenant: &str, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let Ok(key) = Uuid::parse_str(&id.0) else {
            return Ok(None);
        };

        let write_txn = self.db.begin_write()?;
        let removed;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let Some(row) = Self::owned_row(&tasks_table, &key, tenant)? else {
                return Ok(None);
            };
            tasks_table.remove(key.as_bytes().as_slice())?;
            removed = row;
        }
        write_txn.commit()?;
        Ok(Some(removed.into()))
    }
}

impl DataContext {
    /// Run a redb transaction on the blocking pool so disk waits stay off the async workers.
    async fn blocking<T, F>(&self, op: &'static str, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&DataContext) -> Result<T, StoreError> + Send + 'static,
    {
        let started = Instant::now();
        let ctx = self.clone();
        let result = tokio::task::spawn_blocking(move || work(&ctx)).await?;
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, op, ok = result.is_ok(), "redb call finished");
        result
    }
}

#[async_trait]
impl TaskStore for DataContext {
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        self.blocking("insert", move |ctx| ctx.insert_row(task)).await
    }

    async fn select(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let query = query.clone();
        self.blocking("select", move |ctx| ctx.select_rows(&query)).await
    }

    async fn update_status(&self, tenant: &str, id: &TaskId, status: TaskStatus) -> Result<Option<Task>, StoreError> {
        let (tenant, id) = (tenant.to_string(), id.clone());
        self.blocking("update", move |ctx| ctx.update_row(&tenant, &id, status)).await
    }

    async fn delete(&self, tenant: &str, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let (tenant, id) = (tenant.to_string(), id.clone());
        self.blocking("delete", move |ctx| ctx.delete_row(&tenant, &id)).await
    }
}

// ── Errors ─────────────────────────────────────────────────────

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

// ── Tests ──────────────────────────────────────────────────────
