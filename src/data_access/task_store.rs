//! The task store seam.
//!
//! The dispatcher only ever talks to `dyn TaskStore`. Production wires the
//! hosted PostgREST client; local runs use the redb file; tests use memory.

use async_trait::async_trait;

use super::task_query::TaskQuery;
use crate::{new_task::NewTask, task::{Task, TaskId}, task_status::TaskStatus};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert one row and return it as stored (with its generated id).
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Rows matching every filter in `query`, ascending by `due_at`.
    async fn select(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError>;

    /// Set the status of one row. None if the row is gone.
    async fn update_status(&self, tenant: &str, id: &TaskId, status: TaskStatus) -> Result<Option<Task>, StoreError>;

    /// Remove one row, returning it. None if the row is gone.
    async fn delete(&self, tenant: &str, id: &TaskId) -> Result<Option<Task>, StoreError>;
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("store responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("redb: {0}")]
    Redb(String),
    #[error("blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("insert returned no row")]
    EmptyInsert,
}
