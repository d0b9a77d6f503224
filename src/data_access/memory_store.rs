use std::sync::{
    atomic::{AtomicUsize, Ordering},
    PoisonError, RwLock,
};

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    task_query::TaskQuery,
    task_store::{StoreError, TaskStore},
};
use crate::{new_task::NewTask, task::{Task, TaskId}, task_status::TaskStatus};

/// In-process store. Counts mutations so callers can assert none happened.
#[derive(Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    mutations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows as-is, without counting them as mutations.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        MemoryStore {
            tasks: RwLock::new(tasks),
            mutations: AtomicUsize::new(0),
        }
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let row = Task {
            id: TaskId(Uuid::new_v4().to_string()),
            user_id: task.user_id,
            title: task.title,
            course: task.course,
            due_at: task.due_at,
            priority: task.priority,
            status: task.status,
        };
        self.tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row.clone());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn select(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().unwrap_or_else(PoisonError::into_inner);
        Ok(query.apply(tasks.iter()))
    }

    async fn update_status(&self, tenant: &str, id: &TaskId, status: TaskStatus) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
        let Some(task) = tasks.iter_mut().find(|t| &t.id == id && t.user_id == tenant) else {
            return Ok(None);
        };
        task.status = status;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(Some(task.clone()))
    }

    async fn delete(&self, tenant: &str, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
        let Some(idx) = tasks.iter().position(|t| &t.id == id && t.user_id == tenant) else {
            return Ok(None);
        };
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(Some(tasks.remove(idx)))
    }
}
