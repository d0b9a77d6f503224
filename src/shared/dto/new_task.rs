use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::{task_priority::TaskPriority, task_status::TaskStatus};

/// Insert payload. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub user_id: String,
    pub title: String,
    pub course: String,
    pub due_at: DateTime<FixedOffset>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}
