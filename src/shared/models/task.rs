use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{task_priority::TaskPriority, task_status::TaskStatus};

/// Store-generated row identifier.
///
/// Hosted tables may use uuid or bigint keys; both are carried as text and only
/// ever echoed back to the store in filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TaskId(s),
            RawId::Number(n) => TaskId(n.to_string()),
        })
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: String,
    pub title: String,
    pub course: String,
    pub due_at: DateTime<FixedOffset>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hosted_row_with_numeric_id() {
        let row = r#"{
            "id": 42,
            "user_id": "demo",
            "title": "Quiz 2",
            "course": "kalkulus",
            "due_at": "2025-12-20T16:59:00+00:00",
            "priority": "medium",
            "status": "todo"
        }"#;
        let task: Task = serde_json::from_str(row).unwrap();
        assert_eq!(task.id, TaskId("42".into()));
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.due_at.timestamp(), 1766249940);
    }
}
