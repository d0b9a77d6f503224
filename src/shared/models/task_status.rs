use std::fmt;

use serde::{Deserialize, Serialize};

/// Task lifecycle: Todo → InProgress → Done.
///
/// Done tasks drop out of both listings unless a status filter asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Vocabulary lookup (Indonesian and English). None for anything unknown.
    pub fn from_word(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "todo" | "to do" | "belum" => Some(TaskStatus::Todo),
            "in progress" | "inprogress" | "in_progress" | "progres" | "proses" | "dikerjakan" => {
                Some(TaskStatus::InProgress)
            }
            "done" | "selesai" | "beres" | "kelar" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
