use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Exact vocabulary lookup on a single trimmed value.
    pub fn from_word(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "rendah" | "low" => Some(TaskPriority::Low),
            "sedang" | "medium" | "normal" => Some(TaskPriority::Medium),
            "tinggi" | "high" | "urgent" | "penting" => Some(TaskPriority::High),
            _ => None,
        }
    }

    /// Parameter values never fail: anything outside the vocabulary is Medium.
    pub fn from_param(raw: &str) -> Self {
        Self::from_word(raw).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
