use chrono::{DateTime, FixedOffset};

use crate::{task::Task, task_status::TaskStatus};

/// Filter set shared by every store backend.
///
/// Text filters are case-insensitive. The due window is inclusive on both
/// ends. Results are always ordered by ascending `due_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskQuery {
    pub tenant: String,
    pub course: Option<String>,
    pub title_contains: Option<String>,
    pub due_from: Option<DateTime<FixedOffset>>,
    pub due_to: Option<DateTime<FixedOffset>>,
    pub status: Option<TaskStatus>,
    pub status_not: Option<TaskStatus>,
    pub limit: Option<usize>,
}

impl TaskQuery {
    pub fn for_tenant(tenant: impl Into<String>) -> Self {
        TaskQuery {
            tenant: tenant.into(),
            course: None,
            title_contains: None,
            due_from: None,
            due_to: None,
            status: None,
            status_not: None,
            limit: None,
        }
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    pub fn title_contains(mut self, fragment: impl Into<String>) -> Self {
        self.title_contains = Some(fragment.into());
        self
    }

    pub fn due_between(mut self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Self {
        self.due_from = Some(from);
        self.due_to = Some(to);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn status_not(mut self, status: TaskStatus) -> Self {
        self.status_not = Some(status);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if task.user_id != self.tenant {
            return false;
        }
        if let Some(course) = &self.course {
            if task.course.to_lowercase() != course.to_lowercase() {
                return false;
            }
        }
        if let Some(fragment) = &self.title_contains {
            if !task.title.to_lowercase().contains(&fragment.to_lowercase()) {
                return false;
            }
        }
        if self.due_from.is_some_and(|from| task.due_at < from) {
            return false;
        }
        if self.due_to.is_some_and(|to| task.due_at > to) {
            return false;
        }
        if self.status.is_some_and(|s| task.status != s) {
            return false;
        }
        if self.status_not.is_some_and(|s| task.status == s) {
            return false;
        }
        true
    }

    /// Filter, order and cap an in-process row set (local backends).
    pub fn apply<'a>(&self, rows: impl IntoIterator<Item = &'a Task>) -> Vec<Task> {
        let mut hits: Vec<Task> = rows.into_iter().filter(|t| self.matches(t)).cloned().collect();
        hits.sort_by(|a, b| a.due_at.cmp(&b.due_at));
        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }
        hits
    }
}
