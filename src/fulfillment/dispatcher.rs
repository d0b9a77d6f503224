//! Intent dispatch.
//!
//! One call per webhook request: pick the operation from the intent name,
//! derive its fields, make the store calls, render the reply. Every outcome
//! is a reply string; store failures are logged here and replaced by a
//! generic apology.

use std::sync::Arc;

use serde_json::Map;

use super::{
    calendar::day_window,
    clock::Clock,
    extract,
    intent::Intent,
    params::ParamBag,
    replies,
    rules,
};
use crate::{
    completion_policy::CompletionPolicy,
    data_access::{
        task_query::TaskQuery,
        task_store::{StoreError, TaskStore},
    },
    new_task::NewTask,
    task_status::TaskStatus,
    webhook_request::WebhookRequest,
};

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Every store call is scoped to this tenant.
    pub tenant_id: String,
    pub completion_policy: CompletionPolicy,
    /// Max rows per listing reply; 0 = unlimited.
    pub list_limit: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            tenant_id: "demo".to_string(),
            completion_policy: CompletionPolicy::Archive,
            list_limit: 10,
        }
    }
}

pub struct IntentDispatcher {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    config: DispatchConfig,
}

impl IntentDispatcher {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, config: DispatchConfig) -> Self {
        IntentDispatcher { store, clock, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handle one request. Never fails: errors become the apology reply.
    #[tracing::instrument(skip_all, fields(intent = tracing::field::Empty))]
    pub async fn handle(&self, request: &WebhookRequest) -> String {
        let intent = Intent::from_display_name(request.intent_name());
        tracing::Span::current().record("intent", intent.name());

        match self.dispatch(&intent, request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(intent = intent.name(), error = %e, "intent handler failed");
                replies::SERVER_ERROR.to_string()
            }
        }
    }

    async fn dispatch(&self, intent: &Intent, request: &WebhookRequest) -> Result<String, StoreError> {
        let empty = Map::new();
        let params = ParamBag::new(request.parameters().unwrap_or(&empty));
        let utterance = request.user_text();

        match intent {
            Intent::AddTask => self.create_task(&params, &utterance).await,
            Intent::ListByCourse => self.list_by_course(&params).await,
            Intent::ListByDate => self.list_by_date(&params).await,
            Intent::UpdateStatus => self.update_status(&params, &utterance).await,
            Intent::Unknown(name) => {
                tracing::info!(intent = %name, "unhandled intent");
                Ok(replies::UNHANDLED_INTENT.to_string())
            }
        }
    }

    // ── Create ─────────────────────────────────────────────────

    async fn create_task(&self, params: &ParamBag<'_>, utterance: &str) -> Result<String, StoreError> {
        let Some(title) = extract::title_param(params) else {
            return Ok(replies::ASK_TITLE.to_string());
        };

        let course_raw = params.text("course");
        let course = extract::course_key(course_raw.as_deref());
        let now = self.clock.now();
        let task = NewTask {
            user_id: self.config.tenant_id.clone(),
            title,
            course: course.clone(),
            due_at: extract::resolve_due(params, &now),
            priority: extract::resolve_priority(params, utterance),
            status: TaskStatus::Todo,
        };

        let stored = self.store.insert(task).await?;
        tracing::info!(id = %stored.id, course = %stored.course, due_at = %stored.due_at, "task created");
        Ok(replies::task_saved(&stored, course_raw.as_deref().unwrap_or(&course)))
    }

    // ── List by course ─────────────────────────────────────────

    async fn list_by_course(&self, params: &ParamBag<'_>) -> Result<String, StoreError> {
        let Some(course_raw) = params.text("course") else {
            return Ok(replies::ASK_COURSE.to_string());
        };

        let course = extract::course_key(Some(&course_raw));

        let status = extract::status_filter(params);
        let query = TaskQuery::for_tenant(&self.config.tenant_id).course(course);
        let query = match status {
            Some(s) => query.status(s),
            None => query.status_not(TaskStatus::Done),
        };

        let tasks = self.store.select(&query).await?;
        tracing::info!(rows = tasks.len(), "listed tasks by course");
        if tasks.is_empty() {
            return Ok(replies::course_empty(&course_raw, status));
        }
        Ok(replies::course_listing(&course_raw, status, &tasks, self.config.list_limit))
    }

    // ── List by date ───────────────────────────────────────────

    async fn list_by_date(&self, params: &ParamBag<'_>) -> Result<String, StoreError> {
        let now = self.clock.now();
        let day = extract::resolve_day(params, &now);
        let (from, to) = day_window(day);

        let query = TaskQuery::for_tenant(&self.config.tenant_id)
            .due_between(from, to)
            .status_not(TaskStatus::Done);

        let tasks = self.store.select(&query).await?;
        tracing::info!(rows = tasks.len(), %day, "listed tasks by date");
        let day = day.format("%Y-%m-%d").to_string();
        if tasks.is_empty() {
            return Ok(replies::day_empty(&day));
        }
        Ok(replies::day_listing(&day, &tasks, self.config.list_limit))
    }

    // ── Update status ──────────────────────────────────────────

    async fn update_status(&self, params: &ParamBag<'_>, utterance: &str) -> Result<String, StoreError> {
        let from_text = rules::extract_title(utterance);
        let status = extract::resolve_status(params, from_text.as_ref().and_then(|m| m.status));

        let title = match (extract::title_param(params), from_text) {
            (Some(title), _) => title,
            (None, Some(m)) => {
                tracing::debug!(rule = m.rule, title = %m.title, "title taken from utterance");
                m.title
            }
            (None, None) => return Ok(replies::ASK_UPDATE_TITLE.to_string()),
        };

        let query = TaskQuery::for_tenant(&self.config.tenant_id)
            .title_contains(title.clone())
            .limit(1);
        let Some(target) = self.store.select(&query).await?.into_iter().next() else {
            tracing::info!(%title, "no task matched");
            return Ok(replies::not_found(&title));
        };

        let tenant = &self.config.tenant_id;
        if status == TaskStatus::Done && self.config.completion_policy == CompletionPolicy::Delete {
            return Ok(match self.store.delete(tenant, &target.id).await? {
                Some(removed) => {
                    tracing::info!(id = %removed.id, "task completed and deleted");
                    replies::completed_and_removed(&removed)
                }
                None => replies::not_found(&title),
            });
        }

        Ok(match self.store.update_status(tenant, &target.id, status).await? {
            Some(updated) => {
                tracing::info!(id = %updated.id, status = %updated.status, "task status updated");
                replies::status_changed(&updated)
            }
            None => replies::not_found(&title),
        })
    }
}
