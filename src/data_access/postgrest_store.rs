//! Hosted task table behind Supabase's PostgREST endpoint.
//!
//! Every call is one HTTP round trip against `{url}/rest/v1/{table}`,
//! authenticated with the service-role key. Mutations ask for
//! `return=representation` so the affected rows come back in the body.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use super::{
    task_query::TaskQuery,
    task_store::{StoreError, TaskStore},
};
use crate::{
    new_task::NewTask,
    settings::StoreCredentials,
    task::{Task, TaskId},
    task_status::TaskStatus,
};

const SELECT_COLUMNS: &str = "id,user_id,title,course,due_at,priority,status";
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    table_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct StatusPatch {
    status: TaskStatus,
}

impl PostgrestStore {
    pub fn new(credentials: &StoreCredentials, table: &str) -> Self {
        Self::with_client(Client::new(), credentials, table)
    }

    pub fn with_client(client: Client, credentials: &StoreCredentials, table: &str) -> Self {
        PostgrestStore {
            client,
            table_url: format!("{}/rest/v1/{}", credentials.url, table),
            api_key: credentials.service_role_key.clone(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn row_filter(tenant: &str, id: &TaskId) -> Vec<(String, String)> {
        vec![
            ("id".to_string(), format!("eq.{id}")),
            ("user_id".to_string(), format!("eq.{tenant}")),
            ("select".to_string(), SELECT_COLUMNS.to_string()),
        ]
    }

    async fn rows(response: Response) -> Result<Vec<Task>, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Render a query as PostgREST filter parameters.
pub fn query_params(query: &TaskQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("select".to_string(), SELECT_COLUMNS.to_string()),
        ("user_id".to_string(), format!("eq.{}", query.tenant)),
    ];
    if let Some(course) = &query.course {
        params.push(("course".to_string(), format!("ilike.{}", escape_like(course))));
    }
    if let Some(fragment) = &query.title_contains {
        params.push(("title".to_string(), format!("ilike.%{}%", escape_like(fragment))));
    }
    if let Some(from) = query.due_from {
        params.push(("due_at".to_string(), format!("gte.{}", from.to_rfc3339())));
    }
    if let Some(to) = query.due_to {
        params.push(("due_at".to_string(), format!("lte.{}", to.to_rfc3339())));
    }
    if let Some(status) = query.status {
        params.push(("status".to_string(), format!("eq.{status}")));
    }
    if let Some(status) = query.status_not {
        params.push(("status".to_string(), format!("neq.{status}")));
    }
    params.push(("order".to_string(), "due_at.asc".to_string()));
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// User text inside a LIKE pattern must not act as a wildcard.
///
/// PostgREST rewrites `*` to `%` before Postgres sees the pattern, so it
/// cannot be escaped; it becomes `_` and matches only a single character.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait]
impl TaskStore for PostgrestStore {
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let started = Instant::now();
        let response = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=representation")
            .query(&[("select", SELECT_COLUMNS)])
            .json(&task)
            .send()
            .await?;
        let row = Self::rows(response).await?.into_iter().next().ok_or(StoreError::EmptyInsert)?;
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, op = "insert", "postgrest call finished");
        Ok(row)
    }

    async fn select(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let started = Instant::now();
        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&query_params(query))
            .send()
            .await?;
        let rows = Self::rows(response).await?;
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, op = "select", rows = rows.len(), "postgrest call finished");
        Ok(rows)
    }

    async fn update_status(&self, tenant: &str, id: &TaskId, status: TaskStatus) -> Result<Option<Task>, StoreError> {
        let started = Instant::now();
        let response = self
            .authorized(self.client.patch(&self.table_url))
            .header("Prefer", "return=representation")
            .query(&Self::row_filter(tenant, id))
            .json(&StatusPatch { status })
            .send()
            .await?;
        let row = Self::rows(response).await?.into_iter().next();
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, op = "update", hit = row.is_some(), "postgrest call finished");
        Ok(row)
    }

    async fn delete(&self, tenant: &str, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let started = Instant::now();
        let response = self
            .authorized(self.client.delete(&self.table_url))
            .header("Prefer", "return=representation")
            .query(&Self::row_filter(tenant, id))
            .send()
            .await?;
        let row = Self::rows(response).await?.into_iter().next();
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, op = "delete", hit = row.is_some(), "postgrest call finished");
        Ok(row)
    }
}
