//! Process settings.
//!
//! Loaded from `settings.json` (or `$TUGAS_SETTINGS`). Environment variables
//! override file values; file values override defaults.

use std::{fs, io, path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::completion_policy::CompletionPolicy;

const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("cannot parse settings file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Hosted Postgres behind PostgREST (Supabase).
    #[default]
    Postgrest,
    /// redb file on local disk.
    Local,
    /// Process memory, gone on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgrest" | "supabase" => Ok(StoreBackend::Postgrest),
            "local" | "redb" => Ok(StoreBackend::Local),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    pub webhook_path: String,
    pub tenant_id: String,
    pub completion_policy: CompletionPolicy,
    pub store_backend: StoreBackend,
    pub local_store_path: String,
    pub tasks_table: String,
    pub list_limit: usize,
    pub log_format: LogFormat,
    /// What happened while loading. Logging is not up yet at that point,
    /// so `main` replays these through `log_notes` after `logging::init`.
    #[serde(skip)]
    pub notes: Vec<LoadNote>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadNote {
    MissingFile { path: String },
    RejectedOverride { var: &'static str, value: String, reason: String },
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tcp_socket_binding: "0.0.0.0".to_string(),
            tcp_socket_port: 3000,
            webhook_path: "/api/webhook".to_string(),
            tenant_id: "demo".to_string(),
            completion_policy: CompletionPolicy::Archive,
            store_backend: StoreBackend::Postgrest,
            local_store_path: "tasks.redb".to_string(),
            tasks_table: "tasks".to_string(),
            list_limit: 10,
            log_format: LogFormat::Pretty,
            notes: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using a custom env resolver (tests avoid touching the process env).
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Settings, ConfigError> {
        let path = env("TUGAS_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));

        let mut settings = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Settings {
                notes: vec![LoadNote::MissingFile {
                    path: path.display().to_string(),
                }],
                ..Settings::default()
            },
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        settings.apply_overrides(env);
        Ok(settings)
    }

    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.tcp_socket_port = port,
                Err(e) => self.reject("PORT", v, e.to_string()),
            }
        }
        if let Some(v) = env("TUGAS_BIND") {
            self.tcp_socket_binding = v;
        }
        if let Some(v) = env("TUGAS_TENANT_ID") {
            self.tenant_id = v;
        }
        if let Some(v) = env("TUGAS_COMPLETION_POLICY") {
            match v.parse() {
                Ok(policy) => self.completion_policy = policy,
                Err(e) => self.reject("TUGAS_COMPLETION_POLICY", v, e),
            }
        }
        if let Some(v) = env("TUGAS_STORE_BACKEND") {
            match v.parse() {
                Ok(backend) => self.store_backend = backend,
                Err(e) => self.reject("TUGAS_STORE_BACKEND", v, e),
            }
        }
        if let Some(v) = env("TUGAS_LOCAL_STORE") {
            self.local_store_path = v;
        }
    }

    fn reject(&mut self, var: &'static str, value: String, reason: String) {
        self.notes.push(LoadNote::RejectedOverride { var, value, reason });
    }

    /// Emit the load notes. Call once the subscriber is installed.
    pub fn log_notes(&self) {
        for note in &self.notes {
            match note {
                LoadNote::MissingFile { path } => {
                    tracing::info!(%path, "no settings file found, using defaults")
                }
                LoadNote::RejectedOverride { var, value, reason } => {
                    tracing::warn!(var = *var, %value, %reason, "ignoring invalid env override")
                }
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }
}

/// Hosted store endpoint and privileged key. Environment only, never in settings.json.
#[derive(Clone)]
pub struct StoreCredentials {
    pub url: String,
    pub service_role_key: String,
}

impl StoreCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = env("SUPABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingEnv("SUPABASE_URL"))?;
        let service_role_key = env("SUPABASE_SERVICE_ROLE_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingEnv("SUPABASE_SERVICE_ROLE_KEY"))?;
        Ok(StoreCredentials {
            url: url.trim().trim_end_matches('/').to_string(),
            service_role_key,
        })
    }
}

// Keep the key out of Debug output.
impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}
