use std::sync::Arc;

use anyhow::Context;
use tugas_webhook::{
    app_state::{AppState, SharedState},
    data_access::{
        data_context::DataContext, memory_store::MemoryStore, postgrest_store::PostgrestStore,
        task_store::TaskStore,
    },
    fulfillment::{
        clock::SystemClock,
        dispatcher::{DispatchConfig, IntentDispatcher},
    },
    logging, map_routes,
    settings::{Settings, StoreBackend, StoreCredentials},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Configuration ──────────────────────────────────────────
    let _ = dotenvy::dotenv();
    let settings = Settings::load().context("failed to load settings")?;
    logging::init(settings.log_format);
    settings.log_notes();

    // ── Task store (one client for the whole process) ──────────
    let store: Arc<dyn TaskStore> = match settings.store_backend {
        StoreBackend::Postgrest => {
            let credentials = StoreCredentials::from_env().context("hosted store is not configured")?;
            tracing::info!(url = %credentials.url, table = %settings.tasks_table, "using hosted task store");
            Arc::new(PostgrestStore::new(&credentials, &settings.tasks_table))
        }
        StoreBackend::Local => {
            tracing::info!(path = %settings.local_store_path, "using local redb task store");
            Arc::new(
                DataContext::open(&settings.local_store_path)
                    .with_context(|| format!("failed to open {}", settings.local_store_path))?,
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory task store, tasks are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // ── Shared state ───────────────────────────────────────────
    let dispatcher = IntentDispatcher::new(
        store,
        Arc::new(SystemClock),
        DispatchConfig {
            tenant_id: settings.tenant_id.clone(),
            completion_policy: settings.completion_policy,
            list_limit: settings.list_limit,
        },
    );
    let state: SharedState = Arc::new(AppState {
        dispatcher,
        webhook_path: settings.webhook_path.clone(),
    });

    // ── Start ──────────────────────────────────────────────────
    let app = map_routes(state);
    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        webhook = %settings.webhook_path,
        tenant = %settings.tenant_id,
        completion_policy = ?settings.completion_policy,
        "server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
