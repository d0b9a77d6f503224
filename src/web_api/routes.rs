pub mod health_routes;
pub mod webhook_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app_state::SharedState;

pub fn map_routes(app_state: SharedState) -> Router {
    Router::new()
        .merge(webhook_routes::get_router(app_state.clone()))
        .merge(health_routes::get_router(app_state))
        .layer(TraceLayer::new_for_http())
}
