use axum::{routing::get, Router};

use crate::{app_state::SharedState, webhook_controller::WebhookController};

pub fn get_router(app_state: SharedState) -> Router {
    let path = app_state.webhook_path.clone();
    Router::new()
        .route(path.as_str(), get(WebhookController::get).post(WebhookController::post))
        .with_state(app_state)
}
