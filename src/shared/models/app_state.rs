use std::sync::Arc;

use crate::fulfillment::dispatcher::IntentDispatcher;

pub struct AppState {
    pub dispatcher: IntentDispatcher,
    pub webhook_path: String,
}

pub type SharedState = Arc<AppState>;
