use axum::{body::Bytes, extract::State, Json};

use crate::{
    app_state::SharedState, fulfillment::replies, webhook_request::WebhookRequest,
    webhook_response::WebhookResponse,
};

pub struct WebhookController {}

impl WebhookController {
    /// Fulfillment call. Always 200 with a `fulfillmentText`, whatever happened.
    ///
    /// The body is parsed by hand so a malformed payload still gets a reply
    /// instead of the extractor's 4xx.
    pub async fn post(State(state): State<SharedState>, body: Bytes) -> Json<WebhookResponse> {
        let text = match serde_json::from_slice::<WebhookRequest>(&body) {
            Ok(request) => state.dispatcher.handle(&request).await,
            Err(e) => {
                tracing::warn!(error = %e, bytes = body.len(), "unreadable webhook body");
                replies::UNREADABLE_REQUEST.to_string()
            }
        };
        Json(WebhookResponse::new(text))
    }

    /// Liveness probe on the webhook path itself.
    pub async fn get(State(state): State<SharedState>) -> String {
        format!("OK {}", state.webhook_path)
    }
}
