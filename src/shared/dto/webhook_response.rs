use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl WebhookResponse {
    pub fn new(text: impl Into<String>) -> Self {
        WebhookResponse {
            fulfillment_text: text.into(),
        }
    }
}
