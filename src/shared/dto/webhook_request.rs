use serde::Deserialize;
use serde_json::{Map, Value};

/// Fulfillment request from the conversational platform.
///
/// Every level is optional; the platform omits whatever it has nothing for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub query_result: Option<QueryResult>,
    #[serde(default)]
    pub original_detect_intent_request: Option<OriginalDetectIntentRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub intent: Option<IntentRef>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub query_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Channel-specific payload (messenger integrations put the raw text here).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OriginalDetectIntentRequest {
    #[serde(default)]
    pub payload: Option<Value>,
}

impl WebhookRequest {
    pub fn intent_name(&self) -> Option<&str> {
        self.query_result
            .as_ref()?
            .intent
            .as_ref()?
            .display_name
            .as_deref()
    }

    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.query_result.as_ref().map(|q| &q.parameters)
    }

    /// The user's raw utterance: `queryText`, else the messenger payload text.
    pub fn user_text(&self) -> String {
        if let Some(q) = self.query_result.as_ref().and_then(|q| q.query_text.as_deref()) {
            if !q.is_empty() {
                return q.to_string();
            }
        }

        let Some(payload) = self
            .original_detect_intent_request
            .as_ref()
            .and_then(|o| o.payload.as_ref())
        else {
            return String::new();
        };

        [
            payload.pointer("/data/message/text"),
            payload.pointer("/data/text"),
        ]
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .unwrap_or_default()
        .to_string()
    }
}
