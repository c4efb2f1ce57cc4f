use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChatReply {
    /// Matched topic, "fallback" when nothing matched
    pub topic: String,
    pub reply: String,
    pub suggestions: Vec<String>,
}
