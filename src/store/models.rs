use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub question: String,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub definition: Option<String>,
    pub explanation: String,
    pub code_example: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The shape every read endpoint returns: a conversation with its
/// explanation merged in, when one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationWithExplanation {
    #[serde(flatten)]
    pub conversation: Conversation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

#[derive(Debug, Clone)]
pub struct NewConversation {
    pub question: String,
    pub topic: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExplanation {
    pub conversation_id: Uuid,
    pub definition: Option<String>,
    pub explanation: String,
    pub code_example: Option<String>,
    pub summary: Option<String>,
}
