pub mod database;
pub mod memory;
pub mod models;

pub use models::*;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use database::DuckDbStore;
use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database Error: {0}")]
    Database(#[from] duckdb::Error),
}

/// Persistence contract shared by the ephemeral and durable backends.
///
/// `create_explanation` trusts the caller to pass the id of an existing
/// conversation; the in-memory backend does not validate the reference.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_conversation(&self, new: NewConversation) -> Result<Conversation, StoreError>;

    /// The conversation joined with its explanation, or `None` for an
    /// unknown id.
    async fn get_conversation(
        &self,
        id: Uuid,
    ) -> Result<Option<ConversationWithExplanation>, StoreError>;

    /// Full scan, newest first. No pagination; ties between equal
    /// timestamps are broken arbitrarily.
    async fn list_conversations(&self) -> Result<Vec<ConversationWithExplanation>, StoreError>;

    /// Removes the explanation (if present) then the conversation. A
    /// no-op for an unknown id, never an error.
    async fn delete_conversation(&self, id: Uuid) -> Result<(), StoreError>;

    async fn create_explanation(&self, new: NewExplanation) -> Result<Explanation, StoreError>;
}

/// Builds the storage backend once at startup, selected by deployment
/// environment rather than per-request.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Storage>, StoreError> {
    if config.is_production() {
        Ok(Arc::new(DuckDbStore::open(&config.database.path)?))
    } else {
        info!("Using in-memory store; conversations are lost on restart");
        Ok(Arc::new(MemoryStore::new()))
    }
}
