use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::store::{
    Conversation, ConversationWithExplanation, Explanation, NewConversation, NewExplanation,
    Storage, StoreError,
};

/// Ephemeral backend for development: two maps behind one lock. Server
/// workers run on multiple threads, so the shared maps need real
/// synchronization even in the throwaway mode.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    conversations: HashMap<Uuid, Conversation>,
    explanations: HashMap<Uuid, Explanation>,
}

impl Inner {
    fn explanation_for(&self, conversation_id: Uuid) -> Option<Explanation> {
        self.explanations
            .values()
            .find(|e| e.conversation_id == conversation_id)
            .cloned()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn create_conversation(&self, new: NewConversation) -> Result<Conversation, StoreError> {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            question: new.question,
            topic: new.topic,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.lock().unwrap();
        inner
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(
        &self,
        id: Uuid,
    ) -> Result<Option<ConversationWithExplanation>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .conversations
            .get(&id)
            .map(|c| ConversationWithExplanation {
                conversation: c.clone(),
                explanation: inner.explanation_for(id),
            }))
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationWithExplanation>, StoreError> {
        let inner = self.inner.lock().unwrap();

        let mut all: Vec<ConversationWithExplanation> = inner
            .conversations
            .values()
            .map(|c| ConversationWithExplanation {
                conversation: c.clone(),
                explanation: inner.explanation_for(c.id),
            })
            .collect();

        all.sort_by(|a, b| b.conversation.created_at.cmp(&a.conversation.created_at));
        Ok(all)
    }

    async fn delete_conversation(&self, id: Uuid) -> Result<(), StoreError> {
        // One lock across both removals so no reader observes the
        // half-deleted pair.
        let mut inner = self.inner.lock().unwrap();

        let explanation_id = inner
            .explanations
            .iter()
            .find(|(_, e)| e.conversation_id == id)
            .map(|(eid, _)| *eid);

        if let Some(eid) = explanation_id {
            inner.explanations.remove(&eid);
        }
        inner.conversations.remove(&id);
        Ok(())
    }

    async fn create_explanation(&self, new: NewExplanation) -> Result<Explanation, StoreError> {
        let explanation = Explanation {
            id: Uuid::new_v4(),
            conversation_id: new.conversation_id,
            definition: new.definition,
            explanation: new.explanation,
            code_example: new.code_example,
            summary: new.summary,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.lock().unwrap();
        inner
            .explanations
            .insert(explanation.id, explanation.clone());
        Ok(explanation)
    }
}
