#[cfg(test)]
mod tests {
    use std::time::Duration;

    use explaind::store::database::DuckDbStore;
    use explaind::store::memory::MemoryStore;
    use explaind::store::{NewConversation, NewExplanation, Storage};
    use uuid::Uuid;

    async fn conversation_lifecycle(store: &dyn Storage) {
        // 1. Create a conversation
        let conversation = store
            .create_conversation(NewConversation {
                question: "What is recursion?".to_string(),
                topic: Some("Algorithms".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(conversation.question, "What is recursion?");
        assert_eq!(conversation.topic.as_deref(), Some("Algorithms"));

        // 2. Attach its explanation
        let explanation = store
            .create_explanation(NewExplanation {
                conversation_id: conversation.id,
                definition: None,
                explanation: "A function that calls itself until a base case stops it."
                    .to_string(),
                code_example: Some("fn fact(n: u64) -> u64 { if n <= 1 { 1 } else { n * fact(n - 1) } }".to_string()),
                summary: None,
            })
            .await
            .unwrap();
        assert_eq!(explanation.conversation_id, conversation.id);

        // 3. Get returns the joined pair
        let fetched = store.get_conversation(conversation.id).await.unwrap().unwrap();
        assert_eq!(fetched.conversation.id, conversation.id);
        assert_eq!(fetched.conversation.question, "What is recursion?");
        let joined = fetched.explanation.expect("explanation should be joined in");
        assert_eq!(joined.id, explanation.id);
        assert_eq!(joined.definition, None);
        assert!(joined.code_example.is_some());

        // 4. List contains exactly this record
        let list = store.list_conversations().await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].explanation.is_some());

        // 5. Cascade delete removes both records
        store.delete_conversation(conversation.id).await.unwrap();
        assert!(store.get_conversation(conversation.id).await.unwrap().is_none());
        assert!(store.list_conversations().await.unwrap().is_empty());
    }

    async fn list_is_newest_first(store: &dyn Storage) {
        for i in 0..3 {
            store
                .create_conversation(NewConversation {
                    question: format!("question {}", i),
                    topic: None,
                })
                .await
                .unwrap();
            // Keep created_at strictly increasing across iterations.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let list = store.list_conversations().await.unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].conversation.question, "question 2");
        assert_eq!(list[2].conversation.question, "question 0");
        for pair in list.windows(2) {
            assert!(pair[0].conversation.created_at >= pair[1].conversation.created_at);
        }
    }

    #[tokio::test]
    async fn memory_store_lifecycle() {
        conversation_lifecycle(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn duckdb_store_lifecycle() {
        let store = DuckDbStore::open(":memory:").unwrap();
        conversation_lifecycle(&store).await;
    }

    #[tokio::test]
    async fn memory_store_lists_newest_first() {
        list_is_newest_first(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn duckdb_store_lists_newest_first() {
        let store = DuckDbStore::open(":memory:").unwrap();
        list_is_newest_first(&store).await;
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_noop() {
        let memory = MemoryStore::new();
        memory.delete_conversation(Uuid::new_v4()).await.unwrap();

        let duckdb = DuckDbStore::open(":memory:").unwrap();
        duckdb.delete_conversation(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn conversation_without_explanation_is_still_visible() {
        let store = DuckDbStore::open(":memory:").unwrap();

        let conversation = store
            .create_conversation(NewConversation {
                question: "orphaned?".to_string(),
                topic: None,
            })
            .await
            .unwrap();

        let fetched = store.get_conversation(conversation.id).await.unwrap().unwrap();
        assert!(fetched.explanation.is_none());

        let list = store.list_conversations().await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].explanation.is_none());
    }

    #[tokio::test]
    async fn question_round_trips_byte_for_byte() {
        let store = DuckDbStore::open(":memory:").unwrap();

        let question = "What's the difference between  \"&str\"  and String?";
        let conversation = store
            .create_conversation(NewConversation {
                question: question.to_string(),
                topic: Some("General".to_string()),
            })
            .await
            .unwrap();

        let fetched = store.get_conversation(conversation.id).await.unwrap().unwrap();
        assert_eq!(fetched.conversation.question, question);
    }
}
