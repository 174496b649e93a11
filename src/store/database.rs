use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::{params, Connection, Row};
use tracing::info;
use uuid::Uuid;

use crate::store::{
    Conversation, ConversationWithExplanation, Explanation, NewConversation, NewExplanation,
    Storage, StoreError,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id UUID PRIMARY KEY,
    question TEXT NOT NULL,
    topic VARCHAR,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS explanations (
    id UUID PRIMARY KEY,
    conversation_id UUID NOT NULL,
    definition TEXT,
    explanation TEXT NOT NULL,
    code_example TEXT,
    summary TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_explanations_conversation ON explanations(conversation_id);
"#;

// Every SELECT casts ids and timestamps to VARCHAR so row mapping never
// depends on the driver's native UUID/TIMESTAMP representations.
const JOINED_SELECT: &str = "SELECT CAST(c.id AS VARCHAR), c.question, c.topic, CAST(c.created_at AS VARCHAR), \
     CAST(e.id AS VARCHAR), CAST(e.conversation_id AS VARCHAR), e.definition, e.explanation, e.code_example, e.summary, CAST(e.created_at AS VARCHAR) \
     FROM conversations c LEFT JOIN explanations e ON e.conversation_id = c.id";

/// Durable backend: one DuckDB connection shared behind a mutex.
pub struct DuckDbStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        info!("Connecting to DuckDB at {}", path);
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_conversation(row: &Row) -> duckdb::Result<Conversation> {
        Ok(Conversation {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            question: row.get(1)?,
            topic: row.get(2)?,
            created_at: parse_timestamp(&row.get::<_, String>(3)?),
        })
    }

    fn row_to_explanation(row: &Row) -> duckdb::Result<Explanation> {
        Ok(Explanation {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            conversation_id: row.get::<_, String>(1)?.parse().unwrap_or_default(),
            definition: row.get(2)?,
            explanation: row.get(3)?,
            code_example: row.get(4)?,
            summary: row.get(5)?,
            created_at: parse_timestamp(&row.get::<_, String>(6)?),
        })
    }

    fn row_to_joined(row: &Row) -> duckdb::Result<ConversationWithExplanation> {
        let conversation = Self::row_to_conversation(row)?;

        // Every explanation column is NULL when the conversation has no
        // explanation yet.
        let explanation = match row.get::<_, Option<String>>(4)? {
            Some(id) => Some(Explanation {
                id: id.parse().unwrap_or_default(),
                conversation_id: row.get::<_, String>(5)?.parse().unwrap_or_default(),
                definition: row.get(6)?,
                explanation: row.get(7)?,
                code_example: row.get(8)?,
                summary: row.get(9)?,
                created_at: parse_timestamp(&row.get::<_, String>(10)?),
            }),
            None => None,
        };

        Ok(ConversationWithExplanation {
            conversation,
            explanation,
        })
    }
}

#[async_trait]
impl Storage for DuckDbStore {
    async fn create_conversation(&self, new: NewConversation) -> Result<Conversation, StoreError> {
        let id = Uuid::new_v4();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO conversations (id, question, topic) VALUES (?, ?, ?)",
            params![id.to_string(), new.question, new.topic],
        )?;

        // Re-select so created_at reflects what the database stored.
        let mut stmt = conn.prepare(
            "SELECT CAST(id AS VARCHAR), question, topic, CAST(created_at AS VARCHAR) \
             FROM conversations WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_conversation)?;

        Ok(rows.next().unwrap()?)
    }

    async fn get_conversation(
        &self,
        id: Uuid,
    ) -> Result<Option<ConversationWithExplanation>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let query = format!("{} WHERE c.id = ?", JOINED_SELECT);
        let mut stmt = conn.prepare(&query)?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_joined)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationWithExplanation>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let query = format!("{} ORDER BY c.created_at DESC", JOINED_SELECT);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], Self::row_to_joined)?;

        let mut conversations = Vec::new();
        for row in rows {
            conversations.push(row?);
        }
        Ok(conversations)
    }

    async fn delete_conversation(&self, id: Uuid) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute("BEGIN TRANSACTION", [])?;

        let id_str = id.to_string();

        // 1. Delete the explanation first to satisfy the foreign key dependency
        if let Err(e) = conn.execute(
            "DELETE FROM explanations WHERE conversation_id = ?",
            params![id_str],
        ) {
            let _ = conn.execute("ROLLBACK", []);
            return Err(e.into());
        }

        // 2. Delete the conversation
        if let Err(e) = conn.execute("DELETE FROM conversations WHERE id = ?", params![id_str]) {
            let _ = conn.execute("ROLLBACK", []);
            return Err(e.into());
        }

        conn.execute("COMMIT", [])?;
        Ok(())
    }

    async fn create_explanation(&self, new: NewExplanation) -> Result<Explanation, StoreError> {
        let id = Uuid::new_v4();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO explanations (id, conversation_id, definition, explanation, code_example, summary) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                id.to_string(),
                new.conversation_id.to_string(),
                new.definition,
                new.explanation,
                new.code_example,
                new.summary
            ],
        )?;

        let mut stmt = conn.prepare(
            "SELECT CAST(id AS VARCHAR), CAST(conversation_id AS VARCHAR), definition, explanation, \
             code_example, summary, CAST(created_at AS VARCHAR) \
             FROM explanations WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_explanation)?;

        Ok(rows.next().unwrap()?)
    }
}

// DuckDB hands timestamps back in its own text form ("2026-08-06 10:15:42.123456"),
// so parse that, with RFC 3339 as a secondary shape.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|n| n.and_utc())
        .or_else(|_| s.parse::<DateTime<Utc>>())
        .unwrap_or_else(|_| Utc::now())
}
