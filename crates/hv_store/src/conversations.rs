//! Conversation CRUD.
//!
//! Title and message history are encrypted as two independent payloads per
//! row (field-level granularity): listings decrypt only titles, and an
//! update rewrites only the message payload. The message sequence is
//! serialized as one JSON array — per-message rows would leak conversation
//! shape (message counts, timing) into plaintext metadata.
//!
//! Every mutation is a single SQL statement, so SQLite's writer lock
//! serializes concurrent writes to one id: a row always reflects one
//! complete write, never an interleaved mix.

use uuid::Uuid;

use crate::db::Store;
use crate::error::StoreError;
use crate::models::{
    now_ms, Conversation, ConversationListRow, ConversationRow, ConversationSummary, Message,
    ENCRYPTION_VERSION,
};

impl Store {
    /// Store a new conversation. Returns the generated id.
    pub async fn create_conversation(
        &self,
        title: &str,
        messages: &[Message],
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = now_ms();

        let encrypted_title = self.encrypt_value(title.as_bytes()).await?;
        let encrypted_messages = self
            .encrypt_value(&serde_json::to_vec(messages)?)
            .await?;

        sqlx::query(
            "INSERT INTO conversations \
             (id, encrypted_title, encrypted_messages, created_at, last_modified, encryption_version) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(encrypted_title)
        .bind(encrypted_messages)
        .bind(now)
        .bind(now)
        .bind(ENCRYPTION_VERSION)
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, "conversation created");
        Ok(id)
    }

    /// Fetch and decrypt a conversation. `None` if no row matches `id` —
    /// distinct from a decrypt failure, which surfaces as an error.
    pub async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        let row: Option<ConversationRow> = sqlx::query_as(
            "SELECT id, encrypted_title, encrypted_messages, created_at, last_modified, encryption_version \
             FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if row.encryption_version > ENCRYPTION_VERSION {
            return Err(StoreError::UnsupportedEncryptionVersion(
                row.encryption_version,
            ));
        }

        let title = self.decrypt_string(&row.encrypted_title).await?;
        let messages: Vec<Message> =
            serde_json::from_slice(&self.decrypt_value(&row.encrypted_messages).await?)?;

        Ok(Some(Conversation {
            id: row.id,
            title,
            messages,
            created_at: row.created_at,
            last_modified: row.last_modified,
        }))
    }

    /// List all conversations, most recently modified first.
    ///
    /// Decrypts titles only — the SELECT never reads `encrypted_messages`,
    /// so listing cost is bounded by row count, not history size. Returns a
    /// snapshot as of call time.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        let rows: Vec<ConversationListRow> = sqlx::query_as(
            "SELECT id, encrypted_title, created_at, last_modified, encryption_version \
             FROM conversations ORDER BY last_modified DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            if row.encryption_version > ENCRYPTION_VERSION {
                return Err(StoreError::UnsupportedEncryptionVersion(
                    row.encryption_version,
                ));
            }
            summaries.push(ConversationSummary {
                title: self.decrypt_string(&row.encrypted_title).await?,
                id: row.id,
                created_at: row.created_at,
                last_modified: row.last_modified,
            });
        }
        Ok(summaries)
    }

    /// Replace a conversation's message history and bump `last_modified`.
    ///
    /// Returns `false` when no row matches `id` — a documented no-op, not an
    /// error. Callers that need existence should `get_conversation` first.
    pub async fn update_conversation(
        &self,
        id: &str,
        messages: &[Message],
    ) -> Result<bool, StoreError> {
        let encrypted_messages = self
            .encrypt_value(&serde_json::to_vec(messages)?)
            .await?;

        let result = sqlx::query(
            "UPDATE conversations SET encrypted_messages = ?, last_modified = ? WHERE id = ?",
        )
        .bind(encrypted_messages)
        .bind(now_ms())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a conversation. Returns `false` if it did not exist.
    pub async fn delete_conversation(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
