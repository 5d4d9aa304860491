//! User context storage — one encrypted blob per context type.
//!
//! Context types ("preferences", "profile", ...) are cleartext keys with
//! upsert semantics; the blob itself is always encrypted.

use uuid::Uuid;

use crate::db::Store;
use crate::error::StoreError;
use crate::models::now_ms;

impl Store {
    /// Insert or overwrite the context blob for `context_type`.
    /// Returns the row id (stable across overwrites).
    pub async fn put_user_context(
        &self,
        context_type: &str,
        data: &str,
    ) -> Result<String, StoreError> {
        if context_type.is_empty() {
            return Err(StoreError::InvalidInput("empty context type".into()));
        }

        let encrypted_data = self.encrypt_value(data.as_bytes()).await?;

        // RETURNING makes the upsert and the id read one atomic statement;
        // on conflict the row keeps its original id.
        let id: String = sqlx::query_scalar(
            "INSERT INTO user_context (id, encrypted_data, context_type, created_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(context_type) DO UPDATE SET encrypted_data = excluded.encrypted_data \
             RETURNING id",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(encrypted_data)
        .bind(context_type)
        .bind(now_ms())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Fetch and decrypt the context blob for `context_type`.
    pub async fn get_user_context(
        &self,
        context_type: &str,
    ) -> Result<Option<String>, StoreError> {
        let encrypted: Option<String> =
            sqlx::query_scalar("SELECT encrypted_data FROM user_context WHERE context_type = ?")
                .bind(context_type)
                .fetch_optional(&self.pool)
                .await?;

        match encrypted {
            Some(blob) => Ok(Some(self.decrypt_string(&blob).await?)),
            None => Ok(None),
        }
    }
}
