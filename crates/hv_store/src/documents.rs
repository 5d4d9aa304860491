//! Document storage.
//!
//! Content and metadata are encrypted as two independent payloads; the
//! SHA-256 content hash stays cleartext so callers can dedup uploads
//! without decrypting anything.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::Store;
use crate::error::StoreError;
use crate::models::{now_ms, Document, DocumentMetadata, DocumentRow};

impl Store {
    /// Store a document. Returns the generated id.
    pub async fn store_document(
        &self,
        content: &[u8],
        metadata: &DocumentMetadata,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let file_hash = hex::encode(Sha256::digest(content));

        let encrypted_content = self.encrypt_value(content).await?;
        let encrypted_metadata = self
            .encrypt_value(&serde_json::to_vec(metadata)?)
            .await?;

        sqlx::query(
            "INSERT INTO documents (id, encrypted_content, encrypted_metadata, file_hash, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(encrypted_content)
        .bind(encrypted_metadata)
        .bind(&file_hash)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, "document stored");
        Ok(id)
    }

    /// Fetch and decrypt a document. `None` if no row matches `id`.
    pub async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, encrypted_content, encrypted_metadata, file_hash, created_at \
             FROM documents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let content = self.decrypt_value(&row.encrypted_content).await?.to_vec();
        let metadata: DocumentMetadata =
            serde_json::from_slice(&self.decrypt_value(&row.encrypted_metadata).await?)?;

        Ok(Some(Document {
            id: row.id,
            content,
            metadata,
            file_hash: row.file_hash,
            created_at: row.created_at,
        }))
    }

    /// Delete a document. Returns `false` if it did not exist.
    pub async fn delete_document(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
