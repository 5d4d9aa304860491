//! Domain types and database row models.
//!
//! Row structs map 1:1 to SQL rows: encrypted columns are opaque base64
//! strings (`encrypted_*`), plaintext metadata columns (ids, timestamps,
//! hashes) stay queryable without decryption. Timestamps are epoch
//! milliseconds so rows sort and filter without touching any key material.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current encrypted-field schema version, written to every new row.
/// Bump when the cipher or KDF changes; old rows keep their version.
pub const ENCRYPTION_VERSION: i64 = 1;

/// Epoch milliseconds, the vault's single clock.
pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// ── Conversations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: i64,
    pub last_modified: i64,
}

/// Listing entry — deliberately has no messages field, so a listing can
/// never expose message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub last_modified: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: String,
    /// Vault-encrypted title (base64 of iv || ciphertext || tag)
    pub encrypted_title: String,
    /// Vault-encrypted JSON array of `Message`
    pub encrypted_messages: String,
    pub created_at: i64,
    pub last_modified: i64,
    pub encryption_version: i64,
}

/// Listing projection — `encrypted_messages` is never selected.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationListRow {
    pub id: String,
    pub encrypted_title: String,
    pub created_at: i64,
    pub last_modified: i64,
    pub encryption_version: i64,
}

// ── Documents ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub content: Vec<u8>,
    pub metadata: DocumentMetadata,
    /// SHA-256 hex of the plaintext content. Cleartext on purpose: lets
    /// callers dedup without decrypting.
    pub file_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: String,
    /// Vault-encrypted raw content
    pub encrypted_content: String,
    /// Vault-encrypted JSON `DocumentMetadata`
    pub encrypted_metadata: String,
    pub file_hash: String,
    pub created_at: i64,
}

// ── Stats ────────────────────────────────────────────────────────────────────

/// Aggregate row counts. Cleartext — counts are not confidentiality-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub conversations: i64,
    pub documents: i64,
}
