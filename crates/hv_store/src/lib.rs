//! hv_store — Encrypted local database for the Haven vault
//!
//! # Encryption strategy
//! SQLite does NOT natively encrypt. We use application-level encryption:
//! - Sensitive columns (conversation titles and message history, document
//!   content and metadata, user context) are stored as AES-256-GCM
//!   ciphertext, base64-encoded.
//! - The vault key is derived from the user passphrase via
//!   PBKDF2-HMAC-SHA256 and held in memory only while the vault is open.
//!   The passphrase itself never reaches SQL text or pragmas.
//! - Non-sensitive metadata (ids, timestamps, content hashes) is stored in
//!   plaintext to allow efficient queries without decryption.
//!
//! # Session boundary
//! `Store::open(path, passphrase)` derives the key and opens the database;
//! `Store::close()` closes the pool and locks the vault. Those two calls
//! are the whole surface an outer shell needs.
//!
//! # Migration
//! SQLx migrations in `migrations/` are run on every open (forward-only,
//! idempotent).

pub mod context;
pub mod conversations;
pub mod db;
pub mod documents;
pub mod error;
pub mod models;
pub mod vault;

pub use db::Store;
pub use error::StoreError;
pub use models::{
    Conversation, ConversationSummary, Document, DocumentMetadata, Message, Role, StoreStats,
};
pub use vault::Vault;
