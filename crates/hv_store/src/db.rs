//! Database abstraction over SQLite via sqlx.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use zeroize::Zeroizing;

use hv_crypto::kdf::SALT_LEN;
use hv_crypto::CryptoError;

use crate::error::StoreError;
use crate::models::{now_ms, StoreStats};
use crate::vault::Vault;

/// Central store handle. Cheap to clone (pool and vault are Arc internally).
///
/// Holds the two shared session resources — the open SQLite pool and the
/// unlocked vault — with one lifecycle: `open` (authenticate) → use →
/// `close` (flush + key destruction).
#[derive(Clone)]
pub struct Store {
    pub pool: SqlitePool,
    pub vault: Vault,
}

impl Store {
    /// Open (or create) the vault database at `db_path` and unlock it with
    /// `passphrase`.
    ///
    /// Runs all pending migrations, then loads the persisted KDF salt and
    /// iteration count (or generates and persists them on first open) and
    /// derives the session key. Idempotent across reopens: existing data
    /// and schema objects are untouched.
    ///
    /// WAL journal mode and foreign-key enforcement are configured at
    /// connection time here — NOT inside a migration, because SQLite forbids
    /// changing `journal_mode` inside a transaction and sqlx wraps every
    /// migration in one.
    ///
    /// The passphrase goes only into the KDF. It is never interpolated into
    /// SQL text or pragmas, and a wrong passphrase is not detected here:
    /// it surfaces as an authentication failure on the first field decrypt.
    pub async fn open(db_path: &Path, passphrase: &str) -> Result<Self, StoreError> {
        if passphrase.is_empty() {
            return Err(StoreError::InvalidInput("empty passphrase".into()));
        }

        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        let (salt, iterations) = load_or_create_kdf_params(&pool).await?;

        let vault = Vault::new();
        vault.unlock(passphrase, salt, iterations).await?;

        tracing::info!(path = %db_path.display(), "vault opened");
        Ok(Self { pool, vault })
    }

    /// Flush and close the database, then lock the vault. After this call
    /// no decrypt-capable state remains; all further operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
        self.vault.lock().await;
        tracing::info!("vault closed");
    }

    /// Aggregate row counts (cleartext).
    pub async fn stats(&self) -> Result<StoreStats, StoreError> {
        let conversations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await?;
        let documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;
        Ok(StoreStats {
            conversations,
            documents,
        })
    }

    // ── Field codec ──────────────────────────────────────────────────────────
    //
    // Every encrypted column passes through these two helpers — the only
    // plaintext that reaches a SQL write path is what `encrypt_value` has
    // already sealed.

    /// Encrypt a plaintext value with the vault key.
    /// Returns base64(iv || ciphertext || tag).
    pub async fn encrypt_value(&self, plaintext: &[u8]) -> Result<String, StoreError> {
        self.vault
            .with_key(|key| {
                let sealed = hv_crypto::aead::seal(key, plaintext).map_err(StoreError::Crypto)?;
                Ok(BASE64.encode(sealed))
            })
            .await
    }

    /// Decrypt a vault-encrypted column value.
    pub async fn decrypt_value(&self, b64: &str) -> Result<Zeroizing<Vec<u8>>, StoreError> {
        let payload = BASE64.decode(b64).map_err(|e| {
            StoreError::Crypto(CryptoError::MalformedPayload(format!(
                "undecodable base64: {e}"
            )))
        })?;

        self.vault
            .with_key(|key| hv_crypto::aead::open(key, &payload).map_err(StoreError::Crypto))
            .await
    }

    /// Decrypt a column value that must be valid UTF-8 (titles, JSON).
    pub async fn decrypt_string(&self, b64: &str) -> Result<String, StoreError> {
        let bytes = self.decrypt_value(b64).await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            StoreError::Crypto(CryptoError::MalformedPayload("not valid UTF-8".into()))
        })
    }
}

/// Read the persisted KDF salt and iteration count, or generate and persist
/// fresh ones on the first open of a new vault. Existing vaults always
/// derive with their stored count, so raising `KDF_ITERATIONS` in a later
/// build only affects vaults created after the change.
async fn load_or_create_kdf_params(
    pool: &SqlitePool,
) -> Result<([u8; SALT_LEN], u32), StoreError> {
    let existing: Option<(String, i64)> =
        sqlx::query_as("SELECT kdf_salt, kdf_iterations FROM vault_meta WHERE id = 1")
            .fetch_optional(pool)
            .await?;

    if let Some((hex_salt, iterations)) = existing {
        let bytes = hex::decode(&hex_salt)
            .map_err(|_| StoreError::InvalidInput("corrupt vault_meta salt".into()))?;
        let salt: [u8; SALT_LEN] = bytes
            .try_into()
            .map_err(|_| StoreError::InvalidInput("corrupt vault_meta salt".into()))?;
        let iterations = u32::try_from(iterations)
            .map_err(|_| StoreError::InvalidInput("corrupt vault_meta iterations".into()))?;
        return Ok((salt, iterations));
    }

    let salt = hv_crypto::generate_salt();
    sqlx::query(
        "INSERT INTO vault_meta (id, kdf_salt, kdf_iterations, created_at) VALUES (1, ?, ?, ?)",
    )
    .bind(hex::encode(salt))
    .bind(hv_crypto::KDF_ITERATIONS as i64)
    .bind(now_ms())
    .execute(pool)
    .await?;

    tracing::debug!("new vault: generated KDF salt");
    Ok((salt, hv_crypto::KDF_ITERATIONS))
}
