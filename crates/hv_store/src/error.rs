use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Vault not initialized — unlock with passphrase first")]
    NotInitialized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] hv_crypto::CryptoError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Unsupported encryption version {0}")]
    UnsupportedEncryptionVersion(i64),
}

impl StoreError {
    /// True when the underlying cause is an AEAD tag mismatch — wrong
    /// passphrase or tampered/corrupted ciphertext.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Crypto(hv_crypto::CryptoError::AuthenticationFailed)
        )
    }
}
