use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("AEAD encryption failed")]
    Encrypt,

    #[error("Authentication failed (tag mismatch — wrong key or tampered data)")]
    AuthenticationFailed,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}
