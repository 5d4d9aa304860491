//! hv_crypto — Haven vault cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize all secret material on drop.
//! - Key material is an opaque newtype with no serde derives — it cannot
//!   leave process memory in serialized form.
//!
//! # Module layout
//! - `kdf`   — PBKDF2-HMAC-SHA256 passphrase stretching + salt generation
//! - `aead`  — AES-256-GCM encrypt/decrypt over the vault wire format
//! - `error` — unified error type

pub mod aead;
pub mod error;
pub mod kdf;

pub use error::CryptoError;
pub use kdf::{derive_key, generate_salt, KeyMaterial, KDF_ITERATIONS, SALT_LEN};
