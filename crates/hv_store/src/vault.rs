//! Vault: in-memory key material unlocked by user passphrase.
//!
//! The vault holds the derived 32-byte encryption key in memory for the
//! duration of one authenticated session. Locking drops the key material,
//! which zeroizes it; every crypto-gated operation afterwards fails with
//! `NotInitialized` until a new unlock.

use std::sync::Arc;
use tokio::sync::RwLock;

use hv_crypto::kdf::{derive_key, KeyMaterial, KDF_ITERATIONS, SALT_LEN};

use crate::error::StoreError;

/// Thread-safe vault handle. Clone to share; all clones see the same key.
///
/// This is an explicit session object owned by the caller — there is no
/// process-global key, so parallel sessions (and parallel tests) are safe.
#[derive(Clone)]
pub struct Vault {
    inner: Arc<RwLock<Option<KeyMaterial>>>,
}

impl Vault {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Unlock the vault by deriving the key from `passphrase`, `salt`, and
    /// the vault's persisted KDF iteration count.
    ///
    /// Call on successful login before any encrypted read/write. A second
    /// unlock silently replaces the prior key — the store holds exactly one
    /// live key per session and is not designed for multi-tenant keys.
    pub async fn unlock(
        &self,
        passphrase: &str,
        salt: [u8; SALT_LEN],
        iterations: u32,
    ) -> Result<(), StoreError> {
        let material = derive_key(passphrase, Some(salt), iterations)?;
        let mut guard = self.inner.write().await;
        *guard = Some(material);
        Ok(())
    }

    /// Lock the vault — drops (zeroizes) the key material.
    /// Call on logout and on shutdown; no key survives its session.
    pub async fn lock(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }

    pub async fn is_locked(&self) -> bool {
        self.inner.read().await.is_none()
    }

    /// Run `f` against the raw key for one encrypt/decrypt operation.
    /// Fails with `NotInitialized` if the vault is locked. This is the only
    /// access path to key bytes.
    pub async fn with_key<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&[u8; 32]) -> Result<R, StoreError>,
    {
        let guard = self.inner.read().await;
        match guard.as_ref() {
            Some(material) => f(material.key()),
            None => Err(StoreError::NotInitialized),
        }
    }
}

impl Default for Vault {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locked_until_unlock() {
        let vault = Vault::new();
        assert!(vault.is_locked().await);

        vault
            .unlock("pw", [0u8; SALT_LEN], KDF_ITERATIONS)
            .await
            .unwrap();
        assert!(!vault.is_locked().await);

        vault.lock().await;
        assert!(vault.is_locked().await);
    }

    #[tokio::test]
    async fn with_key_fails_when_locked() {
        let vault = Vault::new();
        let err = vault.with_key(|_| Ok(())).await.unwrap_err();
        assert!(matches!(err, StoreError::NotInitialized));
    }

    #[tokio::test]
    async fn second_unlock_replaces_key() {
        let vault = Vault::new();
        vault
            .unlock("first", [1u8; SALT_LEN], KDF_ITERATIONS)
            .await
            .unwrap();
        let k1 = vault.with_key(|k| Ok(*k)).await.unwrap();

        vault
            .unlock("second", [1u8; SALT_LEN], KDF_ITERATIONS)
            .await
            .unwrap();
        let k2 = vault.with_key(|k| Ok(*k)).await.unwrap();
        assert_ne!(k1, k2);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let vault = Vault::new();
        let clone = vault.clone();
        vault
            .unlock("pw", [2u8; SALT_LEN], KDF_ITERATIONS)
            .await
            .unwrap();
        assert!(!clone.is_locked().await);
        clone.lock().await;
        assert!(vault.is_locked().await);
    }
}
