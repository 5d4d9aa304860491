//! Key derivation.
//!
//! `derive_key` — PBKDF2-HMAC-SHA256, 100,000 iterations. Stretches the
//! user passphrase into the 32-byte key used for field-level encryption of
//! the local vault. The salt is stored alongside the vault (not secret);
//! derivation itself is deterministic so the same (passphrase, salt) pair
//! always reproduces the same key.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;

/// PBKDF2 iteration count for NEW vaults. Existing vaults derive with the
/// count persisted in their metadata, so raising this never bricks them.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived 256-bit vault key plus the parameters that produced it.
/// Key bytes are zeroized on drop; the struct has no serde derives on
/// purpose — key material never leaves process memory serialized.
#[derive(ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: [u8; 32],
    #[zeroize(skip)]
    salt: [u8; SALT_LEN],
    #[zeroize(skip)]
    iterations: u32,
}

impl KeyMaterial {
    /// Raw key bytes, for a single encrypt/decrypt operation.
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    /// The salt this key was derived with. Store it next to the vault.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Derive a vault key from a passphrase.
///
/// Pass the persisted salt and iteration count when reopening an existing
/// vault; pass `None` and [`KDF_ITERATIONS`] for a new vault (a fresh random
/// salt is generated). Fails with `InvalidInput` on an empty passphrase or a
/// zero iteration count.
pub fn derive_key(
    passphrase: &str,
    salt: Option<[u8; SALT_LEN]>,
    iterations: u32,
) -> Result<KeyMaterial, CryptoError> {
    if passphrase.is_empty() {
        return Err(CryptoError::InvalidInput("empty passphrase".into()));
    }
    if iterations == 0 {
        return Err(CryptoError::InvalidInput("zero KDF iterations".into()));
    }

    let salt = salt.unwrap_or_else(generate_salt);
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), &salt, iterations, &mut key);

    Ok(KeyMaterial {
        key,
        salt,
        iterations,
    })
}

/// Generate a fresh random 16-byte salt (call once per new vault; persist it).
pub fn generate_salt() -> [u8; SALT_LEN] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key("correct horse battery staple", Some(salt), KDF_ITERATIONS).unwrap();
        let b = derive_key("correct horse battery staple", Some(salt), KDF_ITERATIONS).unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.salt(), &salt);
        assert_eq!(a.iterations(), KDF_ITERATIONS);
    }

    #[test]
    fn different_salt_different_key() {
        let a = derive_key("same passphrase", Some([1u8; SALT_LEN]), KDF_ITERATIONS).unwrap();
        let b = derive_key("same passphrase", Some([2u8; SALT_LEN]), KDF_ITERATIONS).unwrap();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn different_passphrase_different_key() {
        let salt = [9u8; SALT_LEN];
        let a = derive_key("passphrase one", Some(salt), KDF_ITERATIONS).unwrap();
        let b = derive_key("passphrase two", Some(salt), KDF_ITERATIONS).unwrap();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn iteration_count_changes_key() {
        let salt = [3u8; SALT_LEN];
        let a = derive_key("pw", Some(salt), 1_000).unwrap();
        let b = derive_key("pw", Some(salt), 2_000).unwrap();
        assert_ne!(a.key(), b.key());
        assert_eq!(a.iterations(), 1_000);
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = match derive_key("pw", None, 0) {
            Err(e) => e,
            Ok(_) => panic!("derived a key with zero iterations"),
        };
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[test]
    fn empty_passphrase_rejected() {
        // KeyMaterial has no Debug impl, so destructure instead of unwrap_err.
        let err = match derive_key("", None, KDF_ITERATIONS) {
            Err(e) => e,
            Ok(_) => panic!("derived a key from an empty passphrase"),
        };
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[test]
    fn fresh_salt_generated_when_none_supplied() {
        let a = derive_key("pw", None, KDF_ITERATIONS).unwrap();
        let b = derive_key("pw", None, KDF_ITERATIONS).unwrap();
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.key(), b.key());
    }
}
