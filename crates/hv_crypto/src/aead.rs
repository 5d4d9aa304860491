//! Authenticated encryption.
//!
//! Uses AES-256-GCM (96-bit IV, 128-bit tag).
//! Key size: 32 bytes.  IV: 12 bytes (random per call).  Tag: 16 bytes.
//!
//! Ciphertext wire format:
//!   [ iv (12 bytes) | ciphertext + tag ]
//!
//! The IV is drawn from the OS CSPRNG independently for every `seal` call.
//! IV reuse under one key breaks GCM entirely, so there is no API that
//! accepts a caller-supplied IV.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// IV length in bytes (GCM standard 96-bit nonce).
pub const IV_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest valid payload: IV plus the tag of an empty ciphertext.
pub const MIN_PAYLOAD_LEN: usize = IV_LEN + TAG_LEN;

/// Encrypt `plaintext` with a 32-byte key, prepending a random 12-byte IV.
/// Empty plaintext is valid and yields a 28-byte payload.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Encrypt)?;

    let iv = Aes256Gcm::generate_nonce(&mut AeadOsRng);

    let ciphertext = cipher
        .encrypt(&iv, plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    // Prepend IV
    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt wire-format bytes (iv || ciphertext+tag).
///
/// Payloads shorter than IV+tag are rejected as `MalformedPayload` before
/// any decryption is attempted. A tag mismatch (wrong key, tampered or
/// corrupted data) fails with `AuthenticationFailed` — callers must surface
/// this distinctly from "record not found".
pub fn open(key: &[u8; 32], payload: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(CryptoError::MalformedPayload(format!(
            "{} bytes, need at least {}",
            payload.len(),
            MIN_PAYLOAD_LEN
        )));
    }
    let (iv_bytes, ct) = payload.split_at(IV_LEN);
    let iv = Nonce::from_slice(iv_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Encrypt)?;

    let plaintext = cipher
        .decrypt(iv, ct)
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(b: u8) -> [u8; 32] {
        [b; 32]
    }

    #[test]
    fn round_trip() {
        let key = test_key(1);
        let pt = b"hello vault";
        let sealed = seal(&key, pt).unwrap();
        let opened = open(&key, &sealed).unwrap();
        assert_eq!(opened.as_slice(), pt);
    }

    #[test]
    fn round_trip_empty_plaintext() {
        let key = test_key(2);
        let sealed = seal(&key, b"").unwrap();
        assert_eq!(sealed.len(), MIN_PAYLOAD_LEN);
        let opened = open(&key, &sealed).unwrap();
        assert!(opened.is_empty());
    }

    #[test]
    fn round_trip_non_ascii() {
        let key = test_key(3);
        let pt = "日本語 — émojis 🦀 and control \u{0007} chars".as_bytes();
        let sealed = seal(&key, pt).unwrap();
        let opened = open(&key, &sealed).unwrap();
        assert_eq!(opened.as_slice(), pt);
    }

    #[test]
    fn iv_randomized_every_call() {
        let key = test_key(4);
        let a = seal(&key, b"same plaintext").unwrap();
        let b = seal(&key, b"same plaintext").unwrap();
        assert_ne!(a, b);
        assert_ne!(&a[..IV_LEN], &b[..IV_LEN]);
    }

    #[test]
    fn wrong_key_rejected() {
        let sealed = seal(&test_key(5), b"secret").unwrap();
        let err = open(&test_key(6), &sealed).unwrap_err();
        assert!(matches!(err, CryptoError::AuthenticationFailed));
    }

    #[test]
    fn any_flipped_byte_detected() {
        let key = test_key(7);
        let sealed = seal(&key, b"tamper target").unwrap();
        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            let err = open(&key, &tampered).unwrap_err();
            assert!(
                matches!(err, CryptoError::AuthenticationFailed),
                "byte {i} flip not caught"
            );
        }
    }

    #[test]
    fn truncated_payload_detected() {
        let key = test_key(8);
        let sealed = seal(&key, b"long enough plaintext to truncate").unwrap();
        let err = open(&key, &sealed[..sealed.len() - 1]).unwrap_err();
        assert!(matches!(err, CryptoError::AuthenticationFailed));
    }

    #[test]
    fn short_payload_is_malformed() {
        let key = test_key(9);
        let err = open(&key, &[0u8; MIN_PAYLOAD_LEN - 1]).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedPayload(_)));
        let err = open(&key, b"").unwrap_err();
        assert!(matches!(err, CryptoError::MalformedPayload(_)));
    }
}
