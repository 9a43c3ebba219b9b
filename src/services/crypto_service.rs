//! Cryptography for eztag.
//!
//! Seals the access token at rest (PBKDF2-derived key + AES-256-GCM) and
//! produces the random anti-CSRF state for the OAuth redirect.

use std::num::NonZeroU32;

use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::types::credential::EncryptedData;
use crate::types::errors::CryptoError;

const PBKDF2_ITERATIONS: u32 = 100_000;
const KEY_LENGTH: usize = 32;
const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;

const STATE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
/// Random bytes at or above this are redrawn so every symbol is equally likely.
const STATE_BYTE_LIMIT: u8 = (256 / STATE_ALPHABET.len() * STATE_ALPHABET.len()) as u8;

/// Trait defining the cryptographic operations the session store relies on.
pub trait CryptoServiceTrait {
    /// Derives a 256-bit key from a passphrase and salt using PBKDF2-HMAC-SHA256.
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    /// Encrypts plaintext using AES-256-GCM with a fresh random nonce.
    fn encrypt_aes256gcm(&self, plaintext: &[u8], key: &[u8]) -> Result<EncryptedData, CryptoError>;

    /// Decrypts and authenticates data produced by [`Self::encrypt_aes256gcm`].
    fn decrypt_aes256gcm(&self, encrypted: &EncryptedData, key: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Random string over `[A-Za-z0-9]` of the given length.
    fn random_alphanumeric(&self, length: usize) -> Result<String, CryptoError>;
}

/// Hands out exactly one nonce; sealing or opening twice with it fails.
struct SingleNonce(Option<[u8; NONCE_LENGTH]>);

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> Result<Nonce, ring::error::Unspecified> {
        self.0
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

/// `ring`-backed implementation.
pub struct CryptoService {
    rng: SystemRandom,
}

impl CryptoService {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    fn check_key(key: &[u8]) -> Result<(), CryptoError> {
        if key.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(format!(
                "Key must be {} bytes, got {}",
                KEY_LENGTH,
                key.len()
            )));
        }
        Ok(())
    }
}

impl Default for CryptoService {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoServiceTrait for CryptoService {
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
            .ok_or_else(|| CryptoError::KeyDerivation("Invalid iteration count".to_string()))?;

        let mut key = Zeroizing::new(vec![0u8; KEY_LENGTH]);
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            salt,
            passphrase.as_bytes(),
            key.as_mut_slice(),
        );
        Ok(key)
    }

    fn encrypt_aes256gcm(&self, plaintext: &[u8], key: &[u8]) -> Result<EncryptedData, CryptoError> {
        Self::check_key(key)?;

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate nonce".to_string()))?;

        let unbound_key = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CryptoError::Encryption("Failed to create encryption key".to_string()))?;
        let mut sealing_key = aead::SealingKey::new(unbound_key, SingleNonce(Some(nonce_bytes)));

        let mut in_out = plaintext.to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encryption("Encryption operation failed".to_string()))?;

        // ring appends the tag; store it separately.
        let auth_tag = in_out.split_off(in_out.len() - TAG_LENGTH);

        Ok(EncryptedData {
            ciphertext: in_out,
            iv: nonce_bytes.to_vec(),
            auth_tag,
        })
    }

    fn decrypt_aes256gcm(&self, encrypted: &EncryptedData, key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Self::check_key(key)?;

        let nonce_bytes: [u8; NONCE_LENGTH] = encrypted.iv.as_slice().try_into().map_err(|_| {
            CryptoError::Decryption(format!(
                "IV must be {} bytes, got {}",
                NONCE_LENGTH,
                encrypted.iv.len()
            ))
        })?;
        if encrypted.auth_tag.len() != TAG_LENGTH {
            return Err(CryptoError::Decryption(format!(
                "Auth tag must be {} bytes, got {}",
                TAG_LENGTH,
                encrypted.auth_tag.len()
            )));
        }

        let unbound_key = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CryptoError::Decryption("Failed to create decryption key".to_string()))?;
        let mut opening_key = aead::OpeningKey::new(unbound_key, SingleNonce(Some(nonce_bytes)));

        let mut in_out = [encrypted.ciphertext.as_slice(), encrypted.auth_tag.as_slice()].concat();
        let plaintext = opening_key
            .open_in_place(Aad::empty(), &mut in_out)
            .map_err(|_| {
                CryptoError::Decryption("invalid key or corrupted data".to_string())
            })?;

        Ok(plaintext.to_vec())
    }

    fn random_alphanumeric(&self, length: usize) -> Result<String, CryptoError> {
        let mut out = String::with_capacity(length);
        let mut bytes = [0u8; 64];
        while out.len() < length {
            self.rng
                .fill(&mut bytes)
                .map_err(|_| CryptoError::RandomGeneration("Failed to generate random bytes".to_string()))?;
            push_alphanumeric(&mut out, &bytes, length);
        }
        Ok(out)
    }
}

/// Appends one symbol per accepted byte until `out` holds `length` symbols.
fn push_alphanumeric(out: &mut String, bytes: &[u8], length: usize) {
    for &b in bytes {
        if out.len() == length {
            break;
        }
        if b < STATE_BYTE_LIMIT {
            out.push(STATE_ALPHABET[b as usize % STATE_ALPHABET.len()] as char);
        }
    }
}
