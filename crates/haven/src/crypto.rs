use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::Argon2;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

use haven_backend::EncryptedCredentialBackup;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    #[error("Key derivation failed: {details}")]
    KeyDerivation { details: String },

    #[error("Credential encryption failed")]
    Encrypt,

    #[error("Credential decryption failed (wrong phrase or corrupted backup)")]
    Decrypt,

    #[error("Malformed backup: {field} is {actual} bytes, expected {expected}")]
    Malformed {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, SealError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|error| SealError::KeyDerivation {
            details: error.to_string(),
        })?;
    Ok(key)
}

/// Seal credential plaintext under a recovery passphrase. A fresh salt and
/// nonce are drawn per backup; key material is wiped on drop.
pub fn seal<R: RngCore>(
    rng: &mut R,
    passphrase: &str,
    plaintext: &[u8],
) -> Result<EncryptedCredentialBackup, SealError> {
    let mut salt = vec![0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce = vec![0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| SealError::Encrypt)?;

    Ok(EncryptedCredentialBackup {
        ciphertext,
        salt,
        nonce,
    })
}

/// Recover credential plaintext from a sealed backup.
///
/// # Errors
/// Fails when the backup buffers have the wrong shape, the passphrase is
/// wrong, or the ciphertext was tampered with.
pub fn open(
    passphrase: &str,
    backup: &EncryptedCredentialBackup,
) -> Result<Zeroizing<Vec<u8>>, SealError> {
    if backup.salt.len() != SALT_LEN {
        return Err(SealError::Malformed {
            field: "salt",
            expected: SALT_LEN,
            actual: backup.salt.len(),
        });
    }
    if backup.nonce.len() != NONCE_LEN {
        return Err(SealError::Malformed {
            field: "nonce",
            expected: NONCE_LEN,
            actual: backup.nonce.len(),
        });
    }

    let key = derive_key(passphrase, &backup.salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    cipher
        .decrypt(Nonce::from_slice(&backup.nonce), backup.ciphertext.as_slice())
        .map(Zeroizing::new)
        .map_err(|_| SealError::Decrypt)
}
