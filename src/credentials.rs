//! Encrypted credential storage
//!
//! Secrets are encrypted with ChaCha20-Poly1305 before they reach the vault.
//! The key is the SHA-256 digest of the installation identity
//! (`"<owner>-<host>"`), so a vault copied to another machine or read under
//! another owner name yields nothing. Every failure on the read path resolves
//! to "no secret".

use crate::error::{Error, Result};
use crate::vault::{SecretVault, VaultError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Cipher bound to one installation identity
pub struct SecretCipher {
    cipher: ChaCha20Poly1305,
}

impl SecretCipher {
    pub fn for_identity(identity: &str) -> Self {
        let digest = Sha256::digest(identity.as_bytes());
        Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(digest.as_slice())),
        }
    }

    /// Encrypt under a fresh random nonce; output is base64 of nonce then ciphertext
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| Error::Cipher(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String> {
        let sealed = STANDARD
            .decode(stored.trim())
            .map_err(|e| Error::Cipher(format!("invalid encoding: {e}")))?;
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Cipher("ciphertext too short".to_string()));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Cipher("decryption failed".to_string()))?;
        String::from_utf8(plaintext).map_err(|e| Error::Cipher(e.to_string()))
    }
}

/// Reads and writes encrypted secrets through a [`SecretVault`]
#[derive(Clone)]
pub struct CredentialStore {
    vault: Arc<dyn SecretVault>,
}

impl CredentialStore {
    pub fn new(vault: Arc<dyn SecretVault>) -> Self {
        Self { vault }
    }

    pub fn vault(&self) -> &Arc<dyn SecretVault> {
        &self.vault
    }

    /// Decrypted secret, or `None` when the vault is unavailable, nothing is
    /// stored, or the stored value does not decrypt under `identity`
    pub fn get_secret(&self, namespace: &str, account: &str, identity: &str) -> Option<String> {
        let handle = match self.vault.open() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(namespace, account, error = %e, "secret vault not available");
                return None;
            }
        };

        let stored = match handle.get_password(namespace, account) {
            Ok(stored) => stored,
            Err(VaultError::NotFound { .. }) => {
                debug!(namespace, account, "no secret stored");
                return None;
            }
            Err(e) => {
                warn!(namespace, account, error = %e, "could not read secret");
                return None;
            }
        };
        drop(handle);

        match SecretCipher::for_identity(identity).decrypt(&stored) {
            Ok(secret) => Some(secret),
            Err(e) => {
                warn!(namespace, account, error = %e, "could not decrypt secret");
                None
            }
        }
    }

    /// Encrypt and store `plaintext` trimmed; a blank value deletes the secret
    pub fn set_secret(&self, namespace: &str, account: &str, plaintext: &str, identity: &str) {
        let plaintext = plaintext.trim();
        if plaintext.is_empty() {
            self.delete_secret(namespace, account);
            return;
        }

        let sealed = match SecretCipher::for_identity(identity).encrypt(plaintext) {
            Ok(sealed) => sealed,
            Err(e) => {
                warn!(namespace, account, error = %e, "could not encrypt secret");
                return;
            }
        };

        let result = self
            .vault
            .open()
            .and_then(|mut handle| handle.set_password(namespace, account, &sealed));
        if let Err(e) = result {
            warn!(namespace, account, error = %e, "could not store secret");
        }
    }

    pub fn delete_secret(&self, namespace: &str, account: &str) {
        self.delete_all_secrets(namespace, &[account]);
    }

    /// Best-effort removal of every listed account
    pub fn delete_all_secrets<S: AsRef<str>>(&self, namespace: &str, accounts: &[S]) {
        let mut handle = match self.vault.open() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(namespace, error = %e, "secret vault not available");
                return;
            }
        };
        for account in accounts {
            let account = account.as_ref();
            match handle.delete_password(namespace, account) {
                Ok(()) | Err(VaultError::NotFound { .. }) => {}
                Err(e) => warn!(namespace, account, error = %e, "could not delete secret"),
            }
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
