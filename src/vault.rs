//! Secret vault
//!
//! Secrets never live in the plain backing store. A [`SecretVault`] hands out
//! short-lived [`VaultHandle`]s; callers open one per operation and the handle
//! releases whatever it holds when dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Secret vault unavailable: {0}")]
    Unavailable(String),

    #[error("No secret stored for {service}/{account}")]
    NotFound { service: String, account: String },

    #[error("Secret vault error: {0}")]
    Backend(String),
}

impl VaultError {
    fn not_found(service: &str, account: &str) -> Self {
        VaultError::NotFound {
            service: service.to_string(),
            account: account.to_string(),
        }
    }
}

/// An open session with a vault
pub trait VaultHandle {
    fn get_password(&self, service: &str, account: &str) -> Result<String, VaultError>;

    fn set_password(&mut self, service: &str, account: &str, value: &str)
        -> Result<(), VaultError>;

    /// Fails with [`VaultError::NotFound`] when nothing is stored
    fn delete_password(&mut self, service: &str, account: &str) -> Result<(), VaultError>;
}

/// Source of vault handles
pub trait SecretVault: Send + Sync {
    fn open(&self) -> Result<Box<dyn VaultHandle + '_>, VaultError>;
}

type SecretMap = BTreeMap<String, BTreeMap<String, String>>;

fn lookup(secrets: &SecretMap, service: &str, account: &str) -> Result<String, VaultError> {
    secrets
        .get(service)
        .and_then(|accounts| accounts.get(account))
        .cloned()
        .ok_or_else(|| VaultError::not_found(service, account))
}

fn insert(secrets: &mut SecretMap, service: &str, account: &str, value: &str) {
    secrets
        .entry(service.to_string())
        .or_default()
        .insert(account.to_string(), value.to_string());
}

fn delete(secrets: &mut SecretMap, service: &str, account: &str) -> Result<(), VaultError> {
    let removed = secrets
        .get_mut(service)
        .and_then(|accounts| accounts.remove(account));
    if secrets.get(service).is_some_and(BTreeMap::is_empty) {
        secrets.remove(service);
    }
    removed
        .map(|_| ())
        .ok_or_else(|| VaultError::not_found(service, account))
}

/// Process-local vault
///
/// Tracks how many handles are open so tests can verify that every code path
/// releases its handle.
#[derive(Debug, Default)]
pub struct MemoryVault {
    secrets: Mutex<SecretMap>,
    live: AtomicUsize,
    opened: AtomicUsize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles currently open
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Handles opened over the vault's lifetime
    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Stored (encrypted) form of a secret, bypassing the handle protocol
    pub fn stored(&self, service: &str, account: &str) -> Option<String> {
        let secrets = self.secrets.lock().ok()?;
        lookup(&secrets, service, account).ok()
    }
}

struct MemoryHandle<'a> {
    vault: &'a MemoryVault,
    secrets: MutexGuard<'a, SecretMap>,
}

impl Drop for MemoryHandle<'_> {
    fn drop(&mut self) {
        self.vault.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl VaultHandle for MemoryHandle<'_> {
    fn get_password(&self, service: &str, account: &str) -> Result<String, VaultError> {
        lookup(&self.secrets, service, account)
    }

    fn set_password(
        &mut self,
        service: &str,
        account: &str,
        value: &str,
    ) -> Result<(), VaultError> {
        insert(&mut self.secrets, service, account, value);
        Ok(())
    }

    fn delete_password(&mut self, service: &str, account: &str) -> Result<(), VaultError> {
        delete(&mut self.secrets, service, account)
    }
}

impl SecretVault for MemoryVault {
    fn open(&self) -> Result<Box<dyn VaultHandle + '_>, VaultError> {
        let secrets = self
            .secrets
            .lock()
            .map_err(|_| VaultError::Backend("vault lock poisoned".to_string()))?;
        self.live.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryHandle {
            vault: self,
            secrets,
        }))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct VaultFile {
    #[serde(default)]
    secrets: SecretMap,
}

/// Vault persisted as a JSON document
///
/// Every mutation rewrites the whole file atomically. Values are expected to
/// be encrypted by the caller; the file itself is plain JSON.
#[derive(Debug)]
pub struct FileVault {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SecretMap, VaultError> {
        if !self.path.exists() {
            return Ok(SecretMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            VaultError::Unavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        if content.trim().is_empty() {
            return Ok(SecretMap::new());
        }
        let file: VaultFile = serde_json::from_str(&content).map_err(|e| {
            VaultError::Backend(format!("corrupt vault {}: {e}", self.path.display()))
        })?;
        Ok(file.secrets)
    }
}

fn backend(e: impl std::fmt::Display) -> VaultError {
    VaultError::Backend(e.to_string())
}

struct FileHandle<'a> {
    vault: &'a FileVault,
    secrets: SecretMap,
    _guard: MutexGuard<'a, ()>,
}

impl FileHandle<'_> {
    fn save(&self) -> Result<(), VaultError> {
        let dir = match self.vault.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(backend)?;

        let json = serde_json::to_string_pretty(&VaultFile {
            secrets: self.secrets.clone(),
        })
        .map_err(backend)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(backend)?;
        tmp.write_all(json.as_bytes()).map_err(backend)?;
        tmp.as_file().sync_all().map_err(backend)?;
        tmp.persist(&self.vault.path).map_err(backend)?;
        debug!(path = %self.vault.path.display(), "vault file written");
        Ok(())
    }
}

impl VaultHandle for FileHandle<'_> {
    fn get_password(&self, service: &str, account: &str) -> Result<String, VaultError> {
        lookup(&self.secrets, service, account)
    }

    fn set_password(
        &mut self,
        service: &str,
        account: &str,
        value: &str,
    ) -> Result<(), VaultError> {
        insert(&mut self.secrets, service, account, value);
        self.save()
    }

    fn delete_password(&mut self, service: &str, account: &str) -> Result<(), VaultError> {
        delete(&mut self.secrets, service, account)?;
        self.save()
    }
}

impl SecretVault for FileVault {
    fn open(&self) -> Result<Box<dyn VaultHandle + '_>, VaultError> {
        let guard = self
            .lock
            .lock()
            .map_err(|_| VaultError::Backend("vault lock poisoned".to_string()))?;
        let secrets = self.load()?;
        Ok(Box::new(FileHandle {
            vault: self,
            secrets,
            _guard: guard,
        }))
    }
}

/// Vault backed by the operating system's secret service
///
/// Each secret is one keyring entry addressed by `(service, account)`.
/// Handles hold no state; every call goes straight to the platform store.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringVault;

impl KeyringVault {
    pub fn new() -> Self {
        Self
    }
}

fn keyring_error(e: keyring::Error, service: &str, account: &str) -> VaultError {
    match e {
        keyring::Error::NoEntry => VaultError::not_found(service, account),
        keyring::Error::PlatformFailure(e) | keyring::Error::NoStorageAccess(e) => {
            VaultError::Unavailable(e.to_string())
        }
        other => VaultError::Backend(other.to_string()),
    }
}

fn keyring_entry(service: &str, account: &str) -> Result<keyring::Entry, VaultError> {
    keyring::Entry::new(service, account).map_err(|e| keyring_error(e, service, account))
}

struct KeyringHandle;

impl VaultHandle for KeyringHandle {
    fn get_password(&self, service: &str, account: &str) -> Result<String, VaultError> {
        keyring_entry(service, account)?
            .get_password()
            .map_err(|e| keyring_error(e, service, account))
    }

    fn set_password(
        &mut self,
        service: &str,
        account: &str,
        value: &str,
    ) -> Result<(), VaultError> {
        keyring_entry(service, account)?
            .set_password(value)
            .map_err(|e| keyring_error(e, service, account))?;
        debug!(service, account, "keyring entry written");
        Ok(())
    }

    fn delete_password(&mut self, service: &str, account: &str) -> Result<(), VaultError> {
        keyring_entry(service, account)?
            .delete_credential()
            .map_err(|e| keyring_error(e, service, account))
    }
}

impl SecretVault for KeyringVault {
    fn open(&self) -> Result<Box<dyn VaultHandle + '_>, VaultError> {
        Ok(Box::new(KeyringHandle))
    }
}

/// Vault that is never reachable, standing in for hosts without a secret
/// service
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableVault;

impl SecretVault for UnavailableVault {
    fn open(&self) -> Result<Box<dyn VaultHandle + '_>, VaultError> {
        Err(VaultError::Unavailable(
            "no secret service on this host".to_string(),
        ))
    }
}
