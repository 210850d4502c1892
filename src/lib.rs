//! # jabprefs - typed preference persistence for a reference manager
//!
//! This library keeps a desktop reference manager's settings in a
//! hierarchical key/value store and hands them out as typed, observable
//! preference groups. It covers:
//!
//! - A typed accessor with a per-machine default table and lenient coercion
//! - Delimited lists and indexed series for multi-valued settings
//! - Encrypted credentials in the OS keyring, keyed on the owner and host name
//! - Lazily built, cached preference groups whose fields write themselves back
//! - Import and export of the whole tree as a Java-preferences XML document
//!
//! ## Quick Start
//!
//! ```rust
//! use jabprefs::{Environment, MemoryStore, MemoryVault, Preferences, PreferencesConfig};
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir()?;
//! let config = PreferencesConfig {
//!     environment: Environment::isolated("alice", "laptop", dir.path()),
//!     ..PreferencesConfig::default()
//! };
//! let prefs = Preferences::open(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryVault::new()),
//!     config,
//! );
//!
//! // Groups are cached: both calls return the same object
//! let remote = prefs.remote();
//! assert!(Arc::ptr_eq(&remote, &prefs.remote()));
//!
//! // Setting a field writes it to the store immediately
//! remote.port.set(6051);
//! assert_eq!(prefs.store().get_int("remoteServerPort"), 6051);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### File-backed stores
//!
//! ```rust,no_run
//! use jabprefs::{Preferences, PreferencesConfig};
//! use std::path::Path;
//!
//! let prefs = Preferences::open_files(
//!     Path::new("preferences.xml"),
//!     Path::new("vault.json"),
//!     PreferencesConfig::default(),
//! )?;
//! prefs.workspace().main_font_size.set(12);
//! prefs.flush();
//! # Ok::<(), jabprefs::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Reads never fail: missing or malformed values resolve to defaults and are
//! logged through `tracing`. Operations that can fail return [`Result<T, Error>`].

// Re-export all public types at crate root
pub use types::{PrefValue, PrefValueExt, PreferenceEntry, PreferenceMap};

// Re-export error types
pub use error::{Error, Result};

pub use accessor::TypedStore;
pub use backing_store::{BackingStore, MemoryStore, PreferenceTree, DEFAULT_NODE_PATH};
pub use credentials::{CredentialStore, SecretCipher};
pub use defaults::DefaultTable;
pub use environment::{Environment, OsFamily};
pub use formats::{CustomExporter, CustomImporter, ImporterRegistry};
pub use groups::*;
pub use observable::Property;
pub use query::query_preferences;
pub use service::{default_config_dir, Preferences, PreferencesConfig, DEFAULT_STORE_FILE};
pub use vault::{
    FileVault, KeyringVault, MemoryVault, SecretVault, UnavailableVault, VaultError, VaultHandle,
};
pub use xml_store::{export_to_file, import_from_file, read_tree, write_tree, FileStore};

pub mod keys;
pub mod list_codec;

mod accessor;
mod backing_store;
mod credentials;
mod defaults;
mod environment;
mod error;
mod formats;
mod groups;
mod observable;
mod query;
mod service;
mod types;
mod vault;
mod xml_store;
