//! Preferences service
//!
//! [`Preferences`] is the handle consumers hold. It owns the typed accessor,
//! the credential store and one lazily built, cached object per preference
//! group. Group getters return the same `Arc` until something invalidates the
//! slot: a change of the owner identity (for the identity-dependent groups),
//! [`Preferences::clear`] or [`Preferences::import_preferences`].

use crate::accessor::TypedStore;
use crate::backing_store::{BackingStore, DEFAULT_NODE_PATH};
use crate::credentials::CredentialStore;
use crate::defaults::DefaultTable;
use crate::environment::Environment;
use crate::error::Result;
use crate::groups::*;
use crate::keys::{
    DEFAULT_OWNER, FETCHER_CUSTOM_KEY_NAMES, FETCHER_SECRET_NAMESPACE, MEMORY_STICK_MODE,
    PROXY_SECRET_ACCOUNT, PROXY_SECRET_NAMESPACE,
};
use crate::types::PreferenceMap;
use crate::vault::{FileVault, KeyringVault, SecretVault};
use crate::xml_store::{self, FileStore};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// File name of the store inside the default configuration directory
pub const DEFAULT_STORE_FILE: &str = "preferences.xml";

/// Configuration for opening a [`Preferences`] handle
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    /// Node path of the application node in exported documents
    pub node_path: String,
    /// Name of the portable preferences file in the working directory
    pub portable_file_name: String,
    pub environment: Environment,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            node_path: DEFAULT_NODE_PATH.to_string(),
            portable_file_name: "jabref.xml".to_string(),
            environment: Environment::detect(),
        }
    }
}

impl PreferencesConfig {
    /// Location of the portable preferences file
    pub fn portable_file(&self) -> PathBuf {
        self.environment.working_dir.join(&self.portable_file_name)
    }
}

/// Directory holding the default store file
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jabprefs")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reset_slot<G>(slot: &Mutex<Option<Arc<G>>>) {
    *lock(slot) = None;
}

fn build<G: PreferenceGroup>(shared: &Shared, link: &Link) -> G {
    let group = G::load(shared);
    group.bind(link);
    group
}

macro_rules! preference_groups {
    ($($(#[$meta:meta])* $getter:ident: $ty:ty => $build:expr;)*) => {
        #[derive(Default)]
        struct Slots {
            $($getter: Mutex<Option<Arc<$ty>>>,)*
        }

        impl Slots {
            fn reset_all(&self) {
                $(reset_slot(&self.$getter);)*
            }
        }

        impl Preferences {
            $(
                $(#[$meta])*
                pub fn $getter(&self) -> Arc<$ty> {
                    self.cached(&self.inner.slots.$getter, $build)
                }
            )*
        }
    };
}

preference_groups! {
    library: LibraryPreferences => build;
    doi: DoiPreferences => build;
    /// Changing `default_owner` invalidates [`internal`](Self::internal) and
    /// [`file`](Self::file)
    owner: OwnerPreferences => build;
    timestamp: TimestampPreferences => build;
    remote: RemotePreferences => build;
    proxy: ProxyPreferences => build;
    ssl: SslPreferences => build;
    citation_key_patterns: CitationKeyPatternPreferences => build;
    bib_entry: BibEntryPreferences => build;
    internal: InternalPreferences => build;
    field: FieldPreferences => build;
    file: FilePreferences => build;
    auto_link: AutoLinkPreferences => build;
    export: ExportPreferences => build;
    cleanup: CleanupPreferences => build;
    last_files_opened: LastFilesOpenedPreferences => build;
    importer: ImporterPreferences => build;
    grobid: GrobidPreferences => build;
    journal_abbreviation: JournalAbbreviationPreferences => build;
    protected_terms: ProtectedTermsPreferences => build;
    xmp: XmpPreferences => build;
    search: SearchPreferences => build;
    open_office: OpenOfficePreferences => build;
    name_display: NameDisplayPreferences => build;
    main_table: MainTablePreferences => build;
    main_table_columns: ColumnPreferences => |shared: &Shared, link: &Link| {
        ColumnPreferences::build(shared, link, &MAIN_TABLE_COLUMNS)
    };
    search_dialog_columns: ColumnPreferences => |shared: &Shared, link: &Link| {
        ColumnPreferences::build(shared, link, &SEARCH_DIALOG_COLUMNS)
    };
    core_gui: CoreGuiPreferences => build;
    workspace: WorkspacePreferences => build;
    groups: GroupsPreferences => build;
    entry_editor: EntryEditorPreferences => build;
    preview: PreviewPreferences => build;
    auto_complete: AutoCompletePreferences => build;
    external_applications: ExternalApplicationsPreferences => build;
    merge_dialog: MergeDialogPreferences => build;
    special_fields: SpecialFieldsPreferences => build;
    copy_to: CopyToPreferences => build;
}

/// State shared between the handle and the write-back listeners
pub(crate) struct Shared {
    pub(crate) store: TypedStore,
    pub(crate) credentials: CredentialStore,
    pub(crate) config: PreferencesConfig,
    user_and_host: Mutex<Option<String>>,
    slots: Slots,
}

impl Shared {
    /// `"<owner>-<host>"`, the identity secrets are encrypted under
    pub(crate) fn user_and_host(&self) -> String {
        let mut cached = lock(&self.user_and_host);
        if let Some(identity) = cached.as_ref().filter(|id| !id.trim().is_empty()) {
            return identity.clone();
        }
        let identity = format!(
            "{}-{}",
            self.store.get_string(DEFAULT_OWNER),
            self.config.environment.host_name
        );
        *cached = Some(identity.clone());
        identity
    }

    /// Forget the memoised identity and every group derived from it
    pub(crate) fn identity_changed(&self) {
        *lock(&self.user_and_host) = None;
        reset_slot(&self.slots.internal);
        reset_slot(&self.slots.file);
        debug!("owner changed, identity-dependent groups invalidated");
    }

    pub(crate) fn portable_file(&self) -> PathBuf {
        self.config.portable_file()
    }

    fn reset_all(&self) {
        *lock(&self.user_and_host) = None;
        self.slots.reset_all();
    }
}

/// Handle to the preference engine
///
/// Cloning is cheap; every clone sees the same cache.
#[derive(Clone)]
pub struct Preferences {
    inner: Arc<Shared>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Preferences {
    /// Open the engine over `store` and `vault`
    ///
    /// A portable preferences file in the working directory is merged into
    /// the store before the default table is built.
    pub fn open(
        store: Arc<dyn BackingStore>,
        vault: Arc<dyn SecretVault>,
        config: PreferencesConfig,
    ) -> Self {
        let portable = config.portable_file();
        if portable.exists() {
            match xml_store::import_from_file(store.as_ref(), &portable) {
                Ok(()) => info!(path = %portable.display(), "imported portable preferences"),
                Err(e) => warn!(path = %portable.display(), error = %e, "could not import portable preferences"),
            }
        }

        let defaults = DefaultTable::for_environment(&config.environment);
        Self {
            inner: Arc::new(Shared {
                store: TypedStore::new(store, defaults),
                credentials: CredentialStore::new(vault),
                config,
                user_and_host: Mutex::new(None),
                slots: Slots::default(),
            }),
        }
    }

    /// Open the file-backed store under [`default_config_dir`], keeping
    /// secrets in the operating system keyring
    pub fn open_default(config: PreferencesConfig) -> Result<Self> {
        let store_path = default_config_dir().join(DEFAULT_STORE_FILE);
        Self::open_store_file(&store_path, Arc::new(KeyringVault::new()), config)
    }

    /// Open a file-backed store at `store_path` with the given vault
    pub fn open_store_file(
        store_path: &Path,
        vault: Arc<dyn SecretVault>,
        config: PreferencesConfig,
    ) -> Result<Self> {
        let store = FileStore::open_with_node_path(store_path, &config.node_path)?;
        Ok(Self::open(Arc::new(store), vault, config))
    }

    /// Open a file-backed store at `store_path` and a file vault at `vault_path`
    pub fn open_files(store_path: &Path, vault_path: &Path, config: PreferencesConfig) -> Result<Self> {
        Self::open_store_file(store_path, Arc::new(FileVault::new(vault_path)), config)
    }

    fn cached<G>(
        &self,
        slot: &Mutex<Option<Arc<G>>>,
        build: impl FnOnce(&Shared, &Link) -> G,
    ) -> Arc<G> {
        let mut guard = lock(slot);
        if let Some(group) = guard.as_ref() {
            return Arc::clone(group);
        }
        let group = Arc::new(build(&self.inner, &Link::new(&self.inner)));
        debug!(group = std::any::type_name::<G>(), "built preference group");
        *guard = Some(Arc::clone(&group));
        group
    }

    pub fn store(&self) -> &TypedStore {
        &self.inner.store
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn config(&self) -> &PreferencesConfig {
        &self.inner.config
    }

    pub fn defaults(&self) -> &DefaultTable {
        self.inner.store.defaults()
    }

    pub fn user_and_host(&self) -> String {
        self.inner.user_and_host()
    }

    /// Every stored key of the application node, typed
    pub fn all_preferences(&self) -> PreferenceMap {
        self.inner.store.all_preferences()
    }

    /// Remove a stored key; fails with `NoSuchKey` when it is not stored
    pub fn delete_key(&self, key: &str) -> Result<()> {
        self.inner.store.delete_key(key)
    }

    /// Persist pending changes
    ///
    /// In memory-stick mode the whole tree is first exported to the portable
    /// file. Failures are logged, never returned.
    pub fn flush(&self) {
        if self.inner.store.get_bool(MEMORY_STICK_MODE) {
            let portable = self.inner.portable_file();
            if let Err(e) = self.export_preferences(&portable) {
                warn!(path = %portable.display(), error = %e, "could not write portable preferences");
            }
        }
        if let Err(e) = self.inner.store.flush() {
            warn!(error = %e, "could not flush preferences");
        }
    }

    /// Remove every stored preference and forget all cached groups
    ///
    /// Fetcher API keys and the proxy password are deleted from the vault
    /// first, while the key names are still readable from the store.
    pub fn clear(&self) -> Result<()> {
        let fetchers = self.inner.store.get_string_list(FETCHER_CUSTOM_KEY_NAMES);
        self.inner
            .credentials
            .delete_all_secrets(FETCHER_SECRET_NAMESPACE, &fetchers);
        self.inner
            .credentials
            .delete_secret(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT);
        self.inner.store.clear_all()?;
        self.inner.reset_all();
        info!("preferences cleared");
        Ok(())
    }

    /// Merge a preferences document into the store and forget all cached groups
    pub fn import_preferences(&self, path: &Path) -> Result<()> {
        xml_store::import_from_file(self.inner.store.backing_store().as_ref(), path)?;
        self.inner.reset_all();
        info!(path = %path.display(), "preferences imported");
        Ok(())
    }

    pub fn export_preferences(&self, path: &Path) -> Result<()> {
        xml_store::export_to_file(self.inner.store.backing_store().as_ref(), path)?;
        debug!(path = %path.display(), "preferences exported");
        Ok(())
    }
}
