//! Preference groups
//!
//! A group is a typed view over a handful of related keys. Each mutable field
//! is a [`Property`]; when the group is built the service subscribes one
//! write-back listener per property, so `group.field.set(v)` lands in the
//! store before `set` returns.
//!
//! Listeners hold a [`Link`], a weak reference to the service state. A group
//! that outlives its [`Preferences`](crate::Preferences) handle keeps working
//! as a plain value holder; its writes are dropped.

use crate::observable::Property;
use crate::service::Shared;
use std::path::PathBuf;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Defines a fieldless enum whose variants are persisted by name
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored name of the variant
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(text: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.name() == text)
            }

            /// Parse `text`, logging and returning `fallback` when it names no variant
            pub fn parse_or(text: &str, fallback: Self) -> Self {
                Self::parse(text.trim()).unwrap_or_else(|| {
                    tracing::warn!(
                        kind = stringify!($name),
                        value = %text,
                        fallback = %fallback,
                        "unknown stored value, using fallback"
                    );
                    fallback
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

mod citation_key;
mod export;
mod files;
mod gui;
mod importer;
mod library;
mod network;
mod table;

pub use citation_key::{CitationKeyPatternPreferences, GlobalCitationKeyPatterns, KeySuffix};
pub use export::{
    CleanupPreferences, CleanupStep, ExportPreferences, FieldFormatterCleanups, SaveOrder,
    SaveOrderType, SortCriterion,
};
pub use files::{
    AutoLinkPreferences, CitationKeyDependency, FilePreferences, LastFilesOpenedPreferences,
};
pub use gui::{
    AutoCompleteFirstNameMode, AutoCompletePreferences, CopyToPreferences, CoreGuiPreferences,
    DiffMode, EntryEditorPreferences, EntryEditorTab, ExternalApplicationsPreferences,
    GroupHierarchyType, GroupViewMode, GroupsPreferences, JournalPopup, MergeDialogPreferences,
    NameFormat, OpenOfficePreferences, PreviewPreferences, SearchDisplayMode, SearchPreferences,
    SpecialFieldsPreferences, WorkspacePreferences,
};
pub use importer::{
    FetcherApiKey, GrobidPreferences, ImporterPreferences, JournalAbbreviationPreferences,
    PlainCitationParser, ProtectedTermsPreferences, XmpPreferences,
};
pub use library::{
    BibEntryPreferences, DatabaseMode, DoiPreferences, FieldPreferences, InternalPreferences,
    LibraryPreferences, OwnerPreferences, TimestampPreferences,
};
pub use network::{ProxyPreferences, RemotePreferences, SslPreferences};
pub use table::{
    AbbreviationStyle, ColumnKeys, ColumnPreferences, DisplayStyle, MainTableColumn,
    MainTablePreferences, NameDisplayPreferences, SortType, MAIN_TABLE_COLUMNS,
    SEARCH_DIALOG_COLUMNS,
};

/// A group the service can build and keep in a cache slot
pub(crate) trait PreferenceGroup: Send + Sync + Sized + 'static {
    /// Read the group's current state from the store
    fn load(shared: &Shared) -> Self;

    /// Subscribe write-back listeners on every mutable field
    fn bind(&self, link: &Link);
}

/// Weak handle from a listener back to the service state
#[derive(Clone)]
pub(crate) struct Link(Weak<Shared>);

impl Link {
    pub(crate) fn new(shared: &Arc<Shared>) -> Self {
        Self(Arc::downgrade(shared))
    }

    pub(crate) fn with(&self, f: impl FnOnce(&Shared)) {
        match self.0.upgrade() {
            Some(shared) => f(&shared),
            None => debug!("preferences closed, write-back dropped"),
        }
    }
}

pub(crate) fn bind_with<T, F>(property: &Property<T>, link: &Link, write: F)
where
    T: Clone + PartialEq,
    F: Fn(&Shared, &T) + Send + Sync + 'static,
{
    let link = link.clone();
    property.subscribe(move |value| link.with(|shared| write(shared, value)));
}

pub(crate) fn bind_bool(property: &Property<bool>, link: &Link, key: &'static str) {
    bind_with(property, link, move |s, v| s.store.put_bool(key, *v));
}

pub(crate) fn bind_int(property: &Property<i32>, link: &Link, key: &'static str) {
    bind_with(property, link, move |s, v| s.store.put_int(key, *v));
}

pub(crate) fn bind_double(property: &Property<f64>, link: &Link, key: &'static str) {
    bind_with(property, link, move |s, v| s.store.put_double(key, *v));
}

pub(crate) fn bind_string(property: &Property<String>, link: &Link, key: &'static str) {
    bind_with(property, link, move |s, v| s.store.put_string(key, v));
}

pub(crate) fn bind_string_list(property: &Property<Vec<String>>, link: &Link, key: &'static str) {
    bind_with(property, link, move |s, v| {
        s.store.put_string_list(key, Some(v.as_slice()))
    });
}

pub(crate) fn bind_path(property: &Property<PathBuf>, link: &Link, key: &'static str) {
    bind_with(property, link, move |s, v| {
        s.store.put_string(key, &v.display().to_string())
    });
}

/// Write a derived enum back as its set of boolean flags
///
/// Each flag is set to `value == flag's variant`.
pub(crate) fn bind_flags<T>(property: &Property<T>, link: &Link, flags: &'static [(&'static str, T)])
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    bind_with(property, link, move |s, v| {
        for (key, variant) in flags {
            s.store.put_bool(key, v == variant);
        }
    });
}

/// First flag that is set wins; `fallback` when none is
pub(crate) fn derive_from_flags<T: Copy>(
    shared: &Shared,
    flags: &[(&'static str, T)],
    fallback: T,
) -> T {
    flags
        .iter()
        .find(|(key, _)| shared.store.get_bool(key))
        .map(|(_, variant)| *variant)
        .unwrap_or(fallback)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::backing_store::MemoryStore;
    use crate::environment::Environment;
    use crate::service::{Preferences, PreferencesConfig};
    use crate::vault::MemoryVault;
    use std::sync::Arc;
    use tempfile::TempDir;

    pub(crate) struct Fixture {
        pub(crate) prefs: Preferences,
        pub(crate) store: Arc<MemoryStore>,
        pub(crate) vault: Arc<MemoryVault>,
        pub(crate) dir: TempDir,
    }

    impl Fixture {
        pub(crate) fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = Arc::new(MemoryStore::new());
            let vault = Arc::new(MemoryVault::new());
            let prefs = Self::open(&dir, &store, &vault);
            Self {
                prefs,
                store,
                vault,
                dir,
            }
        }

        fn open(dir: &TempDir, store: &Arc<MemoryStore>, vault: &Arc<MemoryVault>) -> Preferences {
            let config = PreferencesConfig {
                environment: Environment::isolated("alice", "box", dir.path()),
                ..PreferencesConfig::default()
            };
            Preferences::open(store.clone(), vault.clone(), config)
        }

        /// A fresh handle over the same store and vault, as after a restart
        pub(crate) fn reopen(&self) -> Preferences {
            Self::open(&self.dir, &self.store, &self.vault)
        }
    }
}
