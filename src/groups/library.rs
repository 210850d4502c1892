use super::{
    bind_bool, bind_flags, bind_path, bind_string, bind_string_list, bind_with, derive_from_flags,
    Link, PreferenceGroup,
};
use crate::keys::*;
use crate::observable::Property;
use crate::service::Shared;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

named_enum! {
    /// Flavour of bibliography database new libraries start in
    pub enum DatabaseMode {
        Bibtex => "BIBTEX",
        Biblatex => "BIBLATEX",
    }
}

const DATABASE_MODE_FLAGS: &[(&str, DatabaseMode)] =
    &[(BIBLATEX_DEFAULT_MODE, DatabaseMode::Biblatex)];

#[derive(Debug)]
pub struct LibraryPreferences {
    pub default_mode: Property<DatabaseMode>,
    pub reformat_on_save: Property<bool>,
    pub auto_save: Property<bool>,
}

impl PreferenceGroup for LibraryPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            default_mode: Property::new(derive_from_flags(
                shared,
                DATABASE_MODE_FLAGS,
                DatabaseMode::Bibtex,
            )),
            reformat_on_save: Property::new(store.get_bool(REFORMAT_FILE_ON_SAVE_AND_EXPORT)),
            auto_save: Property::new(store.get_bool(LOCAL_AUTO_SAVE)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_flags(&self.default_mode, link, DATABASE_MODE_FLAGS);
        bind_bool(&self.reformat_on_save, link, REFORMAT_FILE_ON_SAVE_AND_EXPORT);
        bind_bool(&self.auto_save, link, LOCAL_AUTO_SAVE);
    }
}

#[derive(Debug)]
pub struct DoiPreferences {
    pub use_custom: Property<bool>,
    pub default_base_uri: Property<String>,
}

impl PreferenceGroup for DoiPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            use_custom: Property::new(shared.store.get_bool(USE_CUSTOM_DOI_URI)),
            default_base_uri: Property::new(shared.store.get_string(BASE_DOI_URI)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.use_custom, link, USE_CUSTOM_DOI_URI);
        bind_string(&self.default_base_uri, link, BASE_DOI_URI);
    }
}

#[derive(Debug)]
pub struct OwnerPreferences {
    pub use_owner: Property<bool>,
    /// Also part of the installation identity secrets are encrypted under
    pub default_owner: Property<String>,
    pub overwrite_owner: Property<bool>,
}

impl PreferenceGroup for OwnerPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            use_owner: Property::new(shared.store.get_bool(USE_OWNER)),
            default_owner: Property::new(shared.store.get_string(DEFAULT_OWNER)),
            overwrite_owner: Property::new(shared.store.get_bool(OVERWRITE_OWNER)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.use_owner, link, USE_OWNER);
        bind_with(&self.default_owner, link, |s, owner| {
            s.store.put_string(DEFAULT_OWNER, owner);
            s.identity_changed();
        });
        bind_bool(&self.overwrite_owner, link, OVERWRITE_OWNER);
    }
}

#[derive(Debug)]
pub struct TimestampPreferences {
    pub add_creation_date: Property<bool>,
    pub add_modification_date: Property<bool>,
    pub update_timestamp: Property<bool>,
    pub timestamp_field: Property<String>,
    pub timestamp_format: Property<String>,
}

impl PreferenceGroup for TimestampPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            add_creation_date: Property::new(store.get_bool(ADD_CREATION_DATE)),
            add_modification_date: Property::new(store.get_bool(ADD_MODIFICATION_DATE)),
            update_timestamp: Property::new(store.get_bool(UPDATE_TIMESTAMP)),
            timestamp_field: Property::new(store.get_string(TIME_STAMP_FIELD)),
            timestamp_format: Property::new(store.get_string(TIME_STAMP_FORMAT)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.add_creation_date, link, ADD_CREATION_DATE);
        bind_bool(&self.add_modification_date, link, ADD_MODIFICATION_DATE);
        bind_bool(&self.update_timestamp, link, UPDATE_TIMESTAMP);
        bind_string(&self.timestamp_field, link, TIME_STAMP_FIELD);
        bind_string(&self.timestamp_format, link, TIME_STAMP_FORMAT);
    }
}

/// Keyword handling shared by every entry
#[derive(Debug)]
pub struct BibEntryPreferences {
    pub keyword_separator: Property<char>,
}

impl PreferenceGroup for BibEntryPreferences {
    fn load(shared: &Shared) -> Self {
        let separator = shared
            .store
            .get_string(KEYWORD_SEPARATOR)
            .chars()
            .next()
            .unwrap_or(',');
        Self {
            keyword_separator: Property::new(separator),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.keyword_separator, link, |s, c| {
            s.store.put_string(KEYWORD_SEPARATOR, &c.to_string())
        });
    }
}

#[derive(Debug)]
pub struct FieldPreferences {
    /// Stored inverted, as `doNotResolveStrings`
    pub resolve_strings: Property<bool>,
    pub resolvable_fields: Property<Vec<String>>,
    pub non_wrappable_fields: Property<Vec<String>>,
}

impl PreferenceGroup for FieldPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            resolve_strings: Property::new(!store.get_bool(DO_NOT_RESOLVE_STRINGS)),
            resolvable_fields: Property::new(store.get_string_list(RESOLVE_STRINGS_FOR_FIELDS)),
            non_wrappable_fields: Property::new(store.get_string_list(NON_WRAPPABLE_FIELDS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.resolve_strings, link, |s, resolve| {
            s.store.put_bool(DO_NOT_RESOLVE_STRINGS, !resolve)
        });
        bind_string_list(&self.resolvable_fields, link, RESOLVE_STRINGS_FOR_FIELDS);
        bind_string_list(&self.non_wrappable_fields, link, NON_WRAPPABLE_FIELDS);
    }
}

/// Application bookkeeping not shown in the preferences dialog
#[derive(Debug)]
pub struct InternalPreferences {
    pub ignored_version: Property<String>,
    pub version_check_enabled: Property<bool>,
    pub last_preferences_export_path: Property<PathBuf>,
    /// `"<owner>-<host>"` at the time the group was built
    pub user_and_host: String,
    /// Mirror the store into the portable file on every flush
    pub memory_stick_mode: Property<bool>,
}

impl PreferenceGroup for InternalPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            ignored_version: Property::new(store.get_string(VERSION_IGNORED_UPDATE)),
            version_check_enabled: Property::new(store.get_bool(VERSION_CHECK_ENABLED)),
            last_preferences_export_path: Property::new(
                store.get_path(PREFS_EXPORT_PATH, Path::new("/")),
            ),
            user_and_host: shared.user_and_host(),
            memory_stick_mode: Property::new(store.get_bool(MEMORY_STICK_MODE)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string(&self.ignored_version, link, VERSION_IGNORED_UPDATE);
        bind_bool(&self.version_check_enabled, link, VERSION_CHECK_ENABLED);
        bind_path(&self.last_preferences_export_path, link, PREFS_EXPORT_PATH);
        bind_with(&self.memory_stick_mode, link, |s, enabled| {
            s.store.put_bool(MEMORY_STICK_MODE, *enabled);
            if !*enabled {
                remove_portable_file(&s.portable_file());
            }
        });
    }
}

fn remove_portable_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!(path = %path.display(), "removed portable preferences"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove portable preferences"),
    }
}
