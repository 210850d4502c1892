use super::{
    bind_bool, bind_flags, bind_path, bind_string, bind_with, derive_from_flags, Link,
    PreferenceGroup,
};
use crate::accessor::TypedStore;
use crate::keys::*;
use crate::observable::Property;
use crate::service::Shared;
use std::path::{Path, PathBuf};

/// Linked-file handling
#[derive(Debug)]
pub struct FilePreferences {
    /// `"<owner>-<host>"` at the time the group was built
    pub user_and_host: String,
    pub main_file_directory: Property<PathBuf>,
    pub store_files_relative_to_bib: Property<bool>,
    pub file_name_pattern: Property<String>,
    pub file_directory_pattern: Property<String>,
    pub download_linked_files: Property<bool>,
    pub fulltext_index_linked_files: Property<bool>,
    pub working_directory: Property<PathBuf>,
    pub create_backup: Property<bool>,
    pub backup_directory: Property<PathBuf>,
    pub confirm_delete_linked_file: Property<bool>,
    pub move_to_trash: Property<bool>,
    pub keep_download_url: Property<bool>,
}

impl PreferenceGroup for FilePreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let home = &shared.config.environment.home_dir;
        Self {
            user_and_host: shared.user_and_host(),
            main_file_directory: Property::new(store.get_path(MAIN_FILE_DIRECTORY, Path::new("/"))),
            store_files_relative_to_bib: Property::new(store.get_bool(STORE_RELATIVE_TO_BIB)),
            file_name_pattern: Property::new(store.get_string(IMPORT_FILENAMEPATTERN)),
            file_directory_pattern: Property::new(store.get_string(IMPORT_FILEDIRPATTERN)),
            download_linked_files: Property::new(store.get_bool(DOWNLOAD_LINKED_FILES)),
            fulltext_index_linked_files: Property::new(store.get_bool(FULLTEXT_INDEX_LINKED_FILES)),
            working_directory: Property::new(store.get_path(WORKING_DIRECTORY, home)),
            create_backup: Property::new(store.get_bool(CREATE_BACKUP)),
            backup_directory: Property::new(store.get_path(BACKUP_DIRECTORY, home)),
            confirm_delete_linked_file: Property::new(store.get_bool(CONFIRM_LINKED_FILE_DELETE)),
            move_to_trash: Property::new(store.get_bool(TRASH_INSTEAD_OF_DELETE)),
            keep_download_url: Property::new(store.get_bool(KEEP_DOWNLOAD_URL)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_path(&self.main_file_directory, link, MAIN_FILE_DIRECTORY);
        bind_bool(&self.store_files_relative_to_bib, link, STORE_RELATIVE_TO_BIB);
        bind_string(&self.file_name_pattern, link, IMPORT_FILENAMEPATTERN);
        bind_string(&self.file_directory_pattern, link, IMPORT_FILEDIRPATTERN);
        bind_bool(&self.download_linked_files, link, DOWNLOAD_LINKED_FILES);
        bind_bool(&self.fulltext_index_linked_files, link, FULLTEXT_INDEX_LINKED_FILES);
        bind_path(&self.working_directory, link, WORKING_DIRECTORY);
        bind_bool(&self.create_backup, link, CREATE_BACKUP);
        bind_path(&self.backup_directory, link, BACKUP_DIRECTORY);
        bind_bool(&self.confirm_delete_linked_file, link, CONFIRM_LINKED_FILE_DELETE);
        bind_bool(&self.move_to_trash, link, TRASH_INSTEAD_OF_DELETE);
        bind_bool(&self.keep_download_url, link, KEEP_DOWNLOAD_URL);
    }
}

named_enum! {
    /// How strictly a file name must match the citation key to be auto-linked
    pub enum CitationKeyDependency {
        Start => "START",
        Exact => "EXACT",
        Regex => "REGEX",
    }
}

const KEY_DEPENDENCY_FLAGS: &[(&str, CitationKeyDependency)] = &[
    (AUTOLINK_EXACT_KEY_ONLY, CitationKeyDependency::Exact),
    (AUTOLINK_USE_REG_EXP_SEARCH_KEY, CitationKeyDependency::Regex),
];

#[derive(Debug)]
pub struct AutoLinkPreferences {
    pub citation_key_dependency: Property<CitationKeyDependency>,
    pub regular_expression: Property<String>,
    pub ask_auto_naming_pdfs_again: Property<bool>,
    pub auto_link_files_enabled: Property<bool>,
}

impl PreferenceGroup for AutoLinkPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            citation_key_dependency: Property::new(derive_from_flags(
                shared,
                KEY_DEPENDENCY_FLAGS,
                CitationKeyDependency::Start,
            )),
            regular_expression: Property::new(store.get_string(AUTOLINK_REG_EXP_SEARCH_EXPRESSION_KEY)),
            ask_auto_naming_pdfs_again: Property::new(store.get_bool(ASK_AUTO_NAMING_PDFS_AGAIN)),
            auto_link_files_enabled: Property::new(store.get_bool(AUTOLINK_FILES_ENABLED)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_flags(&self.citation_key_dependency, link, KEY_DEPENDENCY_FLAGS);
        bind_string(&self.regular_expression, link, AUTOLINK_REG_EXP_SEARCH_EXPRESSION_KEY);
        bind_bool(&self.ask_auto_naming_pdfs_again, link, ASK_AUTO_NAMING_PDFS_AGAIN);
        bind_bool(&self.auto_link_files_enabled, link, AUTOLINK_FILES_ENABLED);
    }
}

/// Libraries open at shutdown and the recent-files history
#[derive(Debug)]
pub struct LastFilesOpenedPreferences {
    pub last_files_opened: Property<Vec<PathBuf>>,
    pub last_focused_file: Property<Option<PathBuf>>,
    pub file_history: Property<Vec<PathBuf>>,
}

fn read_paths(store: &TypedStore, key: &str) -> Vec<PathBuf> {
    store
        .get_string_list(key)
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

fn write_paths(store: &TypedStore, key: &str, paths: &[PathBuf]) {
    let items: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    store.put_string_list(key, Some(items.as_slice()));
}

impl PreferenceGroup for LastFilesOpenedPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let last_focused = store
            .get_optional(LAST_FOCUSED)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Self {
            last_files_opened: Property::new(read_paths(store, LAST_EDITED)),
            last_focused_file: Property::new(last_focused),
            file_history: Property::new(read_paths(store, RECENT_DATABASES)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.last_files_opened, link, |s, files| {
            if files.is_empty() {
                s.store.remove(LAST_EDITED);
            } else {
                write_paths(&s.store, LAST_EDITED, files);
            }
        });
        bind_with(&self.last_focused_file, link, |s, focused| match focused {
            Some(path) => s.store.put_string(LAST_FOCUSED, &path.display().to_string()),
            None => s.store.remove(LAST_FOCUSED),
        });
        bind_with(&self.file_history, link, |s, history| {
            write_paths(&s.store, RECENT_DATABASES, history)
        });
    }
}
