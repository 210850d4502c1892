//! Default table
//!
//! Every key the engine reads through the typed accessor has a registered
//! default here, declared with its type. The table is built once when a
//! [`Preferences`](crate::Preferences) handle is opened and is immutable
//! afterwards.

use crate::environment::{Environment, OsFamily};
use crate::groups::CleanupStep;
use crate::keys::*;
use crate::list_codec;
use crate::types::PrefValue;
use std::collections::BTreeMap;

/// Fields shown on the built-in "General" entry editor tab
pub const DEFAULT_GENERAL_FIELDS: &[&str] = &[
    "doi",
    "crossref",
    "keywords",
    "eprint",
    "url",
    "file",
    "groups",
    "owner",
    "timestamp",
    "printed",
    "priority",
    "qualityassured",
    "ranking",
    "readstatus",
    "relevance",
];

pub const DEFAULT_MAIN_TABLE_COLUMNS: &str = "groups;group_icons;files;linked_id;field:citationkey;field:entrytype;field:author/editor;field:title;field:year;field:journal/booktitle;special:ranking;special:readstatus;special:priority";
pub const DEFAULT_MAIN_TABLE_WIDTHS: &str = "28;40;28;28;100;75;300;470;60;130;50;50;50";

/// Typed map from preference key to default value
#[derive(Debug, Clone, Default)]
pub struct DefaultTable {
    values: BTreeMap<String, PrefValue>,
}

impl DefaultTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table for the current process environment
    pub fn standard() -> Self {
        Self::for_environment(&Environment::detect())
    }

    /// Register or replace a default
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PrefValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// String default of `key`, or `None` when absent or not a string
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(PrefValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the standard table for `env`
    ///
    /// A few defaults depend on the machine: the owner name, the directories
    /// rooted at the user's home and the platform-specific helper commands.
    pub fn for_environment(env: &Environment) -> Self {
        let mut t = Self::new();
        let home = env.home_dir.display().to_string();

        // library
        t.insert(BIBLATEX_DEFAULT_MODE, false);
        t.insert(REFORMAT_FILE_ON_SAVE_AND_EXPORT, false);
        t.insert(LOCAL_AUTO_SAVE, false);

        t.insert(USE_CUSTOM_DOI_URI, false);
        t.insert(BASE_DOI_URI, "https://doi.org");

        t.insert(USE_OWNER, false);
        t.insert(DEFAULT_OWNER, env.user_name.as_str());
        t.insert(OVERWRITE_OWNER, false);
        t.insert(ADD_CREATION_DATE, false);
        t.insert(ADD_MODIFICATION_DATE, false);
        t.insert(UPDATE_TIMESTAMP, false);
        t.insert(TIME_STAMP_FIELD, "timestamp");
        t.insert(TIME_STAMP_FORMAT, "yyyy-MM-dd");

        // network
        t.insert(USE_REMOTE_SERVER, true);
        t.insert(REMOTE_SERVER_PORT, 6050);
        t.insert(PROXY_USE, false);
        t.insert(PROXY_HOSTNAME, "");
        t.insert(PROXY_PORT, "80");
        t.insert(PROXY_USE_AUTHENTICATION, false);
        t.insert(PROXY_USERNAME, "");
        t.insert(PROXY_PASSWORD, "");
        t.insert(PROXY_PERSIST_PASSWORD, false);
        t.insert(
            TRUSTSTORE_PATH,
            env.home_dir
                .join(".jabref")
                .join("truststore.jks")
                .display()
                .to_string(),
        );

        // citation keys
        t.insert(AVOID_OVERWRITING_KEY, false);
        t.insert(WARN_BEFORE_OVERWRITING_KEY, true);
        t.insert(GENERATE_KEYS_BEFORE_SAVING, false);
        t.insert(KEY_GEN_FIRST_LETTER_A, true);
        t.insert(KEY_GEN_ALWAYS_ADD_LETTER, false);
        t.insert(KEY_PATTERN_REGEX, "");
        t.insert(KEY_PATTERN_REPLACEMENT, "");
        t.insert(UNWANTED_CITATION_KEY_CHARACTERS, "-`ʹ:!;?^");
        t.insert(DEFAULT_CITATION_KEY_PATTERN, "[auth][year]");

        t.insert(KEYWORD_SEPARATOR, ", ");
        t.insert(DO_NOT_RESOLVE_STRINGS, false);
        t.insert(
            RESOLVE_STRINGS_FOR_FIELDS,
            "author;booktitle;editor;editora;editorb;editorc;institution;issuetitle;journal;journalsubtitle;journaltitle;mainsubtitle;month;publisher;shortauthor;shorteditor;subtitle;titleaddon",
        );
        t.insert(NON_WRAPPABLE_FIELDS, "pdf;ps;url;doi;file;isbn;issn");

        // internal
        t.insert(VERSION_IGNORED_UPDATE, "");
        t.insert(VERSION_CHECK_ENABLED, true);
        t.insert(PREFS_EXPORT_PATH, home.as_str());
        t.insert(MEMORY_STICK_MODE, false);

        // linked files
        t.insert(STORE_RELATIVE_TO_BIB, true);
        t.insert(IMPORT_FILENAMEPATTERN, "[citationkey] - [title]");
        t.insert(IMPORT_FILEDIRPATTERN, "");
        t.insert(DOWNLOAD_LINKED_FILES, true);
        t.insert(FULLTEXT_INDEX_LINKED_FILES, true);
        t.insert(WORKING_DIRECTORY, home.as_str());
        t.insert(CREATE_BACKUP, true);
        t.insert(CONFIRM_LINKED_FILE_DELETE, true);
        t.insert(TRASH_INSTEAD_OF_DELETE, env.os != OsFamily::Linux);
        t.insert(KEEP_DOWNLOAD_URL, true);
        t.insert(
            BACKUP_DIRECTORY,
            env.home_dir.join(".jabref").join("backups").display().to_string(),
        );

        t.insert(AUTOLINK_EXACT_KEY_ONLY, false);
        t.insert(AUTOLINK_USE_REG_EXP_SEARCH_KEY, false);
        t.insert(
            AUTOLINK_REG_EXP_SEARCH_EXPRESSION_KEY,
            "**/.*[citationkey].*\\\\.[extension]",
        );
        t.insert(ASK_AUTO_NAMING_PDFS_AGAIN, true);
        t.insert(AUTOLINK_FILES_ENABLED, true);

        // export
        t.insert(LAST_USED_EXPORT, "");
        t.insert(EXPORT_WORKING_DIRECTORY, home.as_str());
        t.insert(EXPORT_IN_ORIGINAL_ORDER, true);
        t.insert(EXPORT_IN_SPECIFIED_ORDER, false);
        t.insert(EXPORT_PRIMARY_SORT_FIELD, "citationkey");
        t.insert(EXPORT_PRIMARY_SORT_DESCENDING, false);
        t.insert(EXPORT_SECONDARY_SORT_FIELD, "author");
        t.insert(EXPORT_SECONDARY_SORT_DESCENDING, false);
        t.insert(EXPORT_TERTIARY_SORT_FIELD, "title");
        t.insert(EXPORT_TERTIARY_SORT_DESCENDING, false);

        // cleanup
        let jobs: Vec<&str> = CleanupStep::default_jobs()
            .iter()
            .map(|step| step.name())
            .collect();
        t.insert(CLEANUP_JOBS, list_codec::encode(&jobs));
        t.insert(CLEANUP_FIELD_FORMATTERS_ENABLED, false);
        t.insert(
            CLEANUP_FIELD_FORMATTERS,
            "all-text-fields[normalize_whitespace]\nmonth[normalize_month]\npages[normalize_page_numbers]",
        );

        t.insert(LAST_EDITED, "");
        t.insert(LAST_FOCUSED, "");
        t.insert(RECENT_DATABASES, "");

        // importer
        t.insert(IMPORTERS_ENABLED, true);
        t.insert(GENERATE_KEY_ON_IMPORT, true);
        t.insert(IMPORT_WORKING_DIRECTORY, home.as_str());
        t.insert(WARN_ABOUT_DUPLICATES_IN_INSPECTION, true);
        t.insert(
            FETCHER_CUSTOM_KEY_NAMES,
            "Springer;IEEEXplore;SAO/NASA ADS;ScienceDirect;Biodiversity Heritage",
        );
        t.insert(FETCHER_CUSTOM_KEY_USES, "FALSE;FALSE;FALSE;FALSE;FALSE");
        t.insert(FETCHER_CUSTOM_KEY_PERSIST, false);
        t.insert(SEARCH_CATALOGS, "ACM Portal;Springer;DBLP;IEEEXplore");
        t.insert(DEFAULT_PLAIN_CITATION_PARSER, "RULE_BASED");

        t.insert(GROBID_ENABLED, false);
        t.insert(GROBID_OPT_OUT, false);
        t.insert(GROBID_URL, "http://grobid.jabref.org:8070");

        t.insert(EXTERNAL_JOURNAL_LISTS, "");
        t.insert(USE_AMS_FJOURNAL, true);
        t.insert(
            PROTECTED_TERMS_ENABLED_INTERNAL,
            "months_weekdays.terms;countries_territories.terms;electrical_engineering.terms;computer_science.terms",
        );
        t.insert(PROTECTED_TERMS_DISABLED_INTERNAL, "");
        t.insert(PROTECTED_TERMS_ENABLED_EXTERNAL, "");
        t.insert(PROTECTED_TERMS_DISABLED_EXTERNAL, "");

        t.insert(USE_XMP_PRIVACY_FILTER, false);
        t.insert(XMP_PRIVACY_FILTERS, "pdf;timestamp;keywords;owner;note;review");

        // search
        t.insert(SEARCH_DISPLAY_MODE, true);
        t.insert(SEARCH_CASE_SENSITIVE, false);
        t.insert(SEARCH_REG_EXP, false);
        t.insert(SEARCH_FULLTEXT, false);
        t.insert(SEARCH_KEEP_SEARCH_STRING, false);
        t.insert(SEARCH_KEEP_GLOBAL_WINDOW_ON_TOP, true);
        t.insert(SEARCH_WINDOW_HEIGHT, 176.0);
        t.insert(SEARCH_WINDOW_WIDTH, 600.0);
        t.insert(SEARCH_WINDOW_DIVIDER_POS, 0.5);

        // openoffice
        let office_path = match env.os {
            OsFamily::Windows => "C:\\Program Files\\LibreOffice\\program",
            OsFamily::MacOs => "/Applications/LibreOffice.app/Contents/MacOS/soffice",
            OsFamily::Linux => "/usr/lib/libreoffice/program/soffice",
        };
        t.insert(OO_EXECUTABLE_PATH, office_path);
        t.insert(OO_USE_ALL_OPEN_BASES, true);
        t.insert(OO_SYNC_WHEN_CITING, true);
        t.insert(OO_EXTERNAL_STYLE_FILES, "");
        t.insert(OO_BIBLIOGRAPHY_STYLE_FILE, "/resource/layout/JabRef_author_year.jstyle");
        t.insert(OO_CURRENT_STYLE, "ieee.csl");
        t.insert(OO_ALWAYS_ADD_CITED_ON_PAGES, false);

        // name display
        t.insert(NAMES_AS_IS, false);
        t.insert(NAMES_FIRST_LAST, false);
        t.insert(NAMES_NATBIB, true);
        t.insert(ABBR_AUTHOR_NAMES, true);
        t.insert(NAMES_LAST_ONLY, true);

        // main table
        t.insert(AUTO_RESIZE_MODE, false);
        t.insert(EXTRA_FILE_COLUMNS, false);
        t.insert(COLUMN_NAMES, DEFAULT_MAIN_TABLE_COLUMNS);
        t.insert(COLUMN_WIDTHS, DEFAULT_MAIN_TABLE_WIDTHS);
        t.insert(COLUMN_SORT_TYPES, "");
        t.insert(COLUMN_SORT_ORDER, "");
        t.insert(SEARCH_DIALOG_COLUMN_WIDTHS, DEFAULT_MAIN_TABLE_WIDTHS);
        t.insert(SEARCH_DIALOG_COLUMN_SORT_TYPES, "");
        t.insert(SEARCH_DIALOG_COLUMN_SORT_ORDER, "");

        // core gui
        t.insert(MAIN_WINDOW_POS_X, 0.0);
        t.insert(MAIN_WINDOW_POS_Y, 0.0);
        t.insert(MAIN_WINDOW_WIDTH, 1024.0);
        t.insert(MAIN_WINDOW_HEIGHT, 768.0);
        t.insert(MAIN_WINDOW_MAXIMISED, true);
        t.insert(MAIN_WINDOW_SIDEPANE_WIDTH, 0.15);
        t.insert(MAIN_WINDOW_EDITOR_HEIGHT, 0.65);

        // workspace
        t.insert(LANGUAGE, "en");
        t.insert(OVERRIDE_DEFAULT_FONT_SIZE, false);
        t.insert(MAIN_FONT_SIZE, 9);
        t.insert(THEME, "");
        t.insert(THEME_SYNC_OS, false);
        t.insert(OPEN_LAST_EDITED, true);
        t.insert(SHOW_ADVANCED_HINTS, true);
        t.insert(CONFIRM_DELETE, true);
        t.insert(CONFIRM_HIDE_TAB_BAR, true);
        t.insert(SELECTED_SLR_CATALOGS, "");

        // groups
        t.insert(GROUP_VIEW_INTERSECTION, true);
        t.insert(GROUP_VIEW_FILTER, true);
        t.insert(GROUP_VIEW_INVERT, false);
        t.insert(AUTO_ASSIGN_GROUP, true);
        t.insert(DISPLAY_GROUP_COUNT, true);
        t.insert(DEFAULT_HIERARCHICAL_CONTEXT, "INDEPENDENT");

        // preview
        t.insert(CYCLE_PREVIEW, "Preview;ieee.csl");
        t.insert(CYCLE_PREVIEW_POS, 0);
        t.insert(PREVIEW_AS_TAB, false);
        t.insert(PREVIEW_IN_ENTRY_TABLE_TOOLTIP, false);
        t.insert(PREVIEW_BST_LAYOUT_PATHS, "");
        t.insert(
            PREVIEW_STYLE,
            "<font face=\"sans-serif\"><b>\\bibtextype</b><a name=\"\\citationkey\">\\begin{citationkey} (\\citationkey)</a>\\end{citationkey}__NEWLINE__\\begin{author}<BR><BR>\\format[Authors(LastFirst, FullName,Sep= / ,LastSep= / ),HTMLChars]{\\author}\\end{author}__NEWLINE__\\begin{title}<BR><b>\\format[HTMLChars]{\\title}</b> \\end{title}</font>",
        );

        // entry editor
        t.insert(AUTO_OPEN_FORM, true);
        t.insert(SHOW_RECOMMENDATIONS, true);
        t.insert(SHOW_LATEX_CITATIONS, true);
        t.insert(DEFAULT_SHOW_SOURCE, false);
        t.insert(VALIDATE_IN_ENTRY_EDITOR, true);
        t.insert(ALLOW_INTEGER_EDITION_BIBTEX, false);
        t.insert(JOURNAL_POPUP, "FIRST_START");
        t.insert(SHOW_SCITE_TAB, true);
        t.insert(SHOW_USER_COMMENTS_FIELDS, true);
        t.insert(ENTRY_EDITOR_PREVIEW_DIVIDER_POS, 0.5);
        t.insert(format!("{CUSTOM_TAB_NAME}{DEFAULT_TAB_SUFFIX}0"), "General");
        t.insert(
            format!("{CUSTOM_TAB_FIELDS}{DEFAULT_TAB_SUFFIX}0"),
            DEFAULT_GENERAL_FIELDS.join(";"),
        );
        t.insert(format!("{CUSTOM_TAB_NAME}{DEFAULT_TAB_SUFFIX}1"), "Abstract");
        t.insert(format!("{CUSTOM_TAB_FIELDS}{DEFAULT_TAB_SUFFIX}1"), "abstract");

        // auto complete
        t.insert(AUTO_COMPLETE, false);
        t.insert(AUTOCOMPLETER_FIRSTNAME_MODE, "BOTH");
        t.insert(AUTOCOMPLETER_FIRST_LAST, false);
        t.insert(AUTOCOMPLETER_LAST_FIRST, false);
        t.insert(
            AUTOCOMPLETER_COMPLETE_FIELDS,
            "author;editor;title;journal;publisher;keywords;crossref;related;entryset",
        );

        // external applications
        t.insert(EMAIL_SUBJECT, "References");
        t.insert(KINDLE_EMAIL, "");
        t.insert(EXTERNAL_FILE_TYPES, "");
        t.insert(
            OPEN_FOLDERS_OF_ATTACHED_FILES,
            env.os == OsFamily::Windows,
        );
        t.insert(USE_DEFAULT_CONSOLE_APPLICATION, true);
        t.insert(USE_DEFAULT_FILE_BROWSER_APPLICATION, true);
        if env.os == OsFamily::Windows {
            t.insert(
                CONSOLE_COMMAND,
                "C:\\Program Files\\ConEmu\\ConEmu64.exe /single /dir \"%DIR\"",
            );
            t.insert(FILE_BROWSER_COMMAND, "explorer.exe /select, \"%DIR\"");
        } else {
            t.insert(CONSOLE_COMMAND, "");
            t.insert(FILE_BROWSER_COMMAND, "");
        }

        // merge dialog
        t.insert(MERGE_ENTRIES_DIFF_MODE, "WORD");
        t.insert(MERGE_ENTRIES_SHOULD_SHOW_DIFF, true);
        t.insert(MERGE_ENTRIES_SHOULD_SHOW_UNIFIED_DIFF, true);
        t.insert(MERGE_ENTRIES_HIGHLIGHT_WORDS, true);
        t.insert(MERGE_SHOW_ONLY_CHANGED_FIELDS, false);
        t.insert(MERGE_APPLY_TO_ALL_ENTRIES, false);

        t.insert(SPECIAL_FIELDS_ENABLED, true);
        t.insert(ASK_FOR_INCLUDING_CROSS_REFERENCES, true);
        t.insert(INCLUDE_CROSS_REFERENCES, false);

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> DefaultTable {
        let dir = TempDir::new().unwrap();
        DefaultTable::for_environment(&Environment::isolated("alice", "box", dir.path()))
    }

    #[test]
    fn test_main_font_size_default() {
        assert_eq!(table().get(MAIN_FONT_SIZE), Some(&PrefValue::Integer(9)));
    }

    #[test]
    fn test_owner_default_follows_environment() {
        assert_eq!(table().string(DEFAULT_OWNER), Some("alice"));
    }

    #[test]
    fn test_default_tabs_registered() {
        let t = table();
        assert_eq!(t.string("customTabName__def0"), Some("General"));
        assert_eq!(t.string("customTabFields__def1"), Some("abstract"));
        assert!(t.string("customTabName__def2").is_none());
    }

    #[test]
    fn test_typed_entries() {
        let t = table();
        assert_eq!(t.get(SEARCH_WINDOW_WIDTH), Some(&PrefValue::Float(600.0)));
        assert_eq!(t.get(PROXY_PORT), Some(&PrefValue::from("80")));
        assert_eq!(t.get(NAMES_NATBIB), Some(&PrefValue::Bool(true)));
        assert!(!t.is_empty());
    }

    #[test]
    fn test_cleanup_jobs_exclude_destructive_steps() {
        let jobs = list_codec::decode(table().string(CLEANUP_JOBS).unwrap());
        assert!(jobs.contains(&"CLEAN_UP_DOI".to_string()));
        assert!(!jobs.contains(&"MOVE_PDF".to_string()));
        assert!(!jobs.contains(&"CONVERT_TO_BIBTEX".to_string()));
    }
}
