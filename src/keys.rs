//! Preference key names
//!
//! The names are part of the on-disk format and must stay stable across
//! releases; stores written by older versions are read with the same keys.

// Library
pub const BIBLATEX_DEFAULT_MODE: &str = "biblatexMode";
pub const REFORMAT_FILE_ON_SAVE_AND_EXPORT: &str = "reformatFileOnSaveAndExport";
pub const LOCAL_AUTO_SAVE: &str = "localAutoSave";

// DOI
pub const USE_CUSTOM_DOI_URI: &str = "useCustomDOIURI";
pub const BASE_DOI_URI: &str = "baseDOIURI";

// Owner and timestamp
pub const USE_OWNER: &str = "useOwner";
pub const DEFAULT_OWNER: &str = "defaultOwner";
pub const OVERWRITE_OWNER: &str = "overwriteOwner";
pub const ADD_CREATION_DATE: &str = "addCreationDate";
pub const ADD_MODIFICATION_DATE: &str = "addModificationDate";
pub const UPDATE_TIMESTAMP: &str = "updateTimestamp";
pub const TIME_STAMP_FIELD: &str = "timeStampField";
pub const TIME_STAMP_FORMAT: &str = "timeStampFormat";

// Network
pub const USE_REMOTE_SERVER: &str = "useRemoteServer";
pub const REMOTE_SERVER_PORT: &str = "remoteServerPort";
pub const PROXY_USE: &str = "useProxy";
pub const PROXY_HOSTNAME: &str = "proxyHostname";
pub const PROXY_PORT: &str = "proxyPort";
pub const PROXY_USE_AUTHENTICATION: &str = "useProxyAuthentication";
pub const PROXY_USERNAME: &str = "proxyUsername";
pub const PROXY_PASSWORD: &str = "proxyPassword";
pub const PROXY_PERSIST_PASSWORD: &str = "persistPassword";
pub const TRUSTSTORE_PATH: &str = "truststorePath";

// Citation keys
pub const AVOID_OVERWRITING_KEY: &str = "avoidOverwritingKey";
pub const WARN_BEFORE_OVERWRITING_KEY: &str = "warnBeforeOverwritingKey";
pub const GENERATE_KEYS_BEFORE_SAVING: &str = "generateKeysBeforeSaving";
pub const KEY_GEN_ALWAYS_ADD_LETTER: &str = "keyGenAlwaysAddLetter";
pub const KEY_GEN_FIRST_LETTER_A: &str = "keyGenFirstLetterA";
pub const KEY_PATTERN_REGEX: &str = "KeyPatternRegex";
pub const KEY_PATTERN_REPLACEMENT: &str = "KeyPatternReplacement";
pub const UNWANTED_CITATION_KEY_CHARACTERS: &str = "defaultUnwantedBibtexKeyCharacters";
pub const DEFAULT_CITATION_KEY_PATTERN: &str = "defaultBibtexKeyPattern";
/// Child node holding per-entry-type citation key patterns
pub const CITATION_KEY_PATTERNS_NODE: &str = "bibtexkeypatterns";

// Bib entry and fields
pub const KEYWORD_SEPARATOR: &str = "groupKeywordSeparator";
pub const DO_NOT_RESOLVE_STRINGS: &str = "doNotResolveStrings";
pub const RESOLVE_STRINGS_FOR_FIELDS: &str = "resolveStringsForFields";
pub const NON_WRAPPABLE_FIELDS: &str = "nonWrappableFields";

// Internal
pub const VERSION_IGNORED_UPDATE: &str = "versionIgnoreUpdate";
pub const VERSION_CHECK_ENABLED: &str = "versionCheck";
pub const PREFS_EXPORT_PATH: &str = "prefsExportPath";
pub const MEMORY_STICK_MODE: &str = "memoryStickMode";

// Linked files
pub const MAIN_FILE_DIRECTORY: &str = "fileDirectory";
pub const STORE_RELATIVE_TO_BIB: &str = "bibLocAsPrimaryDir";
pub const IMPORT_FILENAMEPATTERN: &str = "importFileNamePattern";
pub const IMPORT_FILEDIRPATTERN: &str = "importFileDirPattern";
pub const DOWNLOAD_LINKED_FILES: &str = "downloadLinkedFiles";
pub const FULLTEXT_INDEX_LINKED_FILES: &str = "fulltextIndexLinkedFiles";
pub const WORKING_DIRECTORY: &str = "workingDirectory";
pub const CREATE_BACKUP: &str = "createBackup";
pub const BACKUP_DIRECTORY: &str = "backupDirectory";
pub const CONFIRM_LINKED_FILE_DELETE: &str = "confirmLinkedFileDelete";
pub const TRASH_INSTEAD_OF_DELETE: &str = "trashInsteadOfDelete";
pub const KEEP_DOWNLOAD_URL: &str = "keepDownloadUrl";

// Auto link
pub const AUTOLINK_EXACT_KEY_ONLY: &str = "autolinkExactKeyOnly";
pub const AUTOLINK_USE_REG_EXP_SEARCH_KEY: &str = "useRegExpSearch";
pub const AUTOLINK_REG_EXP_SEARCH_EXPRESSION_KEY: &str = "regExpSearchExpression";
pub const ASK_AUTO_NAMING_PDFS_AGAIN: &str = "AskAutoNamingPDFsAgain";
pub const AUTOLINK_FILES_ENABLED: &str = "autoLinkFilesEnabled";

// Export
pub const LAST_USED_EXPORT: &str = "lastUsedExport";
pub const EXPORT_WORKING_DIRECTORY: &str = "exportWorkingDirectory";
pub const EXPORT_IN_ORIGINAL_ORDER: &str = "exportInOriginalOrder";
pub const EXPORT_IN_SPECIFIED_ORDER: &str = "exportInSpecifiedOrder";
pub const EXPORT_PRIMARY_SORT_FIELD: &str = "exportPriSort";
pub const EXPORT_PRIMARY_SORT_DESCENDING: &str = "exportPriDescending";
pub const EXPORT_SECONDARY_SORT_FIELD: &str = "exportSecSort";
pub const EXPORT_SECONDARY_SORT_DESCENDING: &str = "exportSecDescending";
pub const EXPORT_TERTIARY_SORT_FIELD: &str = "exportTerSort";
pub const EXPORT_TERTIARY_SORT_DESCENDING: &str = "exportTerDescending";
pub const CUSTOM_EXPORT_FORMAT: &str = "customExportFormat";

// Cleanup
pub const CLEANUP_JOBS: &str = "CleanUpJobs";
pub const CLEANUP_FIELD_FORMATTERS_ENABLED: &str = "CleanUpFormattersEnabled";
pub const CLEANUP_FIELD_FORMATTERS: &str = "CleanUpFormatters";

// Last files opened
pub const LAST_EDITED: &str = "lastEdited";
pub const LAST_FOCUSED: &str = "lastFocused";
pub const RECENT_DATABASES: &str = "recentDatabases";

// Importer
pub const IMPORTERS_ENABLED: &str = "importersEnabled";
pub const GENERATE_KEY_ON_IMPORT: &str = "generateKeyOnImport";
pub const IMPORT_WORKING_DIRECTORY: &str = "importWorkingDirectory";
pub const WARN_ABOUT_DUPLICATES_IN_INSPECTION: &str = "warnAboutDuplicatesInInspection";
pub const CUSTOM_IMPORT_FORMAT: &str = "customImportFormat";
pub const FETCHER_CUSTOM_KEY_NAMES: &str = "fetcherCustomKeyNames";
pub const FETCHER_CUSTOM_KEY_USES: &str = "fetcherCustomKeyUses";
pub const FETCHER_CUSTOM_KEY_PERSIST: &str = "fetcherCustomKeyPersist";
pub const SEARCH_CATALOGS: &str = "searchCatalogs";
pub const DEFAULT_PLAIN_CITATION_PARSER: &str = "defaultPlainCitationParser";

// Grobid
pub const GROBID_ENABLED: &str = "grobidEnabled";
pub const GROBID_OPT_OUT: &str = "grobidOptOut";
pub const GROBID_URL: &str = "grobidURL";

// Journal abbreviations and protected terms
pub const EXTERNAL_JOURNAL_LISTS: &str = "externalJournalLists";
pub const USE_AMS_FJOURNAL: &str = "useAMSFJournal";
pub const PROTECTED_TERMS_ENABLED_EXTERNAL: &str = "protectedTermsEnabledExternal";
pub const PROTECTED_TERMS_DISABLED_EXTERNAL: &str = "protectedTermsDisabledExternal";
pub const PROTECTED_TERMS_ENABLED_INTERNAL: &str = "protectedTermsEnabledInternal";
pub const PROTECTED_TERMS_DISABLED_INTERNAL: &str = "protectedTermsDisabledInternal";

// XMP
pub const USE_XMP_PRIVACY_FILTER: &str = "useXmpPrivacyFilter";
pub const XMP_PRIVACY_FILTERS: &str = "xmpPrivacyFilters";

// Search
pub const SEARCH_DISPLAY_MODE: &str = "searchDisplayMode";
pub const SEARCH_CASE_SENSITIVE: &str = "caseSensitiveSearch";
pub const SEARCH_REG_EXP: &str = "regExpSearch";
pub const SEARCH_FULLTEXT: &str = "fulltextSearch";
pub const SEARCH_KEEP_SEARCH_STRING: &str = "keepSearchString";
pub const SEARCH_KEEP_GLOBAL_WINDOW_ON_TOP: &str = "keepOnTop";
pub const SEARCH_WINDOW_HEIGHT: &str = "searchWindowHeight";
pub const SEARCH_WINDOW_WIDTH: &str = "searchWindowWidth";
pub const SEARCH_WINDOW_DIVIDER_POS: &str = "searchWindowDividerPos";

// OpenOffice
pub const OO_EXECUTABLE_PATH: &str = "ooExecutablePath";
pub const OO_USE_ALL_OPEN_BASES: &str = "useAllOpenBases";
pub const OO_SYNC_WHEN_CITING: &str = "syncOOWhenCiting";
pub const OO_EXTERNAL_STYLE_FILES: &str = "ooExternalStyleFiles";
pub const OO_BIBLIOGRAPHY_STYLE_FILE: &str = "ooBibliographyStyleFile";
pub const OO_CURRENT_STYLE: &str = "ooCurrentStyle";
pub const OO_ALWAYS_ADD_CITED_ON_PAGES: &str = "ooAlwaysAddCitedOnPages";

// Name display
pub const NAMES_LAST_ONLY: &str = "namesLastOnly";
pub const ABBR_AUTHOR_NAMES: &str = "abbrAuthorNames";
pub const NAMES_NATBIB: &str = "namesNatbib";
pub const NAMES_FIRST_LAST: &str = "namesFf";
pub const NAMES_AS_IS: &str = "namesAsIs";

// Main table and search dialog columns
pub const AUTO_RESIZE_MODE: &str = "autoResizeMode";
pub const EXTRA_FILE_COLUMNS: &str = "extraFileColumns";
pub const COLUMN_NAMES: &str = "mainTableColumnNames";
pub const COLUMN_WIDTHS: &str = "mainTableColumnWidths";
pub const COLUMN_SORT_TYPES: &str = "mainTableColumnSortTypes";
pub const COLUMN_SORT_ORDER: &str = "mainTableColumnSortOrder";
pub const SEARCH_DIALOG_COLUMN_WIDTHS: &str = "searchTableColumnWidths";
pub const SEARCH_DIALOG_COLUMN_SORT_TYPES: &str = "searchDialogColumnSortTypes";
pub const SEARCH_DIALOG_COLUMN_SORT_ORDER: &str = "searchDalogColumnSortOrder";

// Core GUI
pub const MAIN_WINDOW_POS_X: &str = "mainWindowPosX";
pub const MAIN_WINDOW_POS_Y: &str = "mainWindowPosY";
pub const MAIN_WINDOW_WIDTH: &str = "mainWindowSizeX";
pub const MAIN_WINDOW_HEIGHT: &str = "mainWindowSizeY";
pub const MAIN_WINDOW_MAXIMISED: &str = "windowMaximised";
pub const MAIN_WINDOW_SIDEPANE_WIDTH: &str = "sidePaneWidthFX";
pub const MAIN_WINDOW_EDITOR_HEIGHT: &str = "entryEditorHeightFX";

// Workspace
pub const LANGUAGE: &str = "language";
pub const OVERRIDE_DEFAULT_FONT_SIZE: &str = "overrideDefaultFontSize";
pub const MAIN_FONT_SIZE: &str = "mainFontSize";
pub const THEME: &str = "fxTheme";
pub const THEME_SYNC_OS: &str = "themeSyncOs";
pub const OPEN_LAST_EDITED: &str = "openLastEdited";
pub const SHOW_ADVANCED_HINTS: &str = "showAdvancedHints";
pub const CONFIRM_DELETE: &str = "confirmDelete";
pub const CONFIRM_HIDE_TAB_BAR: &str = "confirmHideTabBar";
pub const SELECTED_SLR_CATALOGS: &str = "selectedSlrCatalogs";

// Groups
pub const GROUP_VIEW_INTERSECTION: &str = "groupIntersection";
pub const GROUP_VIEW_FILTER: &str = "groupFilter";
pub const GROUP_VIEW_INVERT: &str = "groupInvert";
pub const AUTO_ASSIGN_GROUP: &str = "autoAssignGroup";
pub const DISPLAY_GROUP_COUNT: &str = "displayGroupCount";
pub const DEFAULT_HIERARCHICAL_CONTEXT: &str = "defaultHierarchicalContext";

// Preview
pub const CYCLE_PREVIEW: &str = "cyclePreview";
pub const CYCLE_PREVIEW_POS: &str = "cyclePreviewPos";
pub const PREVIEW_STYLE: &str = "previewStyle";
pub const PREVIEW_AS_TAB: &str = "previewAsTab";
pub const PREVIEW_IN_ENTRY_TABLE_TOOLTIP: &str = "previewInEntryTableTooltip";
pub const PREVIEW_BST_LAYOUT_PATHS: &str = "previewBstLayoutPaths";

// Entry editor
pub const CUSTOM_TAB_NAME: &str = "customTabName_";
pub const CUSTOM_TAB_FIELDS: &str = "customTabFields_";
/// Suffix appended to the tab series bases for the built-in fallback tabs
pub const DEFAULT_TAB_SUFFIX: &str = "_def";
pub const AUTO_OPEN_FORM: &str = "autoOpenForm";
pub const SHOW_RECOMMENDATIONS: &str = "showRecommendations";
pub const SHOW_LATEX_CITATIONS: &str = "showLatexCitations";
pub const DEFAULT_SHOW_SOURCE: &str = "defaultShowSource";
pub const VALIDATE_IN_ENTRY_EDITOR: &str = "validateInEntryEditor";
pub const ALLOW_INTEGER_EDITION_BIBTEX: &str = "allowIntegerEditionBibtex";
pub const JOURNAL_POPUP: &str = "journalPopup";
pub const SHOW_SCITE_TAB: &str = "showSciteTab";
pub const SHOW_USER_COMMENTS_FIELDS: &str = "showUserCommentsFields";
pub const ENTRY_EDITOR_PREVIEW_DIVIDER_POS: &str = "entryEditorPreviewDividerPos";

// Auto complete
pub const AUTO_COMPLETE: &str = "autoComplete";
pub const AUTOCOMPLETER_FIRSTNAME_MODE: &str = "autoCompFirstNameMode";
pub const AUTOCOMPLETER_LAST_FIRST: &str = "autoCompLF";
pub const AUTOCOMPLETER_FIRST_LAST: &str = "autoCompFF";
pub const AUTOCOMPLETER_COMPLETE_FIELDS: &str = "autoCompleteFields";

// External applications
pub const EMAIL_SUBJECT: &str = "emailSubject";
pub const OPEN_FOLDERS_OF_ATTACHED_FILES: &str = "openFoldersOfAttachedFiles";
pub const EXTERNAL_FILE_TYPES: &str = "externalFileTypes";
pub const USE_DEFAULT_CONSOLE_APPLICATION: &str = "useDefaultConsoleApplication";
pub const CONSOLE_COMMAND: &str = "consoleCommand";
pub const USE_DEFAULT_FILE_BROWSER_APPLICATION: &str = "userDefaultFileBrowserApplication";
pub const FILE_BROWSER_COMMAND: &str = "fileBrowserCommand";
pub const KINDLE_EMAIL: &str = "kindleEmail";

// Merge dialog
pub const MERGE_ENTRIES_DIFF_MODE: &str = "mergeEntriesDiffMode";
pub const MERGE_ENTRIES_SHOULD_SHOW_DIFF: &str = "mergeEntriesShouldShowDiff";
pub const MERGE_ENTRIES_SHOULD_SHOW_UNIFIED_DIFF: &str = "mergeEntriesShouldShowUnifiedDiff";
pub const MERGE_ENTRIES_HIGHLIGHT_WORDS: &str = "mergeEntriesHighlightWords";
pub const MERGE_SHOW_ONLY_CHANGED_FIELDS: &str = "mergeShowOnlyChangedFields";
pub const MERGE_APPLY_TO_ALL_ENTRIES: &str = "mergeApplyToAllEntries";

// Special fields and copy-to
pub const SPECIAL_FIELDS_ENABLED: &str = "specialFieldsEnabled";
pub const ASK_FOR_INCLUDING_CROSS_REFERENCES: &str = "askForIncludingCrossReferences";
pub const INCLUDE_CROSS_REFERENCES: &str = "includeCrossReferences";

/// Vault service holding the proxy password
pub const PROXY_SECRET_NAMESPACE: &str = "org.jabref";
/// Vault account of the proxy password
pub const PROXY_SECRET_ACCOUNT: &str = "proxy";
/// Vault service holding fetcher API keys, one account per fetcher name
pub const FETCHER_SECRET_NAMESPACE: &str = "org.jabref.customapikeys";
