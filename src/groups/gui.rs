use super::{
    bind_bool, bind_double, bind_flags, bind_int, bind_string, bind_string_list, bind_with,
    derive_from_flags, Link, PreferenceGroup,
};
use crate::accessor::TypedStore;
use crate::keys::*;
use crate::list_codec;
use crate::observable::Property;
use crate::service::Shared;
use std::collections::BTreeSet;

named_enum! {
    /// Whether non-matching entries are hidden or only pushed down
    pub enum SearchDisplayMode {
        Filter => "FILTER",
        Float => "FLOAT",
    }
}

const SEARCH_DISPLAY_MODE_FLAGS: &[(&str, SearchDisplayMode)] =
    &[(SEARCH_DISPLAY_MODE, SearchDisplayMode::Filter)];

#[derive(Debug)]
pub struct SearchPreferences {
    pub display_mode: Property<SearchDisplayMode>,
    pub regular_expression: Property<bool>,
    pub case_sensitive: Property<bool>,
    pub fulltext: Property<bool>,
    pub keep_search_string: Property<bool>,
    pub keep_window_on_top: Property<bool>,
    pub window_height: Property<f64>,
    pub window_width: Property<f64>,
    pub window_divider_position: Property<f64>,
}

impl PreferenceGroup for SearchPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            display_mode: Property::new(derive_from_flags(
                shared,
                SEARCH_DISPLAY_MODE_FLAGS,
                SearchDisplayMode::Float,
            )),
            regular_expression: Property::new(store.get_bool(SEARCH_REG_EXP)),
            case_sensitive: Property::new(store.get_bool(SEARCH_CASE_SENSITIVE)),
            fulltext: Property::new(store.get_bool(SEARCH_FULLTEXT)),
            keep_search_string: Property::new(store.get_bool(SEARCH_KEEP_SEARCH_STRING)),
            keep_window_on_top: Property::new(store.get_bool(SEARCH_KEEP_GLOBAL_WINDOW_ON_TOP)),
            window_height: Property::new(store.get_double(SEARCH_WINDOW_HEIGHT)),
            window_width: Property::new(store.get_double(SEARCH_WINDOW_WIDTH)),
            window_divider_position: Property::new(store.get_double(SEARCH_WINDOW_DIVIDER_POS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_flags(&self.display_mode, link, SEARCH_DISPLAY_MODE_FLAGS);
        bind_bool(&self.regular_expression, link, SEARCH_REG_EXP);
        bind_bool(&self.case_sensitive, link, SEARCH_CASE_SENSITIVE);
        bind_bool(&self.fulltext, link, SEARCH_FULLTEXT);
        bind_bool(&self.keep_search_string, link, SEARCH_KEEP_SEARCH_STRING);
        bind_bool(&self.keep_window_on_top, link, SEARCH_KEEP_GLOBAL_WINDOW_ON_TOP);
        bind_double(&self.window_height, link, SEARCH_WINDOW_HEIGHT);
        bind_double(&self.window_width, link, SEARCH_WINDOW_WIDTH);
        bind_double(&self.window_divider_position, link, SEARCH_WINDOW_DIVIDER_POS);
    }
}

/// Office suite integration
#[derive(Debug)]
pub struct OpenOfficePreferences {
    pub executable_path: Property<String>,
    pub use_all_databases: Property<bool>,
    pub sync_when_citing: Property<bool>,
    pub external_styles: Property<Vec<String>>,
    pub bibliography_style_file: Property<String>,
    pub current_style: Property<String>,
    pub always_add_cited_on_pages: Property<bool>,
}

impl PreferenceGroup for OpenOfficePreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            executable_path: Property::new(store.get_string(OO_EXECUTABLE_PATH)),
            use_all_databases: Property::new(store.get_bool(OO_USE_ALL_OPEN_BASES)),
            sync_when_citing: Property::new(store.get_bool(OO_SYNC_WHEN_CITING)),
            external_styles: Property::new(store.get_string_list(OO_EXTERNAL_STYLE_FILES)),
            bibliography_style_file: Property::new(store.get_string(OO_BIBLIOGRAPHY_STYLE_FILE)),
            current_style: Property::new(store.get_string(OO_CURRENT_STYLE)),
            always_add_cited_on_pages: Property::new(store.get_bool(OO_ALWAYS_ADD_CITED_ON_PAGES)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string(&self.executable_path, link, OO_EXECUTABLE_PATH);
        bind_bool(&self.use_all_databases, link, OO_USE_ALL_OPEN_BASES);
        bind_bool(&self.sync_when_citing, link, OO_SYNC_WHEN_CITING);
        bind_string_list(&self.external_styles, link, OO_EXTERNAL_STYLE_FILES);
        bind_string(&self.bibliography_style_file, link, OO_BIBLIOGRAPHY_STYLE_FILE);
        bind_string(&self.current_style, link, OO_CURRENT_STYLE);
        bind_bool(&self.always_add_cited_on_pages, link, OO_ALWAYS_ADD_CITED_ON_PAGES);
    }
}

/// Main window geometry
///
/// Read with explicit fallbacks: a store written by a build without these keys
/// still yields a usable window.
#[derive(Debug)]
pub struct CoreGuiPreferences {
    pub position_x: Property<f64>,
    pub position_y: Property<f64>,
    pub width: Property<f64>,
    pub height: Property<f64>,
    pub maximised: Property<bool>,
    pub side_pane_width: Property<f64>,
    pub entry_editor_height: Property<f64>,
}

impl PreferenceGroup for CoreGuiPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            position_x: Property::new(store.get_double_or(MAIN_WINDOW_POS_X, 0.0)),
            position_y: Property::new(store.get_double_or(MAIN_WINDOW_POS_Y, 0.0)),
            width: Property::new(store.get_double_or(MAIN_WINDOW_WIDTH, 1024.0)),
            height: Property::new(store.get_double_or(MAIN_WINDOW_HEIGHT, 768.0)),
            maximised: Property::new(store.get_bool_or(MAIN_WINDOW_MAXIMISED, true)),
            side_pane_width: Property::new(store.get_double_or(MAIN_WINDOW_SIDEPANE_WIDTH, 0.15)),
            entry_editor_height: Property::new(store.get_double_or(MAIN_WINDOW_EDITOR_HEIGHT, 0.65)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_double(&self.position_x, link, MAIN_WINDOW_POS_X);
        bind_double(&self.position_y, link, MAIN_WINDOW_POS_Y);
        bind_double(&self.width, link, MAIN_WINDOW_WIDTH);
        bind_double(&self.height, link, MAIN_WINDOW_HEIGHT);
        bind_bool(&self.maximised, link, MAIN_WINDOW_MAXIMISED);
        bind_double(&self.side_pane_width, link, MAIN_WINDOW_SIDEPANE_WIDTH);
        bind_double(&self.entry_editor_height, link, MAIN_WINDOW_EDITOR_HEIGHT);
    }
}

#[derive(Debug)]
pub struct WorkspacePreferences {
    pub language: Property<String>,
    pub override_default_font_size: Property<bool>,
    pub main_font_size: Property<i32>,
    pub theme: Property<String>,
    pub theme_sync_os: Property<bool>,
    pub open_last_edited: Property<bool>,
    pub show_advanced_hints: Property<bool>,
    pub confirm_delete: Property<bool>,
    pub hide_tab_bar: Property<bool>,
    pub selected_slr_catalogs: Property<Vec<String>>,
}

impl PreferenceGroup for WorkspacePreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            language: Property::new(store.get_string(LANGUAGE)),
            override_default_font_size: Property::new(store.get_bool(OVERRIDE_DEFAULT_FONT_SIZE)),
            main_font_size: Property::new(store.get_int(MAIN_FONT_SIZE)),
            theme: Property::new(store.get_string(THEME)),
            theme_sync_os: Property::new(store.get_bool(THEME_SYNC_OS)),
            open_last_edited: Property::new(store.get_bool(OPEN_LAST_EDITED)),
            show_advanced_hints: Property::new(store.get_bool(SHOW_ADVANCED_HINTS)),
            confirm_delete: Property::new(store.get_bool(CONFIRM_DELETE)),
            hide_tab_bar: Property::new(store.get_bool(CONFIRM_HIDE_TAB_BAR)),
            selected_slr_catalogs: Property::new(store.get_string_list(SELECTED_SLR_CATALOGS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string(&self.language, link, LANGUAGE);
        bind_bool(&self.override_default_font_size, link, OVERRIDE_DEFAULT_FONT_SIZE);
        bind_int(&self.main_font_size, link, MAIN_FONT_SIZE);
        bind_string(&self.theme, link, THEME);
        bind_bool(&self.theme_sync_os, link, THEME_SYNC_OS);
        bind_bool(&self.open_last_edited, link, OPEN_LAST_EDITED);
        bind_bool(&self.show_advanced_hints, link, SHOW_ADVANCED_HINTS);
        bind_bool(&self.confirm_delete, link, CONFIRM_DELETE);
        bind_bool(&self.hide_tab_bar, link, CONFIRM_HIDE_TAB_BAR);
        bind_string_list(&self.selected_slr_catalogs, link, SELECTED_SLR_CATALOGS);
    }
}

named_enum! {
    /// Independent switches controlling how selected groups filter entries
    pub enum GroupViewMode {
        Intersection => "INTERSECTION",
        Filter => "FILTER",
        Invert => "INVERT",
    }
}

const GROUP_VIEW_MODE_FLAGS: &[(&str, GroupViewMode)] = &[
    (GROUP_VIEW_INTERSECTION, GroupViewMode::Intersection),
    (GROUP_VIEW_FILTER, GroupViewMode::Filter),
    (GROUP_VIEW_INVERT, GroupViewMode::Invert),
];

named_enum! {
    /// Which entries a subgroup draws from
    pub enum GroupHierarchyType {
        Independent => "INDEPENDENT",
        Refining => "REFINING",
        Including => "INCLUDING",
    }
}

#[derive(Debug)]
pub struct GroupsPreferences {
    pub view_mode: Property<BTreeSet<GroupViewMode>>,
    pub auto_assign_group: Property<bool>,
    pub display_group_count: Property<bool>,
    pub default_hierarchical_context: Property<GroupHierarchyType>,
}

impl PreferenceGroup for GroupsPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let view_mode = GROUP_VIEW_MODE_FLAGS
            .iter()
            .filter(|(key, _)| store.get_bool(key))
            .map(|(_, mode)| *mode)
            .collect();
        Self {
            view_mode: Property::new(view_mode),
            auto_assign_group: Property::new(store.get_bool(AUTO_ASSIGN_GROUP)),
            display_group_count: Property::new(store.get_bool(DISPLAY_GROUP_COUNT)),
            default_hierarchical_context: Property::new(GroupHierarchyType::parse_or(
                &store.get_string(DEFAULT_HIERARCHICAL_CONTEXT),
                GroupHierarchyType::Independent,
            )),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.view_mode, link, |s, modes| {
            for (key, mode) in GROUP_VIEW_MODE_FLAGS {
                s.store.put_bool(key, modes.contains(mode));
            }
        });
        bind_bool(&self.auto_assign_group, link, AUTO_ASSIGN_GROUP);
        bind_bool(&self.display_group_count, link, DISPLAY_GROUP_COUNT);
        bind_with(&self.default_hierarchical_context, link, |s, context| {
            s.store.put_string(DEFAULT_HIERARCHICAL_CONTEXT, context.name())
        });
    }
}

/// A named tab of the entry editor listing the fields it shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryEditorTab {
    pub name: String,
    pub fields: Vec<String>,
}

impl EntryEditorTab {
    pub fn new<S: AsRef<str>>(name: &str, fields: &[S]) -> Self {
        Self {
            name: name.to_string(),
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }
}

named_enum! {
    /// Whether the journal abbreviation popup is offered
    pub enum JournalPopup {
        FirstStart => "FIRST_START",
        Enabled => "ENABLED",
        Disabled => "DISABLED",
    }
}

/// Series read through the default table, so built-in series resolve too
fn read_series_with_defaults(store: &TypedStore, base: &str) -> Vec<String> {
    let mut values = Vec::new();
    while let Some(value) = store
        .get_optional(&format!("{base}{}", values.len()))
        .filter(|v| !v.trim().is_empty())
    {
        values.push(value);
    }
    values
}

fn zip_tabs(names: Vec<String>, fields: Vec<String>) -> Vec<EntryEditorTab> {
    names
        .into_iter()
        .zip(fields)
        .map(|(name, fields)| EntryEditorTab {
            name,
            fields: list_codec::decode(&fields),
        })
        .collect()
}

fn default_tabs(store: &TypedStore) -> Vec<EntryEditorTab> {
    zip_tabs(
        read_series_with_defaults(store, &format!("{CUSTOM_TAB_NAME}{DEFAULT_TAB_SUFFIX}")),
        read_series_with_defaults(store, &format!("{CUSTOM_TAB_FIELDS}{DEFAULT_TAB_SUFFIX}")),
    )
}

fn load_tabs(store: &TypedStore) -> Vec<EntryEditorTab> {
    let names = store.read_series(CUSTOM_TAB_NAME);
    let fields = store.read_series(CUSTOM_TAB_FIELDS);
    if names.is_empty() || names.len() != fields.len() {
        return default_tabs(store);
    }
    zip_tabs(names, fields)
}

fn store_tabs(store: &TypedStore, tabs: &[EntryEditorTab]) {
    let names: Vec<&str> = tabs.iter().map(|t| t.name.as_str()).collect();
    let fields: Vec<String> = tabs.iter().map(|t| list_codec::encode(&t.fields)).collect();
    store.write_series(CUSTOM_TAB_NAME, &names);
    store.write_series(CUSTOM_TAB_FIELDS, &fields);
}

#[derive(Debug)]
pub struct EntryEditorPreferences {
    pub entry_editor_tabs: Property<Vec<EntryEditorTab>>,
    /// Built-in tabs, used when no valid custom layout is stored
    pub default_entry_editor_tabs: Vec<EntryEditorTab>,
    pub auto_open_form: Property<bool>,
    pub show_recommendations: Property<bool>,
    pub show_latex_citations: Property<bool>,
    pub default_show_source: Property<bool>,
    pub validate_in_entry_editor: Property<bool>,
    pub allow_integer_edition_bibtex: Property<bool>,
    pub journal_popup: Property<JournalPopup>,
    pub show_scite_tab: Property<bool>,
    pub show_user_comments_fields: Property<bool>,
    pub preview_divider_position: Property<f64>,
}

impl PreferenceGroup for EntryEditorPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            entry_editor_tabs: Property::new(load_tabs(store)),
            default_entry_editor_tabs: default_tabs(store),
            auto_open_form: Property::new(store.get_bool(AUTO_OPEN_FORM)),
            show_recommendations: Property::new(store.get_bool(SHOW_RECOMMENDATIONS)),
            show_latex_citations: Property::new(store.get_bool(SHOW_LATEX_CITATIONS)),
            default_show_source: Property::new(store.get_bool(DEFAULT_SHOW_SOURCE)),
            validate_in_entry_editor: Property::new(store.get_bool(VALIDATE_IN_ENTRY_EDITOR)),
            allow_integer_edition_bibtex: Property::new(store.get_bool(ALLOW_INTEGER_EDITION_BIBTEX)),
            journal_popup: Property::new(JournalPopup::parse_or(
                &store.get_string(JOURNAL_POPUP),
                JournalPopup::FirstStart,
            )),
            show_scite_tab: Property::new(store.get_bool(SHOW_SCITE_TAB)),
            show_user_comments_fields: Property::new(store.get_bool(SHOW_USER_COMMENTS_FIELDS)),
            preview_divider_position: Property::new(
                store.get_double(ENTRY_EDITOR_PREVIEW_DIVIDER_POS),
            ),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.entry_editor_tabs, link, |s, tabs| store_tabs(&s.store, tabs));
        bind_bool(&self.auto_open_form, link, AUTO_OPEN_FORM);
        bind_bool(&self.show_recommendations, link, SHOW_RECOMMENDATIONS);
        bind_bool(&self.show_latex_citations, link, SHOW_LATEX_CITATIONS);
        bind_bool(&self.default_show_source, link, DEFAULT_SHOW_SOURCE);
        bind_bool(&self.validate_in_entry_editor, link, VALIDATE_IN_ENTRY_EDITOR);
        bind_bool(&self.allow_integer_edition_bibtex, link, ALLOW_INTEGER_EDITION_BIBTEX);
        bind_with(&self.journal_popup, link, |s, popup| {
            s.store.put_string(JOURNAL_POPUP, popup.name())
        });
        bind_bool(&self.show_scite_tab, link, SHOW_SCITE_TAB);
        bind_bool(&self.show_user_comments_fields, link, SHOW_USER_COMMENTS_FIELDS);
        bind_double(&self.preview_divider_position, link, ENTRY_EDITOR_PREVIEW_DIVIDER_POS);
    }
}

/// Layout name used when no preview cycle is stored
pub const DEFAULT_PREVIEW_LAYOUT: &str = "Preview";

#[derive(Debug)]
pub struct PreviewPreferences {
    /// Layouts cycled through in the entry preview; never empty
    pub layout_cycle: Property<Vec<String>>,
    pub layout_cycle_position: Property<i32>,
    pub custom_preview_layout: Property<String>,
    pub show_preview_as_extra_tab: Property<bool>,
    pub show_preview_entry_table_tooltip: Property<bool>,
    pub bst_layout_paths: Property<Vec<String>>,
}

impl PreferenceGroup for PreviewPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let mut cycle = store.get_string_list(CYCLE_PREVIEW);
        if cycle.is_empty() {
            cycle.push(DEFAULT_PREVIEW_LAYOUT.to_string());
        }
        let position = store.get_int(CYCLE_PREVIEW_POS);
        let position = if position < 0 || position as usize >= cycle.len() {
            0
        } else {
            position
        };

        Self {
            layout_cycle: Property::new(cycle),
            layout_cycle_position: Property::new(position),
            custom_preview_layout: Property::new(store.get_string(PREVIEW_STYLE)),
            show_preview_as_extra_tab: Property::new(store.get_bool(PREVIEW_AS_TAB)),
            show_preview_entry_table_tooltip: Property::new(
                store.get_bool(PREVIEW_IN_ENTRY_TABLE_TOOLTIP),
            ),
            bst_layout_paths: Property::new(store.get_string_list(PREVIEW_BST_LAYOUT_PATHS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string_list(&self.layout_cycle, link, CYCLE_PREVIEW);
        bind_int(&self.layout_cycle_position, link, CYCLE_PREVIEW_POS);
        bind_string(&self.custom_preview_layout, link, PREVIEW_STYLE);
        bind_bool(&self.show_preview_as_extra_tab, link, PREVIEW_AS_TAB);
        bind_bool(
            &self.show_preview_entry_table_tooltip,
            link,
            PREVIEW_IN_ENTRY_TABLE_TOOLTIP,
        );
        bind_string_list(&self.bst_layout_paths, link, PREVIEW_BST_LAYOUT_PATHS);
    }
}

named_enum! {
    pub enum AutoCompleteFirstNameMode {
        OnlyFull => "ONLY_FULL",
        OnlyAbbreviated => "ONLY_ABBR",
        Both => "BOTH",
    }
}

named_enum! {
    /// Name order offered by the author completer
    pub enum NameFormat {
        LastFirst => "LAST_FIRST",
        FirstLast => "FIRST_LAST",
        Both => "BOTH",
    }
}

const NAME_FORMAT_FLAGS: &[(&str, NameFormat)] = &[
    (AUTOCOMPLETER_LAST_FIRST, NameFormat::LastFirst),
    (AUTOCOMPLETER_FIRST_LAST, NameFormat::FirstLast),
];

#[derive(Debug)]
pub struct AutoCompletePreferences {
    pub enabled: Property<bool>,
    pub first_name_mode: Property<AutoCompleteFirstNameMode>,
    pub name_format: Property<NameFormat>,
    pub complete_fields: Property<Vec<String>>,
}

impl PreferenceGroup for AutoCompletePreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            enabled: Property::new(store.get_bool(AUTO_COMPLETE)),
            first_name_mode: Property::new(AutoCompleteFirstNameMode::parse_or(
                &store.get_string(AUTOCOMPLETER_FIRSTNAME_MODE),
                AutoCompleteFirstNameMode::Both,
            )),
            name_format: Property::new(derive_from_flags(shared, NAME_FORMAT_FLAGS, NameFormat::Both)),
            complete_fields: Property::new(store.get_string_list(AUTOCOMPLETER_COMPLETE_FIELDS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.enabled, link, AUTO_COMPLETE);
        bind_with(&self.first_name_mode, link, |s, mode| {
            s.store.put_string(AUTOCOMPLETER_FIRSTNAME_MODE, mode.name())
        });
        bind_flags(&self.name_format, link, NAME_FORMAT_FLAGS);
        bind_string_list(&self.complete_fields, link, AUTOCOMPLETER_COMPLETE_FIELDS);
    }
}

/// Helper programs launched for linked files and e-mail
#[derive(Debug)]
pub struct ExternalApplicationsPreferences {
    pub email_subject: Property<String>,
    pub auto_open_attachment_folders: Property<bool>,
    pub external_file_types: Property<String>,
    /// Stored inverted, as `useDefaultConsoleApplication`
    pub use_custom_terminal: Property<bool>,
    pub custom_terminal_command: Property<String>,
    /// Stored inverted, as `userDefaultFileBrowserApplication`
    pub use_custom_file_browser: Property<bool>,
    pub custom_file_browser_command: Property<String>,
    pub kindle_email: Property<String>,
}

impl PreferenceGroup for ExternalApplicationsPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            email_subject: Property::new(store.get_string(EMAIL_SUBJECT)),
            auto_open_attachment_folders: Property::new(
                store.get_bool(OPEN_FOLDERS_OF_ATTACHED_FILES),
            ),
            external_file_types: Property::new(store.get_string(EXTERNAL_FILE_TYPES)),
            use_custom_terminal: Property::new(!store.get_bool(USE_DEFAULT_CONSOLE_APPLICATION)),
            custom_terminal_command: Property::new(store.get_string(CONSOLE_COMMAND)),
            use_custom_file_browser: Property::new(
                !store.get_bool(USE_DEFAULT_FILE_BROWSER_APPLICATION),
            ),
            custom_file_browser_command: Property::new(store.get_string(FILE_BROWSER_COMMAND)),
            kindle_email: Property::new(store.get_string(KINDLE_EMAIL)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string(&self.email_subject, link, EMAIL_SUBJECT);
        bind_bool(
            &self.auto_open_attachment_folders,
            link,
            OPEN_FOLDERS_OF_ATTACHED_FILES,
        );
        bind_string(&self.external_file_types, link, EXTERNAL_FILE_TYPES);
        bind_with(&self.use_custom_terminal, link, |s, custom| {
            s.store.put_bool(USE_DEFAULT_CONSOLE_APPLICATION, !custom)
        });
        bind_string(&self.custom_terminal_command, link, CONSOLE_COMMAND);
        bind_with(&self.use_custom_file_browser, link, |s, custom| {
            s.store.put_bool(USE_DEFAULT_FILE_BROWSER_APPLICATION, !custom)
        });
        bind_string(&self.custom_file_browser_command, link, FILE_BROWSER_COMMAND);
        bind_string(&self.kindle_email, link, KINDLE_EMAIL);
    }
}

named_enum! {
    pub enum DiffMode {
        Word => "WORD",
        Character => "CHARACTER",
    }
}

#[derive(Debug)]
pub struct MergeDialogPreferences {
    pub diff_mode: Property<DiffMode>,
    pub show_diff: Property<bool>,
    pub show_unified_diff: Property<bool>,
    pub highlight_words: Property<bool>,
    pub show_only_changed_fields: Property<bool>,
    pub apply_to_all_entries: Property<bool>,
}

impl PreferenceGroup for MergeDialogPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            diff_mode: Property::new(DiffMode::parse_or(
                &store.get_string(MERGE_ENTRIES_DIFF_MODE),
                DiffMode::Word,
            )),
            show_diff: Property::new(store.get_bool(MERGE_ENTRIES_SHOULD_SHOW_DIFF)),
            show_unified_diff: Property::new(store.get_bool(MERGE_ENTRIES_SHOULD_SHOW_UNIFIED_DIFF)),
            highlight_words: Property::new(store.get_bool(MERGE_ENTRIES_HIGHLIGHT_WORDS)),
            show_only_changed_fields: Property::new(store.get_bool(MERGE_SHOW_ONLY_CHANGED_FIELDS)),
            apply_to_all_entries: Property::new(store.get_bool(MERGE_APPLY_TO_ALL_ENTRIES)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.diff_mode, link, |s, mode| {
            s.store.put_string(MERGE_ENTRIES_DIFF_MODE, mode.name())
        });
        bind_bool(&self.show_diff, link, MERGE_ENTRIES_SHOULD_SHOW_DIFF);
        bind_bool(&self.show_unified_diff, link, MERGE_ENTRIES_SHOULD_SHOW_UNIFIED_DIFF);
        bind_bool(&self.highlight_words, link, MERGE_ENTRIES_HIGHLIGHT_WORDS);
        bind_bool(&self.show_only_changed_fields, link, MERGE_SHOW_ONLY_CHANGED_FIELDS);
        bind_bool(&self.apply_to_all_entries, link, MERGE_APPLY_TO_ALL_ENTRIES);
    }
}

#[derive(Debug)]
pub struct SpecialFieldsPreferences {
    pub special_fields_enabled: Property<bool>,
}

impl PreferenceGroup for SpecialFieldsPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            special_fields_enabled: Property::new(shared.store.get_bool(SPECIAL_FIELDS_ENABLED)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.special_fields_enabled, link, SPECIAL_FIELDS_ENABLED);
    }
}

/// Copying entries between libraries
#[derive(Debug)]
pub struct CopyToPreferences {
    pub ask_for_including_cross_references: Property<bool>,
    pub include_cross_references: Property<bool>,
}

impl PreferenceGroup for CopyToPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            ask_for_including_cross_references: Property::new(
                shared.store.get_bool(ASK_FOR_INCLUDING_CROSS_REFERENCES),
            ),
            include_cross_references: Property::new(shared.store.get_bool(INCLUDE_CROSS_REFERENCES)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(
            &self.ask_for_including_cross_references,
            link,
            ASK_FOR_INCLUDING_CROSS_REFERENCES,
        );
        bind_bool(&self.include_cross_references, link, INCLUDE_CROSS_REFERENCES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::testing::Fixture;

    #[test]
    fn test_search_display_mode_from_flag() {
        let fx = Fixture::new();
        assert_eq!(fx.prefs.search().display_mode.get(), SearchDisplayMode::Filter);
        fx.prefs.search().display_mode.set(SearchDisplayMode::Float);
        assert!(!fx.prefs.store().get_bool(SEARCH_DISPLAY_MODE));
        assert_eq!(fx.reopen().search().display_mode.get(), SearchDisplayMode::Float);
    }

    #[test]
    fn test_core_gui_uses_fallbacks() {
        let fx = Fixture::new();
        fx.prefs.store().put_string(MAIN_WINDOW_WIDTH, "not a number");
        let gui = fx.prefs.core_gui();
        assert_eq!(gui.width.get(), 1024.0);
        gui.width.set(1280.0);
        assert_eq!(fx.reopen().core_gui().width.get(), 1280.0);
    }

    #[test]
    fn test_font_size_survives_rebuild() {
        let fx = Fixture::new();
        assert_eq!(fx.prefs.workspace().main_font_size.get(), 9);
        fx.prefs.workspace().main_font_size.set(14);
        assert_eq!(fx.reopen().workspace().main_font_size.get(), 14);
    }

    #[test]
    fn test_group_view_mode_flags() {
        let fx = Fixture::new();
        let groups = fx.prefs.groups();
        assert_eq!(
            groups.view_mode.get(),
            BTreeSet::from([GroupViewMode::Intersection, GroupViewMode::Filter])
        );
        groups
            .view_mode
            .set(BTreeSet::from([GroupViewMode::Invert]));
        let store = fx.prefs.store();
        assert!(!store.get_bool(GROUP_VIEW_INTERSECTION));
        assert!(!store.get_bool(GROUP_VIEW_FILTER));
        assert!(store.get_bool(GROUP_VIEW_INVERT));
    }

    #[test]
    fn test_invalid_hierarchy_falls_back() {
        let fx = Fixture::new();
        fx.prefs
            .store()
            .put_string(DEFAULT_HIERARCHICAL_CONTEXT, "SIDEWAYS");
        assert_eq!(
            fx.prefs.groups().default_hierarchical_context.get(),
            GroupHierarchyType::Independent
        );
        fx.prefs
            .groups()
            .default_hierarchical_context
            .set(GroupHierarchyType::Refining);
        assert_eq!(
            fx.prefs.store().get_string(DEFAULT_HIERARCHICAL_CONTEXT),
            "REFINING"
        );
    }

    #[test]
    fn test_entry_editor_tabs_fall_back_to_defaults() {
        let fx = Fixture::new();
        let editor = fx.prefs.entry_editor();
        let tabs = editor.entry_editor_tabs.get();
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].name, "General");
        assert_eq!(tabs[1], EntryEditorTab::new("Abstract", &["abstract"]));
        assert_eq!(editor.default_entry_editor_tabs, tabs);

        // mismatched series lengths count as a broken layout
        let store = fx.prefs.store();
        store.put_string("customTabName_0", "Mine");
        store.put_string("customTabName_1", "Other");
        store.put_string("customTabFields_0", "title");
        assert_eq!(fx.reopen().entry_editor().entry_editor_tabs.get(), tabs);
    }

    #[test]
    fn test_entry_editor_tabs_write_and_purge() {
        let fx = Fixture::new();
        let editor = fx.prefs.entry_editor();
        editor.entry_editor_tabs.set(vec![
            EntryEditorTab::new("Mine", &["title", "year"]),
            EntryEditorTab::new("Notes", &["comment"]),
        ]);
        editor
            .entry_editor_tabs
            .set(vec![EntryEditorTab::new("Mine", &["title"])]);

        let store = fx.prefs.store();
        assert!(!store.has_key("customTabName_1"));
        assert!(!store.has_key("customTabFields_1"));
        assert_eq!(
            fx.reopen().entry_editor().entry_editor_tabs.get(),
            vec![EntryEditorTab::new("Mine", &["title"])]
        );
    }

    #[test]
    fn test_preview_position_clamped() {
        let fx = Fixture::new();
        let store = fx.prefs.store();
        store.put_int(CYCLE_PREVIEW_POS, 5);
        assert_eq!(fx.prefs.preview().layout_cycle_position.get(), 0);

        store.put_string(CYCLE_PREVIEW, "");
        store.put_int(CYCLE_PREVIEW_POS, 0);
        assert_eq!(
            fx.reopen().preview().layout_cycle.get(),
            vec![DEFAULT_PREVIEW_LAYOUT.to_string()]
        );
    }

    #[test]
    fn test_name_format_priority() {
        let fx = Fixture::new();
        assert_eq!(fx.prefs.auto_complete().name_format.get(), NameFormat::Both);
        let store = fx.prefs.store();
        store.put_bool(AUTOCOMPLETER_FIRST_LAST, true);
        assert_eq!(fx.reopen().auto_complete().name_format.get(), NameFormat::FirstLast);
        store.put_bool(AUTOCOMPLETER_LAST_FIRST, true);
        assert_eq!(fx.reopen().auto_complete().name_format.get(), NameFormat::LastFirst);

        fx.reopen().auto_complete().name_format.set(NameFormat::Both);
        assert!(!store.get_bool(AUTOCOMPLETER_FIRST_LAST));
        assert!(!store.get_bool(AUTOCOMPLETER_LAST_FIRST));
    }

    #[test]
    fn test_custom_terminal_is_stored_inverted() {
        let fx = Fixture::new();
        let apps = fx.prefs.external_applications();
        assert!(!apps.use_custom_terminal.get());
        apps.use_custom_terminal.set(true);
        apps.use_custom_file_browser.set(true);
        let store = fx.prefs.store();
        assert!(!store.get_bool(USE_DEFAULT_CONSOLE_APPLICATION));
        assert!(!store.get_bool(USE_DEFAULT_FILE_BROWSER_APPLICATION));
    }
}
