use super::{bind_bool, bind_flags, bind_with, derive_from_flags, Link, PreferenceGroup};
use crate::accessor::TypedStore;
use crate::keys::*;
use crate::observable::Property;
use crate::service::Shared;
use tracing::warn;

named_enum! {
    /// How author lists are rendered in the main table
    pub enum DisplayStyle {
        Natbib => "NATBIB",
        AsIs => "AS_IS",
        FirstnameLastname => "FIRSTNAME_LASTNAME",
        LastnameFirstname => "LASTNAME_FIRSTNAME",
    }
}

named_enum! {
    pub enum AbbreviationStyle {
        None => "NONE",
        LastnameOnly => "LASTNAME_ONLY",
        Full => "FULL",
    }
}

const DISPLAY_STYLE_FLAGS: &[(&str, DisplayStyle)] = &[
    (NAMES_NATBIB, DisplayStyle::Natbib),
    (NAMES_AS_IS, DisplayStyle::AsIs),
    (NAMES_FIRST_LAST, DisplayStyle::FirstnameLastname),
];

const ABBREVIATION_STYLE_FLAGS: &[(&str, AbbreviationStyle)] = &[
    (ABBR_AUTHOR_NAMES, AbbreviationStyle::Full),
    (NAMES_LAST_ONLY, AbbreviationStyle::LastnameOnly),
];

#[derive(Debug)]
pub struct NameDisplayPreferences {
    pub display_style: Property<DisplayStyle>,
    pub abbreviation_style: Property<AbbreviationStyle>,
}

impl PreferenceGroup for NameDisplayPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            display_style: Property::new(derive_from_flags(
                shared,
                DISPLAY_STYLE_FLAGS,
                DisplayStyle::LastnameFirstname,
            )),
            abbreviation_style: Property::new(derive_from_flags(
                shared,
                ABBREVIATION_STYLE_FLAGS,
                AbbreviationStyle::None,
            )),
        }
    }

    fn bind(&self, link: &Link) {
        bind_flags(&self.display_style, link, DISPLAY_STYLE_FLAGS);
        bind_flags(&self.abbreviation_style, link, ABBREVIATION_STYLE_FLAGS);
    }
}

/// Main table behaviour; its columns are a separate group, see
/// [`Preferences::main_table_columns`](crate::Preferences::main_table_columns)
#[derive(Debug)]
pub struct MainTablePreferences {
    pub resize_columns_to_fit: Property<bool>,
    pub extra_file_columns: Property<bool>,
}

impl PreferenceGroup for MainTablePreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            resize_columns_to_fit: Property::new(shared.store.get_bool(AUTO_RESIZE_MODE)),
            extra_file_columns: Property::new(shared.store.get_bool(EXTRA_FILE_COLUMNS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.resize_columns_to_fit, link, AUTO_RESIZE_MODE);
        bind_bool(&self.extra_file_columns, link, EXTRA_FILE_COLUMNS);
    }
}

named_enum! {
    pub enum SortType {
        Ascending => "ASCENDING",
        Descending => "DESCENDING",
    }
}

/// One table column as persisted
#[derive(Debug, Clone, PartialEq)]
pub struct MainTableColumn {
    /// Column qualifier such as `field:title` or `groups`
    pub name: String,
    pub width: f64,
    pub sort_type: SortType,
}

impl MainTableColumn {
    pub const DEFAULT_WIDTH: f64 = 100.0;

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: Self::DEFAULT_WIDTH,
            sort_type: SortType::Ascending,
        }
    }
}

/// Keys a column layout is persisted under
///
/// Both tables share the column names of the main table. The search dialog
/// never writes them.
#[derive(Debug)]
pub struct ColumnKeys {
    pub widths: &'static str,
    pub sort_types: &'static str,
    pub sort_order: &'static str,
    pub write_names: bool,
}

pub static MAIN_TABLE_COLUMNS: ColumnKeys = ColumnKeys {
    widths: COLUMN_WIDTHS,
    sort_types: COLUMN_SORT_TYPES,
    sort_order: COLUMN_SORT_ORDER,
    write_names: true,
};

pub static SEARCH_DIALOG_COLUMNS: ColumnKeys = ColumnKeys {
    widths: SEARCH_DIALOG_COLUMN_WIDTHS,
    sort_types: SEARCH_DIALOG_COLUMN_SORT_TYPES,
    sort_order: SEARCH_DIALOG_COLUMN_SORT_ORDER,
    write_names: false,
};

/// Column layout of a table: visible columns plus the sort order
#[derive(Debug)]
pub struct ColumnPreferences {
    pub columns: Property<Vec<MainTableColumn>>,
    /// Columns the table is sorted by, most significant first
    pub sort_order: Property<Vec<MainTableColumn>>,
}

fn load_columns(store: &TypedStore, keys: &ColumnKeys) -> Vec<MainTableColumn> {
    let widths = store.get_string_list(keys.widths);
    let sort_types = store.get_string_list(keys.sort_types);

    store
        .get_string_list(COLUMN_NAMES)
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut column = MainTableColumn::new(name);
            if let Some(raw) = widths.get(index) {
                match raw.trim().parse::<f64>() {
                    Ok(width) if width.is_finite() => column.width = width,
                    _ => warn!(column = %name, width = %raw, "invalid column width, using default"),
                }
            }
            if let Some(raw) = sort_types.get(index) {
                match SortType::parse(raw.trim()) {
                    Some(sort_type) => column.sort_type = sort_type,
                    None => warn!(column = %name, sort_type = %raw, "ignoring invalid column sort type"),
                }
            }
            column
        })
        .collect()
}

fn store_columns(store: &TypedStore, keys: &ColumnKeys, columns: &[MainTableColumn]) {
    if keys.write_names {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        store.put_string_list(COLUMN_NAMES, Some(names.as_slice()));
    }
    let widths: Vec<String> = columns.iter().map(|c| c.width.to_string()).collect();
    let sort_types: Vec<&str> = columns.iter().map(|c| c.sort_type.name()).collect();
    store.put_string_list(keys.widths, Some(widths.as_slice()));
    store.put_string_list(keys.sort_types, Some(sort_types.as_slice()));
}

impl ColumnPreferences {
    fn load(shared: &Shared, keys: &ColumnKeys) -> Self {
        let columns = load_columns(&shared.store, keys);
        let sort_order = shared
            .store
            .get_string_list(keys.sort_order)
            .iter()
            .filter_map(|name| columns.iter().find(|c| c.name == *name).cloned())
            .collect();
        Self {
            columns: Property::new(columns),
            sort_order: Property::new(sort_order),
        }
    }

    pub(crate) fn build(shared: &Shared, link: &Link, keys: &'static ColumnKeys) -> Self {
        let group = Self::load(shared, keys);
        bind_with(&group.columns, link, move |s, columns| {
            store_columns(&s.store, keys, columns)
        });
        bind_with(&group.sort_order, link, move |s, order| {
            let names: Vec<&str> = order.iter().map(|c| c.name.as_str()).collect();
            s.store.put_string_list(keys.sort_order, Some(names.as_slice()));
        });
        group
    }
}
