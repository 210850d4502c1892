use super::{bind_path, bind_string, bind_with, derive_from_flags, Link, PreferenceGroup};
use crate::accessor::TypedStore;
use crate::formats::{self, CustomExporter};
use crate::keys::*;
use crate::list_codec;
use crate::observable::Property;
use crate::service::Shared;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::warn;

named_enum! {
    /// Entry order used when writing a library or export
    pub enum SaveOrderType {
        /// Order of the entries in the main table
        Table => "TABLE",
        /// Order the entries appear in the file
        Original => "ORIGINAL",
        /// Sorted by the configured criteria
        Specified => "SPECIFIED",
    }
}

const SAVE_ORDER_FLAGS: &[(&str, SaveOrderType)] = &[
    (EXPORT_IN_SPECIFIED_ORDER, SaveOrderType::Specified),
    (EXPORT_IN_ORIGINAL_ORDER, SaveOrderType::Original),
];

/// Primary, secondary and tertiary sort keys
const SORT_KEYS: [(&str, &str); 3] = [
    (EXPORT_PRIMARY_SORT_FIELD, EXPORT_PRIMARY_SORT_DESCENDING),
    (EXPORT_SECONDARY_SORT_FIELD, EXPORT_SECONDARY_SORT_DESCENDING),
    (EXPORT_TERTIARY_SORT_FIELD, EXPORT_TERTIARY_SORT_DESCENDING),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    pub field: String,
    pub descending: bool,
}

impl SortCriterion {
    pub fn new(field: &str, descending: bool) -> Self {
        Self {
            field: field.to_string(),
            descending,
        }
    }
}

/// At most three criteria are persisted; extra ones are dropped on write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOrder {
    pub order_type: SaveOrderType,
    pub criteria: Vec<SortCriterion>,
}

impl SaveOrder {
    fn load(shared: &Shared) -> Self {
        let criteria = SORT_KEYS
            .iter()
            .filter_map(|(field_key, descending_key)| {
                let field = shared.store.get_string(field_key);
                (!field.trim().is_empty())
                    .then(|| SortCriterion::new(&field, shared.store.get_bool(descending_key)))
            })
            .collect();
        Self {
            order_type: derive_from_flags(shared, SAVE_ORDER_FLAGS, SaveOrderType::Table),
            criteria,
        }
    }

    fn save(&self, store: &TypedStore) {
        for (key, order_type) in SAVE_ORDER_FLAGS {
            store.put_bool(key, self.order_type == *order_type);
        }
        for (index, (field_key, descending_key)) in SORT_KEYS.iter().enumerate() {
            match self.criteria.get(index) {
                Some(criterion) => {
                    store.put_string(field_key, &criterion.field);
                    store.put_bool(descending_key, criterion.descending);
                }
                None => {
                    store.put_string(field_key, "");
                    store.put_bool(descending_key, false);
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct ExportPreferences {
    /// Name of the export format picked last
    pub last_export_extension: Property<String>,
    pub export_working_directory: Property<PathBuf>,
    pub export_save_order: Property<SaveOrder>,
    pub custom_exporters: Property<Vec<CustomExporter>>,
}

impl PreferenceGroup for ExportPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            last_export_extension: Property::new(store.get_string(LAST_USED_EXPORT)),
            export_working_directory: Property::new(
                store.get_path(EXPORT_WORKING_DIRECTORY, &shared.config.environment.home_dir),
            ),
            export_save_order: Property::new(SaveOrder::load(shared)),
            custom_exporters: Property::new(formats::load_exporters(store)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string(&self.last_export_extension, link, LAST_USED_EXPORT);
        bind_path(&self.export_working_directory, link, EXPORT_WORKING_DIRECTORY);
        bind_with(&self.export_save_order, link, |s, order| order.save(&s.store));
        bind_with(&self.custom_exporters, link, |s, exporters| {
            formats::store_exporters(&s.store, exporters)
        });
    }
}

named_enum! {
    /// A cleanup operation that can run over selected entries
    pub enum CleanupStep {
        CleanUpDoi => "CLEAN_UP_DOI",
        CleanupEprint => "CLEANUP_EPRINT",
        CleanUpUrl => "CLEAN_UP_URL",
        MakePathsRelative => "MAKE_PATHS_RELATIVE",
        RenamePdf => "RENAME_PDF",
        RenamePdfOnlyRelativePaths => "RENAME_PDF_ONLY_RELATIVE_PATHS",
        CleanUpUpgradeExternalLinks => "CLEAN_UP_UPGRADE_EXTERNAL_LINKS",
        CleanUpDeletedLinkedFiles => "CLEAN_UP_DELETED_LINKED_FILES",
        ConvertToBiblatex => "CONVERT_TO_BIBLATEX",
        ConvertToBibtex => "CONVERT_TO_BIBTEX",
        ConvertTimestampToCreationDate => "CONVERT_TIMESTAMP_TO_CREATIONDATE",
        ConvertTimestampToModificationDate => "CONVERT_TIMESTAMP_TO_MODIFICATIONDATE",
        DoNotConvertTimestamp => "DO_NOT_CONVERT_TIMESTAMP",
        MovePdf => "MOVE_PDF",
        FixFileLinks => "FIX_FILE_LINKS",
        CleanUpIssn => "CLEAN_UP_ISSN",
        AbbreviateDefault => "ABBREVIATE_DEFAULT",
        AbbreviateDotless => "ABBREVIATE_DOTLESS",
        AbbreviateShortestUnique => "ABBREVIATE_SHORTEST_UNIQUE",
        AbbreviateLtwa => "ABBREVIATE_LTWA",
        Unabbreviate => "UNABBREVIATE",
    }
}

impl CleanupStep {
    /// Steps enabled on a fresh installation
    ///
    /// Everything that moves or renames files, or rewrites the entry type
    /// system, is left off.
    pub fn default_jobs() -> Vec<CleanupStep> {
        Self::ALL
            .iter()
            .copied()
            .filter(|step| {
                !matches!(
                    step,
                    CleanupStep::CleanUpUpgradeExternalLinks
                        | CleanupStep::MovePdf
                        | CleanupStep::RenamePdfOnlyRelativePaths
                        | CleanupStep::ConvertToBiblatex
                        | CleanupStep::ConvertToBibtex
                )
            })
            .collect()
    }
}

/// Per-field formatter chain applied during cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFormatterCleanups {
    pub enabled: bool,
    /// One `field[formatter,...]` action per entry
    pub actions: Vec<String>,
}

#[derive(Debug)]
pub struct CleanupPreferences {
    pub active_jobs: Property<BTreeSet<CleanupStep>>,
    pub field_formatter_cleanups: Property<FieldFormatterCleanups>,
}

fn load_jobs(store: &TypedStore) -> BTreeSet<CleanupStep> {
    store
        .get_string_list(CLEANUP_JOBS)
        .iter()
        .filter_map(|name| {
            let step = CleanupStep::parse(name.trim());
            if step.is_none() {
                warn!(step = %name, "ignoring unknown cleanup step");
            }
            step
        })
        .collect()
}

impl PreferenceGroup for CleanupPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let actions = store
            .get_string(CLEANUP_FIELD_FORMATTERS)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            active_jobs: Property::new(load_jobs(store)),
            field_formatter_cleanups: Property::new(FieldFormatterCleanups {
                enabled: store.get_bool(CLEANUP_FIELD_FORMATTERS_ENABLED),
                actions,
            }),
        }
    }

    fn bind(&self, link: &Link) {
        bind_with(&self.active_jobs, link, |s, jobs| {
            let names: Vec<&str> = jobs.iter().map(|step| step.name()).collect();
            s.store.put_string(CLEANUP_JOBS, &list_codec::encode(&names));
        });
        bind_with(&self.field_formatter_cleanups, link, |s, cleanups| {
            s.store.put_bool(CLEANUP_FIELD_FORMATTERS_ENABLED, cleanups.enabled);
            s.store
                .put_string(CLEANUP_FIELD_FORMATTERS, &cleanups.actions.join("\n"));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::testing::Fixture;

    #[test]
    fn test_save_order_priority() {
        let fx = Fixture::new();
        assert_eq!(
            fx.prefs.export().export_save_order.get().order_type,
            SaveOrderType::Original
        );

        let store = fx.prefs.store();
        store.put_bool(EXPORT_IN_SPECIFIED_ORDER, true);
        assert_eq!(
            fx.reopen().export().export_save_order.get().order_type,
            SaveOrderType::Specified
        );

        store.put_bool(EXPORT_IN_SPECIFIED_ORDER, false);
        store.put_bool(EXPORT_IN_ORIGINAL_ORDER, false);
        assert_eq!(
            fx.reopen().export().export_save_order.get().order_type,
            SaveOrderType::Table
        );
    }

    #[test]
    fn test_save_order_skips_empty_fields() {
        let fx = Fixture::new();
        fx.prefs.store().put_string(EXPORT_SECONDARY_SORT_FIELD, "");
        let order = fx.prefs.export().export_save_order.get();
        assert_eq!(
            order.criteria,
            vec![
                SortCriterion::new("citationkey", false),
                SortCriterion::new("title", false)
            ]
        );
    }

    #[test]
    fn test_save_order_write_back_pads_criteria() {
        let fx = Fixture::new();
        fx.prefs.export().export_save_order.set(SaveOrder {
            order_type: SaveOrderType::Specified,
            criteria: vec![SortCriterion::new("year", true)],
        });

        let store = fx.prefs.store();
        assert!(store.get_bool(EXPORT_IN_SPECIFIED_ORDER));
        assert!(!store.get_bool(EXPORT_IN_ORIGINAL_ORDER));
        assert_eq!(store.get_string(EXPORT_PRIMARY_SORT_FIELD), "year");
        assert!(store.get_bool(EXPORT_PRIMARY_SORT_DESCENDING));
        assert_eq!(store.raw(EXPORT_TERTIARY_SORT_FIELD).as_deref(), Some(""));

        let reloaded = fx.reopen().export().export_save_order.get();
        assert_eq!(reloaded.criteria.len(), 1);
    }

    #[test]
    fn test_custom_exporters_write_series() {
        let fx = Fixture::new();
        fx.prefs
            .export()
            .custom_exporters
            .set(vec![CustomExporter::new("md", "/layouts/md.layout", ".md")]);
        assert!(fx.prefs.store().has_key("customExportFormat0"));
        assert_eq!(fx.reopen().export().custom_exporters.get().len(), 1);
    }

    #[test]
    fn test_unknown_cleanup_step_is_dropped() {
        let fx = Fixture::new();
        fx.prefs
            .store()
            .put_string(CLEANUP_JOBS, "CLEAN_UP_DOI;REMOVED_IN_OLD_VERSION;MOVE_PDF");
        let jobs = fx.prefs.cleanup().active_jobs.get();
        assert_eq!(
            jobs.into_iter().collect::<Vec<_>>(),
            vec![CleanupStep::CleanUpDoi, CleanupStep::MovePdf]
        );
    }

    #[test]
    fn test_cleanup_jobs_round_trip() {
        let fx = Fixture::new();
        let cleanup = fx.prefs.cleanup();
        assert!(cleanup.active_jobs.get().contains(&CleanupStep::CleanUpDoi));
        cleanup.active_jobs.update(|jobs| {
            jobs.remove(&CleanupStep::CleanUpDoi);
        });
        cleanup.field_formatter_cleanups.update(|c| c.enabled = true);

        let reopened = fx.reopen().cleanup();
        assert!(!reopened.active_jobs.get().contains(&CleanupStep::CleanUpDoi));
        let formatters = reopened.field_formatter_cleanups.get();
        assert!(formatters.enabled);
        assert_eq!(formatters.actions.len(), 3);
    }
}
