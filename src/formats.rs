//! Custom export and import format registries
//!
//! Both registries are stored as series of list-encoded records. Loading is
//! forgiving: a record that cannot be turned into a format is logged and
//! skipped, and the rest of the series still loads.

use crate::accessor::TypedStore;
use crate::error::{Error, Result};
use crate::keys::{CUSTOM_EXPORT_FORMAT, CUSTOM_IMPORT_FORMAT};
use crate::list_codec;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// User-defined layout exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomExporter {
    pub name: String,
    pub layout_file: String,
    pub extension: String,
}

impl CustomExporter {
    pub fn new(name: &str, layout_file: &str, extension: &str) -> Self {
        Self {
            name: name.to_string(),
            layout_file: layout_file.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Parse a `[name, layout file, extension]` record
    pub fn from_record(record: &[String]) -> Result<Self> {
        match record {
            [name, layout_file, extension, ..] if !name.trim().is_empty() => {
                Ok(Self::new(name, layout_file, extension))
            }
            _ => Err(Error::InvalidRecord(format!(
                "exporter needs name, layout file and extension, got {record:?}"
            ))),
        }
    }

    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.layout_file.clone(),
            self.extension.clone(),
        ]
    }
}

/// User-supplied importer class loaded from a base path
///
/// Two importers are the same importer when they name the same class.
#[derive(Debug, Clone)]
pub struct CustomImporter {
    name: String,
    class_name: String,
    base_path: PathBuf,
}

impl CustomImporter {
    pub fn new(base_path: impl Into<PathBuf>, class_name: &str) -> Result<Self> {
        let class_name = class_name.trim();
        let valid = !class_name.is_empty()
            && class_name
                .split('.')
                .all(|segment| !segment.is_empty() && !segment.contains(char::is_whitespace));
        if !valid {
            return Err(Error::InvalidRecord(format!(
                "invalid importer class name '{class_name}'"
            )));
        }
        let name = class_name
            .rsplit('.')
            .next()
            .unwrap_or(class_name)
            .to_string();
        Ok(Self {
            name,
            class_name: class_name.to_string(),
            base_path: base_path.into(),
        })
    }

    /// Parse a `[base path, class name]` record, or the older
    /// `[name, cli id, class name, base path]` layout
    pub fn from_record(record: &[String]) -> Result<Self> {
        match record {
            [base_path, class_name] => Self::new(base_path.as_str(), class_name),
            [_, _, class_name, base_path, ..] => Self::new(base_path.as_str(), class_name),
            _ => Err(Error::InvalidRecord(format!(
                "importer record has {} fields",
                record.len()
            ))),
        }
    }

    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.base_path.display().to_string(),
            self.class_name.clone(),
        ]
    }

    /// Simple class name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl PartialEq for CustomImporter {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
    }
}

impl Eq for CustomImporter {}

impl Ord for CustomImporter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.class_name.cmp(&other.class_name))
    }
}

impl PartialOrd for CustomImporter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Set of custom importers in name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImporterRegistry {
    importers: BTreeSet<CustomImporter>,
}

impl ImporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `importer` unless an importer of the same class is present
    pub fn insert(&mut self, importer: CustomImporter) -> bool {
        self.importers.insert(importer)
    }

    /// Insert `importer`, dropping any importer of the same class first
    ///
    /// Returns `true` when an existing importer was replaced.
    pub fn replace(&mut self, importer: CustomImporter) -> bool {
        let replaced = self.importers.remove(&importer);
        self.importers.insert(importer);
        replaced
    }

    pub fn remove(&mut self, class_name: &str) -> bool {
        let before = self.importers.len();
        self.importers.retain(|i| i.class_name != class_name);
        self.importers.len() != before
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.importers.iter().any(|i| i.class_name == class_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomImporter> {
        self.importers.iter()
    }

    pub fn len(&self) -> usize {
        self.importers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }
}

impl FromIterator<CustomImporter> for ImporterRegistry {
    fn from_iter<I: IntoIterator<Item = CustomImporter>>(iter: I) -> Self {
        Self {
            importers: iter.into_iter().collect(),
        }
    }
}

pub fn load_exporters(store: &TypedStore) -> Vec<CustomExporter> {
    store
        .read_series(CUSTOM_EXPORT_FORMAT)
        .iter()
        .filter_map(|raw| match CustomExporter::from_record(&list_codec::decode(raw)) {
            Ok(exporter) => Some(exporter),
            Err(e) => {
                warn!(record = %raw, error = %e, "ignoring custom export format");
                None
            }
        })
        .collect()
}

pub fn store_exporters(store: &TypedStore, exporters: &[CustomExporter]) {
    let records: Vec<Vec<String>> = exporters.iter().map(CustomExporter::to_record).collect();
    store.write_series_lists(CUSTOM_EXPORT_FORMAT, &records);
}

pub fn load_importers(store: &TypedStore) -> ImporterRegistry {
    store
        .read_series(CUSTOM_IMPORT_FORMAT)
        .iter()
        .filter_map(|raw| match CustomImporter::from_record(&list_codec::decode(raw)) {
            Ok(importer) => Some(importer),
            Err(e) => {
                warn!(record = %raw, error = %e, "ignoring custom import format");
                None
            }
        })
        .collect()
}

pub fn store_importers(store: &TypedStore, importers: &ImporterRegistry) {
    store.purge_series(CUSTOM_IMPORT_FORMAT, 0);
    let records: Vec<Vec<String>> = importers.iter().map(CustomImporter::to_record).collect();
    store.write_series_lists(CUSTOM_IMPORT_FORMAT, &records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing_store::MemoryStore;
    use crate::defaults::DefaultTable;
    use std::sync::Arc;

    fn store() -> TypedStore {
        TypedStore::new(Arc::new(MemoryStore::new()), DefaultTable::new())
    }

    fn importer(class_name: &str) -> CustomImporter {
        CustomImporter::new("/plugins/importers.jar", class_name).unwrap()
    }

    #[test]
    fn test_exporters_round_trip_and_shrink() {
        let store = store();
        let exporters = vec![
            CustomExporter::new("html table", "/layouts/table.layout", ".html"),
            CustomExporter::new("csv; semicolon", "C:\\layouts\\csv.layout", ".csv"),
        ];
        store_exporters(&store, &exporters);
        assert_eq!(load_exporters(&store), exporters);

        store_exporters(&store, &exporters[..1]);
        assert_eq!(load_exporters(&store), exporters[..1].to_vec());
        assert!(!store.has_key("customExportFormat1"));

        store_exporters(&store, &[]);
        assert!(load_exporters(&store).is_empty());
    }

    #[test]
    fn test_invalid_exporter_is_skipped() {
        let store = store();
        store.put_string("customExportFormat0", "only;two");
        store.put_string("customExportFormat1", "ok;file.layout;.txt");
        let loaded = load_exporters(&store);
        assert_eq!(loaded, vec![CustomExporter::new("ok", "file.layout", ".txt")]);
    }

    #[test]
    fn test_importer_legacy_layout() {
        let record: Vec<String> = ["Ris", "ris", "org.example.RisImporter", "/opt/ris.jar"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parsed = CustomImporter::from_record(&record).unwrap();
        assert_eq!(parsed.class_name(), "org.example.RisImporter");
        assert_eq!(parsed.name(), "RisImporter");
        assert_eq!(parsed.base_path(), Path::new("/opt/ris.jar"));
        assert_eq!(parsed.to_record().len(), 2);
    }

    #[test]
    fn test_importer_rejects_bad_records() {
        assert!(CustomImporter::from_record(&["only".to_string()]).is_err());
        assert!(CustomImporter::new("/x", "org..Broken").is_err());
        assert!(CustomImporter::new("/x", "   ").is_err());
    }

    #[test]
    fn test_registry_orders_by_name_and_replaces() {
        let mut registry = ImporterRegistry::new();
        registry.insert(importer("org.z.Beta"));
        registry.insert(importer("org.a.Gamma"));
        registry.insert(importer("org.m.Alpha"));
        let names: Vec<&str> = registry.iter().map(CustomImporter::name).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);

        let moved = CustomImporter::new("/elsewhere.jar", "org.z.Beta").unwrap();
        assert!(registry.replace(moved));
        assert!(!registry.replace(importer("org.n.Delta")));
        assert_eq!(registry.len(), 4);
        let beta = registry.iter().find(|i| i.name() == "Beta").unwrap();
        assert_eq!(beta.base_path(), Path::new("/elsewhere.jar"));
    }

    #[test]
    fn test_importers_round_trip() {
        let store = store();
        store.put_string("customImportFormat0", "legacy;cli;org.old.Legacy;/old.jar");
        store.put_string("customImportFormat1", "broken");
        store.put_string("customImportFormat2", "/new.jar;org.new.Fresh");
        let registry = load_importers(&store);
        assert_eq!(registry.len(), 2);

        store_importers(&store, &registry);
        assert_eq!(store.read_series("customImportFormat").len(), 2);
        assert!(!store.has_key("customImportFormat2"));
        assert_eq!(load_importers(&store), registry);
    }
}
