//! Typed store accessor
//!
//! [`TypedStore`] layers typed reads and writes, default fallback, escaped
//! string lists and indexed series over a [`BackingStore`]. Reads are total:
//! a missing key resolves to its registered default, a value that cannot be
//! read as the requested type resolves to the default with a warning, and a
//! failing backing store is logged and treated as empty.

use crate::backing_store::BackingStore;
use crate::defaults::DefaultTable;
use crate::error::{Error, Result};
use crate::list_codec;
use crate::types::{PrefValue, PreferenceMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Node path of the application node
const ROOT: &str = "";

/// Compatibility shim for values written by older store versions
///
/// Older versions stored numbers and flags through a dynamically typed map,
/// so a key declared as an integer may hold `"14.0"` and a flag may hold
/// `"1"`. Every typed read funnels through [`coerce`], which is the only
/// place such skew is tolerated.
pub mod legacy {
    use crate::types::PrefValue;

    /// Target type of a coercion
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ValueKind {
        String,
        Bool,
        Integer,
        Float,
    }

    impl ValueKind {
        pub fn of(value: &PrefValue) -> Self {
            match value {
                PrefValue::String(_) => ValueKind::String,
                PrefValue::Bool(_) => ValueKind::Bool,
                PrefValue::Integer(_) => ValueKind::Integer,
                PrefValue::Float(_) => ValueKind::Float,
            }
        }
    }

    fn parse_bool(raw: &str) -> Option<bool> {
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Read `raw` as `kind`
    ///
    /// Attempts, in order:
    /// - bool: `true`/`false` in any case, then `1`/`0`
    /// - integer: decimal integer, then a finite double truncated toward
    ///   zero, then a bool as `1`/`0`
    /// - double: float, then a bool as `1.0`/`0.0`
    ///
    /// Returns `None` when no attempt succeeds.
    pub fn coerce(raw: &str, kind: ValueKind) -> Option<PrefValue> {
        let trimmed = raw.trim();
        match kind {
            ValueKind::String => Some(PrefValue::String(raw.to_string())),
            ValueKind::Bool => parse_bool(trimmed)
                .or(match trimmed {
                    "1" => Some(true),
                    "0" => Some(false),
                    _ => None,
                })
                .map(PrefValue::Bool),
            ValueKind::Integer => trimmed
                .parse::<i32>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite() && d.abs() <= f64::from(i32::MAX))
                        .map(|d| d.trunc() as i32)
                })
                .or_else(|| parse_bool(trimmed).map(i32::from))
                .map(PrefValue::Integer),
            ValueKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .or_else(|| parse_bool(trimmed).map(|b| if b { 1.0 } else { 0.0 }))
                .map(PrefValue::Float),
        }
    }

    /// Best-effort typing of a value with no declared type
    pub fn infer(raw: &str) -> PrefValue {
        let trimmed = raw.trim();
        if let Some(b) = parse_bool(trimmed) {
            PrefValue::Bool(b)
        } else if let Ok(i) = trimmed.parse::<i32>() {
            PrefValue::Integer(i)
        } else if let Ok(d) = trimmed.parse::<f64>() {
            PrefValue::Float(d)
        } else {
            PrefValue::String(raw.to_string())
        }
    }
}

use legacy::ValueKind;

/// Typed access to the application node of a backing store
pub struct TypedStore {
    store: Arc<dyn BackingStore>,
    defaults: DefaultTable,
}

impl std::fmt::Debug for TypedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedStore")
            .field("defaults", &self.defaults.len())
            .finish_non_exhaustive()
    }
}

impl TypedStore {
    pub fn new(store: Arc<dyn BackingStore>, defaults: DefaultTable) -> Self {
        Self { store, defaults }
    }

    pub fn backing_store(&self) -> &Arc<dyn BackingStore> {
        &self.store
    }

    pub fn defaults(&self) -> &DefaultTable {
        &self.defaults
    }

    /// Stored value of `key`, without default fallback
    pub fn raw(&self, key: &str) -> Option<String> {
        self.node_get(ROOT, key)
    }

    fn resolve(&self, key: &str, kind: ValueKind) -> PrefValue {
        if let Some(raw) = self.raw(key) {
            if let Some(value) = legacy::coerce(&raw, kind) {
                return value;
            }
            warn!(key, value = %raw, expected = ?kind, "stored value has unexpected type, using default");
        }
        self.default_as(key, kind)
    }

    fn default_as(&self, key: &str, kind: ValueKind) -> PrefValue {
        match self.defaults.get(key) {
            Some(value) if ValueKind::of(value) == kind => value.clone(),
            Some(value) => legacy::coerce(&value.to_stored(), kind).unwrap_or_else(|| {
                error!(key, declared = value.type_name(), expected = ?kind, "default has incompatible type");
                zero(kind)
            }),
            None => {
                error!(key, "no stored value and no registered default");
                zero(kind)
            }
        }
    }

    pub fn get_string(&self, key: &str) -> String {
        match self.resolve(key, ValueKind::String) {
            PrefValue::String(s) => s,
            other => other.to_stored(),
        }
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.resolve(key, ValueKind::Bool), PrefValue::Bool(true))
    }

    pub fn get_int(&self, key: &str) -> i32 {
        match self.resolve(key, ValueKind::Integer) {
            PrefValue::Integer(i) => i,
            _ => 0,
        }
    }

    pub fn get_double(&self, key: &str) -> f64 {
        match self.resolve(key, ValueKind::Float) {
            PrefValue::Float(d) => d,
            PrefValue::Integer(i) => f64::from(i),
            _ => 0.0,
        }
    }

    /// Read `key` with a caller-supplied fallback instead of the default table
    pub fn get_string_or(&self, key: &str, fallback: &str) -> String {
        self.raw(key).unwrap_or_else(|| fallback.to_string())
    }

    pub fn get_bool_or(&self, key: &str, fallback: bool) -> bool {
        match self.raw(key).and_then(|raw| legacy::coerce(&raw, ValueKind::Bool)) {
            Some(PrefValue::Bool(b)) => b,
            _ => fallback,
        }
    }

    pub fn get_int_or(&self, key: &str, fallback: i32) -> i32 {
        match self
            .raw(key)
            .and_then(|raw| legacy::coerce(&raw, ValueKind::Integer))
        {
            Some(PrefValue::Integer(i)) => i,
            _ => fallback,
        }
    }

    pub fn get_double_or(&self, key: &str, fallback: f64) -> f64 {
        match self.raw(key).and_then(|raw| legacy::coerce(&raw, ValueKind::Float)) {
            Some(PrefValue::Float(d)) => d,
            _ => fallback,
        }
    }

    /// Like [`get_string`](Self::get_string) but an empty stored value also
    /// resolves to the default
    pub fn get_empty_is_default(&self, key: &str) -> String {
        match self.raw(key) {
            Some(raw) if !raw.is_empty() => raw,
            _ => self.default_as(key, ValueKind::String).to_stored(),
        }
    }

    /// Stored value, else the string default, else `None`
    pub fn get_optional(&self, key: &str) -> Option<String> {
        self.raw(key)
            .or_else(|| self.defaults.string(key).map(str::to_string))
    }

    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        list_codec::decode(&self.get_string(key))
    }

    /// Path stored under `key`, or `fallback` when the value is blank
    pub fn get_path(&self, key: &str, fallback: &Path) -> PathBuf {
        let value = match self.raw(key) {
            Some(raw) => raw,
            None => self.defaults.string(key).unwrap_or_default().to_string(),
        };
        if value.trim().is_empty() {
            fallback.to_path_buf()
        } else {
            PathBuf::from(value)
        }
    }

    /// Value of `key` typed by its declared default
    ///
    /// Keys without a default are typed by inspecting the stored string.
    pub fn get_object(&self, key: &str) -> PrefValue {
        match self.defaults.get(key) {
            Some(declared) => self.resolve(key, ValueKind::of(declared)),
            None => self
                .raw(key)
                .map(|raw| legacy::infer(&raw))
                .unwrap_or_else(|| PrefValue::String(String::new())),
        }
    }

    /// Every key stored in the application node, typed
    pub fn all_preferences(&self) -> PreferenceMap {
        self.node_keys(ROOT)
            .into_iter()
            .map(|key| {
                let value = self.get_object(&key);
                (key, value)
            })
            .collect()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    pub fn put_string(&self, key: &str, value: &str) {
        self.node_put(ROOT, key, value);
    }

    pub fn put_bool(&self, key: &str, value: bool) {
        self.put_string(key, &value.to_string());
    }

    pub fn put_int(&self, key: &str, value: i32) {
        self.put_string(key, &value.to_string());
    }

    pub fn put_double(&self, key: &str, value: f64) {
        self.put_string(key, &value.to_string());
    }

    /// Store `values` as an escaped list; `None` removes the key
    pub fn put_string_list<S: AsRef<str>>(&self, key: &str, values: Option<&[S]>) {
        match values {
            Some(values) => self.put_string(key, &list_codec::encode(values)),
            None => self.remove(key),
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(ROOT, key) {
            warn!(key, error = %e, "could not remove preference");
        }
    }

    /// Remove a stored key, failing when it is not stored
    ///
    /// Leading and trailing whitespace in `key` is ignored.
    pub fn delete_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        let stored = self
            .store
            .keys(ROOT)?
            .iter()
            .any(|existing| existing == key);
        if !stored {
            return Err(Error::NoSuchKey(key.to_string()));
        }
        self.store.remove(ROOT, key)
    }

    /// Values stored under `base0`, `base1`, ... up to the first gap
    ///
    /// A blank value counts as a gap.
    pub fn read_series(&self, base: &str) -> Vec<String> {
        let mut values = Vec::new();
        loop {
            match self.raw(&format!("{base}{}", values.len())) {
                Some(value) if !value.trim().is_empty() => values.push(value),
                _ => break,
            }
        }
        values
    }

    /// Remove `base{n}` for every `n >= from` until the first absent index
    pub fn purge_series(&self, base: &str, from: usize) {
        let mut index = from;
        loop {
            let key = format!("{base}{index}");
            if self.raw(&key).is_none() {
                break;
            }
            self.remove(&key);
            index += 1;
        }
        if index > from {
            debug!(base, from, removed = index - from, "purged series tail");
        }
    }

    /// Replace the series at `base` with `values`
    pub fn write_series<S: AsRef<str>>(&self, base: &str, values: &[S]) {
        for (index, value) in values.iter().enumerate() {
            self.put_string(&format!("{base}{index}"), value.as_ref());
        }
        self.purge_series(base, values.len());
    }

    /// Replace the series at `base` with list-encoded `records`
    pub fn write_series_lists(&self, base: &str, records: &[Vec<String>]) {
        let encoded: Vec<String> = records.iter().map(|r| list_codec::encode(r)).collect();
        self.write_series(base, &encoded);
    }

    pub fn node_get(&self, node: &str, key: &str) -> Option<String> {
        match self.store.get(node, key) {
            Ok(value) => value,
            Err(e) => {
                warn!(node, key, error = %e, "could not read preference");
                None
            }
        }
    }

    pub fn node_put(&self, node: &str, key: &str, value: &str) {
        if let Err(e) = self.store.put(node, key, value) {
            warn!(node, key, error = %e, "could not write preference");
        }
    }

    pub fn node_keys(&self, node: &str) -> Vec<String> {
        self.store.keys(node).unwrap_or_else(|e| {
            warn!(node, error = %e, "could not list preference keys");
            Vec::new()
        })
    }

    pub fn node_clear(&self, node: &str) {
        if let Err(e) = self.store.clear(node) {
            warn!(node, error = %e, "could not clear preference node");
        }
    }

    /// Remove every key of the application node and all of its descendants
    pub fn clear_all(&self) -> Result<()> {
        self.clear_recursive(ROOT)
    }

    fn clear_recursive(&self, node: &str) -> Result<()> {
        for child in self.store.children_names(node)? {
            let path = if node.is_empty() {
                child
            } else {
                format!("{node}/{child}")
            };
            self.clear_recursive(&path)?;
        }
        self.store.clear(node)
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}

fn zero(kind: ValueKind) -> PrefValue {
    match kind {
        ValueKind::String => PrefValue::String(String::new()),
        ValueKind::Bool => PrefValue::Bool(false),
        ValueKind::Integer => PrefValue::Integer(0),
        ValueKind::Float => PrefValue::Float(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing_store::MemoryStore;
    use crate::environment::Environment;
    use crate::keys::*;
    use tempfile::TempDir;

    fn typed_store() -> TypedStore {
        let dir = TempDir::new().unwrap();
        let env = Environment::isolated("alice", "box", dir.path());
        TypedStore::new(
            Arc::new(MemoryStore::new()),
            DefaultTable::for_environment(&env),
        )
    }

    #[test]
    fn test_int_default_then_stored() {
        let store = typed_store();
        assert_eq!(store.get_int(MAIN_FONT_SIZE), 9);
        store.put_int(MAIN_FONT_SIZE, 14);
        assert_eq!(store.get_int(MAIN_FONT_SIZE), 14);
    }

    #[test]
    fn test_every_default_readable_on_empty_store() {
        let store = typed_store();
        let defaults: Vec<(String, PrefValue)> = store
            .defaults()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        for (key, default) in defaults {
            let value = match &default {
                PrefValue::String(_) => PrefValue::String(store.get_string(&key)),
                PrefValue::Bool(_) => PrefValue::Bool(store.get_bool(&key)),
                PrefValue::Integer(_) => PrefValue::Integer(store.get_int(&key)),
                PrefValue::Float(_) => PrefValue::Float(store.get_double(&key)),
            };
            assert_eq!(value, default, "default of {key}");
        }
    }

    #[test]
    fn test_legacy_coercion() {
        let store = typed_store();
        store.put_string(MAIN_FONT_SIZE, "14.0");
        assert_eq!(store.get_int(MAIN_FONT_SIZE), 14);

        store.put_string(USE_OWNER, "1");
        assert!(store.get_bool(USE_OWNER));
        store.put_string(USE_OWNER, "FALSE");
        assert!(!store.get_bool(USE_OWNER));

        store.put_string(SEARCH_WINDOW_WIDTH, "true");
        assert_eq!(store.get_double(SEARCH_WINDOW_WIDTH), 1.0);
    }

    #[test]
    fn test_unparseable_value_falls_back_to_default() {
        let store = typed_store();
        store.put_string(MAIN_FONT_SIZE, "huge");
        assert_eq!(store.get_int(MAIN_FONT_SIZE), 9);
        store.put_string(USE_OWNER, "maybe");
        assert!(!store.get_bool(USE_OWNER));
    }

    #[test]
    fn test_missing_default_resolves_to_zero_value() {
        let store = typed_store();
        assert_eq!(store.get_string("neverRegistered"), "");
        assert_eq!(store.get_int("neverRegistered"), 0);
        assert!(!store.get_bool("neverRegistered"));
    }

    #[test]
    fn test_string_list_round_trip() {
        let store = typed_store();
        let values = vec!["a;b".to_string(), String::new(), "c\\d".to_string()];
        store.put_string_list("list", Some(&values));
        assert_eq!(store.get_string_list("list"), values);
        store.put_string_list::<String>("list", None);
        assert!(!store.has_key("list"));
    }

    #[test]
    fn test_series_read_write_purge() {
        let store = typed_store();
        store.put_string("tab0", "x");
        store.put_string("tab1", "y");
        store.put_string("tab2", "z");
        assert_eq!(store.read_series("tab"), vec!["x", "y", "z"]);

        store.write_series("tab", &["p"]);
        assert_eq!(store.read_series("tab"), vec!["p"]);
        assert!(store.raw("tab1").is_none());
        assert!(store.raw("tab2").is_none());
    }

    #[test]
    fn test_series_stops_at_blank_value() {
        let store = typed_store();
        store.put_string("s0", "a");
        store.put_string("s1", "  ");
        store.put_string("s2", "c");
        assert_eq!(store.read_series("s"), vec!["a"]);
    }

    #[test]
    fn test_purge_is_idempotent() {
        let store = typed_store();
        store.write_series("s", &["a", "b", "c", "d"]);
        store.purge_series("s", 1);
        store.purge_series("s", 1);
        assert_eq!(store.read_series("s"), vec!["a"]);
    }

    #[test]
    fn test_delete_key() {
        let store = typed_store();
        store.put_string(DEFAULT_OWNER, "bob");
        store.delete_key("  defaultOwner ").unwrap();
        assert!(!store.has_key(DEFAULT_OWNER));
        assert!(matches!(
            store.delete_key(DEFAULT_OWNER),
            Err(Error::NoSuchKey(key)) if key == DEFAULT_OWNER
        ));
    }

    #[test]
    fn test_empty_is_default() {
        let store = typed_store();
        store.put_string(BASE_DOI_URI, "");
        assert_eq!(store.get_string(BASE_DOI_URI), "");
        assert_eq!(store.get_empty_is_default(BASE_DOI_URI), "https://doi.org");
    }

    #[test]
    fn test_get_path_blank_uses_fallback() {
        let store = typed_store();
        let fallback = Path::new("/fallback");
        assert_eq!(store.get_path(MAIN_FILE_DIRECTORY, fallback), fallback);
        store.put_string(MAIN_FILE_DIRECTORY, "/papers");
        assert_eq!(
            store.get_path(MAIN_FILE_DIRECTORY, fallback),
            PathBuf::from("/papers")
        );
    }

    #[test]
    fn test_get_object_and_all_preferences() {
        let store = typed_store();
        store.put_int(MAIN_FONT_SIZE, 12);
        store.put_string("undeclared", "2.5");
        store.put_string("undeclaredText", "hello");

        let all = store.all_preferences();
        assert_eq!(all[MAIN_FONT_SIZE], PrefValue::Integer(12));
        assert_eq!(all["undeclared"], PrefValue::Float(2.5));
        assert_eq!(all["undeclaredText"], PrefValue::from("hello"));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_clear_all_reaches_child_nodes() {
        let store = typed_store();
        store.put_string(DEFAULT_OWNER, "bob");
        store.node_put(CITATION_KEY_PATTERNS_NODE, "article", "[auth]");
        store.clear_all().unwrap();
        assert!(store.node_keys("").is_empty());
        assert!(store.node_keys(CITATION_KEY_PATTERNS_NODE).is_empty());
    }

    #[test]
    fn test_fallback_getters() {
        let store = typed_store();
        assert_eq!(store.get_double_or(MAIN_WINDOW_POS_X, 3.5), 3.5);
        store.put_double(MAIN_WINDOW_POS_X, 120.0);
        assert_eq!(store.get_double_or(MAIN_WINDOW_POS_X, 3.5), 120.0);
        assert!(store.get_bool_or(TRASH_INSTEAD_OF_DELETE, true));
    }
}
