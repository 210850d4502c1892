//! Hierarchical key-value backing store
//!
//! Preferences are persisted in a tree of nodes, each node holding a flat
//! string-to-string map. Nodes are addressed by `/`-separated paths relative
//! to the application node; the empty path is the application node itself.

use crate::error::{Error, Result};
use crate::xml_store;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Node path of the application node inside exported documents
pub const DEFAULT_NODE_PATH: &str = "org/jabref";

/// Entries of every node, keyed by normalized node path
pub type PreferenceTree = BTreeMap<String, BTreeMap<String, String>>;

/// Persistence collaborator behind the typed accessor
///
/// All values are strings. Implementations must be safe to share between
/// threads; the engine serializes writes itself but reads may come from any
/// thread holding a [`Preferences`](crate::Preferences) handle.
pub trait BackingStore: Send + Sync {
    fn get(&self, node: &str, key: &str) -> Result<Option<String>>;

    fn put(&self, node: &str, key: &str, value: &str) -> Result<()>;

    fn remove(&self, node: &str, key: &str) -> Result<()>;

    /// Keys stored directly in `node`, sorted
    fn keys(&self, node: &str) -> Result<Vec<String>>;

    /// Names of the direct child nodes of `node`, sorted
    fn children_names(&self, node: &str) -> Result<Vec<String>>;

    /// Remove every key of `node`; child nodes are left alone
    fn clear(&self, node: &str) -> Result<()>;

    /// Force pending changes to durable storage
    fn flush(&self) -> Result<()>;

    /// Write the whole tree as a preferences XML document
    fn export_subtree(&self, out: &mut dyn Write) -> Result<()>;

    /// Merge a preferences XML document into the tree
    fn import_subtree(&self, input: &mut dyn Read) -> Result<()>;
}

/// Strip leading and trailing separators so `"/a/b/"` and `"a/b"` agree
pub fn normalize_node(node: &str) -> String {
    node.trim_matches('/').to_string()
}

/// In-memory [`BackingStore`]
///
/// Nothing survives the process unless the tree is exported. [`FileStore`]
/// (crate::FileStore) layers file persistence on top of this type.
#[derive(Debug)]
pub struct MemoryStore {
    node_path: String,
    tree: Mutex<PreferenceTree>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store exported under [`DEFAULT_NODE_PATH`]
    pub fn new() -> Self {
        Self::with_node_path(DEFAULT_NODE_PATH)
    }

    /// Create an empty store exported under `node_path`
    pub fn with_node_path(node_path: &str) -> Self {
        Self {
            node_path: normalize_node(node_path),
            tree: Mutex::new(PreferenceTree::new()),
        }
    }

    /// Create a store holding `tree`
    pub fn from_tree(node_path: &str, tree: PreferenceTree) -> Self {
        let store = Self::with_node_path(node_path);
        if let Ok(mut guard) = store.tree.lock() {
            *guard = tree;
        }
        store
    }

    pub fn node_path(&self) -> &str {
        &self.node_path
    }

    /// Copy of the current tree
    pub fn snapshot(&self) -> Result<PreferenceTree> {
        Ok(self.lock()?.clone())
    }

    /// Merge `incoming` into the tree, overwriting keys present in both
    pub fn merge(&self, incoming: PreferenceTree) -> Result<()> {
        let mut tree = self.lock()?;
        for (node, entries) in incoming {
            debug!(node = %node, entries = entries.len(), "merging imported node");
            tree.entry(node).or_default().extend(entries);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, PreferenceTree>> {
        self.tree
            .lock()
            .map_err(|_| Error::BackingStore("preference tree lock poisoned".to_string()))
    }
}

impl BackingStore for MemoryStore {
    fn get(&self, node: &str, key: &str) -> Result<Option<String>> {
        let tree = self.lock()?;
        Ok(tree
            .get(&normalize_node(node))
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn put(&self, node: &str, key: &str, value: &str) -> Result<()> {
        let mut tree = self.lock()?;
        tree.entry(normalize_node(node))
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, node: &str, key: &str) -> Result<()> {
        let mut tree = self.lock()?;
        if let Some(entries) = tree.get_mut(&normalize_node(node)) {
            entries.remove(key);
        }
        Ok(())
    }

    fn keys(&self, node: &str) -> Result<Vec<String>> {
        let tree = self.lock()?;
        Ok(tree
            .get(&normalize_node(node))
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn children_names(&self, node: &str) -> Result<Vec<String>> {
        let tree = self.lock()?;
        let node = normalize_node(node);
        let prefix = if node.is_empty() {
            String::new()
        } else {
            format!("{node}/")
        };

        let mut names: Vec<String> = tree
            .keys()
            .filter(|path| !path.is_empty() && path.starts_with(&prefix))
            .filter_map(|path| path[prefix.len()..].split('/').next())
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn clear(&self, node: &str) -> Result<()> {
        let mut tree = self.lock()?;
        if let Some(entries) = tree.get_mut(&normalize_node(node)) {
            entries.clear();
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn export_subtree(&self, out: &mut dyn Write) -> Result<()> {
        let tree = self.snapshot()?;
        xml_store::write_tree(&tree, &self.node_path, out)
    }

    fn import_subtree(&self, input: &mut dyn Read) -> Result<()> {
        let incoming = xml_store::read_tree(input, &self.node_path)?;
        self.merge(incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let store = MemoryStore::new();
        store.put("", "a", "1").unwrap();
        assert_eq!(store.get("", "a").unwrap().as_deref(), Some("1"));
        store.remove("", "a").unwrap();
        assert!(store.get("", "a").unwrap().is_none());
    }

    #[test]
    fn test_nodes_are_isolated() {
        let store = MemoryStore::new();
        store.put("", "article", "root").unwrap();
        store.put("bibtexkeypatterns", "article", "[auth]").unwrap();
        assert_eq!(store.get("", "article").unwrap().as_deref(), Some("root"));
        assert_eq!(
            store.get("/bibtexkeypatterns/", "article").unwrap().as_deref(),
            Some("[auth]")
        );
    }

    #[test]
    fn test_children_names() {
        let store = MemoryStore::new();
        store.put("", "x", "1").unwrap();
        store.put("bibtexkeypatterns", "book", "[a]").unwrap();
        store.put("customizedTypes/bibtex", "t", "v").unwrap();
        store.put("customizedTypes/biblatex", "t", "v").unwrap();

        assert_eq!(
            store.children_names("").unwrap(),
            vec!["bibtexkeypatterns".to_string(), "customizedTypes".to_string()]
        );
        assert_eq!(
            store.children_names("customizedTypes").unwrap(),
            vec!["biblatex".to_string(), "bibtex".to_string()]
        );
    }

    #[test]
    fn test_clear_keeps_children() {
        let store = MemoryStore::new();
        store.put("", "x", "1").unwrap();
        store.put("child", "y", "2").unwrap();
        store.clear("").unwrap();
        assert!(store.keys("").unwrap().is_empty());
        assert_eq!(store.keys("child").unwrap(), vec!["y".to_string()]);
    }

    #[test]
    fn test_export_import_round_trip() {
        let store = MemoryStore::new();
        store.put("", "list", "a\\;b;c").unwrap();
        store.put("", "quote", "say \"hi\" & <bye>").unwrap();
        store.put("bibtexkeypatterns", "article", "[auth][year]").unwrap();

        let mut buffer = Vec::new();
        store.export_subtree(&mut buffer).unwrap();

        let restored = MemoryStore::new();
        restored.import_subtree(&mut buffer.as_slice()).unwrap();
        assert_eq!(restored.snapshot().unwrap(), store.snapshot().unwrap());
    }
}
