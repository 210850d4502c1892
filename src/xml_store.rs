//! XML preference documents and the file-backed store
//!
//! Exported documents follow the `preferences.dtd` layout used by the Java
//! preferences API, so files exported by older installations import cleanly:
//!
//! ```xml
//! <preferences EXTERNAL_XML_VERSION="1.0">
//!   <root type="user">
//!     <map/>
//!     <node name="org">
//!       <map/>
//!       <node name="jabref">
//!         <map>
//!           <entry key="mainFontSize" value="14"/>
//!         </map>
//!       </node>
//!     </node>
//!   </root>
//! </preferences>
//! ```

use crate::backing_store::{normalize_node, BackingStore, MemoryStore, PreferenceTree};
use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const DOCTYPE: &str = r#"preferences SYSTEM "http://java.sun.com/dtd/preferences.dtd""#;

#[derive(Debug, Default)]
struct XmlNode {
    entries: BTreeMap<String, String>,
    children: BTreeMap<String, XmlNode>,
}

impl XmlNode {
    fn nest(tree: &PreferenceTree) -> Self {
        let mut root = XmlNode::default();
        for (path, entries) in tree {
            let mut node = &mut root;
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                node = node.children.entry(segment.to_string()).or_default();
            }
            node.entries
                .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        root
    }

    fn wrap_in(self, node_path: &str) -> Self {
        node_path
            .split('/')
            .filter(|s| !s.is_empty())
            .rev()
            .fold(self, |inner, segment| {
                let mut parent = XmlNode::default();
                parent.children.insert(segment.to_string(), inner);
                parent
            })
    }
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::InvalidFormat(e.to_string())
}

/// Serialize `tree`, placed at `node_path`, as a preferences document
pub fn write_tree(tree: &PreferenceTree, node_path: &str, out: &mut dyn Write) -> Result<()> {
    let document = XmlNode::nest(tree).wrap_in(node_path);
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
        .map_err(xml_error)?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("preferences").with_attributes([("EXTERNAL_XML_VERSION", "1.0")]),
        ))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("root").with_attributes([("type", "user")]),
        ))
        .map_err(xml_error)?;

    write_node_contents(&mut writer, &document)?;

    writer
        .write_event(Event::End(BytesEnd::new("root")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("preferences")))
        .map_err(xml_error)?;
    Ok(())
}

/// Escape an attribute value, including whitespace that XML parsers would
/// otherwise normalize to spaces
fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in quick_xml::escape::escape(raw).chars() {
        match c {
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn write_node_contents<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    if node.entries.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new("map")))
            .map_err(xml_error)?;
    } else {
        writer
            .write_event(Event::Start(BytesStart::new("map")))
            .map_err(xml_error)?;
        for (key, value) in &node.entries {
            let key = escape_attribute(key);
            let value = escape_attribute(value);
            let entry = BytesStart::new("entry").with_attributes([
                ("key".as_bytes(), key.as_bytes()),
                ("value".as_bytes(), value.as_bytes()),
            ]);
            writer.write_event(Event::Empty(entry)).map_err(xml_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("map")))
            .map_err(xml_error)?;
    }

    for (name, child) in &node.children {
        let name = escape_attribute(name);
        writer
            .write_event(Event::Start(
                BytesStart::new("node").with_attributes([("name".as_bytes(), name.as_bytes())]),
            ))
            .map_err(xml_error)?;
        write_node_contents(writer, child)?;
        writer
            .write_event(Event::End(BytesEnd::new("node")))
            .map_err(xml_error)?;
    }
    Ok(())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned()));
        }
    }
    Ok(None)
}

fn relative_to(absolute: &str, node_path: &str) -> Option<String> {
    if node_path.is_empty() {
        return Some(absolute.to_string());
    }
    if absolute == node_path {
        return Some(String::new());
    }
    absolute
        .strip_prefix(node_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(str::to_string)
}

/// Parse a preferences document, keeping only the subtree at `node_path`
///
/// Node paths in the result are relative to `node_path`. Entries outside that
/// subtree are skipped.
pub fn read_tree(input: &mut dyn Read, node_path: &str) -> Result<PreferenceTree> {
    let mut content = String::new();
    input.read_to_string(&mut content)?;

    let node_path = normalize_node(node_path);
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let mut tree = PreferenceTree::new();
    let mut stack: Vec<String> = Vec::new();
    let mut seen_preferences = false;
    let mut skipped = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"preferences" => seen_preferences = true,
                b"root" => stack.clear(),
                b"node" => {
                    let name = attribute(&e, "name")?
                        .ok_or_else(|| xml_error("<node> without a name attribute"))?;
                    stack.push(name);
                    if let Some(path) = relative_to(&stack.join("/"), &node_path) {
                        tree.entry(path).or_default();
                    }
                }
                b"entry" => {
                    insert_entry(&e, &stack, &node_path, &mut tree, &mut skipped)?;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"entry" => {
                    insert_entry(&e, &stack, &node_path, &mut tree, &mut skipped)?;
                }
                b"node" => {
                    let name = attribute(&e, "name")?
                        .ok_or_else(|| xml_error("<node> without a name attribute"))?;
                    let absolute = if stack.is_empty() {
                        name
                    } else {
                        format!("{}/{}", stack.join("/"), name)
                    };
                    if let Some(path) = relative_to(&absolute, &node_path) {
                        tree.entry(path).or_default();
                    }
                }
                _ => {}
            },
            Event::End(e) => {
                if e.name().as_ref() == b"node" {
                    stack.pop();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_preferences {
        return Err(xml_error("missing <preferences> element"));
    }
    if skipped > 0 {
        debug!(skipped, node_path = %node_path, "ignored entries outside the application node");
    }

    Ok(tree)
}

fn insert_entry(
    element: &BytesStart<'_>,
    stack: &[String],
    node_path: &str,
    tree: &mut PreferenceTree,
    skipped: &mut usize,
) -> Result<()> {
    let key =
        attribute(element, "key")?.ok_or_else(|| xml_error("<entry> without a key attribute"))?;
    let value = attribute(element, "value")?.unwrap_or_default();
    match relative_to(&stack.join("/"), node_path) {
        Some(path) => {
            tree.entry(path).or_default().insert(key, value);
        }
        None => *skipped += 1,
    }
    Ok(())
}

/// Export every preference of `store` to `path`
pub fn export_to_file(store: &dyn BackingStore, path: &Path) -> Result<()> {
    let export_error = |message: String| Error::Export {
        path: path.to_path_buf(),
        message,
    };
    let file = File::create(path).map_err(|e| export_error(e.to_string()))?;
    let mut out = BufWriter::new(file);
    store
        .export_subtree(&mut out)
        .map_err(|e| export_error(e.to_string()))?;
    out.flush().map_err(|e| export_error(e.to_string()))?;
    info!(path = %path.display(), "exported preferences");
    Ok(())
}

/// Merge the preferences stored in `path` into `store`
pub fn import_from_file(store: &dyn BackingStore, path: &Path) -> Result<()> {
    let import_error = |message: String| Error::Import {
        path: path.to_path_buf(),
        message,
    };
    let mut file = File::open(path).map_err(|e| import_error(e.to_string()))?;
    store
        .import_subtree(&mut file)
        .map_err(|e| import_error(e.to_string()))?;
    info!(path = %path.display(), "imported preferences");
    Ok(())
}

/// [`BackingStore`] persisted as a preferences XML file
///
/// Reads and writes go to an in-memory tree; [`flush`](BackingStore::flush)
/// replaces the file atomically through a temporary file in the same
/// directory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open the store at `path`, loading it when the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_node_path(path, crate::backing_store::DEFAULT_NODE_PATH)
    }

    pub fn open_with_node_path(path: impl Into<PathBuf>, node_path: &str) -> Result<Self> {
        let path = path.into();
        let inner = MemoryStore::with_node_path(node_path);
        if path.exists() {
            let mut file = File::open(&path)?;
            let tree = read_tree(&mut file, inner.node_path())?;
            inner.merge(tree)?;
            debug!(path = %path.display(), "loaded preference file");
        }
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackingStore for FileStore {
    fn get(&self, node: &str, key: &str) -> Result<Option<String>> {
        self.inner.get(node, key)
    }

    fn put(&self, node: &str, key: &str, value: &str) -> Result<()> {
        self.inner.put(node, key, value)
    }

    fn remove(&self, node: &str, key: &str) -> Result<()> {
        self.inner.remove(node, key)
    }

    fn keys(&self, node: &str) -> Result<Vec<String>> {
        self.inner.keys(node)
    }

    fn children_names(&self, node: &str) -> Result<Vec<String>> {
        self.inner.children_names(node)
    }

    fn clear(&self, node: &str) -> Result<()> {
        self.inner.clear(node)
    }

    fn flush(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            self.inner.export_subtree(&mut out)?;
            out.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!(path = %self.path.display(), "flushed preference file");
        Ok(())
    }

    fn export_subtree(&self, out: &mut dyn Write) -> Result<()> {
        self.inner.export_subtree(out)
    }

    fn import_subtree(&self, input: &mut dyn Read) -> Result<()> {
        self.inner.import_subtree(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(entries: &[(&str, &str, &str)]) -> PreferenceTree {
        let mut tree = PreferenceTree::new();
        for (node, key, value) in entries {
            tree.entry(node.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
        tree
    }

    #[test]
    fn test_document_layout() {
        let mut out = Vec::new();
        write_tree(&tree(&[("", "mainFontSize", "14")]), "org/jabref", &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(xml.contains("<!DOCTYPE preferences SYSTEM \"http://java.sun.com/dtd/preferences.dtd\">"));
        assert!(xml.contains("<preferences EXTERNAL_XML_VERSION=\"1.0\">"));
        assert!(xml.contains("<root type=\"user\">"));
        assert!(xml.contains("<node name=\"org\">"));
        assert!(xml.contains("<node name=\"jabref\">"));
        assert!(xml.contains("<entry key=\"mainFontSize\" value=\"14\"/>"));
    }

    #[test]
    fn test_reads_java_export() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE preferences SYSTEM "http://java.sun.com/dtd/preferences.dtd">
<preferences EXTERNAL_XML_VERSION="1.0">
  <root type="user">
    <map/>
    <node name="org">
      <map/>
      <node name="jabref">
        <map>
          <entry key="defaultOwner" value="bob"/>
          <entry key="columns" value="a\;b;c &amp; d"/>
        </map>
        <node name="bibtexkeypatterns">
          <map>
            <entry key="article" value="[auth][year]"/>
          </map>
        </node>
      </node>
      <node name="other">
        <map>
          <entry key="foreign" value="1"/>
        </map>
      </node>
    </node>
  </root>
</preferences>"#;

        let tree = read_tree(&mut xml.as_bytes(), "org/jabref").unwrap();
        assert_eq!(tree[""]["defaultOwner"], "bob");
        assert_eq!(tree[""]["columns"], "a\\;b;c & d");
        assert_eq!(tree["bibtexkeypatterns"]["article"], "[auth][year]");
        assert!(tree.values().all(|entries| !entries.contains_key("foreign")));
    }

    #[test]
    fn test_multi_line_values_use_character_references() {
        let cleanups = "title[lower_case]\nauthor[normalize_names]\r\tpages";
        let source = tree(&[("", "fieldFormatterCleanups", cleanups), ("", "plain", "a<b")]);

        let mut out = Vec::new();
        write_tree(&source, "org/jabref", &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("title[lower_case]&#10;author[normalize_names]&#13;&#9;pages"));
        assert!(xml.contains("a&lt;b"));
        assert!(!xml.contains("lower_case]\n"));

        let read = read_tree(&mut xml.as_bytes(), "org/jabref").unwrap();
        assert_eq!(read, source);
    }

    #[test]
    fn test_rejects_non_preferences_document() {
        let result = read_tree(&mut "<settings/>".as_bytes(), "org/jabref");
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_file_store_persists_on_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs").join("preferences.xml");

        let store = FileStore::open(&path).unwrap();
        store.put("", "mainFontSize", "14").unwrap();
        assert!(!path.exists());
        store.flush().unwrap();
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("", "mainFontSize").unwrap().as_deref(), Some("14"));
    }

    #[test]
    fn test_export_import_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.xml");

        let source = MemoryStore::new();
        source.put("", "k", "v").unwrap();
        export_to_file(&source, &path).unwrap();

        let target = MemoryStore::new();
        target.put("", "other", "kept").unwrap();
        import_from_file(&target, &path).unwrap();
        assert_eq!(target.get("", "k").unwrap().as_deref(), Some("v"));
        assert_eq!(target.get("", "other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_import_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xml");
        let err = import_from_file(&MemoryStore::new(), &path).unwrap_err();
        assert!(matches!(err, Error::Import { .. }));
    }
}
