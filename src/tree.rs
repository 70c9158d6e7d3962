use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};
use thiserror::Error;
use walkdir::WalkDir;

use crate::catalog::CatalogError;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Path does not exist: {0}")]
    NotFound(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One folder of the library snapshot: its children in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderNode {
    children: Vec<(String, FolderNode)>,
}

impl FolderNode {
    pub fn new(children: Vec<(String, FolderNode)>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[(String, FolderNode)] {
        &self.children
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FolderNode> {
        self.children.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Build from a JSON object. Non-object values (e.g. `{"error": "..."}`
    /// entries written for unreadable directories) are skipped.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let children = map
            .iter()
            .filter_map(|(name, child)| {
                if child.is_object() {
                    Some((name.clone(), Self::from_value(child)))
                } else {
                    log::warn!("Skipping non-folder entry {name:?}: {child}");
                    None
                }
            })
            .collect();
        Self { children }
    }

    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .children
            .iter()
            .map(|(name, child)| (name.clone(), child.to_value()))
            .collect();
        Value::Object(map)
    }

    /// Leaf children with the given names (handy for building fixtures).
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            children: names
                .iter()
                .map(|n| (n.to_string(), FolderNode::default()))
                .collect(),
        }
    }

    /// Total number of folders below this node.
    pub fn folder_count(&self) -> usize {
        self.children
            .iter()
            .map(|(_, child)| 1 + child.folder_count())
            .sum()
    }
}

/// Parse a folder-tree JSON document and return the node under `root_key`.
pub fn parse_tree(json: &str, root_key: &str) -> Result<FolderNode, CatalogError> {
    let doc: Value = serde_json::from_str(json)?;
    let root = doc
        .as_object()
        .ok_or(CatalogError::NotAnObject)?
        .get(root_key)
        .ok_or_else(|| CatalogError::MissingRoot(root_key.to_string()))?;
    if !root.is_object() {
        return Err(CatalogError::NotAnObject);
    }
    Ok(FolderNode::from_value(root))
}

/// Read and parse a folder-tree JSON file.
pub fn load_tree(path: &Path, root_key: &str) -> Result<FolderNode, CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_tree(&json, root_key)
}

/// Build the folder-tree document for a directory on disk: directories only,
/// hidden entries and names in `ignore` skipped, wrapped under the
/// directory's own basename. Unreadable directories become `{"error": msg}`.
pub fn snapshot_dir(path: &Path, ignore: &[String]) -> Result<Value, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::NotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(SnapshotError::NotADirectory(path.display().to_string()));
    }

    let root = path.canonicalize()?;
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} folders {msg}")
            .unwrap()
            .tick_chars("/|\\- "),
    );

    let mut tree = Map::new();
    let walker = WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !ignore.iter().any(|i| *i == name)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Record unreadable directories where they sit in the tree
                if let Some(p) = e.path() {
                    if let Ok(rel) = p.strip_prefix(&root) {
                        log::warn!("Cannot read {}: {}", p.display(), e);
                        let components = components_of(rel);
                        if let Some(slot) = insert_path(&mut tree, &components) {
                            *slot = serde_json::json!({ "error": e.to_string() });
                        }
                    }
                }
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        insert_path(&mut tree, &components_of(rel));
        pb.inc(1);
    }

    pb.finish_with_message("done");

    let mut doc = Map::new();
    doc.insert(root_name, Value::Object(tree));
    Ok(Value::Object(doc))
}

fn components_of(rel: &Path) -> Vec<String> {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect()
}

/// Make sure every folder on `components` exists, returning the last one.
fn insert_path<'a>(
    tree: &'a mut Map<String, Value>,
    components: &[String],
) -> Option<&'a mut Value> {
    let (last, parents) = components.split_last()?;
    let mut current = tree;
    for comp in parents {
        let next = current
            .entry(comp.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = next.as_object_mut()?;
    }
    Some(
        current
            .entry(last.clone())
            .or_insert_with(|| Value::Object(Map::new())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_order_and_nesting() {
        let json = r#"{"Music": {"Metal": {"Zeta": {}, "Alpha (Ger)": {"[1990] X": {}}}}}"#;
        let root = parse_tree(json, "Music").unwrap();
        assert_eq!(root.len(), 1);
        let metal = root.get("Metal").unwrap();
        assert_eq!(metal.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha (Ger)"]);
        assert_eq!(metal.get("Alpha (Ger)").unwrap().len(), 1);
        assert_eq!(root.folder_count(), 4);
    }

    #[test]
    fn missing_root_key_is_an_error() {
        let err = parse_tree(r#"{"Other": {}}"#, "Music").unwrap_err();
        assert!(matches!(err, CatalogError::MissingRoot(ref k) if k == "Music"));
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(matches!(parse_tree("[1, 2]", "Music"), Err(CatalogError::NotAnObject)));
        assert!(matches!(
            parse_tree(r#"{"Music": "nope"}"#, "Music"),
            Err(CatalogError::NotAnObject)
        ));
        assert!(matches!(parse_tree("{not json", "Music"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn error_entries_are_skipped() {
        let json = r#"{"Music": {"Rock": {"error": "Permission denied", "Band (UK)": {}}}}"#;
        let root = parse_tree(json, "Music").unwrap();
        let rock = root.get("Rock").unwrap();
        assert_eq!(rock.names().collect::<Vec<_>>(), vec!["Band (UK)"]);
    }

    #[test]
    fn value_round_trip_keeps_order() {
        let node = FolderNode::new(vec![
            ("b".into(), FolderNode::from_names(&["y", "x"])),
            ("a".into(), FolderNode::default()),
        ]);
        let back = FolderNode::from_value(&node.to_value());
        assert_eq!(back, node);
    }

    #[test]
    fn snapshot_reads_directories_only() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("Library");
        std::fs::create_dir_all(base.join("Metal/Blind Guardian (Ger)/[1988] Battalions of Fear"))
            .unwrap();
        std::fs::create_dir_all(base.join("Metal/.hidden")).unwrap();
        std::fs::create_dir_all(base.join("Downloads/tmp")).unwrap();
        std::fs::write(base.join("Metal/readme.txt"), "x").unwrap();

        let doc = snapshot_dir(&base, &["Downloads".to_string()]).unwrap();
        let root = FolderNode::from_value(doc.get("Library").unwrap());

        assert_eq!(root.names().collect::<Vec<_>>(), vec!["Metal"]);
        let metal = root.get("Metal").unwrap();
        assert_eq!(metal.names().collect::<Vec<_>>(), vec!["Blind Guardian (Ger)"]);
        let artist = metal.get("Blind Guardian (Ger)").unwrap();
        assert_eq!(artist.names().collect::<Vec<_>>(), vec!["[1988] Battalions of Fear"]);
    }

    #[test]
    fn snapshot_rejects_missing_and_file_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            snapshot_dir(&dir.path().join("nope"), &[]),
            Err(SnapshotError::NotFound(_))
        ));
        assert!(matches!(snapshot_dir(&file, &[]), Err(SnapshotError::NotADirectory(_))));
    }
}
