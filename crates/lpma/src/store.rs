//! The project store: one JSON document holding every project, keyed by
//! project key.
//!
//! The document is always read and written whole. A mutating command loads
//! the [`Collection`], changes it in memory and hands it back to
//! [`Store::save`], which replaces the file content. Nothing guards against a
//! second process writing in between: the last save wins.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{LpmaError, Result};
use crate::project::{Project, ProjectPatch};

/// Every project in the store, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
  entries: Vec<(String, Project)>,
}

impl Collection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn contains(&self, key: &str) -> bool {
    self.position(key).is_some()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(key, _)| key.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Project)> {
    self.entries.iter().map(|(key, project)| (key.as_str(), project))
  }

  pub fn get(&self, key: &str) -> Result<&Project> {
    self
      .position(key)
      .map(|index| &self.entries[index].1)
      .ok_or_else(|| LpmaError::not_found(key))
  }

  /// Add a project under `key`; new keys go to the end of the document
  pub fn insert(&mut self, key: impl Into<String>, project: Project) -> Result<()> {
    let key = key.into();
    if self.contains(&key) {
      return Err(LpmaError::already_exists(key));
    }
    self.entries.push((key, project));
    Ok(())
  }

  /// Merge the fields present in `patch` into the project stored under `key`
  pub fn update(&mut self, key: &str, patch: ProjectPatch) -> Result<&Project> {
    let index = self.position(key).ok_or_else(|| LpmaError::not_found(key))?;
    let project = &mut self.entries[index].1;
    patch.apply(project);
    Ok(project)
  }

  /// Remove the project under `key`.
  ///
  /// Returns `Ok(false)` when the key is missing and `ignore_missing` is set.
  pub fn delete(&mut self, key: &str, ignore_missing: bool) -> Result<bool> {
    match self.position(key) {
      Some(index) => {
        self.entries.remove(index);
        Ok(true)
      }
      None if ignore_missing => Ok(false),
      None => Err(LpmaError::not_found(key)),
    }
  }

  /// Move a project to a new key, keeping its place in the document
  pub fn rekey(&mut self, old_key: &str, new_key: &str) -> Result<()> {
    let index = self.position(old_key).ok_or_else(|| LpmaError::not_found(old_key))?;
    if old_key == new_key {
      return Ok(());
    }
    if self.contains(new_key) {
      return Err(LpmaError::already_exists(new_key));
    }
    self.entries[index].0 = new_key.to_string();
    Ok(())
  }

  fn position(&self, key: &str) -> Option<usize> {
    self.entries.iter().position(|(existing, _)| existing == key)
  }
}

impl Serialize for Collection {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (key, project) in &self.entries {
      map.serialize_entry(key, project)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for Collection {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct CollectionVisitor;

    impl<'de> Visitor<'de> for CollectionVisitor {
      type Value = Collection;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object mapping project keys to projects")
      }

      fn visit_map<A>(self, mut access: A) -> std::result::Result<Collection, A::Error>
      where
        A: MapAccess<'de>,
      {
        let mut collection = Collection::new();
        while let Some((key, stored)) = access.next_entry::<String, StoredProject>()? {
          if !stored.unknown.is_empty() {
            let fields: Vec<&str> = stored.unknown.keys().map(String::as_str).collect();
            tracing::warn!(
              "project '{}' has unknown fields that the next save drops: {}",
              key,
              fields.join(", ")
            );
          }
          let project = stored.project;
          // A repeated key keeps its first position and its last value
          match collection.position(&key) {
            Some(index) => collection.entries[index].1 = project,
            None => collection.entries.push((key, project)),
          }
        }
        Ok(collection)
      }
    }

    deserializer.deserialize_map(CollectionVisitor)
  }
}

/// A record as read from the document, with whatever fields [`Project`] does
/// not know kept aside
#[derive(Deserialize)]
struct StoredProject {
  #[serde(flatten)]
  project: Project,
  #[serde(flatten)]
  unknown: BTreeMap<String, serde_json::Value>,
}

/// Handle on the JSON document backing a [`Collection`]
#[derive(Debug, Clone)]
pub struct Store {
  path: PathBuf,
}

impl Store {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn exists(&self) -> bool {
    self.path.exists()
  }

  /// Read and parse the whole document
  pub fn load(&self) -> Result<Collection> {
    let content = fs::read_to_string(&self.path).map_err(|e| LpmaError::io(&self.path, e))?;
    let collection: Collection = serde_json::from_str(&content)
      .map_err(|source| LpmaError::Parse { path: self.path.clone(), source })?;

    tracing::debug!("loaded {} projects from {}", collection.len(), self.path.display());
    Ok(collection)
  }

  /// Replace the document with `collection`.
  ///
  /// The store file is truncated and rewritten in place, so a symlinked store
  /// keeps its link and the target keeps its permissions.
  pub fn save(&self, collection: &Collection) -> Result<()> {
    let content = serde_json::to_string_pretty(collection)
      .map_err(|source| LpmaError::Serialize { path: self.path.clone(), source })?;

    let mut file = OpenOptions::new()
      .write(true)
      .create(true)
      .truncate(true)
      .open(&self.path)
      .map_err(|e| LpmaError::io(&self.path, e))?;
    file.write_all(content.as_bytes()).map_err(|e| LpmaError::io(&self.path, e))?;

    tracing::debug!("saved {} projects to {}", collection.len(), self.path.display());
    Ok(())
  }

  /// Create an empty document, along with its directory.
  ///
  /// An existing document is only replaced when `force` is set. Returns
  /// whether anything was written.
  pub fn init(&self, force: bool) -> Result<bool> {
    if self.exists() && !force {
      return Ok(false);
    }

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(|e| LpmaError::io(parent, e))?;
    }

    self.save(&Collection::new())?;
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn project(name: &str) -> Project {
    Project { name: name.to_string(), path: format!("/tmp/{name}"), ..Default::default() }
  }

  fn store_with(content: &str) -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, content).unwrap();
    (temp_dir, Store::new(path))
  }

  #[test]
  fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::new(temp_dir.path().join("absent.json"));

    assert!(matches!(store.load(), Err(LpmaError::Io { .. })));
  }

  #[test]
  fn test_load_rejects_non_object_documents() {
    for content in ["not json", "[]", r#"{"foo": 3}"#, ""] {
      let (_temp, store) = store_with(content);
      assert!(matches!(store.load(), Err(LpmaError::Parse { .. })), "accepted {content:?}");
    }
  }

  #[test]
  fn test_load_preserves_document_order() {
    let (_temp, store) = store_with(
      r#"{"zeta": {"name": "Zeta"}, "alpha": {"name": "Alpha"}, "mid": {"name": "Mid"}}"#,
    );

    let collection = store.load().unwrap();
    let keys: Vec<&str> = collection.keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
  }

  #[test]
  fn test_save_load_round_trip_keeps_content() {
    let (_temp, store) = store_with(
      r#"{"b": {"name": "B", "path": "/b", "type": ["cli"], "technology": ["rust", "clap"], "nextImprovement": ["docs"], "comment": "hi"},
          "a": {"name": "A", "path": "/a", "type": [], "technology": [], "nextImprovement": [], "comment": ""}}"#,
    );

    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();
    let reloaded = store.load().unwrap();

    assert_eq!(loaded, reloaded);
    assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(reloaded.get("b").unwrap().technology, vec!["rust", "clap"]);
  }

  #[test]
  fn test_save_replaces_previous_content() {
    let (_temp, store) = store_with(r#"{"old": {"name": "Old"}}"#);

    let mut collection = Collection::new();
    collection.insert("new", project("New")).unwrap();
    store.save(&collection).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert!(!content.contains("old"));
    assert!(content.contains("\"new\""));
  }

  #[cfg(unix)]
  #[test]
  fn test_save_writes_through_symlinked_store() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("real.json");
    let link = temp_dir.path().join("data.json");
    fs::write(&target, "{}").unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let store = Store::new(&link);
    let mut collection = store.load().unwrap();
    collection.insert("foo", project("Foo")).unwrap();
    store.save(&collection).unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert!(Store::new(&target).load().unwrap().contains("foo"));
  }

  #[cfg(unix)]
  #[test]
  fn test_save_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, store) = store_with("{}");
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o600)).unwrap();

    store.save(&Collection::new()).unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }

  #[test]
  fn test_save_writes_all_six_fields() {
    let (_temp, store) = store_with("{}");
    let mut collection = Collection::new();
    collection.insert("foo", project("Foo")).unwrap();
    store.save(&collection).unwrap();

    let value: serde_json::Value =
      serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    let record = value["foo"].as_object().unwrap();
    assert_eq!(record.len(), 6);
    assert_eq!(record["nextImprovement"], serde_json::json!([]));
    assert_eq!(record["comment"], serde_json::json!(""));
  }

  #[test]
  fn test_unknown_fields_are_read_but_not_saved() {
    let (_temp, store) = store_with(
      r#"{"foo": {"name": "Foo", "path": "/tmp", "stars": 5, "owner": {"login": "me"}}}"#,
    );

    let collection = store.load().unwrap();
    assert_eq!(collection.get("foo").unwrap().name, "Foo");

    store.save(&collection).unwrap();
    let content = fs::read_to_string(store.path()).unwrap();
    assert!(!content.contains("stars"));
    assert!(!content.contains("owner"));
    assert_eq!(store.load().unwrap(), collection);
  }

  #[test]
  fn test_insert_rejects_existing_key() {
    let mut collection = Collection::new();
    collection.insert("foo", project("Foo")).unwrap();

    let result = collection.insert("foo", project("FOO"));
    assert!(matches!(result, Err(LpmaError::AlreadyExists { ref key }) if key == "foo"));
    assert_eq!(collection.get("foo").unwrap().name, "Foo");
  }

  #[test]
  fn test_update_missing_key_is_not_found() {
    let mut collection = Collection::new();
    let result = collection.update("ghost", ProjectPatch::default());
    assert!(result.unwrap_err().is_not_found());
  }

  #[test]
  fn test_delete_respects_ignore_missing() {
    let mut collection = Collection::new();
    collection.insert("foo", project("Foo")).unwrap();

    assert!(collection.delete("ghost", false).unwrap_err().is_not_found());
    assert!(!collection.delete("ghost", true).unwrap());
    assert!(collection.delete("foo", false).unwrap());
    assert!(collection.is_empty());
  }

  #[test]
  fn test_rekey_keeps_position_and_refuses_collisions() {
    let mut collection = Collection::new();
    collection.insert("a", project("A")).unwrap();
    collection.insert("b", project("B")).unwrap();
    collection.insert("c", project("C")).unwrap();

    collection.rekey("b", "bee").unwrap();
    assert_eq!(collection.keys().collect::<Vec<_>>(), vec!["a", "bee", "c"]);

    assert!(matches!(collection.rekey("a", "c"), Err(LpmaError::AlreadyExists { .. })));
    assert!(collection.rekey("ghost", "x").unwrap_err().is_not_found());
  }

  #[test]
  fn test_init_creates_empty_document_once() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::new(temp_dir.path().join("state").join("lpma").join("data.json"));

    assert!(store.init(false).unwrap());
    assert!(store.load().unwrap().is_empty());

    let mut collection = Collection::new();
    collection.insert("foo", project("Foo")).unwrap();
    store.save(&collection).unwrap();

    assert!(!store.init(false).unwrap());
    assert_eq!(store.load().unwrap().len(), 1);

    assert!(store.init(true).unwrap());
    assert!(store.load().unwrap().is_empty());
  }
}
