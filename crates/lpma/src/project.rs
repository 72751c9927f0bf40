//! Project records and the rules that shape them.
//!
//! Every optional input is normalized exactly once, in [`Project::from_fields`]
//! or while deserializing, so the rest of the crate never deals with absent
//! values.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LpmaError, Result};

/// Derive the store key for a project name
pub fn key_for(name: &str) -> String {
  name.to_lowercase()
}

/// A cataloged project as stored in the data file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
  #[serde(default, deserialize_with = "text_or_null")]
  pub name: String,
  #[serde(default, deserialize_with = "text_or_null")]
  pub path: String,
  #[serde(rename = "type", default, deserialize_with = "tags_or_text")]
  pub kind: Vec<String>,
  #[serde(default, deserialize_with = "tags_or_text")]
  pub technology: Vec<String>,
  #[serde(rename = "nextImprovement", default, deserialize_with = "tags_or_text")]
  pub next_improvement: Vec<String>,
  #[serde(default, deserialize_with = "text_or_null")]
  pub comment: String,
}

/// Raw field values for a new project, as handed over by the command line
#[derive(Debug, Clone, Default)]
pub struct ProjectFields {
  pub name: String,
  pub path: String,
  pub kind: Option<Vec<String>>,
  pub technology: Option<Vec<String>>,
  pub next_improvement: Option<Vec<String>>,
  pub comment: Option<String>,
}

/// A partial update: only the `Some` fields are merged into a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
  pub name: Option<String>,
  pub path: Option<String>,
  pub kind: Option<Vec<String>>,
  pub technology: Option<Vec<String>>,
  pub next_improvement: Option<Vec<String>>,
  pub comment: Option<String>,
}

impl Project {
  pub fn from_fields(fields: ProjectFields) -> Self {
    Self {
      name: fields.name,
      path: fields.path,
      kind: fields.kind.unwrap_or_default(),
      technology: fields.technology.unwrap_or_default(),
      next_improvement: fields.next_improvement.unwrap_or_default(),
      comment: fields.comment.unwrap_or_default(),
    }
  }

  /// The key this project would get if it were added now
  pub fn key(&self) -> String {
    key_for(&self.name)
  }

  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(LpmaError::InvalidField {
        field: "name",
        reason: "project name cannot be empty".to_string(),
      });
    }
    Ok(())
  }
}

impl ProjectPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.path.is_none()
      && self.kind.is_none()
      && self.technology.is_none()
      && self.next_improvement.is_none()
      && self.comment.is_none()
  }

  /// Merge the provided fields into `project`, leaving the others untouched
  pub fn apply(self, project: &mut Project) {
    if let Some(name) = self.name {
      project.name = name;
    }
    if let Some(path) = self.path {
      project.path = path;
    }
    if let Some(kind) = self.kind {
      project.kind = kind;
    }
    if let Some(technology) = self.technology {
      project.technology = technology;
    }
    if let Some(next_improvement) = self.next_improvement {
      project.next_improvement = next_improvement;
    }
    if let Some(comment) = self.comment {
      project.comment = comment;
    }
  }
}

fn text_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Older documents sometimes hold a bare string where a list belongs.
fn tags_or_text<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Tags {
    List(Vec<String>),
    Text(String),
  }

  Ok(match Option::<Tags>::deserialize(deserializer)? {
    Some(Tags::List(tags)) => tags,
    Some(Tags::Text(text)) if text.is_empty() => Vec::new(),
    Some(Tags::Text(text)) => {
      tracing::warn!("coercing text field {:?} into a single-element list", text);
      vec![text]
    }
    None => Vec::new(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_key_is_lowercased_name() {
    assert_eq!(key_for("MyProject"), "myproject");
    assert_eq!(key_for("already lower"), "already lower");
  }

  #[test]
  fn test_from_fields_normalizes_missing_optionals() {
    let project = Project::from_fields(ProjectFields {
      name: "Foo".to_string(),
      path: "/tmp/foo".to_string(),
      ..Default::default()
    });

    assert_eq!(project.name, "Foo");
    assert_eq!(project.path, "/tmp/foo");
    assert!(project.kind.is_empty());
    assert!(project.technology.is_empty());
    assert!(project.next_improvement.is_empty());
    assert_eq!(project.comment, "");
    assert_eq!(project.key(), "foo");
  }

  #[test]
  fn test_validate_rejects_blank_name() {
    let project = Project { name: "   ".to_string(), ..Default::default() };
    assert!(matches!(project.validate(), Err(LpmaError::InvalidField { field: "name", .. })));
  }

  #[test]
  fn test_patch_only_touches_given_fields() {
    let mut project = Project {
      name: "Foo".to_string(),
      path: "/tmp".to_string(),
      kind: vec!["cli".to_string()],
      technology: vec!["rust".to_string()],
      next_improvement: vec!["tests".to_string()],
      comment: "old".to_string(),
    };
    let before = project.clone();

    ProjectPatch { comment: Some("new".to_string()), ..Default::default() }.apply(&mut project);

    assert_eq!(project.comment, "new");
    assert_eq!(Project { comment: "new".to_string(), ..before }, project);
  }

  #[test]
  fn test_deserialize_fills_absent_and_null_fields() {
    let project: Project =
      serde_json::from_str(r#"{"name": "Foo", "path": null, "type": null}"#).unwrap();

    assert_eq!(project.name, "Foo");
    assert_eq!(project.path, "");
    assert!(project.kind.is_empty());
    assert!(project.technology.is_empty());
    assert!(project.next_improvement.is_empty());
    assert_eq!(project.comment, "");
  }

  #[test]
  fn test_deserialize_accepts_text_in_list_fields() {
    let project: Project = serde_json::from_str(
      r#"{"name": "Foo", "path": "/tmp", "type": [], "technology": "rust", "nextImprovement": "", "comment": ""}"#,
    )
    .unwrap();

    assert_eq!(project.technology, vec!["rust"]);
    assert!(project.next_improvement.is_empty());
  }

  #[test]
  fn test_serialize_uses_document_field_names() {
    let project = Project { name: "Foo".to_string(), ..Default::default() };
    let value = serde_json::to_value(&project).unwrap();
    let object = value.as_object().unwrap();

    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 6);
    for field in ["name", "path", "type", "technology", "nextImprovement", "comment"] {
      assert!(object.contains_key(field), "missing {field}");
    }
    assert_eq!(object["type"], serde_json::json!([]));
  }
}
