//! Text rendering for project listings.
//!
//! Everything here is a pure function of its inputs and returns lines
//! without trailing newlines; printing is left to the caller.

use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::project::Project;
use crate::store::Collection;

pub const DEFAULT_LINE_WIDTH: usize = 60;
pub const DEFAULT_LABEL_WIDTH: usize = 20;

pub const LIST_TITLE: &str = "List of all project";
pub const DESCRIPTION_TITLE: &str = "Description";

const TITLE_PADDING: &str = "    ";
const FRAME_CHAR: char = '=';
const SEPARATOR_CHAR: char = '-';

#[derive(Debug, Clone)]
pub struct Formatter {
  line_width: usize,
  label_width: usize,
  cwd: PathBuf,
}

impl Formatter {
  /// `cwd` anchors relative project paths in the long and describe views
  pub fn new(line_width: usize, label_width: usize, cwd: impl Into<PathBuf>) -> Self {
    Self { line_width, label_width, cwd: cwd.into() }
  }

  pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
    Self::new(DEFAULT_LINE_WIDTH, DEFAULT_LABEL_WIDTH, cwd)
  }

  pub fn header(&self, title: &str) -> Vec<String> {
    let title = format!("{TITLE_PADDING}{title}{TITLE_PADDING}");
    vec![String::new(), center(&title, self.line_width, FRAME_CHAR)]
  }

  pub fn footer(&self) -> Vec<String> {
    vec![bentley::banner_line(self.line_width, FRAME_CHAR), String::new()]
  }

  pub fn separator(&self) -> String {
    bentley::banner_line(self.line_width, SEPARATOR_CHAR)
  }

  /// Wrap `body` between a titled header and the footer
  pub fn framed(&self, title: &str, body: Vec<String>) -> Vec<String> {
    let mut lines = self.header(title);
    lines.extend(body);
    lines.extend(self.footer());
    lines
  }

  /// A label padded to the label column, followed by its value
  pub fn field(&self, label: &str, value: &str) -> String {
    format!("{label:<width$}{value}", width = self.label_width)
  }

  /// Resolve a stored path against the working directory, without touching
  /// the filesystem
  pub fn absolute_path(&self, raw: &str) -> PathBuf {
    normalize(&self.cwd.join(raw))
  }

  pub fn summary(&self, collection: &Collection) -> Vec<String> {
    collection.keys().map(|key| format!("- {key}")).collect()
  }

  pub fn short(&self, collection: &Collection) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, project) in collection.iter() {
      lines.push(self.separator());
      lines.push(self.field("ID:", key));
      lines.push(self.field("Type:", &tags(&project.kind)));
      lines.push(self.field("Technology:", &tags(&project.technology)));
      lines.push(self.field("Next Improvement:", &tags(&project.next_improvement)));
    }
    lines
  }

  pub fn long(&self, collection: &Collection) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, project) in collection.iter() {
      lines.push(self.separator());
      lines.push(self.field("ID:", key));
      lines.push(self.field("Project:", &project.name));
      lines.push(self.field("Type:", &tags(&project.kind)));
      lines.push(self.field("Technology:", &tags(&project.technology)));
      lines.push(self.field("Path:", &self.display_path(&project.path)));
      lines.push(self.field("Next Improvement:", &tags(&project.next_improvement)));
    }
    lines
  }

  /// Every field of the project stored under `key`
  pub fn describe(&self, collection: &Collection, key: &str) -> Result<Vec<String>> {
    let project = collection.get(key)?;
    Ok(self.project_lines(key, project))
  }

  fn project_lines(&self, key: &str, project: &Project) -> Vec<String> {
    vec![
      self.field("Project ID:", key),
      self.field("Project Name:", &project.name),
      self.field("Path:", &self.display_path(&project.path)),
      self.field("Technology:", &tags(&project.technology)),
      self.field("Type:", &tags(&project.kind)),
      self.field("Next Improvement:", &tags(&project.next_improvement)),
      self.field("Comment:", &project.comment),
    ]
  }

  fn display_path(&self, raw: &str) -> String {
    self.absolute_path(raw).display().to_string()
  }
}

/// Join tags as `a, b, c`
pub fn tags(values: &[String]) -> String {
  values.join(", ")
}

/// Center `text` in `width` columns of `fill`; with an odd margin on an even
/// width the extra fill goes to the right.
pub fn center(text: &str, width: usize, fill: char) -> String {
  let len = text.chars().count();
  if width <= len {
    return text.to_string();
  }

  let margin = width - len;
  let left = margin / 2 + (margin & width & 1);
  let right = margin - left;

  let fill = fill.to_string();
  format!("{}{}{}", fill.repeat(left), text, fill.repeat(right))
}

fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}
