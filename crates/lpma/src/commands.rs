//! Command handlers.
//!
//! Each handler runs one full pass against the store: load, at most one
//! mutation, save if something changed, then render. Handlers never print;
//! they hand a [`Report`] back to the caller.

use crate::error::{LpmaError, Result};
use crate::format::{Formatter, DESCRIPTION_TITLE, LIST_TITLE};
use crate::project::{key_for, Project, ProjectFields, ProjectPatch};
use crate::store::{Collection, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
  /// One line per project key
  Summary,
  /// Key, tags and pending improvements
  Short,
  /// Every listed field, with resolved paths
  Long,
}

#[derive(Debug, Clone)]
pub enum Command {
  List { mode: ListMode },
  Add { fields: ProjectFields, verbose: bool },
  Describe { key: String },
  Remove { key: String, verbose: bool, ignore_missing: bool },
  Edit { key: String, patch: ProjectPatch, rekey: bool, verbose: bool },
  Init { force: bool },
}

/// A status message for stderr, tagged with the level it is printed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
  /// A mutation went through
  Success(String),
  /// Nothing in the catalog changed
  Info(String),
}

impl Notice {
  pub fn message(&self) -> &str {
    match self {
      Notice::Success(message) | Notice::Info(message) => message,
    }
  }
}

/// What a command produced: lines for stdout, an optional status notice, and
/// an optional failure that did not stop the rendering
#[derive(Debug, Default)]
pub struct Report {
  pub lines: Vec<String>,
  pub notice: Option<Notice>,
  pub failure: Option<LpmaError>,
}

impl Report {
  fn output(lines: Vec<String>) -> Self {
    Self { lines, ..Default::default() }
  }

  fn with_notice(notice: Notice) -> Self {
    Self { notice: Some(notice), ..Default::default() }
  }

  pub fn notice_message(&self) -> Option<&str> {
    self.notice.as_ref().map(Notice::message)
  }

  pub fn is_success(&self) -> bool {
    self.failure.is_none()
  }

  pub fn exit_code(&self) -> i32 {
    if self.is_success() {
      0
    } else {
      1
    }
  }
}

/// The store and formatter every handler works with
#[derive(Debug, Clone)]
pub struct Context {
  pub store: Store,
  pub formatter: Formatter,
}

impl Context {
  pub fn new(store: Store, formatter: Formatter) -> Self {
    Self { store, formatter }
  }
}

pub fn execute(ctx: &Context, command: Command) -> Result<Report> {
  match command {
    Command::List { mode } => list_projects(ctx, mode),
    Command::Add { fields, verbose } => add_project(ctx, fields, verbose),
    Command::Describe { key } => describe_project(ctx, &key),
    Command::Remove { key, verbose, ignore_missing } => {
      remove_project(ctx, &key, verbose, ignore_missing)
    }
    Command::Edit { key, patch, rekey, verbose } => edit_project(ctx, &key, patch, rekey, verbose),
    Command::Init { force } => init_store(ctx, force),
  }
}

/// List every project in the requested level of detail
pub fn list_projects(ctx: &Context, mode: ListMode) -> Result<Report> {
  let collection = ctx.store.load()?;
  Ok(Report::output(listing(ctx, &collection, mode)))
}

/// Add a new project; its key is derived from the name
pub fn add_project(ctx: &Context, fields: ProjectFields, verbose: bool) -> Result<Report> {
  let project = Project::from_fields(fields);
  project.validate()?;
  let key = project.key();

  let mut collection = ctx.store.load()?;
  collection.insert(key.clone(), project)?;
  ctx.store.save(&collection)?;

  let mut report = Report::with_notice(Notice::Success(format!("Project '{key}' added")));
  if verbose {
    report.lines = description(ctx, &collection, &key).lines;
  }
  Ok(report)
}

/// Show every field of one project.
///
/// A missing project still renders the frame; the failure travels in the
/// report.
pub fn describe_project(ctx: &Context, key: &str) -> Result<Report> {
  let collection = ctx.store.load()?;
  Ok(description(ctx, &collection, &key_for(key)))
}

/// Remove a project. With `ignore_missing`, a missing key is a silent no-op
/// and the store is left untouched.
pub fn remove_project(
  ctx: &Context,
  key: &str,
  verbose: bool,
  ignore_missing: bool,
) -> Result<Report> {
  let key = key_for(key);
  let mut collection = ctx.store.load()?;

  if !collection.delete(&key, ignore_missing)? {
    tracing::debug!("project '{}' not found, ignoring", key);
    return Ok(Report::default());
  }
  ctx.store.save(&collection)?;

  let mut report = Report::with_notice(Notice::Success(format!("Project '{key}' removed")));
  if verbose {
    report.lines = listing(ctx, &collection, ListMode::Short);
  }
  Ok(report)
}

/// Merge the given fields into an existing project.
///
/// The key stays the same unless `rekey` is set and the name changes, in
/// which case the project moves to the key of its new name. The verbose view
/// looks the project up by its new name whenever the name changed, so a
/// rename without `rekey` reports NotFound there while the edit itself is
/// saved.
pub fn edit_project(
  ctx: &Context,
  key: &str,
  patch: ProjectPatch,
  rekey: bool,
  verbose: bool,
) -> Result<Report> {
  let key = key_for(key);
  if patch.is_empty() {
    return Err(LpmaError::EmptyEdit { key });
  }
  let new_name = patch.name.clone();

  let mut collection = ctx.store.load()?;
  collection.update(&key, patch)?.validate()?;

  let name_key = new_name.as_deref().map(key_for);
  let stored_key = match &name_key {
    Some(new_key) if rekey => {
      collection.rekey(&key, new_key)?;
      new_key.clone()
    }
    _ => key.clone(),
  };
  ctx.store.save(&collection)?;

  let updated = Notice::Success(format!("Project '{stored_key}' updated"));
  let mut report = Report::with_notice(updated);
  if verbose {
    let described = description(ctx, &collection, name_key.as_deref().unwrap_or(&key));
    report.lines = described.lines;
    report.failure = described.failure;
  }
  Ok(report)
}

/// Create an empty store document if there is none yet
pub fn init_store(ctx: &Context, force: bool) -> Result<Report> {
  let path = ctx.store.path().display().to_string();
  if ctx.store.init(force)? {
    Ok(Report::with_notice(Notice::Info(format!("Created empty project store at {path}"))))
  } else {
    Ok(Report::with_notice(Notice::Info(format!("Project store already exists at {path}"))))
  }
}

fn listing(ctx: &Context, collection: &Collection, mode: ListMode) -> Vec<String> {
  let formatter = &ctx.formatter;
  let body = match mode {
    ListMode::Summary => formatter.summary(collection),
    ListMode::Short => formatter.short(collection),
    ListMode::Long => formatter.long(collection),
  };
  formatter.framed(LIST_TITLE, body)
}

fn description(ctx: &Context, collection: &Collection, key: &str) -> Report {
  let formatter = &ctx.formatter;
  match formatter.describe(collection, key) {
    Ok(body) => Report::output(formatter.framed(DESCRIPTION_TITLE, body)),
    Err(failure) => Report {
      lines: formatter.framed(DESCRIPTION_TITLE, Vec::new()),
      failure: Some(failure),
      ..Default::default()
    },
  }
}
