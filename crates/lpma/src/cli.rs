use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{Command, ListMode};
use crate::project::{ProjectFields, ProjectPatch};

/// Local Project Manager (lpma) handles your local programming projects.
#[derive(Parser)]
#[command(name = "lpma")]
#[command(about = "Local Project Manager - catalog your local programming projects")]
#[command(after_help = "Handle all your local coding projects :)")]
#[command(version)]
pub struct Cli {
  /// Project store to use instead of the per-user default
  #[arg(long, global = true, env = "LPMA_DATA_FILE", value_name = "PATH")]
  pub file: Option<PathBuf>,

  /// Configuration file to use instead of the per-user default
  #[arg(long, global = true, env = "LPMA_CONFIG", value_name = "PATH")]
  pub config: Option<PathBuf>,

  /// Print diagnostic logs to stderr
  #[arg(long, global = true)]
  pub debug: bool,

  #[command(subcommand)]
  pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
  /// List all projects
  List {
    /// List projects in long format
    #[arg(short, long)]
    long: bool,
    /// List project keys only
    #[arg(short, long)]
    short: bool,
  },
  /// Add a project
  Add {
    /// Name of the project; its lowercase form becomes the project ID
    #[arg(short, long)]
    name: String,
    /// Local path
    #[arg(short, long)]
    path: String,
    /// Type of the project (e.g. design, database, cli). Can be repeated
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    kind: Option<Vec<String>>,
    /// Technology, framework or library used (e.g. NextJS, Unity, C/C++). Can be repeated
    #[arg(short = 'T', long)]
    technology: Option<Vec<String>>,
    /// Further improvement to be done or issue to be fixed. Can be repeated
    #[arg(short = 'i', long = "nextImprovement", value_name = "IMPROVEMENT")]
    next_improvement: Option<Vec<String>>,
    /// Comments about the project
    #[arg(short, long)]
    comment: Option<String>,
    /// Print the project description after it is added
    #[arg(short, long)]
    verbose: bool,
  },
  /// Print a project description
  Desc {
    /// ID of the project
    id: String,
  },
  /// Remove a project
  Rm {
    /// ID of the project
    id: String,
    /// Show the remaining projects after deletion
    #[arg(short, long)]
    verbose: bool,
    /// Show no error if the project doesn't exist
    #[arg(short, long)]
    ignore: bool,
  },
  /// Edit a project
  Edit {
    /// ID of the project
    id: String,
    /// New name
    #[arg(short, long)]
    name: Option<String>,
    /// Local path
    #[arg(short, long)]
    path: Option<String>,
    /// Type of the project, replacing the current list. Can be repeated
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    kind: Option<Vec<String>>,
    /// Technology, framework or library used, replacing the current list. Can be repeated
    #[arg(short = 'T', long)]
    technology: Option<Vec<String>>,
    /// Further improvements, replacing the current list. Can be repeated
    #[arg(short = 'i', long = "nextImprovement", value_name = "IMPROVEMENT")]
    next_improvement: Option<Vec<String>>,
    /// Comments about the project
    #[arg(short, long)]
    comment: Option<String>,
    /// Move the project to the ID derived from its new name
    #[arg(long, requires = "name")]
    rekey: bool,
    /// Print the project description after it is edited
    #[arg(short, long)]
    verbose: bool,
  },
  /// Create an empty project store
  Init {
    /// Replace an existing store with an empty one
    #[arg(short, long)]
    force: bool,
  },
}

impl Commands {
  /// Turn parsed arguments into the command value the handlers take
  pub fn into_command(self) -> Command {
    match self {
      Commands::List { long, short } => {
        let mode = if short {
          ListMode::Summary
        } else if long {
          ListMode::Long
        } else {
          ListMode::Short
        };
        Command::List { mode }
      }
      Commands::Add { name, path, kind, technology, next_improvement, comment, verbose } => {
        Command::Add {
          fields: ProjectFields { name, path, kind, technology, next_improvement, comment },
          verbose,
        }
      }
      Commands::Desc { id } => Command::Describe { key: id },
      Commands::Rm { id, verbose, ignore } => {
        Command::Remove { key: id, verbose, ignore_missing: ignore }
      }
      Commands::Edit {
        id,
        name,
        path,
        kind,
        technology,
        next_improvement,
        comment,
        rekey,
        verbose,
      } => Command::Edit {
        key: id,
        patch: ProjectPatch { name, path, kind, technology, next_improvement, comment },
        rekey,
        verbose,
      },
      Commands::Init { force } => Command::Init { force },
    }
  }
}
