//! lpma - Local Project Manager
//!
//! Catalogs local programming projects in a single JSON document and renders
//! them as summary, short or long listings.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod project;
pub mod store;

pub use commands::{execute, Command, Context, ListMode, Notice, Report};
pub use error::{LpmaError, Result};
