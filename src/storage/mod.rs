//! # Storage Layer
//!
//! Persistence layer for Party Roster with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Roster | JSONL (one character per line, roster order) | `.party/roster.jsonl` |
//! | Config | TOML | `.party/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - A [`RosterSession`] holds an exclusive `fs2` lock on `.party/roster.lock`
//!   from load to drop, so concurrent commands apply one after the other
//! - Writes are atomic (per-process temp file + rename); readers never see a
//!   partial snapshot
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a roster project
//! - [`RosterFile`] - Read/write the roster snapshot as JSONL
//! - [`RosterSession`] - A roster store that saves after every change
//! - [`ProjectConfig`] / [`UserConfig`] - Project and per-user settings

mod config;
mod jsonl;
mod project;
mod session;

pub use config::{
    ConfigError, OutputFormat, ProjectConfig, UserConfig, PROJECT_DIR_ENV,
};
pub use jsonl::{RosterFile, RosterLock};
pub use project::{starter_party, Project, ProjectError};
pub use session::{Commit, RosterPersistence, RosterSession};
