//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting. The CLI is the
//! presentation layer over [`crate::domain::RosterStore`]: it turns roster
//! errors into messages, asks for confirmation before destructive commands,
//! and renders query results.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init`, `init --starter` |
//! | Roster | Character changes | `add`, `recruit`, `favorite`, `level-up`, `remove` |
//! | Bulk | Whole-roster changes | `recruit-all`, `reset` |
//! | Query | Views and summaries | `list`, `show`, `stats` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! party --verbose list --sort level
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod roster;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
