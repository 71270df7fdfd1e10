//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::roster;
use crate::domain::{Category, CharacterId, RosterFilter, SortKey};
use crate::storage::{Project, UserConfig};

#[derive(Parser)]
#[command(name = "party")]
#[command(author, version, about = "Local-first adventuring party roster")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new roster project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Seed an empty roster with the classic starter party
        #[arg(long)]
        starter: bool,
    },

    /// Add a character to the roster
    ///
    /// Examples:
    ///   party add "Frodo"                 # Default class from config
    ///   party add "Gandalf" --class mage
    Add {
        /// Character name (unique, case-insensitive)
        name: String,

        /// Class: warrior, mage, archer, cleric or rogue
        #[arg(long = "class", short = 'c')]
        category: Option<Category>,
    },

    /// List characters
    List {
        /// Which characters to show: all, recruited or available
        #[arg(long)]
        filter: Option<RosterFilter>,

        /// Ordering: name, level (highest first) or category
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Show character details
    Show {
        /// Character ID
        id: CharacterId,
    },

    /// Toggle whether a character is in the party
    Recruit {
        /// Character ID
        id: CharacterId,
    },

    /// Toggle a character's favorite mark
    Favorite {
        /// Character ID
        id: CharacterId,
    },

    /// Raise a character's level
    LevelUp {
        /// Character ID
        id: CharacterId,

        /// Number of levels to gain
        #[arg(long, short = 'n', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        times: u32,
    },

    /// Remove a character permanently
    Remove {
        /// Character ID
        id: CharacterId,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Recruit every character into the party
    RecruitAll,

    /// Remove every character from the roster
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show roster statistics
    Stats,
}

/// Installs the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` enables debug events
/// from this crate.
fn init_logging(verbose: bool) {
    let default = if verbose { "party_roster=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // An unreadable user config falls back to text
    let format = cli.format.unwrap_or_else(|| {
        UserConfig::load()
            .map(|config| OutputFormat::from(config.default_format))
            .unwrap_or_default()
    });
    let output = Output::new(format, cli.verbose);

    output.verbose_ctx("party", "Starting");

    match cli.command {
        Commands::Init { path, starter } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .party directory at: {}", project.party_dir().display()),
            );

            if starter && !project.seed_starter_party()? {
                output.verbose_ctx("init", "Roster not empty, starter party skipped");
            }

            output.success(&format!(
                "Initialized party roster at {}",
                project.root().display()
            ));
        }

        Commands::Add { name, category } => roster::add(&output, &name, category)?,
        Commands::List { filter, sort } => roster::list(&output, filter, sort)?,
        Commands::Show { id } => roster::show(&output, id)?,
        Commands::Recruit { id } => roster::toggle_recruited(&output, id)?,
        Commands::Favorite { id } => roster::toggle_favorite(&output, id)?,
        Commands::LevelUp { id, times } => roster::level_up(&output, id, times)?,
        Commands::Remove { id, yes } => roster::remove(&output, id, yes)?,
        Commands::RecruitAll => roster::recruit_all(&output)?,
        Commands::Reset { yes } => roster::reset(&output, yes)?,
        Commands::Stats => roster::stats(&output)?,
    }

    output.verbose_ctx("party", "Command completed successfully");
    Ok(())
}
