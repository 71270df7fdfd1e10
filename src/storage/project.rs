//! Project management
//!
//! Handles project initialization and provides access to the roster.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::{self, ProjectConfig};
use super::{RosterFile, RosterSession};
use crate::domain::{Category, Character, CharacterId};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a party project. Run 'party init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# Party Roster configuration

# Class used by 'party add' when --class is omitted
default_category = "warrior"

# Defaults for 'party list'
default_filter = "all"
default_sort = "name"

# Inclusive range new character levels are rolled from
[levels]
min = 20
max = 69
"#;

/// A party roster project
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let party_dir = root.join(".party");

        if !party_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = ProjectConfig::load(&party_dir)?;

        Ok(Self { root, config })
    }

    /// Opens the project at `PARTY_DIR`, the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// An existing roster is left untouched.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let party_dir = root.join(".party");

        fs::create_dir_all(&party_dir).with_context(|| {
            format!("Failed to create .party directory: {}", party_dir.display())
        })?;

        let config_path = party_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let roster = RosterFile::for_project(&root);
        let _lock = roster.lock()?;
        if !roster.path().exists() {
            roster.write_all(&[])?;
        }

        Self::open(root)
    }

    /// Writes the starter party, replacing an empty roster
    ///
    /// Returns false without writing if the roster already has characters.
    pub fn seed_starter_party(&self) -> Result<bool> {
        let roster = self.roster_file();
        let _lock = roster.lock()?;
        if !roster.read_all()?.is_empty() {
            return Ok(false);
        }

        roster.write_all(&starter_party())?;
        Ok(true)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .party directory path
    pub fn party_dir(&self) -> PathBuf {
        self.root.join(".party")
    }

    /// Returns the project configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Returns the roster snapshot file
    pub fn roster_file(&self) -> RosterFile {
        RosterFile::for_project(&self.root)
    }

    /// Loads the roster into a session using the project's level range
    pub fn session(&self) -> Result<RosterSession<RosterFile>> {
        RosterSession::open(self.roster_file(), self.config.levels)
    }
}

/// The classic three-hero party
pub fn starter_party() -> Vec<Character> {
    let mut aragorn = Character::new(CharacterId::new(2), "Aragorn the Brave", Category::Warrior, 72);
    aragorn.recruited = true;

    vec![
        Character::new(CharacterId::new(1), "Gandalf the Wise", Category::Mage, 85),
        aragorn,
        Character::new(CharacterId::new(3), "Legolas the Precise", Category::Archer, 68),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LevelRange;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.party_dir().is_dir());
        assert!(project.party_dir().join("config.toml").is_file());
        assert!(project.party_dir().join("roster.jsonl").is_file());
        assert_eq!(project.config().levels, LevelRange::default());
        assert!(project.party_dir().join("roster.lock").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        let project = Project::init(dir.path()).unwrap();
        project.seed_starter_party().unwrap();
        Project::init(dir.path()).unwrap(); // Should not fail or wipe the roster

        assert_eq!(project.roster_file().read_all().unwrap().len(), 3);
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn seed_only_into_empty_roster() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.seed_starter_party().unwrap());
        assert!(!project.seed_starter_party().unwrap());

        let session = project.session().unwrap();
        assert_eq!(session.store().len(), 3);
        assert_eq!(session.store().stats().recruited, 1);
    }

    #[test]
    fn starter_party_is_a_valid_roster() {
        let store =
            crate::domain::RosterStore::from_characters(starter_party(), LevelRange::default());
        assert!(store.is_ok());
    }

    #[test]
    fn session_uses_configured_level_range() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();
        fs::write(
            project.party_dir().join("config.toml"),
            "[levels]\nmin = 7\nmax = 7\n",
        )
        .unwrap();

        let project = Project::open(dir.path()).unwrap();
        let mut session = project.session().unwrap();
        let commit = session.apply(|s| s.add("Treebeard", Category::Warrior)).unwrap();
        assert_eq!(commit.value.level, 7);

        let stored = project.roster_file().read_all().unwrap();
        assert_eq!(stored[0].name, "Treebeard");
    }
}
