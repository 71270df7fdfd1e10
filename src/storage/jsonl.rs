//! JSONL storage for the roster snapshot
//!
//! The roster is stored in `.party/roster.jsonl` with one character per
//! line, in roster order. Writers hold an exclusive lock on the sibling
//! `roster.lock` and replace the snapshot by renaming a fully written temp
//! file over it, so readers always see either the old or the new roster.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::session::RosterPersistence;
use crate::domain::Character;

/// Roster snapshot file in JSONL format
pub struct RosterFile {
    path: PathBuf,
}

/// Exclusive hold on a roster file, released on drop
#[derive(Debug)]
pub struct RosterLock {
    file: File,
}

impl Drop for RosterLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl RosterFile {
    /// Creates a roster file handle at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default roster file for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".party").join("roster.jsonl"))
    }

    /// Returns the path to the roster file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the lock file guarding this roster
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Blocks until no other writer holds the roster
    pub fn lock(&self) -> Result<RosterLock> {
        self.ensure_parent()?;

        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

        file.lock_exclusive()
            .with_context(|| format!("Failed to lock roster: {}", lock_path.display()))?;

        Ok(RosterLock { file })
    }

    /// Reads the snapshot in stored order
    pub fn read_all(&self) -> Result<Vec<Character>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open roster file: {}", self.path.display()))?;

        let reader = BufReader::new(file);
        let mut characters = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let character: Character = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse character at line {}", line_num + 1))?;

            characters.push(character);
        }

        Ok(characters)
    }

    /// Writes the snapshot (full rewrite)
    ///
    /// Callers that read, change and write the roster should hold
    /// [`RosterFile::lock`] for the whole cycle.
    pub fn write_all(&self, characters: &[Character]) -> Result<()> {
        self.ensure_parent()?;

        // One temp file per process, so concurrent writers never share it
        let temp_path = self
            .path
            .with_extension(format!("jsonl.{}.tmp", std::process::id()));

        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);

            for character in characters {
                let line =
                    serde_json::to_string(character).context("Failed to serialize character")?;
                writeln!(writer, "{}", line).context("Failed to write character")?;
            }

            writer.flush().context("Failed to flush roster file")?;
            drop(writer);
            file.sync_all().context("Failed to sync roster file")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

impl RosterPersistence for RosterFile {
    type Lock = RosterLock;

    fn lock(&self) -> Result<RosterLock> {
        RosterFile::lock(self)
    }

    fn load(&self) -> Result<Vec<Character>> {
        self.read_all()
    }

    fn save(&self, characters: &[Character]) -> Result<()> {
        self.write_all(characters)
    }
}
