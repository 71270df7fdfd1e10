//! Roster store
//!
//! [`RosterStore`] is the sole owner of the character collection. Every
//! mutation is all-or-nothing: validation happens before anything changes,
//! so a failed call leaves the roster exactly as it was.
//!
//! New characters are prepended, so roster order is "most recently added
//! first". Each successful mutation bumps a version counter that derived
//! views use for invalidation.

use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use super::character::{fold_name, Category, Character, CharacterId};
use super::view::{self, RosterFilter, SortKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("A character named '{0}' already exists")]
    DuplicateName(String),

    #[error("Character not found: {0}")]
    NotFound(CharacterId),

    #[error("Duplicate character ID in roster: {0}")]
    DuplicateId(CharacterId),
}

/// Coarse classification of a [`RosterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterErrorKind {
    Validation,
    DuplicateName,
    NotFound,
}

impl RosterError {
    pub fn kind(&self) -> RosterErrorKind {
        match self {
            RosterError::Validation(_) | RosterError::DuplicateId(_) => RosterErrorKind::Validation,
            RosterError::DuplicateName(_) => RosterErrorKind::DuplicateName,
            RosterError::NotFound(_) => RosterErrorKind::NotFound,
        }
    }
}

/// Inclusive range new character levels are drawn from
///
/// Always non-empty: `min <= max` is checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    min: u32,
    max: u32,
}

impl Default for LevelRange {
    fn default() -> Self {
        Self { min: 20, max: 69 }
    }
}

impl LevelRange {
    /// Creates a range, rejecting `min > max`
    pub fn new(min: u32, max: u32) -> Result<Self, RosterError> {
        if min > max {
            return Err(RosterError::Validation(format!(
                "level range minimum {} is greater than maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// A range that always yields `level`
    pub fn fixed(level: u32) -> Self {
        Self {
            min: level,
            max: level,
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    fn roll(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Summary figures for the roster header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: usize,
    pub recruited: usize,
    pub available: usize,
    pub favorites: usize,
    /// Mean level rounded to the nearest integer, 0 when empty
    pub average_level: u32,
    pub by_category: BTreeMap<String, usize>,
}

/// Owner of the roster and its operations
#[derive(Debug, Clone)]
pub struct RosterStore {
    characters: Vec<Character>,
    levels: LevelRange,
    rng: StdRng,
    version: u64,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new(LevelRange::default())
    }
}

impl RosterStore {
    /// Creates an empty roster
    pub fn new(levels: LevelRange) -> Self {
        Self {
            characters: Vec::new(),
            levels,
            rng: StdRng::from_entropy(),
            version: 0,
        }
    }

    /// Replaces the level generator with a seeded one
    pub fn with_rng(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Restores a roster from a snapshot, keeping its order
    ///
    /// The snapshot must satisfy every roster invariant: non-empty trimmed
    /// names, unique ids and case-insensitively unique names.
    pub fn from_characters(
        characters: Vec<Character>,
        levels: LevelRange,
    ) -> Result<Self, RosterError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for character in &characters {
            if character.name.trim().is_empty() {
                return Err(RosterError::Validation(format!(
                    "character {} has an empty name",
                    character.id
                )));
            }
            if !ids.insert(character.id) {
                return Err(RosterError::DuplicateId(character.id));
            }
            if !names.insert(fold_name(&character.name)) {
                return Err(RosterError::DuplicateName(character.name.clone()));
            }
        }

        let mut store = Self::new(levels);
        store.characters = characters;
        Ok(store)
    }

    /// Version counter, bumped by every successful mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Characters in roster order (most recently added first)
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Looks up a character by id
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Finds a character by name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.has_name(name))
    }

    /// Adds a new character at the front of the roster
    pub fn add(&mut self, name: &str, category: Category) -> Result<Character, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::Validation(
                "character name cannot be empty".to_string(),
            ));
        }

        if self.find_by_name(name).is_some() {
            return Err(RosterError::DuplicateName(name.to_string()));
        }

        let id = self.next_id()?;
        let level = self.levels.roll(&mut self.rng);
        let character = Character::new(id, name, category, level);

        self.characters.insert(0, character.clone());
        self.touch();

        tracing::debug!(id = %id, name, %category, level, "Added character");
        Ok(character)
    }

    /// Flips the recruited flag
    pub fn toggle_recruited(&mut self, id: CharacterId) -> Result<Character, RosterError> {
        let updated = self.update(id, Character::toggle_recruited)?;
        tracing::debug!(id = %id, recruited = updated.recruited, "Toggled recruited");
        Ok(updated)
    }

    /// Flips the favorite flag
    pub fn toggle_favorite(&mut self, id: CharacterId) -> Result<Character, RosterError> {
        let updated = self.update(id, Character::toggle_favorite)?;
        tracing::debug!(id = %id, favorite = updated.favorite, "Toggled favorite");
        Ok(updated)
    }

    /// Raises a character's level by one
    pub fn level_up(&mut self, id: CharacterId) -> Result<Character, RosterError> {
        let updated = self.update(id, Character::level_up)?;
        tracing::debug!(id = %id, level = updated.level, "Levelled up");
        Ok(updated)
    }

    /// Deletes a character permanently, returning it
    pub fn remove(&mut self, id: CharacterId) -> Result<Character, RosterError> {
        let index = self.index_of(id)?;
        let removed = self.characters.remove(index);
        self.touch();

        tracing::debug!(id = %id, name = %removed.name, "Removed character");
        Ok(removed)
    }

    /// Marks every character as recruited
    ///
    /// Returns how many characters changed state.
    pub fn recruit_all(&mut self) -> usize {
        let mut changed = 0;
        for character in self.characters.iter_mut().filter(|c| !c.recruited) {
            character.recruited = true;
            changed += 1;
        }
        self.touch();

        tracing::debug!(changed, "Recruited all characters");
        changed
    }

    /// Empties the roster, returning how many characters were removed
    pub fn reset(&mut self) -> usize {
        let removed = self.characters.len();
        self.characters.clear();
        self.touch();

        tracing::debug!(removed, "Reset roster");
        removed
    }

    /// Filtered and sorted copy of the roster
    ///
    /// Never mutates the roster; ties keep roster order.
    pub fn query(&self, filter: RosterFilter, sort: SortKey) -> Vec<Character> {
        view::derive(&self.characters, filter, sort)
    }

    /// Summary figures for the whole roster
    pub fn stats(&self) -> RosterStats {
        let total = self.characters.len();
        let recruited = self.characters.iter().filter(|c| c.recruited).count();
        let favorites = self.characters.iter().filter(|c| c.favorite).count();

        let average_level = if total == 0 {
            0
        } else {
            let sum: u64 = self.characters.iter().map(|c| u64::from(c.level)).sum();
            // Round half up
            ((sum * 2 + total as u64) / (total as u64 * 2)) as u32
        };

        let mut by_category = BTreeMap::new();
        for character in &self.characters {
            *by_category
                .entry(character.category.name().to_string())
                .or_insert(0) += 1;
        }

        RosterStats {
            total,
            recruited,
            available: total - recruited,
            favorites,
            average_level,
            by_category,
        }
    }

    fn next_id(&self) -> Result<CharacterId, RosterError> {
        let highest = self.characters.iter().map(|c| c.id).max();
        match highest {
            None => Ok(CharacterId::new(1)),
            Some(id) => id
                .next()
                .ok_or_else(|| RosterError::Validation("character ids exhausted".to_string())),
        }
    }

    fn index_of(&self, id: CharacterId) -> Result<usize, RosterError> {
        self.characters
            .iter()
            .position(|c| c.id == id)
            .ok_or(RosterError::NotFound(id))
    }

    fn update(
        &mut self,
        id: CharacterId,
        change: impl FnOnce(&mut Character),
    ) -> Result<Character, RosterError> {
        let index = self.index_of(id)?;
        let character = &mut self.characters[index];
        change(character);
        let updated = character.clone();
        self.touch();
        Ok(updated)
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}
