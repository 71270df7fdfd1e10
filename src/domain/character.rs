//! Character domain model
//!
//! A character is a single adventurer on the roster. Its id and category are
//! fixed at creation; the recruited and favorite flags and the level change
//! over its lifetime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid category '{0}': expected one of warrior, mage, archer, cleric, rogue")]
    InvalidCategory(String),

    #[error("Invalid character ID '{0}': expected a positive integer")]
    InvalidId(String),

    #[error("Invalid filter '{0}': expected one of all, recruited, available")]
    InvalidFilter(String),

    #[error("Invalid sort key '{0}': expected one of name, level, category")]
    InvalidSortKey(String),
}

/// Roster-assigned character identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(u64);

impl CharacterId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one, or `None` at `u64::MAX`
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CharacterId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the "#3" form used in text output as well as bare numbers
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(CharacterId)
            .map_err(|_| ParseError::InvalidId(s.to_string()))
    }
}

/// Character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Warrior,
    Mage,
    Archer,
    Cleric,
    Rogue,
}

impl Category {
    /// Every category, in the order the class picker shows them
    pub const ALL: [Category; 5] = [
        Category::Warrior,
        Category::Mage,
        Category::Archer,
        Category::Cleric,
        Category::Rogue,
    ];

    /// Display name, also used as the sort key for category ordering
    pub fn name(&self) -> &'static str {
        match self {
            Category::Warrior => "Warrior",
            Category::Mage => "Mage",
            Category::Archer => "Archer",
            Category::Cleric => "Cleric",
            Category::Rogue => "Rogue",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Warrior => "⚔️",
            Category::Mage => "🔮",
            Category::Archer => "🏹",
            Category::Cleric => "✨",
            Category::Rogue => "🗡️",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseError::InvalidCategory(s.to_string()))
    }
}

/// An adventurer on the roster
///
/// Serialized field set is exactly `{id, name, recruited, favorite, category,
/// level}`; this is the snapshot record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub recruited: bool,
    #[serde(default)]
    pub favorite: bool,
    pub category: Category,
    pub level: u32,
}

impl Character {
    /// Creates a fresh, unrecruited character
    pub fn new(id: CharacterId, name: impl Into<String>, category: Category, level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            recruited: false,
            favorite: false,
            category,
            level,
        }
    }

    /// Returns true if `other` names the same character, ignoring case
    pub fn has_name(&self, other: &str) -> bool {
        fold_name(&self.name) == fold_name(other)
    }

    pub fn toggle_recruited(&mut self) {
        self.recruited = !self.recruited;
    }

    pub fn toggle_favorite(&mut self) {
        self.favorite = !self.favorite;
    }

    /// Raises the level by one
    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// Short status label used by list views
    pub fn status_label(&self) -> &'static str {
        if self.recruited {
            "in party"
        } else {
            "available"
        }
    }
}

/// Case-folded form of a name for uniqueness checks
pub(crate) fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}
