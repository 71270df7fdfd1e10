//! Derived roster views
//!
//! A view is the roster narrowed by a [`RosterFilter`] and ordered by a
//! [`SortKey`]. Views are computed from a borrowed slice and never touch the
//! underlying roster. [`RosterView`] memoizes the last view and recomputes
//! only when the filter, the sort key or the roster version changes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::character::{Character, ParseError};
use super::collation;
use super::roster::RosterStore;

/// Which characters a view includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RosterFilter {
    #[default]
    All,
    /// Only characters in the active party
    #[serde(alias = "recruited_only")]
    Recruited,
    /// Only characters not yet recruited
    #[serde(alias = "available_only")]
    Available,
}

impl RosterFilter {
    pub fn matches(&self, character: &Character) -> bool {
        match self {
            RosterFilter::All => true,
            RosterFilter::Recruited => character.recruited,
            RosterFilter::Available => !character.recruited,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RosterFilter::All => "all",
            RosterFilter::Recruited => "recruited",
            RosterFilter::Available => "available",
        }
    }

    /// Message shown when a view under this filter is empty
    pub fn empty_message(&self) -> &'static str {
        match self {
            RosterFilter::All => "No heroes yet. Recruit some adventurers!",
            RosterFilter::Recruited => "Your party is empty. Try another filter!",
            RosterFilter::Available => "No heroes available. Try another filter!",
        }
    }
}

impl fmt::Display for RosterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RosterFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(RosterFilter::All),
            "recruited" | "party" => Ok(RosterFilter::Recruited),
            "available" | "free" => Ok(RosterFilter::Available),
            _ => Err(ParseError::InvalidFilter(s.to_string())),
        }
    }
}

/// Ordering applied to a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending by name
    #[default]
    Name,
    /// Highest level first
    Level,
    /// Ascending by category name
    Category,
}

impl SortKey {
    /// Orders two characters under this key
    ///
    /// Equal keys compare as `Equal`; callers rely on a stable sort to keep
    /// roster order for ties.
    pub fn compare(&self, a: &Character, b: &Character) -> Ordering {
        match self {
            SortKey::Name => collation::compare(&a.name, &b.name),
            SortKey::Level => b.level.cmp(&a.level),
            SortKey::Category => collation::compare(a.category.name(), b.category.name()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Level => "level",
            SortKey::Category => "category",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "level" => Ok(SortKey::Level),
            "category" | "class" => Ok(SortKey::Category),
            _ => Err(ParseError::InvalidSortKey(s.to_string())),
        }
    }
}

/// Builds a filtered, sorted copy of `characters`
pub fn derive(characters: &[Character], filter: RosterFilter, sort: SortKey) -> Vec<Character> {
    let mut view: Vec<Character> = characters
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();

    // sort_by is stable, so ties keep roster order
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

/// Memoized view over a [`RosterStore`]
///
/// Holds the last derived view together with the `(filter, sort, version)`
/// it was derived from.
#[derive(Debug, Default)]
pub struct RosterView {
    key: Option<(RosterFilter, SortKey, u64)>,
    items: Vec<Character>,
}

impl RosterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view for `filter` and `sort`, recomputing it only if the
    /// store changed since the last call or the parameters differ
    pub fn get(&mut self, store: &RosterStore, filter: RosterFilter, sort: SortKey) -> &[Character] {
        let key = (filter, sort, store.version());
        if self.key != Some(key) {
            tracing::trace!(%filter, %sort, version = key.2, "Recomputing roster view");
            self.items = store.query(filter, sort);
            self.key = Some(key);
        }
        &self.items
    }

    /// Returns true if the next `get` with these parameters is served from
    /// the cached view
    pub fn is_fresh(&self, store: &RosterStore, filter: RosterFilter, sort: SortKey) -> bool {
        self.key == Some((filter, sort, store.version()))
    }

    /// Drops the cached view
    pub fn invalidate(&mut self) {
        self.key = None;
        self.items.clear();
    }
}
