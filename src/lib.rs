//! Party Roster - A local-first adventuring party manager
//!
//! Characters are added to a roster, recruited into the active party,
//! levelled up and listed through filtered, sorted views. The roster lives
//! in memory inside a [`RosterStore`] and is persisted as a flat JSONL
//! snapshot after every change.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{
    Category, Character, CharacterId, LevelRange, RosterError, RosterFilter, RosterStore,
    SortKey,
};
