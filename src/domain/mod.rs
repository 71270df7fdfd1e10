//! Domain models for Party Roster
//!
//! Contains the roster logic without any I/O concerns.

mod character;
mod collation;
mod roster;
mod view;

pub use character::{Category, Character, CharacterId, ParseError};
pub use roster::{LevelRange, RosterError, RosterErrorKind, RosterStats, RosterStore};
pub use view::{RosterFilter, RosterView, SortKey};

#[cfg(test)]
mod proptests {
    //! Property checks over arbitrary rosters

    use super::*;
    use proptest::prelude::*;

    fn arb_category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::ALL.to_vec())
    }

    fn arb_filter() -> impl Strategy<Value = RosterFilter> {
        prop::sample::select(vec![
            RosterFilter::All,
            RosterFilter::Recruited,
            RosterFilter::Available,
        ])
    }

    fn arb_sort() -> impl Strategy<Value = SortKey> {
        prop::sample::select(vec![SortKey::Name, SortKey::Level, SortKey::Category])
    }

    /// Rosters with unique ids and names; names and levels repeat often
    /// enough to exercise ties
    fn arb_roster() -> impl Strategy<Value = Vec<Character>> {
        prop::collection::vec(
            ("[a-dA-D]{1,3}", arb_category(), 1u32..6, any::<bool>(), any::<bool>()),
            0..24,
        )
        .prop_map(|rows| {
            let mut seen = std::collections::HashSet::new();
            rows.into_iter()
                .filter(|(name, ..)| seen.insert(name.to_lowercase()))
                .enumerate()
                .map(|(i, (name, category, level, recruited, favorite))| {
                    let mut c = Character::new(CharacterId::new(i as u64 + 1), name, category, level);
                    c.recruited = recruited;
                    c.favorite = favorite;
                    c
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn query_never_mutates(roster in arb_roster(), filter in arb_filter(), sort in arb_sort()) {
            let store = RosterStore::from_characters(roster.clone(), LevelRange::default()).unwrap();
            let version = store.version();
            let _ = store.query(filter, sort);
            prop_assert_eq!(store.characters(), roster.as_slice());
            prop_assert_eq!(store.version(), version);
        }

        #[test]
        fn query_is_filtered_sorted_and_stable(
            roster in arb_roster(),
            filter in arb_filter(),
            sort in arb_sort(),
        ) {
            let store = RosterStore::from_characters(roster.clone(), LevelRange::default()).unwrap();
            let view = store.query(filter, sort);

            let expected: Vec<_> = roster.iter().filter(|c| filter.matches(c)).collect();
            prop_assert_eq!(view.len(), expected.len());
            prop_assert!(view.iter().all(|c| filter.matches(c)));

            let position = |c: &Character| roster.iter().position(|r| r.id == c.id).unwrap();
            for pair in view.windows(2) {
                let ord = sort.compare(&pair[0], &pair[1]);
                prop_assert_ne!(ord, std::cmp::Ordering::Greater);
                if ord == std::cmp::Ordering::Equal {
                    prop_assert!(position(&pair[0]) < position(&pair[1]));
                }
            }
        }

        #[test]
        fn duplicate_add_leaves_roster_unchanged(roster in arb_roster(), pick in any::<prop::sample::Index>()) {
            prop_assume!(!roster.is_empty());
            let mut store = RosterStore::from_characters(roster.clone(), LevelRange::default()).unwrap();
            let existing = &roster[pick.index(roster.len())];

            let err = store.add(&existing.name.to_uppercase(), Category::Rogue).unwrap_err();
            prop_assert_eq!(err.kind(), RosterErrorKind::DuplicateName);
            prop_assert_eq!(store.characters(), roster.as_slice());
        }

        #[test]
        fn add_then_query_contains_name_once(name in "[A-Za-z][A-Za-z ]{0,15}", category in arb_category()) {
            let mut store = RosterStore::default().with_rng(1);
            let added = store.add(&name, category).unwrap();
            let hits = store
                .query(RosterFilter::All, SortKey::Name)
                .into_iter()
                .filter(|c| c.name == added.name)
                .count();
            prop_assert_eq!(hits, 1);
        }
    }
}
