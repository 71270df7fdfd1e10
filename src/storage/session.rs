//! Roster session: a store paired with its persistence collaborator
//!
//! The session takes the persistence lock, loads the snapshot once, applies
//! operations to the in-memory [`RosterStore`], and saves after every
//! successful mutation. The lock is held until the session is dropped, so two
//! sessions on the same roster never interleave their load and save.
//!
//! Saving is best-effort: a failed save is reported on the returned
//! [`Commit`] but the in-memory change stays applied.

use anyhow::{Context, Result};

use crate::domain::{Character, LevelRange, RosterError, RosterStore};

/// Load/save collaborator for roster snapshots
pub trait RosterPersistence {
    /// Guard that keeps other sessions out while held
    type Lock;

    /// Blocks until this session may read and write the snapshot
    fn lock(&self) -> Result<Self::Lock>;

    /// Loads the stored snapshot, or an empty list if nothing is stored
    fn load(&self) -> Result<Vec<Character>>;

    /// Replaces the stored snapshot
    fn save(&self, characters: &[Character]) -> Result<()>;
}

/// Result of a mutation applied through a [`RosterSession`]
#[derive(Debug)]
pub struct Commit<T> {
    pub value: T,
    pub save_error: Option<anyhow::Error>,
}

impl<T> Commit<T> {
    /// Returns true if the snapshot was written
    pub fn is_persisted(&self) -> bool {
        self.save_error.is_none()
    }

    /// Converts a failed save into an error
    pub fn into_result(self) -> Result<T> {
        match self.save_error {
            None => Ok(self.value),
            Some(e) => Err(e.context("Roster changed but the snapshot could not be saved")),
        }
    }
}

/// A roster store bound to a persistence collaborator
pub struct RosterSession<P: RosterPersistence> {
    store: RosterStore,
    persistence: P,
    _lock: P::Lock,
}

impl<P: RosterPersistence> RosterSession<P> {
    /// Loads the snapshot and builds the store from it
    pub fn open(persistence: P, levels: LevelRange) -> Result<Self> {
        let lock = persistence.lock()?;
        let characters = persistence.load()?;
        let count = characters.len();
        let store = RosterStore::from_characters(characters, levels)
            .context("Stored roster is inconsistent")?;

        tracing::debug!(count, "Loaded roster snapshot");
        Ok(Self {
            store,
            persistence,
            _lock: lock,
        })
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    /// Applies a fallible mutation, saving only if it succeeds
    ///
    /// `op` may call several store operations; if any of them fails the
    /// store is put back exactly as it was before `op` ran.
    pub fn apply<T>(
        &mut self,
        op: impl FnOnce(&mut RosterStore) -> Result<T, RosterError>,
    ) -> Result<Commit<T>, RosterError> {
        let before = self.store.clone();
        match op(&mut self.store) {
            Ok(value) => Ok(self.commit(value)),
            Err(e) => {
                self.store = before;
                Err(e)
            }
        }
    }

    /// Applies a mutation that cannot fail, then saves
    pub fn apply_infallible<T>(&mut self, op: impl FnOnce(&mut RosterStore) -> T) -> Commit<T> {
        let value = op(&mut self.store);
        self.commit(value)
    }

    fn commit<T>(&self, value: T) -> Commit<T> {
        let save_error = match self.persistence.save(self.store.characters()) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Failed to save roster snapshot");
                Some(e)
            }
        };
        Commit { value, save_error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CharacterId, RosterErrorKind};
    use crate::storage::RosterFile;
    use std::cell::{Cell, RefCell};

    /// In-memory collaborator that counts saves and can be told to fail
    #[derive(Default)]
    struct MemoryPersistence {
        stored: RefCell<Vec<Character>>,
        saves: Cell<usize>,
        fail: Cell<bool>,
    }

    impl RosterPersistence for &MemoryPersistence {
        type Lock = ();

        fn lock(&self) -> Result<()> {
            Ok(())
        }

        fn load(&self) -> Result<Vec<Character>> {
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, characters: &[Character]) -> Result<()> {
            if self.fail.get() {
                anyhow::bail!("disk full");
            }
            self.saves.set(self.saves.get() + 1);
            *self.stored.borrow_mut() = characters.to_vec();
            Ok(())
        }
    }

    #[test]
    fn open_loads_snapshot_in_order() {
        let memory = MemoryPersistence::default();
        *memory.stored.borrow_mut() = vec![
            Character::new(CharacterId::new(2), "Sam", Category::Cleric, 30),
            Character::new(CharacterId::new(1), "Frodo", Category::Rogue, 30),
        ];

        let session = RosterSession::open(&memory, LevelRange::default()).unwrap();
        let names: Vec<_> = session.store().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sam", "Frodo"]);
    }

    #[test]
    fn open_rejects_inconsistent_snapshot() {
        let memory = MemoryPersistence::default();
        *memory.stored.borrow_mut() = vec![
            Character::new(CharacterId::new(1), "Sam", Category::Cleric, 30),
            Character::new(CharacterId::new(1), "Frodo", Category::Rogue, 30),
        ];

        assert!(RosterSession::open(&memory, LevelRange::default()).is_err());
    }

    #[test]
    fn successful_mutation_is_saved() {
        let memory = MemoryPersistence::default();
        let mut session = RosterSession::open(&memory, LevelRange::fixed(25)).unwrap();

        let commit = session.apply(|s| s.add("Merry", Category::Rogue)).unwrap();
        assert!(commit.is_persisted());
        assert_eq!(commit.value.level, 25);
        assert_eq!(memory.saves.get(), 1);
        assert_eq!(memory.stored.borrow().len(), 1);
    }

    #[test]
    fn failed_mutation_is_not_saved() {
        let memory = MemoryPersistence::default();
        let mut session = RosterSession::open(&memory, LevelRange::default()).unwrap();

        let err = session.apply(|s| s.add("   ", Category::Rogue)).unwrap_err();
        assert_eq!(err.kind(), RosterErrorKind::Validation);
        assert_eq!(memory.saves.get(), 0);
    }

    #[test]
    fn failure_partway_through_restores_the_store() {
        let memory = MemoryPersistence::default();
        let mut session = RosterSession::open(&memory, LevelRange::fixed(10)).unwrap();
        let hero = session.apply(|s| s.add("Gimli", Category::Warrior)).unwrap().value;
        let version = session.store().version();

        let err = session
            .apply(|s| {
                s.level_up(hero.id)?;
                s.level_up(hero.id)?;
                s.level_up(CharacterId::new(99))
            })
            .unwrap_err();

        assert_eq!(err.kind(), RosterErrorKind::NotFound);
        assert_eq!(session.store().get(hero.id).unwrap().level, 10);
        assert_eq!(session.store().version(), version);
        assert_eq!(memory.saves.get(), 1);
        assert_eq!(memory.stored.borrow()[0].level, 10);
    }

    #[test]
    fn failed_save_keeps_in_memory_change() {
        let memory = MemoryPersistence::default();
        let mut session = RosterSession::open(&memory, LevelRange::default()).unwrap();
        memory.fail.set(true);

        let commit = session.apply(|s| s.add("Pippin", Category::Rogue)).unwrap();
        assert!(!commit.is_persisted());
        assert_eq!(session.store().len(), 1);
        assert!(memory.stored.borrow().is_empty());

        let err = commit.into_result().unwrap_err();
        assert!(format!("{:#}", err).contains("disk full"));
    }

    #[test]
    fn infallible_operations_are_saved() {
        let memory = MemoryPersistence::default();
        let mut session = RosterSession::open(&memory, LevelRange::default()).unwrap();
        session.apply(|s| s.add("Bilbo", Category::Rogue)).unwrap();

        let commit = session.apply_infallible(RosterStore::recruit_all);
        assert_eq!(commit.value, 1);
        assert!(memory.stored.borrow()[0].recruited);

        session.apply_infallible(RosterStore::reset);
        assert!(memory.stored.borrow().is_empty());
    }

    #[test]
    fn concurrent_sessions_do_not_lose_updates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.jsonl");

        let writers: Vec<_> = ["Elf", "Dwarf"]
            .into_iter()
            .map(|kind| {
                let path = path.clone();
                std::thread::spawn(move || {
                    for i in 0..15 {
                        let mut session =
                            RosterSession::open(RosterFile::new(&path), LevelRange::fixed(30))
                                .unwrap();
                        session
                            .apply(|s| s.add(&format!("{} {}", kind, i), Category::Archer))
                            .unwrap()
                            .into_result()
                            .unwrap();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        let stored = RosterFile::new(&path).read_all().unwrap();
        assert_eq!(stored.len(), 30);

        let mut ids: Vec<_> = stored.iter().map(|c| c.id.value()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn open_session_holds_the_roster_lock() {
        use fs2::FileExt;

        let dir = tempfile::TempDir::new().unwrap();
        let file = RosterFile::new(dir.path().join("roster.jsonl"));
        let lock_path = file.lock_path();

        let session = RosterSession::open(file, LevelRange::default()).unwrap();
        let other = std::fs::File::open(&lock_path).unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(session);
        assert!(other.try_lock_exclusive().is_ok());
    }
}
