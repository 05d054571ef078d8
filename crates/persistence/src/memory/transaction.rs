use std::collections::HashSet;

use domain::Result;
use uuid::Uuid;

/// Reverts one applied write.
pub(crate) type Undo = Box<dyn FnOnce() + Send>;
type StagedWrite = Box<dyn FnOnce() -> Result<Undo> + Send>;
type Key = (&'static str, Uuid);

/// Writes staged by in-memory repositories until the owning unit of work
/// commits.
///
/// Each staged write checks committed state again when applied, so a row
/// inserted or deleted by someone else after staging fails the commit
/// instead of being overwritten or brought back. A failed commit reverts
/// the writes it already applied. Dropping the transaction discards every
/// staged write.
#[derive(Default)]
pub struct InMemoryTransaction {
    staged: Vec<StagedWrite>,
    inserted: HashSet<Key>,
    deleted: HashSet<Key>,
}

impl InMemoryTransaction {
    /// Creates a transaction with nothing staged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of staged writes.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Returns true when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub(crate) fn stage(&mut self, write: impl FnOnce() -> Result<Undo> + Send + 'static) {
        self.staged.push(Box::new(write));
    }

    pub(crate) fn record_insert(&mut self, key: Key) {
        self.deleted.remove(&key);
        self.inserted.insert(key);
    }

    pub(crate) fn record_delete(&mut self, key: Key) {
        self.inserted.remove(&key);
        self.deleted.insert(key);
    }

    /// Resolves whether `key` exists once the staged writes are applied,
    /// given whether it exists in committed state.
    pub(crate) fn exists(&self, key: &Key, committed: bool) -> bool {
        if self.deleted.contains(key) {
            return false;
        }
        committed || self.inserted.contains(key)
    }

    /// Applies every staged write in staging order.
    ///
    /// Stops at the first conflicting write and reverts the ones before it.
    pub(crate) fn apply(self) -> Result<()> {
        let mut applied = Vec::with_capacity(self.staged.len());
        for write in self.staged {
            match write() {
                Ok(undo) => applied.push(undo),
                Err(e) => {
                    for undo in applied.into_iter().rev() {
                        undo();
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTransaction")
            .field("staged", &self.staged.len())
            .field("inserted", &self.inserted.len())
            .field("deleted", &self.deleted.len())
            .finish()
    }
}
