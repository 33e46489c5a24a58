use graft::reconcile::Persister;
use graft_core::{driver::Executor, stmt::Value, Result};

use std::{collections::HashSet, fmt};

/// A [`Persister`] that records writes instead of running SQL.
///
/// Inserted children become persisted, deleted ones stop being persisted,
/// so applying the same plan twice behaves like a real table would.
pub struct RecordingPersister<C> {
    id_of: Box<dyn Fn(&C) -> Value>,
    persisted: HashSet<Value>,
    pub inserted: Vec<C>,
    pub updated: Vec<(C, C)>,
    pub deleted: Vec<C>,
}

impl<C> RecordingPersister<C> {
    pub fn new(id_of: impl Fn(&C) -> Value + 'static) -> RecordingPersister<C> {
        RecordingPersister {
            id_of: Box::new(id_of),
            persisted: HashSet::new(),
            inserted: vec![],
            updated: vec![],
            deleted: vec![],
        }
    }

    /// Marks the given identifiers as already stored.
    pub fn with_persisted(mut self, ids: impl IntoIterator<Item = Value>) -> RecordingPersister<C> {
        self.persisted.extend(ids);
        self
    }

    pub fn is_stored(&self, id: &Value) -> bool {
        self.persisted.contains(id)
    }
}

impl<C: Clone + PartialEq> Persister<C> for RecordingPersister<C> {
    fn is_persisted(&self, child: &C) -> bool {
        self.persisted.contains(&(self.id_of)(child))
    }

    fn has_changed(&self, old: &C, new: &C) -> bool {
        old != new
    }

    fn insert(&mut self, _exec: &mut dyn Executor, children: &[C]) -> Result<u64> {
        for child in children {
            self.persisted.insert((self.id_of)(child));
            self.inserted.push(child.clone());
        }
        Ok(children.len() as u64)
    }

    fn update(&mut self, _exec: &mut dyn Executor, children: &[(C, C)]) -> Result<u64> {
        self.updated.extend(children.iter().cloned());
        Ok(children.len() as u64)
    }

    fn delete(&mut self, _exec: &mut dyn Executor, children: &[C]) -> Result<u64> {
        for child in children {
            self.persisted.remove(&(self.id_of)(child));
            self.deleted.push(child.clone());
        }
        Ok(children.len() as u64)
    }
}

impl<C: fmt::Debug> fmt::Debug for RecordingPersister<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingPersister")
            .field("inserted", &self.inserted)
            .field("updated", &self.updated)
            .field("deleted", &self.deleted)
            .finish()
    }
}
