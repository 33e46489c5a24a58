use super::{
    plan::Target, relation::Ownership, IndexUpdate, LinkRow, Persister, ReconcilePlan, Relation,
    Step, WriteOrder,
};
use crate::diff::{diff_list, DiffState, IndexedDiff};

use graft_core::stmt::Value;

/// Plans the writes reconciling a parent's relation under one policy.
#[derive(Debug)]
pub struct Reconciler<P, C> {
    relation: Relation<P, C>,
}

/// Writes collected while walking the diff, grouped by kind.
struct Writes<C> {
    delete_links: Vec<LinkRow>,
    delete_children: Vec<C>,
    update_children: Vec<(C, C)>,
    insert_children: Vec<C>,
    insert_links: Vec<LinkRow>,
    update_indexes: Vec<IndexUpdate>,
}

impl<P, C: Clone> Reconciler<P, C> {
    pub fn new(relation: Relation<P, C>) -> Reconciler<P, C> {
        Reconciler { relation }
    }

    pub fn relation(&self) -> &Relation<P, C> {
        &self.relation
    }

    /// Plans the writes turning `old`'s children into `new`'s.
    ///
    /// `None` stands for a parent without children on that side: a new
    /// parent has no `old`, a deleted one no `new`.
    pub fn reconcile<S>(&self, persister: &S, old: Option<&P>, new: Option<&P>) -> ReconcilePlan<C>
    where
        S: Persister<C> + ?Sized,
    {
        let relation = &self.relation;
        let target = match &relation.ownership {
            Ownership::Child { index, .. } => Target::Child(index.clone()),
            Ownership::Association(table) => Target::Association(table.clone()),
        };

        let Some(parent) = new.or(old) else {
            return ReconcilePlan::new(vec![], target);
        };
        let parent_id = (relation.parent_id)(parent);

        let before = old.map(|parent| (relation.children)(parent)).unwrap_or(&[]);
        let after = new.map(|parent| (relation.children)(parent)).unwrap_or(&[]);

        let mut writes = Writes::default();

        for entry in diff_list(before, after, |child| (relation.child_id)(child)) {
            match entry.diff.state {
                DiffState::Added => self.added(&mut writes, persister, &parent_id, new, entry),
                DiffState::Held => self.held(&mut writes, persister, &parent_id, entry),
                DiffState::Removed => self.removed(&mut writes, persister, &parent_id, entry),
            }
        }

        ReconcilePlan::new(writes.into_steps(relation.write_order), target)
    }

    fn added<S>(
        &self,
        writes: &mut Writes<C>,
        persister: &S,
        parent_id: &Value,
        parent: Option<&P>,
        entry: IndexedDiff<C>,
    ) where
        S: Persister<C> + ?Sized,
    {
        let relation = &self.relation;
        let Some(child) = entry.diff.replacing else {
            return;
        };
        let child_id = (relation.child_id)(&child);
        let persisted = persister.is_persisted(&child);

        match &relation.ownership {
            Ownership::Child { reverse, index } => {
                let mut attached = child.clone();
                if let Some(reverse) = reverse {
                    reverse(&mut attached, parent);
                }

                if !persisted {
                    writes.insert_children.push(attached);
                } else if persister.has_changed(&child, &attached) {
                    writes.update_children.push((child, attached));
                }

                if let (Some(_), Some(to)) = (index, entry.replacer_indexes.first()) {
                    writes.update_indexes.push(IndexUpdate {
                        parent: parent_id.clone(),
                        child: child_id,
                        from: None,
                        to: *to,
                    });
                }
            }
            Ownership::Association(table) => {
                if !persisted {
                    writes.insert_children.push(child);
                }

                if table.index.is_some() {
                    for index in &entry.replacer_indexes {
                        writes.insert_links.push(LinkRow {
                            parent: parent_id.clone(),
                            child: child_id.clone(),
                            index: Some(*index),
                        });
                    }
                } else {
                    writes.insert_links.push(LinkRow {
                        parent: parent_id.clone(),
                        child: child_id,
                        index: None,
                    });
                }
            }
        }
    }

    fn held<S>(&self, writes: &mut Writes<C>, persister: &S, parent_id: &Value, entry: IndexedDiff<C>)
    where
        S: Persister<C> + ?Sized,
    {
        let relation = &self.relation;
        let moved = relation.ordered && entry.is_moved();
        let (Some(source), Some(replacing)) = (entry.diff.source, entry.diff.replacing) else {
            return;
        };
        let child_id = (relation.child_id)(&replacing);

        if persister.has_changed(&source, &replacing) {
            writes.update_children.push((source, replacing));
        }

        if !moved {
            return;
        }

        match &relation.ownership {
            Ownership::Child { index: Some(_), .. } => {
                let from = entry.source_indexes.first();
                let to = entry.replacer_indexes.first();
                if let Some(to) = to.filter(|to| Some(*to) != from) {
                    writes.update_indexes.push(IndexUpdate {
                        parent: parent_id.clone(),
                        child: child_id,
                        from: None,
                        to: *to,
                    });
                }
            }
            Ownership::Association(table) if table.index.is_some() => {
                let vacated: Vec<usize> = entry
                    .source_indexes
                    .difference(&entry.replacer_indexes)
                    .copied()
                    .collect();
                let taken: Vec<usize> = entry
                    .replacer_indexes
                    .difference(&entry.source_indexes)
                    .copied()
                    .collect();

                for (from, to) in vacated.iter().zip(&taken) {
                    writes.update_indexes.push(IndexUpdate {
                        parent: parent_id.clone(),
                        child: child_id.clone(),
                        from: Some(*from),
                        to: *to,
                    });
                }
                for from in vacated.iter().skip(taken.len()) {
                    writes.delete_links.push(LinkRow {
                        parent: parent_id.clone(),
                        child: child_id.clone(),
                        index: Some(*from),
                    });
                }
                for to in taken.iter().skip(vacated.len()) {
                    writes.insert_links.push(LinkRow {
                        parent: parent_id.clone(),
                        child: child_id.clone(),
                        index: Some(*to),
                    });
                }
            }
            _ => {}
        }
    }

    fn removed<S>(&self, writes: &mut Writes<C>, persister: &S, parent_id: &Value, entry: IndexedDiff<C>)
    where
        S: Persister<C> + ?Sized,
    {
        let relation = &self.relation;
        let Some(child) = entry.diff.source else {
            return;
        };
        let child_id = (relation.child_id)(&child);
        let persisted = persister.is_persisted(&child);

        if let Ownership::Association(table) = &relation.ownership {
            if table.index.is_some() {
                for index in &entry.source_indexes {
                    writes.delete_links.push(LinkRow {
                        parent: parent_id.clone(),
                        child: child_id.clone(),
                        index: Some(*index),
                    });
                }
            } else {
                writes.delete_links.push(LinkRow {
                    parent: parent_id.clone(),
                    child: child_id.clone(),
                    index: None,
                });
            }
        }

        if relation.delete_removed {
            if persisted {
                writes.delete_children.push(child);
            } else {
                tracing::debug!(
                    child = ?child_id,
                    "graft.reconcile: removed child is not persisted, skipping delete"
                );
            }
            return;
        }

        if let Ownership::Child {
            reverse: Some(reverse),
            ..
        } = &relation.ownership
        {
            if !persisted {
                tracing::debug!(
                    child = ?child_id,
                    "graft.reconcile: removed child is not persisted, skipping detach"
                );
                return;
            }

            let mut detached = child.clone();
            reverse(&mut detached, None);
            if persister.has_changed(&child, &detached) {
                writes.update_children.push((child, detached));
            }
        }
    }
}

impl<C> Default for Writes<C> {
    fn default() -> Writes<C> {
        Writes {
            delete_links: vec![],
            delete_children: vec![],
            update_children: vec![],
            insert_children: vec![],
            insert_links: vec![],
            update_indexes: vec![],
        }
    }
}

impl<C> Writes<C> {
    fn into_steps(self, order: WriteOrder) -> Vec<Step<C>> {
        let delete_links = Step::DeleteLinks(self.delete_links);
        let delete_children = Step::DeleteChildren(self.delete_children);
        let insert_children = Step::InsertChildren(self.insert_children);
        let insert_links = Step::InsertLinks(self.insert_links);

        // Link rows reference their children, so they are always deleted
        // first. The write order only affects inserts.
        let inserts = match order {
            WriteOrder::ChildrenThenLinks => [insert_children, insert_links],
            WriteOrder::LinksThenChildren => [insert_links, insert_children],
        };

        [delete_links, delete_children]
            .into_iter()
            .chain([Step::UpdateChildren(self.update_children)])
            .chain(inserts)
            .chain([Step::UpdateIndexes(self.update_indexes)])
            .filter(|step| !step.is_empty())
            .collect()
    }
}

impl<C> Step<C> {
    fn is_empty(&self) -> bool {
        match self {
            Step::DeleteLinks(rows) | Step::InsertLinks(rows) => rows.is_empty(),
            Step::DeleteChildren(children) | Step::InsertChildren(children) => children.is_empty(),
            Step::UpdateChildren(pairs) => pairs.is_empty(),
            Step::UpdateIndexes(updates) => updates.is_empty(),
        }
    }
}
