use crate::EntityRef;

use graft_core::Result;

use std::{cell::RefCell, fmt, rc::Rc, sync::Arc};

/// Attaches a child entity to its parent.
///
/// A fixer owns the whole attachment: storing a single reference, pushing
/// onto a collection, or setting back-pointers. The engine only decides
/// when, and how often, it runs.
#[derive(Clone)]
pub struct RelationFixer(Arc<dyn Fn(&EntityRef, &EntityRef) -> Result<()> + Send + Sync>);

impl RelationFixer {
    pub fn new<P: 'static, C: 'static>(
        f: impl Fn(&mut P, Rc<RefCell<C>>) + Send + Sync + 'static,
    ) -> RelationFixer {
        RelationFixer(Arc::new(move |parent: &EntityRef, child: &EntityRef| {
            let child = child.downcast::<C>()?;
            parent.with_mut(|parent: &mut P| f(parent, child))
        }))
    }

    /// A fixer working on the type-erased handles directly.
    pub fn from_fn(
        f: impl Fn(&EntityRef, &EntityRef) -> Result<()> + Send + Sync + 'static,
    ) -> RelationFixer {
        RelationFixer(Arc::new(f))
    }

    pub fn apply(&self, parent: &EntityRef, child: &EntityRef) -> Result<()> {
        (self.0)(parent, child)
    }
}

impl fmt::Debug for RelationFixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RelationFixer")
    }
}
