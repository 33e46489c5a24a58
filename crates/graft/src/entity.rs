use graft_core::{err, Error, Result};

use std::{
    any::{type_name, Any},
    cell::RefCell,
    fmt,
    rc::Rc,
};

/// Tags one configured entity type. Entity caches are keyed by
/// `(ModelId, identifier)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(pub usize);

/// Shared handle on a materialized entity of any mapped type.
///
/// The same handle is returned for every row referencing the same
/// `(ModelId, identifier)` within one load, so relation fixers attach the
/// very same instance to every parent.
#[derive(Clone)]
pub struct EntityRef {
    model: ModelId,
    inner: Rc<dyn Any>,
}

impl EntityRef {
    pub fn new<E: 'static>(model: ModelId, entity: E) -> EntityRef {
        EntityRef::from_rc(model, Rc::new(RefCell::new(entity)))
    }

    pub fn from_rc<E: 'static>(model: ModelId, entity: Rc<RefCell<E>>) -> EntityRef {
        EntityRef {
            model,
            inner: entity,
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Returns the typed handle.
    pub fn downcast<E: 'static>(&self) -> Result<Rc<RefCell<E>>> {
        self.inner
            .clone()
            .downcast::<RefCell<E>>()
            .map_err(|_| Error::entity_type_mismatch(type_name::<E>()))
    }

    pub fn with<E: 'static, R>(&self, f: impl FnOnce(&E) -> R) -> Result<R> {
        let cell = self.cell::<E>()?;
        let entity = cell
            .try_borrow()
            .map_err(|_| err!("`{}` is mutably borrowed", type_name::<E>()))?;
        Ok(f(&entity))
    }

    pub fn with_mut<E: 'static, R>(&self, f: impl FnOnce(&mut E) -> R) -> Result<R> {
        let cell = self.cell::<E>()?;
        let mut entity = cell
            .try_borrow_mut()
            .map_err(|_| err!("`{}` is already borrowed", type_name::<E>()))?;
        Ok(f(&mut entity))
    }

    pub fn ptr_eq(&self, other: &EntityRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn cell<E: 'static>(&self) -> Result<&RefCell<E>> {
        self.inner
            .downcast_ref::<RefCell<E>>()
            .ok_or_else(|| Error::entity_type_mismatch(type_name::<E>()))
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("model", &self.model)
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
