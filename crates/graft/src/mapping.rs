use crate::{EntityRef, ModelId};

use graft_core::{
    driver::Row,
    err,
    schema::{ColumnId, Table},
    stmt::Value,
    Result,
};

use std::{collections::HashMap, marker::PhantomData, sync::Arc};

/// Turns rows into entities of one type and extracts their identifiers.
///
/// A mapping is bound to a table. A join node that carries a mapping selects
/// the mapping's columns and hands each row to it through a [`RowReader`]
/// resolving column identifiers to the aliases of that node.
pub trait Mapping: Send + Sync + 'static {
    fn model(&self) -> ModelId;

    fn table(&self) -> &Arc<Table>;

    fn primary_key_columns(&self) -> &[ColumnId] {
        &self.table().primary_key.columns
    }

    /// Columns read when materializing. Defaults to every column.
    fn selectable_columns(&self) -> Vec<ColumnId> {
        self.table().columns.iter().map(|column| column.id).collect()
    }

    fn insertable_columns(&self) -> Vec<ColumnId> {
        self.table().columns.iter().map(|column| column.id).collect()
    }

    fn updatable_columns(&self) -> Vec<ColumnId> {
        self.table()
            .columns
            .iter()
            .filter(|column| !column.primary_key)
            .map(|column| column.id)
            .collect()
    }

    /// Reads the identifier from a row. Absent when the row has no entity for
    /// this node, as produced by an unmatched outer join.
    fn identifier(&self, row: &RowReader<'_>) -> Result<Value> {
        row.key(self.primary_key_columns())
    }

    /// Identifier of an already materialized entity.
    fn identifier_of(&self, entity: &EntityRef) -> Result<Value>;

    fn instantiate(&self, row: &RowReader<'_>) -> Result<EntityRef>;

    /// Folds the columns of a joined subtype table into an existing entity.
    fn merge(&self, entity: &EntityRef, row: &RowReader<'_>) -> Result<()>;
}

/// Reads one join node's columns out of a row.
#[derive(Debug, Clone, Copy)]
pub struct RowReader<'a> {
    row: &'a Row,
    aliases: &'a HashMap<ColumnId, String>,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(row: &'a Row, aliases: &'a HashMap<ColumnId, String>) -> RowReader<'a> {
        RowReader { row, aliases }
    }

    pub fn get_ref(&self, column: ColumnId) -> Result<&'a Value> {
        let Some(alias) = self.aliases.get(&column) else {
            return Err(err!("column {column:?} is not selected by this join node"));
        };
        self.row
            .get(alias)
            .ok_or_else(|| err!("row has no column `{alias}`"))
    }

    pub fn get(&self, column: ColumnId) -> Result<Value> {
        self.get_ref(column).cloned()
    }

    /// Reads a key spanning one or more columns.
    pub fn key(&self, columns: &[ColumnId]) -> Result<Value> {
        let parts = columns
            .iter()
            .map(|column| self.get(*column))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::from_key_parts(parts))
    }
}

type IdOf<E> = Box<dyn Fn(&E) -> Value + Send + Sync>;
type FromRow<E> = Box<dyn Fn(&RowReader<'_>) -> Result<E> + Send + Sync>;
type MergeRow<E> = Box<dyn Fn(&mut E, &RowReader<'_>) -> Result<()> + Send + Sync>;

/// A [`Mapping`] assembled from closures.
pub struct EntityMapping<E> {
    model: ModelId,
    table: Arc<Table>,
    selectable: Option<Vec<ColumnId>>,
    id_of: IdOf<E>,
    from_row: Option<FromRow<E>>,
    merge_row: Option<MergeRow<E>>,
    _p: PhantomData<fn() -> E>,
}

impl<E: 'static> EntityMapping<E> {
    pub fn new(
        model: ModelId,
        table: Arc<Table>,
        id_of: impl Fn(&E) -> Value + Send + Sync + 'static,
        from_row: impl Fn(&RowReader<'_>) -> Result<E> + Send + Sync + 'static,
    ) -> EntityMapping<E> {
        EntityMapping {
            model,
            table,
            selectable: None,
            id_of: Box::new(id_of),
            from_row: Some(Box::new(from_row)),
            merge_row: None,
            _p: PhantomData,
        }
    }

    /// A mapping for a joined subtype table. It never creates entities, it
    /// only merges its columns into the one created by its parent node.
    pub fn merging(
        model: ModelId,
        table: Arc<Table>,
        id_of: impl Fn(&E) -> Value + Send + Sync + 'static,
        merge_row: impl Fn(&mut E, &RowReader<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> EntityMapping<E> {
        EntityMapping {
            model,
            table,
            selectable: None,
            id_of: Box::new(id_of),
            from_row: None,
            merge_row: Some(Box::new(merge_row)),
            _p: PhantomData,
        }
    }

    pub fn with_selectable_columns(mut self, columns: Vec<ColumnId>) -> EntityMapping<E> {
        self.selectable = Some(columns);
        self
    }

    pub fn into_arc(self) -> Arc<dyn Mapping> {
        Arc::new(self)
    }
}

impl<E: 'static> Mapping for EntityMapping<E> {
    fn model(&self) -> ModelId {
        self.model
    }

    fn table(&self) -> &Arc<Table> {
        &self.table
    }

    fn selectable_columns(&self) -> Vec<ColumnId> {
        match &self.selectable {
            Some(columns) => columns.clone(),
            None => self.table.columns.iter().map(|column| column.id).collect(),
        }
    }

    fn identifier_of(&self, entity: &EntityRef) -> Result<Value> {
        entity.with(|entity: &E| (self.id_of)(entity))
    }

    fn instantiate(&self, row: &RowReader<'_>) -> Result<EntityRef> {
        let Some(from_row) = &self.from_row else {
            return Err(err!(
                "mapping for `{}` only merges into existing entities",
                self.table.name
            ));
        };
        Ok(EntityRef::new(self.model, from_row(row)?))
    }

    fn merge(&self, entity: &EntityRef, row: &RowReader<'_>) -> Result<()> {
        let Some(merge_row) = &self.merge_row else {
            return Err(err!("mapping for `{}` cannot merge rows", self.table.name));
        };
        entity.with_mut(|entity: &mut E| merge_row(entity, row))?
    }
}
