//! Models shared by the load tests.
//!
//! `Toto` has an optional one-to-one `Tata` through `Toto.tata_id`, an
//! ordered one-to-many `Titi` list through `Titi.toto_id` / `Titi.idx`, and
//! a many-to-many `Tata` set through the `Toto_Tata` association table.

use crate::{EntityMapping, Mapping, ModelId};

use graft_core::{
    schema::{Table, TableId},
    stmt::{Type, Value},
};

use std::{cell::RefCell, rc::Rc, sync::Arc};

pub(crate) const TOTO: ModelId = ModelId(0);
pub(crate) const TATA: ModelId = ModelId(1);
pub(crate) const TITI: ModelId = ModelId(2);

#[derive(Debug, Default)]
pub(crate) struct Toto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) tata: Option<Rc<RefCell<Tata>>>,
    pub(crate) titis: Vec<Rc<RefCell<Titi>>>,
    pub(crate) friends: Vec<Rc<RefCell<Tata>>>,
}

#[derive(Debug, Default)]
pub(crate) struct Tata {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Default)]
pub(crate) struct Titi {
    pub(crate) id: i64,
}

pub(crate) struct Schema {
    pub(crate) toto: Arc<Table>,
    pub(crate) tata: Arc<Table>,
    pub(crate) titi: Arc<Table>,
    pub(crate) toto_tata: Arc<Table>,
}

impl Schema {
    pub(crate) fn new() -> Schema {
        Schema {
            toto: Table::builder(TableId(0), "Toto")
                .primary_key("id", Type::I64)
                .column("name", Type::String)
                .nullable("tata_id", Type::I64)
                .build(),
            tata: Table::builder(TableId(1), "Tata")
                .primary_key("id", Type::I64)
                .column("name", Type::String)
                .build(),
            titi: Table::builder(TableId(2), "Titi")
                .primary_key("id", Type::I64)
                .nullable("toto_id", Type::I64)
                .nullable("idx", Type::I64)
                .build(),
            toto_tata: Table::builder(TableId(3), "Toto_Tata")
                .primary_key("toto_id", Type::I64)
                .primary_key("tata_id", Type::I64)
                .build(),
        }
    }

    pub(crate) fn toto_mapping(&self) -> Arc<dyn Mapping> {
        let id = self.toto.expect_column("id");
        let name = self.toto.expect_column("name");
        EntityMapping::new(
            TOTO,
            self.toto.clone(),
            |toto: &Toto| Value::from(toto.id),
            move |row| {
                Ok(Toto {
                    id: row.get(id)?.to_i64()?,
                    name: row.get(name)?.to_string()?,
                    ..Toto::default()
                })
            },
        )
        .into_arc()
    }

    pub(crate) fn tata_mapping(&self) -> Arc<dyn Mapping> {
        let id = self.tata.expect_column("id");
        let name = self.tata.expect_column("name");
        EntityMapping::new(
            TATA,
            self.tata.clone(),
            |tata: &Tata| Value::from(tata.id),
            move |row| {
                Ok(Tata {
                    id: row.get(id)?.to_i64()?,
                    name: row.get(name)?.to_string()?,
                })
            },
        )
        .into_arc()
    }

    pub(crate) fn titi_mapping(&self) -> Arc<dyn Mapping> {
        let id = self.titi.expect_column("id");
        EntityMapping::new(
            TITI,
            self.titi.clone(),
            |titi: &Titi| Value::from(titi.id),
            move |row| {
                Ok(Titi {
                    id: row.get(id)?.to_i64()?,
                })
            },
        )
        .with_selectable_columns(vec![id])
        .into_arc()
    }
}

/// Builds result rows from `(alias, value)` pairs, `None` standing for SQL
/// `NULL`.
pub(crate) fn row(pairs: &[(&str, Option<Value>)]) -> graft_core::driver::Row {
    graft_core::driver::Row::from_pairs(
        pairs
            .iter()
            .map(|(alias, value)| (*alias, value.clone().unwrap_or_default())),
    )
}

pub(crate) fn i(v: i64) -> Option<Value> {
    Some(Value::from(v))
}

pub(crate) fn s(v: &str) -> Option<Value> {
    Some(Value::from(v))
}
