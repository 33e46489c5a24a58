use super::{NodeId, NodeName};

use graft_core::{driver::Flavor, schema::ColumnId, stmt::Value};
use graft_sql::{
    stmt::{ColumnRef, Expr, Select},
    Serializer,
};

use std::collections::HashMap;

/// Column alias of every selected column of one node.
pub(crate) type NodeAliases = HashMap<ColumnId, String>;

/// The select built from a [`JoinTree`](super::JoinTree), together with the
/// alias bookkeeping needed to decode its rows.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) select: Select,

    /// Indexed by node.
    pub(crate) aliases: Vec<NodeAliases>,

    pub(crate) names: HashMap<NodeName, NodeId>,

    /// Root primary key columns, qualified with the root's alias.
    pub(crate) root_key: Vec<ColumnRef>,
}

impl Query {
    pub fn select(&self) -> &Select {
        &self.select
    }

    /// Renders the unfiltered select.
    pub fn to_sql(&self, flavor: Flavor) -> String {
        let mut params: Vec<Value> = vec![];
        Serializer::new(flavor).serialize(&self.select.clone().into(), &mut params)
    }

    /// Alias under which `column` of `node` appears in the result rows.
    pub fn column_alias(&self, node: &str, column: ColumnId) -> Option<&str> {
        let id = self.names.get(node)?;
        self.aliases[id.0].get(&column).map(String::as_str)
    }

    pub(crate) fn aliases(&self, node: NodeId) -> &NodeAliases {
        &self.aliases[node.0]
    }

    /// Restricts the select to the given root identifiers.
    ///
    /// Composite keys use a row-value `IN` when the database supports it and
    /// a disjunction of key equalities otherwise.
    pub(crate) fn select_by_ids(&self, ids: &[Value], row_value_in: bool) -> Select {
        let filter = if self.root_key.len() == 1 || row_value_in {
            Expr::in_list(self.root_key.clone(), ids.to_vec())
        } else {
            Expr::or(
                ids.iter()
                    .map(|id| Expr::key_eq(&self.root_key, id))
                    .collect(),
            )
        };
        self.select.with_filter(filter)
    }
}
