use super::{
    AliasSet, JoinLink, JoinNode, JoinType, LinkKind, Located, NodeAliases, NodeId, NodeName,
    NodeRole, Query,
};
use crate::{
    load::{DeferredLink, DeferredRelation},
    Mapping, RelationFixer,
};

use graft_core::{
    schema::{ColumnId, Table},
    Error, Result,
};
use graft_sql::stmt::{ColumnRef, Join, Select, SelectItem, TableRef};

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

/// Describes one eager select: a root entity, the joins reaching related
/// entities, and how each joined row part is turned into objects.
///
/// Trees are assembled once at configuration time and are read-only
/// afterwards; one tree serves any number of loads.
#[derive(Debug, Clone)]
pub struct JoinTree {
    nodes: Vec<JoinNode>,
    names: HashMap<NodeName, NodeId>,
}

/// A node about to be linked into the tree.
pub(super) struct NewNode {
    pub(super) table: Arc<Table>,
    pub(super) table_alias: Option<String>,
    pub(super) mapping: Option<Arc<dyn Mapping>>,
    pub(super) columns: Vec<ColumnId>,
    pub(super) role: NodeRole,
}

impl NewNode {
    fn entity(mapping: Arc<dyn Mapping>, role: NodeRole) -> NewNode {
        let mut columns = mapping.selectable_columns();
        for pk in mapping.primary_key_columns() {
            if !columns.contains(pk) {
                columns.push(*pk);
            }
        }
        NewNode {
            table: mapping.table().clone(),
            table_alias: None,
            mapping: Some(mapping),
            columns,
            role,
        }
    }
}

impl JoinTree {
    pub fn new(root: Arc<dyn Mapping>) -> JoinTree {
        let node = NewNode::entity(root, NodeRole::Root);
        let name = NodeName::new(NodeName::ROOT);

        JoinTree {
            nodes: vec![JoinNode {
                name: name.clone(),
                table: node.table,
                table_alias: None,
                columns: node.columns,
                mapping: node.mapping,
                role: NodeRole::Root,
                parent: None,
                links: vec![],
                deferred: vec![],
            }],
            names: HashMap::from([(name, NodeId::ROOT)]),
        }
    }

    pub fn root(&self) -> NodeName {
        self.nodes[0].name.clone()
    }

    pub fn root_mapping(&self) -> &Arc<dyn Mapping> {
        // The root is always built from a mapping.
        match &self.nodes[0].mapping {
            Some(mapping) => mapping,
            None => unreachable!("join tree root without a mapping"),
        }
    }

    pub fn contains(&self, node: &str) -> bool {
        self.names.contains_key(node)
    }

    /// Joins an entity that is instantiated from the joined columns and
    /// attached to the parent's entity by `fixer`.
    pub fn add_relation_join(
        &mut self,
        parent: &str,
        mapping: Arc<dyn Mapping>,
        left: ColumnId,
        right: ColumnId,
        join_type: JoinType,
        fixer: RelationFixer,
    ) -> Result<NodeName> {
        let parent = self.lookup(parent)?;
        let child = self.link(
            parent,
            NewNode::entity(mapping, NodeRole::Entity),
            left,
            right,
            join_type,
            LinkKind::Relation { fixer, index: None },
        )?;
        Ok(self.nodes[child.0].name.clone())
    }

    /// Joins a subtype table whose columns are merged into the entity of
    /// `parent`.
    pub fn add_merge_join(
        &mut self,
        parent: &str,
        mapping: Arc<dyn Mapping>,
        left: ColumnId,
        right: ColumnId,
    ) -> Result<NodeName> {
        self.add_merge_join_as(parent, mapping, left, right, JoinType::Inner)
    }

    /// Like [`add_merge_join`](Self::add_merge_join) with an explicit join
    /// type. Polymorphic loads outer join every subtype table.
    pub fn add_merge_join_as(
        &mut self,
        parent: &str,
        mapping: Arc<dyn Mapping>,
        left: ColumnId,
        right: ColumnId,
        join_type: JoinType,
    ) -> Result<NodeName> {
        let parent = self.lookup(parent)?;
        let child = self.link(
            parent,
            NewNode::entity(mapping, NodeRole::Merge),
            left,
            right,
            join_type,
            LinkKind::Merge,
        )?;
        Ok(self.nodes[child.0].name.clone())
    }

    /// Joins a table only to reach further joins, typically an association
    /// table. No entity is created for it.
    pub fn add_passive_join(
        &mut self,
        parent: &str,
        table: Arc<Table>,
        left: ColumnId,
        right: ColumnId,
        join_type: JoinType,
        columns: Vec<ColumnId>,
    ) -> Result<NodeName> {
        let parent = self.lookup(parent)?;
        let child = self.link(
            parent,
            NewNode {
                table,
                table_alias: None,
                mapping: None,
                columns,
                role: NodeRole::Passive,
            },
            left,
            right,
            join_type,
            LinkKind::Passive,
        )?;
        Ok(self.nodes[child.0].name.clone())
    }

    /// Registers a relation resolved by a second select once the rows of
    /// this tree are consumed.
    pub fn add_deferred_relation(&mut self, node: &str, relation: DeferredRelation) -> Result<()> {
        let node = self.lookup(node)?;
        self.bind_deferred(node, relation)
    }

    /// Makes the relation leading to `node` an ordered one: its fixer is
    /// applied in the order of `column` instead of row arrival order.
    pub fn order_relation_by(&mut self, node: &str, column: ColumnId) -> Result<()> {
        let id = self.lookup(node)?;
        let index = self.locate_selected(id, column)?;
        self.set_relation_index(id, index)
    }

    pub fn set_table_alias(&mut self, node: &str, alias: impl Into<String>) -> Result<()> {
        let id = self.lookup(node)?;
        self.nodes[id.0].table_alias = Some(alias.into());
        Ok(())
    }

    /// Builds the select covering every node of the tree.
    pub fn build_select_query(&self) -> Query {
        let order = self.bfs();

        let mut table_aliases = AliasSet::default();
        let mut column_aliases = AliasSet::default();
        let mut qualifiers = vec![String::new(); self.nodes.len()];
        let mut aliases = vec![NodeAliases::new(); self.nodes.len()];
        let mut columns = vec![];

        for id in &order {
            let node = &self.nodes[id.0];
            let qualifier =
                table_aliases.claim(node.table_alias.as_deref().unwrap_or(&node.table.name));

            for column in &node.columns {
                let name = &node.table.columns[column.index].name;
                let alias = column_aliases.claim(&format!("{qualifier}_{name}"));
                columns.push(SelectItem {
                    column: ColumnRef::qualified(&qualifier, name),
                    alias: alias.clone(),
                });
                aliases[id.0].insert(*column, alias);
            }

            qualifiers[id.0] = qualifier;
        }

        let root = &self.nodes[0];
        let mut select = Select::new(TableRef::aliased(&root.table.name, &qualifiers[0]));
        select.columns = columns;

        for id in &order {
            for link in &self.nodes[id.0].links {
                let child = &self.nodes[link.child.0];
                let left = &self.nodes[link.left.node.0].table.columns[link.left.column.index];
                let right = &child.table.columns[link.right.index];

                select.joins.push(Join {
                    op: link.join_type.op(),
                    table: TableRef::aliased(&child.table.name, &qualifiers[link.child.0]),
                    left: ColumnRef::qualified(&qualifiers[link.left.node.0], &left.name),
                    right: ColumnRef::qualified(&qualifiers[link.child.0], &right.name),
                });
            }
        }

        let root_key = root
            .table
            .primary_key_columns()
            .map(|column| ColumnRef::qualified(&qualifiers[0], &column.name))
            .collect();

        Query {
            select,
            aliases,
            names: self.names.clone(),
            root_key,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &JoinNode {
        &self.nodes[id.0]
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<NodeId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_join_node(name))
    }

    /// Node ids in breadth-first discovery order, root first.
    pub(crate) fn bfs(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([NodeId::ROOT]);

        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.nodes[id.0].links.iter().map(|link| link.child));
        }

        order
    }

    pub(super) fn link(
        &mut self,
        parent: NodeId,
        node: NewNode,
        left: ColumnId,
        right: ColumnId,
        join_type: JoinType,
        kind: LinkKind,
    ) -> Result<NodeId> {
        if matches!(kind, LinkKind::Merge) && !self.nodes[parent.0].has_inflater() {
            return Err(Error::missing_inflater(self.nodes[parent.0].name.as_str()));
        }

        if !node.table.contains(right) {
            return Err(Error::invalid_join(format!(
                "right column {right:?} is not a column of `{}`",
                node.table.name
            )));
        }

        let left = self.locate(parent, left)?;
        let join_type = {
            let owner = &self.nodes[left.node.0].table;
            join_type.resolve(owner, &owner.columns[left.column.index])
        };

        let id = NodeId(self.nodes.len());
        let name = NodeName::new(format!("{}_{}", node.table.name, id.0));

        self.nodes.push(JoinNode {
            name: name.clone(),
            table: node.table,
            table_alias: node.table_alias,
            columns: node.columns,
            mapping: node.mapping,
            role: node.role,
            parent: Some(parent),
            links: vec![],
            deferred: vec![],
        });
        self.names.insert(name, id);
        self.nodes[parent.0].links.push(JoinLink {
            left,
            right,
            join_type,
            kind,
            child: id,
        });

        Ok(id)
    }

    /// Passive nodes may carry deferred relations: their source entity is
    /// the one of the nearest non-passive ancestor.
    pub(super) fn bind_deferred(&mut self, node: NodeId, relation: DeferredRelation) -> Result<()> {
        let key = relation
            .target_key
            .iter()
            .map(|column| self.locate_selected(node, *column))
            .collect::<Result<Vec<_>>>()?;
        let discriminator = relation
            .discriminator()
            .map(|column| self.locate_selected(node, column))
            .transpose()?;
        let index = relation
            .index
            .map(|column| self.locate_selected(node, column))
            .transpose()?;

        self.nodes[node.0].deferred.push(DeferredLink {
            relation,
            key,
            discriminator,
            index,
        });
        Ok(())
    }

    pub(super) fn set_relation_index(&mut self, node: NodeId, index: Located) -> Result<()> {
        let name = self.nodes[node.0].name.clone();
        let link = self.nodes[node.0]
            .parent
            .and_then(|parent| {
                self.nodes[parent.0]
                    .links
                    .iter_mut()
                    .find(|link| link.child == node)
            })
            .ok_or_else(|| Error::invalid_join(format!("`{name}` is not joined to a parent")))?;

        match &mut link.kind {
            LinkKind::Relation { index: slot, .. } => {
                *slot = Some(index);
                Ok(())
            }
            _ => Err(Error::invalid_join(format!(
                "`{name}` is not a relation join and cannot be ordered"
            ))),
        }
    }

    /// Finds the nearest node, starting at `from` and walking up, whose table
    /// holds `column`.
    pub(super) fn locate(&self, from: NodeId, column: ColumnId) -> Result<Located> {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if node.table.contains(column) {
                return Ok(Located { column, node: id });
            }
            current = node.parent;
        }

        Err(Error::invalid_join(format!(
            "column {column:?} is not reachable from `{}`",
            self.nodes[from.0].name
        )))
    }

    /// Like `locate`, and adds the column to the owning node's select list.
    pub(super) fn locate_selected(&mut self, from: NodeId, column: ColumnId) -> Result<Located> {
        let located = self.locate(from, column)?;
        self.nodes[located.node.0].select(column);
        Ok(located)
    }

    pub(super) fn nodes(&self) -> &[JoinNode] {
        &self.nodes
    }
}
