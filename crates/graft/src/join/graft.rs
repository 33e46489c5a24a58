use super::{tree::NewNode, JoinTree, LinkKind, Located, NodeId};

use graft_core::{schema::ColumnId, Error, Result};

use std::collections::HashMap;

impl JoinTree {
    /// Re-creates this tree's joins under `node` of `target`. The target
    /// node must select from the same table as this tree's root.
    pub fn copy_to(&self, target: &mut JoinTree, node: &str) -> Result<()> {
        self.graft(target, node, false)
    }

    /// Like [`copy_to`](Self::copy_to), for a target node whose table differs
    /// from this tree's root table. Join columns of the root are replaced by
    /// the same-named columns of the target node's table.
    pub fn project_to(&self, target: &mut JoinTree, node: &str) -> Result<()> {
        self.graft(target, node, true)
    }

    fn graft(&self, target: &mut JoinTree, node: &str, project: bool) -> Result<()> {
        let at = target.lookup(node)?;
        let nodes = self.nodes();

        let rebase = |target: &JoinTree, located: Located| -> Result<ColumnId> {
            if !project || located.node != NodeId::ROOT {
                return Ok(located.column);
            }
            let name = &nodes[0].table.columns[located.column.index].name;
            let table = &target.nodes()[at.0].table;
            table
                .column_by_name(name)
                .map(|column| column.id)
                .ok_or_else(|| {
                    Error::invalid_join(format!(
                        "`{}` has no column `{name}` to project onto",
                        table.name
                    ))
                })
        };

        let mut ids = HashMap::from([(NodeId::ROOT, at)]);

        for id in self.bfs() {
            let parent = ids[&id];

            for link in &nodes[id.0].links {
                let child = &nodes[link.child.0];
                let left = rebase(&*target, link.left)?;
                let kind = match &link.kind {
                    LinkKind::Relation { fixer, .. } => LinkKind::Relation {
                        fixer: fixer.clone(),
                        index: None,
                    },
                    kind => kind.clone(),
                };

                let new_id = target.link(
                    parent,
                    NewNode {
                        table: child.table.clone(),
                        table_alias: child.table_alias.clone(),
                        mapping: child.mapping.clone(),
                        columns: child.columns.clone(),
                        role: child.role,
                    },
                    left,
                    link.right,
                    link.join_type,
                    kind,
                )?;
                ids.insert(link.child, new_id);

                if let LinkKind::Relation {
                    index: Some(index), ..
                } = &link.kind
                {
                    let column = rebase(&*target, *index)?;
                    let index = target.locate_selected(new_id, column)?;
                    target.set_relation_index(new_id, index)?;
                }
            }
        }

        for id in self.bfs() {
            for deferred in &nodes[id.0].deferred {
                let mut relation = deferred.relation.clone();
                relation.target_key = deferred
                    .key
                    .iter()
                    .map(|located| rebase(&*target, *located))
                    .collect::<Result<_>>()?;
                if let Some(located) = deferred.discriminator {
                    relation.set_discriminator(rebase(&*target, located)?);
                }
                relation.index = deferred
                    .index
                    .map(|located| rebase(&*target, located))
                    .transpose()?;

                target.bind_deferred(ids[&id], relation)?;
            }
        }

        Ok(())
    }
}
