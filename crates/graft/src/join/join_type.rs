use graft_core::schema::{Column, Table};
use graft_sql::stmt::JoinOp;

/// How a join is emitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Outer,

    /// Decided by the nullability of the left join column.
    #[default]
    Auto,
}

impl JoinType {
    pub(crate) fn resolve(self, table: &Table, left: &Column) -> JoinType {
        match self {
            JoinType::Auto => match left.nullable {
                Some(true) => JoinType::Outer,
                Some(false) => JoinType::Inner,
                None => {
                    tracing::warn!(
                        table = %table.name,
                        column = %left.name,
                        "graft.strictness: join column nullability is unknown, using an outer join"
                    );
                    JoinType::Outer
                }
            },
            join_type => join_type,
        }
    }

    pub(crate) fn op(self) -> JoinOp {
        match self {
            JoinType::Inner => JoinOp::Inner,
            JoinType::Outer | JoinType::Auto => JoinOp::LeftOuter,
        }
    }
}
