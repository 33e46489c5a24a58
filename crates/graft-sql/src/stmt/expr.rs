use super::ColumnRef;
use graft_core::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),

    /// Bound as a positional parameter.
    Value(Value),

    Eq(Box<Expr>, Box<Expr>),

    And(Vec<Expr>),

    Or(Vec<Expr>),

    /// `lhs IN (...)` over keys. With several `lhs` columns, every key is a
    /// record with one field per column.
    InList { lhs: Vec<ColumnRef>, keys: Vec<Value> },
}

impl Expr {
    pub fn eq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::Eq(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn and(mut operands: Vec<Expr>) -> Expr {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::And(operands)
        }
    }

    pub fn or(mut operands: Vec<Expr>) -> Expr {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::Or(operands)
        }
    }

    /// Matches each column against the corresponding part of `key`.
    pub fn key_eq(columns: &[ColumnRef], key: &Value) -> Expr {
        let parts = key.key_parts();
        Expr::and(
            columns
                .iter()
                .zip(parts)
                .map(|(column, part)| Expr::eq(column.clone(), part.clone()))
                .collect(),
        )
    }

    pub fn in_list(lhs: Vec<ColumnRef>, keys: Vec<Value>) -> Expr {
        Expr::InList { lhs, keys }
    }
}

impl From<ColumnRef> for Expr {
    fn from(value: ColumnRef) -> Self {
        Expr::Column(value)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}
