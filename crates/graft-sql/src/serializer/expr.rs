use super::{Comma, Delimited, Formatter, Ident, Params, ToSql};

use crate::stmt::{ColumnRef, Expr};
use graft_core::stmt::Value;

impl ToSql for &ColumnRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(qualifier) = &self.qualifier {
            fmt!(f, Ident(qualifier), ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Value::Record(record) => {
                fmt!(f, "(", Comma(record.iter()), ")");
            }
            value => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
        }
    }
}

/// Operand of a boolean connective, parenthesized when it is itself a
/// connective of another kind.
struct Operand<'a> {
    expr: &'a Expr,
    parent_is_and: bool,
}

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let nested = match self.expr {
            Expr::Or(_) => self.parent_is_and,
            Expr::And(_) => !self.parent_is_and,
            _ => false,
        };

        if nested {
            fmt!(f, "(", self.expr, ")");
        } else {
            fmt!(f, self.expr);
        }
    }
}

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::Column(column) => column.to_sql(f),
            Expr::Value(value) => value.to_sql(f),
            Expr::Eq(lhs, rhs) => fmt!(f, &**lhs, " = ", &**rhs),
            Expr::And(operands) => {
                let operands = operands.iter().map(|expr| Operand {
                    expr,
                    parent_is_and: true,
                });
                fmt!(f, Delimited(operands, " AND "));
            }
            Expr::Or(operands) => {
                let operands = operands.iter().map(|expr| Operand {
                    expr,
                    parent_is_and: false,
                });
                fmt!(f, Delimited(operands, " OR "));
            }
            Expr::InList { lhs, keys } => in_list(lhs, keys, f),
        }
    }
}

fn in_list<P: Params>(lhs: &[ColumnRef], keys: &[Value], f: &mut Formatter<'_, P>) {
    match lhs {
        [column] => fmt!(f, column, " IN (", Comma(keys), ")"),
        columns => fmt!(f, "(", Comma(columns), ") IN (", Comma(keys), ")"),
    }
}
