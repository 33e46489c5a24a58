use super::{Comma, Formatter, Ident, Params, ToSql};

use crate::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::SelectItem {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, &self.column, " AS ", Ident(&self.alias));
    }
}

impl ToSql for &stmt::TableRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.name));

        if let Some(alias) = &self.alias {
            fmt!(f, " AS ", Ident(alias));
        }
    }
}

impl ToSql for &stmt::Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let op = match self.op {
            stmt::JoinOp::Inner => " INNER JOIN ",
            stmt::JoinOp::LeftOuter => " LEFT OUTER JOIN ",
        };

        fmt!(f, op, &self.table, " ON ", &self.left, " = ", &self.right);
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT ", Comma(&self.columns), " FROM ", &self.from);

        for join in &self.joins {
            join.to_sql(f);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let values = Comma(&self.values);

        fmt!(
            f,
            "INSERT INTO ",
            Ident(&self.table),
            " (",
            columns,
            ") VALUES (",
            values,
            ")"
        );
    }
}

struct Assignment<'a>(&'a (String, graft_core::stmt::Value));

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let (column, value) = self.0;
        fmt!(f, Ident(column), " = ", value);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(self.assignments.iter().map(Assignment));

        fmt!(
            f,
            "UPDATE ",
            Ident(&self.table),
            " SET ",
            assignments,
            " WHERE ",
            &self.filter
        );
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM ", Ident(&self.table), " WHERE ", &self.filter);
    }
}
