#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod expr;
mod statement;

use crate::stmt::Statement;
use graft_core::driver::Flavor;

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn new(flavor: Flavor) -> Serializer {
        Serializer { flavor }
    }

    /// Renders `stmt`, pushing every bound value onto `params` in placeholder
    /// order.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::{self, ColumnRef, Expr, JoinOp, TableRef};
    use graft_core::stmt::Value;
    use pretty_assertions::assert_eq;

    fn toto_tata() -> stmt::Select {
        let mut select = stmt::Select::new(TableRef::new("Toto"));
        select.columns.push(stmt::SelectItem {
            column: ColumnRef::qualified("Toto", "id"),
            alias: "Toto_id".into(),
        });
        select.columns.push(stmt::SelectItem {
            column: ColumnRef::qualified("t2", "firstName"),
            alias: "t2_firstName".into(),
        });
        select.joins.push(stmt::Join {
            op: JoinOp::LeftOuter,
            table: TableRef::aliased("Tata", "t2"),
            left: ColumnRef::qualified("Toto", "id"),
            right: ColumnRef::qualified("t2", "id"),
        });
        select
    }

    #[test]
    fn select_with_outer_join() {
        let mut params: Vec<Value> = vec![];
        let sql = Serializer::sqlite().serialize(&toto_tata().into(), &mut params);

        assert_eq!(
            sql,
            r#"SELECT "Toto"."id" AS "Toto_id", "t2"."firstName" AS "t2_firstName" FROM "Toto" LEFT OUTER JOIN "Tata" AS "t2" ON "Toto"."id" = "t2"."id""#
        );
        assert!(params.is_empty());
    }

    #[test]
    fn in_list_placeholders_per_flavor() {
        let select = toto_tata().with_filter(Expr::in_list(
            vec![ColumnRef::qualified("Toto", "id")],
            vec![Value::from(1_i64), Value::from(2_i64)],
        ));
        let stmt: Statement = select.into();

        let mut params: Vec<Value> = vec![];
        let sqlite = Serializer::sqlite().serialize(&stmt, &mut params);
        assert!(sqlite.ends_with(r#"WHERE "Toto"."id" IN (?1, ?2)"#), "{sqlite}");
        assert_eq!(params, [Value::from(1_i64), Value::from(2_i64)]);

        let postgres = Serializer::postgresql().serialize(&stmt, &mut Vec::<Value>::new());
        assert!(postgres.ends_with(r#"WHERE "Toto"."id" IN ($1, $2)"#), "{postgres}");

        let mysql = Serializer::mysql().serialize(&stmt, &mut Vec::<Value>::new());
        assert!(mysql.ends_with("WHERE `Toto`.`id` IN (?, ?)"), "{mysql}");
    }

    #[test]
    fn composite_in_list_uses_row_values() {
        let filter = Expr::in_list(
            vec![ColumnRef::bare("a"), ColumnRef::bare("b")],
            vec![
                Value::record_from_vec(vec![1_i64.into(), "x".into()]),
                Value::record_from_vec(vec![2_i64.into(), "y".into()]),
            ],
        );
        let stmt: Statement = stmt::Delete {
            table: "link".into(),
            filter,
        }
        .into();

        let mut params: Vec<Value> = vec![];
        let sql = Serializer::sqlite().serialize(&stmt, &mut params);
        assert_eq!(
            sql,
            r#"DELETE FROM "link" WHERE ("a", "b") IN ((?1, ?2), (?3, ?4))"#
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn insert_update_delete() {
        let insert = stmt::Insert {
            table: "Toto_tatas".into(),
            columns: vec!["toto_id".into(), "tata_id".into(), "idx".into()],
            values: vec![1_i64.into(), 2_i64.into(), 0_i64.into()],
        };
        let mut params: Vec<Value> = vec![];
        assert_eq!(
            Serializer::postgresql().serialize(&insert.into(), &mut params),
            r#"INSERT INTO "Toto_tatas" ("toto_id", "tata_id", "idx") VALUES ($1, $2, $3)"#
        );
        assert_eq!(params.len(), 3);

        let update = stmt::Update {
            table: "Toto_tatas".into(),
            assignments: vec![("idx".into(), 1_i64.into())],
            filter: Expr::and(vec![
                Expr::eq(ColumnRef::bare("toto_id"), Value::from(1_i64)),
                Expr::eq(ColumnRef::bare("idx"), Value::from(0_i64)),
            ]),
        };
        assert_eq!(
            Serializer::sqlite().serialize(&update.into(), &mut Vec::<Value>::new()),
            r#"UPDATE "Toto_tatas" SET "idx" = ?1 WHERE "toto_id" = ?2 AND "idx" = ?3"#
        );

        let delete = stmt::Delete {
            table: "Toto_tatas".into(),
            filter: Expr::key_eq(
                &[ColumnRef::bare("toto_id"), ColumnRef::bare("tata_id")],
                &Value::record_from_vec(vec![1_i64.into(), 2_i64.into()]),
            ),
        };
        assert_eq!(
            Serializer::sqlite().serialize(&delete.into(), &mut Vec::<Value>::new()),
            r#"DELETE FROM "Toto_tatas" WHERE "toto_id" = ?1 AND "tata_id" = ?2"#
        );
    }

    #[test]
    fn identifiers_are_escaped() {
        let delete = stmt::Delete {
            table: "we\"ird".into(),
            filter: Expr::eq(ColumnRef::bare("id"), Value::from(1_i64)),
        };
        assert_eq!(
            Serializer::sqlite().serialize(&delete.into(), &mut Vec::<Value>::new()),
            r#"DELETE FROM "we""ird" WHERE "id" = ?1"#
        );
    }
}
