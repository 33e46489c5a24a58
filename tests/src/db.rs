use crate::{models::User, schema::DDL, LoggingExecutor, Schema};

use graft::{driver::Row, stmt::Value, Executor};
use graft_driver_sqlite::Sqlite;
use graft_test_util::ExecLog;

use std::{cell::RefCell, rc::Rc};

const SEED: &str = r#"
INSERT INTO "Profile" ("id", "bio") VALUES (100, 'hello');

INSERT INTO "User" ("id", "name", "profile_id") VALUES
    (1, 'ann', 100),
    (2, 'bob', NULL),
    (3, 'cid', 100);

INSERT INTO "Todo" ("id", "user_id", "position", "title") VALUES
    (10, 1, 1, 'write'),
    (11, 1, 0, 'read'),
    (12, 2, 0, 'sleep');

INSERT INTO "Tag" ("id", "name") VALUES
    (1, 'red'),
    (2, 'green'),
    (3, 'blue');

INSERT INTO "User_Tag" ("user_id", "tag_id", "position") VALUES
    (1, 2, 0),
    (1, 1, 1),
    (2, 3, 0),
    (3, 2, 0);
"#;

/// An in-memory database holding the `User` domain.
///
/// Seeded content:
///
/// | user | profile | todos (in order) | tags (in order) |
/// |------|---------|------------------|-----------------|
/// | 1 ann | 100 | read, write | green, red |
/// | 2 bob | none | sleep | blue |
/// | 3 cid | 100 | none | green |
pub struct Db {
    pub schema: Schema,
    exec: LoggingExecutor<Sqlite>,
}

impl Db {
    pub fn empty() -> Db {
        let sqlite = Sqlite::in_memory().unwrap();
        sqlite.execute_batch(DDL).unwrap();
        Db {
            schema: Schema::new(),
            exec: LoggingExecutor::new(sqlite),
        }
    }

    pub fn seeded() -> Db {
        let db = Db::empty();
        db.exec.inner().execute_batch(SEED).unwrap();
        db
    }

    pub fn exec(&mut self) -> &mut LoggingExecutor<Sqlite> {
        &mut self.exec
    }

    pub fn log(&self) -> &ExecLog {
        self.exec.log()
    }

    /// Loads users with the full tree of [`Schema::user_tree`].
    pub fn users(&mut self, ids: &[i64]) -> Vec<Rc<RefCell<User>>> {
        let ids: Vec<Value> = ids.iter().copied().map(Value::from).collect();
        self.schema
            .user_loader()
            .select_as::<User>(&mut self.exec, &ids)
            .unwrap()
    }

    pub fn user(&mut self, id: i64) -> Rc<RefCell<User>> {
        let mut users = self.users(&[id]);
        assert_eq!(users.len(), 1, "user {id} not found");
        users.remove(0)
    }

    /// Runs `sql` outside the statement log.
    pub fn rows(&mut self, sql: &str) -> Vec<Row> {
        self.exec.inner_mut().exec_select(sql, &[]).unwrap().collect()
    }
}
