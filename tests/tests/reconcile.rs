use graft::reconcile::{Reconciler, Step};
use pretty_assertions::assert_eq;
use tests::prelude::*;

fn snapshot(db: &mut Db, id: i64) -> UserSnapshot {
    UserSnapshot::of(&db.user(id).borrow())
}

fn todo(id: i64, title: &str) -> Todo {
    Todo {
        id,
        user_id: None,
        title: title.to_string(),
    }
}

#[test]
fn reorders_adds_and_detaches_todos() {
    let mut db = Db::seeded();
    let old = snapshot(&mut db, 1);
    assert_eq!(old.todos, [
        Todo { user_id: Some(1), ..todo(11, "read") },
        Todo { user_id: Some(1), ..todo(10, "write") },
    ]);

    let mut new = old.clone();
    new.todos = vec![old.todos[1].clone(), todo(13, "walk")];

    let reconciler = Reconciler::new(db.schema.todos_relation());
    let mut persister = db.schema.todo_persister([10, 11, 12]);
    let plan = reconciler.reconcile(&persister, Some(&old), Some(&new));

    let kinds: Vec<_> = plan
        .steps()
        .iter()
        .map(|step| match step {
            Step::UpdateChildren(_) => "update",
            Step::InsertChildren(_) => "insert",
            Step::UpdateIndexes(_) => "index",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["update", "insert", "index"]);

    db.log().clear();
    assert_ok!(plan.apply(&mut persister, db.exec()));
    assert_eq!(
        db.log().sql(),
        [
            r#"UPDATE "Todo" SET "user_id" = ?1 WHERE "id" = ?2"#,
            r#"INSERT INTO "Todo" ("id", "user_id", "position", "title") VALUES (?1, ?2, ?3, ?4)"#,
            r#"UPDATE "Todo" SET "position" = ?1 WHERE "id" = ?2"#,
            r#"UPDATE "Todo" SET "position" = ?1 WHERE "id" = ?2"#,
        ]
    );

    let ann = db.user(1);
    assert_eq!(ann.borrow().todo_titles(), ["write", "walk"]);

    // Detached, not deleted.
    let detached = db.rows(r#"SELECT "user_id" FROM "Todo" WHERE "id" = 11"#);
    assert_eq!(detached.len(), 1);
    assert_eq!(detached[0].get("user_id"), Some(&Value::Null));

    // A second pass over the reloaded state finds nothing to do.
    let reloaded = UserSnapshot::of(&ann.borrow());
    let persister = db.schema.todo_persister([10, 11, 12, 13]);
    assert!(reconciler
        .reconcile(&persister, Some(&reloaded), Some(&reloaded))
        .is_empty());
}

#[test]
fn orphan_removal_deletes_todos() {
    let mut db = Db::seeded();
    let old = snapshot(&mut db, 2);
    let new = UserSnapshot {
        todos: vec![],
        ..old.clone()
    };

    let reconciler = Reconciler::new(db.schema.todos_relation().delete_removed(true));
    let mut persister = db.schema.todo_persister([10, 11, 12]);
    let plan = reconciler.reconcile(&persister, Some(&old), Some(&new));

    db.log().clear();
    assert_eq!(assert_ok!(plan.apply(&mut persister, db.exec())), 1);
    assert_eq!(db.log().sql(), [r#"DELETE FROM "Todo" WHERE "id" = ?1"#]);

    assert!(db.rows(r#"SELECT "id" FROM "Todo" WHERE "id" = 12"#).is_empty());
    assert!(db.user(2).borrow().todos.is_empty());
}

#[test]
fn rewrites_association_rows() {
    let mut db = Db::seeded();
    let old = snapshot(&mut db, 1);
    let names: Vec<_> = old.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, ["green", "red"]);

    let blue = Tag {
        id: 3,
        name: "blue".into(),
    };
    let mut new = old.clone();
    new.tags = vec![blue, old.tags[0].clone()];

    let reconciler = Reconciler::new(db.schema.tags_relation());
    let mut persister = db.schema.tag_persister();
    let plan = reconciler.reconcile(&persister, Some(&old), Some(&new));

    db.log().clear();
    assert_ok!(plan.apply(&mut persister, db.exec()));
    assert_eq!(
        db.log().sql(),
        [
            r#"DELETE FROM "User_Tag" WHERE "user_id" = ?1 AND "tag_id" = ?2 AND "position" = ?3"#,
            r#"INSERT INTO "User_Tag" ("user_id", "tag_id", "position") VALUES (?1, ?2, ?3)"#,
            r#"UPDATE "User_Tag" SET "position" = ?1 WHERE "user_id" = ?2 AND "tag_id" = ?3 AND "position" = ?4"#,
        ]
    );

    assert_eq!(db.user(1).borrow().tag_names(), ["blue", "green"]);

    // Other users keep their rows.
    assert_eq!(db.user(3).borrow().tag_names(), ["green"]);
}

#[test]
fn new_user_gets_todos_and_links() {
    let mut db = Db::seeded();
    db.exec()
        .inner()
        .execute_batch(r#"INSERT INTO "User" ("id", "name") VALUES (4, 'dee')"#)
        .unwrap();

    let new = UserSnapshot {
        id: 4,
        todos: vec![todo(20, "one"), todo(21, "two")],
        tags: vec![Tag {
            id: 1,
            name: "red".into(),
        }],
    };

    let todos = Reconciler::new(db.schema.todos_relation());
    let mut todo_persister = db.schema.todo_persister([10, 11, 12]);
    let plan = todos.reconcile(&todo_persister, None, Some(&new));
    assert_ok!(plan.apply(&mut todo_persister, db.exec()));

    let tags = Reconciler::new(db.schema.tags_relation());
    let mut tag_persister = db.schema.tag_persister();
    let plan = tags.reconcile(&tag_persister, None, Some(&new));
    assert_ok!(plan.apply(&mut tag_persister, db.exec()));

    let dee = db.user(4);
    assert_eq!(dee.borrow().todo_titles(), ["one", "two"]);
    assert_eq!(dee.borrow().tag_names(), ["red"]);
}
