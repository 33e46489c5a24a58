use graft::{
    load::{LoadContext, Selector},
    EntityLoader,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use tests::prelude::*;

#[test]
fn loads_users_with_all_relations() {
    let mut db = Db::seeded();
    let users = db.users(&[1, 2, 3]);

    let ids: Vec<_> = users.iter().map(|user| user.borrow().id).collect();
    assert_eq!(ids, [1, 2, 3]);

    let (ann, bob, cid) = (users[0].borrow(), users[1].borrow(), users[2].borrow());

    // One-to-one, shared by two users.
    assert_eq!(ann.profile.as_ref().unwrap().borrow().bio, "hello");
    assert!(Rc::ptr_eq(
        ann.profile.as_ref().unwrap(),
        cid.profile.as_ref().unwrap()
    ));
    assert!(bob.profile.is_none());

    // Ordered one-to-many, by `Todo.position`.
    assert_eq!(ann.todo_titles(), ["read", "write"]);
    assert_eq!(bob.todo_titles(), ["sleep"]);
    assert!(cid.todos.is_empty());

    // Ordered many-to-many, by `User_Tag.position`.
    assert_eq!(ann.tag_names(), ["green", "red"]);
    assert_eq!(bob.tag_names(), ["blue"]);
    assert_eq!(cid.tag_names(), ["green"]);
    assert!(Rc::ptr_eq(&ann.tags[0], &cid.tags[0]));
}

#[test]
fn tags_are_loaded_by_one_extra_select() {
    let mut db = Db::seeded();
    db.users(&[1, 2, 3]);

    let execs = db.log().execs();
    assert_eq!(execs.len(), 2);
    assert!(execs.iter().all(|exec| exec.kind == ExecKind::Select));

    assert!(execs[0].sql.starts_with(
        r#"SELECT "User"."id" AS "User_id", "User"."name" AS "User_name", "User"."profile_id" AS "User_profile_id", "Profile"."id" AS "Profile_id""#
    ));
    assert!(execs[0].sql.contains(
        r#" LEFT OUTER JOIN "Profile" ON "User"."profile_id" = "Profile"."id" LEFT OUTER JOIN "Todo" ON "User"."id" = "Todo"."user_id" LEFT OUTER JOIN "User_Tag" ON "User"."id" = "User_Tag"."user_id""#
    ));
    assert!(execs[0].sql.ends_with(r#"WHERE "User"."id" IN (?1, ?2, ?3)"#));

    assert!(execs[1].sql.starts_with(r#"SELECT "Tag"."id" AS "Tag_id""#));
    let mut tag_ids = execs[1].params.clone();
    tag_ids.sort();
    assert_eq!(tag_ids, [Value::from(1_i64), Value::from(2_i64), Value::from(3_i64)]);
}

#[test]
fn chunked_load_builds_one_graph() {
    let mut db = Db::seeded();
    let loader = EntityLoader::builder(db.schema.user_tree())
        .max_in_operator_size(2)
        .build();

    let ids = [1_i64, 2, 3].map(Value::from);
    let users = loader.select_as::<User>(db.exec(), &ids).unwrap();
    assert_eq!(users.len(), 3);

    // Two chunks of users, then the tags of every chunk at once.
    let sql = db.log().sql();
    assert_eq!(sql.len(), 3);
    assert!(sql[0].ends_with("IN (?1, ?2)"));
    assert!(sql[1].ends_with("IN (?1)"));
    assert!(sql[2].starts_with(r#"SELECT "Tag"."#));

    let (ann, cid) = (users[0].borrow(), users[2].borrow());
    assert!(Rc::ptr_eq(&ann.tags[0], &cid.tags[0]));
    assert!(Rc::ptr_eq(
        ann.profile.as_ref().unwrap(),
        cid.profile.as_ref().unwrap()
    ));
}

#[test]
fn unknown_ids_are_skipped() {
    let mut db = Db::seeded();
    let users = db.users(&[2, 42]);

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].borrow().name, "bob");
}

#[test]
fn context_is_shared_between_loaders() {
    let mut db = Db::seeded();
    let users = db.schema.user_loader();
    let tags = db.schema.tag_loader();

    let mut cx = LoadContext::new();
    let loaded = users
        .select_in(&mut cx, db.exec(), &[Value::from(1_i64)])
        .unwrap();
    let ann = loaded[0].downcast::<User>().unwrap();

    let red = tags
        .select_in(&mut cx, db.exec(), &[Value::from(1_i64)])
        .unwrap();
    let red = red[0].downcast::<Tag>().unwrap();

    assert!(Rc::ptr_eq(&ann.borrow().tags[1], &red));
    assert_eq!(red.borrow().name, "red");
}
