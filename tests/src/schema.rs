use crate::models::{Profile, Tag, Todo, User, UserSnapshot};

use graft::{
    load::{DeferredRelation, EntityLoader, Selector},
    reconcile::{AssociationTable, ChildIndex, Relation, SqlPersister},
    schema::{ColumnId, Table, TableId},
    stmt::{Type, Value},
    EntityMapping, JoinTree, JoinType, Mapping, ModelId, NodeName, RelationFixer,
};

use std::{cell::RefCell, collections::HashSet, rc::Rc, sync::Arc};

pub const USER: ModelId = ModelId(0);
pub const PROFILE: ModelId = ModelId(1);
pub const TODO: ModelId = ModelId(2);
pub const TAG: ModelId = ModelId(3);

pub const DDL: &str = r#"
CREATE TABLE "User" (
    "id" INTEGER PRIMARY KEY,
    "name" TEXT NOT NULL,
    "profile_id" INTEGER
);
CREATE TABLE "Profile" (
    "id" INTEGER PRIMARY KEY,
    "bio" TEXT NOT NULL
);
CREATE TABLE "Todo" (
    "id" INTEGER PRIMARY KEY,
    "user_id" INTEGER,
    "position" INTEGER,
    "title" TEXT NOT NULL
);
CREATE TABLE "Tag" (
    "id" INTEGER PRIMARY KEY,
    "name" TEXT NOT NULL
);
CREATE TABLE "User_Tag" (
    "user_id" INTEGER NOT NULL,
    "tag_id" INTEGER NOT NULL,
    "position" INTEGER
);
"#;

/// Table definitions of the `User` domain, and the mappings, loaders and
/// relation policies built on them.
#[derive(Debug)]
pub struct Schema {
    pub user: Arc<Table>,
    pub profile: Arc<Table>,
    pub todo: Arc<Table>,
    pub tag: Arc<Table>,
    pub user_tag: Arc<Table>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema {
            user: Table::builder(TableId(0), "User")
                .primary_key("id", Type::I64)
                .column("name", Type::String)
                .nullable("profile_id", Type::I64)
                .build(),
            profile: Table::builder(TableId(1), "Profile")
                .primary_key("id", Type::I64)
                .column("bio", Type::String)
                .build(),
            todo: Table::builder(TableId(2), "Todo")
                .primary_key("id", Type::I64)
                .nullable("user_id", Type::I64)
                .nullable("position", Type::I64)
                .column("title", Type::String)
                .build(),
            tag: Table::builder(TableId(3), "Tag")
                .primary_key("id", Type::I64)
                .column("name", Type::String)
                .build(),
            user_tag: Table::builder(TableId(4), "User_Tag")
                .primary_key("user_id", Type::I64)
                .primary_key("tag_id", Type::I64)
                .nullable("position", Type::I64)
                .build(),
        }
    }

    fn col(table: &Table, name: &str) -> ColumnId {
        table.expect_column(name)
    }

    pub fn user_mapping(&self) -> Arc<dyn Mapping> {
        let id = Self::col(&self.user, "id");
        let name = Self::col(&self.user, "name");
        EntityMapping::new(
            USER,
            self.user.clone(),
            |user: &User| Value::from(user.id),
            move |row| {
                Ok(User {
                    id: row.get(id)?.to_i64()?,
                    name: row.get(name)?.to_string()?,
                    ..User::default()
                })
            },
        )
        .into_arc()
    }

    pub fn profile_mapping(&self) -> Arc<dyn Mapping> {
        let id = Self::col(&self.profile, "id");
        let bio = Self::col(&self.profile, "bio");
        EntityMapping::new(
            PROFILE,
            self.profile.clone(),
            |profile: &Profile| Value::from(profile.id),
            move |row| {
                Ok(Profile {
                    id: row.get(id)?.to_i64()?,
                    bio: row.get(bio)?.to_string()?,
                })
            },
        )
        .into_arc()
    }

    pub fn todo_mapping(&self) -> Arc<dyn Mapping> {
        let id = Self::col(&self.todo, "id");
        let user_id = Self::col(&self.todo, "user_id");
        let title = Self::col(&self.todo, "title");
        EntityMapping::new(
            TODO,
            self.todo.clone(),
            |todo: &Todo| Value::from(todo.id),
            move |row| {
                Ok(Todo {
                    id: row.get(id)?.to_i64()?,
                    user_id: row.get(user_id)?.to_option_i64()?,
                    title: row.get(title)?.to_string()?,
                })
            },
        )
        .with_selectable_columns(vec![id, user_id, title])
        .into_arc()
    }

    pub fn tag_mapping(&self) -> Arc<dyn Mapping> {
        let id = Self::col(&self.tag, "id");
        let name = Self::col(&self.tag, "name");
        EntityMapping::new(
            TAG,
            self.tag.clone(),
            |tag: &Tag| Value::from(tag.id),
            move |row| {
                Ok(Tag {
                    id: row.get(id)?.to_i64()?,
                    name: row.get(name)?.to_string()?,
                })
            },
        )
        .into_arc()
    }

    pub fn tag_loader(&self) -> Arc<dyn Selector> {
        Arc::new(EntityLoader::new(JoinTree::new(self.tag_mapping())))
    }

    /// Loads users with their profile and todos joined, and their tags
    /// through a second select on `Tag`.
    pub fn user_tree(&self) -> JoinTree {
        let mut tree = JoinTree::new(self.user_mapping());
        self.join_profile(&mut tree);
        self.join_todos(&mut tree);
        self.join_tags(&mut tree);
        tree
    }

    pub fn join_profile(&self, tree: &mut JoinTree) -> NodeName {
        tree.add_relation_join(
            NodeName::ROOT,
            self.profile_mapping(),
            Self::col(&self.user, "profile_id"),
            Self::col(&self.profile, "id"),
            JoinType::Auto,
            RelationFixer::new(|user: &mut User, profile: Rc<RefCell<Profile>>| {
                user.profile = Some(profile)
            }),
        )
        .expect("valid profile join")
    }

    pub fn join_todos(&self, tree: &mut JoinTree) -> NodeName {
        let todos = tree
            .add_relation_join(
                NodeName::ROOT,
                self.todo_mapping(),
                Self::col(&self.user, "id"),
                Self::col(&self.todo, "user_id"),
                JoinType::Outer,
                RelationFixer::new(|user: &mut User, todo: Rc<RefCell<Todo>>| {
                    user.todos.push(todo)
                }),
            )
            .expect("valid todo join");
        tree.order_relation_by(&todos, Self::col(&self.todo, "position"))
            .expect("todo position is reachable");
        todos
    }

    pub fn join_tags(&self, tree: &mut JoinTree) -> NodeName {
        let link = tree
            .add_passive_join(
                NodeName::ROOT,
                self.user_tag.clone(),
                Self::col(&self.user, "id"),
                Self::col(&self.user_tag, "user_id"),
                JoinType::Outer,
                vec![Self::col(&self.user_tag, "tag_id")],
            )
            .expect("valid user_tag join");

        let tags = DeferredRelation::new(
            vec![Self::col(&self.user_tag, "tag_id")],
            self.tag_loader(),
            RelationFixer::new(|user: &mut User, tag: Rc<RefCell<Tag>>| user.tags.push(tag)),
        )
        .ordered_by(Self::col(&self.user_tag, "position"));

        tree.add_deferred_relation(&link, tags)
            .expect("tag columns are reachable");
        link
    }

    pub fn user_loader(&self) -> EntityLoader {
        EntityLoader::new(self.user_tree())
    }

    /// Todos belong to one user and keep their order in `Todo.position`.
    pub fn todos_relation(&self) -> Relation<UserSnapshot, Todo> {
        Relation::owned_by_child(
            |user: &UserSnapshot| user.todos.as_slice(),
            |user| Value::from(user.id),
            |todo| Value::from(todo.id),
        )
        .with_reverse(|todo: &mut Todo, user: Option<&UserSnapshot>| {
            todo.user_id = user.map(|user| user.id)
        })
        .with_index_column(ChildIndex {
            table: self.todo.clone(),
            column: Self::col(&self.todo, "position"),
        })
    }

    pub fn tags_relation(&self) -> Relation<UserSnapshot, Tag> {
        Relation::association(
            |user: &UserSnapshot| user.tags.as_slice(),
            |user| Value::from(user.id),
            |tag| Value::from(tag.id),
            AssociationTable::new(
                self.user_tag.clone(),
                vec![Self::col(&self.user_tag, "user_id")],
                vec![Self::col(&self.user_tag, "tag_id")],
            )
            .with_index(Self::col(&self.user_tag, "position")),
        )
    }

    /// Writes todos. Only todos whose id is in `stored` exist in the
    /// database.
    pub fn todo_persister(&self, stored: impl IntoIterator<Item = i64>) -> SqlPersister<Todo> {
        let stored: HashSet<i64> = stored.into_iter().collect();
        SqlPersister::new(
            self.todo.clone(),
            |todo: &Todo| {
                vec![
                    Value::from(todo.id),
                    Value::from(todo.user_id),
                    Value::Null,
                    Value::from(todo.title.clone()),
                ]
            },
            move |todo: &Todo| stored.contains(&todo.id),
        )
    }

    pub fn tag_persister(&self) -> SqlPersister<Tag> {
        SqlPersister::new(
            self.tag.clone(),
            |tag: &Tag| vec![Value::from(tag.id), Value::from(tag.name.clone())],
            |_| true,
        )
    }
}

impl Default for Schema {
    fn default() -> Schema {
        Schema::new()
    }
}
