use std::{cell::RefCell, rc::Rc};

/// A user has an optional profile, an ordered todo list and ordered tags.
#[derive(Debug, Default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub profile: Option<Rc<RefCell<Profile>>>,
    pub todos: Vec<Rc<RefCell<Todo>>>,
    pub tags: Vec<Rc<RefCell<Tag>>>,
}

#[derive(Debug, Default)]
pub struct Profile {
    pub id: i64,
    pub bio: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Todo {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn todo_titles(&self) -> Vec<String> {
        self.todos
            .iter()
            .map(|todo| todo.borrow().title.clone())
            .collect()
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|tag| tag.borrow().name.clone()).collect()
    }
}

/// Detached copy of a user's collections, the shape the reconciler works on.
#[derive(Debug, Clone, Default)]
pub struct UserSnapshot {
    pub id: i64,
    pub todos: Vec<Todo>,
    pub tags: Vec<Tag>,
}

impl UserSnapshot {
    pub fn of(user: &User) -> UserSnapshot {
        UserSnapshot {
            id: user.id,
            todos: user.todos.iter().map(|todo| todo.borrow().clone()).collect(),
            tags: user.tags.iter().map(|tag| tag.borrow().clone()).collect(),
        }
    }
}
