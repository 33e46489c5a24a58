/// A table in a `FROM` or `JOIN` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,

    /// Set when the table is referenced under a different name.
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// References `name` under `alias`; an alias equal to the table name is
    /// dropped.
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        let name = name.into();
        let alias = alias.into();
        let alias = (alias != name).then_some(alias);
        Self { name, alias }
    }

    /// The name columns of this table are qualified with.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}
