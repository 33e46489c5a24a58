use super::{ColumnRef, Expr, Join, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub column: ColumnRef,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<SelectItem>,
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
}

impl Select {
    pub fn new(from: TableRef) -> Self {
        Self {
            columns: vec![],
            from,
            joins: vec![],
            filter: None,
        }
    }

    /// Returns a copy of this select restricted by `filter`, and-ed with any
    /// existing filter.
    pub fn with_filter(&self, filter: Expr) -> Select {
        let mut select = self.clone();
        select.filter = Some(match select.filter.take() {
            Some(existing) => Expr::and(vec![existing, filter]),
            None => filter,
        });
        select
    }
}
