use crate::stmt::Value;

use indexmap::IndexSet;
use std::sync::Arc;

/// One row of a select, addressable by column alias.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<IndexSet<String>>,
    values: Vec<Value>,
}

/// The rows returned by a select, in database order.
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<IndexSet<String>>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl Row {
    /// Builds a stand-alone row from `(alias, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Row
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut columns = IndexSet::new();
        let mut values = vec![];
        for (alias, value) in pairs {
            columns.insert(alias.into());
            values.push(value);
        }
        Row {
            columns: Arc::new(columns),
            values,
        }
    }

    /// Returns the value for the alias, or `None` when the row has no such
    /// column.
    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.columns
            .get_index_of(alias)
            .and_then(|index| self.values.get(index))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(String::as_str)
    }
}

impl Cursor {
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Cursor
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Cursor {
            columns: Arc::new(columns.into_iter().map(Into::into).collect()),
            rows: rows.into_iter(),
        }
    }

    pub fn empty() -> Cursor {
        Cursor::new(Vec::<String>::new(), vec![])
    }

    /// Number of rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let values = self.rows.next()?;
        Some(Row {
            columns: self.columns.clone(),
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
