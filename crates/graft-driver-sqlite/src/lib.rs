mod value;

use graft_core::{
    driver::{Capability, Cursor, Executor},
    err,
    stmt::Value,
    Error, Result,
};

use anyhow::Context;
use rusqlite::{params_from_iter, types::Value as SqlValue, Connection};
use std::path::Path;
use url::Url;

/// An [`Executor`] backed by one SQLite connection.
#[derive(Debug)]
pub struct Sqlite {
    connection: Connection,
}

impl Sqlite {
    /// Connects from a `sqlite:` URL. `sqlite::memory:` opens an in-memory
    /// database, any other path a file.
    pub fn new(url: impl AsRef<str>) -> Result<Sqlite> {
        let url_str = url.as_ref();
        let url = Url::parse(url_str)
            .with_context(|| format!("invalid connection URL `{url_str}`"))?;

        if url.scheme() != "sqlite" {
            return Err(err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Sqlite::in_memory()
        } else {
            Sqlite::open(url.path())
        }
    }

    pub fn in_memory() -> Result<Sqlite> {
        let connection =
            Connection::open_in_memory().context("failed to open in-memory SQLite database")?;
        Ok(Sqlite { connection })
    }

    /// Opens, or creates, the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Sqlite> {
        let path = path.as_ref();
        let connection = Connection::open(path)
            .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
        Ok(Sqlite { connection })
    }

    /// Runs semicolon separated statements without parameters, typically
    /// schema setup.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(|e| Error::query_execution_failed(sql, &[], e))
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl Executor for Sqlite {
    fn capability(&self) -> &Capability {
        &Capability::SQLITE
    }

    fn exec_select(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        let failed = |e: rusqlite::Error| Error::query_execution_failed(sql, params, e);

        let mut stmt = self.connection.prepare_cached(sql).map_err(failed)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(value::Value)))
            .map_err(failed)?;

        let mut values = vec![];
        while let Some(row) = rows.next().map_err(failed)? {
            let mut record = Vec::with_capacity(width);
            for index in 0..width {
                let value: SqlValue = row.get(index).map_err(failed)?;
                record.push(value::from_sql(value));
            }
            values.push(record);
        }

        tracing::trace!(rows = values.len(), "graft.sqlite: select done");
        Ok(Cursor::new(columns, values))
    }

    fn exec_write(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(|e| Error::query_execution_failed(sql, params, e))?;
        let count = stmt
            .execute(params_from_iter(params.iter().map(value::Value)))
            .map_err(|e| Error::query_execution_failed(sql, params, e))?;
        Ok(count as u64)
    }
}
