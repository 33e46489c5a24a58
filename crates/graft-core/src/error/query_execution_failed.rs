use super::Error;
use crate::stmt::Value;

/// Error when the statement executor fails to run a statement.
///
/// Carries the failing SQL and its bound parameters so the caller can see
/// exactly what was sent.
#[derive(Debug)]
pub(super) struct QueryExecutionFailed {
    sql: Box<str>,
    params: Box<[Value]>,
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for QueryExecutionFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for QueryExecutionFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("query execution failed: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        write!(f, "; sql=`{}` params={:?}", self.sql, self.params)
    }
}

impl Error {
    /// Creates an error from a statement executor failure.
    pub fn query_execution_failed(
        sql: &str,
        params: &[Value],
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::QueryExecutionFailed(QueryExecutionFailed {
            sql: sql.into(),
            params: params.into(),
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a query execution failure.
    pub fn is_query_execution_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::QueryExecutionFailed(_))
    }
}
