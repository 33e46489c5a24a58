/// Emit a debug-level tracing event for a statement handed to an executor.
///
/// ```ignore
/// trace_query!(&sql, params.len());
/// ```
#[macro_export]
macro_rules! trace_query {
    ($sql:expr, $param_count:expr) => {
        $crate::tracing::debug!(sql = %$sql, params = $param_count, "graft.query")
    };
}
