use graft_core::stmt::Value as CoreValue;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

/// Bound parameter wrapper.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self.0 {
            CoreValue::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            CoreValue::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Record(_) => Err(rusqlite::Error::ToSqlConversionFailure(
                "record values must be flattened before binding".into(),
            )),
        }
    }
}

/// Converts a column read without type information: integers come back as
/// `I64`, booleans included.
pub(crate) fn from_sql(value: SqlValue) -> CoreValue {
    match value {
        SqlValue::Null => CoreValue::Null,
        SqlValue::Integer(v) => CoreValue::I64(v),
        SqlValue::Real(v) => CoreValue::F64(v),
        SqlValue::Text(v) => CoreValue::String(v),
        SqlValue::Blob(v) => CoreValue::Bytes(v),
    }
}
