use super::{Type, ValueRecord};
use crate::{Error, Result};

/// A single column value, identifier or bound parameter.
///
/// Values are hashable and totally ordered so they can key identity maps and
/// sort index columns. Floating point values compare by their bit pattern.
#[derive(Debug, Default, Clone)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point number
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Record value, used for composite identifiers
    Record(ValueRecord),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` when the value does not denote anything: null, or a
    /// record with at least one absent field.
    ///
    /// An outer-joined row that did not match yields absent identifiers. A
    /// composite key with a null part cannot reference a row either.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Record(record) => record.iter().any(Value::is_absent),
            _ => false,
        }
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    /// Builds an identifier from key parts: a single part is the identifier
    /// itself, several parts form a record.
    pub fn from_key_parts(mut parts: Vec<Value>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Self::record_from_vec(parts)
        }
    }

    /// The inverse of [`Value::from_key_parts`].
    pub fn key_parts(&self) -> &[Value] {
        match self {
            Self::Record(record) => record,
            value => std::slice::from_ref(value),
        }
    }

    pub fn infer_ty(&self) -> Type {
        match self {
            Self::Bool(_) => Type::Bool,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::F64(_) => Type::F64,
            Self::String(_) => Type::String,
            Self::Bytes(_) => Type::Bytes,
            Self::Record(record) => Type::Record(record.iter().map(Value::infer_ty).collect()),
            Self::Null => Type::Null,
        }
    }

    pub fn is_a(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Self::Null, _) => true,
            (Self::Record(record), Type::Record(fields)) => {
                record.len() == fields.len()
                    && record.iter().zip(fields).all(|(value, ty)| value.is_a(ty))
            }
            (value, ty) => value.infer_ty() == *ty,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            // SQLite has no boolean storage class.
            Self::I64(v @ (0 | 1)) => Ok(v == 1),
            value => Err(Error::type_conversion(value, "bool")),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            Self::I32(v) => Ok(v.into()),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }

    pub fn to_option_i64(self) -> Result<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            value => value.to_i64().map(Some),
        }
    }

    pub fn to_i32(self) -> Result<i32> {
        match self {
            Self::I32(v) => Ok(v),
            Self::I64(v) => {
                i32::try_from(v).map_err(|_| Error::type_conversion(Self::I64(v), "i32"))
            }
            value => Err(Error::type_conversion(value, "i32")),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Self::F64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }

    pub fn to_option_string(self) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            value => value.to_string().map(Some),
        }
    }

    pub fn to_record(self) -> Result<ValueRecord> {
        match self {
            Self::Record(record) => Ok(record),
            value => Err(Error::type_conversion(value, "record")),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<usize> for Value {
    fn from(src: usize) -> Self {
        // Positions in a list never exceed i64::MAX.
        Self::I64(src as i64)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<ValueRecord> for Value {
    fn from(value: ValueRecord) -> Self {
        Self::Record(value)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
