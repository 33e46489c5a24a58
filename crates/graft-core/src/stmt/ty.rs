/// The type of a [`Value`](super::Value), from graft's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I32,
    I64,
    F64,
    String,
    Bytes,
    /// A record of heterogeneous fields, used for composite keys.
    Record(Vec<Type>),
    /// The type of the null value.
    Null,
}

impl Type {
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Returns `true` for the integer types.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }
}
