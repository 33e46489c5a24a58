/// SQL dialect spoken by an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

#[derive(Debug, Clone)]
pub struct Capability {
    /// Dialect used to render identifiers and placeholders.
    pub flavor: Flavor,

    /// Largest number of elements bound in one `IN (...)` predicate. Multi-id
    /// loads are chunked by this bound.
    pub max_in_operator_size: usize,

    /// When true, composite keys may be matched with a row-value `IN`
    /// predicate: `(a, b) IN ((?, ?), (?, ?))`.
    pub row_value_in: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        flavor: Flavor::Sqlite,
        // Historical SQLITE_MAX_VARIABLE_NUMBER is 999.
        max_in_operator_size: 999,
        row_value_in: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        flavor: Flavor::Postgresql,
        max_in_operator_size: 1000,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        flavor: Flavor::Mysql,
        max_in_operator_size: 1000,
        ..Self::SQLITE
    };

    /// Returns a copy with a different `IN` bound.
    pub fn with_max_in_operator_size(mut self, max: usize) -> Self {
        self.max_in_operator_size = max;
        self
    }
}
