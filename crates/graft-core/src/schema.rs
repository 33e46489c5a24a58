mod builder;
pub use builder::TableBuilder;

mod column;
pub use column::{Column, ColumnId};

mod pk;
pub use pk::PrimaryKey;

mod table;
pub use table::{Table, TableId};
