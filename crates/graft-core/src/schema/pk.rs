use super::ColumnId;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimaryKey {
    /// Columns composing the primary key
    pub columns: Vec<ColumnId>,
}

impl PrimaryKey {
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}
