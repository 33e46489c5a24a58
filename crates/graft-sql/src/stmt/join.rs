use super::{ColumnRef, TableRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOp {
    Inner,
    LeftOuter,
}

/// `<op> JOIN <table> ON <left> = <right>`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub op: JoinOp,
    pub table: TableRef,
    pub left: ColumnRef,
    pub right: ColumnRef,
}
