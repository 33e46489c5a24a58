mod alias;
use alias::AliasSet;

mod graft;

mod join_type;
pub use join_type::JoinType;

mod link;
pub(crate) use link::{JoinLink, LinkKind, Located};

mod name;
pub use name::NodeName;

mod node;
pub(crate) use node::{JoinNode, NodeId, NodeRole};

mod query;
pub use query::Query;
pub(crate) use query::NodeAliases;

mod tree;
pub use tree::JoinTree;
