//! Document arena: slotmap-backed element tree with queries and HTML output.

pub mod markup;
pub mod node;
pub mod query;
pub mod tree;

pub use markup::Mode;
pub use node::{Handler, NodeData, NodeId, SeedKind};
pub use tree::Dom;
