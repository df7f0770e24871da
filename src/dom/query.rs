//! DOM queries: by instance, tag, attribute, text; generic predicate matching.

use crate::id::InstanceId;

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the node carrying the given client-side id.
    pub fn query_by_instance(&self, instance: InstanceId) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.instance == instance)
            .map(|(node_id, _)| node_id)
    }

    /// Find all nodes with the given tag, in document order.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|data| data.tag == tag)
    }

    /// Find the first node (document order) whose attribute `name` equals
    /// `value`.
    pub fn query_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.query_all(|data| data.attribute(name) == Some(value))
            .into_iter()
            .next()
    }

    /// Find the first node (document order) whose text content equals `text`.
    pub fn query_by_text(&self, text: &str) -> Option<NodeId> {
        self.query_all(|data| data.text.as_deref() == Some(text))
            .into_iter()
            .next()
    }

    /// Find all nodes matching an arbitrary predicate, in document order.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// Slotmap insertion order: deterministic but not tree order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}
