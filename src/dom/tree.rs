//! Tree operations: insert, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The document tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// Cloning a `Dom` yields an independent copy; the headless client boots from
/// one.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// Returns `None` (and inserts nothing) if `parent` is not in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children.entry(parent)?.or_default().push(id);
        Some(id)
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the removed data in breadth-first order (the node itself
    /// first), or an empty vec if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeData> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed = Vec::new();

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if let Some(data) = self.nodes.remove(current) {
                removed.push(data);
            }
        }

        removed
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the DOM contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        self.walk_filtered(start, |_| true)
    }

    /// Pre-order traversal that only descends into nodes accepted by
    /// `descend`. Rejected nodes and their subtrees are skipped.
    pub fn walk_filtered(&self, start: NodeId, descend: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let Some(data) = self.nodes.get(current) else {
                continue;
            };
            if !descend(data) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::SeedKind;
    use crate::id::InstanceId;

    fn data(tag: &str, n: u64) -> NodeData {
        NodeData::new(tag, SeedKind::Element, InstanceId(n))
    }

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(data("body", 0));
        let a = dom.insert_child(root, data("div", 1)).unwrap();
        let b = dom.insert_child(root, data("div", 2)).unwrap();
        let c = dom.insert_child(a, data("input", 3)).unwrap();
        let d = dom.insert_child(a, data("button", 4)).unwrap();
        (dom, root, a, b, c, d)
    }

    #[test]
    fn insert_sets_root() {
        let mut dom = Dom::new();
        let id = dom.insert(data("body", 0));
        assert_eq!(dom.root(), Some(id));
    }

    #[test]
    fn insert_child_into_missing_parent() {
        let (mut dom, _root, a, ..) = build_tree();
        dom.remove(a);
        assert!(dom.insert_child(a, data("p", 9)).is_none());
    }

    #[test]
    fn parent_and_children() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.parent(a), Some(root));
        assert_eq!(dom.parent(c), Some(a));
        assert_eq!(dom.parent(root), None);
        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.children(a), &[c, d]);
        assert!(dom.children(c).is_empty());
    }

    #[test]
    fn ancestors() {
        let (dom, root, a, _b, c, _d) = build_tree();
        assert_eq!(dom.ancestors(c), vec![a, root]);
        assert!(dom.ancestors(root).is_empty());
    }

    #[test]
    fn get_mut_changes_data() {
        let (mut dom, _root, a, ..) = build_tree();
        dom.get_mut(a).unwrap().tag = "form".to_string();
        assert_eq!(dom.get(a).unwrap().tag, "form");
    }

    #[test]
    fn remove_subtree_returns_all_data() {
        let (mut dom, root, a, b, c, d) = build_tree();
        let removed = dom.remove(a);
        let ids: Vec<_> = removed.iter().map(|n| n.instance.index()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(!dom.contains(a));
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
        assert_eq!(dom.children(root), &[b]);
        assert_eq!(dom.len(), 2);
    }

    #[test]
    fn remove_missing_is_empty() {
        let (mut dom, _root, a, ..) = build_tree();
        dom.remove(a);
        assert!(dom.remove(a).is_empty());
    }

    #[test]
    fn remove_root_clears_root() {
        let (mut dom, root, ..) = build_tree();
        dom.remove(root);
        assert!(dom.root().is_none());
        assert!(dom.is_empty());
    }

    #[test]
    fn depth_first_order() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(root), vec![root, a, c, d, b]);
    }

    #[test]
    fn filtered_walk_skips_subtrees() {
        let (mut dom, root, a, b, ..) = build_tree();
        dom.get_mut(a).unwrap().mounted = false;
        assert_eq!(dom.walk_filtered(root, |n| n.mounted), vec![root, b]);
    }

    #[test]
    fn clone_is_independent() {
        let (dom, _root, a, ..) = build_tree();
        let mut copy = dom.clone();
        copy.get_mut(a).unwrap().text = Some("x".into());
        assert!(dom.get(a).unwrap().text.is_none());
    }
}
