//! Arena-backed forest for the store hierarchy.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::Node;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ArenaNode {
    /// Store data for this node
    pub data: Node,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Arena-based forest for efficient hierarchy traversal.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// A store hierarchy has any number of roots, so the arena keeps a root list
/// rather than a single root index.
#[derive(Debug, Default)]
pub struct HierarchyArena {
    /// Arena storage for all tree nodes
    arena: Arena<ArenaNode>,
    /// Indices of root nodes, in display order
    roots: Vec<Index>,
}

impl HierarchyArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: Node, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over the whole forest, annotated with the hop
    /// count from each node's root.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> PreOrderIter {
        PreOrderIter::new(self)
    }

    /// Height of the tallest tree in the forest (empty forest is 0).
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.subtree_height(root))
            .max()
            .unwrap_or(0)
    }

    fn subtree_height(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.subtree_height(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct PreOrderIter<'a> {
    arena: &'a HierarchyArena,
    stack: Vec<(Index, u32)>,
}

impl<'a> PreOrderIter<'a> {
    fn new(arena: &'a HierarchyArena) -> Self {
        // Roots pushed in reverse so the first root pops first
        let stack = arena
            .roots()
            .iter()
            .rev()
            .map(|&idx| (idx, 0))
            .collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a ArenaNode, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::root(id, id.to_uppercase(), 0)
    }

    #[test]
    fn preorder_visits_parent_before_children_with_depths() {
        let mut arena = HierarchyArena::new();
        let a = arena.insert_node(node("a"), None);
        let b = arena.insert_node(node("b"), Some(a));
        arena.insert_node(node("c"), Some(b));
        arena.insert_node(node("d"), None);

        let visited: Vec<(String, u32)> = arena
            .iter()
            .map(|(_, n, depth)| (n.data.id.to_string(), depth))
            .collect();

        assert_eq!(
            visited,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 0),
            ]
        );
    }

    #[test]
    fn height_covers_tallest_tree() {
        let mut arena = HierarchyArena::new();
        let a = arena.insert_node(node("a"), None);
        let b = arena.insert_node(node("b"), Some(a));
        arena.insert_node(node("c"), Some(b));
        arena.insert_node(node("d"), None);

        assert_eq!(arena.height(), 3);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn empty_forest_iterates_nothing() {
        let arena = HierarchyArena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.iter().count(), 0);
        assert_eq!(arena.height(), 0);
    }
}
