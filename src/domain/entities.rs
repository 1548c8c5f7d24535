//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier.
///
/// Identity is assigned by the storage collaborator; the core only compares
/// and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One store in the hierarchy.
///
/// `depth` is what the storage collaborator last persisted. It is derived
/// data: the outline always recomputes it from the parent chain and treats a
/// divergence as corruption, never as truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Display label, passed through untouched.
    pub name: String,
    /// Parent reference; `None` marks a root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Sibling sort key, ascending. Ties resolve to persisted order.
    /// `None` (the cleared state) sorts like 0: a reparented node's
    /// position comes from persisted order, not an explicit weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    /// Ancestor hops to a root as last persisted.
    #[serde(default)]
    pub depth: u32,
}

impl Node {
    pub fn root(id: impl Into<String>, name: impl Into<String>, weight: i64) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            parent: None,
            weight: Some(weight),
            depth: 0,
        }
    }

    pub fn child(
        id: impl Into<String>,
        name: impl Into<String>,
        parent: impl Into<String>,
        weight: i64,
        depth: u32,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            parent: Some(NodeId::new(parent)),
            weight: Some(weight),
            depth,
        }
    }

    /// Effective sort key: cleared weight sorts like 0.
    pub fn sort_weight(&self) -> i64 {
        self.weight.unwrap_or(0)
    }
}

/// A proposed change to one node's parent/weight/depth fields.
///
/// `weight: None` means the weight is cleared: a reparented node's position
/// is implied by its sibling order under the new parent, not by an explicit
/// weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMutation {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub weight: Option<i64>,
    pub depth: u32,
}

/// One row of a drag-and-drop submission, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRow {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub weight: i64,
}

/// One line of the rendered outline with its freshly computed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub node: Node,
    pub depth: u32,
}

/// Depth-annotated pre-order traversal plus the structural problems found
/// while building it.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    pub rows: Vec<OutlineRow>,
    pub issues: Vec<HierarchyIssue>,
}

impl Outline {
    /// True when an issue makes the stored hierarchy structurally unsound
    /// (a cycle), as opposed to recoverable data drift.
    pub fn has_structural_error(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i, HierarchyIssue::CycleTruncated { .. }))
    }
}

/// Soft diagnostics surfaced by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyIssue {
    /// A node references a parent that is not in the snapshot; the node was
    /// promoted to a root.
    DanglingParent { id: NodeId, parent: NodeId },
    /// The parent chain revisits `id`; the traversal stops below it and the
    /// unreachable nodes are withheld from the outline.
    CycleTruncated { id: NodeId },
}

impl fmt::Display for HierarchyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyIssue::DanglingParent { id, parent } => write!(
                f,
                "node '{id}' references missing parent '{parent}', treated as root"
            ),
            HierarchyIssue::CycleTruncated { id } => {
                write!(f, "parent cycle through node '{id}', subtree withheld")
            }
        }
    }
}

/// A node whose persisted depth disagrees with the parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthDivergence {
    pub id: NodeId,
    pub stored: u32,
    pub computed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_serde_roundtrip_omits_absent_parent() {
        let node = Node::root("a", "Main", 0);
        let toml = toml::to_string(&node).unwrap();
        assert!(!toml.contains("parent"));

        let back: Node = toml::from_str(&toml).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn node_deserialize_defaults_weight_and_depth() {
        let node: Node = toml::from_str("id = \"a\"\nname = \"Main\"\n").unwrap();
        assert_eq!(node.weight, None);
        assert_eq!(node.depth, 0);
        assert!(node.parent.is_none());
    }
}
