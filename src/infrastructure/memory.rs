//! In-memory node store for tests and embedding

use std::collections::HashSet;
use std::sync::RwLock;

use crate::domain::{Node, NodeMutation};
use crate::infrastructure::traits::{NodeStore, StoreError, StoreResult};

/// `NodeStore` over an in-process snapshot. Used by unit tests and by
/// callers embedding the library without file persistence.
#[derive(Debug, Default)]
pub struct InMemoryNodeStore {
    nodes: RwLock<Vec<Node>>,
}

impl InMemoryNodeStore {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Current snapshot, for test assertions.
    pub fn snapshot(&self) -> Vec<Node> {
        self.nodes.read().expect("store lock poisoned").clone()
    }
}

impl NodeStore for InMemoryNodeStore {
    fn load_all(&self) -> StoreResult<Vec<Node>> {
        Ok(self.snapshot())
    }

    fn save_node(&self, mutation: &NodeMutation) -> StoreResult<()> {
        self.apply(std::slice::from_ref(mutation))
    }

    fn apply(&self, batch: &[NodeMutation]) -> StoreResult<()> {
        let mut nodes = self.nodes.write().expect("store lock poisoned");

        // Stage on a copy so a failed batch leaves the snapshot untouched.
        let mut staged = nodes.clone();
        for mutation in batch {
            let node = staged
                .iter_mut()
                .find(|n| n.id == mutation.id)
                .ok_or_else(|| StoreError::UnknownNode(mutation.id.clone()))?;
            node.parent = mutation.parent.clone();
            node.weight = mutation.weight;
            node.depth = mutation.depth;
        }

        // Persisted order is the sibling tie-break: mutated rows take over
        // their occupied positions in batch order.
        let batch_ids: HashSet<_> = batch.iter().map(|m| &m.id).collect();
        let mut touched = Vec::with_capacity(batch.len());
        for mutation in batch {
            if let Some(node) = staged.iter().find(|n| n.id == mutation.id) {
                touched.push(node.clone());
            }
        }
        let mut replacement = touched.into_iter();
        for node in staged.iter_mut() {
            if batch_ids.contains(&node.id) {
                if let Some(next) = replacement.next() {
                    *node = next;
                }
            }
        }

        *nodes = staged;
        Ok(())
    }
}
