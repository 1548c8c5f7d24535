//! Storage boundary traits for testability
//!
//! The domain core never touches persistence; everything goes through
//! `NodeStore`, allowing services to be tested against an in-memory
//! implementation.

use thiserror::Error;

use crate::domain::{Node, NodeId, NodeMutation};

/// Failure surfaced by a storage collaborator.
///
/// The core never retries these; retry policy, if any, lives behind the
/// collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store data: {message}")]
    Format { message: String },

    #[error("store has no node with id: {0}")]
    UnknownNode(NodeId),
}

impl StoreError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence abstraction for the store hierarchy.
///
/// `load_all` order is authoritative: it is the tie-break for equal sibling
/// weights, so implementations must return nodes in stable persisted order.
pub trait NodeStore: Send + Sync {
    /// Snapshot of every persisted node.
    fn load_all(&self) -> StoreResult<Vec<Node>>;

    /// Overwrite one node's parent/weight/depth. Idempotent; the node must
    /// already exist (the core never creates or deletes nodes).
    fn save_node(&self, mutation: &NodeMutation) -> StoreResult<()>;

    /// Persist a whole mutation batch atomically: either every mutation
    /// lands or none do.
    fn apply(&self, batch: &[NodeMutation]) -> StoreResult<()>;
}
