//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::NodeId;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("cycle detected in submitted parent assignments at node: {0}")]
    CycleDetected(NodeId),

    #[error("submitted node does not exist: {0}")]
    UnknownNode(NodeId),

    #[error("node '{id}' submitted with unknown parent: {parent}")]
    UnknownParent { id: NodeId, parent: NodeId },

    #[error("node submitted more than once: {0}")]
    DuplicateSubmission(NodeId),

    #[error("snapshot contains duplicate node id: {0}")]
    DuplicateNode(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
