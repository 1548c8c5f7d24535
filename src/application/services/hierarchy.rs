//! Hierarchy service
//!
//! Orchestrates the tree builder and order reconciler over the storage
//! boundary: one snapshot in, one outline or one atomic mutation batch out.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    DepthDivergence, HierarchyArena, HierarchyIssue, NodeId, NodeMutation, Outline,
    OrderReconciler, SubmittedRow, TreeBuilder,
};
use crate::infrastructure::traits::NodeStore;

/// Structural health report for the stored hierarchy.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Dangling parents and truncated cycles found while building.
    pub issues: Vec<HierarchyIssue>,
    /// Nodes whose persisted depth disagrees with the parent chain.
    pub divergences: Vec<DepthDivergence>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.divergences.is_empty()
    }
}

/// Service for viewing and reordering the store hierarchy.
pub struct HierarchyService {
    store: Arc<dyn NodeStore>,
    builder: TreeBuilder,
    reconciler: OrderReconciler,
}

impl HierarchyService {
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self {
            store,
            builder: TreeBuilder::new(),
            reconciler: OrderReconciler::new(),
        }
    }

    /// Load a snapshot and build its depth-annotated outline.
    ///
    /// An empty store is reported as `EmptyHierarchy` so the caller can show
    /// the "no stores found" message instead of a blank table.
    #[instrument(level = "debug", skip(self))]
    pub fn outline(&self) -> ApplicationResult<Outline> {
        let nodes = self.store.load_all()?;
        if nodes.is_empty() {
            return Err(ApplicationError::EmptyHierarchy);
        }
        debug!("loaded {} nodes", nodes.len());
        Ok(self.builder.build(&nodes))
    }

    /// Arena form of the hierarchy, for tree-shaped rendering.
    #[instrument(level = "debug", skip(self))]
    pub fn forest(&self) -> ApplicationResult<(HierarchyArena, Vec<HierarchyIssue>)> {
        let nodes = self.store.load_all()?;
        if nodes.is_empty() {
            return Err(ApplicationError::EmptyHierarchy);
        }
        Ok(self.builder.build_arena(&nodes))
    }

    /// Outline issues plus stored-depth divergences, for operator review.
    #[instrument(level = "debug", skip(self))]
    pub fn check(&self) -> ApplicationResult<CheckReport> {
        let outline = self.outline()?;
        let divergences = self.builder.depth_divergences(&outline);
        Ok(CheckReport {
            issues: outline.issues,
            divergences,
        })
    }

    /// Reconcile a full submission against the current snapshot and persist
    /// the resulting mutations as one atomic batch.
    ///
    /// Validation failures (unknown ids, duplicate rows, parent cycles)
    /// abort before anything is written.
    #[instrument(level = "debug", skip(self, submission), fields(rows = submission.len()))]
    pub fn reorder(&self, submission: &[SubmittedRow]) -> ApplicationResult<Vec<NodeMutation>> {
        let nodes = self.store.load_all()?;
        let mutations = self.reconciler.reconcile(&nodes, submission)?;
        self.store.apply(&mutations)?;
        debug!("persisted {} mutations", mutations.len());
        Ok(mutations)
    }

    /// Move a single node, keeping every other node where the outline shows
    /// it today.
    ///
    /// Synthesizes a full submission from the current outline with just the
    /// target row changed, then delegates to `reorder`. A move under the
    /// node's own descendant fails the reconciler's cycle check and persists
    /// nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(
        &self,
        id: &NodeId,
        new_parent: Option<NodeId>,
        weight: Option<i64>,
    ) -> ApplicationResult<Vec<NodeMutation>> {
        let outline = self.outline()?;
        let present: std::collections::HashSet<&NodeId> =
            outline.rows.iter().map(|row| &row.node.id).collect();

        let mut found = false;
        let mut submission: Vec<SubmittedRow> = Vec::with_capacity(outline.rows.len());
        for row in &outline.rows {
            if &row.node.id == id {
                found = true;
                submission.push(SubmittedRow {
                    id: id.clone(),
                    parent: new_parent.clone(),
                    weight: weight.or(row.node.weight).unwrap_or(0),
                });
            } else {
                // Submit the effective parent: a dangling reference was
                // already demoted to root in the outline.
                let parent = row
                    .node
                    .parent
                    .clone()
                    .filter(|p| present.contains(p));
                submission.push(SubmittedRow {
                    id: row.node.id.clone(),
                    parent,
                    weight: row.node.weight.unwrap_or(0),
                });
            }
        }

        if !found {
            return Err(ApplicationError::Domain(
                crate::domain::DomainError::UnknownNode(id.clone()),
            ));
        }

        self.reorder(&submission)
    }
}
