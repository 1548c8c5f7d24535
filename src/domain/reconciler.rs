//! Order reconciler: submitted drag-and-drop orderings into mutation sets.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::entities::{Node, NodeId, NodeMutation, SubmittedRow};
use crate::domain::error::{DomainError, DomainResult};

/// Translates a submitted flat re-ordering into the field mutations needed
/// to make storage match it.
///
/// Unlike the tree builder, the reconciler is strict: the submission comes
/// from a UI that was itself rendered from the snapshot, so an unknown id,
/// a duplicate row, or a parent cycle is a validation failure, not data to
/// repair. Validation failures abort the whole batch; no mutations are
/// returned.
///
/// Weight policy: weight is parent-relative. A row submitted with a parent
/// gets its weight cleared (position under the parent is implied by row
/// order); only root rows keep an explicit weight.
#[derive(Debug, Default)]
pub struct OrderReconciler;

impl OrderReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Compute the mutation set for a submission against the current
    /// snapshot.
    ///
    /// Returns exactly one mutation per submitted row, ordered so that a
    /// row's new parent is finalized before the row itself (depth is always
    /// computed from an already-reconciled ancestor, falling back to the
    /// stored ancestor when the ancestor was not part of the submission).
    #[instrument(level = "debug", skip(self, old, submission), fields(rows = submission.len()))]
    pub fn reconcile(
        &self,
        old: &[Node],
        submission: &[SubmittedRow],
    ) -> DomainResult<Vec<NodeMutation>> {
        let mut stored: HashMap<&NodeId, &Node> = HashMap::new();
        for node in old {
            if stored.insert(&node.id, node).is_some() {
                return Err(DomainError::DuplicateNode(node.id.clone()));
            }
        }

        let mut submitted: HashMap<&NodeId, &SubmittedRow> = HashMap::new();
        for row in submission {
            if submitted.insert(&row.id, row).is_some() {
                return Err(DomainError::DuplicateSubmission(row.id.clone()));
            }
        }

        // Referential checks before any depth work.
        for row in submission {
            if !stored.contains_key(&row.id) {
                return Err(DomainError::UnknownNode(row.id.clone()));
            }
            if let Some(parent) = &row.parent {
                if !stored.contains_key(parent) {
                    return Err(DomainError::UnknownParent {
                        id: row.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        // Every parent chain through the submitted assignments must
        // terminate. The chain switches to stored parents once it leaves the
        // submitted set; a revisit anywhere makes the whole batch invalid.
        for row in submission {
            self.check_chain(row, &submitted, &stored)?;
        }

        // Emit parents before children among the submitted rows so depth is
        // finalized top-down.
        let mut depths: HashMap<NodeId, u32> = HashMap::new();
        let mut emitted: HashSet<NodeId> = HashSet::new();
        let mut mutations: Vec<NodeMutation> = Vec::with_capacity(submission.len());

        for row in submission {
            self.emit(row, &submitted, &stored, &mut depths, &mut emitted, &mut mutations);
        }

        debug!("reconciled {} mutations", mutations.len());
        Ok(mutations)
    }

    fn check_chain(
        &self,
        row: &SubmittedRow,
        submitted: &HashMap<&NodeId, &SubmittedRow>,
        stored: &HashMap<&NodeId, &Node>,
    ) -> DomainResult<()> {
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut current = &row.id;

        loop {
            if !seen.insert(current) {
                return Err(DomainError::CycleDetected(current.clone()));
            }

            // Submitted assignment wins over the stored parent.
            let next = match submitted.get(current) {
                Some(r) => r.parent.as_ref(),
                None => stored.get(current).and_then(|n| n.parent.as_ref()),
            };

            match next {
                // Stored parents may dangle; for cycle purposes a dangling
                // reference terminates the chain like a root.
                Some(parent) if stored.contains_key(parent) => current = parent,
                _ => return Ok(()),
            }
        }
    }

    fn emit(
        &self,
        row: &SubmittedRow,
        submitted: &HashMap<&NodeId, &SubmittedRow>,
        stored: &HashMap<&NodeId, &Node>,
        depths: &mut HashMap<NodeId, u32>,
        emitted: &mut HashSet<NodeId>,
        mutations: &mut Vec<NodeMutation>,
    ) {
        if emitted.contains(&row.id) {
            return;
        }
        emitted.insert(row.id.clone());

        let mutation = match &row.parent {
            Some(parent) => {
                // Finalize the parent first when it is part of the batch.
                if let Some(parent_row) = submitted.get(parent) {
                    self.emit(parent_row, submitted, stored, depths, emitted, mutations);
                }

                // Reconciled depth when the parent was submitted, stored
                // depth otherwise.
                let parent_depth = depths
                    .get(parent)
                    .copied()
                    .or_else(|| stored.get(parent).map(|n| n.depth))
                    .unwrap_or(0);

                NodeMutation {
                    id: row.id.clone(),
                    parent: Some(parent.clone()),
                    weight: None,
                    depth: parent_depth + 1,
                }
            }
            None => NodeMutation {
                id: row.id.clone(),
                parent: None,
                weight: Some(row.weight),
                depth: 0,
            },
        };

        depths.insert(row.id.clone(), mutation.depth);
        mutations.push(mutation);
    }
}
