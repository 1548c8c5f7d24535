//! Tree builder: flat node snapshots into depth-annotated outlines.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::HierarchyArena;
use crate::domain::entities::{
    DepthDivergence, HierarchyIssue, Node, Outline, OutlineRow,
};

/// Builds an ordered, depth-annotated traversal from a flat node snapshot.
///
/// The builder is defensive about stored data: a dangling parent reference
/// demotes the node to a root, and a parent cycle truncates the outline
/// below the first repeated node. Both are reported as issues instead of
/// failing the build, so an operator can still see (and repair) a damaged
/// hierarchy. Stored depth values are never trusted; every row carries a
/// depth recomputed from the parent chain.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Produce the outline for a snapshot.
    ///
    /// Every node appears exactly once unless it sits on (or below) a parent
    /// cycle, in which case it is withheld and a `CycleTruncated` issue is
    /// recorded. Siblings are ordered by ascending weight; equal weights
    /// keep their snapshot order.
    #[instrument(level = "debug", skip(self, nodes), fields(count = nodes.len()))]
    pub fn build(&self, nodes: &[Node]) -> Outline {
        let (arena, issues) = self.build_arena(nodes);

        let rows = arena
            .iter()
            .map(|(_, arena_node, depth)| OutlineRow {
                node: arena_node.data.clone(),
                depth,
            })
            .collect();

        Outline { rows, issues }
    }

    /// Build the arena form of the forest, for callers that want to render
    /// the tree shape rather than the flat outline.
    #[instrument(level = "debug", skip(self, nodes))]
    pub fn build_arena(&self, nodes: &[Node]) -> (HierarchyArena, Vec<HierarchyIssue>) {
        let mut issues = Vec::new();

        // Snapshot order is the tie-break authority; first occurrence wins
        // on a duplicate id.
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            index_of.entry(node.id.as_str()).or_insert(i);
        }

        let live: Vec<usize> = (0..nodes.len())
            .filter(|&i| index_of.get(nodes[i].id.as_str()) == Some(&i))
            .collect();

        // Resolve each live node to an effective parent index, aligned with
        // `live`. Unresolvable references fall back to the root group.
        let live_parents: Vec<Option<usize>> = live
            .iter()
            .map(|&i| match &nodes[i].parent {
                None => None,
                Some(parent_id) => match index_of.get(parent_id.as_str()) {
                    Some(&parent_idx) => Some(parent_idx),
                    None => {
                        issues.push(HierarchyIssue::DanglingParent {
                            id: nodes[i].id.clone(),
                            parent: parent_id.clone(),
                        });
                        None
                    }
                },
            })
            .collect();

        // Group by parent, then order each sibling group by weight. The
        // sort is stable, so equal weights keep snapshot order.
        let mut children: HashMap<Option<usize>, Vec<usize>> = live
            .iter()
            .zip(live_parents.iter())
            .map(|(&i, &parent)| (parent, i))
            .into_group_map();
        for group in children.values_mut() {
            group.sort_by_key(|&i| nodes[i].sort_weight());
        }

        let roots = children.remove(&None).unwrap_or_default();
        debug!("roots: {}, live nodes: {}", roots.len(), live.len());

        // Walk from the roots with an explicit stack. The visiting set is
        // the cycle guard: membership is checked before expansion, never
        // inferred from presence in the output.
        let mut arena = HierarchyArena::new();
        let mut visiting: HashSet<usize> = HashSet::new();
        let mut stack: Vec<(usize, Option<generational_arena::Index>)> =
            roots.iter().rev().map(|&i| (i, None)).collect();

        while let Some((i, parent_idx)) = stack.pop() {
            if !visiting.insert(i) {
                issues.push(HierarchyIssue::CycleTruncated {
                    id: nodes[i].id.clone(),
                });
                continue;
            }

            let arena_idx = arena.insert_node(nodes[i].clone(), parent_idx);

            if let Some(kids) = children.get(&Some(i)) {
                for &child in kids.iter().rev() {
                    stack.push((child, Some(arena_idx)));
                }
            }
        }

        // Anything the walk never reached hangs off a parent cycle. Report
        // the repeated node of each cycle once; the rest of the component is
        // withheld silently.
        self.report_unreachable(nodes, &live, &live_parents, &visiting, &mut issues);

        (arena, issues)
    }

    fn report_unreachable(
        &self,
        nodes: &[Node],
        live: &[usize],
        live_parents: &[Option<usize>],
        visited: &HashSet<usize>,
        issues: &mut Vec<HierarchyIssue>,
    ) {
        let parent_of: HashMap<usize, Option<usize>> = live
            .iter()
            .copied()
            .zip(live_parents.iter().copied())
            .collect();

        let mut accounted: HashSet<usize> = HashSet::new();
        for &start in live {
            if visited.contains(&start) || accounted.contains(&start) {
                continue;
            }

            let mut path: Vec<usize> = Vec::new();
            let mut on_path: HashSet<usize> = HashSet::new();
            let mut current = start;
            loop {
                if !on_path.insert(current) {
                    issues.push(HierarchyIssue::CycleTruncated {
                        id: nodes[current].id.clone(),
                    });
                    break;
                }
                path.push(current);

                match parent_of.get(&current).copied().flatten() {
                    // The chain merged into an already-diagnosed component.
                    Some(next) if accounted.contains(&next) || visited.contains(&next) => break,
                    Some(next) => current = next,
                    None => break,
                }
            }
            accounted.extend(path);
        }
    }

    /// Nodes whose persisted depth disagrees with the recomputed one.
    ///
    /// A divergence means some past write bypassed reconciliation; the data
    /// is repairable by persisting the computed depths.
    pub fn depth_divergences(&self, outline: &Outline) -> Vec<DepthDivergence> {
        outline
            .rows
            .iter()
            .filter(|row| row.node.depth != row.depth)
            .map(|row| DepthDivergence {
                id: row.node.id.clone(),
                stored: row.node.depth,
                computed: row.depth,
            })
            .collect()
    }
}
