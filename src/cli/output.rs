//! Terminal rendering for outlines and diagnostics

use colored::Colorize;
use generational_arena::Index;
use termtree::Tree;

use crate::application::CheckReport;
use crate::domain::{HierarchyArena, HierarchyIssue, Outline};

/// Convert one rooted subtree of the arena into a termtree.
fn subtree(arena: &HierarchyArena, node_idx: Index) -> Tree<String> {
    let node = arena
        .get_node(node_idx)
        .map(|n| n.data.name.clone())
        .unwrap_or_default();

    let mut tree = Tree::new(node);
    if let Some(n) = arena.get_node(node_idx) {
        for &child_idx in &n.children {
            tree.push(subtree(arena, child_idx));
        }
    }
    tree
}

/// Render the whole forest, one termtree per root.
pub fn render_forest(arena: &HierarchyArena) -> String {
    let mut out = String::new();
    for &root in arena.roots() {
        out.push_str(&subtree(arena, root).to_string());
    }
    out
}

/// Flat listing with the original admin table's columns: indented name,
/// weight, stored depth, computed depth, parent.
pub fn render_list(outline: &Outline) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<40} {:>8} {:>6} {:>9} {:<}\n",
        "NAME", "WEIGHT", "DEPTH", "COMPUTED", "PARENT"
    ));

    for row in &outline.rows {
        let indent = "  ".repeat(row.depth as usize);
        let name = format!("{}{}", indent, row.node.name);
        let weight = row
            .node
            .weight
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string());
        let parent = row
            .node
            .parent
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default();

        out.push_str(&format!(
            "{:<40} {:>8} {:>6} {:>9} {:<}\n",
            name, weight, row.node.depth, row.depth, parent
        ));
    }
    out
}

/// Print builder diagnostics to stderr.
pub fn print_issues(issues: &[HierarchyIssue], color: bool) {
    for issue in issues {
        let line = format!("warning: {issue}");
        if color {
            eprintln!("{}", line.yellow());
        } else {
            eprintln!("{line}");
        }
    }
}

/// Print a check report to stdout.
pub fn print_report(report: &CheckReport, color: bool) {
    if report.is_clean() {
        println!("hierarchy is consistent");
        return;
    }

    print_issues(&report.issues, color);
    for divergence in &report.divergences {
        let line = format!(
            "depth drift: node '{}' stored {} but parent chain gives {}",
            divergence.id, divergence.stored, divergence.computed
        );
        if color {
            println!("{}", line.yellow());
        } else {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Node, TreeBuilder};

    #[test]
    fn list_indents_children_and_dashes_cleared_weight() {
        let mut child = Node::child("c", "Child", "a", 0, 1);
        child.weight = None;
        let nodes = vec![Node::root("a", "Main", 0), child];

        let outline = TreeBuilder::new().build(&nodes);
        let rendered = render_list(&outline);

        assert!(rendered.contains("  Child"));
        assert!(rendered.lines().nth(2).unwrap().contains(" -"));
    }

    #[test]
    fn forest_renders_every_root() {
        let nodes = vec![
            Node::root("a", "Alpha", 0),
            Node::root("b", "Beta", 1),
            Node::child("c", "Gamma", "a", 0, 1),
        ];

        let (arena, _) = TreeBuilder::new().build_arena(&nodes);
        let rendered = render_forest(&arena);

        assert!(rendered.contains("Alpha"));
        assert!(rendered.contains("Beta"));
        assert!(rendered.contains("Gamma"));
    }
}
