//! Tests for HierarchyService over the in-memory store

use std::sync::Arc;

use storetree::application::{ApplicationError, HierarchyService};
use storetree::domain::{DomainError, Node, NodeId, SubmittedRow};
use storetree::infrastructure::InMemoryNodeStore;

fn service_with(nodes: Vec<Node>) -> (HierarchyService, Arc<InMemoryNodeStore>) {
    let store = Arc::new(InMemoryNodeStore::new(nodes));
    (HierarchyService::new(store.clone()), store)
}

fn row(id: &str, parent: Option<&str>, weight: i64) -> SubmittedRow {
    SubmittedRow {
        id: id.into(),
        parent: parent.map(Into::into),
        weight,
    }
}

#[test]
fn given_empty_store_when_outlining_then_empty_hierarchy_error() {
    // Arrange
    let (service, _) = service_with(vec![]);

    // Act
    let result = service.outline();

    // Assert: the "no stores found" path
    assert!(matches!(result, Err(ApplicationError::EmptyHierarchy)));
}

#[test]
fn given_nodes_when_outlining_then_rows_are_ordered_and_depth_annotated() {
    // Arrange
    let (service, _) = service_with(vec![
        Node::root("a", "A", 0),
        Node::root("b", "B", 1),
        Node::child("c", "C", "a", 0, 1),
    ]);

    // Act
    let outline = service.outline().unwrap();

    // Assert
    let ids: Vec<&str> = outline.rows.iter().map(|r| r.node.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
}

#[test]
fn given_submission_when_reordering_then_mutations_are_persisted() {
    // Arrange: drag B under A
    let (service, store) = service_with(vec![
        Node::root("a", "A", 0),
        Node::root("b", "B", 1),
    ]);
    let submission = vec![row("a", None, 0), row("b", Some("a"), 0)];

    // Act
    let mutations = service.reorder(&submission).unwrap();

    // Assert
    assert_eq!(mutations.len(), 2);
    let b = store
        .snapshot()
        .into_iter()
        .find(|n| n.id.as_str() == "b")
        .unwrap();
    assert_eq!(b.parent, Some(NodeId::from("a")));
    assert_eq!(b.weight, None);
    assert_eq!(b.depth, 1);
}

#[test]
fn given_cyclic_submission_when_reordering_then_store_is_untouched() {
    // Arrange
    let initial = vec![Node::root("a", "A", 0), Node::root("b", "B", 1)];
    let (service, store) = service_with(initial.clone());
    let submission = vec![row("a", Some("b"), 0), row("b", Some("a"), 0)];

    // Act
    let result = service.reorder(&submission);

    // Assert: all-or-nothing
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::CycleDetected(_)))
    ));
    assert_eq!(store.snapshot(), initial);
}

#[test]
fn given_move_under_parent_when_moving_then_only_fields_change() {
    // Arrange
    let (service, store) = service_with(vec![
        Node::root("a", "A", 0),
        Node::root("b", "B", 1),
        Node::child("c", "C", "a", 0, 1),
    ]);

    // Act: drag B under A
    service
        .move_node(&NodeId::from("b"), Some(NodeId::from("a")), None)
        .unwrap();

    // Assert
    let snapshot = store.snapshot();
    let b = snapshot.iter().find(|n| n.id.as_str() == "b").unwrap();
    assert_eq!(b.parent, Some(NodeId::from("a")));
    assert_eq!(b.depth, 1);
    // No node was created or deleted
    assert_eq!(snapshot.len(), 3);
}

#[test]
fn given_move_to_root_when_moving_then_weight_is_applied() {
    // Arrange
    let (service, store) = service_with(vec![
        Node::root("a", "A", 0),
        Node::child("c", "C", "a", 0, 1),
    ]);

    // Act: detach C to root with an explicit weight
    service
        .move_node(&NodeId::from("c"), None, Some(-5))
        .unwrap();

    // Assert
    let c = store
        .snapshot()
        .into_iter()
        .find(|n| n.id.as_str() == "c")
        .unwrap();
    assert_eq!(c.parent, None);
    assert_eq!(c.weight, Some(-5));
    assert_eq!(c.depth, 0);
}

#[test]
fn given_move_under_descendant_when_moving_then_nothing_persists() {
    // Arrange
    let initial = vec![
        Node::root("a", "A", 0),
        Node::child("b", "B", "a", 0, 1),
        Node::child("c", "C", "b", 0, 2),
    ];
    let (service, store) = service_with(initial.clone());

    // Act: drag A under its grandchild C
    let result = service.move_node(&NodeId::from("a"), Some(NodeId::from("c")), None);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::CycleDetected(_)))
    ));
    assert_eq!(store.snapshot(), initial);
}

#[test]
fn given_unknown_node_when_moving_then_error() {
    // Arrange
    let (service, _) = service_with(vec![Node::root("a", "A", 0)]);

    // Act
    let result = service.move_node(&NodeId::from("ghost"), None, Some(0));

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnknownNode(_)))
    ));
}

#[test]
fn given_dangling_parent_when_checking_then_report_flags_it() {
    // Arrange
    let (service, _) = service_with(vec![
        Node::root("a", "A", 0),
        Node::child("d", "D", "ghost", 0, 1),
    ]);

    // Act
    let report = service.check().unwrap();

    // Assert
    assert!(!report.is_clean());
    assert_eq!(report.issues.len(), 1);
}

#[test]
fn given_depth_drift_when_checking_then_divergence_is_reported() {
    // Arrange: stored depth says 4, the chain says 1
    let (service, _) = service_with(vec![
        Node::root("a", "A", 0),
        Node::child("c", "C", "a", 0, 4),
    ]);

    // Act
    let report = service.check().unwrap();

    // Assert
    assert!(report.issues.is_empty());
    assert_eq!(report.divergences.len(), 1);
    assert_eq!(report.divergences[0].stored, 4);
    assert_eq!(report.divergences[0].computed, 1);
}

#[test]
fn given_move_with_dangling_sibling_when_moving_then_sibling_stays_root() {
    // Arrange: d has a dangling parent and must not block the move
    let (service, store) = service_with(vec![
        Node::root("a", "A", 0),
        Node::root("b", "B", 1),
        Node::child("d", "D", "ghost", 0, 1),
    ]);

    // Act
    service
        .move_node(&NodeId::from("b"), Some(NodeId::from("a")), None)
        .unwrap();

    // Assert: the dangling reference was repaired to a real root
    let d = store
        .snapshot()
        .into_iter()
        .find(|n| n.id.as_str() == "d")
        .unwrap();
    assert_eq!(d.parent, None);
    assert_eq!(d.depth, 0);
}
