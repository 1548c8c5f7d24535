//! Tests for TomlNodeStore

use std::path::PathBuf;

use tempfile::TempDir;

use storetree::domain::{Node, NodeMutation};
use storetree::infrastructure::{NodeStore, StoreError, TomlNodeStore};

fn write_store(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("stores.toml");
    std::fs::write(&path, content).expect("write store file");
    path
}

const THREE_NODES: &str = r#"
[[node]]
id = "a"
name = "Main"
weight = 0

[[node]]
id = "b"
name = "Outlet"
weight = 1

[[node]]
id = "c"
name = "Warehouse"
parent = "a"
depth = 1
"#;

#[test]
fn given_store_file_when_loading_then_nodes_come_back_in_file_order() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_store(&temp, THREE_NODES);

    // Act
    let nodes = TomlNodeStore::new(&path).load_all().unwrap();

    // Assert
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(nodes[2].parent.as_ref().unwrap().as_str(), "a");
    assert_eq!(nodes[2].weight, None);
}

#[test]
fn given_mutation_when_saving_then_fields_are_overwritten() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_store(&temp, THREE_NODES);
    let store = TomlNodeStore::new(&path);

    // Act: reparent b under a
    store
        .save_node(&NodeMutation {
            id: "b".into(),
            parent: Some("a".into()),
            weight: None,
            depth: 1,
        })
        .unwrap();

    // Assert
    let nodes = store.load_all().unwrap();
    let b = nodes.iter().find(|n| n.id.as_str() == "b").unwrap();
    assert_eq!(b.parent, Some("a".into()));
    assert_eq!(b.weight, None);
    assert_eq!(b.depth, 1);
    // Untouched node is intact
    assert!(nodes.iter().any(|n| n.id.as_str() == "c"));
}

#[test]
fn given_unknown_node_in_batch_when_applying_then_file_is_unchanged() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_store(&temp, THREE_NODES);
    let store = TomlNodeStore::new(&path);
    let before = std::fs::read_to_string(&path).unwrap();

    let batch = vec![
        NodeMutation {
            id: "a".into(),
            parent: None,
            weight: Some(9),
            depth: 0,
        },
        NodeMutation {
            id: "ghost".into(),
            parent: None,
            weight: Some(0),
            depth: 0,
        },
    ];

    // Act
    let result = store.apply(&batch);

    // Assert: atomic, nothing landed
    assert!(matches!(result, Err(StoreError::UnknownNode(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn given_batch_when_applying_then_touched_rows_take_batch_order() {
    // Arrange: persisted order is the sibling tie-break, so the reordered
    // rows must land in batch order
    let temp = TempDir::new().unwrap();
    let path = write_store(&temp, THREE_NODES);
    let store = TomlNodeStore::new(&path);

    // Both become children of a with cleared weights; the file has b
    // before c, the batch says c before b
    let batch = vec![
        NodeMutation {
            id: "c".into(),
            parent: Some("a".into()),
            weight: None,
            depth: 1,
        },
        NodeMutation {
            id: "b".into(),
            parent: Some("a".into()),
            weight: None,
            depth: 1,
        },
    ];

    // Act
    store.apply(&batch).unwrap();

    // Assert: c now precedes b in persisted order
    let nodes = store.load_all().unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
}

#[test]
fn given_duplicate_ids_when_loading_then_format_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_store(
        &temp,
        r#"
[[node]]
id = "a"
name = "One"

[[node]]
id = "a"
name = "Two"
"#,
    );

    // Act
    let result = TomlNodeStore::new(&path).load_all();

    // Assert
    assert!(matches!(result, Err(StoreError::Format { .. })));
}

#[test]
fn given_malformed_toml_when_loading_then_format_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_store(&temp, "[[node]\nid = broken");

    // Act
    let result = TomlNodeStore::new(&path).load_all();

    // Assert
    assert!(matches!(result, Err(StoreError::Format { .. })));
}

#[test]
fn given_missing_file_when_loading_then_io_error() {
    // Arrange
    let store = TomlNodeStore::new("/nonexistent/stores.toml");

    // Act
    let result = store.load_all();

    // Assert
    assert!(matches!(result, Err(StoreError::Io { .. })));
}

#[test]
fn given_save_when_rewriting_then_cleared_weight_is_omitted_from_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_store(&temp, THREE_NODES);
    let store = TomlNodeStore::new(&path);

    // Act
    store
        .save_node(&NodeMutation {
            id: "b".into(),
            parent: Some("a".into()),
            weight: None,
            depth: 1,
        })
        .unwrap();

    // Assert: the cleared weight is absent, not zero
    let content = std::fs::read_to_string(&path).unwrap();
    let b_section = content.split("[[node]]").find(|s| s.contains("\"b\"")).unwrap();
    assert!(!b_section.contains("weight"));

    let nodes = store.load_all().unwrap();
    let roundtrip: Vec<Node> = nodes;
    assert_eq!(roundtrip.len(), 3);
}
