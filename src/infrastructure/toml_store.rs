//! TOML-backed node store
//!
//! Nodes persist as a `[[node]]` array in one TOML document. Batch writes
//! stage the whole mutated snapshot and land it with an atomic rename, so a
//! failed save can never leave a half-written hierarchy behind.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::domain::{Node, NodeMutation};
use crate::infrastructure::traits::{NodeStore, StoreError, StoreResult};

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct NodesFile {
    #[serde(default, rename = "node")]
    nodes: Vec<Node>,
}

/// File-backed `NodeStore` over a single TOML document.
pub struct TomlNodeStore {
    path: PathBuf,
}

impl TomlNodeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<NodesFile> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::io(format!("reading {}", self.path.display()), e))?;

        let document: NodesFile = toml::from_str(&content).map_err(|e| {
            StoreError::format(format!("{}: {}", self.path.display(), e.message()))
        })?;

        // Duplicate ids would make parent references ambiguous.
        let mut seen = HashSet::new();
        for node in &document.nodes {
            if !seen.insert(&node.id) {
                return Err(StoreError::format(format!(
                    "{}: duplicate node id '{}'",
                    self.path.display(),
                    node.id
                )));
            }
        }

        Ok(document)
    }

    /// Write the snapshot to a sibling temp file, then rename into place.
    fn write_document(&self, document: &NodesFile) -> StoreResult<()> {
        let serialized = toml::to_string_pretty(document)
            .map_err(|e| StoreError::format(format!("serializing snapshot: {e}")))?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(dir)
            .map_err(|e| StoreError::io(format!("staging in {}", dir.display()), e))?;

        std::fs::write(temp.path(), serialized)
            .map_err(|e| StoreError::io("writing staged snapshot".to_string(), e))?;

        temp.persist(&self.path)
            .map_err(|e| StoreError::io(format!("replacing {}", self.path.display()), e.error))?;

        Ok(())
    }

    fn apply_to(document: &mut NodesFile, mutation: &NodeMutation) -> StoreResult<()> {
        let node = document
            .nodes
            .iter_mut()
            .find(|n| n.id == mutation.id)
            .ok_or_else(|| StoreError::UnknownNode(mutation.id.clone()))?;

        node.parent = mutation.parent.clone();
        node.weight = mutation.weight;
        node.depth = mutation.depth;
        Ok(())
    }

    /// Re-seat the mutated rows in batch order.
    ///
    /// Persisted order is the sibling tie-break, and a reparented node
    /// carries no weight, so its position under the new parent has to
    /// survive through row order. Rows named in the batch take over the
    /// document positions the batch rows already occupy, in batch order;
    /// untouched rows stay put.
    fn reorder_rows(document: &mut NodesFile, batch: &[NodeMutation]) {
        let batch_ids: HashSet<_> = batch.iter().map(|m| &m.id).collect();

        let mut touched: Vec<Node> = Vec::with_capacity(batch.len());
        for mutation in batch {
            if let Some(node) = document.nodes.iter().find(|n| n.id == mutation.id) {
                touched.push(node.clone());
            }
        }

        let mut replacement = touched.into_iter();
        for node in document.nodes.iter_mut() {
            if batch_ids.contains(&node.id) {
                if let Some(next) = replacement.next() {
                    *node = next;
                }
            }
        }
    }
}

impl NodeStore for TomlNodeStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load_all(&self) -> StoreResult<Vec<Node>> {
        let document = self.read_document()?;
        debug!("loaded {} nodes", document.nodes.len());
        Ok(document.nodes)
    }

    #[instrument(level = "debug", skip(self, mutation), fields(id = %mutation.id))]
    fn save_node(&self, mutation: &NodeMutation) -> StoreResult<()> {
        self.apply(std::slice::from_ref(mutation))
    }

    #[instrument(level = "debug", skip(self, batch), fields(count = batch.len()))]
    fn apply(&self, batch: &[NodeMutation]) -> StoreResult<()> {
        let mut document = self.read_document()?;

        // Validate the whole batch against the staged snapshot before any
        // byte reaches disk.
        for mutation in batch {
            Self::apply_to(&mut document, mutation)?;
        }
        Self::reorder_rows(&mut document, batch);

        self.write_document(&document)
    }
}
