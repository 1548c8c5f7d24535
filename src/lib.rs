//! storetree: store hierarchy library and admin CLI
//!
//! Two pure-logic cores drive everything:
//!
//! - [`domain::TreeBuilder`] turns a flat node snapshot into an ordered,
//!   depth-annotated outline (parents before children, siblings by weight,
//!   ties by persisted order), defensively handling dangling parents and
//!   cycles.
//! - [`domain::OrderReconciler`] turns a drag-and-drop submission into the
//!   minimal set of parent/weight/depth mutations, all-or-nothing.
//!
//! Persistence sits behind [`infrastructure::traits::NodeStore`]; the
//! application service wires the two cores to a store, and the CLI is one
//! thin consumer of that service.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;

pub use application::{CheckReport, HierarchyService};
pub use domain::{
    HierarchyIssue, Node, NodeId, NodeMutation, OrderReconciler, Outline, OutlineRow,
    SubmittedRow, TreeBuilder,
};
pub use infrastructure::{InMemoryNodeStore, NodeStore, TomlNodeStore};
