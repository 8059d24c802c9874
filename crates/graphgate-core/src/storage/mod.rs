//! Storage collaborator.
//!
//! Resolvers read the graph only through [`GraphStore`]. [`MemoryStore`] is the
//! in-process implementation used by the gateway, the CLI and the tests.

mod memory;

pub use memory::MemoryStore;

use graphgate_proto::{Edge, EntityId, Node};

use crate::error::StorageError;

/// Read access to a property graph.
pub trait GraphStore: Send + Sync {
    /// Every label carried by at least one node, sorted.
    fn labels(&self) -> Vec<String>;

    /// Nodes carrying `label`, in id order.
    fn nodes_by_label(&self, label: &str) -> Result<Vec<Node>, StorageError>;

    fn node(&self, id: EntityId) -> Result<Node, StorageError>;

    fn edge(&self, id: EntityId) -> Result<Edge, StorageError>;

    /// Every edge, in id order.
    fn all_edges(&self) -> Result<Vec<Edge>, StorageError>;

    /// Edges leaving `node_id`, in creation order.
    fn outgoing_edges(&self, node_id: EntityId) -> Result<Vec<Edge>, StorageError>;

    /// Edges arriving at `node_id`, in creation order.
    fn incoming_edges(&self, node_id: EntityId) -> Result<Vec<Edge>, StorageError>;
}
