use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use graphgate_proto::{Edge, EntityId, Node, PropertyValue};

use super::GraphStore;
use crate::error::StorageError;

/// Concurrent in-memory graph.
///
/// Ids are assigned from 1 in creation order, separately for nodes and edges.
pub struct MemoryStore {
    nodes: DashMap<EntityId, Node>,
    edges: DashMap<EntityId, Edge>,
    /// node id -> ids of edges leaving it
    outgoing: DashMap<EntityId, Vec<EntityId>>,
    /// node id -> ids of edges arriving at it
    incoming: DashMap<EntityId, Vec<EntityId>>,
    next_node_id: AtomicU64,
    next_edge_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
            edges: DashMap::new(),
            outgoing: DashMap::new(),
            incoming: DashMap::new(),
            next_node_id: AtomicU64::new(1),
            next_edge_id: AtomicU64::new(1),
        }
    }

    /// Insert a node and return it with its assigned id.
    pub fn create_node(
        &self,
        labels: Vec<String>,
        properties: HashMap<String, PropertyValue>,
    ) -> Node {
        let id = self.next_node_id.fetch_add(1, Ordering::SeqCst);
        let node = Node {
            id,
            labels,
            properties,
        };
        self.nodes.insert(id, node.clone());
        node
    }

    /// Insert an edge between two existing nodes.
    pub fn create_edge(
        &self,
        from_node_id: EntityId,
        to_node_id: EntityId,
        edge_type: impl Into<String>,
        weight: f64,
        properties: HashMap<String, PropertyValue>,
    ) -> Result<Edge, StorageError> {
        for endpoint in [from_node_id, to_node_id] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(StorageError::NodeNotFound(endpoint));
            }
        }

        let id = self.next_edge_id.fetch_add(1, Ordering::SeqCst);
        let edge = Edge {
            id,
            from_node_id,
            to_node_id,
            edge_type: edge_type.into(),
            weight,
            properties,
        };
        self.edges.insert(id, edge.clone());
        self.outgoing.entry(from_node_id).or_default().push(id);
        self.incoming.entry(to_node_id).or_default().push(id);
        Ok(edge)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edges_by_id(&self, ids: Option<Vec<EntityId>>) -> Vec<Edge> {
        ids.unwrap_or_default()
            .into_iter()
            .filter_map(|id| self.edges.get(&id).map(|e| e.value().clone()))
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for MemoryStore {
    fn labels(&self) -> Vec<String> {
        let labels: BTreeSet<String> = self
            .nodes
            .iter()
            .flat_map(|node| node.labels.clone())
            .collect();
        labels.into_iter().collect()
    }

    fn nodes_by_label(&self, label: &str) -> Result<Vec<Node>, StorageError> {
        let mut nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| node.has_label(label))
            .map(|node| node.value().clone())
            .collect();
        nodes.sort_unstable_by_key(|node| node.id);
        Ok(nodes)
    }

    fn node(&self, id: EntityId) -> Result<Node, StorageError> {
        self.nodes
            .get(&id)
            .map(|node| node.value().clone())
            .ok_or(StorageError::NodeNotFound(id))
    }

    fn edge(&self, id: EntityId) -> Result<Edge, StorageError> {
        self.edges
            .get(&id)
            .map(|edge| edge.value().clone())
            .ok_or(StorageError::EdgeNotFound(id))
    }

    fn all_edges(&self) -> Result<Vec<Edge>, StorageError> {
        let mut edges: Vec<Edge> = self.edges.iter().map(|edge| edge.value().clone()).collect();
        edges.sort_unstable_by_key(|edge| edge.id);
        Ok(edges)
    }

    fn outgoing_edges(&self, node_id: EntityId) -> Result<Vec<Edge>, StorageError> {
        let ids = self.outgoing.get(&node_id).map(|ids| ids.value().clone());
        Ok(self.edges_by_id(ids))
    }

    fn incoming_edges(&self, node_id: EntityId) -> Result<Vec<Edge>, StorageError> {
        let ids = self.incoming.get(&node_id).map(|ids| ids.value().clone());
        Ok(self.edges_by_id(ids))
    }
}
