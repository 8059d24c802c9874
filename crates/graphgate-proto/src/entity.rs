//! Read-only node and edge views handed to resolvers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::PropertyValue;

/// Identifier of a node or edge in the underlying store.
pub type EntityId = u64;

/// A labelled node with a property map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    pub labels: Vec<String>,
    pub properties: HashMap<String, PropertyValue>,
}

impl Node {
    /// Create a node carrying the given labels and no properties.
    pub fn new(id: EntityId, labels: Vec<String>) -> Self {
        Self {
            id,
            labels,
            properties: HashMap::new(),
        }
    }

    /// Add a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Check whether the node carries a label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A typed, weighted, directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Edge {
    pub id: EntityId,
    pub from_node_id: EntityId,
    pub to_node_id: EntityId,
    pub edge_type: String,
    pub weight: f64,
    pub properties: HashMap<String, PropertyValue>,
}

impl Edge {
    /// Create an edge with weight 1.0 and no properties.
    pub fn new(
        id: EntityId,
        from_node_id: EntityId,
        to_node_id: EntityId,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            from_node_id,
            to_node_id,
            edge_type: edge_type.into(),
            weight: 1.0,
            properties: HashMap::new(),
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Add a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}
