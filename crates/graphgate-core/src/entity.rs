//! Field access over nodes and edges.
//!
//! The filter evaluator and sort comparator read entities only through
//! [`Entity`], so both work on nodes and edges alike.

use std::sync::Arc;

use graphgate_proto::{Edge, Node, Value};

/// Name of the synthetic numeric field read off an edge's weight.
pub const WEIGHT_FIELD: &str = "weight";

/// A read-only entity whose fields can be looked up by name.
pub trait Entity {
    /// Comparison-ready value of a field, or `None` if the entity lacks it.
    fn field(&self, name: &str) -> Option<Value>;
}

impl Entity for Node {
    fn field(&self, name: &str) -> Option<Value> {
        self.properties.get(name).map(|v| v.to_value())
    }
}

impl Entity for Edge {
    fn field(&self, name: &str) -> Option<Value> {
        if name == WEIGHT_FIELD {
            return Some(Value::Float(self.weight));
        }
        self.properties.get(name).map(|v| v.to_value())
    }
}

impl<T: Entity + ?Sized> Entity for &T {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<T: Entity + ?Sized> Entity for Arc<T> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_fields() {
        let node = Node::new(1, vec!["Person".into()]).with_property("age", 30i64);
        assert_eq!(node.field("age"), Some(Value::Int(30)));
        assert_eq!(node.field("weight"), None);
    }

    #[test]
    fn test_edge_weight_is_synthetic() {
        let edge = Edge::new(1, 1, 2, "KNOWS")
            .with_weight(0.5)
            .with_property("weight", "ignored")
            .with_property("since", 2019i64);

        assert_eq!(edge.field("weight"), Some(Value::Float(0.5)));
        assert_eq!(edge.field("since"), Some(Value::Int(2019)));
        assert_eq!(edge.field("missing"), None);
    }

    #[test]
    fn test_shared_entities() {
        let node = Arc::new(Node::new(1, vec![]).with_property("name", "Ann"));
        assert_eq!(node.field("name"), Some(Value::from("Ann")));
        assert_eq!((&node).field("name"), Some(Value::from("Ann")));
    }
}
