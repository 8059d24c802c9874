//! Count/min/max/sum/avg reducers over resolved entities.

use std::collections::BTreeMap;

use serde::Serialize;

use graphgate_proto::{Edge, Node};

/// Running statistics over one numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub avg: f64,
    #[serde(skip)]
    count: usize,
}

impl NumericStats {
    fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            avg: value,
            count: 1,
        }
    }

    fn push(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
        self.avg = self.sum / self.count as f64;
    }

    fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut values = values.into_iter();
        let mut stats = Self::new(values.next()?);
        for value in values {
            stats.push(value);
        }
        Some(stats)
    }

    /// Number of values seen.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Aggregate over a set of nodes.
///
/// Every numeric property gets its own statistics, computed over the nodes that
/// carry it. Non-numeric properties are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeAggregate {
    pub count: usize,
    pub fields: BTreeMap<String, NumericStats>,
}

impl NodeAggregate {
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut aggregate = Self::default();
        for node in nodes {
            aggregate.count += 1;
            for (name, value) in &node.properties {
                let Some(number) = value.as_number() else {
                    continue;
                };
                aggregate
                    .fields
                    .entry(name.clone())
                    .and_modify(|stats| stats.push(number))
                    .or_insert_with(|| NumericStats::new(number));
            }
        }
        aggregate
    }

    pub fn field(&self, name: &str) -> Option<&NumericStats> {
        self.fields.get(name)
    }
}

/// Aggregate over a set of edges. Statistics cover the edge weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeAggregate {
    pub count: usize,
    /// `None` when there are no edges.
    pub weight: Option<NumericStats>,
}

impl EdgeAggregate {
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let weights: Vec<f64> = edges.into_iter().map(|edge| edge.weight).collect();
        Self {
            count: weights.len(),
            weight: NumericStats::from_values(weights),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_aggregate() {
        let nodes = vec![
            Node::new(1, vec![])
                .with_property("age", 20i64)
                .with_property("name", "a"),
            Node::new(2, vec![])
                .with_property("age", 40i64)
                .with_property("score", 1.5),
            Node::new(3, vec![]).with_property("age", 30i64),
        ];
        let aggregate = NodeAggregate::from_nodes(&nodes);
        assert_eq!(aggregate.count, 3);

        let age = aggregate.field("age").unwrap();
        assert_eq!((age.min, age.max, age.sum, age.avg), (20.0, 40.0, 90.0, 30.0));
        assert_eq!(age.count(), 3);

        let score = aggregate.field("score").unwrap();
        assert_eq!((score.min, score.avg), (1.5, 1.5));

        assert!(aggregate.field("name").is_none());
    }

    #[test]
    fn test_empty_aggregates() {
        let aggregate = NodeAggregate::from_nodes(&[]);
        assert_eq!(aggregate.count, 0);
        assert!(aggregate.fields.is_empty());

        let aggregate = EdgeAggregate::from_edges(&[]);
        assert_eq!(aggregate, EdgeAggregate::default());
    }

    #[test]
    fn test_edge_aggregate() {
        let edges = vec![
            Edge::new(1, 1, 2, "KNOWS").with_weight(0.5),
            Edge::new(2, 1, 3, "KNOWS").with_weight(1.5),
            Edge::new(3, 2, 3, "KNOWS").with_weight(1.0),
        ];
        let aggregate = EdgeAggregate::from_edges(&edges);
        assert_eq!(aggregate.count, 3);
        let weight = aggregate.weight.unwrap();
        assert_eq!((weight.min, weight.max, weight.sum, weight.avg), (0.5, 1.5, 3.0, 1.0));
    }
}
