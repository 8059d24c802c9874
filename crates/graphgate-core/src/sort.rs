//! Ordering of resolved entities by a named field.

use std::cmp::Ordering;

use graphgate_proto::{OrderBy, OrderDirection, Value};

use crate::entity::Entity;

/// Compare two optional field values.
///
/// Absent sorts before any value. Values of the same type compare naturally
/// (`false < true` for booleans). Values of different types, including an int
/// against a float, compare as equal, so the resulting order is only a weak one.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Compare two entities by the field and direction of an `orderBy`.
pub fn compare_entities<E: Entity + ?Sized>(a: &E, b: &E, order: &OrderBy) -> Ordering {
    let ordering = compare_values(
        a.field(&order.field).as_ref(),
        b.field(&order.field).as_ref(),
    );
    match order.direction {
        OrderDirection::Asc => ordering,
        OrderDirection::Desc => ordering.reverse(),
    }
}

/// Return the entities in `orderBy` order.
///
/// The input is left untouched. Without an `orderBy` the copy keeps the input
/// order. The sort is not stable.
pub fn sort_entities<E: Entity + Clone>(entities: &[E], order: Option<&OrderBy>) -> Vec<E> {
    let mut sorted = entities.to_vec();
    if let Some(order) = order {
        sorted.sort_unstable_by(|a, b| compare_entities(a, b, order));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphgate_proto::{Edge, Node};

    fn aged(id: u64, age: i64) -> Node {
        Node::new(id, vec!["Person".into()]).with_property("age", age)
    }

    fn ages(nodes: &[Node]) -> Vec<i64> {
        nodes
            .iter()
            .map(|n| n.properties["age"].as_int().unwrap())
            .collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let nodes = vec![aged(1, 30), aged(2, 10), aged(3, 20)];

        let asc = sort_entities(&nodes, Some(&OrderBy::asc("age")));
        assert_eq!(ages(&asc), vec![10, 20, 30]);

        let desc = sort_entities(&nodes, Some(&OrderBy::desc("age")));
        assert_eq!(ages(&desc), vec![30, 20, 10]);

        // input untouched
        assert_eq!(ages(&nodes), vec![30, 10, 20]);
    }

    #[test]
    fn test_no_order_keeps_input() {
        let nodes = vec![aged(1, 30), aged(2, 10), aged(3, 20)];
        let sorted = sort_entities(&nodes, None);
        assert_eq!(sorted, nodes);

        let empty: Vec<Node> = Vec::new();
        assert!(sort_entities(&empty, Some(&OrderBy::asc("age"))).is_empty());
    }

    #[test]
    fn test_missing_sorts_first() {
        let nodes = vec![aged(1, 5), Node::new(2, vec![]), aged(3, 1)];
        let sorted = sort_entities(&nodes, Some(&OrderBy::asc("age")));
        assert_eq!(sorted.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 3, 1]);

        let sorted = sort_entities(&nodes, Some(&OrderBy::desc("age")));
        assert_eq!(sorted.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    fn test_compare_values() {
        let s = |v: &str| Value::from(v);
        assert_eq!(compare_values(Some(&s("a")), Some(&s("b"))), Ordering::Less);
        assert_eq!(
            compare_values(Some(&Value::Bool(false)), Some(&Value::Bool(true))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&Value::Float(2.5)), Some(&Value::Float(1.5))),
            Ordering::Greater
        );
        assert_eq!(compare_values(None, None), Ordering::Equal);
        assert_eq!(compare_values(None, Some(&Value::Int(0))), Ordering::Less);
    }

    #[test]
    fn test_mismatched_types_compare_equal() {
        assert_eq!(
            compare_values(Some(&Value::Int(1)), Some(&Value::Float(100.0))),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(Some(&Value::from("z")), Some(&Value::Int(1))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_sort_edges_by_weight() {
        let edges = vec![
            Edge::new(1, 1, 2, "KNOWS").with_weight(0.9),
            Edge::new(2, 1, 3, "KNOWS").with_weight(0.1),
            Edge::new(3, 2, 3, "KNOWS").with_weight(0.5),
        ];
        let sorted = sort_entities(&edges, Some(&OrderBy::asc("weight")));
        assert_eq!(sorted.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }
}
