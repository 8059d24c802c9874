//! Boolean filter expressions parsed from `where` arguments.
//!
//! A `where` argument is an input object such as
//!
//! ```text
//! { OR: [ { age: { gt: 30 } }, { name: { contains: "li" } } ] }
//! ```
//!
//! and is turned into a [`FilterExpr`] tree. Exactly one combinator is active per
//! node; the variant is picked in the order `NOT`, `OR`, `AND`, plain conditions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Key naming the negation combinator.
pub const NOT_KEY: &str = "NOT";
/// Key naming the disjunction combinator.
pub const OR_KEY: &str = "OR";
/// Key naming the conjunction combinator.
pub const AND_KEY: &str = "AND";

/// A node in a boolean predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Negation of the nested expression.
    Not(Box<FilterExpr>),
    /// True if any nested expression matches. An empty list never matches.
    Or(Vec<FilterExpr>),
    /// True if every nested expression matches. An empty list always matches.
    And(Vec<FilterExpr>),
    /// Implicitly AND-ed leaf conditions. An empty list always matches.
    Conditions(Vec<FilterCondition>),
}

impl FilterExpr {
    /// Negate an expression.
    pub fn not(expr: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(expr))
    }

    /// Single-condition expression.
    pub fn condition(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        FilterExpr::Conditions(vec![FilterCondition::new(field, op, value)])
    }

    /// Parse a `where` argument.
    ///
    /// Returns `None` when the argument is not an input object, which callers treat
    /// as match-all. Empty `OR`/`AND` lists are treated as absent.
    pub fn from_where(value: &Value) -> Option<FilterExpr> {
        let object = value.as_object()?;
        Some(Self::from_object(object))
    }

    fn from_object(object: &BTreeMap<String, Value>) -> FilterExpr {
        if let Some(inner) = object.get(NOT_KEY).and_then(Value::as_object) {
            return FilterExpr::not(Self::from_object(inner));
        }

        let or = Self::nested_list(object.get(OR_KEY));
        if !or.is_empty() {
            return FilterExpr::Or(or);
        }

        let and = Self::nested_list(object.get(AND_KEY));
        if !and.is_empty() {
            return FilterExpr::And(and);
        }

        let mut conditions = Vec::new();
        for (field, ops) in object {
            if field == NOT_KEY || field == OR_KEY || field == AND_KEY {
                continue;
            }
            let Some(ops) = ops.as_object() else {
                continue;
            };
            for (op, operand) in ops {
                conditions.push(FilterCondition::new(
                    field.clone(),
                    FilterOp::parse(op),
                    operand.clone(),
                ));
            }
        }
        FilterExpr::Conditions(conditions)
    }

    fn nested_list(value: Option<&Value>) -> Vec<FilterExpr> {
        value
            .and_then(Value::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(Self::from_object)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A leaf predicate `field <op> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Comparison operator of a leaf condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    In,
    /// An operator name that is not recognized. Never matches.
    Unknown(String),
}

impl FilterOp {
    /// Map an argument key to an operator.
    pub fn parse(name: &str) -> FilterOp {
        match name {
            "eq" => FilterOp::Eq,
            "gt" => FilterOp::Gt,
            "lt" => FilterOp::Lt,
            "gte" => FilterOp::Gte,
            "lte" => FilterOp::Lte,
            "contains" => FilterOp::Contains,
            "in" => FilterOp::In,
            other => FilterOp::Unknown(other.to_string()),
        }
    }

    /// The argument key of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gt => "gt",
            FilterOp::Lt => "lt",
            FilterOp::Gte => "gte",
            FilterOp::Lte => "lte",
            FilterOp::Contains => "contains",
            FilterOp::In => "in",
            FilterOp::Unknown(name) => name,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_non_object_is_match_all() {
        assert_eq!(FilterExpr::from_where(&Value::Null), None);
        assert_eq!(FilterExpr::from_where(&Value::Int(1)), None);
    }

    #[test]
    fn test_parse_conditions() {
        let where_arg = object(vec![
            ("age", object(vec![("gt", Value::Int(30)), ("lte", Value::Int(60))])),
            ("name", object(vec![("contains", Value::from("li"))])),
        ]);

        let expr = FilterExpr::from_where(&where_arg).unwrap();
        assert_eq!(
            expr,
            FilterExpr::Conditions(vec![
                FilterCondition::new("age", FilterOp::Gt, 30i64),
                FilterCondition::new("age", FilterOp::Lte, 60i64),
                FilterCondition::new("name", FilterOp::Contains, "li"),
            ])
        );
    }

    #[test]
    fn test_not_takes_priority() {
        let where_arg = object(vec![
            ("NOT", object(vec![("age", object(vec![("eq", Value::Int(1))]))])),
            (
                "OR",
                Value::List(vec![object(vec![("age", object(vec![("eq", Value::Int(2))]))])]),
            ),
        ]);

        let expr = FilterExpr::from_where(&where_arg).unwrap();
        assert_eq!(
            expr,
            FilterExpr::not(FilterExpr::condition("age", FilterOp::Eq, 1i64))
        );
    }

    #[test]
    fn test_or_before_and() {
        let branch = |v: i64| object(vec![("age", object(vec![("eq", Value::Int(v))]))]);
        let where_arg = object(vec![
            ("AND", Value::List(vec![branch(1)])),
            ("OR", Value::List(vec![branch(2), branch(3)])),
        ]);

        let expr = FilterExpr::from_where(&where_arg).unwrap();
        assert!(matches!(expr, FilterExpr::Or(ref items) if items.len() == 2));
    }

    #[test]
    fn test_empty_or_is_absent() {
        let where_arg = object(vec![
            ("OR", Value::List(vec![])),
            ("name", object(vec![("eq", Value::from("Bob"))])),
        ]);

        let expr = FilterExpr::from_where(&where_arg).unwrap();
        assert_eq!(expr, FilterExpr::condition("name", FilterOp::Eq, "Bob"));
    }

    #[test]
    fn test_unknown_operator_preserved() {
        let where_arg = object(vec![("age", object(vec![("regex", Value::from(".*"))]))]);
        let expr = FilterExpr::from_where(&where_arg).unwrap();
        assert_eq!(
            expr,
            FilterExpr::condition("age", FilterOp::Unknown("regex".into()), ".*")
        );
    }

    #[test]
    fn test_op_names() {
        for name in ["eq", "gt", "lt", "gte", "lte", "contains", "in"] {
            assert_eq!(FilterOp::parse(name).as_str(), name);
        }
    }
}
