//! Filter evaluation for list resolution.
//!
//! This module provides the [`FilterEvaluator`] that evaluates `where` expressions
//! against a single node or edge.
//!
//! Evaluation is total: a missing field, a type-incompatible operand or an unknown
//! operator makes the condition fail rather than raising an error.

use std::cmp::Ordering;

use graphgate_proto::{FilterCondition, FilterExpr, FilterOp, Value};

use crate::entity::Entity;

/// Evaluates filter expressions against entities.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Check an entity against an optional filter. No filter matches everything.
    pub fn matches<E: Entity + ?Sized>(entity: &E, filter: Option<&FilterExpr>) -> bool {
        match filter {
            Some(expr) => Self::evaluate(entity, expr),
            None => true,
        }
    }

    /// Evaluate a filter expression against an entity.
    pub fn evaluate<E: Entity + ?Sized>(entity: &E, expr: &FilterExpr) -> bool {
        match expr {
            FilterExpr::Not(inner) => !Self::evaluate(entity, inner),
            FilterExpr::Or(children) => children.iter().any(|c| Self::evaluate(entity, c)),
            FilterExpr::And(children) => children.iter().all(|c| Self::evaluate(entity, c)),
            FilterExpr::Conditions(conditions) => conditions
                .iter()
                .all(|c| Self::evaluate_condition(entity, c)),
        }
    }

    /// Evaluate a single leaf condition.
    pub fn evaluate_condition<E: Entity + ?Sized>(entity: &E, condition: &FilterCondition) -> bool {
        // Missing fields never match, whatever the operator.
        let Some(field_value) = entity.field(&condition.field) else {
            return false;
        };
        let operand = &condition.value;

        match &condition.op {
            FilterOp::Eq => Self::values_equal(&field_value, operand),
            FilterOp::Gt => Self::compare_numeric(&field_value, operand).is_some_and(Ordering::is_gt),
            FilterOp::Lt => Self::compare_numeric(&field_value, operand).is_some_and(Ordering::is_lt),
            FilterOp::Gte => Self::compare_numeric(&field_value, operand).is_some_and(Ordering::is_ge),
            FilterOp::Lte => Self::compare_numeric(&field_value, operand).is_some_and(Ordering::is_le),
            FilterOp::Contains => match (&field_value, operand) {
                (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
                _ => false,
            },
            FilterOp::In => match operand {
                Value::List(items) => items.iter().any(|item| Self::values_equal(&field_value, item)),
                _ => false,
            },
            FilterOp::Unknown(op) => {
                tracing::trace!(field = %condition.field, op = %op, "unknown filter operator");
                false
            }
        }
    }

    /// Type-aware equality.
    ///
    /// Numbers compare across int and float; strings and booleans need an exact
    /// type match.
    pub fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Compare two values numerically, coercing both to floats.
    ///
    /// Returns `None` when either side is not a number.
    fn compare_numeric(a: &Value, b: &Value) -> Option<Ordering> {
        a.as_f64()?.partial_cmp(&b.as_f64()?)
    }
}

/// Keep the entities that match the filter, preserving their order.
pub fn filter_entities<E: Entity>(entities: Vec<E>, filter: Option<&FilterExpr>) -> Vec<E> {
    match filter {
        Some(expr) => entities
            .into_iter()
            .filter(|e| FilterEvaluator::evaluate(e, expr))
            .collect(),
        None => entities,
    }
}
