//! Sort order arguments.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl OrderDirection {
    /// Parse the argument spelling (`ASC` / `DESC`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ASC" => Some(OrderDirection::Asc),
            "DESC" => Some(OrderDirection::Desc),
            _ => None,
        }
    }
}

/// Ordering specification for a list field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to order by.
    pub field: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Create an ascending order spec.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create a descending order spec.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parse an `orderBy` argument of the form `{ field: "age", direction: DESC }`.
    ///
    /// Missing or empty `field`, or a direction other than `ASC`/`DESC`, yields `None`.
    pub fn from_argument(value: &Value) -> Option<Self> {
        let field = value.get("field")?.as_str()?;
        if field.is_empty() {
            return None;
        }
        let direction = OrderDirection::parse(value.get("direction")?.as_str()?)?;
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn arg(field: Value, direction: Value) -> Value {
        let mut map = BTreeMap::new();
        map.insert("field".to_string(), field);
        map.insert("direction".to_string(), direction);
        Value::Object(map)
    }

    #[test]
    fn test_from_argument() {
        let order = OrderBy::from_argument(&arg("age".into(), "DESC".into())).unwrap();
        assert_eq!(order, OrderBy::desc("age"));

        let order = OrderBy::from_argument(&arg("name".into(), "ASC".into())).unwrap();
        assert_eq!(order, OrderBy::asc("name"));
    }

    #[test]
    fn test_from_argument_rejects_malformed() {
        assert_eq!(OrderBy::from_argument(&arg("".into(), "ASC".into())), None);
        assert_eq!(OrderBy::from_argument(&arg("age".into(), "UP".into())), None);
        assert_eq!(OrderBy::from_argument(&arg(Value::Int(1), "ASC".into())), None);
        assert_eq!(OrderBy::from_argument(&Value::from("age")), None);
    }
}
