//! Classification of selected fields by name.
//!
//! The analyzers never look at field names themselves; they ask a
//! [`FieldClassifier`]. [`NameHeuristics`] is the default, which can be swapped for
//! a schema-backed classifier without touching the analyzers.

use std::collections::HashSet;

/// What a selected field produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `__typename`, `__schema` and friends.
    Introspection,
    /// A leaf value; nothing can be selected beneath it.
    Scalar,
    /// A list of objects.
    List,
    /// A single object.
    Object,
}

/// Decides the [`FieldKind`] of a field name.
pub trait FieldClassifier: Send + Sync {
    fn classify(&self, name: &str) -> FieldKind;
}

/// Fields known to produce lists.
pub const DEFAULT_LIST_FIELDS: &[&str] = &[
    "persons",
    "edges",
    "personsConnection",
    "edgesConnection",
    "outgoingEdges",
    "incomingEdges",
];

/// Fields known to be leaves.
pub const DEFAULT_SCALAR_FIELDS: &[&str] = &[
    "id",
    "properties",
    "labels",
    "type",
    "weight",
    "fromNodeId",
    "toNodeId",
    "cursor",
    "name",
    "count",
];

/// Name-based classifier.
///
/// Checked in order: `__` prefix, the list allow-list, the scalar set, then a
/// plural heuristic (a name ending in `s` or `Connection` is a list). Anything
/// else is an object.
#[derive(Debug, Clone)]
pub struct NameHeuristics {
    list_fields: HashSet<String>,
    scalar_fields: HashSet<String>,
}

impl Default for NameHeuristics {
    fn default() -> Self {
        Self {
            list_fields: DEFAULT_LIST_FIELDS.iter().map(|s| s.to_string()).collect(),
            scalar_fields: DEFAULT_SCALAR_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NameHeuristics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an extra list field.
    pub fn with_list_field(mut self, name: impl Into<String>) -> Self {
        self.list_fields.insert(name.into());
        self
    }

    /// Declare an extra scalar field.
    pub fn with_scalar_field(mut self, name: impl Into<String>) -> Self {
        self.scalar_fields.insert(name.into());
        self
    }
}

impl FieldClassifier for NameHeuristics {
    fn classify(&self, name: &str) -> FieldKind {
        if name.starts_with("__") {
            FieldKind::Introspection
        } else if self.list_fields.contains(name) {
            FieldKind::List
        } else if self.scalar_fields.contains(name) {
            FieldKind::Scalar
        } else if name.ends_with('s') || name.ends_with("Connection") {
            FieldKind::List
        } else {
            FieldKind::Object
        }
    }
}
