//! Parsed query tree.
//!
//! This is the tree the analyzers walk and the resolvers read arguments from. It is
//! produced by `graphgate-lang` but can also be built directly with the helper
//! constructors, which is how most unit tests assemble queries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{Value, Variables};

/// A complete query document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    /// Document holding a single anonymous query.
    pub fn query(selection_set: SelectionSet) -> Self {
        Self::new(vec![Definition::Operation(OperationDefinition::query(
            selection_set,
        ))])
    }

    /// Iterate over the operation definitions.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    /// Look up a fragment definition by name.
    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.definitions.iter().find_map(|d| match d {
            Definition::Fragment(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    /// Merge declared variable defaults under the supplied bindings.
    ///
    /// Supplied bindings always win over defaults.
    pub fn variables_with_defaults(&self, supplied: &Variables) -> Variables {
        let mut merged = Variables::new();
        for op in self.operations() {
            for var in &op.variables {
                if let Some(default) = &var.default_value {
                    merged
                        .entry(var.name.clone())
                        .or_insert_with(|| default.resolve(supplied));
                }
            }
        }
        for (name, value) in supplied {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}

/// A top-level definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

/// Kind of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationKind {
    #[default]
    Query,
    Mutation,
    Subscription,
}

/// An operation definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variables: Vec<VariableDefinition>,
    pub selection_set: SelectionSet,
}

impl OperationDefinition {
    /// Anonymous query operation.
    pub fn query(selection_set: SelectionSet) -> Self {
        Self {
            kind: OperationKind::Query,
            name: None,
            variables: Vec::new(),
            selection_set,
        }
    }
}

/// `$name: Type = default`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub var_type: TypeRef,
    pub default_value: Option<InputValue>,
}

/// A type reference in a variable definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

/// `fragment Name on Type { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentDefinition {
    pub name: String,
    pub type_condition: String,
    pub selection_set: SelectionSet,
}

/// A braced list of selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    pub items: Vec<Selection>,
}

impl SelectionSet {
    pub fn new(items: Vec<Selection>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One entry of a selection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

/// A selected field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, InputValue)>,
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    /// Field with no arguments and no nested selection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: InputValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    pub fn with_selection(mut self, items: Vec<Selection>) -> Self {
        self.selection_set = Some(SelectionSet::new(items));
        self
    }

    /// Name under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// First argument with the given name.
    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Resolve every argument against the variable bindings.
    pub fn resolved_arguments(&self, variables: &Variables) -> BTreeMap<String, Value> {
        self.arguments
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve(variables)))
            .collect()
    }
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Selection::Field(field)
    }
}

/// `...Name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentSpread {
    pub name: String,
}

/// `... on Type { ... }` or `... { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineFragment {
    pub type_condition: Option<String>,
    pub selection_set: SelectionSet,
}

/// An argument value as written in the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    Variable(String),
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Enum(String),
    List(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    /// Resolve variables and convert to a native value.
    ///
    /// Unbound variables resolve to `Null`; enum values resolve to their name.
    pub fn resolve(&self, variables: &Variables) -> Value {
        match self {
            InputValue::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
            InputValue::Null => Value::Null,
            InputValue::Int(i) => Value::Int(*i),
            InputValue::Float(f) => Value::Float(*f),
            InputValue::String(s) => Value::String(s.clone()),
            InputValue::Bool(b) => Value::Bool(*b),
            InputValue::Enum(e) => Value::String(e.clone()),
            InputValue::List(items) => {
                Value::List(items.iter().map(|v| v.resolve(variables)).collect())
            }
            InputValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.resolve(variables)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_variables() {
        let mut vars = Variables::new();
        vars.insert("n".into(), Value::Int(5));

        let input = InputValue::Object(vec![
            ("first".into(), InputValue::Variable("n".into())),
            ("missing".into(), InputValue::Variable("nope".into())),
            ("direction".into(), InputValue::Enum("DESC".into())),
            (
                "ids".into(),
                InputValue::List(vec![InputValue::Int(1), InputValue::Float(2.5)]),
            ),
        ]);

        let value = input.resolve(&vars);
        assert_eq!(value.get("first"), Some(&Value::Int(5)));
        assert_eq!(value.get("missing"), Some(&Value::Null));
        assert_eq!(value.get("direction"), Some(&Value::from("DESC")));
        assert_eq!(
            value.get("ids"),
            Some(&Value::List(vec![Value::Int(1), Value::Float(2.5)]))
        );
    }

    #[test]
    fn test_field_helpers() {
        let field = Field::new("persons")
            .with_alias("people")
            .with_argument("limit", InputValue::Int(3))
            .with_selection(vec![Field::new("id").into()]);

        assert_eq!(field.response_key(), "people");
        assert_eq!(field.argument("limit"), Some(&InputValue::Int(3)));
        assert_eq!(field.argument("offset"), None);
        assert_eq!(
            field.resolved_arguments(&Variables::new()).get("limit"),
            Some(&Value::Int(3))
        );
    }

    #[test]
    fn test_variables_with_defaults() {
        let doc = Document::new(vec![Definition::Operation(OperationDefinition {
            kind: OperationKind::Query,
            name: Some("Q".into()),
            variables: vec![
                VariableDefinition {
                    name: "a".into(),
                    var_type: TypeRef::Named("Int".into()),
                    default_value: Some(InputValue::Int(10)),
                },
                VariableDefinition {
                    name: "b".into(),
                    var_type: TypeRef::Named("Int".into()),
                    default_value: Some(InputValue::Int(20)),
                },
            ],
            selection_set: SelectionSet::default(),
        })]);

        let mut supplied = Variables::new();
        supplied.insert("b".into(), Value::Int(2));

        let merged = doc.variables_with_defaults(&supplied);
        assert_eq!(merged.get("a"), Some(&Value::Int(10)));
        assert_eq!(merged.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_fragment_lookup() {
        let doc = Document::new(vec![Definition::Fragment(FragmentDefinition {
            name: "F".into(),
            type_condition: "Person".into(),
            selection_set: SelectionSet::default(),
        })]);

        assert!(doc.fragment("F").is_some());
        assert!(doc.fragment("G").is_none());
        assert_eq!(doc.operations().count(), 0);
    }
}
