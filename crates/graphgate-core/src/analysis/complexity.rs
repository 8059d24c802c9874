//! Static cost estimation.
//!
//! Walks every operation of a document with a running multiplier that starts at 1:
//!
//! - introspection fields cost a flat 1
//! - a list field multiplies the running multiplier by its `limit`/`first`/`last`
//!   argument (or `default_list_limit`) and recurses with the product
//! - a scalar field costs the current multiplier
//! - any other field recurses with the multiplier unchanged, or costs its effective
//!   multiplier when it has no nested selection
//! - inline fragments recurse with the current multiplier
//! - a named fragment spread costs the current multiplier; its body is not expanded
//!
//! Fragment definitions on their own are never scored.

use graphgate_proto::{Document, Field, InputValue, Selection, SelectionSet, Value, Variables};

use crate::analysis::classify::{FieldClassifier, FieldKind, NameHeuristics};
use crate::config::ComplexityConfig;

/// Argument names that bound the size of a list field, scanned in order.
pub const LIMIT_ARGUMENTS: &[&str] = &["limit", "first", "last"];

/// Estimates the cost of a document.
pub struct ComplexityAnalyzer<'a> {
    config: &'a ComplexityConfig,
    classifier: &'a dyn FieldClassifier,
    variables: &'a Variables,
}

impl<'a> ComplexityAnalyzer<'a> {
    pub fn new(
        config: &'a ComplexityConfig,
        classifier: &'a dyn FieldClassifier,
        variables: &'a Variables,
    ) -> Self {
        Self {
            config,
            classifier,
            variables,
        }
    }

    /// Sum of the cost of every operation in the document.
    pub fn score(&self, document: &Document) -> u64 {
        document
            .operations()
            .map(|op| self.selection_set_cost(&op.selection_set, 1))
            .fold(0, u64::saturating_add)
    }

    fn selection_set_cost(&self, selection_set: &SelectionSet, multiplier: u64) -> u64 {
        let mut cost: u64 = 0;

        for selection in &selection_set.items {
            let item = match selection {
                Selection::Field(field) => self.field_cost(field, multiplier),
                Selection::InlineFragment(fragment) => {
                    self.selection_set_cost(&fragment.selection_set, multiplier)
                }
                Selection::FragmentSpread(_) => multiplier,
            };
            cost = cost.saturating_add(item);
        }

        cost
    }

    fn field_cost(&self, field: &Field, multiplier: u64) -> u64 {
        let kind = self.classifier.classify(&field.name);
        let effective = match kind {
            FieldKind::Introspection => return 1,
            FieldKind::Scalar => return multiplier,
            FieldKind::List => multiplier.saturating_mul(self.list_size(field)),
            FieldKind::Object => multiplier,
        };

        match &field.selection_set {
            Some(nested) => self.selection_set_cost(nested, effective),
            None => effective,
        }
    }

    /// Estimated number of items a list field returns.
    ///
    /// The first limit argument carrying a positive integer, written literally or
    /// bound through a variable, wins.
    fn list_size(&self, field: &Field) -> u64 {
        field
            .arguments
            .iter()
            .filter(|(name, _)| LIMIT_ARGUMENTS.contains(&name.as_str()))
            .find_map(|(_, value)| self.positive_int(value))
            .unwrap_or(self.config.default_list_limit)
    }

    fn positive_int(&self, value: &InputValue) -> Option<u64> {
        let n = match value {
            InputValue::Int(n) => *n,
            InputValue::Variable(name) => match self.variables.get(name) {
                Some(Value::Int(n)) => *n,
                _ => return None,
            },
            _ => return None,
        };
        u64::try_from(n).ok().filter(|n| *n > 0)
    }
}

/// Score a document with the default name heuristics.
pub fn score(document: &Document, config: &ComplexityConfig, variables: &Variables) -> u64 {
    let classifier = NameHeuristics::default();
    ComplexityAnalyzer::new(config, &classifier, variables).score(document)
}
