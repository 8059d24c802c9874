//! Selection nesting depth.

use graphgate_proto::{Document, Selection, SelectionSet};

use crate::analysis::classify::{FieldClassifier, FieldKind, NameHeuristics};

/// Measures how deeply a document nests its selections.
///
/// The operation's root selection set is depth 1. Scalar and introspection fields
/// add nothing, a field with a nested selection adds a level, inline fragments
/// stay at the level they appear on and a named fragment spread counts as one
/// level below it.
pub struct DepthAnalyzer<'a> {
    classifier: &'a dyn FieldClassifier,
}

impl<'a> DepthAnalyzer<'a> {
    pub fn new(classifier: &'a dyn FieldClassifier) -> Self {
        Self { classifier }
    }

    /// Deepest operation in the document; 0 for a document without operations.
    pub fn depth(&self, document: &Document) -> usize {
        document
            .operations()
            .map(|op| self.selection_set_depth(&op.selection_set, 1))
            .max()
            .unwrap_or(0)
    }

    fn selection_set_depth(&self, selection_set: &SelectionSet, current: usize) -> usize {
        let mut deepest = current;

        for selection in &selection_set.items {
            let depth = match selection {
                Selection::Field(field) => {
                    match self.classifier.classify(&field.name) {
                        FieldKind::Introspection | FieldKind::Scalar => continue,
                        FieldKind::List | FieldKind::Object => {}
                    }
                    match &field.selection_set {
                        Some(nested) => self.selection_set_depth(nested, current + 1),
                        None => continue,
                    }
                }
                Selection::InlineFragment(fragment) => {
                    self.selection_set_depth(&fragment.selection_set, current)
                }
                Selection::FragmentSpread(_) => current + 1,
            };
            deepest = deepest.max(depth);
        }

        deepest
    }
}

/// Measure a document with the default name heuristics.
pub fn depth(document: &Document) -> usize {
    let classifier = NameHeuristics::default();
    DepthAnalyzer::new(&classifier).depth(document)
}
