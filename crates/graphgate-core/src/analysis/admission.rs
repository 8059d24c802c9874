//! Admission control: the depth and complexity gates run before any resolver.

use std::sync::Arc;

use serde::Serialize;

use graphgate_proto::{Document, Variables};

use crate::analysis::classify::{FieldClassifier, NameHeuristics};
use crate::analysis::complexity::ComplexityAnalyzer;
use crate::analysis::depth::DepthAnalyzer;
use crate::config::ComplexityConfig;
use crate::error::{AdmissionError, ConfigError};

/// Measurements of an admitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdmissionReport {
    pub depth: usize,
    pub complexity: u64,
}

/// Rejects queries that are too deep or too expensive.
///
/// Built once from validated limits; checking a query never fails on configuration.
#[derive(Clone)]
pub struct AdmissionController {
    complexity: ComplexityConfig,
    max_depth: usize,
    classifier: Arc<dyn FieldClassifier>,
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("complexity", &self.complexity)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl AdmissionController {
    /// Validate the limits and build a controller using the name heuristics.
    pub fn new(mut complexity: ComplexityConfig, max_depth: usize) -> Result<Self, ConfigError> {
        complexity.validate()?;
        if max_depth == 0 {
            return Err(ConfigError::NonPositive { field: "max_depth" });
        }
        Ok(Self::from_validated(complexity, max_depth))
    }

    /// Build from limits that have already passed validation.
    pub(crate) fn from_validated(complexity: ComplexityConfig, max_depth: usize) -> Self {
        Self {
            complexity,
            max_depth,
            classifier: Arc::new(NameHeuristics::default()),
        }
    }

    /// Replace the field classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn FieldClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn complexity_config(&self) -> &ComplexityConfig {
        &self.complexity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Measure a document without enforcing any limit.
    pub fn measure(&self, document: &Document, variables: &Variables) -> AdmissionReport {
        AdmissionReport {
            depth: DepthAnalyzer::new(self.classifier.as_ref()).depth(document),
            complexity: ComplexityAnalyzer::new(
                &self.complexity,
                self.classifier.as_ref(),
                variables,
            )
            .score(document),
        }
    }

    /// Run the depth gate.
    pub fn check_depth(&self, document: &Document) -> Result<usize, AdmissionError> {
        let depth = DepthAnalyzer::new(self.classifier.as_ref()).depth(document);
        if depth > self.max_depth {
            tracing::warn!(depth, max_depth = self.max_depth, "query rejected: too deep");
            return Err(AdmissionError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }
        Ok(depth)
    }

    /// Run the complexity gate.
    pub fn check_complexity(
        &self,
        document: &Document,
        variables: &Variables,
    ) -> Result<u64, AdmissionError> {
        let score = ComplexityAnalyzer::new(&self.complexity, self.classifier.as_ref(), variables)
            .score(document);
        if score > self.complexity.max_complexity {
            tracing::warn!(
                score,
                max_complexity = self.complexity.max_complexity,
                "query rejected: too complex"
            );
            return Err(AdmissionError::ComplexityExceeded {
                score,
                max: self.complexity.max_complexity,
            });
        }
        Ok(score)
    }

    /// Run both gates, depth first.
    pub fn check(
        &self,
        document: &Document,
        variables: &Variables,
    ) -> Result<AdmissionReport, AdmissionError> {
        let depth = self.check_depth(document)?;
        let complexity = self.check_complexity(document, variables)?;
        tracing::debug!(depth, complexity, "query admitted");
        Ok(AdmissionReport { depth, complexity })
    }
}
