//! Gateway assembly.

use std::sync::Arc;

use graphgate_proto::{Document, Variables};

use crate::analysis::{AdmissionController, AdmissionReport, FieldClassifier};
use crate::config::GatewayConfig;
use crate::error::{AdmissionError, ConfigError};
use crate::loader::RequestLoaders;
use crate::resolve::QueryResolver;
use crate::storage::GraphStore;

/// Admission control and resolution over one store.
///
/// The configuration is validated once, when the gateway is built. Afterwards
/// each request is admitted, gets its own [`RequestLoaders`], and resolves
/// through the shared [`QueryResolver`].
#[derive(Debug, Clone)]
pub struct Gateway {
    config: GatewayConfig,
    admission: AdmissionController,
    resolver: QueryResolver,
}

impl Gateway {
    pub fn build(store: Arc<dyn GraphStore>, mut config: GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let admission =
            AdmissionController::from_validated(config.complexity.clone(), config.max_depth);
        let resolver = QueryResolver::new(store, config.limits);

        tracing::info!(
            max_complexity = config.complexity.max_complexity,
            max_depth = config.max_depth,
            default_limit = config.limits.default_limit,
            max_limit = config.limits.max_limit,
            "gateway configured"
        );

        Ok(Self {
            config,
            admission,
            resolver,
        })
    }

    /// Replace the field classifier used by admission control.
    pub fn with_classifier(mut self, classifier: Arc<dyn FieldClassifier>) -> Self {
        self.admission = self.admission.with_classifier(classifier);
        self
    }

    /// Admit or reject a parsed request.
    ///
    /// Variable defaults declared by the document apply where the request
    /// supplies no value.
    pub fn admit(
        &self,
        document: &Document,
        variables: &Variables,
    ) -> Result<AdmissionReport, AdmissionError> {
        let variables = document.variables_with_defaults(variables);
        self.admission.check(document, &variables)
    }

    /// Fresh loaders for one request.
    ///
    /// Must be called within a tokio runtime.
    pub fn request_loaders(&self) -> RequestLoaders {
        RequestLoaders::new(Arc::clone(self.resolver.store()), self.config.loader)
    }

    pub fn resolver(&self) -> &QueryResolver {
        &self.resolver
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
