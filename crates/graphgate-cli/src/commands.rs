//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::Context;

use graphgate_core::{AdmissionController, AdmissionError, AdmissionReport, GatewayConfig};
use graphgate_lang::parse_query;
use graphgate_proto::{Document, Variables};

use crate::AnalyzeArgs;

/// Outcome of analyzing one query document.
#[derive(Debug)]
pub struct Analysis {
    pub operations: usize,
    /// Measured values, reported even when the query is rejected.
    pub report: AdmissionReport,
    pub max_depth: usize,
    pub max_complexity: u64,
    pub rejection: Option<AdmissionError>,
}

impl Analysis {
    pub fn admitted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Load a configuration file, or the defaults, and validate it.
pub fn effective_config(path: Option<&Path>) -> anyhow::Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => GatewayConfig::from_json_file(path)?,
        None => GatewayConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Read variable values from a JSON object file.
pub fn read_variables(path: &Path) -> anyhow::Result<Variables> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read variables from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("variables in {} must be a JSON object", path.display()))
}

pub fn analyze(args: &AnalyzeArgs) -> anyhow::Result<Analysis> {
    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_json_file(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if let Some(max_complexity) = args.max_complexity {
        config = config.with_max_complexity(max_complexity);
    }
    config.validate()?;

    let source = fs::read_to_string(&args.query_file)
        .with_context(|| format!("failed to read query from {}", args.query_file.display()))?;
    let document = parse_query(&source)
        .map_err(|e| anyhow::anyhow!("{}", e.format_with_source(&source)))?;

    let variables = match &args.variables {
        Some(path) => read_variables(path)?,
        None => Variables::new(),
    };

    analyze_document(&document, &variables, &config)
}

/// Measure a parsed document and run it through admission control.
pub fn analyze_document(
    document: &Document,
    variables: &Variables,
    config: &GatewayConfig,
) -> anyhow::Result<Analysis> {
    let controller = AdmissionController::new(config.complexity.clone(), config.max_depth)?;
    let variables = document.variables_with_defaults(variables);

    let report = controller.measure(document, &variables);
    let rejection = controller.check(document, &variables).err();
    tracing::debug!(
        depth = report.depth,
        complexity = report.complexity,
        admitted = rejection.is_none(),
        "analyzed query"
    );

    Ok(Analysis {
        operations: document.operations().count(),
        report,
        max_depth: controller.max_depth(),
        max_complexity: controller.complexity_config().max_complexity,
        rejection,
    })
}
