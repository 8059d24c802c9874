//! Output formatting for analysis results.

use clap::ValueEnum;
use comfy_table::{Cell, Table};

use crate::commands::Analysis;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Text,
    /// JSON object
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

pub fn format_analysis(analysis: &Analysis, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(analysis)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&analysis_json(analysis))?),
    }
}

fn format_text(analysis: &Analysis) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Measure", "Value", "Limit"]);
    table.add_row(vec![
        Cell::new("depth"),
        Cell::new(analysis.report.depth),
        Cell::new(analysis.max_depth),
    ]);
    table.add_row(vec![
        Cell::new("complexity"),
        Cell::new(analysis.report.complexity),
        Cell::new(analysis.max_complexity),
    ]);

    let mut verdict = Table::new();
    match &analysis.rejection {
        None => {
            verdict.add_row(vec![Cell::new("admitted")]);
        }
        Some(rejection) => {
            verdict.add_row(vec![
                Cell::new("rejected"),
                Cell::new(rejection),
            ]);
        }
    }

    format!(
        "{table}\n{verdict}\n{} operation(s) analyzed",
        analysis.operations
    )
}

fn analysis_json(analysis: &Analysis) -> serde_json::Value {
    serde_json::json!({
        "operations": analysis.operations,
        "depth": analysis.report.depth,
        "complexity": analysis.report.complexity,
        "max_depth": analysis.max_depth,
        "max_complexity": analysis.max_complexity,
        "admitted": analysis.admitted(),
        "error": analysis.rejection.as_ref().map(|e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphgate_core::{AdmissionError, AdmissionReport};

    fn analysis(rejection: Option<AdmissionError>) -> Analysis {
        Analysis {
            operations: 1,
            report: AdmissionReport {
                depth: 2,
                complexity: 200,
            },
            max_depth: 10,
            max_complexity: 10,
            rejection,
        }
    }

    #[test]
    fn test_text_output() {
        let out = format_analysis(&analysis(None), OutputFormat::Text).unwrap();
        assert!(out.contains("complexity"));
        assert!(out.contains("200"));
        assert!(out.contains("admitted"));

        let rejected = analysis(Some(AdmissionError::ComplexityExceeded { score: 200, max: 10 }));
        let out = format_analysis(&rejected, OutputFormat::Text).unwrap();
        assert!(out.contains("rejected"));
        assert!(out.contains("exceeds maximum allowed complexity 10"));
    }

    #[test]
    fn test_json_output() {
        let rejected = analysis(Some(AdmissionError::ComplexityExceeded { score: 200, max: 10 }));
        let out = format_analysis(&rejected, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["complexity"], 200);
        assert_eq!(value["admitted"], false);
        assert_eq!(
            value["error"],
            "query complexity 200 exceeds maximum allowed complexity 10"
        );

        let out = format_analysis(&analysis(None), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["error"].is_null());
    }
}
