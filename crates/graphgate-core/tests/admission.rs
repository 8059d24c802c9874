//! Admission control driven from query text.

use std::sync::Arc;

use graphgate_core::analysis::{depth, score};
use graphgate_core::proto::{Value, Variables};
use graphgate_core::{AdmissionError, ComplexityConfig, Gateway, GatewayConfig, MemoryStore};
use graphgate_lang::parse_query;
use pretty_assertions::assert_eq;

fn gateway(config: GatewayConfig) -> Gateway {
    Gateway::build(Arc::new(MemoryStore::new()), config).unwrap()
}

fn admit(gateway: &Gateway, query: &str) -> Result<graphgate_core::AdmissionReport, AdmissionError> {
    let document = parse_query(query).unwrap();
    gateway.admit(&document, &Variables::new())
}

#[test]
fn test_limit_scales_cost() {
    let gw = gateway(GatewayConfig::new());
    let report = admit(&gw, "{ persons(limit: 5) { id } }").unwrap();
    assert_eq!(report.complexity, 5);
    assert_eq!(report.depth, 2);
}

#[test]
fn test_default_list_limit_rejection() {
    let gw = gateway(GatewayConfig::new().with_max_complexity(10));
    let err = admit(&gw, "{ persons { id properties } }").unwrap_err();
    assert_eq!(err, AdmissionError::ComplexityExceeded { score: 200, max: 10 });
    assert!(err.to_string().contains("complexity"));
}

#[test]
fn test_depth_limit() {
    let strict = gateway(GatewayConfig::new().with_max_depth(1));
    let err = admit(&strict, "{ persons { properties } }").unwrap_err();
    assert_eq!(err, AdmissionError::DepthExceeded { depth: 2, max: 1 });

    let relaxed = gateway(GatewayConfig::new().with_max_depth(2));
    assert!(admit(&relaxed, "{ persons { properties } }").is_ok());
}

#[test]
fn test_nested_relationships() {
    let gw = gateway(GatewayConfig::new());
    let query = r#"
        query {
            persons(limit: 10) {
                id
                outgoingEdges(limit: 5) { weight toNodeId }
            }
        }
    "#;
    let report = admit(&gw, query).unwrap();
    assert_eq!(report.complexity, 10 + 100);
    assert_eq!(report.depth, 3);
}

#[test]
fn test_variables_and_defaults() {
    let gw = gateway(GatewayConfig::new().with_max_complexity(50));
    let document = parse_query(
        "query People($n: Int = 40) { persons(first: $n) { id } }",
    )
    .unwrap();

    assert_eq!(gw.admit(&document, &Variables::new()).unwrap().complexity, 40);

    let mut vars = Variables::new();
    vars.insert("n".into(), Value::Int(60));
    assert!(matches!(
        gw.admit(&document, &vars),
        Err(AdmissionError::ComplexityExceeded { score: 60, .. })
    ));
}

#[test]
fn test_fragments_and_introspection() {
    let gw = gateway(GatewayConfig::new());
    let query = r#"
        {
            __typename
            persons(limit: 4) {
                ...PersonFields
                ... on Person { id labels }
            }
        }

        fragment PersonFields on Person {
            outgoingEdges { id }
        }
    "#;
    let report = admit(&gw, query).unwrap();
    // __typename: 1, spread: 4, inline fragment: 4 * 2
    assert_eq!(report.complexity, 13);
    // the spread counts one level below persons
    assert_eq!(report.depth, 3);
}

#[test]
fn test_multiple_operations_are_summed() {
    let gw = gateway(GatewayConfig::new());
    let query = r#"
        query A { persons(limit: 3) { id } }
        query B { edges(limit: 2) { id weight } }
    "#;
    assert_eq!(admit(&gw, query).unwrap().complexity, 3 + 4);
}

#[test]
fn test_measurement_is_repeatable() {
    let document = parse_query(
        r#"
        query($n: Int) {
            persons(first: $n) {
                id
                outgoingEdges(limit: 3) { weight }
                ... on Person { incomingEdges { id } }
            }
        }
        "#,
    )
    .unwrap();
    let snapshot = document.clone();
    let config = ComplexityConfig::default();
    let mut vars = Variables::new();
    vars.insert("n".into(), Value::Int(2));

    let first = score(&document, &config, &vars);
    assert_eq!(first, score(&document, &config, &vars));
    assert_eq!(first, 2 + 2 * 3 + 2 * 100);
    assert_eq!(depth(&document), depth(&document));
    assert_eq!(depth(&document), 3);

    let gw = gateway(GatewayConfig::new());
    assert_eq!(gw.admit(&document, &vars), gw.admit(&document, &vars));
    assert_eq!(document, snapshot);
}
