//! Parse and admission benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graphgate_core::analysis::{depth, score};
use graphgate_core::proto::Variables;
use graphgate_core::{AdmissionController, ComplexityConfig};

const FLAT: &str = "{ persons(limit: 10) { id labels properties } }";

const NESTED: &str = r#"
query Network($n: Int = 25) {
  persons(first: $n, where: { age: { gte: 18 } }) {
    id
    outgoingEdges(limit: 5) {
      weight
      ...EdgeFields
    }
    incomingEdges {
      ... on GraphEdge { id type }
    }
  }
}

fragment EdgeFields on GraphEdge {
  fromNodeId
  toNodeId
}
"#;

fn nested_query(levels: usize) -> String {
    let mut query = String::from("id");
    for _ in 0..levels {
        query = format!("persons(limit: 2) {{ id {query} }}");
    }
    format!("{{ {query} }}")
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let config = ComplexityConfig::default();
    let vars = Variables::new();

    for (name, source) in [("flat", FLAT), ("nested", NESTED)] {
        let document = graphgate_lang::parse_query(source).unwrap();

        group.bench_function(BenchmarkId::new("parse", name), |b| {
            b.iter(|| black_box(graphgate_lang::parse_query(source).unwrap()));
        });
        group.bench_function(BenchmarkId::new("complexity", name), |b| {
            b.iter(|| black_box(score(&document, &config, &vars)));
        });
        group.bench_function(BenchmarkId::new("depth", name), |b| {
            b.iter(|| black_box(depth(&document)));
        });
    }

    group.finish();
}

fn bench_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission");
    let controller = AdmissionController::new(ComplexityConfig::new(u64::MAX), 64).unwrap();
    let vars = Variables::new();

    for levels in [4usize, 16, 48] {
        let document = graphgate_lang::parse_query(&nested_query(levels)).unwrap();
        group.bench_with_input(BenchmarkId::new("check", levels), &document, |b, document| {
            b.iter(|| black_box(controller.check(document, &vars).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_admission);
criterion_main!(benches);
