//! graphgate core - admission control and resolution for graph queries.
//!
//! A request passes through two stages:
//!
//! 1. **Admission** ([`analysis`]): the parsed document is measured for nesting
//!    depth and estimated cost and rejected before any resolver runs when either
//!    exceeds its configured limit.
//! 2. **Resolution** ([`resolve`]): list fields run fetch, filter, sort, offset and
//!    limit over entities from a [`GraphStore`], and relationship fields go through
//!    per-request batching [`Loader`]s.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use graphgate_core::{Gateway, GatewayConfig, MemoryStore};
//! use graphgate_core::proto::{Document, Field, InputValue, SelectionSet, Variables};
//!
//! let gateway = Gateway::build(Arc::new(MemoryStore::new()), GatewayConfig::new()).unwrap();
//!
//! // { persons(limit: 5) { id } }
//! let document = Document::query(SelectionSet::new(vec![Field::new("persons")
//!     .with_argument("limit", InputValue::Int(5))
//!     .with_selection(vec![Field::new("id").into()])
//!     .into()]));
//!
//! let report = gateway.admit(&document, &Variables::new()).unwrap();
//! assert_eq!(report.complexity, 5);
//! assert_eq!(report.depth, 2);
//! ```

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod loader;
pub mod pagination;
pub mod resolve;
pub mod sort;
pub mod storage;

pub use aggregate::{EdgeAggregate, NodeAggregate, NumericStats};
pub use analysis::{
    AdmissionController, AdmissionReport, ComplexityAnalyzer, DepthAnalyzer, FieldClassifier,
    FieldKind, NameHeuristics,
};
pub use config::{ComplexityConfig, GatewayConfig, LimitConfig, LoaderConfig};
pub use entity::Entity;
pub use error::{AdmissionError, ConfigError, Error, LoadError, PaginationError, StorageError};
pub use filter::{filter_entities, FilterEvaluator};
pub use gateway::Gateway;
pub use loader::{BatchFn, LoadResult, Loader, LoaderStats, RequestLoaders};
pub use pagination::{
    connection, paginate, Connection, ConnectionArgs, ConnectionEdge, CursorCodec, OffsetCursor,
    PageInfo,
};
pub use resolve::{resolve_list, ListArgs, QueryResolver};
pub use sort::{compare_values, sort_entities};
pub use storage::{GraphStore, MemoryStore};

/// Re-export shared types.
pub use graphgate_proto as proto;
