//! Shared types for graphgate.
//!
//! This crate defines the plain data types every other graphgate crate speaks:
//!
//! # Modules
//!
//! - [`value`] - Storage-native property values and comparison-ready values
//! - [`entity`] - Read-only node and edge views
//! - [`filter`] - Boolean filter expressions parsed from `where` arguments
//! - [`order`] - Sort order arguments
//! - [`document`] - The parsed query tree
//! - [`error`] - Shared error types

pub mod document;
pub mod entity;
pub mod error;
pub mod filter;
pub mod order;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use document::{
    Definition, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment, InputValue,
    OperationDefinition, OperationKind, Selection, SelectionSet, TypeRef, VariableDefinition,
};
pub use entity::{Edge, EntityId, Node};
pub use filter::{FilterCondition, FilterExpr, FilterOp};
pub use order::{OrderBy, OrderDirection};
pub use value::{PropertyValue, Value, Variables};
