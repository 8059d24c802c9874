//! Query document parser for graphgate.
//!
//! Turns query text into the [`graphgate_proto::Document`] tree that the
//! admission analyzers and resolvers work on.
//!
//! # Syntax
//!
//! ```text
//! { persons(limit: 5) { id properties } }
//!
//! query People($n: Int = 10) {
//!     persons(first: $n, where: { age: { gt: 30 } }) {
//!         ...PersonFields
//!         outgoingEdges { type weight }
//!     }
//! }
//!
//! fragment PersonFields on Person { labels properties }
//! ```
//!
//! Directives are accepted and discarded. Commas and `#` comments are ignored.
//!
//! # Usage
//!
//! ```rust
//! use graphgate_lang::parse_query;
//!
//! let doc = parse_query("{ persons { id } }").unwrap();
//! assert_eq!(doc.operations().count(), 1);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

pub use error::ParseError;
pub use span::{Span, Spanned};

use graphgate_proto::Document;

/// Parse query text into a document.
pub fn parse_query(source: &str) -> Result<Document, ParseError> {
    parser::parse(source)
}

/// Tokenize a source string (for debugging/testing).
pub fn tokenize(source: &str) -> Vec<lexer::SpannedToken> {
    lexer::tokenize(source)
}
