//! Typed ASTs for partially evaluated Rego queries.
//!
//! A policy compiler's partial-evaluation API answers with a set of residual
//! queries encoded as untyped JSON. This crate decodes that JSON into an
//! immutable tree ([`QuerySet`] down to [`Term`]), walks it with a
//! continuation-style [`Visitor`], and renders it either as an indented
//! node listing or as compact Rego-like text.
//!
//! ```
//! use rego_ast::{render, QuerySet};
//!
//! let qs: QuerySet = r#"{"queries": [[{"terms": [
//!     {"type": "ref", "value": [{"type": "var", "value": "gt"}]},
//!     {"type": "number", "value": 5},
//!     {"type": "number", "value": 3}
//! ]}]]}"#
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(qs.queries()[0].to_string(), "gt(5,3)");
//! assert!(render::structural(&qs).starts_with("QuerySet\n  Query\n    Expr\n"));
//! ```

pub mod ast;
pub mod parser;
pub mod render;

// Test utilities (available in tests and when used as a dependency with dev profile)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use ast::{
    walk, Array, ArrayComprehension, Call, Expr, Literal, Node, Object, ObjectComprehension, Query,
    QuerySet, Ref, Scalar, Set, SetComprehension, Term, Value, Var, Visitor,
};
pub use parser::{DecodeOptions, Decoder};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),

    #[error("Malformed input at {path}: expected {expected}")]
    MalformedInput { path: String, expected: &'static str },

    #[error("Nesting exceeds depth limit of {limit} at {path}")]
    DepthExceeded { path: String, limit: usize },

    #[error("Invalid access: {0}")]
    InvalidAccess(&'static str),

    #[error("Operator path error: {0}")]
    OperatorPathError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
