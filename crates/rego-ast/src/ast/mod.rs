//! Abstract Syntax Tree (AST) for partially evaluated queries
//!
//! The AST is built once from the compiler's JSON and never mutated.

pub mod encode;
pub mod nodes;
pub mod visitor;

pub use nodes::{
    Array, ArrayComprehension, Call, Expr, Literal, Object, ObjectComprehension, Query, QuerySet,
    Ref, Scalar, Set, SetComprehension, Term, Value, Var,
};
pub use visitor::{walk, Node, Visitor};
