//! Serialization back to the compiler's JSON encoding
//!
//! The output has the shape the decoder accepts, so trees can be logged or
//! sent back to the compiler unchanged.

use super::nodes::{Expr, Query, QuerySet, Term, Value};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::iter;

impl Serialize for QuerySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.queries())
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.exprs())
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Expr::Call { operator, operands } => {
                map.serialize_entry("terms", &CallTerms { operator, operands })?
            }
            Expr::Term(term) => map.serialize_entry("terms", term)?,
        }
        map.end()
    }
}

/// Operator and operands of a call expression as one array
struct CallTerms<'a> {
    operator: &'a Term,
    operands: &'a [Term],
}

impl Serialize for CallTerms<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(iter::once(self.operator).chain(self.operands))
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.value().kind())?;
        map.serialize_entry("value", &Payload(self.value()))?;
        map.end()
    }
}

/// The `value` field of a term
struct Payload<'a>(&'a Value);

impl Serialize for Payload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Scalar(scalar) => scalar.to_json().serialize(serializer),
            Value::Var(var) => serializer.serialize_str(var.name()),
            Value::Ref(r) => serializer.collect_seq(r.terms()),
            Value::Array(array) => serializer.collect_seq(array.terms()),
            Value::Set(set) => serializer.collect_seq(set.terms()),
            Value::Object(object) => serializer.collect_seq(object.pairs()),
            Value::Call(call) => serializer.collect_seq(call.terms()),
            Value::ArrayComprehension(comp) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("term", comp.term())?;
                map.serialize_entry("body", comp.body())?;
                map.end()
            }
            Value::SetComprehension(comp) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("term", comp.term())?;
                map.serialize_entry("body", comp.body())?;
                map.end()
            }
            Value::ObjectComprehension(comp) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("key", comp.key())?;
                map.serialize_entry("value", comp.value())?;
                map.serialize_entry("body", comp.body())?;
                map.end()
            }
        }
    }
}
