//! Decoder from the compiler's JSON into the typed AST

use crate::ast::nodes::{
    Array, ArrayComprehension, Call, Expr, Object, ObjectComprehension, Query, QuerySet, Ref,
    Scalar, Set, SetComprehension, Term, Value, Var,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::fmt;
use std::str::FromStr;

/// Default limit on JSON nesting, in path segments
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Deepest path (in array indices and object fields) a fragment may sit at
    pub max_depth: usize,
}

impl DecodeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// Term constructors, selected by the `type` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermKind {
    Null,
    Boolean,
    Number,
    String,
    Var,
    Ref,
    Array,
    Set,
    Object,
    Call,
    ArrayComprehension,
    SetComprehension,
    ObjectComprehension,
}

const TERM_KINDS: [(&str, TermKind); 13] = [
    ("null", TermKind::Null),
    ("boolean", TermKind::Boolean),
    ("number", TermKind::Number),
    ("string", TermKind::String),
    ("var", TermKind::Var),
    ("ref", TermKind::Ref),
    ("array", TermKind::Array),
    ("set", TermKind::Set),
    ("object", TermKind::Object),
    ("call", TermKind::Call),
    ("arraycomprehension", TermKind::ArrayComprehension),
    ("setcomprehension", TermKind::SetComprehension),
    ("objectcomprehension", TermKind::ObjectComprehension),
];

impl TermKind {
    fn lookup(tag: &str) -> Option<Self> {
        TERM_KINDS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, kind)| *kind)
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment<'p> {
    Root,
    Index(usize),
    Field(&'p str),
}

/// Position of a fragment in the input, kept as a parent-linked chain and
/// only formatted when an error needs it
#[derive(Debug, Clone, Copy)]
struct Location<'p> {
    parent: Option<&'p Location<'p>>,
    segment: Segment<'p>,
    depth: usize,
}

impl<'p> Location<'p> {
    fn root() -> Self {
        Self {
            parent: None,
            segment: Segment::Root,
            depth: 0,
        }
    }

    fn index(&'p self, idx: usize) -> Location<'p> {
        self.child(Segment::Index(idx))
    }

    fn field(&'p self, name: &'p str) -> Location<'p> {
        self.child(Segment::Field(name))
    }

    fn child(&'p self, segment: Segment<'p>) -> Location<'p> {
        Location {
            parent: Some(self),
            segment,
            depth: self.depth + 1,
        }
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            write!(f, "{}", parent)?;
        }
        match self.segment {
            Segment::Root => write!(f, "$"),
            Segment::Index(idx) => write!(f, "[{}]", idx),
            Segment::Field(name) => write!(f, ".{}", name),
        }
    }
}

fn malformed(loc: &Location<'_>, expected: &'static str) -> Error {
    Error::MalformedInput {
        path: loc.to_string(),
        expected,
    }
}

fn as_object<'j>(
    json: &'j Json,
    loc: &Location<'_>,
    expected: &'static str,
) -> Result<&'j Map<String, Json>> {
    json.as_object().ok_or_else(|| malformed(loc, expected))
}

fn as_array<'j>(json: &'j Json, loc: &Location<'_>, expected: &'static str) -> Result<&'j [Json]> {
    json.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(loc, expected))
}

fn get<'j>(
    object: &'j Map<String, Json>,
    name: &'static str,
    loc: &Location<'_>,
    expected: &'static str,
) -> Result<&'j Json> {
    object
        .get(name)
        .ok_or_else(|| malformed(&loc.field(name), expected))
}

/// Decodes JSON fragments into AST nodes.
///
/// Decoding is all-or-nothing: the first bad fragment aborts the whole
/// conversion.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Create a decoder
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// The decoder's options
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode a top-level array of queries
    pub fn query_set(&self, json: &Json) -> Result<QuerySet> {
        let result = self.decode_query_set(json, &Location::root());
        log_outcome(&result);
        result
    }

    /// Decode a compile API response.
    ///
    /// Accepts `{"queries": [...]}` or the full `{"result": {"queries": [...]}}`
    /// envelope. A result without queries is an empty set.
    pub fn compile_response(&self, json: &Json) -> Result<QuerySet> {
        let root = Location::root();
        let result = self.decode_compile_response(json, &root);
        log_outcome(&result);
        result
    }

    /// Decode one query fragment
    pub fn query(&self, json: &Json) -> Result<Query> {
        self.decode_query(json, &Location::root())
    }

    /// Decode one expression fragment
    pub fn expr(&self, json: &Json) -> Result<Expr> {
        self.decode_expr(json, &Location::root())
    }

    /// Decode one term fragment
    pub fn term(&self, json: &Json) -> Result<Term> {
        self.decode_term(json, &Location::root())
    }

    fn enter(&self, loc: &Location<'_>) -> Result<()> {
        if loc.depth > self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: loc.to_string(),
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn decode_compile_response(&self, json: &Json, loc: &Location<'_>) -> Result<QuerySet> {
        let object = as_object(json, loc, "compile response object")?;

        if let Some(queries) = object.get("queries") {
            return self.decode_query_set(queries, &loc.field("queries"));
        }

        let result_loc = loc.field("result");
        let result = get(object, "result", loc, "queries or result field")?;
        let result = as_object(result, &result_loc, "result object")?;
        match result.get("queries") {
            Some(queries) => self.decode_query_set(queries, &result_loc.field("queries")),
            None => Ok(QuerySet::default()),
        }
    }

    fn decode_query_set(&self, json: &Json, loc: &Location<'_>) -> Result<QuerySet> {
        self.enter(loc)?;
        let items = as_array(json, loc, "array of queries")?;
        let queries = items
            .iter()
            .enumerate()
            .map(|(idx, item)| self.decode_query(item, &loc.index(idx)))
            .collect::<Result<Vec<_>>>()?;
        Ok(QuerySet::new(queries))
    }

    fn decode_query(&self, json: &Json, loc: &Location<'_>) -> Result<Query> {
        self.enter(loc)?;
        let items = as_array(json, loc, "array of expressions")?;
        let exprs = items
            .iter()
            .enumerate()
            .map(|(idx, item)| self.decode_expr(item, &loc.index(idx)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Query::new(exprs))
    }

    fn decode_expr(&self, json: &Json, loc: &Location<'_>) -> Result<Expr> {
        self.enter(loc)?;
        let object = as_object(json, loc, "expression object")?;
        let terms_loc = loc.field("terms");
        let terms = get(object, "terms", loc, "terms field")?;

        match terms {
            Json::Object(_) => Ok(Expr::term(self.decode_term(terms, &terms_loc)?)),
            Json::Array(_) => {
                let (operator, operands) = self.decode_non_empty_terms(terms, &terms_loc)?;
                Ok(Expr::call(operator, operands))
            }
            _ => Err(malformed(&terms_loc, "term object or array of terms")),
        }
    }

    fn decode_term(&self, json: &Json, loc: &Location<'_>) -> Result<Term> {
        self.enter(loc)?;
        let object = as_object(json, loc, "term object")?;
        let tag = get(object, "type", loc, "type discriminator")?
            .as_str()
            .ok_or_else(|| malformed(&loc.field("type"), "string discriminator"))?;
        let kind = TermKind::lookup(tag).ok_or_else(|| Error::UnknownNodeKind(tag.to_string()))?;
        tracing::trace!(kind = tag, path = %loc, "decoding term");

        let value_loc = loc.field("value");
        let payload = || get(object, "value", loc, "value payload");

        let value = match kind {
            // The compiler may omit the payload of a null literal.
            TermKind::Null => match object.get("value") {
                None | Some(Json::Null) => Value::Scalar(Scalar::null()),
                Some(_) => return Err(malformed(&value_loc, "null literal")),
            },
            TermKind::Boolean => match payload()? {
                Json::Bool(b) => Value::Scalar(Scalar::boolean(*b)),
                _ => return Err(malformed(&value_loc, "boolean literal")),
            },
            TermKind::Number => match payload()? {
                Json::Number(n) => Value::Scalar(Scalar::number(n.clone())),
                _ => return Err(malformed(&value_loc, "number literal")),
            },
            TermKind::String => match payload()? {
                Json::String(s) => Value::Scalar(Scalar::string(s.as_str())),
                _ => return Err(malformed(&value_loc, "string literal")),
            },
            TermKind::Var => match payload()? {
                Json::String(name) => Value::Var(Var::new(name.as_str())),
                _ => return Err(malformed(&value_loc, "variable name")),
            },
            TermKind::Ref => {
                let (base, indices) = self.decode_non_empty_terms(payload()?, &value_loc)?;
                Value::Ref(Ref::new(base, indices))
            }
            TermKind::Array => Value::Array(Array::new(self.decode_terms(payload()?, &value_loc)?)),
            TermKind::Set => Value::Set(Set::new(self.decode_terms(payload()?, &value_loc)?)),
            TermKind::Object => Value::Object(self.decode_object(payload()?, &value_loc)?),
            TermKind::Call => {
                let (operator, operands) = self.decode_non_empty_terms(payload()?, &value_loc)?;
                Value::Call(Call::new(operator, operands))
            }
            TermKind::ArrayComprehension => {
                let comp = as_object(payload()?, &value_loc, "comprehension object")?;
                Value::ArrayComprehension(ArrayComprehension::new(
                    self.decode_named_term(comp, "term", &value_loc)?,
                    self.decode_body(comp, &value_loc)?,
                ))
            }
            TermKind::SetComprehension => {
                let comp = as_object(payload()?, &value_loc, "comprehension object")?;
                Value::SetComprehension(SetComprehension::new(
                    self.decode_named_term(comp, "term", &value_loc)?,
                    self.decode_body(comp, &value_loc)?,
                ))
            }
            TermKind::ObjectComprehension => {
                let comp = as_object(payload()?, &value_loc, "comprehension object")?;
                Value::ObjectComprehension(ObjectComprehension::new(
                    self.decode_named_term(comp, "key", &value_loc)?,
                    self.decode_named_term(comp, "value", &value_loc)?,
                    self.decode_body(comp, &value_loc)?,
                ))
            }
        };

        Ok(Term::new(value))
    }

    fn decode_terms(&self, json: &Json, loc: &Location<'_>) -> Result<Vec<Term>> {
        let items = as_array(json, loc, "array of terms")?;
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| self.decode_term(item, &loc.index(idx)))
            .collect()
    }

    fn decode_non_empty_terms(&self, json: &Json, loc: &Location<'_>) -> Result<(Term, Vec<Term>)> {
        let mut terms = self.decode_terms(json, loc)?;
        if terms.is_empty() {
            return Err(malformed(loc, "non-empty array of terms"));
        }
        let first = terms.remove(0);
        Ok((first, terms))
    }

    fn decode_object(&self, json: &Json, loc: &Location<'_>) -> Result<Object> {
        let items = as_array(json, loc, "array of key/value pairs")?;
        let mut pairs = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let pair_loc = loc.index(idx);
            match as_array(item, &pair_loc, "[key, value] pair")? {
                [key, value] => pairs.push((
                    self.decode_term(key, &pair_loc.index(0))?,
                    self.decode_term(value, &pair_loc.index(1))?,
                )),
                _ => return Err(malformed(&pair_loc, "[key, value] pair")),
            }
        }
        Ok(Object::new(pairs))
    }

    fn decode_named_term(
        &self,
        object: &Map<String, Json>,
        name: &'static str,
        loc: &Location<'_>,
    ) -> Result<Term> {
        let json = get(object, name, loc, "term object")?;
        self.decode_term(json, &loc.field(name))
    }

    fn decode_body(&self, object: &Map<String, Json>, loc: &Location<'_>) -> Result<Query> {
        let json = get(object, "body", loc, "body query")?;
        self.decode_query(json, &loc.field("body"))
    }
}

fn log_outcome(result: &Result<QuerySet>) {
    match result {
        Ok(qs) => tracing::debug!(queries = qs.len(), "decoded query set"),
        Err(e) => tracing::debug!(error = %e, "failed to decode query set"),
    }
}

/// Parse JSON text holding either a compile response or a bare query array
pub fn parse_str(text: &str) -> Result<QuerySet> {
    let json: Json = serde_json::from_str(text)?;
    let decoder = Decoder::default();
    match json {
        Json::Array(_) => decoder.query_set(&json),
        _ => decoder.compile_response(&json),
    }
}

impl QuerySet {
    /// Decode a top-level array of queries with default options
    pub fn from_json(json: &Json) -> Result<Self> {
        Decoder::default().query_set(json)
    }

    /// Decode a compile API response with default options
    pub fn from_compile_response(json: &Json) -> Result<Self> {
        Decoder::default().compile_response(json)
    }
}

impl FromStr for QuerySet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_str(s)
    }
}

impl Query {
    /// Decode a query fragment with default options
    pub fn from_json(json: &Json) -> Result<Self> {
        Decoder::default().query(json)
    }
}

impl Expr {
    /// Decode an expression fragment with default options
    pub fn from_json(json: &Json) -> Result<Self> {
        Decoder::default().expr(json)
    }
}

impl Term {
    /// Decode a term fragment with default options
    pub fn from_json(json: &Json) -> Result<Self> {
        Decoder::default().term(json)
    }
}
