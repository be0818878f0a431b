//! AST node definitions

use crate::{Error, Result};

/// One or more alternative queries produced by partial evaluation.
///
/// An empty set means the query can never be satisfied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySet {
    queries: Vec<Query>,
}

impl QuerySet {
    /// Create a query set
    pub fn new(queries: Vec<Query>) -> Self {
        Self { queries }
    }

    /// The alternative queries, in compiler order
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// Check if no query can be satisfied
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Number of alternative queries
    pub fn len(&self) -> usize {
        self.queries.len()
    }
}

/// A conjunction of expressions that must all hold
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    exprs: Vec<Expr>,
}

impl Query {
    /// Create a query
    pub fn new(exprs: Vec<Expr>) -> Self {
        Self { exprs }
    }

    /// The expressions of this query
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// Check if the query has no expressions
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// A single statement in a query.
///
/// The shape is decided once, when the expression is built: either an
/// operator applied to operands, or one bare term.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Operator applied to operands (e.g., `gt(x, 5)`)
    Call { operator: Term, operands: Vec<Term> },

    /// A bare term evaluated for truthiness
    Term(Term),
}

impl Expr {
    /// Create a call expression
    pub fn call(operator: Term, operands: Vec<Term>) -> Self {
        Self::Call { operator, operands }
    }

    /// Create a bare term expression
    pub fn term(term: Term) -> Self {
        Self::Term(term)
    }

    /// Check if this is an operator call
    pub fn is_call(&self) -> bool {
        matches!(self, Expr::Call { .. })
    }

    /// The bare term, if this is not a call
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Expr::Call { .. } => None,
            Expr::Term(term) => Some(term),
        }
    }

    /// The operator of a call expression
    pub fn operator(&self) -> Result<&Term> {
        match self {
            Expr::Call { operator, .. } => Ok(operator),
            Expr::Term(_) => Err(Error::InvalidAccess("operator of a non-call expression")),
        }
    }

    /// The operands of a call expression
    pub fn operands(&self) -> Result<&[Term]> {
        match self {
            Expr::Call { operands, .. } => Ok(operands),
            Expr::Term(_) => Err(Error::InvalidAccess("operands of a non-call expression")),
        }
    }

    /// Dotted name of the operator (e.g., `internal.member_2`)
    pub fn operator_path(&self) -> Result<String> {
        operator_path(self.operator()?)
    }
}

/// A tagged wrapper around exactly one value
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    value: Value,
}

impl Term {
    /// Create a term
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The wrapped value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Check if the wrapped value is a comprehension
    pub fn is_comprehension(&self) -> bool {
        self.value.is_comprehension()
    }

    /// Create a scalar term
    pub fn scalar(scalar: Scalar) -> Self {
        Self::new(Value::Scalar(scalar))
    }

    /// Create a variable term
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(Value::Var(Var::new(name)))
    }

    /// Create a reference term
    pub fn reference(base: Term, indices: Vec<Term>) -> Self {
        Self::new(Value::Ref(Ref::new(base, indices)))
    }

    /// Create a reference term from a dotted path, every segment a variable
    pub fn ref_path(path: &str) -> Self {
        let mut segments = path.split('.').map(Term::var);
        // `split` always yields at least one segment.
        let base = segments.next().unwrap_or_else(|| Term::var(path));
        Self::reference(base, segments.collect())
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<Scalar> for Term {
    fn from(scalar: Scalar) -> Self {
        Self::scalar(scalar)
    }
}

/// The closed set of term values
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Var(Var),
    Ref(Ref),
    Array(Array),
    Set(Set),
    Object(Object),
    Call(Call),
    ArrayComprehension(ArrayComprehension),
    SetComprehension(SetComprehension),
    ObjectComprehension(ObjectComprehension),
}

impl Value {
    /// Check if this is one of the comprehension kinds
    pub fn is_comprehension(&self) -> bool {
        matches!(
            self,
            Value::ArrayComprehension(_) | Value::SetComprehension(_) | Value::ObjectComprehension(_)
        )
    }

    /// The wire discriminator for this value
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(scalar) => scalar.kind(),
            Value::Var(_) => "var",
            Value::Ref(_) => "ref",
            Value::Array(_) => "array",
            Value::Set(_) => "set",
            Value::Object(_) => "object",
            Value::Call(_) => "call",
            Value::ArrayComprehension(_) => "arraycomprehension",
            Value::SetComprehension(_) => "setcomprehension",
            Value::ObjectComprehension(_) => "objectcomprehension",
        }
    }
}

/// The four literal kinds a scalar can hold
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// A JSON number, kept in its original precision
    Number(serde_json::Number),
    /// A string
    String(String),
}

/// A null, boolean, number or string literal.
///
/// The literal is carried through as-is and never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar(Literal);

impl Scalar {
    /// The null literal
    pub fn null() -> Self {
        Self(Literal::Null)
    }

    /// A boolean literal
    pub fn boolean(b: bool) -> Self {
        Self(Literal::Boolean(b))
    }

    /// A number literal
    pub fn number(n: impl Into<serde_json::Number>) -> Self {
        Self(Literal::Number(n.into()))
    }

    /// A string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self(Literal::String(s.into()))
    }

    /// Wrap a JSON literal; arrays and objects are not scalars
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        let literal = match value {
            serde_json::Value::Null => Literal::Null,
            serde_json::Value::Bool(b) => Literal::Boolean(b),
            serde_json::Value::Number(n) => Literal::Number(n),
            serde_json::Value::String(s) => Literal::String(s),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => return None,
        };
        Some(Self(literal))
    }

    /// The literal
    pub fn literal(&self) -> &Literal {
        &self.0
    }

    /// The literal as JSON
    pub fn to_json(&self) -> serde_json::Value {
        match &self.0 {
            Literal::Null => serde_json::Value::Null,
            Literal::Boolean(b) => serde_json::Value::Bool(*b),
            Literal::Number(n) => serde_json::Value::Number(n.clone()),
            Literal::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// The string contents, if this is a string literal
    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// The wire discriminator for this literal
    pub fn kind(&self) -> &'static str {
        match self.0 {
            Literal::Null => "null",
            Literal::Boolean(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
        }
    }
}

/// A named variable reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var {
    name: String,
}

impl Var {
    /// Create a variable
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The variable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A base term followed by zero or more index terms (e.g., `input.user[0]`)
#[derive(Debug, Clone, PartialEq)]
pub struct Ref {
    terms: Vec<Term>,
}

impl Ref {
    /// Create a reference
    pub fn new(base: Term, indices: Vec<Term>) -> Self {
        let mut terms = Vec::with_capacity(indices.len() + 1);
        terms.push(base);
        terms.extend(indices);
        Self { terms }
    }

    /// All terms, base first
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The base term
    pub fn base(&self) -> &Term {
        &self.terms[0]
    }

    /// The index terms after the base
    pub fn indices(&self) -> &[Term] {
        &self.terms[1..]
    }

    /// Term at position `idx` (0 is the base)
    pub fn operand(&self, idx: usize) -> Option<&Term> {
        self.terms.get(idx)
    }
}

/// An ordered literal collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    terms: Vec<Term>,
}

impl Array {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

/// An unordered literal collection; duplicates are kept as given
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Set {
    terms: Vec<Term>,
}

impl Set {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

/// A key/value literal collection; keys need not be unique
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    pairs: Vec<(Term, Term)>,
}

impl Object {
    pub fn new(pairs: Vec<(Term, Term)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(Term, Term)] {
        &self.pairs
    }
}

/// An operator applied to operands, used as a value
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    terms: Vec<Term>,
}

impl Call {
    /// Create a call
    pub fn new(operator: Term, operands: Vec<Term>) -> Self {
        let mut terms = Vec::with_capacity(operands.len() + 1);
        terms.push(operator);
        terms.extend(operands);
        Self { terms }
    }

    /// All terms, operator first
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn operator(&self) -> &Term {
        &self.terms[0]
    }

    pub fn operands(&self) -> &[Term] {
        &self.terms[1..]
    }

    /// Dotted name of the operator
    pub fn operator_path(&self) -> Result<String> {
        operator_path(self.operator())
    }
}

/// `[term | body]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayComprehension {
    term: Box<Term>,
    body: Query,
}

impl ArrayComprehension {
    pub fn new(term: Term, body: Query) -> Self {
        Self { term: Box::new(term), body }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn body(&self) -> &Query {
        &self.body
    }
}

/// `{term | body}`
#[derive(Debug, Clone, PartialEq)]
pub struct SetComprehension {
    term: Box<Term>,
    body: Query,
}

impl SetComprehension {
    pub fn new(term: Term, body: Query) -> Self {
        Self { term: Box::new(term), body }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn body(&self) -> &Query {
        &self.body
    }
}

/// `{key:value | body}`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectComprehension {
    key: Box<Term>,
    value: Box<Term>,
    body: Query,
}

impl ObjectComprehension {
    pub fn new(key: Term, value: Term, body: Query) -> Self {
        Self {
            key: Box::new(key),
            value: Box::new(value),
            body,
        }
    }

    pub fn key(&self) -> &Term {
        &self.key
    }

    pub fn value(&self) -> &Term {
        &self.value
    }

    pub fn body(&self) -> &Query {
        &self.body
    }
}

/// Join the names along an operator's ref chain with `.`.
///
/// The base must be a variable; later segments may be variables or string
/// literals, which is how the compiler encodes dotted builtin names.
fn operator_path(operator: &Term) -> Result<String> {
    let reference = match operator.value() {
        Value::Ref(r) => r,
        other => {
            return Err(Error::OperatorPathError(format!(
                "operator is a {}, not a ref",
                other.kind()
            )))
        }
    };

    let mut segments = Vec::with_capacity(reference.terms().len());
    for (idx, term) in reference.terms().iter().enumerate() {
        match term.value() {
            Value::Var(var) => segments.push(var.name()),
            Value::Scalar(scalar) if idx > 0 => match scalar.as_str() {
                Some(s) => segments.push(s),
                None => {
                    return Err(Error::OperatorPathError(format!(
                        "segment {} is a {} literal",
                        idx,
                        scalar.kind()
                    )))
                }
            },
            other => {
                return Err(Error::OperatorPathError(format!(
                    "segment {} is a {}",
                    idx,
                    other.kind()
                )))
            }
        }
    }

    Ok(segments.join("."))
}
