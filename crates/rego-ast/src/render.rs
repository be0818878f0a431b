//! Text renderings of the AST
//!
//! Two forms are produced:
//!
//! - *structural*: one node per line, indented two spaces per level, built
//!   on [`walk`](crate::ast::walk);
//! - *expression*: compact Rego-like text, available through `Display` on
//!   every node.

use crate::ast::nodes::{
    Array, ArrayComprehension, Call, Expr, Object, ObjectComprehension, Query, QuerySet, Ref,
    Scalar, Set, SetComprehension, Term, Value, Var,
};
use crate::ast::visitor::{walk, Node, Visitor};
use crate::Result;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

/// Render `node` and its descendants, one per line
pub fn structural<'a>(node: impl Into<Node<'a>>) -> String {
    let out = RefCell::new(String::new());
    walk(node, &Printer { indent: 0, out: &out });
    out.into_inner()
}

/// Write the structural rendering of `node` to `out`
pub fn write_structural<'a, W: Write>(node: impl Into<Node<'a>>, mut out: W) -> Result<()> {
    out.write_all(structural(node).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Print the structural rendering of `node` to stdout
pub fn pretty_print<'a>(node: impl Into<Node<'a>>) -> Result<()> {
    let stdout = io::stdout();
    write_structural(node, stdout.lock())
}

/// Render `node` in expression form
pub fn expression<'a>(node: impl Into<Node<'a>>) -> String {
    let node: Node<'a> = node.into();
    node.to_string()
}

/// Writes one line per node; each level hands its children a deeper indent
struct Printer<'o> {
    indent: usize,
    out: &'o RefCell<String>,
}

impl Visitor for Printer<'_> {
    fn visit(&self, node: Node<'_>) -> Option<Self> {
        let line = match node {
            Node::Scalar(scalar) => format!("{:indent$}Scalar {}\n", "", scalar, indent = self.indent),
            Node::Var(var) => format!("{:indent$}Var {}\n", "", var, indent = self.indent),
            other => format!("{:indent$}{}\n", "", other.kind_name(), indent = self.indent),
        };
        self.out.borrow_mut().push_str(&line);

        Some(Printer {
            indent: self.indent + 2,
            out: self.out,
        })
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Node::QuerySet(n) => fmt::Display::fmt(n, f),
            Node::Query(n) => fmt::Display::fmt(n, f),
            Node::Expr(n) => fmt::Display::fmt(n, f),
            Node::Term(n) => fmt::Display::fmt(n, f),
            Node::Scalar(n) => fmt::Display::fmt(n, f),
            Node::Var(n) => fmt::Display::fmt(n, f),
            Node::Ref(n) => fmt::Display::fmt(n, f),
            Node::Array(n) => fmt::Display::fmt(n, f),
            Node::Set(n) => fmt::Display::fmt(n, f),
            Node::Object(n) => fmt::Display::fmt(n, f),
            Node::Call(n) => fmt::Display::fmt(n, f),
            Node::ArrayComprehension(n) => fmt::Display::fmt(n, f),
            Node::SetComprehension(n) => fmt::Display::fmt(n, f),
            Node::ObjectComprehension(n) => fmt::Display::fmt(n, f),
        }
    }
}

impl fmt::Display for QuerySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QuerySet(")?;
        for (i, query) in self.queries().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "Query({})", query)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, self.exprs(), "; ")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Call { operator, operands } => {
                write!(f, "{}(", operator)?;
                write_joined(f, operands.as_slice(), ",")?;
                f.write_str(")")
            }
            Expr::Term(term) => fmt::Display::fmt(term, f),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.value(), f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => fmt::Display::fmt(v, f),
            Value::Var(v) => fmt::Display::fmt(v, f),
            Value::Ref(v) => fmt::Display::fmt(v, f),
            Value::Array(v) => fmt::Display::fmt(v, f),
            Value::Set(v) => fmt::Display::fmt(v, f),
            Value::Object(v) => fmt::Display::fmt(v, f),
            Value::Call(v) => fmt::Display::fmt(v, f),
            Value::ArrayComprehension(v) => fmt::Display::fmt(v, f),
            Value::SetComprehension(v) => fmt::Display::fmt(v, f),
            Value::ObjectComprehension(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // serde_json prints compact, escaped JSON
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())?;
        for index in self.indices() {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_joined(f, self.terms(), ",")?;
        f.write_str("]")
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms().is_empty() {
            return f.write_str("set()");
        }
        f.write_str("{")?;
        write_joined(f, self.terms(), ",")?;
        f.write_str("}")
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.pairs().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator())?;
        write_joined(f, self.operands(), ",")?;
        f.write_str(")")
    }
}

impl fmt::Display for ArrayComprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | {}]", self.term(), self.body())
    }
}

impl fmt::Display for SetComprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} | {}}}", self.term(), self.body())
    }
}

impl fmt::Display for ObjectComprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}:{} | {}}}", self.key(), self.value(), self.body())
    }
}
