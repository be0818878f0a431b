//! Depth-first traversal of the AST
//!
//! The walker calls a [`Visitor`] on a node before its children. The visitor
//! answers with the visitor to use for those children, or `None` to skip
//! them. Per-level state (an indent, a path prefix) therefore lives in the
//! returned value, and sibling subtrees never see each other's state.

use super::nodes::{
    Array, ArrayComprehension, Call, Expr, Object, ObjectComprehension, Query, QuerySet, Ref,
    Scalar, Set, SetComprehension, Term, Value, Var,
};

/// A borrowed view of any AST node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    QuerySet(&'a QuerySet),
    Query(&'a Query),
    Expr(&'a Expr),
    Term(&'a Term),
    Scalar(&'a Scalar),
    Var(&'a Var),
    Ref(&'a Ref),
    Array(&'a Array),
    Set(&'a Set),
    Object(&'a Object),
    Call(&'a Call),
    ArrayComprehension(&'a ArrayComprehension),
    SetComprehension(&'a SetComprehension),
    ObjectComprehension(&'a ObjectComprehension),
}

impl<'a> Node<'a> {
    /// Name of the node's variant
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::QuerySet(_) => "QuerySet",
            Node::Query(_) => "Query",
            Node::Expr(_) => "Expr",
            Node::Term(_) => "Term",
            Node::Scalar(_) => "Scalar",
            Node::Var(_) => "Var",
            Node::Ref(_) => "Ref",
            Node::Array(_) => "Array",
            Node::Set(_) => "Set",
            Node::Object(_) => "Object",
            Node::Call(_) => "Call",
            Node::ArrayComprehension(_) => "ArrayComprehension",
            Node::SetComprehension(_) => "SetComprehension",
            Node::ObjectComprehension(_) => "ObjectComprehension",
        }
    }

    /// Address of the borrowed node.
    ///
    /// A term shares its address with the value it wraps, so identity within
    /// one tree is the pair of [`Node::kind_name`] and this address.
    pub fn id(&self) -> usize {
        match *self {
            Node::QuerySet(n) => n as *const QuerySet as usize,
            Node::Query(n) => n as *const Query as usize,
            Node::Expr(n) => n as *const Expr as usize,
            Node::Term(n) => n as *const Term as usize,
            Node::Scalar(n) => n as *const Scalar as usize,
            Node::Var(n) => n as *const Var as usize,
            Node::Ref(n) => n as *const Ref as usize,
            Node::Array(n) => n as *const Array as usize,
            Node::Set(n) => n as *const Set as usize,
            Node::Object(n) => n as *const Object as usize,
            Node::Call(n) => n as *const Call as usize,
            Node::ArrayComprehension(n) => n as *const ArrayComprehension as usize,
            Node::SetComprehension(n) => n as *const SetComprehension as usize,
            Node::ObjectComprehension(n) => n as *const ObjectComprehension as usize,
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn count(self) -> usize {
        let count = std::cell::Cell::new(0);
        walk(self, &Counter { count: &count });
        count.get()
    }

    /// The node wrapped by a term
    fn of_value(value: &'a Value) -> Self {
        match value {
            Value::Scalar(v) => Node::Scalar(v),
            Value::Var(v) => Node::Var(v),
            Value::Ref(v) => Node::Ref(v),
            Value::Array(v) => Node::Array(v),
            Value::Set(v) => Node::Set(v),
            Value::Object(v) => Node::Object(v),
            Value::Call(v) => Node::Call(v),
            Value::ArrayComprehension(v) => Node::ArrayComprehension(v),
            Value::SetComprehension(v) => Node::SetComprehension(v),
            Value::ObjectComprehension(v) => Node::ObjectComprehension(v),
        }
    }
}

macro_rules! node_from {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for Node<'a> {
                fn from(node: &'a $ty) -> Self {
                    Node::$ty(node)
                }
            }
        )*
    };
}

node_from!(
    QuerySet,
    Query,
    Expr,
    Term,
    Scalar,
    Var,
    Ref,
    Array,
    Set,
    Object,
    Call,
    ArrayComprehension,
    SetComprehension,
    ObjectComprehension,
);

/// Visitor called once per node by [`walk`]
pub trait Visitor: Sized {
    /// Visit `node`, returning the visitor for its children or `None` to
    /// leave them unvisited
    fn visit(&self, node: Node<'_>) -> Option<Self>;
}

/// Walk `node` and its descendants in pre-order
pub fn walk<'a, V: Visitor>(node: impl Into<Node<'a>>, visitor: &V) {
    walk_node(node.into(), visitor);
}

fn walk_node<V: Visitor>(node: Node<'_>, visitor: &V) {
    let Some(next) = visitor.visit(node) else {
        return;
    };

    match node {
        Node::QuerySet(qs) => {
            for query in qs.queries() {
                walk_node(Node::Query(query), &next);
            }
        }
        Node::Query(query) => {
            for expr in query.exprs() {
                walk_node(Node::Expr(expr), &next);
            }
        }
        Node::Expr(Expr::Call { operator, operands }) => {
            walk_node(Node::Term(operator), &next);
            walk_terms(operands, &next);
        }
        Node::Expr(Expr::Term(term)) => {
            walk_node(Node::Term(term), &next);
        }
        Node::Term(term) => {
            walk_node(Node::of_value(term.value()), &next);
        }
        Node::Scalar(_) | Node::Var(_) => {
            // Leaf node, no children
        }
        Node::Ref(r) => walk_terms(r.terms(), &next),
        Node::Array(array) => walk_terms(array.terms(), &next),
        Node::Set(set) => walk_terms(set.terms(), &next),
        Node::Call(call) => walk_terms(call.terms(), &next),
        Node::Object(object) => {
            for (key, value) in object.pairs() {
                walk_node(Node::Term(key), &next);
                walk_node(Node::Term(value), &next);
            }
        }
        Node::ArrayComprehension(comp) => {
            walk_node(Node::Term(comp.term()), &next);
            walk_node(Node::Query(comp.body()), &next);
        }
        Node::SetComprehension(comp) => {
            walk_node(Node::Term(comp.term()), &next);
            walk_node(Node::Query(comp.body()), &next);
        }
        Node::ObjectComprehension(comp) => {
            walk_node(Node::Term(comp.key()), &next);
            walk_node(Node::Term(comp.value()), &next);
            walk_node(Node::Query(comp.body()), &next);
        }
    }
}

fn walk_terms<V: Visitor>(terms: &[Term], visitor: &V) {
    for term in terms {
        walk_node(Node::Term(term), visitor);
    }
}

struct Counter<'c> {
    count: &'c std::cell::Cell<usize>,
}

impl Visitor for Counter<'_> {
    fn visit(&self, _node: Node<'_>) -> Option<Self> {
        self.count.set(self.count.get() + 1);
        Some(Counter { count: self.count })
    }
}
