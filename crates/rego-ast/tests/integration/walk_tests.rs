//! Traversal of decoded trees with continuation-style visitors

use super::fixtures::{every_kind, scenario_a};
use rego_ast::{walk, Node, QuerySet, Value, Visitor};
use std::cell::RefCell;

/// Collects `a.b.c`-style paths of kind names from the root to each leaf
struct PathCollector<'r> {
    prefix: String,
    leaves: &'r RefCell<Vec<String>>,
}

impl Visitor for PathCollector<'_> {
    fn visit(&self, node: Node<'_>) -> Option<Self> {
        let path = if self.prefix.is_empty() {
            node.kind_name().to_string()
        } else {
            format!("{}.{}", self.prefix, node.kind_name())
        };
        if matches!(node, Node::Scalar(_) | Node::Var(_)) {
            self.leaves.borrow_mut().push(path.clone());
        }
        Some(PathCollector {
            prefix: path,
            leaves: self.leaves,
        })
    }
}

/// Records every node as (kind, address)
struct Trace<'r> {
    seen: &'r RefCell<Vec<(&'static str, usize)>>,
}

impl Visitor for Trace<'_> {
    fn visit(&self, node: Node<'_>) -> Option<Self> {
        self.seen.borrow_mut().push((node.kind_name(), node.id()));
        Some(Trace { seen: self.seen })
    }
}

/// Collects operator paths of call expressions, without descending into them
struct Operators<'r> {
    found: &'r RefCell<Vec<String>>,
}

impl Visitor for Operators<'_> {
    fn visit(&self, node: Node<'_>) -> Option<Self> {
        match node {
            Node::Expr(expr) if expr.is_call() => {
                if let Ok(path) = expr.operator_path() {
                    self.found.borrow_mut().push(path);
                }
                None
            }
            _ => Some(Operators { found: self.found }),
        }
    }
}

fn trace(qs: &QuerySet) -> Vec<(&'static str, usize)> {
    let seen = RefCell::new(Vec::new());
    walk(qs, &Trace { seen: &seen });
    seen.into_inner()
}

#[test]
fn test_visits_every_node_once() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    let mut visited = trace(&qs);

    assert_eq!(visited.len(), 89);
    assert_eq!(Node::from(&qs).count(), 89);

    let total = visited.len();
    visited.sort_unstable();
    visited.dedup();
    assert_eq!(visited.len(), total);
}

#[test]
fn test_order_is_deterministic() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    assert_eq!(trace(&qs), trace(&qs));
}

#[test]
fn test_visitor_state_is_per_branch() {
    let qs = QuerySet::from_compile_response(&scenario_a()).unwrap();
    let leaves = RefCell::new(Vec::new());
    walk(
        &qs,
        &PathCollector {
            prefix: String::new(),
            leaves: &leaves,
        },
    );

    assert_eq!(
        leaves.into_inner(),
        vec![
            "QuerySet.Query.Expr.Term.Ref.Term.Var",
            "QuerySet.Query.Expr.Term.Scalar",
            "QuerySet.Query.Expr.Term.Scalar",
        ]
    );
}

#[test]
fn test_stop_prunes_subtree() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    let found = RefCell::new(Vec::new());
    walk(&qs, &Operators { found: &found });

    // `count` sits under `eq` and is never reached.
    assert_eq!(found.into_inner(), vec!["internal.member_2", "eq", "gt"]);
}

#[test]
fn test_walk_subtree() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    let comp = qs.queries()[1].exprs()[3].as_term().unwrap();
    match comp.value() {
        Value::ObjectComprehension(c) => {
            // ObjectComprehension, key (2), value (2), body Query + 2 x (Expr, Term, Var)
            assert_eq!(Node::from(c).count(), 12);
        }
        other => panic!("expected object comprehension, got {:?}", other),
    }
}

#[test]
fn test_concurrent_read_only_walks() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    let expected = Node::from(&qs).count();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| Node::from(&qs).count()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
