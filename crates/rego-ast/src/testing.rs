//! Test utilities and helper functions for rego-ast tests
//!
//! Builders for wire-format fragments, so tests read like the JSON the
//! compiler sends rather than nested `json!` literals.

use serde_json::{json, Value as Json};

/// A `var` term fragment
pub fn var(name: &str) -> Json {
    json!({"type": "var", "value": name})
}

/// A `number` term fragment
pub fn number(n: impl Into<serde_json::Number>) -> Json {
    json!({"type": "number", "value": Json::Number(n.into())})
}

/// A `string` term fragment
pub fn string(s: &str) -> Json {
    json!({"type": "string", "value": s})
}

/// A `boolean` term fragment
pub fn boolean(b: bool) -> Json {
    json!({"type": "boolean", "value": b})
}

/// A `ref` fragment for a dotted path: the first segment is a var, the
/// rest are string indices, as the compiler encodes `input.user.name`
pub fn reference(path: &str) -> Json {
    let mut segments = path.split('.');
    let mut terms = Vec::new();
    if let Some(base) = segments.next() {
        terms.push(var(base));
    }
    terms.extend(segments.map(string));
    json!({"type": "ref", "value": terms})
}

/// A `ref` fragment whose every segment is a var (operator names)
pub fn operator(path: &str) -> Json {
    let terms: Vec<Json> = path.split('.').map(var).collect();
    json!({"type": "ref", "value": terms})
}

/// A term fragment of any collection kind (`array`, `set`, `call`, ...)
pub fn collection(kind: &str, terms: Vec<Json>) -> Json {
    json!({"type": kind, "value": terms})
}

/// A call-shaped expression fragment
pub fn call_expr(op: &str, operands: Vec<Json>) -> Json {
    let mut terms = vec![operator(op)];
    terms.extend(operands);
    json!({"index": 0, "terms": terms})
}

/// A bare-term expression fragment
pub fn term_expr(term: Json) -> Json {
    json!({"index": 0, "terms": term})
}

/// A compile API response envelope around `queries`
pub fn compile_response(queries: Vec<Vec<Json>>) -> Json {
    json!({"result": {"queries": queries}})
}

/// Response for `data.pi * input.radius * 2 >= input.min_radius` with
/// `input.radius` unknown, `data.pi = 3.14` and `input.min_radius = 4`
pub fn circle_response() -> Json {
    compile_response(vec![vec![
        call_expr(
            "mul",
            vec![
                json!({"type": "number", "value": 3.14}),
                reference("input.radius"),
                var("__local0__"),
            ],
        ),
        call_expr("mul", vec![var("__local0__"), number(2), var("__local1__")]),
        call_expr("gte", vec![var("__local1__"), number(4)]),
    ]])
}

/// A term nested `depth` arrays deep
pub fn nested_array(depth: usize) -> Json {
    let mut term = number(0);
    for _ in 0..depth {
        term = collection("array", vec![term]);
    }
    term
}

/// A query set with `queries` alternatives of `exprs` expressions each,
/// mixing every term kind
pub fn wide_query_set(queries: usize, exprs: usize) -> Json {
    let query: Vec<Json> = (0..exprs)
        .map(|i| match i % 4 {
            0 => call_expr("eq", vec![reference("input.user.name"), string("alice")]),
            1 => call_expr(
                "internal.member_2",
                vec![var("x"), collection("set", vec![number(1), number(2)])],
            ),
            2 => term_expr(json!({"type": "object", "value": [
                [string("k"), collection("array", vec![boolean(true), json!({"type": "null"})])]
            ]})),
            _ => term_expr(json!({"type": "setcomprehension", "value": {
                "term": var("y"),
                "body": [call_expr("gt", vec![var("y"), number(i as u64)])]
            }})),
        })
        .collect();
    json!(vec![query; queries])
}
