//! Decoding compile API responses into typed trees

use super::fixtures::{every_kind, num, op, scenario_a, string, var};
use rego_ast::{DecodeOptions, Decoder, Error, Expr, QuerySet, Scalar, Term, Value};
use serde_json::json;

#[test]
fn test_scenario_a_gt_call() {
    let qs = QuerySet::from_compile_response(&scenario_a()).unwrap();
    assert_eq!(qs.len(), 1);

    let query = &qs.queries()[0];
    assert_eq!(query.exprs().len(), 1);

    let expr = &query.exprs()[0];
    assert!(expr.is_call());
    assert_eq!(expr.operator_path().unwrap(), "gt");

    let operands: Vec<String> = expr
        .operands()
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(operands, vec!["5", "3"]);
}

#[test]
fn test_scenario_b_empty_result() {
    let qs = QuerySet::from_json(&json!([])).unwrap();
    assert!(qs.is_empty());

    let qs: QuerySet = r#"{"result": {}}"#.parse().unwrap();
    assert!(qs.is_empty());
}

#[test]
fn test_every_kind_decodes() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    assert_eq!(qs.len(), 2);
    assert_eq!(qs.queries()[0].exprs().len(), 2);
    assert_eq!(qs.queries()[1].exprs().len(), 4);

    let member = &qs.queries()[0].exprs()[0];
    assert_eq!(member.operator_path().unwrap(), "internal.member_2");

    let kinds: Vec<&str> = qs.queries()[1]
        .exprs()
        .iter()
        .skip(1)
        .map(|e| e.as_term().unwrap().value().kind())
        .collect();
    assert_eq!(
        kinds,
        vec!["arraycomprehension", "setcomprehension", "objectcomprehension"]
    );
}

#[test]
fn test_bare_term_expr_rejects_call_accessors() {
    let expr = Expr::from_json(&json!({"terms": var("allowed")})).unwrap();
    assert!(!expr.is_call());
    assert!(matches!(expr.operator(), Err(Error::InvalidAccess(_))));
    assert!(matches!(expr.operands(), Err(Error::InvalidAccess(_))));
}

#[test]
fn test_scalars_are_carried_opaquely() {
    let term = Term::from_json(&json!({"type": "number", "value": 12345678901234567890u64}))
        .unwrap();
    assert_eq!(term.to_string(), "12345678901234567890");

    let term = Term::from_json(&string("héllo")).unwrap();
    match term.value() {
        Value::Scalar(s) => assert_eq!(s, &Scalar::string("héllo")),
        other => panic!("expected scalar, got {:?}", other),
    }
}

#[test]
fn test_unknown_kind_anywhere_aborts() {
    let input = json!([
        [{"terms": [op("eq"), var("x"), num(1)]}],
        [{"terms": [op("eq"), var("x"), {"type": "every", "value": []}]}]
    ]);

    match QuerySet::from_json(&input) {
        Err(Error::UnknownNodeKind(tag)) => assert_eq!(tag, "every"),
        other => panic!("expected UnknownNodeKind, got {:?}", other),
    }
}

#[test]
fn test_malformed_paths() {
    let cases = vec![
        (json!({"queries": {}}), "$.queries", "array of queries"),
        (json!({"queries": [{}]}), "$.queries[0]", "array of expressions"),
        (json!({"queries": [[{}]]}), "$.queries[0][0].terms", "terms field"),
        (
            json!({"queries": [[{"terms": [op("eq"), {"type": "set", "value": {}}]}]]}),
            "$.queries[0][0].terms[1].value",
            "array of terms",
        ),
        (
            json!({"queries": [[{"terms": {"type": "arraycomprehension", "value": {"body": []}}}]]}),
            "$.queries[0][0].terms.value.term",
            "term object",
        ),
        (
            json!({"result": {"queries": [[{"terms": {"type": "string"}}]]}}),
            "$.result.queries[0][0].terms.value",
            "value payload",
        ),
    ];

    for (input, want_path, want_expected) in cases {
        match QuerySet::from_compile_response(&input) {
            Err(Error::MalformedInput { path, expected }) => {
                assert_eq!(path, want_path);
                assert_eq!(expected, want_expected);
            }
            other => panic!("{}: expected MalformedInput, got {:?}", want_path, other),
        }
    }
}

#[test]
fn test_depth_limit_guards_deep_input() {
    let mut term = num(0);
    for _ in 0..100 {
        term = json!({"type": "set", "value": [term]});
    }
    let input = json!([[{"terms": term}]]);

    let strict = Decoder::new(DecodeOptions::new().with_max_depth(64));
    match strict.query_set(&input) {
        Err(Error::DepthExceeded { limit, path }) => {
            assert_eq!(limit, 64);
            assert!(path.starts_with("$[0][0].terms"));
        }
        other => panic!("expected DepthExceeded, got {:?}", other),
    }

    let qs = Decoder::default().query_set(&input).unwrap();
    assert_eq!(qs.len(), 1);
}

#[test]
fn test_invalid_json_text() {
    assert!(matches!("{".parse::<QuerySet>(), Err(Error::Json(_))));
}

#[test]
fn test_error_messages() {
    let err = Error::MalformedInput {
        path: "$[0]".to_string(),
        expected: "array of expressions",
    };
    assert_eq!(
        err.to_string(),
        "Malformed input at $[0]: expected array of expressions"
    );
    assert_eq!(
        Error::UnknownNodeKind("every".to_string()).to_string(),
        "Unknown node kind: every"
    );
}
