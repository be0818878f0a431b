//! Expression and structural renderings of decoded trees

use super::fixtures::{every_kind, num, scenario_a, var};
use rego_ast::{
    render, Array, ArrayComprehension, Expr, Query, QuerySet, Ref, Scalar, Set, Term, Value,
};
use serde_json::json;

#[test]
fn test_scenario_a_expression() {
    let qs = QuerySet::from_compile_response(&scenario_a()).unwrap();
    assert_eq!(qs.queries()[0].to_string(), "gt(5,3)");
    assert_eq!(render::expression(&qs), "QuerySet(Query(gt(5,3)))");
}

#[test]
fn test_scenario_a_structural() {
    let qs = QuerySet::from_compile_response(&scenario_a()).unwrap();
    let expected = "\
QuerySet
  Query
    Expr
      Term
        Ref
          Term
            Var gt
      Term
        Scalar 5
      Term
        Scalar 3
";
    assert_eq!(render::structural(&qs), expected);
}

#[test]
fn test_scenario_b_structural() {
    let qs = QuerySet::from_json(&json!([])).unwrap();
    assert_eq!(render::structural(&qs), "QuerySet\n");
    assert_eq!(qs.to_string(), "QuerySet()");
}

#[test]
fn test_scenario_c_sets() {
    let empty = Term::from_json(&json!({"type": "set", "value": []})).unwrap();
    assert_eq!(empty.to_string(), "set()");

    let pair = Term::from_json(&json!({"type": "set", "value": [num(1), num(2)]})).unwrap();
    assert_eq!(pair.to_string(), "{1,2}");
}

#[test]
fn test_scenario_d_empty_body_comprehension() {
    let term = Term::from_json(&json!({
        "type": "arraycomprehension",
        "value": {"term": var("x"), "body": []}
    }))
    .unwrap();
    assert_eq!(term.to_string(), "[x | ]");
}

#[test]
fn test_decoded_matches_hand_built() {
    let decoded = Term::from_json(&json!({
        "type": "ref",
        "value": [var("A"), var("X")]
    }))
    .unwrap();
    let built = Term::new(Value::Ref(Ref::new(Term::var("A"), vec![Term::var("X")])));
    assert_eq!(decoded, built);
    assert_eq!(decoded.to_string(), "A[X]");
    assert_eq!(decoded.to_string(), built.to_string());

    let decoded = Term::from_json(&json!({
        "type": "array",
        "value": [{"type": "set", "value": []}, {"type": "boolean", "value": false}]
    }))
    .unwrap();
    let built = Term::new(Value::Array(Array::new(vec![
        Term::new(Value::Set(Set::default())),
        Term::scalar(Scalar::boolean(false)),
    ])));
    assert_eq!(decoded.to_string(), built.to_string());
}

#[test]
fn test_every_kind_expression() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    assert_eq!(
        qs.queries()[0].to_string(),
        r#"internal["member_2"](input["roles"][0],{"admin","ops"}); true"#
    );
    assert_eq!(
        qs.queries()[1].to_string(),
        r#"eq(x,{"a":[null,2],"b":count(y)}); [z | gt(z,1)]; {z | }; {k:v | k; v}"#
    );
}

#[test]
fn test_structural_scalars_and_vars() {
    let query = Query::new(vec![Expr::call(
        Term::ref_path("eq"),
        vec![
            Term::scalar(Scalar::string("alice")),
            Term::new(Value::ArrayComprehension(ArrayComprehension::new(
                Term::scalar(Scalar::null()),
                Query::default(),
            ))),
        ],
    )]);
    let expected = "\
Query
  Expr
    Term
      Ref
        Term
          Var eq
    Term
      Scalar \"alice\"
    Term
      ArrayComprehension
        Term
          Scalar null
        Query
";
    assert_eq!(render::structural(&query), expected);
}

#[test]
fn test_renderings_are_pure() {
    let qs = QuerySet::from_compile_response(&every_kind()).unwrap();
    assert_eq!(render::structural(&qs), render::structural(&qs));
    assert_eq!(qs.to_string(), qs.to_string());
}

#[test]
fn test_write_structural_to_buffer() {
    let qs = QuerySet::from_compile_response(&scenario_a()).unwrap();
    let mut out = Vec::new();
    render::write_structural(&qs, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), render::structural(&qs));
}
