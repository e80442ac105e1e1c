// tests/render_tests.rs

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use filter_ast::ast::{Expr, Expression, Node, Token};
use filter_ast::lexer::tokenize;
use std::fmt;

fn var(name: &str) -> Option<Expr> {
    Some(Expr::var(name))
}

fn num(n: f64) -> Option<Expr> {
    Some(Expr::number(n))
}

// ============================================================================
// Operator nodes
// ============================================================================

#[test]
fn test_binary() {
    let expr = Expr::binary(Token::Gt, var("cpu"), num(80.0));
    assert_eq!(expr.render(), "cpu > 80.000");
}

#[test]
fn test_binary_is_lhs_op_rhs() {
    let lhs = Expr::binary(Token::Plus, var("a"), num(1.0));
    let rhs = Expr::string("x y");
    let expected = format!("{} {} {}", lhs.render(), Token::Star, rhs.render());

    let expr = Expr::binary(Token::Star, Some(lhs), Some(rhs));
    assert_eq!(expr.render(), expected);
    assert_eq!(expr.render(), "a + 1.000 * 'x y'");
}

#[test]
fn test_unary() {
    let expr = Expr::unary(Token::Not, var("idle"));
    assert_eq!(expr.render(), "NOT idle");

    let neg = Expr::unary(Token::Minus, num(2.0));
    assert_eq!(neg.render(), "- 2.000");
}

#[test]
fn test_ternary_operator_appears_once() {
    let expr = Expr::ternary(Token::Between, var("load"), num(1.0), num(5.0));
    assert_eq!(expr.render(), "load BETWEEN 1.000 5.000");
}

#[test]
fn test_nested_operators() {
    let expr = Expr::binary(
        Token::Or,
        Some(Expr::binary(Token::Eq, var("region"), Some(Expr::string("eu")))),
        Some(Expr::binary(
            Token::And,
            Some(Expr::boolean(true)),
            Some(Expr::unary(Token::Not, var("drained"))),
        )),
    );
    assert_eq!(expr.render(), "region = 'eu' OR true AND NOT drained");
}

// ============================================================================
// Absent operands degrade to empty text
// ============================================================================

#[test]
fn test_binary_missing_operand_renders_empty() {
    assert_eq!(Expr::binary(Token::Eq, None, num(1.0)).render(), "");
    assert_eq!(Expr::binary(Token::Eq, var("a"), None).render(), "");
    assert_eq!(Expr::<Token>::binary(Token::Eq, None, None).render(), "");
}

#[test]
fn test_unary_missing_operand_renders_empty() {
    assert_eq!(Expr::<Token>::unary(Token::Not, None).render(), "");
}

#[test]
fn test_ternary_missing_operand_renders_empty() {
    assert_eq!(Expr::ternary(Token::Between, None, num(1.0), num(2.0)).render(), "");
    assert_eq!(Expr::ternary(Token::Between, var("x"), None, num(2.0)).render(), "");
    assert_eq!(Expr::ternary(Token::Between, var("x"), num(1.0), None).render(), "");
}

#[test]
fn test_degraded_child_still_renders_parent() {
    // The child is present but renders empty; only absence blanks the parent.
    let expr = Expr::binary(
        Token::And,
        Some(Expr::binary(Token::Eq, None, None)),
        var("b"),
    );
    assert_eq!(expr.render(), " AND b");
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn test_group_skips_absent_children() {
    let a: Expr = Expr::var("a");
    let b = Expr::binary(Token::Lt, var("b"), num(2.0));
    let expected = format!("{}{}", a.render(), b.render());

    let group = Expr::group([Some(a), None, Some(b)]);
    assert_eq!(group.render(), expected);
    assert_eq!(group.render(), "ab < 2.000");
}

#[test]
fn test_empty_group() {
    assert_eq!(Expr::<Token>::group([]).render(), "");
    assert_eq!(Expr::<Token>::group([None, None]).render(), "");
}

#[test]
fn test_nested_groups_are_transparent() {
    let inner = Expr::group([Some(Expr::unary(Token::Not, var("x")))]);
    let outer = Expr::group([Some(inner), Some(Expr::var("y"))]);
    assert_eq!(outer.render(), "NOT xy");
}

// ============================================================================
// Leaves
// ============================================================================

#[test]
fn test_number_literal() {
    assert_eq!(Expr::<Token>::number(3.0).render(), "3.000");
    assert_eq!(Expr::<Token>::number(-2.5).render(), "-2.500");
    assert_eq!(Expr::<Token>::number(0.0).render(), "0.000");
    assert_eq!(Expr::<Token>::number(12345.678).render(), "12345.678");
}

#[test]
fn test_boolean_literal() {
    assert_eq!(Expr::<Token>::boolean(true).render(), "true");
    assert_eq!(Expr::<Token>::boolean(false).render(), "false");
}

#[test]
fn test_string_literal() {
    assert_eq!(Expr::<Token>::string("web1").render(), "'web1'");
    assert_eq!(Expr::<Token>::string("it's").render(), "'it\\'s'");
}

#[test]
fn test_variable_reference() {
    assert_eq!(Expr::<Token>::var("host").render(), "host");
    assert_eq!(Expr::<Token>::var("cpu load").render(), "\"cpu load\"");
    assert_eq!(Expr::<Token>::var("or").render(), "\"or\"");
}

#[test]
fn test_time_literal_exact_second() {
    let t = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(Expr::<Token>::time(t).render(), "2021-01-02 03:04:05");
}

#[test]
fn test_time_literal_with_millis() {
    let t = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap() + Duration::milliseconds(250);
    assert_eq!(Expr::<Token>::time(t).render(), "2021-01-02 03:04:05.250");
}

#[test]
fn test_time_literal_in_other_zone() {
    let est = FixedOffset::west_opt(5 * 3600).unwrap();
    let t = est.with_ymd_and_hms(2021, 12, 31, 22, 0, 0).unwrap();
    assert_eq!(Expr::<Token>::time(t).render(), "2022-01-01 03:00:00");
}

// ============================================================================
// Node contract
// ============================================================================

#[test]
fn test_arguments_always_empty() {
    let t = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
    let nodes: Vec<Expr> = vec![
        Expr::group([Some(Expr::var("a")), None]),
        Expr::binary(Token::Eq, var("a"), num(1.0)),
        Expr::binary(Token::Eq, None, None),
        Expr::unary(Token::Not, var("a")),
        Expr::ternary(Token::Between, var("a"), num(1.0), num(2.0)),
        Expr::var("a"),
        Expr::number(1.0),
        Expr::boolean(false),
        Expr::string("s"),
        Expr::time(t),
    ];
    for node in &nodes {
        assert!(node.arguments().is_empty(), "arguments for {:?}", node);
        assert!(Node::arguments(node).is_empty());
    }
}

#[test]
fn test_id_is_never_rendered() {
    let plain = Expr::binary(Token::Eq, var("a"), num(1.0));
    let tagged = plain.clone().with_id("node-7");
    assert_eq!(tagged.id(), "node-7");
    assert_eq!(tagged.render(), plain.render());
}

struct Comment(String);

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-- {}", self.0)
    }
}

impl Node for Comment {
    fn id(&self) -> &str {
        ""
    }
}

#[test]
fn test_expression_marker_discriminates_nodes() {
    let nodes: Vec<Box<dyn Node>> = vec![
        Box::new(Expr::<Token>::var("a")),
        Box::new(Comment("note".to_string())),
    ];

    let expressions: Vec<&dyn Expression> =
        nodes.iter().filter_map(|n| n.as_expression()).collect();
    assert_eq!(expressions.len(), 1);
    assert_eq!(expressions[0].render(), "a");
    assert_eq!(nodes[1].render(), "-- note");
}

#[test]
fn test_custom_operator_type() {
    #[derive(Debug, Clone, PartialEq)]
    struct Op(&'static str);

    impl fmt::Display for Op {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    let expr = Expr::binary(Op("<>"), Some(Expr::var("a")), Some(Expr::var("b")));
    assert_eq!(expr.render(), "a <> b");
}

#[test]
fn test_trees_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Expr>();
}

// ============================================================================
// Round trip through the lexer
// ============================================================================

#[test]
fn test_rendered_text_retokenizes() {
    let expr = Expr::binary(
        Token::And,
        Some(Expr::binary(Token::GtEq, var("cpu load"), num(80.5))),
        Some(Expr::binary(Token::EqRegex, var("host"), Some(Expr::string("web'1\n")))),
    );
    let text = expr.render();

    let tokens = tokenize(&text).unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Ident("cpu load".to_string()),
            Token::GtEq,
            Token::Number(80.5),
            Token::And,
            Token::Ident("host".to_string()),
            Token::EqRegex,
            Token::String("web'1\n".to_string()),
        ]
    );

    // Rebuilding the same tree from the tokens renders identically.
    let rebuilt = Expr::binary(
        tokens[3].clone(),
        Some(Expr::binary(
            tokens[1].clone(),
            Some(Expr::var("cpu load")),
            Some(Expr::number(80.5)),
        )),
        Some(Expr::binary(
            tokens[5].clone(),
            Some(Expr::var("host")),
            Some(Expr::string("web'1\n")),
        )),
    );
    assert_eq!(rebuilt.render(), text);
}

#[test]
fn test_json_round_trip_renders_identically() {
    let t = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap() + Duration::milliseconds(7);
    let expr = Expr::group([
        Some(Expr::ternary(Token::Between, var("ts"), Some(Expr::time(t)), num(9.0)).with_id("t1")),
        None,
        Some(Expr::binary(Token::NotEq, var("flag"), None)),
    ]);

    let json = serde_json::to_string(&expr).unwrap();
    let back: Expr = serde_json::from_str(&json).unwrap();
    assert_eq!(back, expr);
    assert_eq!(back.render(), "ts BETWEEN 2021-01-02 03:04:05.007 9.000");
}

#[test]
fn test_time_literal_retokenizes() {
    let t = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
    let expr = Expr::binary(Token::GtEq, var("ts"), Some(Expr::time(t)));
    let text = expr.render();
    assert_eq!(text, "ts >= 2021-01-02 03:04:05");

    let tokens = tokenize(&text).unwrap();
    assert_eq!(
        tokens,
        vec![Token::Ident("ts".to_string()), Token::GtEq, Token::Time(t)]
    );
    assert_eq!(tokens[2].to_string(), "2021-01-02 03:04:05");
}

#[test]
fn test_non_operator_token_does_not_serialize() {
    let expr = Expr::binary(Token::Ident("x".to_string()), var("a"), num(1.0));
    assert!(serde_json::to_string(&expr).is_err());

    let ops = [Token::And, Token::Not, Token::Between, Token::NotEqRegex, Token::Percent];
    for op in ops {
        let expr = Expr::unary(op.clone(), var("a"));
        let back: Expr = serde_json::from_str(&serde_json::to_string(&expr).unwrap()).unwrap();
        assert_eq!(back, expr);
    }
}
