mod common;

use smartfilter::lexer::{tokenize, Atom, TokenKind};
use smartfilter::parser::{parse_expression, BoolOp, Expression};
use smartfilter::FilterError;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).expect("tokenize ok").into_iter().map(|t| t.kind).collect()
}

fn clause_keys(expression: &Expression) -> Vec<String> {
    match expression {
        Expression::Clause(clause) => vec![clause.key().to_string()],
        Expression::Group { children, .. } => children.iter().flat_map(clause_keys).collect(),
    }
}

#[test]
fn tokens_for_quoted_and_bare_atoms() {
    assert_eq!(
        kinds(r#"name="web 01" and (a=1)"#),
        vec![
            TokenKind::Atom(Atom::bare("name")),
            TokenKind::Equals,
            TokenKind::Atom(Atom::quoted("web 01")),
            TokenKind::And,
            TokenKind::LParen,
            TokenKind::Atom(Atom::bare("a")),
            TokenKind::Equals,
            TokenKind::Atom(Atom::bare("1")),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn empty_quoted_atom_is_kept() {
    assert_eq!(
        kinds(r#"a="""#),
        vec![TokenKind::Atom(Atom::bare("a")), TokenKind::Equals, TokenKind::Atom(Atom::quoted(""))]
    );
}

#[test]
fn token_offsets_are_byte_positions() {
    let tokens = tokenize("ab = cd").expect("tokenize ok");
    let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 3, 5]);
}

#[test]
fn keywords_are_whole_words() {
    assert_eq!(kinds("andy"), vec![TokenKind::Atom(Atom::bare("andy"))]);
    assert_eq!(kinds("AND"), vec![TokenKind::Atom(Atom::bare("AND"))]);
    assert_eq!(kinds("or"), vec![TokenKind::Or]);
}

#[test]
fn unicode_whitespace_separates_tokens() {
    assert_eq!(
        kinds("a=1\u{3000}and\u{a0}b=2").len(),
        7,
        "ideographic and no-break spaces are separators"
    );
}

#[test]
fn unterminated_quote_is_a_syntax_error() {
    let err = tokenize(r#"a="open"#).unwrap_err();
    assert!(matches!(err, FilterError::Syntax { offset: Some(2), .. }));
}

#[test]
fn and_binds_tighter_than_or() {
    let expression = parse_expression("a=1 and b=2 or c=3 and d=4").expect("parse ok");
    assert_eq!(expression.to_string(), "((a=1 AND b=2) OR (c=3 AND d=4))");
}

#[test]
fn same_operator_runs_are_n_ary() {
    let expression = parse_expression("a=1 or b=2 or c=3").expect("parse ok");
    match &expression {
        Expression::Group { operator, children } => {
            assert_eq!(*operator, BoolOp::Or);
            assert_eq!(children.len(), 3);
        }
        other => panic!("expected a group, got {other:?}"),
    }
    assert_eq!(clause_keys(&expression), vec!["a", "b", "c"]);
}

#[test]
fn parentheses_override_precedence() {
    let expression = parse_expression("(a=1 or b=2) and c=3").expect("parse ok");
    assert_eq!(expression.to_string(), "((a=1 OR b=2) AND c=3)");

    let expression = parse_expression("a=1 and (b=2 or c=3)").expect("parse ok");
    assert_eq!(expression.to_string(), "(a=1 AND (b=2 OR c=3))");
}

#[test]
fn redundant_parentheses_collapse() {
    let expression = parse_expression("((a=1))").expect("parse ok");
    assert!(matches!(expression, Expression::Clause(_)));
}

#[test]
fn quoted_keys_and_values_keep_their_quotedness() {
    let expression = parse_expression(r#""my key"="v" and plain=w"#).expect("parse ok");
    let Expression::Group { children, .. } = expression else { panic!("expected a group") };
    let Expression::Clause(first) = &children[0] else { panic!("expected a clause") };
    assert_eq!(first.key(), "my key");
    assert_eq!(first.value, Atom::quoted("v"));
    let Expression::Clause(second) = &children[1] else { panic!("expected a clause") };
    assert_eq!(second.value, Atom::bare("w"));
}

#[test]
fn keywords_read_as_atoms_in_clause_position() {
    let expression = parse_expression("and=or or or=and").expect("parse ok");
    assert_eq!(expression.to_string(), "(and=or OR or=and)");
}

#[test]
fn whitespace_around_equals_is_insignificant() {
    let expression = parse_expression("a = 1").expect("parse ok");
    assert_eq!(expression.to_string(), "a=1");
}

#[test]
fn malformed_filters_are_syntax_errors() {
    let bad = [
        "",
        "   ",
        "a__b=",
        "a=",
        "=1",
        r#""""=1"#,
        "a",
        "a=1 and",
        "or a=1",
        "a=1 b=2",
        "(a=1",
        "a=1)",
        "((a=1) or b=2",
        "()",
        "a=1 and or b=2",
        "a==1",
        "a=(1)",
    ];
    for filter in bad {
        match parse_expression(filter) {
            Err(FilterError::Syntax { input, .. }) => assert_eq!(input, filter),
            other => panic!("{filter:?} should be a syntax error, got {other:?}"),
        }
    }
}

#[test]
fn syntax_error_message_names_the_input() {
    let err = parse_expression("(a=1").unwrap_err();
    assert!(err.to_string().starts_with("Invalid query (a=1"), "{err}");
}
