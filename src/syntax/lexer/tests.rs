use super::*;

fn lex(source: &str) -> Vec<Lexeme> {
    let (tokens, diagnostics) = Lexer::new(source).tokenize();
    assert!(diagnostics.is_empty(), "lex errors: {:?}", diagnostics);
    tokens.into_iter().map(|t| t.node).collect()
}

fn lex_errors(source: &str) -> Vec<Diagnostic> {
    Lexer::new(source).tokenize().1
}

#[test]
fn test_simple_assignment() {
    assert_eq!(
        lex("x = 42\n"),
        vec![
            Lexeme::Ident("x".into()),
            Lexeme::Eq,
            Lexeme::Integer(42),
            Lexeme::Newline,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_missing_trailing_newline_is_supplied() {
    assert_eq!(
        lex("pass"),
        vec![Lexeme::Pass, Lexeme::Newline, Lexeme::Eof]
    );
}

#[test]
fn test_empty_source() {
    assert_eq!(lex(""), vec![Lexeme::Eof]);
    assert_eq!(lex("\n\n   \n# only a comment\n"), vec![Lexeme::Eof]);
}

#[test]
fn test_indent_and_dedent() {
    let tokens = lex("if x:\n    pass\ny = 1\n");
    assert_eq!(
        tokens,
        vec![
            Lexeme::If,
            Lexeme::Ident("x".into()),
            Lexeme::Colon,
            Lexeme::Newline,
            Lexeme::Indent,
            Lexeme::Pass,
            Lexeme::Newline,
            Lexeme::Dedent,
            Lexeme::Ident("y".into()),
            Lexeme::Eq,
            Lexeme::Integer(1),
            Lexeme::Newline,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_dedents_closed_at_eof() {
    let tokens = lex("for i in xs:\n    if i:\n        pass");
    let dedents = tokens.iter().filter(|t| **t == Lexeme::Dedent).count();
    let indents = tokens.iter().filter(|t| **t == Lexeme::Indent).count();
    assert_eq!(indents, 2);
    assert_eq!(dedents, 2);
    assert_eq!(tokens[tokens.len() - 1], Lexeme::Eof);
}

#[test]
fn test_blank_and_comment_lines_do_not_affect_indentation() {
    let src = "if x:\n\n    # note\n    pass  # trailing\n";
    let tokens = lex(src);
    assert_eq!(tokens.iter().filter(|t| **t == Lexeme::Indent).count(), 1);
    assert!(tokens.contains(&Lexeme::Pass));
}

#[test]
fn test_newlines_inside_brackets_are_ignored() {
    let tokens = lex("xs = [1,\n      2,\n  3]\n");
    assert_eq!(tokens.iter().filter(|t| **t == Lexeme::Newline).count(), 1);
    assert!(!tokens.contains(&Lexeme::Indent));
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        lex("a == b != c < d <= e > f >= g"),
        vec![
            Lexeme::Ident("a".into()),
            Lexeme::EqEq,
            Lexeme::Ident("b".into()),
            Lexeme::NotEq,
            Lexeme::Ident("c".into()),
            Lexeme::Lt,
            Lexeme::Ident("d".into()),
            Lexeme::LtE,
            Lexeme::Ident("e".into()),
            Lexeme::Gt,
            Lexeme::Ident("f".into()),
            Lexeme::GtE,
            Lexeme::Ident("g".into()),
            Lexeme::Newline,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_arithmetic_operators() {
    let tokens = lex("a // b / c % d * e - f + g");
    assert!(tokens.contains(&Lexeme::SlashSlash));
    assert!(tokens.contains(&Lexeme::Slash));
    assert!(tokens.contains(&Lexeme::Percent));
    assert!(tokens.contains(&Lexeme::Star));
    assert!(tokens.contains(&Lexeme::Minus));
    assert!(tokens.contains(&Lexeme::Plus));
}

#[test]
fn test_keywords() {
    assert_eq!(
        lex("not and or is in True False None elif else"),
        vec![
            Lexeme::Not,
            Lexeme::And,
            Lexeme::Or,
            Lexeme::Is,
            Lexeme::In,
            Lexeme::True,
            Lexeme::False,
            Lexeme::None,
            Lexeme::Elif,
            Lexeme::Else,
            Lexeme::Newline,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_string_literals_and_escapes() {
    assert_eq!(
        lex(r#"print("fizz", 'a\'b', "x\ny")"#)[2..7].to_vec(),
        vec![
            Lexeme::Str("fizz".into()),
            Lexeme::Comma,
            Lexeme::Str("a'b".into()),
            Lexeme::Comma,
            Lexeme::Str("x\ny".into()),
        ]
    );
}

#[test]
fn test_float_literal() {
    assert_eq!(lex("1.5")[0], Lexeme::Float(1.5));
    assert_eq!(lex("7")[0], Lexeme::Integer(7));
}

#[test]
fn test_spans_are_byte_offsets() {
    let (tokens, _) = Lexer::new("x = 10\n").tokenize();
    assert_eq!(tokens[0].span, Span::new(0, 1));
    assert_eq!(tokens[2].span, Span::new(4, 6));
}

#[test]
fn test_bad_dedent_is_reported() {
    let errors = lex_errors("if x:\n        pass\n    pass\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("unindent"));
}

#[test]
fn test_unterminated_string_is_reported() {
    let errors = lex_errors("print(\"oops)\n");
    assert!(errors.iter().any(|d| d.message.contains("unterminated")));
}

#[test]
fn test_unexpected_character_is_reported() {
    let errors = lex_errors("x = 1 $ 2\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'$'"));
}

#[test]
fn test_integer_overflow_is_reported() {
    let errors = lex_errors("x = 99999999999999999999\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("too large"));
}

#[test]
fn test_float_overflow_is_reported() {
    let source = format!("x = 1{}.0\n", "0".repeat(400));
    let errors = lex_errors(&source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "float literal is too large");

    // The largest finite decimal literals still lex.
    let source = format!("x = 1{}.0\n", "0".repeat(300));
    assert!(lex_errors(&source).is_empty());
}
