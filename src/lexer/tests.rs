use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_function_header() {
    let got = kinds("func greet(name string) string {");
    assert_eq!(
        got,
        vec![
            TokenKind::Func,
            TokenKind::Ident("greet".into()),
            TokenKind::LParen,
            TokenKind::Ident("name".into()),
            TokenKind::Type("string".into()),
            TokenKind::RParen,
            TokenKind::Type("string".into()),
            TokenKind::LBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn two_char_operators_beat_their_prefix() {
    assert_eq!(
        kinds("x == y"),
        vec![
            TokenKind::Ident("x".into()),
            TokenKind::EqEq,
            TokenKind::Ident("y".into()),
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("x := y"),
        vec![
            TokenKind::Ident("x".into()),
            TokenKind::ColonEq,
            TokenKind::Ident("y".into()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn keyword_requires_trailing_whitespace() {
    // "iffy" is a maximal identifier run; it is never split into "if" + "fy".
    assert_eq!(kinds("iffy"), vec![TokenKind::Ident("iffy".into()), TokenKind::Eof]);
}

#[test]
fn string_literal_keeps_escapes_raw() {
    let toks = tokenize(r#""a\"b""#).tokens;
    match &toks[0].kind {
        TokenKind::StringLiteral(raw) => assert_eq!(raw, r#"a\"b"#),
        other => panic!("expected string literal, got {other:?}"),
    }
}

#[test]
fn unterminated_string_is_a_lex_error() {
    let result = tokenize("\"abc");
    assert!(!result.errors.is_empty());
}

#[test]
fn numbers_are_digit_runs() {
    assert_eq!(kinds("42"), vec![TokenKind::Number(42), TokenKind::Eof]);
}

#[test]
fn lexer_is_deterministic() {
    let src = "package demo\nfunc f(a int) int { return a + 1 }";
    assert_eq!(kinds(src), kinds(src));
}

#[test]
fn every_token_raw_is_a_substring_of_input() {
    let src = "package demo\nfunc f(a int) int { return a + 1 }";
    for tok in tokenize(src).tokens {
        if tok.kind == TokenKind::Eof {
            continue;
        }
        assert!(src.contains(&tok.lexeme), "{:?} not found in source", tok);
    }
}

#[test]
fn dot_and_method_call_operators() {
    assert_eq!(
        kinds("player.Send(x)"),
        vec![
            TokenKind::Ident("player".into()),
            TokenKind::Dot,
            TokenKind::Ident("Send".into()),
            TokenKind::LParen,
            TokenKind::Ident("x".into()),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn peekable_lexer_supports_two_token_lookahead() {
    let mut lexer = Lexer::tokenize("x := 1").unwrap();
    assert_eq!(lexer.peek().kind, TokenKind::Ident("x".into()));
    assert_eq!(lexer.peek_n(1).kind, TokenKind::ColonEq);
    assert_eq!(lexer.next().kind, TokenKind::Ident("x".into()));
    assert_eq!(lexer.next().kind, TokenKind::ColonEq);
    assert_eq!(lexer.next().kind, TokenKind::Number(1));
}
