use crate::lexer::{Lit, LitKind, Symbol, Token, TokenKind, lex};

fn tokens(input: &str) -> Vec<Token> {
    lex(input).tokens
}

fn kinds(input: &str) -> Vec<TokenKind> {
    tokens(input)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !matches!(k, TokenKind::Eof))
        .collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(Symbol::new(name))
}

fn int_lit(text: &str) -> TokenKind {
    TokenKind::Literal(Lit {
        kind: LitKind::Int,
        symbol: Symbol::new(text),
    })
}

fn str_lit(text: &str) -> TokenKind {
    TokenKind::Literal(Lit {
        kind: LitKind::Str,
        symbol: Symbol::new(text),
    })
}

#[test]
fn keywords_lex_as_identifiers() {
    assert_eq!(
        kinds("def class extends"),
        vec![ident("def"), ident("class"), ident("extends")]
    );
}

#[test]
fn punctuation_and_two_char_operators() {
    assert_eq!(
        kinds("a?.b == c != d -> e"),
        vec![
            ident("a"),
            TokenKind::SafeDot,
            ident("b"),
            TokenKind::EqEq,
            ident("c"),
            TokenKind::Ne,
            ident("d"),
            TokenKind::Arrow,
            ident("e"),
        ]
    );
}

#[test]
fn newlines_are_tokens_spaces_are_not() {
    assert_eq!(
        kinds("a\nb"),
        vec![ident("a"), TokenKind::Newline, ident("b")]
    );
    assert_eq!(kinds("a   b"), vec![ident("a"), ident("b")]);
}

#[test]
fn string_literals_strip_quotes() {
    assert_eq!(kinds("'abc'"), vec![str_lit("abc")]);
    assert_eq!(kinds("\"abc\""), vec![str_lit("abc")]);
    assert_eq!(kinds("''"), vec![str_lit("")]);
}

#[test]
fn unterminated_string_recovers_at_line_end() {
    let out = lex("'abc\ndef");
    assert!(!out.diagnostics.diags.is_empty());
    let kinds: Vec<TokenKind> = out
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !matches!(k, TokenKind::Eof))
        .collect();
    assert_eq!(
        kinds,
        vec![str_lit("abc"), TokenKind::Newline, ident("def")]
    );
}

#[test]
fn number_dot_method_call_keeps_dot() {
    assert_eq!(
        kinds("1.abs()"),
        vec![
            int_lit("1"),
            TokenKind::Dot,
            ident("abs"),
            TokenKind::OpenParen,
            TokenKind::CloseParen,
        ]
    );
}

#[test]
fn decimal_and_range() {
    assert_eq!(
        kinds("0.5"),
        vec![TokenKind::Literal(Lit {
            kind: LitKind::Decimal,
            symbol: Symbol::new("0.5"),
        })]
    );
    assert_eq!(
        kinds("1..2"),
        vec![int_lit("1"), TokenKind::Range, int_lit("2")]
    );
}

#[test]
fn comments_are_trivia_tokens() {
    let toks = tokens("a // rest\nb /* mid */ c");
    let trivia: Vec<bool> = toks.iter().map(|t| t.is_trivia()).collect();
    assert_eq!(
        trivia,
        vec![false, true, true, false, true, false, false]
    );
}

#[test]
fn bool_and_null_literals() {
    assert_eq!(
        kinds("true null"),
        vec![
            TokenKind::Literal(Lit {
                kind: LitKind::Bool,
                symbol: Symbol::new("true"),
            }),
            TokenKind::Literal(Lit {
                kind: LitKind::Null,
                symbol: Symbol::new("null"),
            }),
        ]
    );
}

#[test]
fn spans_are_byte_offsets() {
    let toks = tokens("ab c");
    assert_eq!((toks[0].span.start, toks[0].span.end), (0, 2));
    assert_eq!((toks[1].span.start, toks[1].span.end), (3, 4));
}

#[test]
fn unknown_char_is_reported_and_skipped() {
    let out = lex("a # b");
    assert!(!out.diagnostics.diags.is_empty());
    let kinds: Vec<TokenKind> = out
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !matches!(k, TokenKind::Eof))
        .collect();
    assert_eq!(kinds, vec![ident("a"), ident("b")]);
}
