use crate::diagnostics::Diagnostics;
use crate::span::Span;

mod token;

pub use token::{
    DECL_KEYWORDS, Lit, LitKind, MODIFIER_KEYWORDS, NodeId, Symbol, Token, TokenKind,
    is_modifier_word,
};

pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

/// Lex the input into tokens.
///
/// - Numbers: ASCII digits, with an optional fraction part (`1.5`). A dot not
///   followed by a digit is left for the parser (`1.abs()` lexes as `1` `.` `abs`).
/// - Strings: single- or double-quoted, `\`-escapes consumed verbatim, no
///   interpolation. Unterminated strings recover at end of line.
/// - Identifiers: ASCII letters/digits/`_`/`$` and any non-ASCII codepoint.
///
/// The lexer never fails; unknown characters are reported and skipped.
pub fn lex(input: &str) -> LexOutput {
    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::default();
    let mut iter = input.char_indices().peekable();

    while let Some((start, ch)) = iter.next() {
        // Skip spaces/tabs but keep newlines as trivia tokens.
        if matches!(ch, ' ' | '\t' | '\r') {
            continue;
        }

        if ch == '\n' {
            tokens.push(Token {
                kind: TokenKind::Newline,
                span: Span::new(start as u32, (start + 1) as u32),
            });
            continue;
        }

        let kind = match ch {
            '/' => match iter.peek() {
                Some((_, '/')) => {
                    iter.next();
                    let mut end = start + 2;
                    while let Some(&(i, c2)) = iter.peek() {
                        if c2 == '\n' {
                            break;
                        }
                        iter.next();
                        end = i + c2.len_utf8();
                    }
                    tokens.push(Token {
                        kind: TokenKind::LineComment(Symbol::new(&input[start + 2..end])),
                        span: Span::new(start as u32, end as u32),
                    });
                    continue;
                }
                Some((_, '*')) => {
                    iter.next();
                    let mut end = start + 2;
                    let mut closed = false;
                    while let Some((i, c2)) = iter.next() {
                        end = i + c2.len_utf8();
                        if c2 == '*' && matches!(iter.peek(), Some((_, '/'))) {
                            let (j, _) = iter.next().unwrap();
                            end = j + 1;
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        diagnostics.error(
                            Span::new(start as u32, end as u32),
                            "unterminated block comment",
                        );
                    }
                    tokens.push(Token {
                        kind: TokenKind::BlockComment(Symbol::new(&input[start..end])),
                        span: Span::new(start as u32, end as u32),
                    });
                    continue;
                }
                _ => TokenKind::Slash,
            },
            '.' => match iter.peek() {
                Some((_, '.')) => {
                    iter.next();
                    TokenKind::Range
                }
                _ => TokenKind::Dot,
            },
            '?' => match iter.peek() {
                Some((_, '.')) => {
                    iter.next();
                    TokenKind::SafeDot
                }
                _ => TokenKind::Question,
            },
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            ':' => TokenKind::Colon,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '@' => TokenKind::At,
            '=' => match iter.peek() {
                Some((_, '=')) => {
                    iter.next();
                    TokenKind::EqEq
                }
                _ => TokenKind::Assign,
            },
            '!' => match iter.peek() {
                Some((_, '=')) => {
                    iter.next();
                    TokenKind::Ne
                }
                _ => TokenKind::Bang,
            },
            '<' => match iter.peek() {
                Some((_, '=')) => {
                    iter.next();
                    TokenKind::Le
                }
                _ => TokenKind::Lt,
            },
            '>' => match iter.peek() {
                Some((_, '=')) => {
                    iter.next();
                    TokenKind::Ge
                }
                _ => TokenKind::Gt,
            },
            '+' => TokenKind::Plus,
            '-' => match iter.peek() {
                Some((_, '>')) => {
                    iter.next();
                    TokenKind::Arrow
                }
                _ => TokenKind::Minus,
            },
            '*' => TokenKind::Star,
            '%' => TokenKind::Percent,
            '&' => match iter.peek() {
                Some((_, '&')) => {
                    iter.next();
                    TokenKind::AndAnd
                }
                _ => {
                    diagnostics.error(
                        Span::new(start as u32, (start + 1) as u32),
                        "unexpected char '&' (did you mean '&&')",
                    );
                    continue;
                }
            },
            '|' => match iter.peek() {
                Some((_, '|')) => {
                    iter.next();
                    TokenKind::OrOr
                }
                _ => {
                    diagnostics.error(
                        Span::new(start as u32, (start + 1) as u32),
                        "unexpected char '|' (did you mean '||')",
                    );
                    continue;
                }
            },
            '\'' | '"' => {
                let (kind, span) = lex_string(input, &mut iter, start, ch, &mut diagnostics);
                tokens.push(Token { kind, span });
                continue;
            }
            c if c.is_ascii_digit() => {
                let (kind, span) = lex_number(input, &mut iter, start);
                tokens.push(Token { kind, span });
                continue;
            }
            c if is_ident_start(c) => {
                let mut end = start + ch.len_utf8();
                while let Some(&(i, c2)) = iter.peek() {
                    if !is_ident_continue(c2) {
                        break;
                    }
                    iter.next();
                    end = i + c2.len_utf8();
                }
                let text = &input[start..end];
                let span = Span::new(start as u32, end as u32);
                let kind = match text {
                    "true" | "false" => TokenKind::Literal(Lit {
                        kind: LitKind::Bool,
                        symbol: Symbol::new(text),
                    }),
                    "null" => TokenKind::Literal(Lit {
                        kind: LitKind::Null,
                        symbol: Symbol::new(text),
                    }),
                    _ => TokenKind::Ident(Symbol::new(text)),
                };
                tokens.push(Token { kind, span });
                continue;
            }
            other => {
                diagnostics.error(
                    Span::new(start as u32, (start + other.len_utf8()) as u32),
                    format!("unexpected char {:?}", other),
                );
                continue;
            }
        };

        let end = iter
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(input.len());
        tokens.push(Token {
            kind,
            span: Span::new(start as u32, end as u32),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(input.len() as u32),
    });

    LexOutput {
        tokens,
        diagnostics,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

fn lex_string(
    input: &str,
    iter: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
    quote: char,
    diagnostics: &mut Diagnostics,
) -> (TokenKind, Span) {
    let mut end = start + 1;
    let mut closed = false;
    while let Some(&(i, c)) = iter.peek() {
        if c == '\n' {
            break;
        }
        iter.next();
        end = i + c.len_utf8();
        if c == '\\' {
            if let Some(&(j, esc)) = iter.peek()
                && esc != '\n'
            {
                iter.next();
                end = j + esc.len_utf8();
            }
            continue;
        }
        if c == quote {
            closed = true;
            break;
        }
    }

    let span = Span::new(start as u32, end as u32);
    if !closed {
        diagnostics.error(span, "unterminated string literal");
    }
    let inner_end = if closed { end - 1 } else { end };
    let inner = &input[start + 1..inner_end.max(start + 1)];
    (
        TokenKind::Literal(Lit {
            kind: LitKind::Str,
            symbol: Symbol::new(inner),
        }),
        span,
    )
}

fn lex_number(
    input: &str,
    iter: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
) -> (TokenKind, Span) {
    let mut end = start + 1;
    while let Some(&(i, c)) = iter.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        iter.next();
        end = i + 1;
    }

    // A fraction part needs a digit right after the dot, so `1.abs()` and the
    // `1..2` range both leave the dot alone.
    let mut kind = LitKind::Int;
    if let Some(&(dot_idx, '.')) = iter.peek()
        && input[dot_idx + 1..].starts_with(|c: char| c.is_ascii_digit())
    {
        iter.next();
        kind = LitKind::Decimal;
        end = dot_idx + 1;
        while let Some(&(i, c)) = iter.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            iter.next();
            end = i + 1;
        }
    }

    (
        TokenKind::Literal(Lit {
            kind,
            symbol: Symbol::new(&input[start..end]),
        }),
        Span::new(start as u32, end as u32),
    )
}
