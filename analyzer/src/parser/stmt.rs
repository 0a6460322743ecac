//! Statement parsing for script bodies, method bodies, and closure bodies.
//!
//! Callers skip statement terminators before each `parse_stmt` call. Every
//! call consumes at least one token, so recovery can never stall the
//! surrounding loop.

use super::Parser;
use super::ast::{Ident, Stmt, StmtKind};
use crate::lexer::{DECL_KEYWORDS, TokenKind};
use crate::span::Span;

impl<'a> Parser<'a> {
    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        let start_tok = self.cur();
        let start = start_tok.span.start;

        if matches!(start_tok.kind, TokenKind::CloseBrace) {
            // Stray brace at script level; blocks intercept theirs earlier.
            let tok = self.bump();
            self.diagnostics.error(tok.span, "unexpected '}'");
            return Stmt {
                span: tok.span,
                kind: StmtKind::Error,
            };
        }

        if start_tok.is_kw("return") {
            let kw = self.bump();
            let value = if self.at_terminator() {
                None
            } else {
                Some(self.parse_expr())
            };
            let end = value.as_ref().map(|e| e.span.end).unwrap_or(kw.span.end);
            self.finish_stmt();
            return Stmt {
                span: Span::new(start, end),
                kind: StmtKind::Return(value),
            };
        }

        if start_tok.is_kw("def") {
            return self.parse_def_decl();
        }

        if self.at_typed_decl() {
            let ty = self.parse_type_ref();
            let name = match self.cur().kind {
                TokenKind::Ident(ref sym) => {
                    let tok = self.bump();
                    Ident::new(sym.text.clone(), tok.span)
                }
                _ => Ident::new("", Span::point(ty.span.end)),
            };
            let mut end = name.span.end;
            let mut init = None;
            if matches!(self.cur().kind, TokenKind::Assign) {
                self.bump();
                let value = self.parse_expr();
                end = value.span.end;
                init = Some(value);
            }
            self.finish_stmt();
            return Stmt {
                span: Span::new(start, end),
                kind: StmtKind::VarDecl {
                    ty: Some(ty),
                    name,
                    init,
                },
            };
        }

        let expr = self.parse_expr();
        if matches!(self.cur().kind, TokenKind::Assign) {
            self.bump();
            let value = self.parse_expr();
            let span = Span::new(start, value.span.end);
            self.finish_stmt();
            return Stmt {
                span,
                kind: StmtKind::Assign {
                    target: expr,
                    value,
                },
            };
        }

        let mut span = expr.span;
        if span.is_empty() && !self.at_terminator() {
            // The expression parser refused the token; consume it so the
            // statement loop makes progress.
            let tok = self.bump();
            span = tok.span;
            self.finish_stmt();
            return Stmt {
                span,
                kind: StmtKind::Error,
            };
        }

        self.finish_stmt();
        Stmt {
            span: Span::new(start, span.end.max(start)),
            kind: StmtKind::Expr(expr),
        }
    }

    fn parse_def_decl(&mut self) -> Stmt {
        let kw = self.bump(); // `def`
        let name = match self.cur().kind {
            TokenKind::Ident(ref sym) => {
                let tok = self.bump();
                Ident::new(sym.text.clone(), tok.span)
            }
            _ => Ident::new("", Span::point(kw.span.end)),
        };

        let mut end = name.span.end.max(kw.span.end);
        let mut init = None;
        if matches!(self.cur().kind, TokenKind::Assign) {
            self.bump();
            let value = self.parse_expr();
            end = value.span.end;
            init = Some(value);
        }

        self.finish_stmt();
        Stmt {
            span: Span::new(kw.span.start, end),
            kind: StmtKind::VarDecl {
                ty: None,
                name,
                init,
            },
        }
    }

    /// Bounded lookahead for `Type name [= …]` declarations.
    ///
    /// Matches `Ident (. Ident)* ([])* Ident` followed by `=` or a statement
    /// terminator. Anything else (notably `ident 'literal'`) is an
    /// expression statement.
    fn at_typed_decl(&self) -> bool {
        let mut idx = self.sig_idx(self.pos);

        let Some(first) = self.token_at(idx).ident_text() else {
            return false;
        };
        if DECL_KEYWORDS.contains(&first) {
            return false;
        }
        idx = self.sig_idx_after(idx);

        // Qualified-name tail.
        while matches!(self.token_at(idx).kind, TokenKind::Dot) {
            idx = self.sig_idx_after(idx);
            if !matches!(self.token_at(idx).kind, TokenKind::Ident(_)) {
                return false;
            }
            idx = self.sig_idx_after(idx);
        }

        // Array suffixes.
        while matches!(self.token_at(idx).kind, TokenKind::OpenBracket) {
            let close = self.sig_idx_after(idx);
            if !matches!(self.token_at(close).kind, TokenKind::CloseBracket) {
                return false;
            }
            idx = self.sig_idx_after(close);
        }

        if !matches!(self.token_at(idx).kind, TokenKind::Ident(_)) {
            return false;
        }
        idx = self.sig_idx_after(idx);

        matches!(
            self.token_at(idx).kind,
            TokenKind::Assign
                | TokenKind::Newline
                | TokenKind::Semi
                | TokenKind::CloseBrace
                | TokenKind::Eof
        )
    }

    /// Reports and consumes trailing junk after a statement.
    fn finish_stmt(&mut self) {
        if self.at_terminator() {
            return;
        }
        let tok = self.cur();
        self.diagnostics.error(
            tok.span,
            format!("unexpected token {:?} after statement", tok.kind),
        );
        self.recover_to_stmt_end();
    }
}
