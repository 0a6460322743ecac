//! Expression parsing (Pratt parser with Groovy-style postfix forms).
//!
//! Postfix handling covers member access (`a.b`, `a?.b`), paren calls,
//! index chains (`x[0][1]`), constructor calls, closures, and command chains
//! (`recv.first 'foo' second 'bar' third`). Command chains only exist behind
//! an explicit receiver; a bare `first 'foo'` statement is an identifier plus
//! recovered junk.

use super::Parser;
use super::ast::{Arg, ArgList, BinOpKind, Expr, ExprKind, Ident, UnOp};
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

fn infix_binding_power(op: BinOpKind) -> (u8, u8) {
    use BinOpKind::*;
    match op {
        OrOr => (3, 4),
        AndAnd => (5, 6),
        EqEq | Ne => (7, 8),
        Lt | Le | Ge | Gt => (9, 10),
        Plus | Minus => (11, 12),
        Star | Slash | Percent => (13, 14),
    }
}

const PREFIX_BP: u8 = 15;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_expr_prefix();

        loop {
            let Some(op) = self.peek_binop_kind() else {
                break;
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            let op_tok = self.bump();
            let rhs = if self.cur().can_begin_expr() {
                self.parse_expr_bp(r_bp)
            } else {
                self.recover_from_infix(&op_tok)
            };

            let span = lhs.span.to(rhs.span);
            lhs = self.mk_expr(
                span,
                ExprKind::Binary {
                    op,
                    op_span: op_tok.span,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
            );
        }

        lhs
    }

    fn peek_binop_kind(&self) -> Option<BinOpKind> {
        Some(match self.cur().kind {
            TokenKind::Lt => BinOpKind::Lt,
            TokenKind::Le => BinOpKind::Le,
            TokenKind::EqEq => BinOpKind::EqEq,
            TokenKind::Ne => BinOpKind::Ne,
            TokenKind::Ge => BinOpKind::Ge,
            TokenKind::Gt => BinOpKind::Gt,
            TokenKind::AndAnd => BinOpKind::AndAnd,
            TokenKind::OrOr => BinOpKind::OrOr,
            TokenKind::Plus => BinOpKind::Plus,
            TokenKind::Minus => BinOpKind::Minus,
            TokenKind::Star => BinOpKind::Star,
            TokenKind::Slash => BinOpKind::Slash,
            TokenKind::Percent => BinOpKind::Percent,
            _ => return None,
        })
    }

    fn parse_expr_prefix(&mut self) -> Expr {
        match self.cur().kind {
            TokenKind::Bang => self.parse_expr_unary(UnOp::Not),
            TokenKind::Minus => self.parse_expr_unary(UnOp::Neg),
            _ => {
                let primary = self.parse_expr_primary();
                self.parse_expr_postfix(primary)
            }
        }
    }

    fn parse_expr_unary(&mut self, op: UnOp) -> Expr {
        let tok = self.bump();
        let expr = self.parse_expr_bp(PREFIX_BP);
        let span = tok.span.to(expr.span);
        self.mk_expr(
            span,
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
        )
    }

    fn parse_expr_primary(&mut self) -> Expr {
        let tok = self.cur();
        match tok.kind {
            TokenKind::Literal(lit) => {
                let tok = self.bump();
                self.mk_expr(tok.span, ExprKind::Lit(lit))
            }
            TokenKind::Ident(ref sym) if sym.text == "new" => self.parse_ctor_call(),
            TokenKind::Ident(ref sym) => {
                let text = sym.text.clone();
                let tok = self.bump();
                self.mk_expr(tok.span, ExprKind::Var(Ident::new(text, tok.span)))
            }
            TokenKind::OpenParen => self.parse_paren_group(),
            TokenKind::OpenBracket => self.parse_list_or_map(),
            TokenKind::OpenBrace => self.parse_closure(),
            _ => {
                self.diagnostics.error(
                    tok.span,
                    format!("expected expression, found {:?}", tok.kind),
                );
                // Closing delimiters and separators belong to the enclosing
                // construct; consuming them here would cascade the damage.
                let boundary = self.at_terminator()
                    || matches!(
                        tok.kind,
                        TokenKind::CloseParen
                            | TokenKind::CloseBracket
                            | TokenKind::Comma
                            | TokenKind::Colon
                    );
                if boundary || tok.is_eof() {
                    self.error_expr_at(Span::point(tok.span.start))
                } else {
                    let tok = self.bump();
                    self.error_expr_at(tok.span)
                }
            }
        }
    }

    // ---- postfix chain ------------------------------------------------------

    fn parse_expr_postfix(&mut self, mut expr: Expr) -> Expr {
        loop {
            match self.cur().kind {
                TokenKind::Dot | TokenKind::SafeDot => {
                    expr = self.parse_member_suffix(expr);
                }
                TokenKind::OpenParen => {
                    // Only a bare name can head a free call.
                    let ExprKind::Var(ref name) = expr.kind else {
                        break;
                    };
                    let name = name.clone();
                    let args = self.parse_paren_args();
                    let span = expr.span.to(Span::point(args.span.end));
                    expr = self.mk_expr(
                        span,
                        ExprKind::Call {
                            receiver: None,
                            name,
                            args,
                            command: false,
                        },
                    );
                }
                TokenKind::OpenBracket => {
                    let open = self.bump();
                    self.group_depth += 1;
                    let index = self.parse_expr_bp(0);
                    let mut end = index.span.end.max(open.span.end);
                    let mut closed = false;
                    if matches!(self.cur().kind, TokenKind::CloseBracket) {
                        end = self.bump().span.end;
                        closed = true;
                    } else {
                        self.diagnostics
                            .error(Span::point(end), "expected ']' to close index");
                    }
                    self.group_depth -= 1;
                    let span = Span::new(expr.span.start, end);
                    expr = self.mk_expr(
                        span,
                        ExprKind::Index {
                            receiver: Box::new(expr),
                            index: Box::new(index),
                            closed,
                        },
                    );
                }
                _ => break,
            }
        }
        expr
    }

    /// `receiver.name`, `receiver.name(args)`, or a command chain.
    fn parse_member_suffix(&mut self, receiver: Expr) -> Expr {
        let dot = self.bump();
        let safe = matches!(dot.kind, TokenKind::SafeDot);

        // Groovy continues an expression across a line break after a dot.
        loop {
            let idx = self.sig_idx(self.pos);
            if matches!(self.token_at(idx).kind, TokenKind::Newline) {
                self.pos = idx + 1;
            } else {
                break;
            }
        }

        let name = match self.cur().kind {
            TokenKind::Ident(ref sym) => {
                let text = sym.text.clone();
                let tok = self.bump();
                Ident::new(text, tok.span)
            }
            TokenKind::Literal(ref lit) if matches!(lit.kind, crate::lexer::LitKind::Str) => {
                // Quoted method names: `receiver.'ff f'()`.
                let text = lit.symbol.text.clone();
                let tok = self.bump();
                Ident::new(text, tok.span)
            }
            _ => Ident::new("", Span::point(dot.span.end)),
        };

        if name.name.is_empty() {
            // Dangling dot; member completion target.
            let span = receiver.span.to(dot.span);
            return self.mk_expr(
                span,
                ExprKind::Property {
                    receiver: Box::new(receiver),
                    safe,
                    dot: dot.span,
                    name,
                },
            );
        }

        if matches!(self.cur().kind, TokenKind::OpenParen) {
            let args = self.parse_paren_args();
            let span = Span::new(receiver.span.start, args.span.end);
            return self.mk_expr(
                span,
                ExprKind::Call {
                    receiver: Some(Box::new(receiver)),
                    name,
                    args,
                    command: false,
                },
            );
        }

        if self.at_command_arg() {
            let args = self.parse_command_args();
            let span = Span::new(receiver.span.start, args.span.end);
            let head = self.mk_expr(
                span,
                ExprKind::Call {
                    receiver: Some(Box::new(receiver)),
                    name,
                    args,
                    command: true,
                },
            );
            return self.parse_command_chain_tail(head);
        }

        let span = receiver.span.to(name.span);
        self.mk_expr(
            span,
            ExprKind::Property {
                receiver: Box::new(receiver),
                safe,
                dot: dot.span,
                name,
            },
        )
    }

    /// `… m2 a2 m3` continuation links after a command-call head.
    fn parse_command_chain_tail(&mut self, mut expr: Expr) -> Expr {
        loop {
            let TokenKind::Ident(ref sym) = self.cur().kind else {
                break;
            };
            let text = sym.text.clone();

            let name_idx = self.sig_idx(self.pos);
            let after = self.token_at(self.sig_idx_after(name_idx)).clone();

            if matches!(after.kind, TokenKind::OpenParen) || Self::command_arg_token(&after) {
                let tok = self.bump();
                let name = Ident::new(text, tok.span);
                let (args, command) = if matches!(self.cur().kind, TokenKind::OpenParen) {
                    (self.parse_paren_args(), false)
                } else {
                    (self.parse_command_args(), true)
                };
                let span = Span::new(expr.span.start, args.span.end);
                expr = self.mk_expr(
                    span,
                    ExprKind::Call {
                        receiver: Some(Box::new(expr)),
                        name,
                        args,
                        command,
                    },
                );
            } else {
                // Trailing bare name closes the chain as a property read.
                let tok = self.bump();
                let name = Ident::new(text, tok.span);
                let span = Span::new(expr.span.start, name.span.end);
                expr = self.mk_expr(
                    span,
                    ExprKind::Property {
                        receiver: Box::new(expr),
                        safe: false,
                        dot: Span::point(name.span.start),
                        name,
                    },
                );
                break;
            }
        }
        expr
    }

    fn at_command_arg(&self) -> bool {
        Self::command_arg_token(&self.cur())
    }

    /// Tokens that can open a parenthesis-less call argument. Operators are
    /// excluded so `a.b - c` stays a binary expression.
    fn command_arg_token(tok: &Token) -> bool {
        matches!(
            tok.kind,
            TokenKind::Ident(_)
                | TokenKind::Literal(_)
                | TokenKind::OpenBracket
                | TokenKind::OpenBrace
        )
    }

    fn parse_command_args(&mut self) -> ArgList {
        let first = self.parse_expr_bp(0);
        let mut span = first.span;
        let mut args = vec![Arg {
            label: None,
            span: first.span,
            value: first,
        }];

        while matches!(self.cur().kind, TokenKind::Comma) {
            self.bump();
            let value = self.parse_expr_bp(0);
            span = span.to(value.span);
            args.push(Arg {
                label: None,
                span: value.span,
                value,
            });
        }

        ArgList {
            lparen: None,
            args,
            closed: true,
            span,
        }
    }

    // ---- grouped constructs -------------------------------------------------

    fn parse_ctor_call(&mut self) -> Expr {
        let new_kw = self.bump();

        let ty = if matches!(self.cur().kind, TokenKind::Ident(_)) {
            self.parse_type_ref()
        } else {
            self.diagnostics
                .error(Span::point(new_kw.span.end), "expected type after 'new'");
            self.placeholder_type(new_kw.span.end)
        };

        let args = if matches!(self.cur().kind, TokenKind::OpenParen) {
            self.parse_paren_args()
        } else {
            ArgList {
                lparen: None,
                args: Vec::new(),
                closed: true,
                span: Span::point(ty.span.end),
            }
        };

        let span = Span::new(new_kw.span.start, args.span.end.max(ty.span.end));
        self.mk_expr(
            span,
            ExprKind::CtorCall {
                new_kw: new_kw.span,
                ty,
                args,
            },
        )
    }

    pub(crate) fn parse_paren_args(&mut self) -> ArgList {
        let lparen = self.bump(); // '('
        self.group_depth += 1;

        let mut args = Vec::new();
        let mut closed = false;
        let mut end = lparen.span.end;

        loop {
            match self.cur().kind {
                TokenKind::CloseParen => {
                    end = self.bump().span.end;
                    closed = true;
                    break;
                }
                TokenKind::Eof => {
                    end = self.cur().span.start;
                    break;
                }
                TokenKind::Comma => {
                    end = self.bump().span.end;
                }
                _ => {
                    let label = self.parse_arg_label();
                    let value = self.parse_expr_bp(0);
                    let span = match &label {
                        Some(l) => l.span.to(value.span),
                        None => value.span,
                    };
                    end = span.end.max(end);
                    args.push(Arg { label, value, span });

                    if !matches!(
                        self.cur().kind,
                        TokenKind::Comma | TokenKind::CloseParen | TokenKind::Eof
                    ) {
                        let tok = self.bump();
                        end = tok.span.end;
                        self.diagnostics
                            .error(tok.span, "expected ',' or ')' in argument list");
                    }
                }
            }
        }

        self.group_depth -= 1;
        ArgList {
            lparen: Some(lparen.span),
            args,
            closed,
            span: Span::new(lparen.span.start, end),
        }
    }

    /// `name:` (or `'quoted name':`) argument label lookahead.
    fn parse_arg_label(&mut self) -> Option<Ident> {
        let idx = self.sig_idx(self.pos);
        let tok = self.token_at(idx);
        let text = match &tok.kind {
            TokenKind::Ident(sym) => sym.text.clone(),
            TokenKind::Literal(lit) if matches!(lit.kind, crate::lexer::LitKind::Str) => {
                lit.symbol.text.clone()
            }
            _ => return None,
        };
        if !matches!(
            self.token_at(self.sig_idx_after(idx)).kind,
            TokenKind::Colon
        ) {
            return None;
        }

        let tok = self.bump();
        self.bump(); // ':'
        Some(Ident::new(text, tok.span))
    }

    fn parse_paren_group(&mut self) -> Expr {
        let lparen = self.bump();
        self.group_depth += 1;
        let inner = self.parse_expr_bp(0);
        let mut end = inner.span.end.max(lparen.span.end);
        let mut closed = false;
        if matches!(self.cur().kind, TokenKind::CloseParen) {
            end = self.bump().span.end;
            closed = true;
        } else {
            self.diagnostics
                .error(Span::point(end), "expected ')' to close group");
        }
        self.group_depth -= 1;

        self.mk_expr(
            Span::new(lparen.span.start, end),
            ExprKind::Paren {
                inner: Box::new(inner),
                closed,
            },
        )
    }

    fn parse_list_or_map(&mut self) -> Expr {
        let open = self.bump(); // '['
        self.group_depth += 1;

        // `[:]` is the empty map.
        if matches!(self.cur().kind, TokenKind::Colon) {
            self.bump();
            let mut end = self.last_bumped_end();
            let mut closed = false;
            if matches!(self.cur().kind, TokenKind::CloseBracket) {
                end = self.bump().span.end;
                closed = true;
            }
            self.group_depth -= 1;
            return self.mk_expr(
                Span::new(open.span.start, end),
                ExprKind::MapLit {
                    entries: Vec::new(),
                    closed,
                },
            );
        }

        let mut list_items = Vec::new();
        let mut map_entries = Vec::new();
        let mut is_map = false;
        let mut first = true;
        let mut closed = false;
        let mut end = open.span.end;

        loop {
            match self.cur().kind {
                TokenKind::CloseBracket => {
                    end = self.bump().span.end;
                    closed = true;
                    break;
                }
                TokenKind::Eof => {
                    end = self.cur().span.start;
                    break;
                }
                TokenKind::Comma => {
                    end = self.bump().span.end;
                }
                _ => {
                    let label = self.parse_arg_label();
                    if first {
                        is_map = label.is_some();
                        first = false;
                    }
                    let value = self.parse_expr_bp(0);
                    end = value.span.end.max(end);
                    if is_map {
                        let span = match &label {
                            Some(l) => l.span.to(value.span),
                            None => value.span,
                        };
                        map_entries.push(Arg { label, value, span });
                    } else {
                        list_items.push(value);
                    }

                    if !matches!(
                        self.cur().kind,
                        TokenKind::Comma | TokenKind::CloseBracket | TokenKind::Eof
                    ) {
                        let tok = self.bump();
                        end = tok.span.end;
                        self.diagnostics
                            .error(tok.span, "expected ',' or ']' in literal");
                    }
                }
            }
        }

        self.group_depth -= 1;
        let span = Span::new(open.span.start, end);
        if is_map {
            self.mk_expr(
                span,
                ExprKind::MapLit {
                    entries: map_entries,
                    closed,
                },
            )
        } else {
            self.mk_expr(
                span,
                ExprKind::ListLit {
                    items: list_items,
                    closed,
                },
            )
        }
    }

    fn parse_closure(&mut self) -> Expr {
        let open = self.bump(); // '{'

        let mut params = Vec::new();
        let mut arrow = None;
        if self.closure_has_params() {
            loop {
                match self.cur().kind {
                    TokenKind::Arrow => {
                        arrow = Some(self.bump().span);
                        break;
                    }
                    TokenKind::Comma => {
                        self.bump();
                    }
                    TokenKind::Ident(_) => params.push(self.parse_param()),
                    _ => break,
                }
            }
        }

        // Closure bodies separate statements by newline even when the closure
        // sits inside an argument list.
        let saved_depth = self.group_depth;
        self.group_depth = 0;

        let mut body = Vec::new();
        let mut closed = false;
        let end;
        loop {
            self.skip_terminators();
            match self.cur().kind {
                TokenKind::CloseBrace => {
                    end = self.bump().span.end;
                    closed = true;
                    break;
                }
                TokenKind::Eof => {
                    end = self.cur().span.start;
                    break;
                }
                _ => body.push(self.parse_stmt()),
            }
        }

        self.group_depth = saved_depth;

        self.mk_expr(
            Span::new(open.span.start, end),
            ExprKind::Closure {
                params,
                arrow,
                body,
                closed,
            },
        )
    }

    /// Looks for `->` on the closure's first line to decide whether a
    /// parameter list precedes the body.
    fn closure_has_params(&self) -> bool {
        let mut idx = self.sig_idx(self.pos);
        loop {
            match self.token_at(idx).kind {
                TokenKind::Arrow => return true,
                TokenKind::Ident(_)
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::OpenBracket
                | TokenKind::CloseBracket
                | TokenKind::Lt
                | TokenKind::Gt => {
                    idx = self.sig_idx_after(idx);
                }
                _ => return false,
            }
        }
    }

    fn recover_from_infix(&mut self, op_tok: &Token) -> Expr {
        let at = self.cur().span.start;
        self.diagnostics.error(
            Span::point(at),
            format!("expected expression after {:?}", op_tok.kind),
        );
        self.error_expr_at(Span::point(at))
    }
}
