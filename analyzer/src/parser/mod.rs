//! Tolerant parser for the Groovy-flavored grammar.
//!
//! Inputs: lexer tokens including trivia and an explicit EOF token. Spans are
//! UTF-8 byte offsets into the original source, half-open `[start, end)`.
//!
//! The parser never fails: malformed regions produce `Error` nodes or
//! incomplete-marked nodes (`closed: false`, placeholder names) and the
//! parser resynchronizes at the next statement boundary. Content assist runs
//! on every keystroke, so broken input is the common case, not the exception.

pub mod ast;
mod expr;
mod stmt;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::lexer::{NodeId, Token, TokenKind, is_modifier_word};
use crate::span::Span;
use ast::{
    ClassDecl, ClassKind, Expr, ExprKind, Ident, ImportDecl, Member, Modifier, Modifiers, Module,
    PackageDecl, QualifiedName, TypeRef,
};

#[derive(Debug)]
pub struct ParseOutput {
    pub module: Module,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    next_id: NodeId,
    /// Paren/bracket nesting depth. Newlines are trivia inside groups and
    /// statement separators outside them.
    group_depth: u32,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            next_id: 0,
            group_depth: 0,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn parse_module(mut self) -> ParseOutput {
        let mut package = None;
        let mut imports = Vec::new();
        let mut classes = Vec::new();
        let mut script = Vec::new();

        loop {
            self.skip_terminators();
            let tok = self.cur();
            if tok.is_eof() {
                break;
            }

            if tok.is_kw("package") {
                let decl = self.parse_package();
                if package.is_none() {
                    package = Some(decl);
                } else {
                    self.diagnostics
                        .error(decl.span, "duplicate package declaration");
                }
            } else if tok.is_kw("import") {
                imports.push(self.parse_import());
            } else if self.at_class_decl() {
                classes.push(self.parse_class_decl());
            } else {
                script.push(self.parse_stmt());
            }
        }

        let end = self.source.len() as u32;
        ParseOutput {
            module: Module {
                package,
                imports,
                classes,
                script,
                span: Span::new(0, end),
            },
            diagnostics: std::mem::take(&mut self.diagnostics.diags),
            tokens: self.tokens,
        }
    }

    // ---- token cursor -------------------------------------------------------

    fn skippable(&self, tok: &Token) -> bool {
        match tok.kind {
            TokenKind::LineComment(_) | TokenKind::BlockComment(_) => true,
            TokenKind::Newline => self.group_depth > 0,
            _ => false,
        }
    }

    fn sig_idx(&self, mut idx: usize) -> usize {
        while idx < self.tokens.len() && self.skippable(&self.tokens[idx]) {
            idx += 1;
        }
        idx.min(self.tokens.len().saturating_sub(1))
    }

    fn cur(&self) -> Token {
        self.tokens[self.sig_idx(self.pos)].clone()
    }

    fn bump(&mut self) -> Token {
        let idx = self.sig_idx(self.pos);
        let tok = self.tokens[idx].clone();
        self.pos = idx + 1;
        tok
    }

    /// Next significant token index after `idx`, honoring the current
    /// newline-skipping mode. Used for bounded lookahead.
    fn sig_idx_after(&self, idx: usize) -> usize {
        self.sig_idx(idx + 1)
    }

    fn token_at(&self, idx: usize) -> &Token {
        &self.tokens[idx.min(self.tokens.len() - 1)]
    }

    fn last_bumped_end(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn at_terminator(&self) -> bool {
        matches!(
            self.cur().kind,
            TokenKind::Newline | TokenKind::Semi | TokenKind::CloseBrace | TokenKind::Eof
        )
    }

    fn skip_terminators(&mut self) {
        loop {
            match self.cur().kind {
                TokenKind::Newline | TokenKind::Semi => {
                    self.pos = self.sig_idx(self.pos) + 1;
                }
                _ => break,
            }
        }
    }

    /// Consume tokens up to (not including) the next statement boundary.
    /// Returns the recovered region, if any tokens were skipped.
    fn recover_to_stmt_end(&mut self) -> Option<Span> {
        let mut region: Option<Span> = None;
        while !self.at_terminator() {
            let tok = self.bump();
            region = Some(match region {
                Some(r) => r.to(tok.span),
                None => tok.span,
            });
        }
        region
    }

    fn mk_expr(&mut self, span: Span, kind: ExprKind) -> Expr {
        let id = self.next_id;
        self.next_id += 1;
        Expr { id, span, kind }
    }

    fn error_expr_at(&mut self, span: Span) -> Expr {
        self.mk_expr(span, ExprKind::Error)
    }

    // ---- names and types ----------------------------------------------------

    /// Parses `a.b.c`, tolerating a trailing dot (`import java.util.` keeps
    /// the dot inside the span so the position classifier can see it).
    fn parse_qualified_name(&mut self) -> QualifiedName {
        let mut segments = Vec::new();
        let mut span = Span::point(self.cur().span.start);

        loop {
            let tok = self.cur();
            let TokenKind::Ident(ref sym) = tok.kind else {
                break;
            };
            let text = sym.text.clone();
            self.bump();
            if segments.is_empty() {
                span = tok.span;
            } else {
                span = span.to(tok.span);
            }
            segments.push(Ident::new(text, tok.span));

            if matches!(self.cur().kind, TokenKind::Dot) {
                let dot = self.bump();
                span = span.to(dot.span);
                if !matches!(self.cur().kind, TokenKind::Ident(_)) {
                    break;
                }
            } else {
                break;
            }
        }

        QualifiedName { segments, span }
    }

    fn parse_type_ref(&mut self) -> TypeRef {
        let name = self.parse_qualified_name();
        let mut span = name.span;
        let mut array_dims = 0u8;

        // `Type[]` suffixes; only a paired `[]` counts.
        while matches!(self.cur().kind, TokenKind::OpenBracket) {
            let open_idx = self.sig_idx(self.pos);
            let close_idx = self.sig_idx_after(open_idx);
            if !matches!(self.token_at(close_idx).kind, TokenKind::CloseBracket) {
                break;
            }
            self.bump();
            let close = self.bump();
            span = span.to(close.span);
            array_dims = array_dims.saturating_add(1);
        }

        // Tolerate a generic argument group after the name (`List<String>`);
        // the arguments themselves do not survive into the AST.
        if !name.is_empty() && matches!(self.cur().kind, TokenKind::Lt) {
            let mut depth = 0u32;
            loop {
                match self.cur().kind {
                    TokenKind::Lt => {
                        depth += 1;
                        span = span.to(self.bump().span);
                    }
                    TokenKind::Gt => {
                        span = span.to(self.bump().span);
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    TokenKind::Newline | TokenKind::Eof | TokenKind::OpenParen => break,
                    _ => {
                        span = span.to(self.bump().span);
                    }
                }
            }
        }

        TypeRef {
            name,
            array_dims,
            span,
        }
    }

    /// Placeholder type at an insertion point (recovery).
    fn placeholder_type(&self, offset: u32) -> TypeRef {
        TypeRef {
            name: QualifiedName::default(),
            array_dims: 0,
            span: Span::point(offset),
        }
    }

    // ---- module-level declarations ------------------------------------------

    fn parse_package(&mut self) -> PackageDecl {
        let kw = self.bump();
        let name = self.parse_qualified_name();
        let mut span = kw.span.to(name.span);
        if name.is_empty() {
            span = kw.span;
        }

        let terminator_start = self.header_terminator_start();
        if matches!(self.cur().kind, TokenKind::Semi) {
            span = span.to(self.bump().span);
        }

        PackageDecl {
            name,
            header_span: Span::new(kw.span.end, terminator_start),
            span,
        }
    }

    fn parse_import(&mut self) -> ImportDecl {
        let kw = self.bump();
        let mut is_static = false;
        if self.cur().is_kw("static") {
            is_static = true;
            self.bump();
        }

        let name = self.parse_qualified_name();
        let mut span = if name.is_empty() {
            kw.span
        } else {
            kw.span.to(name.span)
        };

        // For `import a.b.*` the trailing dot is already inside `name.span`.
        let mut wildcard = false;
        if matches!(self.cur().kind, TokenKind::Star) {
            wildcard = true;
            span = span.to(self.bump().span);
        }

        let mut alias = None;
        if self.cur().is_kw("as") {
            self.bump();
            if let TokenKind::Ident(sym) = self.cur().kind {
                let tok = self.bump();
                span = span.to(tok.span);
                alias = Some(Ident::new(sym.text, tok.span));
            }
        }

        let terminator_start = self.header_terminator_start();
        let mut has_semi = false;
        if matches!(self.cur().kind, TokenKind::Semi) {
            has_semi = true;
            span = span.to(self.bump().span);
        }

        ImportDecl {
            is_static,
            name,
            wildcard,
            alias,
            has_semi,
            header_span: Span::new(kw.span.end, terminator_start),
            span,
        }
    }

    /// Start offset of the `;`, newline, or EOF that ends the current header.
    fn header_terminator_start(&self) -> u32 {
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            let tok = &self.tokens[idx];
            match tok.kind {
                TokenKind::Newline | TokenKind::Semi | TokenKind::Eof => return tok.span.start,
                TokenKind::LineComment(_) | TokenKind::BlockComment(_) => idx += 1,
                _ => idx += 1,
            }
        }
        self.source.len() as u32
    }

    fn at_class_decl(&self) -> bool {
        let mut idx = self.sig_idx(self.pos);
        loop {
            let tok = self.token_at(idx);
            match tok.ident_text() {
                Some("class") | Some("interface") => return true,
                Some(word) if is_modifier_word(word) => {
                    idx = self.sig_idx_after(idx);
                }
                _ => return false,
            }
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            let tok = self.cur();
            let Some(word) = tok.ident_text() else { break };
            let Some(modifier) = Modifier::from_word(word) else {
                break;
            };
            // `def x` at a field/statement start is a modifier only when a
            // name (or another modifier) follows; `def` alone stays a name.
            self.bump();
            modifiers.list.push((modifier, tok.span));
            if !matches!(self.cur().kind, TokenKind::Ident(_)) {
                break;
            }
        }
        modifiers
    }

    fn parse_class_decl(&mut self) -> ClassDecl {
        let start = self.cur().span.start;
        let _modifiers = self.parse_modifiers();

        let kw = self.bump(); // `class` / `interface`
        let kind = if kw.is_kw("interface") {
            ClassKind::Interface
        } else {
            ClassKind::Class
        };

        let name = match self.cur().kind {
            TokenKind::Ident(ref sym) => {
                let tok = self.bump();
                Ident::new(sym.text.clone(), tok.span)
            }
            _ => {
                self.diagnostics
                    .error(Span::point(kw.span.end), "expected class name");
                Ident::new("", Span::point(kw.span.end))
            }
        };

        let mut extends_kw = None;
        let mut extends = None;
        if self.cur().is_kw("extends") {
            let tok = self.bump();
            extends_kw = Some(tok.span);
            let ty = if matches!(self.cur().kind, TokenKind::Ident(_)) {
                self.parse_type_ref()
            } else {
                self.placeholder_type(tok.span.end)
            };
            extends = Some(ty);
        }

        let mut implements_kw = None;
        let mut implements = Vec::new();
        if self.cur().is_kw("implements") {
            let tok = self.bump();
            implements_kw = Some(tok.span);
            loop {
                if matches!(self.cur().kind, TokenKind::Ident(_)) {
                    implements.push(self.parse_type_ref());
                } else {
                    implements.push(self.placeholder_type(self.last_bumped_end()));
                    break;
                }
                if matches!(self.cur().kind, TokenKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        let mut members = Vec::new();
        let mut body_span = None;
        let mut body_closed = false;
        let mut end = self.last_bumped_end();

        // Allow a line break between the header and `{`.
        while matches!(self.cur().kind, TokenKind::Newline) {
            self.pos = self.sig_idx(self.pos) + 1;
        }

        if matches!(self.cur().kind, TokenKind::OpenBrace) {
            let open = self.bump();
            loop {
                self.skip_terminators();
                match self.cur().kind {
                    TokenKind::CloseBrace => {
                        let close = self.bump();
                        body_span = Some(open.span.to(close.span));
                        body_closed = true;
                        end = close.span.end;
                        break;
                    }
                    TokenKind::Eof => {
                        let eof = self.cur().span.start;
                        body_span = Some(Span::new(open.span.start, eof));
                        end = eof;
                        break;
                    }
                    _ => {
                        if let Some(member) = self.parse_member(&name) {
                            members.push(member);
                        }
                    }
                }
            }
        } else {
            self.diagnostics
                .error(Span::point(end), "expected '{' to open class body");
        }

        ClassDecl {
            kind,
            name,
            extends_kw,
            extends,
            implements_kw,
            implements,
            body_span,
            body_closed,
            members,
            span: Span::new(start, end),
        }
    }

    fn parse_member(&mut self, class_name: &Ident) -> Option<Member> {
        let start = self.cur().span.start;
        let modifiers = self.parse_modifiers();

        if !matches!(self.cur().kind, TokenKind::Ident(_)) {
            // Nothing member-like here; skip the line rather than loop.
            if modifiers.list.is_empty() {
                let tok = self.cur();
                self.diagnostics
                    .error(tok.span, "expected class member declaration");
                self.recover_to_stmt_end();
                return None;
            }
            // Dangling modifiers (someone is mid-typing a declaration).
            let span = Span::new(start, self.last_bumped_end());
            return Some(Member::Field(ast::FieldDecl {
                modifiers,
                ty: None,
                name: Ident::new("", Span::point(span.end)),
                init: None,
                span,
            }));
        }

        // First name-shaped thing: either the type or the member name.
        let first = self.parse_type_ref();

        match self.cur().kind {
            TokenKind::Ident(ref sym) => {
                // `Type name …`
                let name_tok = self.bump();
                let name = Ident::new(sym.text.clone(), name_tok.span);
                if matches!(self.cur().kind, TokenKind::OpenParen) {
                    Some(Member::Method(self.parse_method_rest(
                        start,
                        modifiers,
                        Some(first),
                        name,
                        false,
                    )))
                } else {
                    Some(Member::Field(self.parse_field_rest(
                        start,
                        modifiers,
                        Some(first),
                        name,
                    )))
                }
            }
            TokenKind::OpenParen => {
                // `name(...)` is a constructor when the name matches the class.
                let name = match first.name.segments.last() {
                    Some(seg) => seg.clone(),
                    None => Ident::new("", Span::point(first.span.end)),
                };
                let is_ctor = name.name == class_name.name;
                Some(Member::Method(self.parse_method_rest(
                    start, modifiers, None, name, is_ctor,
                )))
            }
            _ => {
                // `def name` or a bare property name.
                let name = match first.name.segments.last() {
                    Some(seg) => seg.clone(),
                    None => Ident::new("", Span::point(first.span.end)),
                };
                Some(Member::Field(
                    self.parse_field_rest(start, modifiers, None, name),
                ))
            }
        }
    }

    fn parse_field_rest(
        &mut self,
        start: u32,
        modifiers: Modifiers,
        ty: Option<TypeRef>,
        name: Ident,
    ) -> ast::FieldDecl {
        let mut init = None;
        if matches!(self.cur().kind, TokenKind::Assign) {
            self.bump();
            init = Some(self.parse_expr());
        }
        let end = init
            .as_ref()
            .map(|e| e.span.end)
            .unwrap_or(name.span.end.max(self.last_bumped_end()));

        if !self.at_terminator() {
            let tok = self.cur();
            self.diagnostics.error(
                tok.span,
                format!("unexpected token {:?} after field declaration", tok.kind),
            );
            self.recover_to_stmt_end();
        }

        ast::FieldDecl {
            modifiers,
            ty,
            name,
            init,
            span: Span::new(start, end),
        }
    }

    fn parse_method_rest(
        &mut self,
        start: u32,
        modifiers: Modifiers,
        return_ty: Option<TypeRef>,
        name: Ident,
        is_ctor: bool,
    ) -> ast::MethodDecl {
        let params = self.parse_param_list();

        let mut throws_kw = None;
        let mut throws = Vec::new();
        if self.cur().is_kw("throws") {
            let tok = self.bump();
            throws_kw = Some(tok.span);
            loop {
                if matches!(self.cur().kind, TokenKind::Ident(_)) {
                    throws.push(self.parse_type_ref());
                } else {
                    throws.push(self.placeholder_type(self.last_bumped_end()));
                    break;
                }
                if matches!(self.cur().kind, TokenKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        // Allow a line break before the body brace.
        while matches!(self.cur().kind, TokenKind::Newline) {
            let idx = self.sig_idx(self.pos);
            if !matches!(
                self.token_at(self.sig_idx_after(idx)).kind,
                TokenKind::OpenBrace
            ) {
                break;
            }
            self.pos = idx + 1;
        }

        let body = if matches!(self.cur().kind, TokenKind::OpenBrace) {
            Some(self.parse_block())
        } else {
            None
        };

        let end = body
            .as_ref()
            .map(|b| b.span.end)
            .unwrap_or(self.last_bumped_end());

        ast::MethodDecl {
            modifiers,
            return_ty,
            name,
            is_ctor,
            params,
            throws_kw,
            throws,
            body,
            span: Span::new(start, end),
        }
    }

    fn parse_param_list(&mut self) -> ast::ParamList {
        let lparen = self.bump(); // '('
        self.group_depth += 1;

        let mut params = Vec::new();
        let mut closed = false;
        let mut end = lparen.span.end;

        loop {
            match self.cur().kind {
                TokenKind::CloseParen => {
                    let close = self.bump();
                    end = close.span.end;
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
                TokenKind::Ident(_) => {
                    let param = self.parse_param();
                    end = param.span.end;
                    params.push(param);
                }
                _ => {
                    let tok = self.bump();
                    end = tok.span.end;
                    self.diagnostics
                        .error(tok.span, "expected parameter declaration");
                }
            }
        }

        self.group_depth -= 1;
        ast::ParamList {
            lparen: lparen.span,
            params,
            closed,
            span: Span::new(lparen.span.start, end),
        }
    }

    pub(crate) fn parse_param(&mut self) -> ast::Param {
        let first = self.parse_type_ref();
        let (ty, name) = match self.cur().kind {
            TokenKind::Ident(ref sym) => {
                let tok = self.bump();
                (Some(first), Ident::new(sym.text.clone(), tok.span))
            }
            _ => {
                let name = match first.name.segments.last() {
                    Some(seg) => seg.clone(),
                    None => Ident::new("", Span::point(first.span.end)),
                };
                (None, name)
            }
        };

        let mut span = ty
            .as_ref()
            .map(|t| t.span.to(name.span))
            .unwrap_or(name.span);

        let mut default = None;
        if matches!(self.cur().kind, TokenKind::Assign) {
            let eq = self.bump();
            let value = self.parse_expr();
            span = span.to(value.span);
            default = Some((eq.span, value));
        }

        ast::Param {
            ty,
            name,
            default,
            span,
        }
    }

    fn parse_block(&mut self) -> ast::Block {
        let open = self.bump(); // '{'
        let mut stmts = Vec::new();
        let mut closed = false;
        let end;

        loop {
            self.skip_terminators();
            match self.cur().kind {
                TokenKind::CloseBrace => {
                    let close = self.bump();
                    end = close.span.end;
                    closed = true;
                    break;
                }
                TokenKind::Eof => {
                    end = self.cur().span.start;
                    break;
                }
                _ => stmts.push(self.parse_stmt()),
            }
        }

        ast::Block {
            stmts,
            closed,
            span: Span::new(open.span.start, end),
        }
    }
}
