//! Position-to-location classification.
//!
//! `classify` maps a cursor offset to exactly one [`AssistLocation`], the
//! completion prefix, and the enclosing declaration. Declaration headers are
//! classified from the recovered AST; expression-level positions (member
//! access, open argument lists) combine AST walks with token-neighbor checks
//! so they survive arbitrarily broken input.

use analyzer::ast::{
    ArgList, ClassDecl, Expr, ExprKind, Ident, Member, MethodDecl, Module, Stmt, StmtKind, TypeRef,
};
use analyzer::{LitKind, ParseOutput, Span, Token, TokenKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistLocation {
    Script,
    Statement,
    Expression,
    MethodContext,
    Import,
    Package,
    ClassBody,
    Extends,
    Implements,
    Parameter,
    Exceptions,
}

/// What kind of declaration encloses the offset. Drives local-variable
/// visibility and the extension-method allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnclosingKind {
    ScriptTop,
    ClassBody,
    MethodBody,
    CtorBody,
    ClosureBody,
    FieldInit,
    ParamList,
    Header,
}

#[derive(Debug, Clone, Copy)]
pub enum CallTarget<'a> {
    Ctor(&'a TypeRef),
    Method {
        receiver: Option<&'a Expr>,
        name: &'a Ident,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    pub target: CallTarget<'a>,
    pub args: &'a ArgList,
    pub arg_index: usize,
}

#[derive(Debug)]
pub struct AssistContext<'a> {
    pub source: &'a str,
    pub offset: u32,
    pub prefix: String,
    pub prefix_span: Span,
    pub location: AssistLocation,
    pub enclosing: EnclosingKind,
    pub enclosing_class: Option<&'a ClassDecl>,
    pub enclosing_method: Option<&'a MethodDecl>,
    pub enclosing_closure: Option<&'a Expr>,
    /// Member-access target for `Expression` (the `Property`/`Call` node
    /// whose name is being completed).
    pub target: Option<&'a Expr>,
    pub call: Option<CallSite<'a>>,
    pub in_string: bool,
    pub module: &'a Module,
    pub tokens: &'a [Token],
}

pub fn classify<'a>(source: &'a str, parse: &'a ParseOutput, offset: u32) -> AssistContext<'a> {
    let offset = offset.min(source.len() as u32);
    let module = &parse.module;
    let tokens = parse.tokens.as_slice();

    let prefix_span = completion_prefix_span(source, offset);
    let prefix = prefix_span.text(source).unwrap_or("").to_string();
    let in_string = inside_string_literal(tokens, offset);

    let mut ctx = AssistContext {
        source,
        offset,
        prefix,
        prefix_span,
        location: AssistLocation::Statement,
        enclosing: EnclosingKind::ScriptTop,
        enclosing_class: None,
        enclosing_method: None,
        enclosing_closure: None,
        target: None,
        call: None,
        in_string,
        module,
        tokens,
    };

    // Module headers first: dotted names in them must not look like member
    // access.
    if let Some(package) = &module.package
        && region_contains(package.header_span, offset)
    {
        ctx.location = AssistLocation::Package;
        ctx.enclosing = EnclosingKind::Header;
        return ctx;
    }
    for import in &module.imports {
        if region_contains(import.header_span, offset) {
            ctx.location = AssistLocation::Import;
            ctx.enclosing = EnclosingKind::Header;
            return ctx;
        }
    }

    for class in &module.classes {
        if class.span.touches(offset) {
            classify_in_class(&mut ctx, class);
            return ctx;
        }
    }

    // Script level.
    if let Some(closure) = innermost_closure(module, offset) {
        ctx.enclosing = EnclosingKind::ClosureBody;
        ctx.enclosing_closure = Some(closure);
        if let Some(location) = closure_param_location(closure, offset) {
            ctx.location = location;
            ctx.enclosing = EnclosingKind::ParamList;
            return ctx;
        }
    }
    classify_code(&mut ctx);
    if ctx.location == AssistLocation::Statement && ctx.enclosing == EnclosingKind::ScriptTop {
        ctx.location = script_or_statement(tokens, offset);
    }
    ctx
}

fn classify_in_class<'a>(ctx: &mut AssistContext<'a>, class: &'a ClassDecl) {
    ctx.enclosing_class = Some(class);
    ctx.enclosing = EnclosingKind::ClassBody;
    ctx.location = AssistLocation::ClassBody;
    let offset = ctx.offset;

    let body_start = class
        .body_span
        .map(|s| s.start)
        .unwrap_or(class.span.end);

    if let Some(kw) = class.extends_kw {
        let end = class.implements_kw.map(|s| s.start).unwrap_or(body_start);
        if kw.end <= offset && offset <= end {
            ctx.location = AssistLocation::Extends;
            ctx.enclosing = EnclosingKind::Header;
            return;
        }
    }
    if let Some(kw) = class.implements_kw
        && kw.end <= offset
        && offset <= body_start
    {
        ctx.location = AssistLocation::Implements;
        ctx.enclosing = EnclosingKind::Header;
        return;
    }

    let Some(body) = class.body_span else {
        return;
    };
    let inside_body = offset > body.start
        && if class.body_closed {
            offset < body.end
        } else {
            offset <= body.end
        };
    if !inside_body {
        return;
    }

    let member = class.members.iter().find(|m| m.span().touches(offset));
    match member {
        Some(Member::Field(field)) => {
            if let Some(init) = &field.init
                && init.span.touches(offset)
            {
                ctx.enclosing = EnclosingKind::FieldInit;
                classify_member_code(ctx, offset);
                return;
            }
            // Inside the declaration itself (modifiers, type, name).
        }
        Some(Member::Method(method)) => {
            ctx.enclosing_method = Some(method);

            let params = &method.params;
            let inner_start = params.lparen.end;
            let inner_end = if params.closed {
                params.span.end.saturating_sub(1)
            } else {
                params.span.end
            };
            if offset >= inner_start && offset <= inner_end {
                for param in &params.params {
                    if let Some((eq, value)) = &param.default
                        && eq.end <= offset
                        && offset <= value.span.end.max(eq.end)
                    {
                        // Default values are ordinary expressions.
                        ctx.enclosing = EnclosingKind::ParamList;
                        ctx.location = AssistLocation::Statement;
                        classify_member_code(ctx, offset);
                        return;
                    }
                }
                ctx.location = AssistLocation::Parameter;
                ctx.enclosing = EnclosingKind::ParamList;
                return;
            }

            if let Some(kw) = method.throws_kw {
                let end = method
                    .body
                    .as_ref()
                    .map(|b| b.span.start)
                    .unwrap_or(method.span.end);
                if kw.end <= offset && offset <= end {
                    ctx.location = AssistLocation::Exceptions;
                    ctx.enclosing = EnclosingKind::Header;
                    return;
                }
            }

            if let Some(body) = &method.body {
                let inside = offset > body.span.start
                    && if body.closed {
                        offset < body.span.end
                    } else {
                        offset <= body.span.end
                    };
                if inside {
                    ctx.enclosing = if method.is_ctor {
                        EnclosingKind::CtorBody
                    } else {
                        EnclosingKind::MethodBody
                    };
                    classify_member_code(ctx, offset);
                    return;
                }
            }
        }
        None => {}
    }
}

/// Code classification inside a member (body or initializer): closures may
/// tighten the enclosing kind, then expression/argument positions apply.
fn classify_member_code<'a>(ctx: &mut AssistContext<'a>, offset: u32) {
    if let Some(closure) = innermost_closure(ctx.module, offset) {
        if let Some(location) = closure_param_location(closure, offset) {
            ctx.location = location;
            ctx.enclosing = EnclosingKind::ParamList;
            ctx.enclosing_closure = Some(closure);
            return;
        }
        ctx.enclosing = EnclosingKind::ClosureBody;
        ctx.enclosing_closure = Some(closure);
    }
    ctx.location = AssistLocation::Statement;
    classify_code(ctx);
}

/// Shared expression-level classification: member access wins over open
/// argument lists, which win over plain statement positions.
fn classify_code<'a>(ctx: &mut AssistContext<'a>) {
    let prefix_start = ctx.prefix_span.start;

    // Token check catches dots under broken input; the AST target also
    // covers command-chain tails, whose links have no literal dot.
    let target = member_access_target(ctx.module, ctx.offset);
    if member_access_dot(ctx.tokens, prefix_start).is_some() || target.is_some() {
        ctx.location = AssistLocation::Expression;
        ctx.target = target;
        return;
    }

    if let Some(call) = innermost_open_call(ctx.module, ctx.offset) {
        ctx.location = AssistLocation::MethodContext;
        ctx.call = Some(call);
        return;
    }

    ctx.location = AssistLocation::Statement;
}

// ---- prefix and token helpers ----------------------------------------------

/// The partial identifier immediately before the cursor.
fn completion_prefix_span(source: &str, offset: u32) -> Span {
    let offset = (offset as usize).min(source.len());
    let mut start = offset;
    for (idx, ch) in source[..offset].char_indices().rev() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' || !ch.is_ascii() {
            start = idx;
        } else {
            break;
        }
    }
    Span::new(start as u32, offset as u32)
}

fn inside_string_literal(tokens: &[Token], offset: u32) -> bool {
    tokens.iter().any(|t| {
        matches!(&t.kind, TokenKind::Literal(lit) if lit.kind == LitKind::Str)
            && t.span.start < offset
            && offset < t.span.end
    })
}

fn is_receiver_atom(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Literal(_)
            | TokenKind::CloseParen
            | TokenKind::CloseBracket
    )
}

/// Token index of the `.`/`?.` that makes `prefix_start` a member-access
/// position. Skips trivia (including newlines) between the dot and the
/// cursor, and requires a receiver atom before the dot.
pub(crate) fn member_access_dot(tokens: &[Token], prefix_start: u32) -> Option<usize> {
    let mut dot_idx = None;
    for (idx, token) in tokens.iter().enumerate() {
        if token.is_trivia() || token.is_eof() {
            continue;
        }
        if token.span.end > prefix_start {
            break;
        }
        dot_idx = Some(idx);
    }
    let dot_idx = dot_idx?;
    if !matches!(
        tokens[dot_idx].kind,
        TokenKind::Dot | TokenKind::SafeDot
    ) {
        return None;
    }

    let receiver = tokens[..dot_idx]
        .iter()
        .rev()
        .find(|t| !t.is_trivia() && !t.is_eof())?;
    is_receiver_atom(&receiver.kind).then_some(dot_idx)
}

/// `Script` only while nothing but whitespace precedes the offset; any
/// earlier token (even the identifier being typed) makes it `Statement`.
/// The one-character-buffer consequence of this rule is deliberate.
fn script_or_statement(tokens: &[Token], offset: u32) -> AssistLocation {
    let preceded = tokens.iter().any(|t| {
        !matches!(t.kind, TokenKind::Newline | TokenKind::Eof) && t.span.start < offset
    });
    if preceded {
        AssistLocation::Statement
    } else {
        AssistLocation::Script
    }
}

// ---- AST walking -----------------------------------------------------------

pub(crate) fn walk_module_exprs<'a>(module: &'a Module, f: &mut dyn FnMut(&'a Expr)) {
    for stmt in &module.script {
        walk_stmt(stmt, f);
    }
    for class in &module.classes {
        for member in &class.members {
            match member {
                Member::Field(field) => {
                    if let Some(init) = &field.init {
                        walk_expr(init, f);
                    }
                }
                Member::Method(method) => {
                    for param in &method.params.params {
                        if let Some((_, default)) = &param.default {
                            walk_expr(default, f);
                        }
                    }
                    if let Some(body) = &method.body {
                        for stmt in &body.stmts {
                            walk_stmt(stmt, f);
                        }
                    }
                }
            }
        }
    }
}

pub(crate) fn walk_stmt<'a>(stmt: &'a Stmt, f: &mut dyn FnMut(&'a Expr)) {
    match &stmt.kind {
        StmtKind::VarDecl { init, .. } => {
            if let Some(init) = init {
                walk_expr(init, f);
            }
        }
        StmtKind::Assign { target, value } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        StmtKind::Expr(expr) => walk_expr(expr, f),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                walk_expr(value, f);
            }
        }
        StmtKind::Error => {}
    }
}

pub(crate) fn walk_expr<'a>(expr: &'a Expr, f: &mut dyn FnMut(&'a Expr)) {
    f(expr);
    match &expr.kind {
        ExprKind::Property { receiver, .. } => walk_expr(receiver, f),
        ExprKind::Index {
            receiver, index, ..
        } => {
            walk_expr(receiver, f);
            walk_expr(index, f);
        }
        ExprKind::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                walk_expr(receiver, f);
            }
            for arg in &args.args {
                walk_expr(&arg.value, f);
            }
        }
        ExprKind::CtorCall { args, .. } => {
            for arg in &args.args {
                walk_expr(&arg.value, f);
            }
        }
        ExprKind::Closure { params, body, .. } => {
            for param in params {
                if let Some((_, default)) = &param.default {
                    walk_expr(default, f);
                }
            }
            for stmt in body {
                walk_stmt(stmt, f);
            }
        }
        ExprKind::ListLit { items, .. } => {
            for item in items {
                walk_expr(item, f);
            }
        }
        ExprKind::MapLit { entries, .. } => {
            for entry in entries {
                walk_expr(&entry.value, f);
            }
        }
        ExprKind::Unary { expr, .. } => walk_expr(expr, f),
        ExprKind::Binary { left, right, .. } => {
            walk_expr(left, f);
            walk_expr(right, f);
        }
        ExprKind::Paren { inner, .. } => walk_expr(inner, f),
        ExprKind::Lit(_) | ExprKind::Var(_) | ExprKind::Error => {}
    }
}

/// The `Property`/`Call` node whose member name is being completed.
fn member_access_target<'a>(module: &'a Module, offset: u32) -> Option<&'a Expr> {
    let mut named: Option<&'a Expr> = None;
    let mut dangling: Option<&'a Expr> = None;

    walk_module_exprs(module, &mut |expr| match &expr.kind {
        ExprKind::Property { name, dot, .. } => {
            if !name.name.is_empty() && name.span.touches(offset) {
                // Innermost/rightmost name wins.
                if named.is_none_or(|prev| name_span(prev).start <= name.span.start) {
                    named = Some(expr);
                }
            } else if name.name.is_empty() && dot.end <= offset {
                if dangling.is_none_or(|prev| dangling_dot_end(prev) <= dot.end) {
                    dangling = Some(expr);
                }
            }
        }
        ExprKind::Call {
            receiver: Some(_),
            name,
            ..
        } => {
            if name.span.touches(offset)
                && named.is_none_or(|prev| name_span(prev).start <= name.span.start)
            {
                named = Some(expr);
            }
        }
        _ => {}
    });

    named.or(dangling)
}

fn name_span(expr: &Expr) -> Span {
    match &expr.kind {
        ExprKind::Property { name, .. } | ExprKind::Call { name, .. } => name.span,
        _ => expr.span,
    }
}

fn dangling_dot_end(expr: &Expr) -> u32 {
    match &expr.kind {
        ExprKind::Property { dot, .. } => dot.end,
        _ => 0,
    }
}

/// The innermost parenthesized argument list whose open region contains the
/// offset, with its call target.
fn innermost_open_call<'a>(module: &'a Module, offset: u32) -> Option<CallSite<'a>> {
    let mut best: Option<(u32, CallSite<'a>)> = None;

    walk_module_exprs(module, &mut |expr| {
        let (target, args) = match &expr.kind {
            ExprKind::Call {
                receiver,
                name,
                args,
                ..
            } => (
                CallTarget::Method {
                    receiver: receiver.as_deref(),
                    name,
                },
                args,
            ),
            ExprKind::CtorCall { ty, args, .. } => (CallTarget::Ctor(ty), args),
            _ => return,
        };
        let Some(lparen) = args.lparen else {
            return;
        };

        let in_open_region = offset >= lparen.end
            && if args.closed {
                offset <= args.span.end.saturating_sub(1)
            } else {
                offset <= args.span.end
            };
        if !in_open_region {
            return;
        }

        let arg_index = args.args.iter().filter(|a| a.span.end < offset).count();
        if best.is_none_or(|(start, _)| start <= lparen.start) {
            best = Some((
                lparen.start,
                CallSite {
                    target,
                    args,
                    arg_index,
                },
            ));
        }
    });

    best.map(|(_, call)| call)
}

fn innermost_closure<'a>(module: &'a Module, offset: u32) -> Option<&'a Expr> {
    let mut best: Option<&'a Expr> = None;
    walk_module_exprs(module, &mut |expr| {
        let ExprKind::Closure { closed, .. } = &expr.kind else {
            return;
        };
        let inside = offset > expr.span.start
            && if *closed {
                offset < expr.span.end
            } else {
                offset <= expr.span.end
            };
        if inside && best.is_none_or(|prev| prev.span.start <= expr.span.start) {
            best = Some(expr);
        }
    });
    best
}

/// `Parameter` when the offset sits in a closure's parameter list (before
/// the `->`).
fn closure_param_location(closure: &Expr, offset: u32) -> Option<AssistLocation> {
    let ExprKind::Closure { arrow, .. } = &closure.kind else {
        return None;
    };
    let arrow = (*arrow)?;
    (closure.span.start < offset && offset <= arrow.start).then_some(AssistLocation::Parameter)
}

fn region_contains(region: Span, offset: u32) -> bool {
    region.start <= offset && offset <= region.end
}
