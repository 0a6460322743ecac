//! Symbol resolution: visible bindings for a classified position, receiver
//! member lookup, and the extended-context index used for parameter guessing.
//!
//! Resolution is read-only against the oracle snapshot and fully request
//! scoped. Unresolvable supertypes degrade to "no inherited bindings";
//! self-referential variable initialization resolves to unknown through a
//! visited set rather than recursing.

use std::collections::{HashMap, HashSet};

use analyzer::ast::{ClassDecl, Expr, ExprKind, FieldDecl, MethodDecl, Param, Stmt, StmtKind, TypeRef};
use analyzer::LitKind;

use crate::context::{AssistContext, EnclosingKind};
use crate::extensions::ExtensionMethods;
use crate::oracle::{Member, MemberKind, ParamSig, TypeOracle, Visibility};
use crate::sig::TypeSig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Local,
    Field,
    Accessor,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOrigin {
    UserDeclared,
    Extension,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub sig: TypeSig,
    pub kind: BindingKind,
    pub origin: BindingOrigin,
    pub owner: Option<String>,
    /// Full member payload for methods (parameters, defaults).
    pub member: Option<Member>,
    /// Inheritance distance from the lookup type; 0 for own members.
    pub depth: usize,
    /// Declaration order for ranking tie-breaks.
    pub order: usize,
}

/// Erasure-signature index over sibling declarations: every variable is
/// registered under its own signature and its boxed/unboxed twin, arrays
/// under their own dimension-preserving signatures.
#[derive(Debug, Default, Clone)]
pub struct ExtendedContext {
    map: HashMap<TypeSig, Vec<String>>,
}

impl ExtendedContext {
    pub fn record(&mut self, sig: &TypeSig, name: &str) {
        if sig.is_unknown() {
            return;
        }
        self.map
            .entry(sig.clone())
            .or_default()
            .push(name.to_string());
        if let Some(twin) = sig.boxed_pair() {
            self.map.entry(twin).or_default().push(name.to_string());
        }
    }

    /// Variable names recorded under `sig`, in declaration order.
    pub fn names_for(&self, sig: &TypeSig) -> &[String] {
        self.map.get(sig).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub struct Scope {
    pub bindings: Vec<Binding>,
    pub extended: ExtendedContext,
}

/// A local declaration visible at the offset, in declaration order.
pub(crate) struct DeclEntry<'a> {
    name: &'a str,
    ty: Option<&'a TypeRef>,
    init: Option<&'a Expr>,
}

const EXTENSION_POSITIONS: [EnclosingKind; 4] = [
    EnclosingKind::MethodBody,
    EnclosingKind::CtorBody,
    EnclosingKind::ScriptTop,
    EnclosingKind::ClosureBody,
];

pub fn extensions_visible(enclosing: EnclosingKind) -> bool {
    EXTENSION_POSITIONS.contains(&enclosing)
}

/// Locals are proposed only where the host's own completion does not already
/// cover them: script top level and closure bodies.
pub fn locals_visible(enclosing: EnclosingKind) -> bool {
    matches!(
        enclosing,
        EnclosingKind::ScriptTop | EnclosingKind::ClosureBody
    )
}

pub fn resolve_scope(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> Scope {
    let decls = visible_decls(ctx);

    let mut extended = ExtendedContext::default();
    for decl in &decls {
        let sig = decl_sig(decl, &decls, oracle, extensions);
        extended.record(&sig, decl.name);
    }

    let mut bindings = Vec::new();
    let mut order = 0usize;

    if locals_visible(ctx.enclosing) {
        for decl in &decls {
            let sig = decl_sig(decl, &decls, oracle, extensions);
            bindings.push(Binding {
                name: decl.name.to_string(),
                sig,
                kind: BindingKind::Local,
                origin: BindingOrigin::UserDeclared,
                owner: None,
                member: None,
                depth: 0,
                order: next_order(&mut order),
            });
        }
    }

    if let Some(class) = ctx.enclosing_class {
        class_bindings(class, oracle, &mut bindings, &mut order);
    }

    if extensions_visible(ctx.enclosing) {
        for member in extensions.universal() {
            bindings.push(extension_binding(member, next_order(&mut order)));
        }
    }

    Scope { bindings, extended }
}

fn next_order(order: &mut usize) -> usize {
    let value = *order;
    *order += 1;
    value
}

// ---- local declarations -----------------------------------------------------

/// Declarations lexically before the offset in the enclosing statement
/// chain: outer script decls, closure parameters, and the innermost body's
/// own decls. Also feeds the extended-context index, which wants siblings
/// even where local proposals are suppressed.
fn visible_decls<'a>(ctx: &AssistContext<'a>) -> Vec<DeclEntry<'a>> {
    let mut decls = Vec::new();

    let in_class_member = ctx.enclosing_class.is_some();
    if !in_class_member {
        collect_decls(&ctx.module.script, ctx.offset, &mut decls);
    }

    if let Some(closure) = ctx.enclosing_closure
        && let ExprKind::Closure { params, body, .. } = &closure.kind
    {
        for param in params {
            decls.push(param_entry(param));
        }
        collect_decls(body, ctx.offset, &mut decls);
    } else if let Some(method) = ctx.enclosing_method
        && matches!(
            ctx.enclosing,
            EnclosingKind::MethodBody | EnclosingKind::CtorBody
        )
    {
        for param in &method.params.params {
            decls.push(param_entry(param));
        }
        if let Some(body) = &method.body {
            collect_decls(&body.stmts, ctx.offset, &mut decls);
        }
    }

    decls
}

fn param_entry(param: &Param) -> DeclEntry<'_> {
    DeclEntry {
        name: param.name.name.as_str(),
        ty: param.ty.as_ref(),
        init: param.default.as_ref().map(|(_, expr)| expr),
    }
}

fn collect_decls<'a>(stmts: &'a [Stmt], offset: u32, out: &mut Vec<DeclEntry<'a>>) {
    for stmt in stmts {
        if stmt.span.end > offset {
            break;
        }
        if let StmtKind::VarDecl { ty, name, init } = &stmt.kind
            && !name.name.is_empty()
        {
            out.push(DeclEntry {
                name: name.name.as_str(),
                ty: ty.as_ref(),
                init: init.as_ref(),
            });
        }
    }
}

fn decl_sig(
    decl: &DeclEntry<'_>,
    decls: &[DeclEntry<'_>],
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> TypeSig {
    let mut visited = HashSet::new();
    visited.insert(decl.name.to_string());
    decl_sig_guarded(decl, decls, oracle, extensions, &mut visited)
}

fn decl_sig_guarded(
    decl: &DeclEntry<'_>,
    decls: &[DeclEntry<'_>],
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
    visited: &mut HashSet<String>,
) -> TypeSig {
    if let Some(ty) = decl.ty {
        return type_ref_sig(ty, oracle);
    }
    match decl.init {
        Some(init) => infer_expr_sig(init, decls, oracle, extensions, visited),
        None => TypeSig::unknown(),
    }
}

pub(crate) fn type_ref_sig(ty: &TypeRef, oracle: &dyn TypeOracle) -> TypeSig {
    if ty.is_placeholder() {
        return TypeSig::unknown();
    }
    let name = ty.name.dotted();
    if !name.contains('.')
        && let Some(descriptor) = oracle.resolve_type(&name)
    {
        return TypeSig::from_name(&descriptor.qualified_name, ty.array_dims);
    }
    TypeSig::from_name(&name, ty.array_dims)
}

// ---- expression type inference ----------------------------------------------

/// Best-effort erasure of an expression. Everything unresolvable is
/// `unknown`; nothing here can fail a request.
pub(crate) fn infer_expr_sig(
    expr: &Expr,
    decls: &[DeclEntry<'_>],
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
    visited: &mut HashSet<String>,
) -> TypeSig {
    match &expr.kind {
        ExprKind::Lit(lit) => match lit.kind {
            LitKind::Int => TypeSig::from_name("int", 0),
            LitKind::Decimal => TypeSig::object("java.math.BigDecimal"),
            LitKind::Str => TypeSig::object("java.lang.String"),
            LitKind::Bool => TypeSig::from_name("boolean", 0),
            LitKind::Null => TypeSig::unknown(),
        },
        ExprKind::Var(name) => {
            if !visited.insert(name.name.clone()) {
                // `xx = xx` and friends: break the cycle.
                return TypeSig::unknown();
            }
            let sig = decls
                .iter()
                .find(|d| d.name == name.name)
                .map(|d| decl_sig_guarded(d, decls, oracle, extensions, visited))
                .unwrap_or_else(TypeSig::unknown);
            visited.remove(&name.name);
            sig
        }
        ExprKind::CtorCall { ty, .. } => type_ref_sig(ty, oracle),
        ExprKind::Call { receiver, name, .. } => match receiver {
            Some(receiver) => {
                let recv = infer_expr_sig(receiver, decls, oracle, extensions, visited);
                member_result_sig(&recv, &name.name, MemberKind::Method, oracle, extensions)
            }
            None => TypeSig::unknown(),
        },
        ExprKind::Property { receiver, name, .. } => {
            let recv = infer_expr_sig(receiver, decls, oracle, extensions, visited);
            member_result_sig(&recv, &name.name, MemberKind::Field, oracle, extensions)
        }
        ExprKind::Index { receiver, .. } => {
            let recv = infer_expr_sig(receiver, decls, oracle, extensions, visited);
            if recv.array_dims() > 0 {
                recv.element()
            } else {
                TypeSig::unknown()
            }
        }
        ExprKind::ListLit { .. } => TypeSig::object("java.util.List"),
        ExprKind::MapLit { .. } => TypeSig::object("java.util.Map"),
        ExprKind::Closure { .. } => TypeSig::object("groovy.lang.Closure"),
        ExprKind::Unary { op, expr } => match op {
            analyzer::ast::UnOp::Not => TypeSig::from_name("boolean", 0),
            analyzer::ast::UnOp::Neg => infer_expr_sig(expr, decls, oracle, extensions, visited),
        },
        ExprKind::Binary { op, left, right, .. } => {
            use analyzer::ast::BinOpKind::*;
            match op {
                EqEq | Ne | Lt | Le | Ge | Gt | AndAnd | OrOr => TypeSig::from_name("boolean", 0),
                Plus | Minus | Star | Slash | Percent => {
                    let l = infer_expr_sig(left, decls, oracle, extensions, visited);
                    let r = infer_expr_sig(right, decls, oracle, extensions, visited);
                    if l.is_string() || r.is_string() {
                        TypeSig::object("java.lang.String")
                    } else if l.is_numeric() {
                        l
                    } else if r.is_numeric() {
                        r
                    } else {
                        TypeSig::unknown()
                    }
                }
            }
        }
        ExprKind::Paren { inner, .. } => infer_expr_sig(inner, decls, oracle, extensions, visited),
        ExprKind::Error => TypeSig::unknown(),
    }
}

/// Erasure of the receiver of the member-access target at the offset.
pub fn infer_receiver_sig(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> TypeSig {
    let Some(target) = ctx.target else {
        return TypeSig::unknown();
    };
    let receiver = match &target.kind {
        ExprKind::Property { receiver, .. } => receiver,
        ExprKind::Call {
            receiver: Some(receiver),
            ..
        } => receiver,
        _ => return TypeSig::unknown(),
    };
    let decls = visible_decls(ctx);
    let mut visited = HashSet::new();
    infer_expr_sig(receiver, &decls, oracle, extensions, &mut visited)
}

/// Result signature of `receiver.name` (method return or field type),
/// searching the hierarchy and then the extension table.
fn member_result_sig(
    receiver: &TypeSig,
    name: &str,
    want: MemberKind,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> TypeSig {
    for (member, _) in type_members(receiver, oracle) {
        if member.name == name && member.kind == want {
            return member.sig.clone();
        }
        // Property reads also match getters and plain methods.
        if want == MemberKind::Field && member.name == name {
            return member.sig.clone();
        }
    }
    for member in extensions.for_receiver(receiver) {
        if member.name == name {
            return member.sig.clone();
        }
    }
    TypeSig::unknown()
}

// ---- type member walks ------------------------------------------------------

/// All members reachable from `sig`'s type: own members first, then up the
/// hierarchy, each tagged with its inheritance depth. Primitive receivers
/// are looked up through their boxed twin. Cycles and unresolved supertypes
/// end the walk for that branch.
pub(crate) fn type_members(sig: &TypeSig, oracle: &dyn TypeOracle) -> Vec<(Member, usize)> {
    let mut out = Vec::new();

    let start = match sig.object_name() {
        Some(name) => name.to_string(),
        None => match sig.boxed_pair().as_ref().and_then(|s| s.object_name()) {
            Some(name) => name.to_string(),
            None => return out,
        },
    };

    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier = vec![start];
    let mut depth = 0usize;

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for type_name in frontier {
            if !visited.insert(type_name.clone()) {
                continue;
            }
            let Some(descriptor) = oracle.resolve_type(&type_name) else {
                // Degrade: no inherited bindings from an unresolved type.
                continue;
            };
            for member in oracle.members_of(&descriptor) {
                out.push((member, depth));
            }
            if let Some(superclass) = &descriptor.superclass {
                next.push(superclass.clone());
            }
            next.extend(descriptor.interfaces.iter().cloned());
        }
        frontier = next;
        depth += 1;
    }

    out
}

/// Member bindings of a receiver type for `Expression` completion: fields
/// through the property rule, methods, then applicable extensions.
pub(crate) fn receiver_bindings(
    sig: &TypeSig,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> Vec<Binding> {
    let mut bindings = Vec::new();
    let mut order = 0usize;
    let members = type_members(sig, oracle);

    for (member, depth) in &members {
        match member.kind {
            MemberKind::Field => {
                push_field_bindings(
                    member,
                    *depth,
                    has_user_getter(&members, &member.name),
                    &mut bindings,
                    &mut order,
                );
            }
            MemberKind::Method => bindings.push(Binding {
                name: member.name.clone(),
                sig: member.sig.clone(),
                kind: BindingKind::Method,
                origin: BindingOrigin::UserDeclared,
                owner: Some(member.declared_in.clone()),
                member: Some(member.clone()),
                depth: *depth,
                order: next_order(&mut order),
            }),
            MemberKind::Constructor => {}
        }
    }

    for member in extensions.for_receiver(sig) {
        bindings.push(extension_binding(member, next_order(&mut order)));
    }

    bindings
}

fn extension_binding(member: &Member, order: usize) -> Binding {
    Binding {
        name: member.name.clone(),
        sig: member.sig.clone(),
        kind: BindingKind::Method,
        origin: BindingOrigin::Extension,
        owner: Some(member.declared_in.clone()),
        member: Some(member.clone()),
        depth: 0,
        order,
    }
}

fn has_user_getter(members: &[(Member, usize)], field_name: &str) -> bool {
    let getter = accessor_name("get", field_name);
    members
        .iter()
        .any(|(m, _)| m.kind == MemberKind::Method && m.name == getter && m.params.is_empty())
}

/// The property rule: a package-default field synthesizes getter and setter
/// bindings alongside the field; explicit visibility (or `static final`, or
/// a user-declared getter) collapses it to the bare name.
fn push_field_bindings(
    member: &Member,
    depth: usize,
    user_getter: bool,
    bindings: &mut Vec<Binding>,
    order: &mut usize,
) {
    bindings.push(Binding {
        name: member.name.clone(),
        sig: member.sig.clone(),
        kind: BindingKind::Field,
        origin: BindingOrigin::UserDeclared,
        owner: Some(member.declared_in.clone()),
        member: Some(member.clone()),
        depth,
        order: next_order(order),
    });

    let is_property = member.visibility == Visibility::PackageDefault
        && !(member.is_static && member.is_final)
        && !user_getter;
    if !is_property {
        return;
    }

    let getter_prefix = if member.sig.is_boolean() { "is" } else { "get" };
    bindings.push(Binding {
        name: accessor_name(getter_prefix, &member.name),
        sig: member.sig.clone(),
        kind: BindingKind::Accessor,
        origin: BindingOrigin::UserDeclared,
        owner: Some(member.declared_in.clone()),
        member: Some(Member::method(
            &accessor_name(getter_prefix, &member.name),
            Vec::new(),
            member.sig.clone(),
        )),
        depth,
        order: next_order(order),
    });
    bindings.push(Binding {
        name: accessor_name("set", &member.name),
        sig: TypeSig::from_name("void", 0),
        kind: BindingKind::Accessor,
        origin: BindingOrigin::UserDeclared,
        owner: Some(member.declared_in.clone()),
        member: Some(Member::method(
            &accessor_name("set", &member.name),
            vec![ParamSig {
                name: member.name.clone(),
                sig: member.sig.clone(),
            }],
            TypeSig::from_name("void", 0),
        )),
        depth,
        order: next_order(order),
    });
}

pub(crate) fn accessor_name(prefix: &str, field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

// ---- enclosing-class bindings ----------------------------------------------

/// Fields, accessors, and methods visible without a receiver inside a class
/// member, from the AST for the class itself plus the oracle for supertypes.
fn class_bindings(
    class: &ClassDecl,
    oracle: &dyn TypeOracle,
    bindings: &mut Vec<Binding>,
    order: &mut usize,
) {
    let own_getters: HashSet<String> = class
        .members
        .iter()
        .filter_map(|m| match m {
            analyzer::ast::Member::Method(method) if !method.is_ctor => {
                Some(method.name.name.clone())
            }
            _ => None,
        })
        .collect();

    for member in &class.members {
        match member {
            analyzer::ast::Member::Field(field) => {
                if field.name.name.is_empty() {
                    continue;
                }
                let as_member = field_member(class, field, oracle);
                let user_getter =
                    own_getters.contains(&accessor_name("get", &field.name.name));
                push_field_bindings(&as_member, 0, user_getter, bindings, order);
            }
            analyzer::ast::Member::Method(method) => {
                if method.is_ctor || method.name.name.is_empty() {
                    continue;
                }
                let as_member = method_member(class, method, oracle);
                bindings.push(Binding {
                    name: method.name.name.clone(),
                    sig: as_member.sig.clone(),
                    kind: BindingKind::Method,
                    origin: BindingOrigin::UserDeclared,
                    owner: Some(class.name.name.clone()),
                    member: Some(as_member),
                    depth: 0,
                    order: next_order(order),
                });
            }
        }
    }

    // Inherited members through the oracle; depth shifted by one since the
    // AST covers depth zero.
    if let Some(extends) = &class.extends
        && !extends.is_placeholder()
    {
        let super_sig = type_ref_sig(extends, oracle);
        for (member, depth) in type_members(&super_sig, oracle) {
            match member.kind {
                MemberKind::Field => {
                    push_field_bindings(&member, depth + 1, false, bindings, order)
                }
                MemberKind::Method => bindings.push(Binding {
                    name: member.name.clone(),
                    sig: member.sig.clone(),
                    kind: BindingKind::Method,
                    origin: BindingOrigin::UserDeclared,
                    owner: Some(member.declared_in.clone()),
                    member: Some(member),
                    depth: depth + 1,
                    order: next_order(order),
                }),
                MemberKind::Constructor => {}
            }
        }
    }
}

pub(crate) fn field_member(
    class: &ClassDecl,
    field: &FieldDecl,
    oracle: &dyn TypeOracle,
) -> Member {
    let sig = field
        .ty
        .as_ref()
        .map(|ty| type_ref_sig(ty, oracle))
        .unwrap_or_else(TypeSig::unknown);
    Member {
        name: field.name.name.clone(),
        kind: MemberKind::Field,
        params: Vec::new(),
        sig,
        visibility: field_visibility(field),
        is_static: field.modifiers.has(analyzer::ast::Modifier::Static),
        is_final: field.modifiers.has(analyzer::ast::Modifier::Final),
        declared_in: class.name.name.clone(),
        default_params: 0,
    }
}

fn field_visibility(field: &FieldDecl) -> Visibility {
    use analyzer::ast::Modifier::*;
    if field.modifiers.has(Public) {
        Visibility::Public
    } else if field.modifiers.has(Private) {
        Visibility::Private
    } else if field.modifiers.has(Protected) {
        Visibility::Protected
    } else {
        Visibility::PackageDefault
    }
}

pub(crate) fn method_member(
    class: &ClassDecl,
    method: &MethodDecl,
    oracle: &dyn TypeOracle,
) -> Member {
    let params = method
        .params
        .params
        .iter()
        .map(|p| ParamSig {
            name: p.name.name.clone(),
            sig: p
                .ty
                .as_ref()
                .map(|ty| type_ref_sig(ty, oracle))
                .unwrap_or_else(TypeSig::unknown),
        })
        .collect();
    let default_params = method
        .params
        .params
        .iter()
        .rev()
        .take_while(|p| p.default.is_some())
        .count();

    Member {
        name: method.name.name.clone(),
        kind: if method.is_ctor {
            MemberKind::Constructor
        } else {
            MemberKind::Method
        },
        params,
        sig: method
            .return_ty
            .as_ref()
            .map(|ty| type_ref_sig(ty, oracle))
            .unwrap_or_else(TypeSig::unknown),
        visibility: Visibility::PackageDefault,
        is_static: method.modifiers.has(analyzer::ast::Modifier::Static),
        is_final: method.modifiers.has(analyzer::ast::Modifier::Final),
        declared_in: class.name.name.clone(),
        default_params,
    }
}

/// Erasure of an arbitrary expression at the request position.
pub(crate) fn infer_expr_in_ctx(
    ctx: &AssistContext<'_>,
    expr: &Expr,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> TypeSig {
    let decls = visible_decls(ctx);
    let mut visited = HashSet::new();
    infer_expr_sig(expr, &decls, oracle, extensions, &mut visited)
}

/// Builds the extended-context index alone (no binding synthesis); used by
/// parameter guessing inside positions that suppress local proposals.
pub fn extended_context(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> ExtendedContext {
    let decls = visible_decls(ctx);
    let mut extended = ExtendedContext::default();
    for decl in &decls {
        let sig = decl_sig(decl, &decls, oracle, extensions);
        extended.record(&sig, decl.name);
    }
    extended
}
