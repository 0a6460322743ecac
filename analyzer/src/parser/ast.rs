//! AST for the Groovy-flavored grammar.
//!
//! Every node carries a byte span. Nodes that can survive broken input carry
//! explicit recovery state (`closed` flags, optional names) instead of being
//! dropped, so downstream position classification always has something to
//! stand on.

use crate::lexer::{Lit, NodeId};
use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

/// A dotted name (`java.util.List`). May be empty when recovery produced a
/// placeholder (e.g. `extends ` with nothing after it).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName {
    pub segments: Vec<Ident>,
    pub span: Span,
}

impl QualifiedName {
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn simple_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: QualifiedName,
    pub array_dims: u8,
    pub span: Span,
}

impl TypeRef {
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub classes: Vec<ClassDecl>,
    /// Loose script statements, in source order.
    pub script: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    pub name: QualifiedName,
    /// From just after the `package` keyword to the terminator.
    pub header_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub is_static: bool,
    pub name: QualifiedName,
    pub wildcard: bool,
    pub alias: Option<Ident>,
    /// Whether an explicit `;` terminated the declaration. The span includes
    /// that `;`; a newline terminator is not part of the span.
    pub has_semi: bool,
    pub header_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub name: Ident,
    pub extends_kw: Option<Span>,
    pub extends: Option<TypeRef>,
    pub implements_kw: Option<Span>,
    pub implements: Vec<TypeRef>,
    /// Brace-delimited body region; `None` when the opening brace is missing.
    pub body_span: Option<Span>,
    pub body_closed: bool,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Def,
}

impl Modifier {
    pub fn from_word(word: &str) -> Option<Modifier> {
        Some(match word {
            "public" => Modifier::Public,
            "private" => Modifier::Private,
            "protected" => Modifier::Protected,
            "static" => Modifier::Static,
            "final" => Modifier::Final,
            "def" => Modifier::Def,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub list: Vec<(Modifier, Span)>,
}

impl Modifiers {
    pub fn has(&self, m: Modifier) -> bool {
        self.list.iter().any(|(k, _)| *k == m)
    }

    /// No visibility keyword at all (Groovy package-default / property form).
    pub fn is_property_default(&self) -> bool {
        !self.has(Modifier::Public)
            && !self.has(Modifier::Private)
            && !self.has(Modifier::Protected)
            && !(self.has(Modifier::Static) && self.has(Modifier::Final))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn span(&self) -> Span {
        match self {
            Member::Field(f) => f.span,
            Member::Method(m) => m.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub ty: Option<TypeRef>,
    pub name: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub return_ty: Option<TypeRef>,
    pub name: Ident,
    pub is_ctor: bool,
    pub params: ParamList,
    pub throws_kw: Option<Span>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamList {
    pub lparen: Span,
    pub params: Vec<Param>,
    pub closed: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: Option<TypeRef>,
    pub name: Ident,
    /// Default-value expression after `=`, with the `=` span.
    pub default: Option<(Span, Expr)>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub closed: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// `def x = e` (`ty` None) or `Type x = e`.
    VarDecl {
        ty: Option<TypeRef>,
        name: Ident,
        init: Option<Expr>,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
    Expr(Expr),
    Return(Option<Expr>),
    /// Recovered region.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgList {
    /// `None` for parenthesis-less (command) calls.
    pub lparen: Option<Span>,
    pub args: Vec<Arg>,
    pub closed: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// `name:` label for named arguments.
    pub label: Option<Ident>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Lt,
    Le,
    EqEq,
    Ne,
    Ge,
    Gt,
    AndAnd,
    OrOr,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Lit(Lit),
    Var(Ident),
    /// `receiver.name` / `receiver?.name`. An empty `name` means the dot is
    /// dangling (classification target for member completion).
    Property {
        receiver: Box<Expr>,
        safe: bool,
        dot: Span,
        name: Ident,
    },
    Index {
        receiver: Box<Expr>,
        index: Box<Expr>,
        closed: bool,
    },
    /// `name(args)`, `receiver.name(args)`, or a command-chain link when
    /// `command` is set (arguments had no parentheses).
    Call {
        receiver: Option<Box<Expr>>,
        name: Ident,
        args: ArgList,
        command: bool,
    },
    CtorCall {
        new_kw: Span,
        ty: TypeRef,
        args: ArgList,
    },
    Closure {
        params: Vec<Param>,
        arrow: Option<Span>,
        body: Vec<Stmt>,
        closed: bool,
    },
    ListLit {
        items: Vec<Expr>,
        closed: bool,
    },
    MapLit {
        entries: Vec<Arg>,
        closed: bool,
    },
    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinOpKind,
        op_span: Span,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Paren {
        inner: Box<Expr>,
        closed: bool,
    },
    Error,
}
