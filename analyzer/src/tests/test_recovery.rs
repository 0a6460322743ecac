//! The parser must produce a usable tree for any input, with recovery state
//! (unclosed flags, placeholder names) instead of failures.

use crate::ast::{ExprKind, Member, StmtKind};
use crate::parse_module;

#[test]
fn unclosed_constructor_call_keeps_open_argument_list() {
    let out = parse_module("new ArrayList(a,b");
    let StmtKind::Expr(expr) = &out.module.script[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::CtorCall { ty, args, .. } = &expr.kind else {
        panic!("expected ctor call, got {:?}", expr.kind);
    };
    assert_eq!(ty.name.dotted(), "ArrayList");
    assert!(!args.closed);
    assert_eq!(args.args.len(), 2);
}

#[test]
fn dangling_dot_is_a_property_with_empty_name() {
    let out = parse_module("foo.");
    let StmtKind::Expr(expr) = &out.module.script[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Property { name, .. } = &expr.kind else {
        panic!("expected property, got {:?}", expr.kind);
    };
    assert!(name.name.is_empty());
}

#[test]
fn dot_completion_across_newline_attaches_to_receiver() {
    let out = parse_module("foo.\n  bar\n");
    let StmtKind::Expr(expr) = &out.module.script[0].kind else {
        panic!("expected expr stmt");
    };
    let ExprKind::Property { receiver, name, .. } = &expr.kind else {
        panic!("expected property, got {:?}", expr.kind);
    };
    assert!(matches!(receiver.kind, ExprKind::Var(_)));
    assert_eq!(name.name, "bar");
}

#[test]
fn unclosed_class_body_keeps_members() {
    let out = parse_module("class Flar {\nString aaa\n");
    let class = &out.module.classes[0];
    assert!(!class.body_closed);
    assert_eq!(class.members.len(), 1);
    assert!(matches!(class.members[0], Member::Field(_)));
}

#[test]
fn extends_without_type_gets_placeholder() {
    let out = parse_module("class A extends {\n}\n");
    let class = &out.module.classes[0];
    assert!(class.extends_kw.is_some());
    assert!(class.extends.as_ref().unwrap().is_placeholder());
    assert!(class.body_closed);
}

#[test]
fn unclosed_param_list_survives() {
    let out = parse_module("class A {\ndef m(int a, String b\n}\n");
    let class = &out.module.classes[0];
    let Member::Method(method) = &class.members[0] else {
        panic!("expected method");
    };
    assert!(!method.params.closed);
    assert_eq!(method.params.params.len(), 2);
}

#[test]
fn junk_after_statement_is_reported_not_fatal() {
    let out = parse_module("first 'foo' third sec\nxx.abs()\n");
    assert_eq!(out.module.script.len(), 2);
    assert!(!out.diagnostics.is_empty());
}

#[test]
fn empty_and_whitespace_buffers() {
    assert!(parse_module("").module.script.is_empty());
    assert!(parse_module("   \n\n  ").module.script.is_empty());
}

#[test]
fn every_broken_input_still_parses() {
    // Grab-bag of keystroke states; none may panic.
    for source in [
        "(",
        ")",
        "}",
        "new ",
        "import ",
        "package ",
        "class ",
        "class A extends ",
        "class A implements ",
        "def m( {",
        "a.",
        "a..",
        "a?.",
        "x = ",
        "[1, ",
        "[x: ",
        "{ a, b -> ",
        "foo(bar.",
        "a + ",
        "'unterminated",
    ] {
        let out = parse_module(source);
        assert_eq!(out.module.span.end as usize, source.len());
    }
}
