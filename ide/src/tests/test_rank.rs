//! Relevance order: tier precedence, exact-match boost, override depth,
//! declaration-order ties.

use super::assist_dsl::{class_, t};
use crate::extensions::ExtensionMethods;
use crate::oracle::Member;
use crate::sig::TypeSig;

#[test]
fn locals_outrank_extension_methods() {
    let mut extensions = ExtensionMethods::new();
    extensions.add_universal(Member::method(
        "fooExt",
        Vec::new(),
        TypeSig::from_name("void", 0),
    ));

    t("def fooLocal = 1\nfoo$0")
        .extensions(extensions)
        .expect_order("fooLocal", "fooExt");
}

#[test]
fn fields_outrank_methods_on_a_receiver() {
    t("def o = new Thing()\no.ff$0")
        .with(
            class_("com.demo.Thing")
                .method("ffm", "void", &[])
                .field("ff", "int"),
        )
        .expect_order("ff", "ffm");
}

#[test]
fn exact_name_match_outranks_prefix_match() {
    t("def o = new Thing()\no.run$0")
        .with(
            class_("com.demo.Thing")
                .method("runFast", "void", &[])
                .method("run", "void", &[]),
        )
        .expect_order("run", "runFast");
}

#[test]
fn user_method_outranks_modifier_keyword() {
    t("class A {\ndef pub() {\n}\npu$0\n}").expect_order("pub", "public");
}

#[test]
fn override_outranks_inherited_declaration() {
    let mut fixture = t("class Derived extends Base {\ndef over() {\n}\ndef m() {\nov$0\n}\n}")
        .with(class_("com.demo.Base").method("over", "void", &[]));
    // Both declarations are proposed; the more-derived one comes first.
    let first = fixture.proposal("over");
    assert_eq!(first.owner.as_deref(), Some("Derived"));
}

#[test]
fn named_arguments_lead_inside_constructor_calls() {
    t("new Flar($0)")
        .with(
            class_("com.demo.Flar")
                .field("aaa", "String")
                .field("bbb", "int"),
        )
        .expect_order("aaa", "Flar")
        .expect_order("bbb", "Flar");
}

#[test]
fn ties_break_by_declaration_order_not_alphabetically() {
    t("def o = new Thing()\no.$0")
        .with(
            class_("com.demo.Thing")
                .method("zzz", "void", &[])
                .method("mmm", "void", &[])
                .method("aaa", "void", &[]),
        )
        .expect_order("zzz", "mmm")
        .expect_order("mmm", "aaa");
}
