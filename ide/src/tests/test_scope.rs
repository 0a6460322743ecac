//! Visible-binding rules: the property/accessor rule, local suppression,
//! and the extension-method allow-list.

use super::assist_dsl::{class_, t};
use crate::extensions::ExtensionMethods;
use crate::oracle::Visibility;

fn flar() -> super::assist_dsl::ClassSpec {
    class_("com.demo.Flar")
        .field("aaa", "String")
        .field("bbb", "int")
        .field("ccc", "Date")
}

#[test]
fn package_default_field_yields_field_getter_setter() {
    t("def f = new Flar()\nf.aa$0")
        .with(flar())
        .expect_count("aaa", 1)
        .expect_count("getAaa", 1)
        .expect_count("setAaa", 1)
        .expect_not_contains("bbb");
}

#[test]
fn explicit_visibility_collapses_to_bare_field() {
    t("def f = new Flar()\nf.pp$0")
        .with(flar().field_vis("ppp", "int", Visibility::Private))
        .expect_count("ppp", 1)
        .expect_not_contains("getPpp")
        .expect_not_contains("setPpp");

    t("def f = new Flar()\nf.qq$0")
        .with(flar().field_vis("qqq", "int", Visibility::Public))
        .expect_count("qqq", 1)
        .expect_not_contains("getQqq");
}

#[test]
fn boolean_property_gets_is_getter() {
    t("def f = new Flar()\nf.fla$0")
        .with(flar().field("flag", "boolean"))
        .expect_count("flag", 1)
        .expect_count("isFlag", 1)
        .expect_count("setFlag", 1);
}

#[test]
fn user_declared_getter_collapses_to_bare_field() {
    t("def f = new Flar()\nf.aa$0")
        .with(flar().method("getAaa", "String", &[]))
        .expect_count("aaa", 1)
        .expect_not_contains("getAaa")
        .expect_not_contains("setAaa");
}

#[test]
fn locals_visible_at_script_top() {
    t("def loc = 1\nlo$0").expect_contains("loc");
}

#[test]
fn locals_suppressed_in_plain_method_bodies() {
    // The host's own completion covers method-body locals; proposing them
    // here would duplicate every entry.
    t("class A {\ndef m() {\ndef loc = 1\nlo$0\n}\n}").expect_not_contains("loc");
}

#[test]
fn locals_and_parameters_visible_in_closure_bodies() {
    t("def c = { def loc = 1\nlo$0 }").expect_contains("loc");
    t("def c = { int count ->\ncou$0 }").expect_contains("count");
}

#[test]
fn extension_methods_follow_the_position_allow_list() {
    let standard = ExtensionMethods::standard;

    // Script top level: visible.
    t("print$0")
        .extensions(standard())
        .expect_contains("println");

    // Method body: visible.
    t("class A {\ndef m() {\nprint$0\n}\n}")
        .extensions(standard())
        .expect_contains("println");

    // Closure body: visible.
    t("def c = { print$0 }")
        .extensions(standard())
        .expect_contains("println");

    // Class-body member position: hidden.
    t("class A {\nprint$0\n}")
        .extensions(standard())
        .expect_not_contains("println");

    // Parameter list: hidden.
    t("class A {\ndef m(print$0)\n}")
        .extensions(standard())
        .expect_not_contains("println");
}

#[test]
fn unresolved_supertype_degrades_to_own_members() {
    t("def f = new Sub()\nf.ow$0")
        .with(class_("com.demo.Sub").extends("com.missing.Gone").field("own", "int"))
        .expect_count("own", 1);
}

#[test]
fn inherited_members_come_through_the_oracle() {
    t("def f = new Sub()\nf.base$0")
        .with(class_("com.demo.Base").method("baseM", "void", &[]))
        .with(class_("com.demo.Sub").extends("com.demo.Base"))
        .expect_count("baseM", 1);
}

#[test]
fn fields_of_enclosing_class_visible_in_method_body() {
    t("class A {\nString aaa\ndef m() {\naa$0\n}\n}")
        .expect_count("aaa", 1)
        .expect_count("getAaa", 1)
        .expect_count("setAaa", 1);
}
