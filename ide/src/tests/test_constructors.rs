//! Constructor-call completion: signature display and named-argument
//! synthesis for map-style construction.

use super::assist_dsl::{ClassSpec, class_, t};
use crate::completion::ProposalKind;
use crate::context::AssistLocation;

fn flar() -> ClassSpec {
    class_("com.demo.Flar")
        .field("aaa", "String")
        .field("bbb", "int")
        .field("ccc", "Date")
}

#[test]
fn named_arguments_for_type_without_constructors() {
    t("new Flar($0)")
        .with(flar())
        .expect_location(AssistLocation::MethodContext)
        .expect_count("aaa", 1)
        .expect_count("bbb", 1)
        .expect_count("ccc", 1)
        .expect_count("Flar", 1)
        .expect_kind("aaa", ProposalKind::NamedArgument)
        .expect_kind("Flar", ProposalKind::Constructor)
        .expect_label("aaa", "aaa : __");
}

#[test]
fn explicit_constructor_suppresses_named_arguments() {
    t("new Flar($0)")
        .with(flar().ctor(&[]))
        .expect_count("aaa", 0)
        .expect_count("bbb", 0)
        .expect_count("ccc", 0)
        .expect_count("Flar", 1);
}

#[test]
fn one_signature_per_declared_constructor() {
    t("new Flar($0)")
        .with(flar().ctor(&[]).ctor(&[("int", "x")]))
        .expect_count("Flar", 2)
        .expect_count("aaa", 0);
}

#[test]
fn supplied_named_arguments_are_excluded() {
    t("new Flar(aaa: 'x', $0)")
        .with(flar())
        .expect_count("aaa", 0)
        .expect_count("bbb", 1)
        .expect_count("ccc", 1);
}

#[test]
fn named_arguments_filter_by_prefix() {
    t("new Flar(aa$0)")
        .with(flar())
        .expect_count("aaa", 1)
        .expect_count("bbb", 0);
}

#[test]
fn named_argument_values_use_literal_defaults() {
    t("new Flar($0)")
        .with(flar())
        .expect_replacement("aaa", "aaa: \"\"")
        .expect_replacement("bbb", "bbb: 0")
        .expect_replacement("ccc", "ccc: __");
}

#[test]
fn named_argument_value_prefers_matching_local() {
    let mut fixture = t("int a = 1\nint b = 2\nnew Flar(bb$0)").with(flar());
    let proposal = fixture.proposal("bbb");
    assert_eq!(proposal.replacement, "bbb: b");
    assert_eq!(proposal.linked_groups.len(), 1);
    // Most recently declared first, then earlier locals, then the literal.
    assert_eq!(proposal.linked_groups[0].choices, vec!["b", "a", "0"]);
}

#[test]
fn final_and_static_fields_are_not_settable() {
    t("new Flar($0)")
        .with(flar().final_field("fff", "int").static_field("sss", "int"))
        .expect_count("fff", 0)
        .expect_count("sss", 0)
        .expect_count("aaa", 1);
}

#[test]
fn named_arguments_can_be_disabled() {
    t("new Flar($0)")
        .with(flar())
        .config(|c| c.named_arguments = false)
        .expect_count("aaa", 0)
        .expect_count("Flar", 1);
}

#[test]
fn named_arguments_apply_cleanly() {
    t("new Flar(bb$0)")
        .with(flar())
        .apply("bbb")
        .expect_text("new Flar(bbb: 0$0)");
}
