//! Extended-context index: boxing/array idempotence and the cycle guard.

use analyzer::parse_module;

use super::assist_dsl::t;
use crate::context::{AssistLocation, classify};
use crate::extensions::ExtensionMethods;
use crate::oracle::TypeStore;
use crate::scope::extended_context;
use crate::sig::TypeSig;

#[test]
fn variables_index_under_primitive_and_boxed_signatures() {
    let source = "int x = 5\nboolean b = true\nint[] xs\nboolean[][] bs\n";
    let parse = parse_module(source);
    let store = TypeStore::new();
    let extensions = ExtensionMethods::new();
    let ctx = classify(source, &parse, source.len() as u32);
    let extended = extended_context(&ctx, &store, &extensions);

    let has = |sig: &TypeSig, name: &str| extended.names_for(sig).iter().any(|n| n == name);

    assert!(has(&TypeSig::from_name("int", 0), "x"));
    assert!(has(&TypeSig::object("java.lang.Integer"), "x"));
    assert!(has(&TypeSig::from_name("boolean", 0), "b"));
    assert!(has(&TypeSig::object("java.lang.Boolean"), "b"));

    // One- and two-dimensional arrays keep their dimensions on both sides.
    assert!(has(&TypeSig::from_name("int", 1), "xs"));
    assert!(has(&TypeSig::from_name("java.lang.Integer", 1), "xs"));
    assert!(has(&TypeSig::from_name("boolean", 2), "bs"));
    assert!(has(&TypeSig::from_name("java.lang.Boolean", 2), "bs"));

    // Dimensions never cross: the scalar never answers for the array.
    assert!(!has(&TypeSig::from_name("int", 0), "xs"));
    assert!(!has(&TypeSig::from_name("int", 1), "x"));
}

#[test]
fn untyped_variables_record_their_inferred_erasure() {
    let source = "def n = 9\ndef s = 'hi'\n";
    let parse = parse_module(source);
    let store = TypeStore::new();
    let extensions = ExtensionMethods::new();
    let ctx = classify(source, &parse, source.len() as u32);
    let extended = extended_context(&ctx, &store, &extensions);

    assert!(
        extended
            .names_for(&TypeSig::from_name("int", 0))
            .iter()
            .any(|n| n == "n")
    );
    assert!(
        extended
            .names_for(&TypeSig::object("java.lang.String"))
            .iter()
            .any(|n| n == "s")
    );
}

#[test]
fn self_referential_assignment_completes_without_recursion() {
    t("def xx = 9\nxx = xx\nxx.ab$0")
        .extensions(ExtensionMethods::standard())
        .expect_location(AssistLocation::Expression)
        .expect_count("abs", 1);
}

#[test]
fn self_referential_declaration_degrades_to_unknown() {
    t("def xx = xx\nxx.ab$0")
        .extensions(ExtensionMethods::standard())
        .expect_count("abs", 0);
}

#[test]
fn mutually_referential_declarations_terminate() {
    t("def a = b\ndef b = a\na.ab$0")
        .extensions(ExtensionMethods::standard())
        .expect_count("abs", 0);
}
