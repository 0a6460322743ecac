//! Type proposals, auto-import insertion anchors, and header completion.

use analyzer::parse_module;

use super::assist_dsl::{class_, t};
use crate::edit::{apply_text_edits, import_insertion};

fn flar() -> super::assist_dsl::ClassSpec {
    class_("com.demo.Flar").field("aaa", "String")
}

#[test]
fn type_completion_inserts_import() {
    t("def x = new Fl$0")
        .with(flar())
        .expect_contains("Flar")
        .apply("Flar")
        .expect_text("import com.demo.Flar\ndef x = new Flar$0");
}

#[test]
fn no_import_edit_when_already_imported() {
    let mut fixture = t("import com.demo.Flar\ndef x = new Fl$0").with(flar());
    assert!(fixture.proposal("Flar").additional_edits.is_empty());
}

#[test]
fn no_import_edit_for_java_lang_or_same_package() {
    let mut fixture = t("def s = new Str$0");
    assert!(fixture.proposal("String").additional_edits.is_empty());

    let mut fixture = t("package com.demo\ndef x = new Fl$0").with(flar());
    assert!(fixture.proposal("Flar").additional_edits.is_empty());
}

#[test]
fn wildcard_import_covers_the_package() {
    let mut fixture = t("import com.demo.*\ndef x = new Fl$0").with(flar());
    assert!(fixture.proposal("Flar").additional_edits.is_empty());
}

fn inserted(source: &str, qualified: &str) -> String {
    let parse = parse_module(source);
    let edit = import_insertion(source, &parse.module, qualified).expect("insertion point");
    apply_text_edits(source, &[edit])
}

#[test]
fn import_appends_after_semicolon_terminated_import() {
    assert_eq!(
        inserted("import java.util.List;\nx = 1\n", "java.util.Date"),
        "import java.util.List;\nimport java.util.Date\nx = 1\n"
    );
}

#[test]
fn import_concatenates_after_newline_terminated_import() {
    // Long-standing behavior of the original engine, kept on purpose: with
    // no `;` to anchor on, the new import lands on the same line.
    assert_eq!(
        inserted("import java.util.List\nx = 1\n", "java.util.Date"),
        "import java.util.Listimport java.util.Date\nx = 1\n"
    );
}

#[test]
fn import_prefers_its_own_group() {
    assert_eq!(
        inserted("import aaa.One\nimport bbb.Two\n", "aaa.Three"),
        "import aaa.Oneimport aaa.Three\nimport bbb.Two\n"
    );
}

#[test]
fn import_goes_after_package_with_blank_line() {
    assert_eq!(
        inserted("package com.demo\nx = 1\n", "java.util.Date"),
        "package com.demo\n\nimport java.util.Date\nx = 1\n"
    );
}

#[test]
fn import_goes_after_leading_header_comment() {
    assert_eq!(
        inserted("/* header */\nx = 1\n", "java.util.Date"),
        "/* header */\nimport java.util.Date\nx = 1\n"
    );
}

#[test]
fn import_goes_to_buffer_start_otherwise() {
    assert_eq!(
        inserted("x = 1\n", "java.util.Date"),
        "import java.util.Date\nx = 1\n"
    );
}

#[test]
fn extends_position_offers_classes_only() {
    t("class A extends Ba$0 {\n}")
        .with(class_("com.demo.Base"))
        .with(class_("com.demo.Bari").interface())
        .expect_contains("Base")
        .expect_not_contains("Bari");
}

#[test]
fn implements_position_offers_interfaces_only() {
    t("class A implements Ba$0 {\n}")
        .with(class_("com.demo.Base"))
        .with(class_("com.demo.Bari").interface())
        .expect_contains("Bari")
        .expect_not_contains("Base");
}

#[test]
fn throws_position_offers_throwables_only() {
    t("class A {\ndef m() throws IOEx$0 {\n}\n}")
        .with(class_("com.demo.IOExtra"))
        .expect_contains("IOException")
        .expect_not_contains("IOExtra");
}

#[test]
fn import_header_offers_next_segments() {
    t("import java.$0")
        .expect_contains("util")
        .expect_contains("lang")
        .expect_not_contains("demo");
}

#[test]
fn package_header_offers_known_packages() {
    t("package com.$0").with(flar()).expect_contains("demo");
}

#[test]
fn static_import_members_dedupe_across_forms() {
    // Explicit and on-demand static imports of the same member produce one
    // proposal.
    t("import static com.demo.Util.max\nimport static com.demo.Util.*\nma$0")
        .with(class_("com.demo.Util").static_method("max", "int", &[("int", "a"), ("int", "b")]))
        .expect_count("max", 1);
}

#[test]
fn static_receiver_offers_static_members() {
    t("Util.ma$0")
        .with(class_("com.demo.Util").static_method("max", "int", &[("int", "a"), ("int", "b")]))
        .expect_count("max", 1);
}
