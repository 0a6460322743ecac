//! Fixture DSL for completion tests.
//!
//! Sources mark the cursor with `$0`. Oracle types are declared through
//! [`class_`]; expectations chain builder-style off [`t`].

use crate::completion::{CompletionConfig, Proposal, ProposalKind};
use crate::context::AssistLocation;
use crate::edit::apply_proposal;
use crate::extensions::ExtensionMethods;
use crate::format::PlainFormatter;
use crate::oracle::{
    Document, Member, MemberKind, ParamSig, TypeDescriptor, TypeKind, TypeStore, Visibility,
};
use crate::registry::Registry;
use crate::sig::TypeSig;
use crate::workspace::Workspace;
use crate::{AssistOutput, compute_proposals};

/// Resolves fixture-friendly simple names to the qualified names the
/// default store registers.
fn sig_of(name: &str) -> TypeSig {
    let mut dims = 0u8;
    let mut base = name;
    while let Some(stripped) = base.strip_suffix("[]") {
        dims += 1;
        base = stripped;
    }
    let qualified = match base {
        "String" => "java.lang.String",
        "Object" => "java.lang.Object",
        "Integer" => "java.lang.Integer",
        "Boolean" => "java.lang.Boolean",
        "Date" => "java.util.Date",
        "List" => "java.util.List",
        "Closure" => "groovy.lang.Closure",
        other => other,
    };
    TypeSig::from_name(qualified, dims)
}

// ----------------------------
// Oracle class builder
// ----------------------------

pub struct ClassSpec {
    descriptor: TypeDescriptor,
    members: Vec<Member>,
}

pub fn class_(qualified: &str) -> ClassSpec {
    ClassSpec {
        descriptor: TypeDescriptor {
            qualified_name: qualified.to_string(),
            kind: TypeKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            is_throwable: false,
        },
        members: Vec::new(),
    }
}

impl ClassSpec {
    pub fn interface(mut self) -> Self {
        self.descriptor.kind = TypeKind::Interface;
        self
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.descriptor.superclass = Some(superclass.to_string());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.descriptor.interfaces.push(interface.to_string());
        self
    }

    pub fn throwable(mut self) -> Self {
        self.descriptor.is_throwable = true;
        self
    }

    pub fn field(mut self, name: &str, ty: &str) -> Self {
        self.members.push(Member::field(name, sig_of(ty)));
        self
    }

    pub fn field_vis(mut self, name: &str, ty: &str, visibility: Visibility) -> Self {
        let mut member = Member::field(name, sig_of(ty));
        member.visibility = visibility;
        self.members.push(member);
        self
    }

    pub fn final_field(mut self, name: &str, ty: &str) -> Self {
        let mut member = Member::field(name, sig_of(ty));
        member.is_final = true;
        self.members.push(member);
        self
    }

    pub fn static_field(mut self, name: &str, ty: &str) -> Self {
        let mut member = Member::field(name, sig_of(ty));
        member.is_static = true;
        member.visibility = Visibility::Public;
        self.members.push(member);
        self
    }

    pub fn method(self, name: &str, ret: &str, params: &[(&str, &str)]) -> Self {
        self.method_with_defaults(name, ret, params, 0)
    }

    pub fn method_with_defaults(
        mut self,
        name: &str,
        ret: &str,
        params: &[(&str, &str)],
        default_params: usize,
    ) -> Self {
        let mut member = Member::method(
            name,
            params
                .iter()
                .map(|(ty, name)| ParamSig {
                    name: name.to_string(),
                    sig: sig_of(ty),
                })
                .collect(),
            sig_of(ret),
        );
        member.default_params = default_params;
        self.members.push(member);
        self
    }

    pub fn static_method(mut self, name: &str, ret: &str, params: &[(&str, &str)]) -> Self {
        let mut member = Member::method(
            name,
            params
                .iter()
                .map(|(ty, name)| ParamSig {
                    name: name.to_string(),
                    sig: sig_of(ty),
                })
                .collect(),
            sig_of(ret),
        );
        member.is_static = true;
        self.members.push(member);
        self
    }

    pub fn ctor(mut self, params: &[(&str, &str)]) -> Self {
        self.members.push(Member::constructor(
            params
                .iter()
                .map(|(ty, name)| ParamSig {
                    name: name.to_string(),
                    sig: sig_of(ty),
                })
                .collect(),
        ));
        self
    }

    fn install(self, store: &mut TypeStore) {
        let qualified = self.descriptor.qualified_name.clone();
        store.add_type(self.descriptor);
        for member in self.members {
            store.add_member(&qualified, member);
        }
    }
}

/// Common JDK-ish types every fixture can rely on.
fn base_store() -> TypeStore {
    let mut store = TypeStore::new();
    for spec in [
        class_("java.lang.String"),
        class_("java.lang.Integer"),
        class_("java.lang.Boolean"),
        class_("java.lang.Object"),
        class_("java.util.Date"),
        class_("java.util.List").interface(),
        class_("java.util.ArrayList").extends("java.util.List"),
        class_("java.io.IOException").throwable(),
        class_("groovy.lang.Closure"),
    ] {
        spec.install(&mut store);
    }
    store
}

// ----------------------------
// Fixture
// ----------------------------

pub fn t(input_with_cursor: &str) -> Fixture {
    let cursor = input_with_cursor
        .find("$0")
        .expect("fixture must contain $0 marker");
    let source = input_with_cursor.replace("$0", "");
    assert!(
        source.len() + 2 == input_with_cursor.len(),
        "fixture must contain exactly one $0 marker"
    );

    Fixture {
        source,
        offset: cursor as u32,
        store: base_store(),
        registry: Registry::new(),
        extensions: ExtensionMethods::new(),
        natures: Vec::new(),
        config: CompletionConfig::default(),
        output: None,
    }
}

pub struct Fixture {
    pub source: String,
    pub offset: u32,
    pub store: TypeStore,
    pub registry: Registry,
    pub extensions: ExtensionMethods,
    pub natures: Vec<String>,
    pub config: CompletionConfig,
    output: Option<AssistOutput>,
}

impl Fixture {
    pub fn with(mut self, spec: ClassSpec) -> Self {
        spec.install(&mut self.store);
        self
    }

    pub fn extensions(mut self, extensions: ExtensionMethods) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn nature(mut self, nature: &str) -> Self {
        self.natures.push(nature.to_string());
        self
    }

    pub fn config(mut self, f: impl FnOnce(&mut CompletionConfig)) -> Self {
        f(&mut self.config);
        self
    }

    fn ensure_run(&mut self) -> &AssistOutput {
        if self.output.is_none() {
            let formatter = PlainFormatter::default();
            let workspace = Workspace {
                oracle: &self.store,
                registry: &self.registry,
                extensions: &self.extensions,
                formatter: &formatter,
                natures: self.natures.clone(),
            };
            let output =
                compute_proposals(&self.source, self.offset, &workspace, self.config.clone())
                    .expect("completion request failed");
            self.output = Some(output);
        }
        self.output.as_ref().expect("output computed")
    }

    pub fn output(mut self) -> AssistOutput {
        self.ensure_run();
        self.output.expect("output computed")
    }

    pub fn location(&mut self) -> AssistLocation {
        self.ensure_run().location
    }

    fn names(&mut self) -> Vec<String> {
        self.ensure_run()
            .proposals
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn proposal(&mut self, name: &str) -> Proposal {
        let out = self.ensure_run();
        out.proposals
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| {
                panic!(
                    "missing proposal {name}\nactual: {:?}",
                    out.proposals.iter().map(|p| &p.name).collect::<Vec<_>>()
                )
            })
            .clone()
    }

    // ----- expectations -----

    pub fn expect_location(mut self, location: AssistLocation) -> Self {
        let out = self.ensure_run();
        assert_eq!(out.location, location, "location mismatch");
        self
    }

    pub fn expect_contains(mut self, name: &str) -> Self {
        let names = self.names();
        assert!(
            names.iter().any(|n| n == name),
            "expected proposal {name}\nactual: {names:?}"
        );
        self
    }

    pub fn expect_not_contains(mut self, name: &str) -> Self {
        let names = self.names();
        assert!(
            !names.iter().any(|n| n == name),
            "expected NO proposal {name}\nactual: {names:?}"
        );
        self
    }

    pub fn expect_count(mut self, name: &str, expected: usize) -> Self {
        let names = self.names();
        let count = names.iter().filter(|n| *n == name).count();
        assert_eq!(
            count, expected,
            "count mismatch for {name}\nactual: {names:?}"
        );
        self
    }

    pub fn expect_empty(mut self) -> Self {
        let names = self.names();
        assert!(names.is_empty(), "expected no proposals, got {names:?}");
        self
    }

    pub fn expect_order(mut self, before: &str, after: &str) -> Self {
        let names = self.names();
        let b = names
            .iter()
            .position(|n| n == before)
            .unwrap_or_else(|| panic!("missing {before}\nactual: {names:?}"));
        let a = names
            .iter()
            .position(|n| n == after)
            .unwrap_or_else(|| panic!("missing {after}\nactual: {names:?}"));
        assert!(
            b < a,
            "expected {before} before {after} ({b} vs {a})\nactual: {names:?}"
        );
        self
    }

    pub fn expect_kind(mut self, name: &str, kind: ProposalKind) -> Self {
        let proposal = self.proposal(name);
        assert_eq!(proposal.kind, kind, "kind mismatch for {name}");
        self
    }

    pub fn expect_replacement(mut self, name: &str, replacement: &str) -> Self {
        let proposal = self.proposal(name);
        assert_eq!(
            proposal.replacement, replacement,
            "replacement mismatch for {name}"
        );
        self
    }

    pub fn expect_label(mut self, name: &str, label: &str) -> Self {
        let proposal = self.proposal(name);
        assert_eq!(proposal.label, label, "label mismatch for {name}");
        self
    }

    // ----- application -----

    pub fn apply(mut self, name: &str) -> Applied {
        let source = self.source.clone();
        let proposal = self.proposal(name);
        let applied = apply_proposal(&proposal, &Document::new(source));
        Applied {
            text: applied.text,
            cursor: applied.cursor,
        }
    }
}

pub struct Applied {
    pub text: String,
    pub cursor: u32,
}

impl Applied {
    /// With a `$0` marker, asserts both the text and the cursor position;
    /// without one, only the text.
    pub fn expect_text(self, expected: &str) -> Self {
        if let Some(idx) = expected.find("$0") {
            assert_eq!(
                expected.matches("$0").count(),
                1,
                "expected_text must contain exactly one $0 marker"
            );
            let expected_text = expected.replace("$0", "");
            assert_eq!(self.text, expected_text, "text mismatch");
            assert_eq!(self.cursor, idx as u32, "cursor mismatch");
        } else {
            assert_eq!(self.text, expected, "text mismatch");
        }
        self
    }
}
