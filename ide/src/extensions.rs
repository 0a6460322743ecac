//! Extension-method table: methods injected onto receivers the declaring
//! type never heard of (the "default Groovy methods" pattern).
//!
//! Entries are keyed by receiver signature; `universal` entries attach to
//! every receiver and are also callable bare from script/closure/method
//! bodies. Visibility by enclosing position is decided in `scope`, not here.

use std::collections::HashMap;

use crate::oracle::{Member, ParamSig};
use crate::sig::TypeSig;

#[derive(Default)]
pub struct ExtensionMethods {
    by_receiver: HashMap<TypeSig, Vec<Member>>,
    universal: Vec<Member>,
}

impl ExtensionMethods {
    pub fn new() -> ExtensionMethods {
        ExtensionMethods::default()
    }

    pub fn add(&mut self, receiver: TypeSig, member: Member) {
        self.by_receiver.entry(receiver).or_default().push(member);
    }

    pub fn add_universal(&mut self, member: Member) {
        self.universal.push(member);
    }

    /// Extensions applicable to `receiver`, including the boxed/unboxed twin
    /// signature and the universal set.
    pub fn for_receiver(&self, receiver: &TypeSig) -> Vec<&Member> {
        let mut out: Vec<&Member> = Vec::new();
        if let Some(members) = self.by_receiver.get(receiver) {
            out.extend(members);
        }
        if let Some(boxed) = receiver.boxed_pair()
            && let Some(members) = self.by_receiver.get(&boxed)
        {
            out.extend(members);
        }
        out.extend(&self.universal);
        out
    }

    pub fn universal(&self) -> &[Member] {
        &self.universal
    }

    /// A small built-in slice of the standard extension set; embeddings
    /// normally register their own table.
    pub fn standard() -> ExtensionMethods {
        let mut table = ExtensionMethods::new();

        let integer = TypeSig::object("java.lang.Integer");
        table.add(
            integer.clone(),
            Member::method("abs", Vec::new(), integer.clone()),
        );
        table.add(
            integer.clone(),
            Member::method(
                "times",
                vec![ParamSig {
                    name: "closure".to_string(),
                    sig: TypeSig::object("groovy.lang.Closure"),
                }],
                TypeSig::from_name("void", 0),
            ),
        );

        let list = TypeSig::object("java.util.List");
        for name in ["each", "collect", "find"] {
            table.add(
                list.clone(),
                Member::method(
                    name,
                    vec![ParamSig {
                        name: "closure".to_string(),
                        sig: TypeSig::object("groovy.lang.Closure"),
                    }],
                    TypeSig::object("java.lang.Object"),
                ),
            );
        }

        table.add_universal(Member::method(
            "println",
            vec![ParamSig {
                name: "value".to_string(),
                sig: TypeSig::object("java.lang.Object"),
            }],
            TypeSig::from_name("void", 0),
        ));

        table
    }
}
