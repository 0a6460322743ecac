//! External collaborator contracts: the host's symbol-table oracle and the
//! document it edits.
//!
//! The engine never owns persistent symbol data; it queries the oracle
//! per request and treats every answer as a read-only snapshot. `TypeStore`
//! is the in-memory implementation used by tests and standalone embeddings.

use std::cell::Cell;
use std::collections::BTreeMap;

use analyzer::TextEdit;
use serde::{Deserialize, Serialize};

use crate::sig::TypeSig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    PackageDefault,
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSig {
    pub name: String,
    pub sig: TypeSig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub params: Vec<ParamSig>,
    /// Return type for methods, field type for fields.
    pub sig: TypeSig,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub declared_in: String,
    /// Number of trailing parameters that carry default values; each one
    /// yields an additional callable arity.
    pub default_params: usize,
}

impl Member {
    pub fn field(name: &str, sig: TypeSig) -> Member {
        Member {
            name: name.to_string(),
            kind: MemberKind::Field,
            params: Vec::new(),
            sig,
            visibility: Visibility::PackageDefault,
            is_static: false,
            is_final: false,
            declared_in: String::new(),
            default_params: 0,
        }
    }

    pub fn method(name: &str, params: Vec<ParamSig>, ret: TypeSig) -> Member {
        Member {
            name: name.to_string(),
            kind: MemberKind::Method,
            params,
            sig: ret,
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            declared_in: String::new(),
            default_params: 0,
        }
    }

    pub fn constructor(params: Vec<ParamSig>) -> Member {
        Member {
            name: "<init>".to_string(),
            kind: MemberKind::Constructor,
            params,
            sig: TypeSig::unknown(),
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            declared_in: String::new(),
            default_params: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub qualified_name: String,
    pub kind: TypeKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub is_throwable: bool,
}

impl TypeDescriptor {
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map(|(_, simple)| simple)
            .unwrap_or(&self.qualified_name)
    }

    pub fn package(&self) -> &str {
        self.qualified_name
            .rsplit_once('.')
            .map(|(pkg, _)| pkg)
            .unwrap_or("")
    }

    pub fn sig(&self) -> TypeSig {
        TypeSig::object(&self.qualified_name)
    }
}

/// The host's symbol table. Resolution degrades gracefully: a `None` from
/// `resolve_type` means "no inherited bindings from here", never a failed
/// request.
pub trait TypeOracle {
    /// Resolves a simple or qualified type name.
    fn resolve_type(&self, name: &str) -> Option<TypeDescriptor>;

    /// Declared members only; supertype members are gathered by the caller
    /// through `resolve_type` on the descriptor's supertypes.
    fn members_of(&self, ty: &TypeDescriptor) -> Vec<Member>;

    /// All known qualified type names, in a deterministic order.
    fn type_names(&self) -> Vec<String>;

    fn package_names(&self) -> Vec<String>;

    /// True while the host's index is (re)building. Requests poll this with
    /// a bounded timeout.
    fn is_indexing_in_progress(&self) -> bool {
        false
    }
}

/// In-memory oracle.
#[derive(Default)]
pub struct TypeStore {
    types: BTreeMap<String, (TypeDescriptor, Vec<Member>)>,
    packages: Vec<String>,
    /// Remaining polls that report "indexing in progress".
    indexing_polls: Cell<u32>,
}

impl TypeStore {
    pub fn new() -> TypeStore {
        TypeStore::default()
    }

    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        let package = descriptor.package().to_string();
        if !package.is_empty() && !self.packages.contains(&package) {
            self.packages.push(package);
            self.packages.sort();
        }
        self.types
            .insert(descriptor.qualified_name.clone(), (descriptor, Vec::new()));
    }

    pub fn add_member(&mut self, qualified_name: &str, mut member: Member) {
        if let Some((_, members)) = self.types.get_mut(qualified_name) {
            member.declared_in = qualified_name.to_string();
            members.push(member);
        }
    }

    /// Makes `is_indexing_in_progress` report `true` for the next `polls`
    /// calls. Models a host index that finishes mid-request.
    pub fn set_indexing_polls(&self, polls: u32) {
        self.indexing_polls.set(polls);
    }
}

impl TypeOracle for TypeStore {
    fn resolve_type(&self, name: &str) -> Option<TypeDescriptor> {
        if let Some((descriptor, _)) = self.types.get(name) {
            return Some(descriptor.clone());
        }
        // Simple-name lookup; first match in qualified-name order.
        self.types
            .values()
            .find(|(d, _)| d.simple_name() == name)
            .map(|(d, _)| d.clone())
    }

    fn members_of(&self, ty: &TypeDescriptor) -> Vec<Member> {
        self.types
            .get(&ty.qualified_name)
            .map(|(_, members)| members.clone())
            .unwrap_or_default()
    }

    fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    fn package_names(&self) -> Vec<String> {
        self.packages.clone()
    }

    fn is_indexing_in_progress(&self) -> bool {
        let remaining = self.indexing_polls.get();
        if remaining == 0 {
            return false;
        }
        self.indexing_polls.set(remaining - 1);
        true
    }
}

/// The editable buffer handed to [`apply_proposal`](crate::edit::apply_proposal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Document {
        Document { text: text.into() }
    }

    /// Applies one edit atomically. Out-of-bounds or non-boundary edits are
    /// rejected wholesale so a bad edit can never leave partial text.
    pub fn apply(&mut self, edit: &TextEdit) -> bool {
        let start = edit.range.start as usize;
        let end = edit.range.end as usize;
        if start > end || end > self.text.len() {
            return false;
        }
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return false;
        }
        self.text.replace_range(start..end, &edit.new_text);
        true
    }
}
