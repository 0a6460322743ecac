//! JVM-style erasure signatures.
//!
//! Signatures are the currency of symbol resolution: `I` for `int`,
//! `Ljava.lang.String;` for an object type, a `[` prefix per array dimension.
//! Primitive and boxed forms are distinct signatures that the extended-context
//! index treats as interchangeable (see [`TypeSig::boxed_pair`]).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSig(String);

const PRIMITIVES: [(&str, &str, &str); 9] = [
    ("int", "I", "java.lang.Integer"),
    ("boolean", "Z", "java.lang.Boolean"),
    ("long", "J", "java.lang.Long"),
    ("short", "S", "java.lang.Short"),
    ("byte", "B", "java.lang.Byte"),
    ("char", "C", "java.lang.Character"),
    ("float", "F", "java.lang.Float"),
    ("double", "D", "java.lang.Double"),
    ("void", "V", "java.lang.Void"),
];

impl TypeSig {
    /// The placeholder for unresolvable types. Everything degrades to this
    /// rather than failing a request.
    pub fn unknown() -> TypeSig {
        TypeSig("?".to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == "?"
    }

    pub fn object(qualified_name: &str) -> TypeSig {
        TypeSig(format!("L{};", qualified_name))
    }

    /// Builds a signature from a source-level type name (`int`, `String`,
    /// `java.util.Date`) plus array dimensions.
    pub fn from_name(name: &str, array_dims: u8) -> TypeSig {
        let base = PRIMITIVES
            .iter()
            .find(|(src, _, _)| *src == name)
            .map(|(_, sig, _)| (*sig).to_string())
            .unwrap_or_else(|| format!("L{};", name));
        TypeSig(format!("{}{}", "[".repeat(array_dims as usize), base))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn array_dims(&self) -> usize {
        self.0.bytes().take_while(|b| *b == b'[').count()
    }

    fn element_str(&self) -> &str {
        &self.0[self.array_dims()..]
    }

    /// The boxed form of a primitive signature, or the primitive form of a
    /// boxed signature. Array dimensions are preserved. `None` when the
    /// signature is neither.
    pub fn boxed_pair(&self) -> Option<TypeSig> {
        let dims = self.array_dims();
        let elem = self.element_str();

        for (_, prim, boxed) in PRIMITIVES {
            if elem == prim {
                return Some(TypeSig(format!(
                    "{}L{};",
                    "[".repeat(dims),
                    boxed
                )));
            }
            if elem == format!("L{};", boxed) {
                return Some(TypeSig(format!("{}{}", "[".repeat(dims), prim)));
            }
        }
        None
    }

    /// Qualified object name, when this is a (possibly boxed) object type.
    pub fn object_name(&self) -> Option<&str> {
        let elem = self.element_str();
        elem.strip_prefix('L')?.strip_suffix(';')
    }

    /// Source-style rendering: `int`, `java.lang.String`, `int[][]`.
    pub fn display_name(&self) -> String {
        let elem = self.element_str();
        let base = PRIMITIVES
            .iter()
            .find(|(_, sig, _)| *sig == elem)
            .map(|(src, _, _)| (*src).to_string())
            .unwrap_or_else(|| match self.object_name() {
                Some(name) => name.to_string(),
                None => "def".to_string(),
            });
        format!("{}{}", base, "[]".repeat(self.array_dims()))
    }

    /// Like [`display_name`](Self::display_name) but with the package
    /// stripped from object types.
    pub fn simple_display(&self) -> String {
        let display = self.display_name();
        match display.rsplit_once('.') {
            Some((_, simple)) => simple.to_string(),
            None => display,
        }
    }

    pub fn is_numeric(&self) -> bool {
        if self.array_dims() > 0 {
            return false;
        }
        matches!(
            self.element_str(),
            "I" | "J" | "S" | "B" | "F" | "D"
                | "Ljava.lang.Integer;"
                | "Ljava.lang.Long;"
                | "Ljava.lang.Short;"
                | "Ljava.lang.Byte;"
                | "Ljava.lang.Float;"
                | "Ljava.lang.Double;"
                | "Ljava.math.BigDecimal;"
        )
    }

    pub fn is_boolean(&self) -> bool {
        self.array_dims() == 0 && matches!(self.element_str(), "Z" | "Ljava.lang.Boolean;")
    }

    pub fn is_string(&self) -> bool {
        self.array_dims() == 0
            && matches!(self.element_str(), "Ljava.lang.String;" | "LString;")
    }

    /// Closure-typed parameters get trailing-block call rendering.
    pub fn is_closure(&self) -> bool {
        match self.object_name() {
            Some(name) => name == "groovy.lang.Closure" || name.ends_with(".Closure") || name == "Closure",
            None => false,
        }
    }

    /// Strips one array dimension (`[I` → `I`); identity for scalars.
    pub fn element(&self) -> TypeSig {
        match self.0.strip_prefix('[') {
            Some(rest) => TypeSig(rest.to_string()),
            None => self.clone(),
        }
    }
}
