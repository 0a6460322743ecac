//! Parameter guessing: ordered fill-in candidates for a parameter slot.
//!
//! Candidates come from the extended-context index first: variables whose
//! recorded erasure matches the parameter's exactly, most recently declared
//! first (the deterministic tie-break this engine commits to). Literal
//! defaults per type family follow. A slot with no exact match and no
//! literal rule gets no guesses.

use crate::scope::ExtendedContext;
use crate::sig::TypeSig;

pub(crate) fn guess_values(sig: &TypeSig, extended: &ExtendedContext) -> Vec<String> {
    let mut choices: Vec<String> = extended
        .names_for(sig)
        .iter()
        .rev()
        .cloned()
        .collect();

    if sig.is_numeric() {
        choices.push("0".to_string());
    } else if sig.is_boolean() {
        choices.push("false".to_string());
        choices.push("true".to_string());
    } else if sig.is_string() {
        choices.push("\"\"".to_string());
    }

    choices
}

/// The literal used when a named argument's value slot has no guess at all.
pub(crate) const VALUE_PLACEHOLDER: &str = "__";
