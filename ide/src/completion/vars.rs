//! Local-variable, field, and accessor proposals from resolved bindings.

use super::{Proposal, ProposalKind, SynthError, matches_prefix};
use crate::context::AssistContext;
use crate::scope::{Binding, BindingKind};

/// Proposals for the non-method bindings in scope (or of a receiver type).
pub(crate) fn from_bindings(
    ctx: &AssistContext<'_>,
    bindings: &[Binding],
) -> Result<Vec<Proposal>, SynthError> {
    let mut proposals = Vec::new();

    for binding in bindings {
        if !matches_binding(binding, &ctx.prefix) {
            continue;
        }
        let kind = match binding.kind {
            BindingKind::Local => ProposalKind::LocalVariable,
            BindingKind::Field => ProposalKind::Field,
            BindingKind::Accessor => ProposalKind::Accessor,
            BindingKind::Method => continue,
        };

        let (label, replacement, cursor) = match kind {
            ProposalKind::Accessor => {
                // Accessors render as calls: `getAaa()` / `setAaa(value)`.
                let takes_value = binding
                    .member
                    .as_ref()
                    .is_some_and(|m| !m.params.is_empty());
                let replacement = format!("{}()", binding.name);
                let cursor = if takes_value {
                    // Inside the parens, awaiting the value.
                    Some(replacement.len() as u32 - 1)
                } else {
                    None
                };
                (
                    format!("{}() : {}", binding.name, binding.sig.simple_display()),
                    replacement,
                    cursor,
                )
            }
            _ => (
                format!("{} : {}", binding.name, binding.sig.simple_display()),
                binding.name.clone(),
                None,
            ),
        };

        let mut proposal = Proposal::new(
            label,
            binding.name.clone(),
            kind,
            replacement,
            ctx.prefix_span,
        );
        proposal.cursor_in_replacement = cursor;
        proposal.owner = binding.owner.clone();
        proposal.depth = binding.depth;
        proposal.order = binding.order;
        proposal.detail = binding.owner.as_ref().map(|o| o.to_string());
        proposals.push(proposal);
    }

    Ok(proposals)
}

/// Accessors also answer to their property's name, so completing `aa`
/// surfaces `aaa`, `getAaa`, and `setAaa` together.
fn matches_binding(binding: &Binding, prefix: &str) -> bool {
    if matches_prefix(&binding.name, prefix) {
        return true;
    }
    if binding.kind != BindingKind::Accessor {
        return false;
    }
    let base = binding
        .name
        .strip_prefix("get")
        .or_else(|| binding.name.strip_prefix("set"))
        .or_else(|| binding.name.strip_prefix("is"))
        .unwrap_or(&binding.name);
    matches_prefix(base, prefix)
}
