//! Static-import member proposals.
//!
//! Explicit (`import static a.b.C.max`) and on-demand (`import static
//! a.b.C.*`) forms resolve against the oracle; a member imported through
//! both forms still yields exactly one proposal.

use super::methods::call_proposal;
use super::{Proposal, ProposalKind, SynthError, matches_prefix};
use crate::context::AssistContext;
use crate::oracle::{MemberKind, TypeOracle};
use crate::scope::ExtendedContext;
use crate::sig::TypeSig;

pub(crate) fn proposals(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    extended: &ExtendedContext,
    guessing: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let mut proposals = Vec::new();
    let mut seen: Vec<(String, String)> = Vec::new();
    let mut order = 0usize;

    for import in &ctx.module.imports {
        if !import.is_static || import.name.is_empty() {
            continue;
        }

        let (type_name, only_member) = if import.wildcard {
            (import.name.dotted(), None)
        } else {
            let dotted = import.name.dotted();
            match dotted.rsplit_once('.') {
                Some((ty, member)) => (ty.to_string(), Some(member.to_string())),
                None => continue,
            }
        };

        let Some(descriptor) = oracle.resolve_type(&type_name) else {
            continue;
        };
        for member in oracle.members_of(&descriptor) {
            if !member.is_static {
                continue;
            }
            if let Some(only) = &only_member
                && &member.name != only
            {
                continue;
            }
            if !matches_prefix(&member.name, &ctx.prefix) {
                continue;
            }

            let key = (descriptor.qualified_name.clone(), member.name.clone());
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);

            let mut proposal = match member.kind {
                MemberKind::Method => call_proposal(
                    &member,
                    member.params.len(),
                    ProposalKind::StaticImport,
                    ctx.prefix_span,
                    extended,
                    guessing,
                ),
                MemberKind::Field => {
                    let mut p = Proposal::new(
                        format!("{} : {}", member.name, member.sig.simple_display()),
                        member.name.clone(),
                        ProposalKind::StaticImport,
                        member.name.clone(),
                        ctx.prefix_span,
                    );
                    p.owner = Some(member.declared_in.clone());
                    p
                }
                MemberKind::Constructor => continue,
            };
            proposal.order = order;
            order += 1;
            proposals.push(proposal);
        }
    }

    Ok(proposals)
}

/// Static members offered on an explicit type receiver (`Math.|`).
pub(crate) fn type_receiver_statics(
    ctx: &AssistContext<'_>,
    receiver_type: &TypeSig,
    oracle: &dyn TypeOracle,
    extended: &ExtendedContext,
    guessing: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let Some(name) = receiver_type.object_name() else {
        return Ok(Vec::new());
    };
    let Some(descriptor) = oracle.resolve_type(name) else {
        return Ok(Vec::new());
    };

    let mut proposals = Vec::new();
    for (order, member) in oracle
        .members_of(&descriptor)
        .iter()
        .filter(|m| m.is_static)
        .enumerate()
    {
        if !matches_prefix(&member.name, &ctx.prefix) {
            continue;
        }
        let mut proposal = match member.kind {
            MemberKind::Method => call_proposal(
                member,
                member.params.len(),
                ProposalKind::Method,
                ctx.prefix_span,
                extended,
                guessing,
            ),
            MemberKind::Field => Proposal::new(
                format!("{} : {}", member.name, member.sig.simple_display()),
                member.name.clone(),
                ProposalKind::Field,
                member.name.clone(),
                ctx.prefix_span,
            ),
            MemberKind::Constructor => continue,
        };
        proposal.order = order;
        proposals.push(proposal);
    }
    Ok(proposals)
}
