//! Open-argument-list proposals: constructor/method signature display and
//! named-argument synthesis for map-style constructor calls.

use analyzer::Span;

use super::guess::{VALUE_PLACEHOLDER, guess_values};
use super::{
    ContextInformation, LinkedGroup, Proposal, ProposalKind, SynthError, matches_prefix,
};
use crate::context::{AssistContext, CallTarget};
use crate::extensions::ExtensionMethods;
use crate::oracle::{Member, MemberKind, TypeOracle};
use crate::scope::{self, ExtendedContext};
use crate::sig::TypeSig;

pub(crate) fn call_context_proposals(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
    extended: &ExtendedContext,
    named_arguments: bool,
    guessing: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let Some(call) = &ctx.call else {
        return Ok(Vec::new());
    };

    match call.target {
        CallTarget::Ctor(ty) => {
            let sig = scope::type_ref_sig(ty, oracle);
            if sig.is_unknown() {
                return Ok(Vec::new());
            }
            ctor_proposals(ctx, &sig, oracle, extended, named_arguments, guessing)
        }
        CallTarget::Method { receiver, name } => {
            method_signatures(ctx, receiver, &name.name, oracle, extensions)
        }
    }
}

fn ctor_proposals(
    ctx: &AssistContext<'_>,
    type_sig: &TypeSig,
    oracle: &dyn TypeOracle,
    extended: &ExtendedContext,
    named_arguments: bool,
    guessing: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let simple = type_sig.simple_display();
    let members = scope::type_members(type_sig, oracle);

    // Only the type's own constructors count; inherited ones neither apply
    // nor suppress named arguments.
    let ctors: Vec<&Member> = members
        .iter()
        .filter(|(m, depth)| *depth == 0 && m.kind == MemberKind::Constructor)
        .map(|(m, _)| m)
        .collect();

    let mut proposals = Vec::new();
    let mut order = 0usize;

    if ctors.is_empty() {
        proposals.push(signature_proposal(
            ctx,
            format!("{}()", simple),
            &simple,
            ProposalKind::Constructor,
            Vec::new(),
            &mut order,
        ));
    }
    for ctor in &ctors {
        let rendered: Vec<String> = ctor
            .params
            .iter()
            .map(|p| format!("{} {}", p.sig.simple_display(), p.name))
            .collect();
        proposals.push(signature_proposal(
            ctx,
            format!("{}({})", simple, rendered.join(", ")),
            &simple,
            ProposalKind::Constructor,
            rendered,
            &mut order,
        ));
    }

    // Named-argument synthesis is suppressed by any user-declared
    // constructor.
    if named_arguments && ctors.is_empty() {
        let supplied = supplied_labels(ctx);
        for (member, _) in members
            .iter()
            .filter(|(m, _)| m.kind == MemberKind::Field && !m.is_final && !m.is_static)
        {
            if supplied.iter().any(|s| s == &member.name) {
                continue;
            }
            if !matches_prefix(&member.name, &ctx.prefix) {
                continue;
            }
            proposals.push(named_arg_proposal(ctx, member, extended, guessing, &mut order));
        }
    }

    Ok(proposals)
}

fn signature_proposal(
    ctx: &AssistContext<'_>,
    display: String,
    name: &str,
    kind: ProposalKind,
    parameters: Vec<String>,
    order: &mut usize,
) -> Proposal {
    // Context-information-only: applying it must leave the document
    // byte-identical.
    let mut proposal = Proposal::new(
        display.clone(),
        name,
        kind,
        "",
        Span::point(ctx.offset),
    );
    proposal.context_info = Some(ContextInformation {
        display,
        parameters,
    });
    proposal.order = *order;
    *order += 1;
    proposal
}

fn named_arg_proposal(
    ctx: &AssistContext<'_>,
    member: &Member,
    extended: &ExtendedContext,
    guessing: bool,
    order: &mut usize,
) -> Proposal {
    let choices = if guessing {
        guess_values(&member.sig, extended)
    } else {
        Vec::new()
    };
    let value = choices
        .first()
        .cloned()
        .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string());

    let replacement = format!("{}: {}", member.name, value);
    let value_offset = (replacement.len() - value.len()) as u32;

    let mut proposal = Proposal::new(
        format!("{} : __", member.name),
        member.name.clone(),
        ProposalKind::NamedArgument,
        replacement,
        ctx.prefix_span,
    );
    proposal.linked_groups = vec![LinkedGroup {
        offset: value_offset,
        length: value.len() as u32,
        choices,
    }];
    proposal.detail = Some(member.sig.simple_display());
    proposal.owner = Some(member.declared_in.clone());
    proposal.order = *order;
    *order += 1;
    proposal
}

fn supplied_labels(ctx: &AssistContext<'_>) -> Vec<String> {
    ctx.call
        .as_ref()
        .map(|call| {
            call.args
                .args
                .iter()
                .filter_map(|arg| arg.label.as_ref().map(|l| l.name.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Signature display for an open method-call argument list.
fn method_signatures(
    ctx: &AssistContext<'_>,
    receiver: Option<&analyzer::ast::Expr>,
    name: &str,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> Result<Vec<Proposal>, SynthError> {
    let mut order = 0usize;
    let mut proposals = Vec::new();

    let mut push_member = |member: &Member, proposals: &mut Vec<Proposal>, order: &mut usize| {
        if member.name != name {
            return;
        }
        let rendered: Vec<String> = member
            .params
            .iter()
            .map(|p| format!("{} {}", p.sig.simple_display(), p.name))
            .collect();
        let display = format!(
            "{}({}) : {}",
            member.name,
            rendered.join(", "),
            member.sig.simple_display()
        );
        proposals.push(signature_proposal(
            ctx,
            display,
            &member.name,
            ProposalKind::Signature,
            rendered,
            order,
        ));
    };

    match receiver {
        Some(receiver) => {
            let recv_sig = scope::infer_expr_in_ctx(ctx, receiver, oracle, extensions);
            for (member, _) in scope::type_members(&recv_sig, oracle) {
                if member.kind == MemberKind::Method {
                    push_member(&member, &mut proposals, &mut order);
                }
            }
            for member in extensions.for_receiver(&recv_sig) {
                push_member(member, &mut proposals, &mut order);
            }
        }
        None => {
            // Free calls: the enclosing class's methods plus universal
            // extensions.
            if let Some(class) = ctx.enclosing_class {
                for member in &class.members {
                    if let analyzer::ast::Member::Method(method) = member
                        && !method.is_ctor
                    {
                        let as_member = scope::method_member(class, method, oracle);
                        push_member(&as_member, &mut proposals, &mut order);
                    }
                }
            }
            for member in extensions.universal() {
                push_member(member, &mut proposals, &mut order);
            }
        }
    }

    Ok(proposals)
}
