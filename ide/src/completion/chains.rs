//! Command-chain completion.
//!
//! `start.first 'foo' second 'bar' third` is a flattened sequence of
//! parenthesis-less calls; completing the trailing name means resolving the
//! chain left-to-right through the oracle and offering the members of the
//! final link's type. The parser only builds chain nodes behind an explicit
//! receiver, so bare `first 'foo' second` statements never get here.

use analyzer::ast::{Expr, ExprKind};

use super::{Proposal, SynthError, methods, vars};
use crate::context::AssistContext;
use crate::extensions::ExtensionMethods;
use crate::oracle::{MemberKind, TypeOracle};
use crate::scope::{self, ExtendedContext};
use crate::sig::TypeSig;

/// True when the member-access target completes a command chain.
pub(crate) fn is_chain_target(target: &Expr) -> bool {
    let receiver = match &target.kind {
        ExprKind::Property { receiver, .. } => receiver,
        ExprKind::Call {
            receiver: Some(receiver),
            ..
        } => receiver,
        _ => return false,
    };
    contains_command_call(receiver)
}

fn contains_command_call(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Call {
            command, receiver, ..
        } => {
            *command
                || receiver
                    .as_deref()
                    .is_some_and(contains_command_call)
        }
        ExprKind::Property { receiver, .. } => contains_command_call(receiver),
        _ => false,
    }
}

/// Proposals for the trailing name of a command chain.
pub(crate) fn proposals(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
    extended: &ExtendedContext,
    guessing: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let Some(target) = ctx.target else {
        return Ok(Vec::new());
    };
    let receiver = match &target.kind {
        ExprKind::Property { receiver, .. } => receiver,
        ExprKind::Call {
            receiver: Some(receiver),
            ..
        } => receiver,
        _ => return Ok(Vec::new()),
    };

    let tip = chain_tip_sig(ctx, receiver, oracle, extensions);
    if tip.is_unknown() {
        return Ok(Vec::new());
    }

    let bindings = scope::receiver_bindings(&tip, oracle, extensions);
    let mut proposals = vars::from_bindings(ctx, &bindings)?;
    proposals.extend(methods::from_bindings(ctx, &bindings, extended, guessing)?);
    Ok(proposals)
}

/// Folds the chain left-to-right: the head resolves like any expression,
/// each command link maps through the method's return type.
fn chain_tip_sig(
    ctx: &AssistContext<'_>,
    expr: &Expr,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> TypeSig {
    match &expr.kind {
        ExprKind::Call {
            receiver: Some(receiver),
            name,
            command: true,
            ..
        } => {
            let recv = chain_tip_sig(ctx, receiver, oracle, extensions);
            method_return(&recv, &name.name, oracle, extensions)
        }
        _ => scope::infer_expr_in_ctx(ctx, expr, oracle, extensions),
    }
}

fn method_return(
    receiver: &TypeSig,
    name: &str,
    oracle: &dyn TypeOracle,
    extensions: &ExtensionMethods,
) -> TypeSig {
    for (member, _) in scope::type_members(receiver, oracle) {
        if member.kind == MemberKind::Method && member.name == name {
            return member.sig.clone();
        }
    }
    for member in extensions.for_receiver(receiver) {
        if member.name == name {
            return member.sig.clone();
        }
    }
    TypeSig::unknown()
}
