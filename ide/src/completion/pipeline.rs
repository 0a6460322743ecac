//! Per-location proposal synthesis.
//!
//! Each synthesizer is isolated: a failure is logged and contributes zero
//! proposals while the others still run. Registry providers/filters and
//! ranking run after synthesis.

use tracing::{debug, warn};

use super::types::TypeFilter;
use super::{
    CompletionConfig, Proposal, SynthError, chains, constructors, keywords, methods, rank,
    statics, types, vars,
};
use crate::context::{AssistContext, AssistLocation};
use crate::scope::{self, Scope};
use crate::sig::TypeSig;
use crate::workspace::Workspace;

pub(crate) fn compute(
    ctx: &AssistContext<'_>,
    workspace: &Workspace<'_>,
    config: &CompletionConfig,
) -> Vec<Proposal> {
    let mut proposals = Vec::new();

    if ctx.in_string {
        return proposals;
    }

    let scope = scope::resolve_scope(ctx, workspace.oracle, workspace.extensions);
    debug!(
        location = ?ctx.location,
        prefix = %ctx.prefix,
        bindings = scope.bindings.len(),
        "classified completion request"
    );

    let mut run = |name: &str,
                   result: Result<Vec<Proposal>, SynthError>,
                   proposals: &mut Vec<Proposal>| {
        match result {
            Ok(batch) => proposals.extend(batch),
            Err(err) => warn!(synthesizer = name, error = %err, "synthesizer failed"),
        }
    };

    match ctx.location {
        AssistLocation::Script | AssistLocation::Statement => {
            run(
                "vars",
                vars::from_bindings(ctx, &scope.bindings),
                &mut proposals,
            );
            run(
                "methods",
                methods::from_bindings(
                    ctx,
                    &scope.bindings,
                    &scope.extended,
                    config.parameter_guessing,
                ),
                &mut proposals,
            );
            run(
                "statics",
                statics::proposals(ctx, workspace.oracle, &scope.extended, config.parameter_guessing),
                &mut proposals,
            );
            run(
                "types",
                types::proposals(ctx, workspace.oracle, TypeFilter::Any),
                &mut proposals,
            );
        }
        AssistLocation::Expression => {
            expression_proposals(ctx, workspace, config, &scope, &mut run, &mut proposals);
        }
        AssistLocation::MethodContext => {
            run(
                "calls",
                constructors::call_context_proposals(
                    ctx,
                    workspace.oracle,
                    workspace.extensions,
                    &scope.extended,
                    config.named_arguments,
                    config.parameter_guessing,
                ),
                &mut proposals,
            );
        }
        AssistLocation::Import => {
            run(
                "import-header",
                types::header_proposals(ctx, workspace.oracle, true),
                &mut proposals,
            );
        }
        AssistLocation::Package => {
            run(
                "package-header",
                types::header_proposals(ctx, workspace.oracle, false),
                &mut proposals,
            );
        }
        AssistLocation::ClassBody => {
            // Existing member names rank above keywords; new-member stubs
            // rank below both.
            run(
                "members",
                vars::from_bindings(ctx, &scope.bindings),
                &mut proposals,
            );
            run(
                "methods",
                methods::from_bindings(
                    ctx,
                    &scope.bindings,
                    &scope.extended,
                    config.parameter_guessing,
                ),
                &mut proposals,
            );
            run("keywords", keywords::proposals(ctx), &mut proposals);
            run(
                "override-stubs",
                methods::override_stubs(ctx, workspace.oracle, workspace.formatter),
                &mut proposals,
            );
            run(
                "types",
                types::proposals(ctx, workspace.oracle, TypeFilter::Any),
                &mut proposals,
            );
        }
        AssistLocation::Extends => {
            run(
                "types",
                types::proposals(ctx, workspace.oracle, TypeFilter::Classes),
                &mut proposals,
            );
        }
        AssistLocation::Implements => {
            run(
                "types",
                types::proposals(ctx, workspace.oracle, TypeFilter::Interfaces),
                &mut proposals,
            );
        }
        AssistLocation::Exceptions => {
            run(
                "types",
                types::proposals(ctx, workspace.oracle, TypeFilter::Throwables),
                &mut proposals,
            );
        }
        AssistLocation::Parameter => {
            run(
                "types",
                types::proposals(ctx, workspace.oracle, TypeFilter::Any),
                &mut proposals,
            );
        }
    }

    workspace
        .registry
        .apply(&workspace.natures, ctx, &mut proposals);

    rank::rank(&mut proposals, &ctx.prefix);

    if proposals.len() > config.proposal_limit {
        proposals.truncate(config.proposal_limit);
    }
    proposals
}

fn expression_proposals(
    ctx: &AssistContext<'_>,
    workspace: &Workspace<'_>,
    config: &CompletionConfig,
    scope_info: &Scope,
    run: &mut impl FnMut(&str, Result<Vec<Proposal>, SynthError>, &mut Vec<Proposal>),
    proposals: &mut Vec<Proposal>,
) {
    let Some(target) = ctx.target else {
        return;
    };

    if chains::is_chain_target(target) {
        run(
            "chains",
            chains::proposals(
                ctx,
                workspace.oracle,
                workspace.extensions,
                &scope_info.extended,
                config.parameter_guessing,
            ),
            proposals,
        );
        return;
    }

    // Type-name receivers complete against static members.
    if let Some(type_sig) = type_receiver(ctx, workspace) {
        run(
            "statics",
            statics::type_receiver_statics(
                ctx,
                &type_sig,
                workspace.oracle,
                &scope_info.extended,
                config.parameter_guessing,
            ),
            proposals,
        );
        return;
    }

    let receiver_sig = scope::infer_receiver_sig(ctx, workspace.oracle, workspace.extensions);
    let bindings = scope::receiver_bindings(&receiver_sig, workspace.oracle, workspace.extensions);
    run("vars", vars::from_bindings(ctx, &bindings), proposals);
    run(
        "methods",
        methods::from_bindings(
            ctx,
            &bindings,
            &scope_info.extended,
            config.parameter_guessing,
        ),
        proposals,
    );
}

/// `Math.|`-style completion: the receiver is a bare capitalized name that
/// is not a visible variable but resolves as a type.
fn type_receiver(ctx: &AssistContext<'_>, workspace: &Workspace<'_>) -> Option<TypeSig> {
    let target = ctx.target?;
    let receiver = match &target.kind {
        analyzer::ast::ExprKind::Property { receiver, .. } => receiver,
        _ => return None,
    };
    let analyzer::ast::ExprKind::Var(name) = &receiver.kind else {
        return None;
    };

    let inferred =
        scope::infer_receiver_sig(ctx, workspace.oracle, workspace.extensions);
    if !inferred.is_unknown() {
        return None;
    }

    workspace
        .oracle
        .resolve_type(&name.name)
        .map(|descriptor| descriptor.sig())
}
