//! Method proposals: default-parameter arity expansion, Groovy-style call
//! rendering, parameter-guess linked groups, and override stubs for
//! class-body positions.

use analyzer::Span;

use super::guess::guess_values;
use super::{
    ContextInformation, LinkedGroup, Proposal, ProposalKind, SynthError, matches_prefix,
};
use crate::context::AssistContext;
use crate::format::{Formatter, SnippetKind, extract_indent_string};
use crate::oracle::{Member, MemberKind, TypeOracle};
use crate::scope::{Binding, BindingKind, BindingOrigin, ExtendedContext, type_members};

/// Method proposals from resolved bindings, one per callable arity.
pub(crate) fn from_bindings(
    ctx: &AssistContext<'_>,
    bindings: &[Binding],
    extended: &ExtendedContext,
    guessing: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let mut proposals = Vec::new();

    for binding in bindings {
        if binding.kind != BindingKind::Method {
            continue;
        }
        if !matches_prefix(&binding.name, &ctx.prefix) {
            continue;
        }
        let Some(member) = &binding.member else {
            continue;
        };

        let kind = match binding.origin {
            BindingOrigin::Extension => ProposalKind::ExtensionMethod,
            BindingOrigin::UserDeclared => ProposalKind::Method,
        };

        // `def m(int a, String b = 'x', int c = 9)` is callable at arities
        // 1, 2, and 3; each gets its own proposal.
        let min_arity = member.params.len().saturating_sub(member.default_params);
        for arity in min_arity..=member.params.len() {
            let mut proposal = call_proposal(
                member,
                arity,
                kind,
                ctx.prefix_span,
                extended,
                guessing,
            );
            proposal.depth = binding.depth;
            proposal.order = binding.order;
            proposals.push(proposal);
        }
    }

    Ok(proposals)
}

/// Builds one call proposal at a fixed arity.
pub(crate) fn call_proposal(
    member: &Member,
    arity: usize,
    kind: ProposalKind,
    replace_span: Span,
    extended: &ExtendedContext,
    guessing: bool,
) -> Proposal {
    let params = &member.params[..arity.min(member.params.len())];
    let (replacement, cursor, groups) = render_call(&member.name, params, extended, guessing);

    let label = call_label(member, arity);
    let mut proposal = Proposal::new(
        label.clone(),
        member.name.clone(),
        kind,
        replacement,
        replace_span,
    );
    proposal.cursor_in_replacement = cursor;
    proposal.linked_groups = groups;
    proposal.owner = some_owner(member);
    proposal.context_info = Some(ContextInformation {
        display: label,
        parameters: params
            .iter()
            .map(|p| format!("{} {}", p.sig.simple_display(), p.name))
            .collect(),
    });
    proposal
}

fn some_owner(member: &Member) -> Option<String> {
    if member.declared_in.is_empty() {
        None
    } else {
        Some(member.declared_in.clone())
    }
}

pub(crate) fn call_label(member: &Member, arity: usize) -> String {
    let params = &member.params[..arity.min(member.params.len())];
    let rendered: Vec<String> = params
        .iter()
        .map(|p| format!("{} {}", p.sig.simple_display(), p.name))
        .collect();
    format!(
        "{}({}) : {}",
        display_name(&member.name),
        rendered.join(", "),
        member.sig.simple_display()
    )
}

/// Groovy-style call rendering:
/// - zero-argument calls keep their empty parens;
/// - a sole trailing `Closure` parameter becomes a block (`name { }`);
/// - with leading arguments the call drops parens and keeps the block
///   (`name arg, { }`);
/// - names that are not legal identifiers render as quoted calls.
fn render_call(
    name: &str,
    params: &[crate::oracle::ParamSig],
    extended: &ExtendedContext,
    guessing: bool,
) -> (String, Option<u32>, Vec<LinkedGroup>) {
    let name = display_name(name);
    let mut groups = Vec::new();

    if params.is_empty() {
        return (format!("{}()", name), None, groups);
    }

    let trailing_closure = params
        .last()
        .is_some_and(|p| p.sig.is_closure());

    let mut text = String::new();
    let mut cursor = None;

    if trailing_closure {
        let leading = &params[..params.len() - 1];
        text.push_str(&name);
        if leading.is_empty() {
            text.push_str(" { }");
            cursor = Some(text.len() as u32 - 1);
        } else {
            text.push(' ');
            push_placeholders(&mut text, leading, extended, guessing, &mut groups, &mut cursor);
            text.push_str(", { }");
        }
        return (text, cursor, groups);
    }

    text.push_str(&name);
    text.push('(');
    push_placeholders(&mut text, params, extended, guessing, &mut groups, &mut cursor);
    text.push(')');
    (text, cursor, groups)
}

fn push_placeholders(
    text: &mut String,
    params: &[crate::oracle::ParamSig],
    extended: &ExtendedContext,
    guessing: bool,
    groups: &mut Vec<LinkedGroup>,
    cursor: &mut Option<u32>,
) {
    for (idx, param) in params.iter().enumerate() {
        if idx > 0 {
            text.push_str(", ");
        }
        let start = text.len() as u32;
        if cursor.is_none() {
            *cursor = Some(start);
        }
        text.push_str(&param.name);
        let choices = if guessing {
            guess_values(&param.sig, extended)
        } else {
            Vec::new()
        };
        groups.push(LinkedGroup {
            offset: start,
            length: param.name.len() as u32,
            choices,
        });
    }
}

/// Quoted-call rendering for names that are not legal identifiers.
fn display_name(name: &str) -> String {
    if is_legal_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", name)
    }
}

fn is_legal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// New-member (override) stubs for class-body positions: inherited methods
/// not yet declared locally, rendered as a full declaration re-indented to
/// the insertion point.
pub(crate) fn override_stubs(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    formatter: &dyn Formatter,
) -> Result<Vec<Proposal>, SynthError> {
    let Some(class) = ctx.enclosing_class else {
        return Ok(Vec::new());
    };
    let Some(extends) = &class.extends else {
        return Ok(Vec::new());
    };
    if extends.is_placeholder() {
        return Ok(Vec::new());
    }

    let declared: Vec<&str> = class
        .members
        .iter()
        .filter_map(|m| match m {
            analyzer::ast::Member::Method(method) => Some(method.name.name.as_str()),
            _ => None,
        })
        .collect();

    let super_sig = crate::scope::type_ref_sig(extends, oracle);
    let indent = current_line_indent(ctx.source, ctx.offset);

    let mut proposals = Vec::new();
    let mut order = 0usize;
    for (member, depth) in type_members(&super_sig, oracle) {
        if member.kind != MemberKind::Method {
            continue;
        }
        if declared.contains(&member.name.as_str()) {
            continue;
        }
        if !matches_prefix(&member.name, &ctx.prefix) {
            continue;
        }

        let params: Vec<String> = member
            .params
            .iter()
            .map(|p| format!("{} {}", p.sig.simple_display(), p.name))
            .collect();
        let stub = format!("def {}({}) {{\n\n}}", member.name, params.join(", "));
        let replacement = reindent_snippet(formatter, &stub, &indent);
        let cursor = replacement.find("{\n").map(|idx| (idx + 2) as u32);

        let mut proposal = Proposal::new(
            format!("{} - override {}", call_label(&member, member.params.len()), member.declared_in),
            member.name.clone(),
            ProposalKind::OverrideStub,
            replacement,
            ctx.prefix_span,
        );
        proposal.cursor_in_replacement = cursor;
        proposal.owner = some_owner(&member);
        proposal.depth = depth + 1;
        proposal.order = order;
        order += 1;
        proposals.push(proposal);
    }

    Ok(proposals)
}

/// Indentation of the line containing `offset`.
fn current_line_indent(source: &str, offset: u32) -> String {
    let offset = (offset as usize).min(source.len());
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    extract_indent_string(&source[line_start..]).to_string()
}

fn reindent_snippet(formatter: &dyn Formatter, snippet: &str, indent: &str) -> String {
    match formatter.format(
        SnippetKind::ClassBodyDeclarations,
        snippet,
        0,
        snippet.len() as u32,
        indent,
        "\n",
    ) {
        Some(edit) => edit.new_text,
        None => snippet.to_string(),
    }
}
