//! Type proposals with auto-import synthesis, plus package/import-header
//! completion.

use super::{Proposal, ProposalKind, SynthError, matches_prefix};
use crate::context::AssistContext;
use crate::edit::import_insertion;
use crate::oracle::{TypeKind, TypeOracle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeFilter {
    Any,
    Classes,
    Interfaces,
    Throwables,
}

impl TypeFilter {
    fn accepts(&self, kind: TypeKind, is_throwable: bool) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Classes => kind == TypeKind::Class,
            TypeFilter::Interfaces => kind == TypeKind::Interface,
            TypeFilter::Throwables => is_throwable,
        }
    }
}

/// Unqualified type proposals. Accepting one inserts the import line unless
/// the name is already reachable.
pub(crate) fn proposals(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    filter: TypeFilter,
) -> Result<Vec<Proposal>, SynthError> {
    // Bare-name type completion needs at least one typed character;
    // enumerating every known type on an empty prefix drowns the list.
    if ctx.prefix.is_empty() {
        return Ok(Vec::new());
    }

    let mut proposals = Vec::new();
    for (order, qualified) in oracle.type_names().iter().enumerate() {
        let Some(descriptor) = oracle.resolve_type(qualified) else {
            continue;
        };
        if !filter.accepts(descriptor.kind, descriptor.is_throwable) {
            continue;
        }
        let simple = descriptor.simple_name();
        if !matches_prefix(simple, &ctx.prefix) {
            continue;
        }

        let mut proposal = Proposal::new(
            format!("{} - {}", simple, descriptor.package()),
            simple,
            ProposalKind::Type,
            simple,
            ctx.prefix_span,
        );
        if needs_import(ctx, &descriptor.qualified_name) {
            proposal.additional_edits
                .extend(import_insertion(ctx.source, ctx.module, &descriptor.qualified_name));
        }
        proposal.owner = Some(descriptor.qualified_name.clone());
        proposal.order = order;
        proposals.push(proposal);
    }
    Ok(proposals)
}

fn needs_import(ctx: &AssistContext<'_>, qualified: &str) -> bool {
    let (package, _) = qualified.rsplit_once('.').unwrap_or(("", qualified));
    if package.is_empty() || package == "java.lang" {
        return false;
    }
    if let Some(decl) = &ctx.module.package
        && decl.name.dotted() == package
    {
        return false;
    }
    !ctx.module.imports.iter().any(|import| {
        if import.is_static {
            return false;
        }
        if import.wildcard {
            import.name.dotted() == package
        } else {
            import.name.dotted() == qualified
        }
    })
}

/// Completion inside an `import`/`package` header: the next dotted segment.
pub(crate) fn header_proposals(
    ctx: &AssistContext<'_>,
    oracle: &dyn TypeOracle,
    types_too: bool,
) -> Result<Vec<Proposal>, SynthError> {
    let qualifier = header_qualifier(ctx);

    let mut proposals = Vec::new();
    let mut seen = Vec::new();
    let mut order = 0usize;

    let mut add = |name: &str, kind: ProposalKind, proposals: &mut Vec<Proposal>, order: &mut usize| {
        if seen.iter().any(|s| s == name) {
            return;
        }
        seen.push(name.to_string());
        let mut proposal = Proposal::new(name, name, kind, name, ctx.prefix_span);
        proposal.order = *order;
        *order += 1;
        proposals.push(proposal);
    };

    for package in oracle.package_names() {
        if let Some(segment) = next_segment(&package, &qualifier, &ctx.prefix) {
            add(&segment, ProposalKind::Package, &mut proposals, &mut order);
        }
    }
    if types_too {
        for qualified in oracle.type_names() {
            if let Some(segment) = next_segment(&qualified, &qualifier, &ctx.prefix) {
                let kind = if segment
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_uppercase())
                {
                    ProposalKind::Type
                } else {
                    ProposalKind::Package
                };
                add(&segment, kind, &mut proposals, &mut order);
            }
        }
    }

    Ok(proposals)
}

/// Dotted text already typed before the completion prefix in this header
/// (`import java.ut|` → `java.`).
fn header_qualifier(ctx: &AssistContext<'_>) -> String {
    let start = ctx.prefix_span.start as usize;
    let text = &ctx.source[..start];
    let mut qual_start = start;
    for (idx, ch) in text.char_indices().rev() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' || ch == '.' {
            qual_start = idx;
        } else {
            break;
        }
    }
    ctx.source[qual_start..start].to_string()
}

fn next_segment(qualified: &str, qualifier: &str, prefix: &str) -> Option<String> {
    let rest = qualified.strip_prefix(qualifier)?;
    let segment = rest.split('.').next().filter(|s| !s.is_empty())?;
    matches_prefix(segment, prefix).then(|| segment.to_string())
}
