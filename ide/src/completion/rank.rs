//! Relevance ranking.
//!
//! Tier order (highest first): constructor/method parameter names, locals,
//! fields and their accessors, user methods, static imports, extension
//! methods, constructors, types, keywords, new-member stubs, bare signature
//! displays. Exact name matches outrank prefix matches inside a tier; a
//! more-derived override outranks the inherited declaration; remaining ties
//! fall back to declaration order, never alphabetic.

use super::{Proposal, ProposalKind};

fn base_relevance(kind: ProposalKind) -> i32 {
    match kind {
        ProposalKind::NamedArgument => 100,
        ProposalKind::LocalVariable => 90,
        ProposalKind::Field => 80,
        ProposalKind::Accessor => 78,
        ProposalKind::Method => 70,
        ProposalKind::StaticImport => 64,
        ProposalKind::ExtensionMethod => 60,
        ProposalKind::Constructor => 55,
        ProposalKind::Type => 50,
        ProposalKind::Package => 45,
        ProposalKind::Keyword => 40,
        ProposalKind::OverrideStub => 35,
        ProposalKind::Signature => 30,
    }
}

pub(crate) fn rank(proposals: &mut Vec<Proposal>, prefix: &str) {
    for proposal in proposals.iter_mut() {
        let mut relevance = base_relevance(proposal.kind);

        if !prefix.is_empty() && proposal.name == prefix {
            relevance += 15;
        }

        // A more-derived declaration shadows (ranks above) the inherited one.
        relevance -= proposal.depth.min(5) as i32;

        proposal.relevance = relevance;
    }

    // Stable sort keeps declaration order inside equal-relevance runs.
    proposals.sort_by_key(|p| (-p.relevance, p.order));
}
