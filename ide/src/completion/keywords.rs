//! Modifier-keyword proposals for class-body positions.

use analyzer::MODIFIER_KEYWORDS;

use super::{Proposal, ProposalKind, SynthError, matches_prefix};
use crate::context::AssistContext;

pub(crate) fn proposals(ctx: &AssistContext<'_>) -> Result<Vec<Proposal>, SynthError> {
    let mut proposals = Vec::new();
    for (order, keyword) in MODIFIER_KEYWORDS.iter().enumerate() {
        if !matches_prefix(keyword, &ctx.prefix) {
            continue;
        }
        let mut proposal = Proposal::new(
            *keyword,
            *keyword,
            ProposalKind::Keyword,
            format!("{} ", keyword),
            ctx.prefix_span,
        );
        proposal.order = order;
        proposals.push(proposal);
    }
    Ok(proposals)
}
