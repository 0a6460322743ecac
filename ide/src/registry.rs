//! Project-nature extension registry.
//!
//! A project carries opaque nature tags; each nature may register providers
//! (contribute proposals) and filters (suppress proposals). Per request,
//! every provider and filter of every active nature runs exactly once;
//! inactive natures are never invoked.

use crate::completion::Proposal;
use crate::context::AssistContext;

pub trait ProposalProvider {
    fn provide(&self, ctx: &AssistContext<'_>) -> Vec<Proposal>;
}

pub trait ProposalFilter {
    /// `false` drops the proposal.
    fn retain(&self, ctx: &AssistContext<'_>, proposal: &Proposal) -> bool;
}

#[derive(Default)]
pub struct Registry {
    providers: Vec<(String, Box<dyn ProposalProvider>)>,
    filters: Vec<(String, Box<dyn ProposalFilter>)>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn register_provider(&mut self, nature: &str, provider: Box<dyn ProposalProvider>) {
        self.providers.push((nature.to_string(), provider));
    }

    pub fn register_filter(&mut self, nature: &str, filter: Box<dyn ProposalFilter>) {
        self.filters.push((nature.to_string(), filter));
    }

    /// Runs active providers then active filters, in registration order.
    pub(crate) fn apply(
        &self,
        natures: &[String],
        ctx: &AssistContext<'_>,
        proposals: &mut Vec<Proposal>,
    ) {
        for (nature, provider) in &self.providers {
            if natures.iter().any(|n| n == nature) {
                proposals.extend(provider.provide(ctx));
            }
        }
        for (nature, filter) in &self.filters {
            if natures.iter().any(|n| n == nature) {
                proposals.retain(|p| filter.retain(ctx, p));
            }
        }
    }
}
