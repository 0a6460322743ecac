//! Content-assist engine for Groovy-flavored source.
//!
//! One entry point: [`compute_proposals`] classifies the cursor position,
//! resolves visible symbols through the host oracle, synthesizes proposals
//! per location kind, runs registered project-nature providers/filters,
//! ranks, and returns the ordered list. Requests are synchronous and
//! self-contained; nothing persists between calls.
//!
//! All coordinates are UTF-8 byte offsets, half-open `[start, end)`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use analyzer::Span;

pub mod completion;
pub mod context;
pub mod edit;
pub mod extensions;
pub mod format;
pub mod oracle;
pub mod registry;
pub mod scope;
pub mod sig;
mod workspace;

mod tests;

pub use completion::{
    CompletionConfig, ContextInformation, LinkedGroup, Proposal, ProposalKind,
};
pub use context::{AssistContext, AssistLocation, EnclosingKind, classify};
pub use edit::{AppliedEdit, apply_proposal, import_insertion};
pub use extensions::ExtensionMethods;
pub use format::{Formatter, PlainFormatter, SnippetKind};
pub use oracle::{Document, Member, MemberKind, ParamSig, TypeDescriptor, TypeOracle, TypeStore};
pub use registry::{ProposalFilter, ProposalProvider, Registry};
pub use sig::TypeSig;
pub use workspace::Workspace;

/// Why a request was aborted. Everything else in the pipeline degrades to
/// fewer proposals instead of failing.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("host index still building after {0:?}")]
    IndexingTimeout(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistOutput {
    /// Ranked, highest relevance first.
    pub proposals: Vec<Proposal>,
    /// Span of the completion prefix every primary edit replaces.
    pub replace_span: Span,
    pub location: AssistLocation,
}

/// One completion request, start to finish on the calling thread.
pub struct AssistSession<'a> {
    source: &'a str,
    offset: u32,
    workspace: &'a Workspace<'a>,
    config: CompletionConfig,
}

impl<'a> AssistSession<'a> {
    pub fn new(
        source: &'a str,
        offset: u32,
        workspace: &'a Workspace<'a>,
        config: CompletionConfig,
    ) -> AssistSession<'a> {
        AssistSession {
            source,
            offset,
            workspace,
            config,
        }
    }

    pub fn run(self) -> Result<AssistOutput, AssistError> {
        self.wait_for_index()?;

        let parse = analyzer::parse_module(self.source);
        let ctx = context::classify(self.source, &parse, self.offset);
        let proposals = completion::pipeline::compute(&ctx, self.workspace, &self.config);
        debug!(
            location = ?ctx.location,
            count = proposals.len(),
            "completion request finished"
        );

        Ok(AssistOutput {
            proposals,
            replace_span: ctx.prefix_span,
            location: ctx.location,
        })
    }

    /// Bounded wait for the host index; an expired budget aborts the request
    /// instead of blocking the UI thread.
    fn wait_for_index(&self) -> Result<(), AssistError> {
        let started = Instant::now();
        while self.workspace.oracle.is_indexing_in_progress() {
            if started.elapsed() >= self.config.index_timeout {
                return Err(AssistError::IndexingTimeout(self.config.index_timeout));
            }
            std::thread::sleep(self.config.index_poll_interval);
        }
        Ok(())
    }
}

/// Computes the ordered proposal list for a cursor offset.
pub fn compute_proposals(
    source: &str,
    offset: u32,
    workspace: &Workspace<'_>,
    config: CompletionConfig,
) -> Result<AssistOutput, AssistError> {
    AssistSession::new(source, offset, workspace, config).run()
}
