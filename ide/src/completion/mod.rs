//! Proposal model and per-request configuration.
//!
//! Synthesizers (one module per proposal family) build raw [`Proposal`]s;
//! `rank` assigns relevance afterwards. Replacement text is always a valid
//! syntactic continuation at the insertion point.

use std::time::Duration;

use analyzer::{Span, TextEdit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) mod chains;
pub(crate) mod constructors;
pub(crate) mod guess;
pub(crate) mod keywords;
pub(crate) mod methods;
pub(crate) mod pipeline;
pub(crate) mod rank;
pub(crate) mod statics;
pub(crate) mod types;
pub(crate) mod vars;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    NamedArgument,
    LocalVariable,
    Field,
    Accessor,
    Method,
    ExtensionMethod,
    StaticImport,
    Constructor,
    Type,
    Package,
    Keyword,
    OverrideStub,
    /// Context-information-only: applying it is a textual no-op.
    Signature,
}

/// Parameter hints shown while an argument list is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInformation {
    pub display: String,
    pub parameters: Vec<String>,
}

/// One linked-edit slot with its ordered fill-in candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedGroup {
    /// Byte offset of the slot inside `replacement`.
    pub offset: u32,
    pub length: u32,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Display label (`method(int a) : void`).
    pub label: String,
    /// Bare completion name (`method`); drives exact-match ranking.
    pub name: String,
    pub kind: ProposalKind,
    pub replacement: String,
    pub replace_span: Span,
    /// Desired caret position inside `replacement` after applying; end of
    /// replacement when absent.
    pub cursor_in_replacement: Option<u32>,
    pub additional_edits: Vec<TextEdit>,
    pub relevance: i32,
    pub context_info: Option<ContextInformation>,
    pub linked_groups: Vec<LinkedGroup>,
    pub detail: Option<String>,
    pub owner: Option<String>,
    /// Inheritance distance of the declaring type (0 = own/receiver type).
    pub depth: usize,
    /// Declaration order; the ranking tie-break.
    pub order: usize,
}

impl Proposal {
    pub fn new(
        label: impl Into<String>,
        name: impl Into<String>,
        kind: ProposalKind,
        replacement: impl Into<String>,
        replace_span: Span,
    ) -> Proposal {
        Proposal {
            label: label.into(),
            name: name.into(),
            kind,
            replacement: replacement.into(),
            replace_span,
            cursor_in_replacement: None,
            additional_edits: Vec::new(),
            relevance: 0,
            context_info: None,
            linked_groups: Vec::new(),
            detail: None,
            owner: None,
            depth: 0,
            order: 0,
        }
    }

    /// True for proposals whose application leaves the document untouched.
    pub fn is_noop(&self) -> bool {
        self.replacement.is_empty()
            && self.replace_span.is_empty()
            && self.additional_edits.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Synthesize named-argument proposals for constructor calls.
    pub named_arguments: bool,
    /// Attach guessed fill-ins to parameter slots.
    pub parameter_guessing: bool,
    /// Render constructor applications without parentheses.
    pub parenless_constructors: bool,
    pub proposal_limit: usize,
    /// How long a request may wait for the host index.
    pub index_timeout: Duration,
    pub index_poll_interval: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        CompletionConfig {
            named_arguments: true,
            parameter_guessing: true,
            parenless_constructors: false,
            proposal_limit: 200,
            index_timeout: Duration::from_secs(2),
            index_poll_interval: Duration::from_millis(10),
        }
    }
}

/// A synthesizer-internal failure. The failing synthesizer contributes
/// nothing; the rest of the pipeline still runs.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SynthError(pub String);

/// Case-insensitive prefix match; an empty prefix matches everything.
pub(crate) fn matches_prefix(name: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    name.len() >= prefix.len()
        && name
            .chars()
            .zip(prefix.chars())
            .all(|(n, p)| n.eq_ignore_ascii_case(&p))
}
