use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A single text edit in byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Span,
    pub new_text: String,
}
