//! Text-edit application and auto-import insertion-point search.
//!
//! A proposal's primary edit plus its additional edits apply as one atomic
//! pass in descending offset order, so earlier edits never invalidate later
//! spans. Context-information-only proposals apply as a byte-identical
//! no-op.

use analyzer::ast::Module;
use analyzer::{Span, TextEdit, TokenKind, lex};

use crate::completion::Proposal;
use crate::oracle::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    pub text: String,
    pub cursor: u32,
}

pub fn apply_proposal(proposal: &Proposal, document: &Document) -> AppliedEdit {
    let primary = TextEdit {
        range: proposal.replace_span,
        new_text: proposal.replacement.clone(),
    };

    let mut edits: Vec<TextEdit> = Vec::with_capacity(1 + proposal.additional_edits.len());
    edits.push(primary);
    edits.extend(proposal.additional_edits.iter().cloned());

    let text = apply_text_edits(&document.text, &edits);

    // Cursor: primary insertion point, shifted by every edit that landed
    // before it.
    let within = proposal
        .cursor_in_replacement
        .unwrap_or(proposal.replacement.len() as u32)
        .min(proposal.replacement.len() as u32);
    let mut cursor = proposal.replace_span.start as i64 + within as i64;
    for edit in &proposal.additional_edits {
        if edit.range.start < proposal.replace_span.start {
            cursor += edit.new_text.len() as i64 - edit.range.len() as i64;
        }
    }

    AppliedEdit {
        text,
        cursor: cursor.max(0) as u32,
    }
}

/// Applies edits in descending start order; all-or-nothing per edit.
pub(crate) fn apply_text_edits(original: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| {
        (b.range.start, b.range.end).cmp(&(a.range.start, a.range.end))
    });

    let mut text = original.to_string();
    for edit in sorted {
        let start = edit.range.start as usize;
        let end = edit.range.end as usize;
        if start > end || end > text.len() {
            continue;
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        text.replace_range(start..end, &edit.new_text);
    }
    text
}

/// Computes the import statement edit for `qualified`.
///
/// Anchor search order:
/// 1. the last import of the same group (leading segment) sitting on its own
///    line, else the last own-line import;
/// 2. after the package declaration, with a blank-line separator;
/// 3. after a leading header comment;
/// 4. the buffer start.
///
/// When the anchor import ends without an explicit `;` (newline-terminated,
/// the usual Groovy style), the new import is appended directly after the
/// anchor's last character, landing on the same line. That concatenation
/// reproduces the long-standing behavior of the original engine and is kept
/// intentionally; tests pin it.
pub fn import_insertion(source: &str, module: &Module, qualified: &str) -> Option<TextEdit> {
    let statement = format!("import {}", qualified);
    let group = qualified.split('.').next().unwrap_or(qualified);

    let own_line_imports: Vec<_> = module
        .imports
        .iter()
        .filter(|import| starts_own_line(source, import.span.start))
        .collect();

    let anchor = own_line_imports
        .iter()
        .filter(|import| {
            import
                .name
                .segments
                .first()
                .is_some_and(|seg| seg.name == group)
        })
        .last()
        .or_else(|| own_line_imports.last());

    if let Some(anchor) = anchor {
        let text = if anchor.has_semi {
            format!("\n{}", statement)
        } else {
            statement
        };
        return Some(TextEdit {
            range: Span::point(anchor.span.end),
            new_text: text,
        });
    }

    if let Some(package) = &module.package {
        return Some(TextEdit {
            range: Span::point(package.span.end),
            new_text: format!("\n\n{}", statement),
        });
    }

    if let Some(comment_end) = leading_comment_end(source) {
        return Some(TextEdit {
            range: Span::point(comment_end),
            new_text: format!("\n{}", statement),
        });
    }

    Some(TextEdit {
        range: Span::point(0),
        new_text: format!("{}\n", statement),
    })
}

fn starts_own_line(source: &str, offset: u32) -> bool {
    let offset = (offset as usize).min(source.len());
    source[..offset]
        .rfind('\n')
        .map(|nl| source[nl + 1..offset].trim().is_empty())
        .unwrap_or_else(|| source[..offset].trim().is_empty())
}

/// End offset of the comment run that opens the buffer, if any.
fn leading_comment_end(source: &str) -> Option<u32> {
    let tokens = lex(source).tokens;
    let mut end = None;
    for token in &tokens {
        match token.kind {
            TokenKind::LineComment(_) | TokenKind::BlockComment(_) => {
                end = Some(token.span.end);
            }
            TokenKind::Newline => continue,
            _ => break,
        }
    }
    end
}

/// Cheap check used by tests and embedders: a no-op application returns the
/// document text unchanged.
pub fn is_identity_application(proposal: &Proposal, document: &Document) -> bool {
    apply_proposal(proposal, document).text == document.text
}
