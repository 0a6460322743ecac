//! Tolerant frontend for Groovy-flavored source.
//!
//! Lexing and parsing always produce a module tree. Broken input yields
//! recovery nodes rather than an error, since the downstream content-assist
//! engine runs on every keystroke.
//!
//! All spans are UTF-8 byte offsets into the original source, `[start, end)`.

mod diagnostics;
mod lexer;
mod parser;
mod source_map;
mod span;
mod tests;
mod text_edit;

use tracing::debug;

pub use diagnostics::{Diagnostic, Severity, format_diagnostics};
pub use lexer::{
    DECL_KEYWORDS, LexOutput, Lit, LitKind, MODIFIER_KEYWORDS, NodeId, Symbol, Token, TokenKind,
    is_modifier_word, lex,
};
pub use parser::ParseOutput;
pub use parser::ast;
pub use source_map::SourceMap;
pub use span::{Span, Spanned};
pub use text_edit::TextEdit;

/// Lex and parse a whole buffer.
pub fn parse_module(source: &str) -> ParseOutput {
    let lex_output = lexer::lex(source);
    let parser = parser::Parser::new(source, lex_output.tokens);
    let mut output = parser.parse_module();
    output.diagnostics.extend(lex_output.diagnostics.diags);
    debug!(
        diagnostics = output.diagnostics.len(),
        classes = output.module.classes.len(),
        script_stmts = output.module.script.len(),
        "parsed module"
    );
    output
}
