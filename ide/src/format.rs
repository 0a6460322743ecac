//! Formatter oracle contract and indentation helpers.
//!
//! The real host ships its own source formatter; this crate only depends on
//! the contract (format a snippet of a given kind, re-indent to a target
//! context). [`PlainFormatter`] is the built-in implementation: whitespace
//! normalization only, no style decisions.

use analyzer::{Span, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    Expression,
    StatementList,
    ClassBodyDeclarations,
    CompilationUnit,
}

pub trait Formatter {
    /// Formats `source[offset..offset+length]`, re-indenting every line to
    /// `indent`. Returns `None` when the snippet is left as-is.
    fn format(
        &self,
        kind: SnippetKind,
        source: &str,
        offset: u32,
        length: u32,
        indent: &str,
        line_separator: &str,
    ) -> Option<TextEdit>;
}

/// Leading-whitespace prefix of a line.
pub fn extract_indent_string(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !matches!(c, ' ' | '\t'))
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

/// Number of whole indent units at the start of a line.
pub fn measure_indent_units(line: &str, indent_unit: &str) -> usize {
    if indent_unit.is_empty() {
        return 0;
    }
    let mut rest = extract_indent_string(line);
    let mut units = 0;
    while let Some(stripped) = rest.strip_prefix(indent_unit) {
        units += 1;
        rest = stripped;
    }
    units
}

/// Re-indents every line after the first to `indent`, preserving one extra
/// unit for lines already indented relative to the snippet's first line.
pub fn change_indent(text: &str, indent: &str, indent_unit: &str) -> String {
    let mut lines = text.split('\n');
    let Some(first) = lines.next() else {
        return text.to_string();
    };
    let base_units = measure_indent_units(first, indent_unit);

    let mut out = String::from(first.trim_start());
    for line in lines {
        out.push('\n');
        if line.trim().is_empty() {
            continue;
        }
        let extra = measure_indent_units(line, indent_unit).saturating_sub(base_units);
        out.push_str(indent);
        for _ in 0..extra {
            out.push_str(indent_unit);
        }
        out.push_str(line.trim_start());
    }
    out
}

/// Whitespace-only formatter: re-indents the requested range and normalizes
/// line separators.
pub struct PlainFormatter {
    pub indent_unit: String,
}

impl Default for PlainFormatter {
    fn default() -> Self {
        PlainFormatter {
            indent_unit: "    ".to_string(),
        }
    }
}

impl Formatter for PlainFormatter {
    fn format(
        &self,
        _kind: SnippetKind,
        source: &str,
        offset: u32,
        length: u32,
        indent: &str,
        line_separator: &str,
    ) -> Option<TextEdit> {
        let start = offset as usize;
        let end = start.checked_add(length as usize)?;
        if end > source.len() {
            return None;
        }
        let snippet = &source[start..end];
        let reindented = change_indent(snippet, indent, &self.indent_unit);
        let new_text = if line_separator == "\n" {
            reindented
        } else {
            reindented.replace('\n', line_separator)
        };
        Some(TextEdit {
            range: Span::new(offset, offset + length),
            new_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_measurement() {
        assert_eq!(measure_indent_units("        x", "    "), 2);
        assert_eq!(measure_indent_units("\t\tx", "\t"), 2);
        assert_eq!(extract_indent_string("  \tfoo"), "  \t");
    }

    #[test]
    fn change_indent_reanchors_lines() {
        let text = "def m() {\n    body\n}";
        assert_eq!(
            change_indent(text, "    ", "    "),
            "def m() {\n        body\n    }"
        );
    }
}
