use crate::source_map::SourceMap;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

#[derive(Default, Debug)]
pub struct Diagnostics {
    pub diags: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn error(&mut self, span: Span, message: impl Into<String>) {
        self.diags.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            span,
        });
    }

    pub fn warning(&mut self, span: Span, message: impl Into<String>) {
        self.diags.push(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            span,
        });
    }
}

/// Renders diagnostics sorted by position, one block per diagnostic.
pub fn format_diagnostics(source: &str, mut diags: Vec<Diagnostic>) -> String {
    use std::fmt::Write;

    diags.sort_by(|a, b| {
        (a.span.start, a.span.end, &a.message).cmp(&(b.span.start, b.span.end, &b.message))
    });
    let sm = SourceMap::new(source);

    let mut out = String::new();
    for d in diags {
        let label = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let (line, col) = sm.line_col(d.span.start);
        let _ = writeln!(&mut out, "{}: {}", label, d.message);
        let _ = writeln!(
            &mut out,
            "  --> <input>:{}:{} [{}..{}]",
            line, col, d.span.start, d.span.end
        );
    }
    out
}
