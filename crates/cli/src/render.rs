//! Diagnostic rendering for the `hl7` binary.
//!
//! Pretty mode turns each [`Diagnostic`] into an ariadne [`Report`] anchored
//! on the offending segment line; JSON mode prints the diagnostics as data.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use hl7_toolchain_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pretty on a TTY and JSON when piped.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        _ => Color::Blue,
    }
}

/// `key=value` pairs from the diagnostic context. The `line` key is dropped
/// since ariadne already prints line numbers.
fn context_pairs(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref()?;
    let pairs: Vec<String> = ctx
        .iter()
        .filter(|(k, _)| k.as_str() != "line")
        .map(|(k, v)| format!("{k}={v:?}"))
        .collect();
    (!pairs.is_empty()).then(|| pairs.join(", "))
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics to stderr, with source excerpts where a span exists.
pub(crate) fn render_diagnostics_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        let Some(span) = diag.span else {
            eprintln!("{}[{}]: {}", diag.severity, diag.id, diag.message);
            if let Some(help) = diag.explain() {
                eprintln!("  = help: {help}");
            }
            continue;
        };

        // Truncated stdin can leave a span past the end of the source.
        let range = span.clamped(source.len());
        let label = context_pairs(diag).unwrap_or_else(|| diag.message.clone());

        let mut builder = Report::build(report_kind(&diag.severity), (filename, range.clone()))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(Config::default().with_compact(false))
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(severity_color(&diag.severity)),
            );
        if let Some(help) = diag.explain() {
            builder = builder.with_help(help);
        }
        builder.finish().eprint(&mut cache).ok();
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Render diagnostics as a JSON array to stdout.
pub(crate) fn render_diagnostics_json(diagnostics: &[Diagnostic]) {
    let json =
        serde_json::to_string_pretty(diagnostics).expect("Diagnostic serialization cannot fail");
    println!("{json}");
}

/// Render diagnostics in the given format.
///
/// - `Pretty` → coloured output to stderr (command output stays on stdout).
/// - `Json`   → JSON array to stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    match format {
        Format::Pretty => render_diagnostics_pretty(source, filename, diagnostics),
        Format::Json => render_diagnostics_json(diagnostics),
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured `N errors, M warnings` line to stderr. Silent when empty.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl7_toolchain_diagnostics::{Span, codes};

    #[test]
    fn explicit_format_wins() {
        assert_eq!(Format::resolve_or_detect(Some("json")), Format::Json);
        assert_eq!(Format::resolve_or_detect(Some("pretty")), Format::Pretty);
    }

    #[test]
    fn context_pairs_skip_line() {
        let diag = Diagnostic::warn(codes::PARSER_SEGMENT_NAME, "bad", Some(Span::new(0, 3)))
            .with_context([
                ("segment".to_string(), "pid".to_string()),
                ("line".to_string(), "2".to_string()),
            ]
            .into());
        assert_eq!(context_pairs(&diag).as_deref(), Some("segment=\"pid\""));
    }

    #[test]
    fn context_pairs_none_without_context() {
        let diag = Diagnostic::warn(codes::PARSER_SEGMENT_NAME, "bad", None);
        assert!(context_pairs(&diag).is_none());
    }
}
