//! Diagnostics for the HL7 toolchain.
//!
//! A [`Diagnostic`] is a coded finding with a [`Severity`], an optional byte
//! [`Span`] into the raw message, and free-form context. Fatal parse errors
//! and non-fatal structural warnings share this shape so every front end can
//! render them the same way. Codes live in [`codes`].

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

// ── Line numbers ─────────────────────────────────────────────────────────

/// Resolves byte offsets to 1-based line numbers.
///
/// HL7 segments usually end with a bare `\r`, so `\r`, `\n`, and `\r\n` each
/// count as a single line break.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset where each line begins; the first entry is always 0.
    starts: Vec<usize>,
}

impl LineIndex {
    /// Record every line start in `text`.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![0];
        for (i, &b) in bytes.iter().enumerate() {
            let crlf_head = b == b'\r' && bytes.get(i + 1) == Some(&b'\n');
            if (b == b'\r' || b == b'\n') && !crlf_head {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// 1-based number of the line containing `offset`. Offsets past the end
    /// resolve to the last line.
    pub fn line_number(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    /// Number of lines, counting a trailing empty line after a final break.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

// ── Severity and span ────────────────────────────────────────────────────

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// The message could not be parsed at all.
    Error,
    /// The message parsed, but part of it may be mis-tokenized or non-conformant.
    Warn,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warn => "warning",
        })
    }
}

/// Half-open byte range `[start, end)` into the raw message text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// First byte covered.
    pub start: usize,
    /// One past the last byte covered.
    pub end: usize,
}

impl Span {
    /// Build a span. Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a range, clipped to a source of `source_len` bytes.
    pub fn clamped(&self, source_len: usize) -> Range<usize> {
        let start = self.start.min(source_len);
        start..self.end.clamp(start, source_len)
    }
}

// ── Diagnostic ───────────────────────────────────────────────────────────

/// One coded finding about a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code such as `HL7-1101`; see [`codes`].
    pub id: Cow<'static, str>,
    /// Error or warning.
    pub severity: Severity,
    /// One-line description for humans.
    pub message: String,
    /// Where in the raw text the finding applies, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Extra key/value details (`segment`, `line`, `declared`, ...), sorted by key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// An error-severity diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::with_severity(id, Severity::Error, message, span)
    }

    /// A warning-severity diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::with_severity(id, Severity::Warn, message, span)
    }

    fn with_severity(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Replace the context map.
    pub fn with_context(self, context: BTreeMap<String, String>) -> Self {
        Self {
            context: Some(context),
            ..self
        }
    }

    /// Whether this diagnostic is fatal.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Long-form explanation of this diagnostic's code.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Long-form explanation for a code, or `None` if the code is unknown.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::ALL
        .iter()
        .find(|info| info.id == id)
        .map(|info| info.explanation)
}
