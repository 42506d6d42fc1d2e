//! Fatal parse errors.

use crate::grammar::diag::{Diagnostic, Span, codes};

/// The only two conditions under which parsing a message fails.
///
/// Every other anomaly (short segments, missing fields, empty components) is
/// absorbed by the total accessor API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input is empty or contains only whitespace.
    #[error("malformed message: input is empty")]
    MalformedMessage,

    /// The first non-blank line does not begin with the header segment.
    #[error("invalid structure: message must start with {expected}, found {found:?}")]
    InvalidStructure {
        /// The required header segment name.
        expected: &'static str,
        /// Name of the segment that was found instead.
        found: String,
        /// Source span of the offending line.
        span: Span,
    },
}

impl ParseError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::MalformedMessage => codes::PARSER_MALFORMED_MESSAGE,
            ParseError::InvalidStructure { .. } => codes::PARSER_INVALID_STRUCTURE,
        }
    }

    /// Source span the error relates to, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::MalformedMessage => None,
            ParseError::InvalidStructure { span, .. } => Some(*span),
        }
    }

    /// Convert into an error-severity [`Diagnostic`] for uniform rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), self.span());
        match self {
            ParseError::MalformedMessage => diag,
            ParseError::InvalidStructure {
                expected, found, ..
            } => diag.with_context(
                [
                    ("expected".to_string(), (*expected).to_string()),
                    ("found".to_string(), found.clone()),
                ]
                .into(),
            ),
        }
    }
}
