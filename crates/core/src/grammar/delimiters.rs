//! Separator characters and the delimiter resolver.

use std::fmt;

use serde::Serialize;

use super::lexer::{Line, split_lines};
use super::parser::ParserConfig;
use crate::error::ParseError;

/// Name of the mandatory header segment.
pub const HEADER_SEGMENT: &str = "MSH";

/// The five structural separator characters of a message.
///
/// Resolved once per message and fixed for the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Delimiters {
    /// Separates fields within a segment (`|`).
    pub field: char,
    /// Separates components within a repetition (`^`).
    pub component: char,
    /// Separates repetitions within a field (`~`).
    pub repetition: char,
    /// Introduces escape sequences (`\`). Never consulted while tokenizing.
    pub escape: char,
    /// Separates subcomponents within a component (`&`).
    pub subcomponent: char,
}

impl Delimiters {
    /// The standard separator set: `|`, `^`, `~`, `\`, `&`.
    pub const STANDARD: Self = Self {
        field: '|',
        component: '^',
        repetition: '~',
        escape: '\\',
        subcomponent: '&',
    };

    /// The four encoding characters in MSH-2 order: component, repetition,
    /// escape, subcomponent.
    pub fn encoding_characters(&self) -> String {
        [
            self.component,
            self.repetition,
            self.escape,
            self.subcomponent,
        ]
        .iter()
        .collect()
    }

    /// Whether `c` is any of the five separators.
    pub fn is_delimiter(&self, c: char) -> bool {
        c == self.field
            || c == self.component
            || c == self.repetition
            || c == self.escape
            || c == self.subcomponent
    }

    /// Read the separators a header line declares in MSH-1 and MSH-2.
    ///
    /// Returns `None` when `line` is not a header or declares no field
    /// separator. Encoding characters missing from a short MSH-2 fall back to
    /// the standard set.
    pub fn declared_in(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(HEADER_SEGMENT)?;
        let mut chars = rest.chars();
        let field = chars.next()?;
        let mut encoding = chars.take_while(|&c| c != field);
        let std = Self::STANDARD;
        Some(Self {
            field,
            component: encoding.next().unwrap_or(std.component),
            repetition: encoding.next().unwrap_or(std.repetition),
            escape: encoding.next().unwrap_or(std.escape),
            subcomponent: encoding.next().unwrap_or(std.subcomponent),
        })
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for Delimiters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.field, self.encoding_characters())
    }
}

/// Determine the separators for `input`.
///
/// The configured set is returned unchanged once the input is known to start
/// with a header segment; separators declared inside the message are not
/// honored.
///
/// # Errors
///
/// [`ParseError::MalformedMessage`] when the input is empty or blank, and
/// [`ParseError::InvalidStructure`] when the first non-blank line does not
/// begin with `MSH`.
pub fn resolve_delimiters(input: &str, config: &ParserConfig) -> Result<Delimiters, ParseError> {
    resolve_from_lines(&split_lines(input), config)
}

pub(crate) fn resolve_from_lines(
    lines: &[Line<'_>],
    config: &ParserConfig,
) -> Result<Delimiters, ParseError> {
    let first = lines.first().ok_or(ParseError::MalformedMessage)?;
    if !first.text.starts_with(HEADER_SEGMENT) {
        let name = first
            .text
            .split(config.delimiters.field)
            .next()
            .unwrap_or_default();
        return Err(ParseError::InvalidStructure {
            expected: HEADER_SEGMENT,
            found: name.to_string(),
            span: first.span(),
        });
    }
    Ok(config.delimiters)
}
