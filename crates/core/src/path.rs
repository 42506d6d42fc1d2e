//! Location paths: textual addresses of a value inside a message.
//!
//! Accepted forms (all indexes 1-based, `-` and `.` interchangeable):
//! - `PID-5`: field 5, first component of the first repetition
//! - `PID-5-2` / `PID.5.2`: component 2
//! - `PID-13(2)-1`: repetition 2 of field 13
//! - `OBX[2]-5`: field 5 of the second `OBX` segment
//! - `OBX-3-2-1`: subcomponent 1 of component 2

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::grammar::ast::Message;

/// Errors produced while parsing a [`LocationPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path string was empty.
    #[error("empty location path")]
    Empty,

    /// The path does not start with an alphanumeric segment name.
    #[error("location path {0:?} must start with a segment name")]
    InvalidSegment(String),

    /// No field index follows the segment name.
    #[error("location path {0:?} is missing a field index (e.g. PID-5)")]
    MissingField(String),

    /// An index was not a positive integer.
    #[error("invalid index {index:?} in location path {path:?}: indexes start at 1")]
    InvalidIndex {
        /// The full path being parsed.
        path: String,
        /// The offending index text.
        index: String,
    },

    /// Unparsed text remained after the last recognized part.
    #[error("unexpected {rest:?} in location path {path:?}")]
    TrailingInput {
        /// The full path being parsed.
        path: String,
        /// The unparsed remainder.
        rest: String,
    },
}

/// Parsed address of a value inside a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationPath {
    /// Segment name (e.g. `PID`).
    pub segment: String,
    /// Which occurrence of the segment (1-based, default 1).
    pub occurrence: usize,
    /// Field index (1-based).
    pub field: usize,
    /// Repetition index (1-based, default 1).
    pub repetition: usize,
    /// Component index, when addressed.
    pub component: Option<usize>,
    /// Subcomponent index, when addressed.
    pub subcomponent: Option<usize>,
}

impl FromStr for LocationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let name_end = path
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(path.len());
        if name_end == 0 {
            return Err(PathError::InvalidSegment(path.to_string()));
        }
        let segment = path[..name_end].to_string();
        let mut rest = &path[name_end..];

        let mut occurrence = 1;
        if let Some(inner) = rest.strip_prefix('[') {
            (occurrence, rest) = bracketed(inner, ']', path)?;
        }

        rest = strip_separator(rest).ok_or_else(|| PathError::MissingField(path.to_string()))?;
        let (field, after_field) = leading_index(rest, path)?;
        rest = after_field;

        let mut repetition = 1;
        if let Some(inner) = rest.strip_prefix('(') {
            (repetition, rest) = bracketed(inner, ')', path)?;
        }

        let mut levels = [None, None];
        for level in &mut levels {
            if rest.is_empty() {
                break;
            }
            let after_sep = strip_separator(rest).ok_or_else(|| PathError::TrailingInput {
                path: path.to_string(),
                rest: rest.to_string(),
            })?;
            let (index, after_index) = leading_index(after_sep, path)?;
            *level = Some(index);
            rest = after_index;
        }

        if !rest.is_empty() {
            return Err(PathError::TrailingInput {
                path: path.to_string(),
                rest: rest.to_string(),
            });
        }

        Ok(Self {
            segment,
            occurrence,
            field,
            repetition,
            component: levels[0],
            subcomponent: levels[1],
        })
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment)?;
        if self.occurrence != 1 {
            write!(f, "[{}]", self.occurrence)?;
        }
        write!(f, "-{}", self.field)?;
        if self.repetition != 1 {
            write!(f, "({})", self.repetition)?;
        }
        if let Some(c) = self.component {
            write!(f, "-{c}")?;
        }
        if let Some(s) = self.subcomponent {
            write!(f, "-{s}")?;
        }
        Ok(())
    }
}

fn strip_separator(s: &str) -> Option<&str> {
    s.strip_prefix('-').or_else(|| s.strip_prefix('.'))
}

/// Parse a run of leading digits as a positive index.
fn leading_index<'a>(s: &'a str, path: &str) -> Result<(usize, &'a str), PathError> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let digits = &s[..end];
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => Ok((n, &s[end..])),
        _ => Err(PathError::InvalidIndex {
            path: path.to_string(),
            index: if digits.is_empty() { s } else { digits }.to_string(),
        }),
    }
}

/// Parse `n<close>` and return the index and the text after `close`.
fn bracketed<'a>(s: &'a str, close: char, path: &str) -> Result<(usize, &'a str), PathError> {
    let (index, rest) = leading_index(s, path)?;
    rest.strip_prefix(close)
        .map(|after| (index, after))
        .ok_or_else(|| PathError::InvalidIndex {
            path: path.to_string(),
            index: s.to_string(),
        })
}

impl Message {
    /// Resolve a location path through the accessor API.
    ///
    /// Returns `None` when the segment, field, or repetition does not exist,
    /// and `Some("")` when it does but the addressed component or
    /// subcomponent is absent.
    pub fn query(&self, path: &LocationPath) -> Option<&str> {
        let repetition = self
            .get_segment_occurrence(&path.segment, path.occurrence)?
            .get_field(path.field)?
            .get_repetition(path.repetition)?;
        Some(match (path.component, path.subcomponent) {
            (None, _) => repetition.get_component(1),
            (Some(c), None) => repetition.get_component(c),
            (Some(c), Some(s)) => repetition.component(c).map_or("", |comp| comp.get_component(s)),
        })
    }
}
