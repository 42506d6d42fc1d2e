//! HL7 toolchain core library.
//!
//! Parses pipe-delimited HL7 v2 messages into an immutable
//! segment → field → repetition → component → subcomponent tree and exposes
//! total, 1-based accessors over it. The main entry points are [`parse_str`]
//! and [`parse_with_config`]; lookups go through [`Message::get_segment`],
//! [`Segment::get_field`], and the `get_component` family.

#![warn(missing_docs)]

/// Fatal parse errors.
pub mod error;
/// Opt-in decoding of escape sequences in leaf values.
pub mod escape;
/// HL7 grammar: delimiters, line splitter, parser, tree, and accessors.
pub mod grammar;
/// Location paths such as `PID-5-1` resolved against a parsed message.
pub mod path;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use grammar::parser::{ParseResult, ParserConfig, parse_str, parse_with_config};

// Tree
pub use grammar::ast::{Component, Field, Message, Repetition, Segment};

// Delimiters
pub use grammar::delimiters::{Delimiters, HEADER_SEGMENT, resolve_delimiters};

// Errors
pub use error::ParseError;

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Escapes and paths
pub use escape::{EscapeError, decode_escapes, validate_escapes};
pub use path::{LocationPath, PathError};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
