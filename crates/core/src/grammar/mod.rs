/// Bounds-safe, 1-based accessor API over the message tree.
pub mod access;
/// HL7 message tree types.
pub mod ast;
/// Separator characters and the delimiter resolver.
pub mod delimiters;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for the message tree.
pub mod dump;
/// Line splitter producing borrowed segment lines.
pub mod lexer;
/// Segment and field parser.
pub mod parser;
