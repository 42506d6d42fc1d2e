//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. `1xxx` codes come from the parser: `10xx` are fatal,
//! `11xx` are structural warnings.

/// A registered diagnostic code and its long-form explanation.
#[derive(Debug, Clone, Copy)]
pub struct CodeInfo {
    /// The code string (e.g., `"HL7-1001"`).
    pub id: &'static str,
    /// Human-readable explanation shown by `explain`.
    pub explanation: &'static str,
}

/// The input was empty or contained only whitespace.
pub const PARSER_MALFORMED_MESSAGE: &str = "HL7-1001";
/// The first non-blank line did not begin with the `MSH` header segment.
pub const PARSER_INVALID_STRUCTURE: &str = "HL7-1002";
/// The header declares encoding characters that differ from the resolved set.
pub const PARSER_NONSTANDARD_DELIMITERS: &str = "HL7-1101";
/// A segment name is not a three-character upper-case alphanumeric code.
pub const PARSER_SEGMENT_NAME: &str = "HL7-1102";

/// Every registered code, in numeric order.
pub const ALL: &[CodeInfo] = &[
    CodeInfo {
        id: PARSER_MALFORMED_MESSAGE,
        explanation: "The input is empty or contains only whitespace. A message must contain at least the MSH header segment.",
    },
    CodeInfo {
        id: PARSER_INVALID_STRUCTURE,
        explanation: "The first non-blank line of a message must begin with the MSH header segment. Segments before MSH (or a missing MSH) make the message unparseable.",
    },
    CodeInfo {
        id: PARSER_NONSTANDARD_DELIMITERS,
        explanation: "MSH-1/MSH-2 declare separator characters that differ from the set used to tokenize the message. Declarations are not honored, so fields using the declared separators are split with the standard set instead.",
    },
    CodeInfo {
        id: PARSER_SEGMENT_NAME,
        explanation: "Segment identifiers are three upper-case letters or digits (e.g. PID, OBX, ZP1). The segment was parsed anyway, but downstream lookups by name may not find it.",
    },
];
