//! Escape sequence decoding for leaf values.
//!
//! The tokenizer never interprets escapes, so a leaf may still contain
//! sequences such as `\F\` (field separator) or `\X0D0A\` (hex data).
//! Decoding is opt-in and happens on individual values after parsing:
//!
//! | Sequence | Meaning |
//! |---|---|
//! | `\F\` | field separator |
//! | `\S\` | component separator |
//! | `\T\` | subcomponent separator |
//! | `\R\` | repetition separator |
//! | `\E\` | escape character |
//! | `\Xhh..\` | hex-encoded UTF-8 bytes |
//!
//! The escape character is taken from the message's [`Delimiters`].

use crate::grammar::delimiters::Delimiters;

/// An escape decoding error at a specific byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeError {
    /// Byte offset of the opening escape character within the value.
    pub offset: usize,
    /// Human-readable description of the error.
    pub message: String,
}

/// Validate escape sequences in a value without keeping decoded output.
pub fn validate_escapes(value: &str, delimiters: &Delimiters) -> Vec<EscapeError> {
    scan(value, delimiters).1
}

/// Decode escape sequences in a value.
///
/// Returns `Ok(decoded)` on success, or `Err(errors)` listing every invalid
/// sequence. Processing continues past errors, copying the raw text of an
/// invalid sequence through unchanged.
pub fn decode_escapes(value: &str, delimiters: &Delimiters) -> Result<String, Vec<EscapeError>> {
    let (decoded, errors) = scan(value, delimiters);
    if errors.is_empty() {
        Ok(decoded)
    } else {
        Err(errors)
    }
}

fn scan(value: &str, delimiters: &Delimiters) -> (String, Vec<EscapeError>) {
    let esc = delimiters.escape;
    let esc_len = esc.len_utf8();
    let mut output = String::with_capacity(value.len());
    let mut errors = Vec::new();
    let mut i = 0;

    while let Some(found) = value[i..].find(esc) {
        let open = i + found;
        output.push_str(&value[i..open]);
        let body_start = open + esc_len;

        let Some(body_len) = value[body_start..].find(esc) else {
            errors.push(EscapeError {
                offset: open,
                message: format!(
                    "Unterminated escape sequence at offset {open} (expected a closing '{esc}')"
                ),
            });
            output.push_str(&value[open..]);
            return (output, errors);
        };

        let close = body_start + body_len;
        let body = &value[body_start..close];
        match decode_sequence(body, delimiters) {
            Ok(text) => output.push_str(&text),
            Err(message) => {
                errors.push(EscapeError {
                    offset: open,
                    message,
                });
                output.push_str(&value[open..close + esc_len]);
            }
        }
        i = close + esc_len;
    }

    output.push_str(&value[i..]);
    (output, errors)
}

/// Decode the text between two escape characters.
fn decode_sequence(body: &str, d: &Delimiters) -> Result<String, String> {
    let single = match body {
        "F" => Some(d.field),
        "S" => Some(d.component),
        "T" => Some(d.subcomponent),
        "R" => Some(d.repetition),
        "E" => Some(d.escape),
        _ => None,
    };
    if let Some(c) = single {
        return Ok(c.to_string());
    }

    if let Some(hex) = body.strip_prefix('X') {
        let bytes = decode_hex(hex)
            .ok_or_else(|| format!("Invalid hex escape {body:?} (expected pairs of hex digits)"))?;
        return String::from_utf8(bytes)
            .map_err(|_| format!("Hex escape {body:?} does not decode to UTF-8 text"));
    }

    if body.is_empty() {
        Err("Empty escape sequence".to_string())
    } else {
        Err(format!("Unsupported escape sequence {body:?}"))
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    let b = hex.as_bytes();
    if b.is_empty() || b.len() % 2 != 0 {
        return None;
    }
    b.chunks(2)
        .map(|pair| Some((hex_digit_value(pair[0])? << 4) | hex_digit_value(pair[1])?))
        .collect()
}

/// Convert a single ASCII hex digit to its numeric value (0-15).
fn hex_digit_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}
