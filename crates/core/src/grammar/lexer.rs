use super::diag::Span;

/// One non-blank source line, borrowed from the input.
///
/// `text` is always exactly `&input[start..end]` and never includes the line
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Borrowed line text without its terminator.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Line<'_> {
    /// Source span of this line.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Split raw message text into segment lines.
///
/// `\r\n`, bare `\r`, and `\n` all end a line. Lines that are empty or contain
/// only whitespace are dropped; surviving lines keep their relative order and
/// their text is not trimmed.
///
/// Line terminators are ASCII, so scanning bytes never splits a multi-byte
/// UTF-8 character.
pub fn split_lines(input: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let b = input.as_bytes();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b'\r' | b'\n' => {
                push_line(input, start, i, &mut lines);
                // Normalize CRLF into a single break.
                i += if b[i] == b'\r' && b.get(i + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                start = i;
            }
            _ => i += 1,
        }
    }
    push_line(input, start, b.len(), &mut lines);
    lines
}

fn push_line<'a>(input: &'a str, start: usize, end: usize, lines: &mut Vec<Line<'a>>) {
    let text = &input[start..end];
    if !text.trim().is_empty() {
        lines.push(Line { text, start, end });
    }
}
