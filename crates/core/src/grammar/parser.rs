use super::{
    ast::{Component, Field, Message, Repetition, Segment},
    delimiters::{Delimiters, HEADER_SEGMENT, resolve_from_lines},
    diag::{Diagnostic, LineIndex, Span, codes},
    lexer::{Line, split_lines},
};
use crate::error::ParseError;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Parser settings, threaded explicitly through every parsing call.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Separator set used to tokenize every segment (standard by default).
    pub delimiters: Delimiters,
    /// Emit non-fatal structural warnings alongside the tree.
    pub lint: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::STANDARD,
            lint: true,
        }
    }
}

impl ParserConfig {
    /// Use a non-standard separator set.
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Enable or disable structural warnings.
    pub fn with_lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }
}

/// Result of parsing one message.
#[derive(Debug, serde::Serialize)]
pub struct ParseResult {
    /// The parsed message tree.
    pub message: Message,
    /// Non-fatal warnings produced during parsing. Never contains errors.
    pub diagnostics: Vec<Diagnostic>,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse a message with the standard separators.
///
/// # Errors
///
/// Fails only for empty input or a first segment that is not `MSH`; see
/// [`ParseError`].
pub fn parse_str(input: &str) -> Result<ParseResult, ParseError> {
    parse_with_config(input, &ParserConfig::default())
}

/// Parse a message with an explicit configuration.
///
/// # Errors
///
/// Same conditions as [`parse_str`].
pub fn parse_with_config(input: &str, config: &ParserConfig) -> Result<ParseResult, ParseError> {
    Parser::new(input, config).parse()
}

impl std::str::FromStr for Message {
    type Err = ParseError;

    /// Parse with the standard separators, discarding warnings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s).map(|res| res.message)
    }
}

/// Split one segment line into its name and fields.
///
/// For the `MSH` header a first field holding the literal field separator is
/// synthesized; the token after it (the encoding characters) is tokenized like
/// any other field.
pub fn parse_segment(line: &str, delimiters: &Delimiters) -> Segment {
    let mut tokens = line.split(delimiters.field);
    let name = tokens.next().unwrap_or_default().to_string();
    let mut fields = Vec::new();
    if name == HEADER_SEGMENT {
        fields.push(Field::from_value(delimiters.field.to_string()));
    }
    fields.extend(tokens.map(|raw| parse_field(raw, delimiters)));
    Segment::new(name, fields)
}

/// Split a raw field into repetitions, components, and subcomponents.
///
/// Escape sequences are not interpreted: a separator preceded by the escape
/// character still splits.
pub fn parse_field(raw: &str, delimiters: &Delimiters) -> Field {
    Field::new(
        raw.split(delimiters.repetition)
            .map(|rep| parse_repetition(rep, delimiters))
            .collect(),
    )
}

fn parse_repetition(raw: &str, delimiters: &Delimiters) -> Repetition {
    Repetition::new(
        raw.split(delimiters.component)
            .map(|comp| parse_component(comp, delimiters))
            .collect(),
    )
}

fn parse_component(raw: &str, delimiters: &Delimiters) -> Component {
    Component::new(
        raw.split(delimiters.subcomponent)
            .map(str::to_owned)
            .collect(),
    )
}

// ─── Parser Implementation ─────────────────────────────────────────────────

struct Parser<'a> {
    input: &'a str,
    config: &'a ParserConfig,
    diags: Vec<Diagnostic>,
    /// Built on first use; only needed when a warning is reported.
    line_index: Option<LineIndex>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, config: &'a ParserConfig) -> Self {
        Self {
            input,
            config,
            diags: Vec::new(),
            line_index: None,
        }
    }

    fn parse(mut self) -> Result<ParseResult, ParseError> {
        let lines = split_lines(self.input);
        let delimiters = resolve_from_lines(&lines, self.config)?;
        log::debug!(
            "parsing {} segment line(s) with delimiters {}",
            lines.len(),
            delimiters
        );

        let mut segments = Vec::with_capacity(lines.len());
        for line in &lines {
            let segment = parse_segment(line.text, &delimiters);
            log::trace!(
                "segment {} with {} field(s) at {}..{}",
                segment.name,
                segment.fields.len(),
                line.start,
                line.end
            );
            if self.config.lint {
                self.lint_segment(line, &segment, &delimiters);
            }
            segments.push(segment);
        }

        Ok(ParseResult {
            message: Message::new(segments, delimiters),
            diagnostics: self.diags,
        })
    }

    // ── Structural warnings ─────────────────────────────────────────────

    fn lint_segment(&mut self, line: &Line<'_>, segment: &Segment, delimiters: &Delimiters) {
        let name = segment.name.as_str();
        if !is_segment_code(name) {
            let span = Span::new(line.start, line.start + name.len());
            let line_no = self.line_number(line.start);
            self.diags.push(
                Diagnostic::warn(
                    codes::PARSER_SEGMENT_NAME,
                    format!("segment name {name:?} is not a three-character code"),
                    Some(span),
                )
                .with_context(ctx!("segment" => name, "line" => line_no.to_string())),
            );
        }

        if line.text.starts_with(HEADER_SEGMENT)
            && let Some(declared) = Delimiters::declared_in(line.text)
            && declared != *delimiters
        {
            let declared_len = declared_text_len(line.text, declared.field);
            let start = line.start + HEADER_SEGMENT.len();
            let line_no = self.line_number(line.start);
            self.diags.push(
                Diagnostic::warn(
                    codes::PARSER_NONSTANDARD_DELIMITERS,
                    format!(
                        "header declares separators {declared} but the message is tokenized with {delimiters}"
                    ),
                    Some(Span::new(start, start + declared_len)),
                )
                .with_context(ctx!(
                    "declared" => declared.to_string(),
                    "resolved" => delimiters.to_string(),
                    "line" => line_no.to_string(),
                )),
            );
        }
    }

    /// 1-based line number of a byte offset.
    fn line_number(&mut self, offset: usize) -> usize {
        let index = self
            .line_index
            .get_or_insert_with(|| LineIndex::new(self.input));
        index.line_number(offset)
    }
}

/// Byte length of MSH-1 plus MSH-2 as written in the header line.
fn declared_text_len(line: &str, field: char) -> usize {
    let rest = &line[HEADER_SEGMENT.len()..];
    let encoding_len = rest[field.len_utf8()..]
        .find(field)
        .unwrap_or(rest.len() - field.len_utf8());
    field.len_utf8() + encoding_len
}

fn is_segment_code(name: &str) -> bool {
    name.len() == 3
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
