use serde::Serialize;

use super::delimiters::Delimiters;

/// A parsed HL7 v2 message: an ordered sequence of segments in source line order.
///
/// A `Message` is only produced by the parser and is immutable afterwards.
/// The delimiter set used to tokenize it travels with the tree so callers can
/// decode escape sequences or report separators consistently.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    pub(crate) delimiters: Delimiters,
    pub(crate) segments: Vec<Segment>,
}

/// One line of input: a name code (e.g. `PID`) and its ordered fields.
///
/// Field *n* (1-based) is stored at index *n - 1*. For the `MSH` header the
/// first stored field is the synthesized field separator.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Segment {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
}

/// A field value, split into one or more repetitions.
///
/// Never empty: an unrepeated field has exactly one repetition.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Field {
    pub(crate) repetitions: Vec<Repetition>,
}

/// One occurrence of a (possibly repeating) field. Never empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Repetition {
    pub(crate) components: Vec<Component>,
}

/// A component and its subcomponent leaf strings.
///
/// Never empty: an unstructured value is a single subcomponent equal to the
/// raw text, which may itself be empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Component {
    pub(crate) subcomponents: Vec<String>,
}

impl Message {
    pub(crate) fn new(segments: Vec<Segment>, delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            segments,
        }
    }
}

impl Segment {
    pub(crate) fn new(name: String, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }
}

impl Field {
    pub(crate) fn new(repetitions: Vec<Repetition>) -> Self {
        debug_assert!(!repetitions.is_empty(), "Field must hold a repetition");
        Self { repetitions }
    }

    /// A field holding a single leaf value.
    pub(crate) fn from_value(value: String) -> Self {
        Self::new(vec![Repetition::new(vec![Component::new(vec![value])])])
    }
}

impl Repetition {
    pub(crate) fn new(components: Vec<Component>) -> Self {
        debug_assert!(!components.is_empty(), "Repetition must hold a component");
        Self { components }
    }
}

impl Component {
    pub(crate) fn new(subcomponents: Vec<String>) -> Self {
        debug_assert!(
            !subcomponents.is_empty(),
            "Component must hold a subcomponent"
        );
        Self { subcomponents }
    }
}
