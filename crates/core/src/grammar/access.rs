//! Bounds-safe, 1-based read access over a parsed [`Message`].
//!
//! Every accessor is total: an index of `0` or past the populated length
//! yields `None` for container lookups and `""` for leaf values. Storage stays
//! 0-based; [`nth`] is the only place the two conventions meet.

use super::ast::{Component, Field, Message, Repetition, Segment};
use super::delimiters::{Delimiters, HEADER_SEGMENT};

/// Look up a 1-based position in a 0-based slice.
fn nth<T>(items: &[T], index: usize) -> Option<&T> {
    index.checked_sub(1).and_then(|i| items.get(i))
}

impl Message {
    /// All segments in source order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The separator set used to tokenize this message.
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// First segment named `name`.
    pub fn get_segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// All segments named `name`, in order. Empty if none match.
    pub fn get_segments(&self, name: &str) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.name == name).collect()
    }

    /// The `occurrence`-th (1-based) segment named `name`.
    pub fn get_segment_occurrence(&self, name: &str, occurrence: usize) -> Option<&Segment> {
        let skip = occurrence.checked_sub(1)?;
        self.segments.iter().filter(|s| s.name == name).nth(skip)
    }

    /// The `MSH` header segment.
    pub fn header(&self) -> Option<&Segment> {
        self.get_segment(HEADER_SEGMENT)
    }

    /// MSH-9 with its components joined by the component separator
    /// (e.g. `ADT^A01`). Empty when absent.
    pub fn message_type(&self) -> String {
        let Some(rep) = self
            .header()
            .and_then(|h| h.get_field(9))
            .and_then(|f| f.get_repetition(1))
        else {
            return String::new();
        };
        let sep = self.delimiters.component.to_string();
        rep.components
            .iter()
            .map(Component::value)
            .collect::<Vec<_>>()
            .join(&sep)
    }

    /// MSH-10, the message control ID.
    pub fn control_id(&self) -> &str {
        self.header().map_or("", |h| h.get_component(10, 1))
    }

    /// MSH-12, the version ID (e.g. `2.5`).
    pub fn version(&self) -> &str {
        self.header().map_or("", |h| h.get_component(12, 1))
    }
}

impl Segment {
    /// Segment name code (e.g. `PID`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields; field *n* is at index *n - 1*.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The `index`-th field, or `None` if out of range.
    pub fn get_field(&self, index: usize) -> Option<&Field> {
        nth(&self.fields, index)
    }

    /// Component `component` of the first repetition of field `field`.
    ///
    /// Chains [`Segment::get_field`] and [`Field::get_component`] without
    /// an intermediate `Option`.
    pub fn get_component(&self, field: usize, component: usize) -> &str {
        self.get_field(field)
            .map_or("", |f| f.get_component(component))
    }
}

impl Field {
    /// All repetitions, in order. Never empty.
    pub fn repetitions(&self) -> &[Repetition] {
        &self.repetitions
    }

    /// The `index`-th repetition, or `None` if out of range.
    pub fn get_repetition(&self, index: usize) -> Option<&Repetition> {
        nth(&self.repetitions, index)
    }

    /// Component `index` of the first repetition.
    pub fn get_component(&self, index: usize) -> &str {
        self.repetitions
            .first()
            .map_or("", |rep| rep.get_component(index))
    }

    /// Whether every leaf in the field is empty.
    pub fn is_blank(&self) -> bool {
        self.repetitions.iter().all(|rep| {
            rep.components
                .iter()
                .all(|c| c.subcomponents.iter().all(String::is_empty))
        })
    }
}

impl Repetition {
    /// All components, in order. Never empty.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The `index`-th component, or `None` if out of range.
    pub fn component(&self, index: usize) -> Option<&Component> {
        nth(&self.components, index)
    }

    /// First subcomponent of component `index`.
    pub fn get_component(&self, index: usize) -> &str {
        self.component(index).map_or("", Component::value)
    }
}

impl Component {
    /// All subcomponents, in order. Never empty.
    pub fn subcomponents(&self) -> &[String] {
        &self.subcomponents
    }

    /// The first subcomponent: the component's value when it is unstructured.
    pub fn value(&self) -> &str {
        self.subcomponents.first().map_or("", String::as_str)
    }

    /// The `index`-th subcomponent.
    pub fn get_component(&self, index: usize) -> &str {
        nth(&self.subcomponents, index).map_or("", String::as_str)
    }
}
