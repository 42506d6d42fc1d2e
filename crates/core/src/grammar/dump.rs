use super::ast::Message;

/// Serialize a message tree to a pretty-printed JSON string.
pub fn to_pretty_json(message: &Message) -> String {
    serde_json::to_string_pretty(message).expect("Message serialization cannot fail")
}
