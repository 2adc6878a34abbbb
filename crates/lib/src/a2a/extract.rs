//! Pick the caller's current utterance out of a multi-part message.
//!
//! Candidates are collected in part order and the last one wins: in multi-turn
//! envelopes earlier fragments are usually quoted history or metadata echoes.

use serde_json::Value;

use super::protocol::{Message, Part};

/// Returned by [`extract`] when no part carries usable text.
pub const NO_VALID_MESSAGE: &str = "no valid message found";

/// Trimmed text if it is non-empty and does not look like markup or JSON.
fn candidate(raw: &str) -> Option<&str> {
    let t = raw.trim();
    match t.chars().next() {
        None | Some('<') | Some('{') => None,
        Some(_) => Some(t),
    }
}

/// `text` fields of the object entries of a data list; anything else is skipped.
fn data_candidates(data: &Value) -> impl Iterator<Item = &str> {
    data.as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.as_object())
        .filter_map(|obj| obj.get("text").and_then(Value::as_str))
        .filter_map(candidate)
}

/// Last qualifying text fragment, or None when the message has nothing usable.
pub fn extract_text(message: Option<&Message>) -> Option<String> {
    let message = message?;
    let mut last: Option<&str> = None;
    for part in &message.parts {
        match part {
            Part::Text { text } => {
                if let Some(t) = candidate(text) {
                    last = Some(t);
                }
            }
            Part::Data { data } => {
                if let Some(t) = data_candidates(data).last() {
                    last = Some(t);
                }
            }
            Part::Other => {}
        }
    }
    last.map(str::to_string)
}

/// Like [`extract_text`] but never empty-handed: falls back to [`NO_VALID_MESSAGE`].
pub fn extract(message: Option<&Message>) -> String {
    extract_text(message).unwrap_or_else(|| NO_VALID_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(parts: Value) -> Message {
        serde_json::from_value(json!({ "role": "user", "parts": parts })).unwrap()
    }

    #[test]
    fn single_text_part_is_trimmed() {
        let m = msg(json!([{ "kind": "text", "text": "  PM2.5 in Lagos?  " }]));
        assert_eq!(extract(Some(&m)), "PM2.5 in Lagos?");
    }

    #[test]
    fn markup_is_skipped_and_latest_wins() {
        let m = msg(json!([
            { "kind": "text", "text": "<b>ignore</b>" },
            { "kind": "text", "text": "What's the AQI in Abuja" }
        ]));
        assert_eq!(extract(Some(&m)), "What's the AQI in Abuja");
    }

    #[test]
    fn later_part_beats_earlier_one() {
        let m = msg(json!([
            { "kind": "text", "text": "air in Paris" },
            { "kind": "text", "text": "<p>quoted</p>" },
            { "kind": "text", "text": "what about Rome" },
            { "kind": "text", "text": "   " }
        ]));
        assert_eq!(extract(Some(&m)), "what about Rome");
    }

    #[test]
    fn data_list_with_only_json_text_yields_sentinel() {
        let m = msg(json!([{ "kind": "data", "data": [{ "text": "{malformed}" }] }]));
        assert_eq!(extract(Some(&m)), NO_VALID_MESSAGE);
    }

    #[test]
    fn data_list_entries_contribute_in_order() {
        let m = msg(json!([
            { "kind": "text", "text": "first" },
            { "kind": "data", "data": [
                { "text": "history: Lagos" },
                "not a mapping",
                42,
                { "other": "field" },
                { "text": " Kano now " },
                { "text": "<div/>" }
            ]}
        ]));
        assert_eq!(extract(Some(&m)), "Kano now");
    }

    #[test]
    fn non_array_data_is_ignored() {
        let m = msg(json!([
            { "kind": "text", "text": "Accra" },
            { "kind": "data", "data": { "text": "not a list" } }
        ]));
        assert_eq!(extract(Some(&m)), "Accra");
    }

    #[test]
    fn missing_or_empty_message() {
        assert_eq!(extract(None), NO_VALID_MESSAGE);
        assert_eq!(extract(Some(&msg(json!([])))), NO_VALID_MESSAGE);
        assert_eq!(extract_text(None), None);
    }

    #[test]
    fn file_parts_are_ignored() {
        let m = msg(json!([
            { "kind": "text", "text": "Delhi" },
            { "kind": "file", "file": { "uri": "https://x/y.png" } }
        ]));
        assert_eq!(extract_text(Some(&m)).as_deref(), Some("Delhi"));
    }
}
