use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Loosely-typed record carved out of a model reply.
pub type RawRecord = Map<String, Value>;

// Both patterns are non-greedy and span newlines: the first closing
// bracket ends the candidate.
static ARRAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*?\]").expect("array pattern is valid"));
static OBJECT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*?\}").expect("object pattern is valid"));

/// Find the JSON embedded in a free-text model reply.
///
/// The first `[...]` fragment is tried as a list of objects. When there is
/// none, or it does not parse, the first `{...}` fragment is tried as a
/// single object and returned as a one-element list. Anything else yields
/// an empty list. Field types are not checked here.
pub fn extract_records(text: &str) -> Vec<RawRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if let Some(found) = ARRAY_PATTERN.find(text) {
        match serde_json::from_str::<Vec<RawRecord>>(found.as_str()) {
            Ok(records) => return records,
            Err(e) => log::debug!("Array fragment did not parse, trying object: {}", e),
        }
    }

    if let Some(found) = OBJECT_PATTERN.find(text) {
        match serde_json::from_str::<RawRecord>(found.as_str()) {
            Ok(record) => return vec![record],
            Err(e) => log::debug!("Object fragment did not parse: {}", e),
        }
    }

    Vec::new()
}

/// Only the first `[...]` fragment, parsed as a list of objects. No
/// object fallback: a reply holding a lone `{...}` yields nothing.
pub fn extract_array(text: &str) -> Vec<RawRecord> {
    ARRAY_PATTERN
        .find(text)
        .and_then(|found| match serde_json::from_str::<Vec<RawRecord>>(found.as_str()) {
            Ok(records) => Some(records),
            Err(e) => {
                log::debug!("Array fragment did not parse: {}", e);
                None
            }
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_inside_prose() {
        let reply = "Sure! Here is the estimate:\n[\n  {\"name\": \"Rice\", \"kcal\": 260},\n  {\"name\": \"Chicken\", \"kcal\": 165}\n]\nEnjoy your meal.";
        let records = extract_records(reply);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], json!("Rice"));
        assert_eq!(records[1]["kcal"], json!(165));
    }

    #[test]
    fn test_markdown_fenced_array() {
        let reply = "```json\n[{\"name\": \"Apple\", \"weight_g\": 180}]\n```";
        let records = extract_records(reply);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["weight_g"], json!(180));
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let reply = "Result: {\"name\": \"Banana\", \"kcal\": 105, \"confidence\": 0.9}";
        let records = extract_records(reply);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], json!("Banana"));
    }

    #[test]
    fn test_broken_array_falls_back_to_object() {
        let reply = "[oops] {\"name\": \"Toast\"}";
        let records = extract_records(reply);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], json!("Toast"));
    }

    #[test]
    fn test_no_json_gives_empty() {
        assert!(extract_records("I could not see any food in this picture.").is_empty());
        assert!(extract_records("").is_empty());
        assert!(extract_records("   \n").is_empty());
    }

    #[test]
    fn test_array_only_extraction() {
        let records = extract_array("Ideas:\n[{\"name\": \"Oats\"}, {\"name\": \"Eggs\"}]");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], json!("Eggs"));

        assert!(extract_array(r#"Try this: {"name": "Oats", "estimated_kcal": 300}"#).is_empty());
        assert!(extract_array("[broken").is_empty());
    }

    #[test]
    fn test_unparseable_fragments_give_empty() {
        assert!(extract_records("[not json] and {also not json}").is_empty());
    }
}
