use std::sync::LazyLock;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^```(?:json)?\s*|\s*```$").expect("fence pattern is valid")
});

/// Structured verdict read from a model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_english: bool,
    pub translated_content: String,
}

impl Verdict {
    /// Strict parse of a JSON object.
    ///
    /// `is_english` falls back to `true` and `translated_content` to an empty
    /// string when the key is missing or holds another JSON type. Anything
    /// that is not a JSON object yields `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                debug!("Reply is not valid JSON: {}", e);
                return None;
            }
        };

        let object = value.as_object()?;

        Some(Self {
            is_english: object
                .get("is_english")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            translated_content: object
                .get("translated_content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Remove a surrounding ``` / ```json fence from a reply
pub fn strip_fences(text: &str) -> String {
    let text = text.trim();

    if !text.starts_with("```") {
        return text.to_string();
    }

    FENCE.replace_all(text, "").trim().to_string()
}

/// Greedy `{...}` span: first opening brace to last closing brace
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (end > start).then(|| &text[start..=end])
}

/// Clean a raw reply and read a verdict from it
pub fn interpret(raw: &str) -> Option<Verdict> {
    let cleaned = strip_fences(raw);
    let payload = first_json_object(&cleaned).unwrap_or(&cleaned);

    if payload != cleaned {
        debug!("Extracted JSON from mixed text: {}", payload);
    }

    Verdict::parse(payload)
}

/// Local heuristic: any character outside 7-bit ASCII
pub fn looks_non_english(text: &str) -> bool {
    !text.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_fences("```JSON {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_fences("```\nHello there\n```"), "Hello there");
        assert_eq!(strip_fences("  plain text  "), "plain text");
        // Only a leading fence triggers cleanup
        assert_eq!(strip_fences("see ```code```"), "see ```code```");
    }

    #[test]
    fn test_first_json_object_is_greedy() {
        let text = "Sure! {\"is_english\": false, \"nested\": {\"x\": 1}} hope this helps";
        assert_eq!(
            first_json_object(text),
            Some("{\"is_english\": false, \"nested\": {\"x\": 1}}")
        );
        assert_eq!(first_json_object("{\n\"a\": 1\n}"), Some("{\n\"a\": 1\n}"));
        assert_eq!(first_json_object("no braces here"), None);
        assert_eq!(first_json_object("} backwards {"), None);
    }

    #[test]
    fn test_verdict_defaults() {
        assert_eq!(
            Verdict::parse("{}"),
            Some(Verdict { is_english: true, translated_content: String::new() })
        );
        assert_eq!(
            Verdict::parse(r#"{"is_english": "no", "translated_content": 42}"#),
            Some(Verdict { is_english: true, translated_content: String::new() })
        );
        assert_eq!(
            Verdict::parse(r#"{"is_english": false, "translated_content": "Hello"}"#),
            Some(Verdict { is_english: false, translated_content: "Hello".to_string() })
        );
    }

    #[test]
    fn test_verdict_rejects_non_objects() {
        assert_eq!(Verdict::parse("42"), None);
        assert_eq!(Verdict::parse("[true]"), None);
        assert_eq!(Verdict::parse("{is_english: false"), None);
        assert_eq!(Verdict::parse("not json at all"), None);
    }

    #[test]
    fn test_interpret_fenced_reply_with_prose() {
        let raw = "```json\nHere you go:\n{\"is_english\": false, \"translated_content\": \"Bonjour\"}\nDone.\n```";
        assert_eq!(
            interpret(raw),
            Some(Verdict { is_english: false, translated_content: "Bonjour".to_string() })
        );
    }

    #[test]
    fn test_interpret_garbage() {
        assert_eq!(interpret("I cannot help with that."), None);
        assert_eq!(interpret("{ broken"), None);
    }

    #[test]
    fn test_looks_non_english() {
        assert!(!looks_non_english("Hello, world! 123"));
        assert!(looks_non_english("Bonjour à tous"));
        assert!(looks_non_english("こんにちは"));
        assert!(!looks_non_english(""));
    }
}
