//! Rich-text projections.
//!
//! Upstream text shows up as a bare string, `{"simpleText": ..}`, `{"runs": [{"text": ..}]}`,
//! or `{"content": ..}` on view-model renderers.

use serde_json::Value;

/// Flattens a rich-text node to a plain string. Unknown shapes give `""`.
pub fn text(node: Option<&Value>) -> String {
    let Some(node) = node else {
        return String::new();
    };
    if let Some(s) = node.as_str() {
        return s.to_string();
    }
    if let Some(s) = node.get("simpleText").and_then(Value::as_str) {
        return s.to_string();
    }
    if let Some(runs) = node.get("runs").and_then(Value::as_array) {
        return runs
            .iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect();
    }
    if let Some(s) = node.get("content").and_then(Value::as_str) {
        return s.to_string();
    }
    String::new()
}

/// Parses a count out of display text such as `"1,234 views"`.
///
/// Decimal points are kept, so abbreviated counts like `"1.2K"` parse to `0`.
pub fn number(node: Option<&Value>) -> u64 {
    parse_count(&text(node))
}

pub(crate) fn parse_count(s: &str) -> u64 {
    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parses `"1:02:03"` style durations.
pub(crate) fn parse_duration(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    s.split(':').try_fold(0u64, |acc, part| {
        part.trim().parse::<u64>().ok().map(|n| acc * 60 + n)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_shapes() {
        assert_eq!(text(None), "");
        assert_eq!(text(Some(&json!("plain"))), "plain");
        assert_eq!(text(Some(&json!({"simpleText": "simple"}))), "simple");
        assert_eq!(
            text(Some(&json!({"runs": [{"text": "a"}, {"text": "b"}, {"bold": true}, {"text": "c"}]}))),
            "abc"
        );
        assert_eq!(text(Some(&json!({"content": "view model"}))), "view model");
        assert_eq!(text(Some(&json!(42))), "");
    }

    #[test]
    fn counts() {
        assert_eq!(number(Some(&json!({"simpleText": "1,234 views"}))), 1234);
        assert_eq!(number(Some(&json!({"simpleText": "No views"}))), 0);
        assert_eq!(number(Some(&json!(""))), 0);
        assert_eq!(number(None), 0);
        assert_eq!(parse_count("1.2M views"), 0);
        assert_eq!(parse_count("12 videos"), 12);
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("4:13"), Some(253));
        assert_eq!(parse_duration("1:02:03"), Some(3723));
        assert_eq!(parse_duration("LIVE"), None);
        assert_eq!(parse_duration(""), None);
    }
}
