use std::sync::LazyLock;

use anyhow::{Context, anyhow};
use regex::Regex;
use serde_json::Value;

/// Greedy outermost span: the leftmost `[` or `{` that has a matching closer
/// somewhere after it, through the last such closer.
static JSON_SPAN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)(\[.*\]|\{.*\})").expect("JSON span pattern is valid"));

/// Recover a JSON value from model output that may wrap it in prose or code fences.
///
/// The trimmed text is parsed directly first. Failing that, the greedy span is
/// parsed once; there is no further guessing. Multiple JSON blobs, or stray
/// braces in the surrounding prose, make the span capture too much and the
/// extraction fails.
///
/// The value is not checked against any schema.
pub fn extract_json(text: &str) -> anyhow::Result<Value> {
  let text = text.trim();

  if let Ok(value) = serde_json::from_str(text) {
    return Ok(value);
  }

  let span = JSON_SPAN
    .find(text)
    .ok_or_else(|| anyhow!("no JSON object or array found in model output"))?;

  serde_json::from_str(span.as_str()).context("model output contains malformed JSON")
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;

  #[test]
  fn valid_json_parses_as_is() {
    for raw in [r#"{"a": 1, "b": [true, null]}"#, "[1, 2, 3]", "  \"plain\"  ", "42"] {
      let direct: Value = serde_json::from_str(raw.trim()).unwrap();
      assert_eq!(extract_json(raw).unwrap(), direct);
    }
  }

  #[test]
  fn object_is_recovered_from_prose() {
    let value = extract_json("here is your answer: {\"a\":1} thanks").unwrap();
    assert_eq!(value, json!({"a": 1}));
  }

  #[test]
  fn code_fences_are_ignored() {
    let raw = "```json\n{\"recommendations\": [{\"title\": \"Data Analyst\", \"rank\": 1}]}\n```";
    let value = extract_json(raw).unwrap();
    assert_eq!(value["recommendations"][0]["title"], json!("Data Analyst"));
  }

  #[test]
  fn leftmost_opener_wins() {
    let value = extract_json("Careers: [\"a\", \"b\"] (see {notes})").unwrap();
    assert_eq!(value, json!(["a", "b"]));
  }

  #[test]
  fn opener_without_closer_is_skipped() {
    let value = extract_json("oops { then [1, 2]").unwrap();
    assert_eq!(value, json!([1, 2]));
  }

  #[test]
  fn text_without_braces_fails() {
    assert!(extract_json("I could not produce a roadmap today.").is_err());
    assert!(extract_json("").is_err());
  }

  #[test]
  fn malformed_span_fails() {
    assert!(extract_json("result: {\"a\": 1,}").is_err());
  }

  // Known limitation: two separate objects are captured as one span, which is not valid JSON.
  #[test]
  fn multiple_blobs_are_captured_greedily() {
    let raw = "first {\"a\": 1} and then {\"b\": 2}";
    assert!(extract_json(raw).is_err());
  }

  // Known limitation: a brace in trailing prose extends the span past the real object.
  #[test]
  fn stray_closing_brace_in_prose_breaks_extraction() {
    let raw = "{\"a\": 1} <- use this, not the } above";
    assert!(extract_json(raw).is_err());
  }
}
