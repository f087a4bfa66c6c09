//! Recovers a single JSON object from free-form model output.
//!
//! Models wrap JSON in code fences, prepend a sentence of preamble or append
//! commentary. The extractor tolerates that framing but never repairs the
//! JSON itself: the slice between the first `{` and the last `}` must parse
//! as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

const EXCERPT_LIMIT: usize = 200;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[A-Za-z0-9_+.-]*[ \t]*\r?\n?([\s\S]*?)```").expect("code fence pattern")
});

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model returned empty output")]
    EmptyOutput,

    #[error("malformed model output at line {line}, column {column}: {message} (near: {excerpt:?})")]
    MalformedOutput {
        message: String,
        line: usize,
        column: usize,
        excerpt: String,
    },
}

impl ExtractError {
    fn malformed(message: impl Into<String>, source: &str) -> Self {
        ExtractError::MalformedOutput {
            message: message.into(),
            line: 0,
            column: 0,
            excerpt: excerpt(source),
        }
    }
}

fn excerpt(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let truncated: String = trimmed.chars().take(EXCERPT_LIMIT).collect();
    format!("{truncated}...")
}

fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str())
        .unwrap_or(text)
}

pub fn extract(text: &str) -> Result<Value, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyOutput);
    }

    let body = strip_code_fence(text);
    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err(ExtractError::malformed("no JSON object found", body));
    };
    if end < start {
        return Err(ExtractError::malformed(
            "closing brace precedes opening brace",
            body,
        ));
    }

    let candidate = &body[start..=end];
    serde_json::from_str::<Value>(candidate).map_err(|err| ExtractError::MalformedOutput {
        message: err.to_string(),
        line: err.line(),
        column: err.column(),
        excerpt: excerpt(candidate),
    })
}

/// Extracts the object and deserializes it into `T`. A shape mismatch is
/// reported the same way as unparseable text.
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let value = extract(text)?;
    let rendered = value.to_string();
    serde_json::from_value(value)
        .map_err(|err| ExtractError::malformed(format!("unexpected structure: {err}"), &rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn blank_input_is_empty_output() {
        assert!(matches!(extract(""), Err(ExtractError::EmptyOutput)));
        assert!(matches!(extract("   \n\t"), Err(ExtractError::EmptyOutput)));
    }

    #[test]
    fn text_without_braces_is_malformed() {
        assert!(matches!(
            extract("no braces here"),
            Err(ExtractError::MalformedOutput { .. })
        ));
        assert!(matches!(
            extract("} backwards {"),
            Err(ExtractError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        assert_eq!(
            extract(r#"prefix {"a":1} suffix"#).unwrap(),
            json!({ "a": 1 })
        );
    }

    #[test]
    fn fenced_and_bare_output_agree() {
        let bare = r#"{"ideas": [{"id": "I1", "title": "Marble"}], "note": "x"}"#;
        let tagged = format!("Here you go:\n```json\n{bare}\n```\nEnjoy!");
        let untagged = format!("```\n{bare}\n```");
        let expected = extract(bare).unwrap();
        assert_eq!(extract(&tagged).unwrap(), expected);
        assert_eq!(extract(&untagged).unwrap(), expected);
    }

    #[test]
    fn unterminated_fence_falls_back_to_brace_scan() {
        let text = "```json\n{\"product\": \"bag\"}";
        assert_eq!(extract(text).unwrap(), json!({ "product": "bag" }));
    }

    #[test]
    fn parse_failure_reports_position_and_excerpt() {
        let err = extract("{\"a\": 1,\n \"b\": }").unwrap_err();
        match err {
            ExtractError::MalformedOutput {
                line, excerpt, ..
            } => {
                assert_eq!(line, 2);
                assert!(excerpt.starts_with("{\"a\": 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn does_not_repair_trailing_commas() {
        assert!(matches!(
            extract(r#"{"a": 1,}"#),
            Err(ExtractError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn typed_extraction_rejects_wrong_shape() {
        #[derive(Debug, Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let named: Result<Named, _> = extract_as(r#"{"name": 5}"#);
        assert!(matches!(named, Err(ExtractError::MalformedOutput { .. })));
    }
}
