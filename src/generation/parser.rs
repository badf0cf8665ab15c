use serde_json::Value;

use crate::error::PipelineError;

/// Key the generation service uses to report failure inside an otherwise valid reply.
pub const ERROR_SIGNAL_KEY: &str = "error";

/// What a syntactically valid generation reply turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationReply {
    Payload(Value),
    UpstreamError { details: Option<Value> },
}

/// Parses raw generation output. Only syntax and the error signal are checked
/// here; the shape of the payload is left to the caller.
pub fn parse_reply(raw: &str) -> Result<GenerationReply, PipelineError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| PipelineError::MalformedPayload {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;

    let Value::Object(mut root) = value else {
        return Err(PipelineError::MalformedPayload {
            raw: raw.to_string(),
            reason: "expected a JSON object at the top level".into(),
        });
    };

    if root.contains_key(ERROR_SIGNAL_KEY) {
        return Ok(GenerationReply::UpstreamError {
            details: root.remove("details"),
        });
    }
    Ok(GenerationReply::Payload(Value::Object(root)))
}

impl GenerationReply {
    pub fn into_payload(self) -> Result<Value, PipelineError> {
        match self {
            GenerationReply::Payload(v) => Ok(v),
            GenerationReply::UpstreamError { details } => {
                Err(PipelineError::UpstreamGeneration { details })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_json_is_malformed_and_keeps_raw_text() {
        let raw = "I'm sorry, I can't produce JSON today.";
        match parse_reply(raw).unwrap_err() {
            PipelineError::MalformedPayload { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn top_level_array_is_malformed() {
        assert!(matches!(
            parse_reply("[1, 2, 3]"),
            Err(PipelineError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn error_key_is_an_upstream_error() {
        let raw = r#"{"error": "rate_limited", "details": {"retry_after": 30}, "meal_option_a": {}}"#;
        let reply = parse_reply(raw).unwrap();
        assert_eq!(
            reply,
            GenerationReply::UpstreamError {
                details: Some(json!({"retry_after": 30}))
            }
        );
        assert!(matches!(
            reply.into_payload(),
            Err(PipelineError::UpstreamGeneration { details: Some(_) })
        ));
    }

    #[test]
    fn error_key_without_details() {
        let reply = parse_reply(r#"{"error": null}"#).unwrap();
        assert_eq!(reply, GenerationReply::UpstreamError { details: None });
    }

    #[test]
    fn valid_payload_is_returned_as_is() {
        let raw = r#"{"plan_title": "Green Week", "days": [], "extra": true}"#;
        let payload = parse_reply(raw).unwrap().into_payload().unwrap();
        assert_eq!(payload, json!({"plan_title": "Green Week", "days": [], "extra": true}));
    }
}
