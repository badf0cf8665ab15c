use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use thiserror::Error;

/// Every way a suggestion or plan request can fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad or missing client input, detected before any external call.
    #[error("{0}")]
    Validation(String),

    /// The generation service answered with something that is not the expected JSON.
    #[error("failed to parse response from generation service: {reason}")]
    MalformedPayload { raw: String, reason: String },

    /// The generation service signalled a failure (or could not be reached).
    #[error("generation service reported an error")]
    UpstreamGeneration { details: Option<Value> },

    #[error("incomplete meal data: {0}")]
    IncompleteMealData(String),

    #[error("nutrition lookup failed for {meal}: {source:#}")]
    NutritionLookupFailed {
        meal: String,
        #[source]
        source: anyhow::Error,
    },

    /// Any failure while enriching a plan; `partial` holds the plan as far as it got.
    #[error("failed to process and enrich plan: {source}")]
    PlanEnrichmentFailed {
        #[source]
        source: Box<PipelineError>,
        partial: Value,
    },
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation_error",
            PipelineError::MalformedPayload { .. } => "malformed_payload",
            PipelineError::UpstreamGeneration { .. } => "upstream_generation_error",
            PipelineError::IncompleteMealData(_) => "incomplete_meal_data",
            PipelineError::NutritionLookupFailed { .. } => "nutrition_lookup_failed",
            PipelineError::PlanEnrichmentFailed { .. } => "plan_enrichment_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = Map::new();
        body.insert("kind".into(), Value::from(self.kind()));

        let message = match self {
            PipelineError::Validation(msg) => msg,
            PipelineError::MalformedPayload { raw, reason } => {
                body.insert("details".into(), Value::String(reason));
                body.insert("raw_response".into(), Value::String(raw));
                "Failed to parse response from LLM.".to_string()
            }
            PipelineError::UpstreamGeneration { details } => {
                if let Some(details) = details {
                    body.insert("details".into(), details);
                }
                "An error occurred with the LLM service.".to_string()
            }
            err @ PipelineError::IncompleteMealData(_) => err.to_string(),
            err @ PipelineError::NutritionLookupFailed { .. } => {
                body.insert("details".into(), Value::String(err.to_string()));
                "Failed to look up nutrition data.".to_string()
            }
            PipelineError::PlanEnrichmentFailed { source, partial } => {
                body.insert("details".into(), Value::String(source.to_string()));
                body.insert("llm_data".into(), partial);
                format!("Failed to process and enrich LLM data: {source}")
            }
        };
        body.insert("error".into(), Value::String(message));

        (status, Json(Value::Object(body))).into_response()
    }
}
