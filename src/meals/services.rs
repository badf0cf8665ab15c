use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::generation::client::GenerationGateway;
use crate::generation::parser::parse_reply;
use crate::generation::prompt::{build_prompt, PromptMode};
use crate::meals::assembler::assemble_plan;
use crate::meals::dto::{Plan, PlanDuration, Profile, SuggestionPayload};
use crate::nutrition::enrich::MealEnricher;
use crate::state::AppState;

/// One generation call, then syntax and error-signal checks. Returns the raw
/// text next to the payload so later shape failures can still report it.
async fn generate_payload(
    gateway: &dyn GenerationGateway,
    prompt: &str,
) -> Result<(String, Value), PipelineError> {
    let raw = gateway.generate(prompt).await.map_err(|e| {
        let message = format!("{e:#}");
        warn!(error = %message, "generation call failed");
        PipelineError::UpstreamGeneration {
            details: Some(Value::String(message)),
        }
    })?;
    let payload = parse_reply(&raw)?.into_payload()?;
    Ok((raw, payload))
}

pub async fn suggest_meals(
    state: &AppState,
    profile: &Profile,
    available_ingredients: &[String],
) -> Result<SuggestionPayload, PipelineError> {
    let prompt = build_prompt(
        profile,
        PromptMode::Suggestion {
            available_ingredients,
        },
    );
    let (raw, payload) = generate_payload(state.generation.as_ref(), &prompt).await?;

    let mut suggestion = SuggestionPayload::deserialize(&payload).map_err(|e| {
        PipelineError::MalformedPayload {
            raw,
            reason: e.to_string(),
        }
    })?;

    let enricher = MealEnricher::new(state.nutrition.as_ref());
    enricher
        .enrich_all(
            suggestion
                .meals_mut()
                .map(|(label, meal)| (label.to_string(), meal)),
        )
        .await?;

    info!(
        option_a = suggestion.meal_option_a.is_some(),
        option_b = suggestion.meal_option_b.is_some(),
        "meal suggestion ready"
    );
    Ok(suggestion)
}

pub async fn plan_meals(
    state: &AppState,
    profile: &Profile,
    duration: PlanDuration,
) -> Result<Plan, PipelineError> {
    let prompt = build_prompt(profile, PromptMode::Plan(duration));
    let (raw, payload) = generate_payload(state.generation.as_ref(), &prompt).await?;

    let parsed = Plan::deserialize(&payload);
    let plan = match parsed {
        Ok(plan) => plan,
        Err(e) => {
            return Err(PipelineError::PlanEnrichmentFailed {
                source: Box::new(PipelineError::MalformedPayload {
                    raw,
                    reason: e.to_string(),
                }),
                partial: payload,
            })
        }
    };
    if plan.days.len() != duration.days() as usize {
        warn!(
            requested = duration.days(),
            received = plan.days.len(),
            "generated plan has a different number of days"
        );
    }

    let plan = assemble_plan(state.nutrition.as_ref(), plan).await?;
    info!(days = plan.days.len(), "meal plan ready");
    Ok(plan)
}
