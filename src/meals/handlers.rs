use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{error::PipelineError, state::AppState};

use super::dto::{
    string_list, Plan, PlanDuration, PlanRequest, Profile, SuggestionPayload, SuggestionRequest,
};
use super::services::{plan_meals, suggest_meals};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meal-suggestion", post(meal_suggestion))
        .route("/meal-plan", post(meal_plan))
}

/// POST /meal-suggestion { user_profile, available_ingredients? }
#[instrument(skip(state, body))]
pub async fn meal_suggestion(
    State(state): State<AppState>,
    body: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionPayload>, PipelineError> {
    let Json(body) = body.map_err(reject_body)?;
    let profile = require_profile(
        body.user_profile.as_ref(),
        "A 'user_profile' object is required in the request body.",
    )?;
    let available = string_list(body.available_ingredients.as_ref());

    info!(diet = %profile.dietary_preferences, goal = %profile.goal, "meal suggestion requested");
    match suggest_meals(&state, &profile, &available).await {
        Ok(suggestion) => Ok(Json(suggestion)),
        Err(e) => {
            error!(kind = e.kind(), error = %e, "meal suggestion failed");
            Err(e)
        }
    }
}

/// POST /meal-plan { user_profile, plan_duration_days: 1 | 3 }
#[instrument(skip(state, body))]
pub async fn meal_plan(
    State(state): State<AppState>,
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<Plan>, PipelineError> {
    let Json(body) = body.map_err(reject_body)?;
    let profile = require_profile(
        body.user_profile.as_ref(),
        "A 'user_profile' object is required.",
    )?;
    let duration = PlanDuration::from_json(body.plan_duration_days.as_ref()).ok_or_else(|| {
        warn!(value = ?body.plan_duration_days, "invalid plan duration");
        PipelineError::Validation("A 'plan_duration_days' field (1 or 3) is required.".into())
    })?;

    info!(days = duration.days(), goal = %profile.goal, "meal plan requested");
    match plan_meals(&state, &profile, duration).await {
        Ok(plan) => Ok(Json(plan)),
        Err(e) => {
            error!(kind = e.kind(), error = %e, "meal plan failed");
            Err(e)
        }
    }
}

fn require_profile(value: Option<&Value>, message: &str) -> Result<Profile, PipelineError> {
    match value {
        Some(v @ Value::Object(_)) => Ok(Profile::from_value(v)),
        _ => {
            warn!("missing user_profile");
            Err(PipelineError::Validation(message.into()))
        }
    }
}

fn reject_body(e: JsonRejection) -> PipelineError {
    warn!(error = %e, "rejected request body");
    PipelineError::Validation("Request body is required.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fakes::{fake_state, FakeNutrition, ScriptedGeneration};
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    async fn error_body(err: PipelineError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn plan_request(body: Value) -> Result<Json<PlanRequest>, JsonRejection> {
        Ok(Json(serde_json::from_value(body).unwrap()))
    }

    fn suggestion_request(body: Value) -> Result<Json<SuggestionRequest>, JsonRejection> {
        Ok(Json(serde_json::from_value(body).unwrap()))
    }

    fn meal(title: &str, ingredients: &[&str]) -> Value {
        json!({
            "title": title,
            "ingredients": ingredients,
            "instructions": ["Combine", "Serve"],
            "goal_justification": "Keeps calories in check."
        })
    }

    #[tokio::test]
    async fn bad_plan_duration_is_rejected_before_generation() {
        for days in [json!(2), json!(0), json!(7), json!("3"), json!(null)] {
            let (state, generation, _) = fake_state(
                ScriptedGeneration::replying("{}"),
                FakeNutrition::fixed(1.0, 1.0, 1.0, 1.0),
            );
            let err = meal_plan(
                State(state),
                plan_request(json!({
                    "user_profile": {"goal": "muscle_gain"},
                    "plan_duration_days": days,
                })),
            )
            .await
            .unwrap_err();

            let (status, body) = error_body(err).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "A 'plan_duration_days' field (1 or 3) is required.");
            assert!(generation.prompts().is_empty());
        }
    }

    #[tokio::test]
    async fn missing_profile_is_rejected() {
        let (state, generation, _) = fake_state(
            ScriptedGeneration::replying("{}"),
            FakeNutrition::fixed(1.0, 1.0, 1.0, 1.0),
        );
        let err = meal_suggestion(State(state), suggestion_request(json!({})))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert!(generation.prompts().is_empty());
    }

    #[tokio::test]
    async fn vegan_suggestion_end_to_end() {
        let reply = json!({
            "meal_option_a": meal("Tofu scramble", &["200 g firm tofu", "1 cup spinach"]),
            "meal_option_b": meal("Black bean tacos", &["1 can black beans", "4 corn tortillas"]),
        });
        let (state, generation, nutrition) = fake_state(
            ScriptedGeneration::replying(reply.to_string()),
            FakeNutrition::fixed(389.6, 21.2, 41.9, 14.4),
        );

        let Json(payload) = meal_suggestion(
            State(state),
            suggestion_request(json!({
                "user_profile": {
                    "dietary_preferences": "vegan",
                    "allergies": ["peanuts"],
                    "goal": "weight_loss"
                },
                "available_ingredients": ["spinach"]
            })),
        )
        .await
        .unwrap();

        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("error").is_none());
        for key in ["meal_option_a", "meal_option_b"] {
            assert_eq!(body[key]["nutritional_breakdown"]["calories"], json!(389.6));
            assert_eq!(body[key]["nutritional_breakdown"]["macros"]["fat_g"], json!(14.4));
        }
        assert_eq!(nutrition.calls().len(), 2);
        let prompt = &generation.prompts()[0];
        assert!(prompt.contains("- Must Avoid (Allergies): peanuts"));
        assert!(prompt.contains("available ingredients: spinach"));
    }

    #[tokio::test]
    async fn three_day_plan_with_missing_snack_succeeds() {
        let reply = json!({
            "plan_title": "3-Day Weight_Loss Plan",
            "days": [
                {"day": 1, "breakfast": meal("A", &["1 a"]), "lunch": meal("B", &["1 b"]),
                 "dinner": meal("C", &["1 c"]), "snack": meal("D", &["1 d"]),
                 "daily_goal_justification": "ok"},
                {"day": 2, "breakfast": meal("A", &["1 a"]), "lunch": meal("B", &["1 b"]),
                 "dinner": meal("C", &["1 c"]),
                 "daily_goal_justification": "ok"},
                {"day": 3, "breakfast": meal("A", &["1 a"]), "lunch": meal("B", &["1 b"]),
                 "dinner": meal("C", &["1 c"]), "snack": meal("D", &["1 d"]),
                 "daily_goal_justification": "ok"}
            ]
        });
        let (state, _, _) = fake_state(
            ScriptedGeneration::replying(reply.to_string()),
            FakeNutrition::fixed(500.0, 25.0, 60.0, 15.0),
        );

        let Json(plan) = meal_plan(
            State(state),
            plan_request(json!({
                "user_profile": {"dietary_preferences": "vegan", "goal": "weight_loss"},
                "plan_duration_days": 3
            })),
        )
        .await
        .unwrap();

        let body = serde_json::to_value(&plan).unwrap();
        assert_eq!(body["days"][0]["daily_nutritional_summary"]["calories"], 2000);
        assert_eq!(body["days"][1]["daily_nutritional_summary"]["calories"], 1500);
        assert_eq!(body["days"][1]["daily_nutritional_summary"]["macros"]["protein_g"], 75);
        assert!(body["days"][1].get("snack").is_none());
        assert_eq!(body["days"][2]["daily_nutritional_summary"]["macros"]["fat_g"], 60);
    }

    #[tokio::test]
    async fn unparseable_generation_returns_raw_text() {
        let raw = "```json\n{ oops this is not json";
        let (state, _, _) = fake_state(
            ScriptedGeneration::replying(raw),
            FakeNutrition::fixed(1.0, 1.0, 1.0, 1.0),
        );
        let err = meal_plan(
            State(state),
            plan_request(json!({"user_profile": {}, "plan_duration_days": 1})),
        )
        .await
        .unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "malformed_payload");
        assert_eq!(body["error"], "Failed to parse response from LLM.");
        assert_eq!(body["raw_response"], raw);
    }
}
