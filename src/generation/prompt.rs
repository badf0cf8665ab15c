//! Contract text sent to the generation service.
//!
//! The prompt spells out the exact JSON shape expected back. Nutrition fields are
//! explicitly excluded: they are computed after generation, never taken from it.

use crate::meals::dto::{PlanDuration, Profile};

const ASSISTANT_INTRO: &str = "You are a helpful nutrition planning assistant.";

#[derive(Debug, Clone, Copy)]
pub enum PromptMode<'a> {
    Suggestion { available_ingredients: &'a [String] },
    Plan(PlanDuration),
}

pub fn build_prompt(profile: &Profile, mode: PromptMode<'_>) -> String {
    match mode {
        PromptMode::Suggestion {
            available_ingredients,
        } => suggestion_prompt(profile, available_ingredients),
        PromptMode::Plan(duration) => plan_prompt(profile, duration),
    }
}

fn suggestion_prompt(profile: &Profile, available_ingredients: &[String]) -> String {
    let mut lines = vec![format!(
        "{ASSISTANT_INTRO} Generate two distinct and varied meal suggestions for a user with the following profile:"
    )];
    lines.extend(profile_lines(profile));
    if !available_ingredients.is_empty() {
        lines.push(format!(
            "- Try to use some of these available ingredients: {}",
            available_ingredients.join(", ")
        ));
    }
    lines.extend(allergy_constraint(profile));

    lines.push(String::new());
    lines.push("Respond with a JSON object only, with no text before or after it. The root object must have two keys:".into());
    lines.push("1. 'meal_option_a' (a meal object).".into());
    lines.push("2. 'meal_option_b' (a meal object).".into());

    lines.push(String::new());
    lines.extend(meal_object_lines("Each meal object"));

    lines.push(String::new());
    lines.push(
        "Do NOT include 'nutritional_breakdown' in any meal, as it will be calculated separately."
            .into(),
    );
    lines.join("\n")
}

fn plan_prompt(profile: &Profile, duration: PlanDuration) -> String {
    let days = duration.days();
    let mut lines = vec![format!(
        "{ASSISTANT_INTRO} Generate a {days}-day meal plan for a user with the following profile:"
    )];
    lines.extend(profile_lines(profile));
    lines.extend(allergy_constraint(profile));

    lines.push(String::new());
    lines.push("Respond with a JSON object only, with no text before or after it. The root object must have two keys:".into());
    lines.push(format!(
        "1. 'plan_title' (a creative title for the plan, e.g., '{days}-Day {} Plan').",
        title_case(&profile.goal)
    ));
    lines.push(format!(
        "2. 'days' (a list of exactly {days} day objects, in order)."
    ));

    lines.push(String::new());
    lines.push("Each day object in the 'days' list must have the following keys:".into());
    lines.push("1. 'day' (the day number, starting from 1).".into());
    lines.push("2. 'breakfast' (a meal object).".into());
    lines.push("3. 'lunch' (a meal object).".into());
    lines.push("4. 'dinner' (a meal object).".into());
    lines.push("5. 'snack' (a meal object).".into());
    lines.push("6. 'daily_goal_justification' (a brief string explaining how this day's meals support the user's goal).".into());

    lines.push(String::new());
    lines.extend(meal_object_lines(
        "Each meal object (breakfast, lunch, dinner, snack)",
    ));

    lines.push(String::new());
    lines.push("Do NOT include 'nutritional_breakdown' or 'daily_nutritional_summary', as they will be calculated separately.".into());
    lines.join("\n")
}

fn profile_lines(profile: &Profile) -> Vec<String> {
    let mut lines = vec![
        format!("- Dietary Preference: {}", profile.dietary_preferences),
        format!("- Health Goal: {}", profile.goal),
    ];
    if !profile.allergies.is_empty() {
        lines.push(format!(
            "- Must Avoid (Allergies): {}",
            profile.allergies.join(", ")
        ));
    }
    lines
}

fn allergy_constraint(profile: &Profile) -> Option<String> {
    if profile.allergies.is_empty() {
        return None;
    }
    Some(format!(
        "\nAllergies are a hard constraint: no meal may contain {}, or any ingredient derived from them.",
        profile.allergies.join(", ")
    ))
}

fn meal_object_lines(subject: &str) -> Vec<String> {
    vec![
        format!("{subject} must have these keys:"),
        "1. 'title' (a unique title for the meal).".into(),
        "2. 'ingredients' (a list of strings, each with a quantity, e.g. '2 cups spinach').".into(),
        "3. 'instructions' (a list of strings with step-by-step instructions).".into(),
        "4. 'goal_justification' (a brief string explaining how this specific meal supports the goal).".into(),
    ]
}

/// `weight_loss` -> `Weight_Loss`: every run of letters starts upper-case.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
