use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::nutrition::dto::{DailySummary, NutritionBreakdown};

const DEFAULT_DIET: &str = "any";
const DEFAULT_GOAL: &str = "general_health";

/// Who the meals are for. Built leniently from the request: anything missing or
/// of the wrong type falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub dietary_preferences: String,
    pub allergies: Vec<String>,
    pub goal: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            dietary_preferences: DEFAULT_DIET.into(),
            allergies: Vec::new(),
            goal: DEFAULT_GOAL.into(),
        }
    }
}

impl Profile {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            dietary_preferences: text("dietary_preferences", DEFAULT_DIET),
            allergies: string_list(value.get("allergies")),
            goal: text("goal", DEFAULT_GOAL),
        }
    }
}

/// Reads a list of strings, skipping non-string entries. A bare string counts as
/// a one-element list.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDuration {
    OneDay,
    ThreeDays,
}

impl PlanDuration {
    pub fn days(self) -> u32 {
        match self {
            PlanDuration::OneDay => 1,
            PlanDuration::ThreeDays => 3,
        }
    }

    /// Only integral JSON numbers are accepted; `"3"` or `3.5` are not durations.
    pub fn from_json(value: Option<&Value>) -> Option<Self> {
        value
            .and_then(Value::as_u64)
            .and_then(|n| Self::try_from(n).ok())
    }
}

impl TryFrom<u64> for PlanDuration {
    type Error = u64;

    fn try_from(days: u64) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(PlanDuration::OneDay),
            3 => Ok(PlanDuration::ThreeDays),
            other => Err(other),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub user_profile: Option<Value>,
    #[serde(default)]
    pub available_ingredients: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub user_profile: Option<Value>,
    pub plan_duration_days: Option<Value>,
}

const BREAKDOWN_KEY: &str = "nutritional_breakdown";
const SUMMARY_KEY: &str = "daily_nutritional_summary";

/// A generated meal. Only `ingredients` is ever read; every other key the
/// generator sent stays in `fields` and is returned as it came.
/// `nutritional_breakdown` is never taken from the generator, it only appears
/// once the meal has been enriched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Meal {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_breakdown: Option<NutritionBreakdown>,
}

impl From<Map<String, Value>> for Meal {
    fn from(mut fields: Map<String, Value>) -> Self {
        fields.remove(BREAKDOWN_KEY);
        Self {
            fields,
            nutritional_breakdown: None,
        }
    }
}

impl Meal {
    /// The ingredient list, if the generator sent one as a list of strings.
    pub fn ingredients(&self) -> Option<Vec<String>> {
        let items = self.fields.get("ingredients")?.as_array()?;
        items
            .iter()
            .map(|item| item.as_str().map(String::from))
            .collect()
    }

    /// `{}` in a slot means there is no meal there.
    pub fn is_blank(&self) -> bool {
        self.fields.is_empty() && self.nutritional_breakdown.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Canonical processing order within a day.
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DayFields")]
pub struct Day {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<Meal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Meal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Meal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snack: Option<Meal>,
    /// `day`, `daily_goal_justification` and anything else the generator added.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_nutritional_summary: Option<DailySummary>,
}

#[derive(Deserialize)]
struct DayFields {
    #[serde(default)]
    breakfast: Option<Meal>,
    #[serde(default)]
    lunch: Option<Meal>,
    #[serde(default)]
    dinner: Option<Meal>,
    #[serde(default)]
    snack: Option<Meal>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<DayFields> for Day {
    fn from(raw: DayFields) -> Self {
        let DayFields {
            breakfast,
            lunch,
            dinner,
            snack,
            mut fields,
        } = raw;
        fields.remove(SUMMARY_KEY);
        Self {
            breakfast,
            lunch,
            dinner,
            snack,
            fields,
            daily_nutritional_summary: None,
        }
    }
}

impl Day {
    /// The day index as sent by the generator; `"2"` is read as 2.
    pub fn number(&self) -> Option<u64> {
        match self.fields.get("day")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn meal(&self, slot: MealSlot) -> Option<&Meal> {
        let meal = match slot {
            MealSlot::Breakfast => self.breakfast.as_ref(),
            MealSlot::Lunch => self.lunch.as_ref(),
            MealSlot::Dinner => self.dinner.as_ref(),
            MealSlot::Snack => self.snack.as_ref(),
        };
        meal.filter(|m| !m.is_blank())
    }

    /// Present meals in canonical slot order.
    pub fn meals_mut(&mut self) -> impl Iterator<Item = (MealSlot, &mut Meal)> + '_ {
        let Day {
            breakfast,
            lunch,
            dinner,
            snack,
            ..
        } = self;
        [
            (MealSlot::Breakfast, breakfast),
            (MealSlot::Lunch, lunch),
            (MealSlot::Dinner, dinner),
            (MealSlot::Snack, snack),
        ]
        .into_iter()
        .filter_map(|(slot, meal)| meal.as_mut().map(|meal| (slot, meal)))
        .filter(|(_, meal)| !meal.is_blank())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Plan {
    pub fn title(&self) -> Option<&str> {
        self.fields.get("plan_title").and_then(Value::as_str)
    }
}

/// The two-meal answer of suggestion mode. Absent options stay `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionPayload {
    #[serde(default)]
    pub meal_option_a: Option<Meal>,
    #[serde(default)]
    pub meal_option_b: Option<Meal>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SuggestionPayload {
    pub fn meals_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut Meal)> + '_ {
        [
            ("meal_option_a", self.meal_option_a.as_mut()),
            ("meal_option_b", self.meal_option_b.as_mut()),
        ]
        .into_iter()
        .filter_map(|(label, meal)| meal.filter(|m| !m.is_blank()).map(|meal| (label, meal)))
    }
}
