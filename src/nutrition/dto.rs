use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbohydrates_g: f64,
    pub fat_g: f64,
}

/// Calories and macros of one meal, as reported by the nutrition lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionBreakdown {
    pub calories: f64,
    pub macros: Macros,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMacros {
    pub protein_g: i64,
    pub carbohydrates_g: i64,
    pub fat_g: i64,
}

/// Whole-number totals for a day. Only ever produced by `aggregate::summarize_day`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub calories: i64,
    pub macros: DailyMacros,
}
