use crate::error::PipelineError;
use crate::meals::dto::{Day, MealSlot};
use crate::nutrition::dto::{DailyMacros, DailySummary, NutritionBreakdown};

#[derive(Debug, Default)]
struct Totals {
    calories: f64,
    protein_g: f64,
    carbohydrates_g: f64,
    fat_g: f64,
}

impl Totals {
    fn add(&mut self, b: &NutritionBreakdown) {
        self.calories += b.calories;
        self.protein_g += b.macros.protein_g;
        self.carbohydrates_g += b.macros.carbohydrates_g;
        self.fat_g += b.macros.fat_g;
    }

    // The only place values are cut to integers: after every meal has been added.
    fn into_summary(self) -> DailySummary {
        DailySummary {
            calories: whole(self.calories),
            macros: DailyMacros {
                protein_g: whole(self.protein_g),
                carbohydrates_g: whole(self.carbohydrates_g),
                fat_g: whole(self.fat_g),
            },
        }
    }
}

fn whole(v: f64) -> i64 {
    v.trunc() as i64
}

/// Sums the breakdowns of the meals present in `day`. Absent slots contribute
/// nothing; a present slot that was never enriched is an error.
pub fn summarize_day(day: &Day) -> Result<DailySummary, PipelineError> {
    let mut totals = Totals::default();
    for slot in MealSlot::ALL {
        let Some(meal) = day.meal(slot) else {
            continue;
        };
        let breakdown = meal.nutritional_breakdown.as_ref().ok_or_else(|| {
            PipelineError::IncompleteMealData(format!("{slot} has no nutritional breakdown"))
        })?;
        totals.add(breakdown);
    }
    Ok(totals.into_summary())
}
