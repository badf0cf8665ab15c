use futures::future::join_all;
use tracing::debug;

use crate::error::PipelineError;
use crate::meals::dto::Meal;
use crate::nutrition::client::NutritionLookup;

/// Attaches nutrition breakdowns to meals via a [`NutritionLookup`].
pub struct MealEnricher<'a> {
    lookup: &'a dyn NutritionLookup,
}

impl<'a> MealEnricher<'a> {
    pub fn new(lookup: &'a dyn NutritionLookup) -> Self {
        Self { lookup }
    }

    /// A meal that already carries a breakdown is returned untouched.
    pub async fn enrich<'m>(
        &self,
        label: &str,
        meal: &'m mut Meal,
    ) -> Result<&'m mut Meal, PipelineError> {
        if meal.nutritional_breakdown.is_some() {
            debug!(meal = label, "already enriched");
            return Ok(meal);
        }
        let ingredients = meal.ingredients().ok_or_else(|| {
            PipelineError::IncompleteMealData(format!("{label} has no 'ingredients' list"))
        })?;

        let breakdown = self.lookup.lookup(&ingredients).await.map_err(|source| {
            PipelineError::NutritionLookupFailed {
                meal: label.to_string(),
                source,
            }
        })?;
        meal.nutritional_breakdown = Some(breakdown);
        Ok(meal)
    }

    /// Enriches the meals concurrently and waits for all of them. When several
    /// fail, the error of the earliest meal in `meals` is returned, so the
    /// outcome does not depend on which lookup finished first.
    pub async fn enrich_all<'m, I>(&self, meals: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = (String, &'m mut Meal)>,
    {
        let pending = meals.into_iter().map(|(label, meal)| async move {
            self.enrich(&label, meal).await.map(|_| ())
        });
        join_all(pending).await.into_iter().collect()
    }
}
