use serde_json::Value;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::meals::dto::{Day, Plan};
use crate::nutrition::aggregate::summarize_day;
use crate::nutrition::client::NutritionLookup;
use crate::nutrition::enrich::MealEnricher;

/// Enriches every meal of every day and attaches each day's summary.
///
/// Days are handled one after another in the order given; the meals of a single
/// day are looked up concurrently. The first failure stops assembly and is
/// returned wrapped together with the plan as enriched so far.
pub async fn assemble_plan(
    lookup: &dyn NutritionLookup,
    mut plan: Plan,
) -> Result<Plan, PipelineError> {
    let enricher = MealEnricher::new(lookup);

    for position in 0..plan.days.len() {
        let outcome = enrich_day(&enricher, &mut plan.days[position], position).await;
        if let Err(err) = outcome {
            warn!(day = position + 1, error = %err, "plan enrichment stopped");
            let partial = serde_json::to_value(&plan).unwrap_or_else(|e| {
                warn!(error = %e, "could not serialize partial plan");
                Value::Null
            });
            return Err(PipelineError::PlanEnrichmentFailed {
                source: Box::new(err),
                partial,
            });
        }
    }
    Ok(plan)
}

async fn enrich_day(
    enricher: &MealEnricher<'_>,
    day: &mut Day,
    position: usize,
) -> Result<(), PipelineError> {
    let number = day.number().map_or(position + 1, |n| n as usize);
    let meals = day
        .meals_mut()
        .map(|(slot, meal)| (format!("day {number} {slot}"), meal))
        .collect::<Vec<_>>();
    enricher.enrich_all(meals).await?;

    let summary = summarize_day(day)?;
    debug!(day = number, calories = summary.calories, "day summarized");
    day.daily_nutritional_summary = Some(summary);
    Ok(())
}
