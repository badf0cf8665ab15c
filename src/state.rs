use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::generation::client::{GenerationGateway, OpenAiGateway};
use crate::nutrition::client::{HttpNutritionLookup, NutritionLookup};

/// Collaborators shared by every request. Request data itself is never stored here.
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<dyn GenerationGateway>,
    pub nutrition: Arc<dyn NutritionLookup>,
}

impl AppState {
    pub fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let generation =
            Arc::new(OpenAiGateway::new(&config.generation, timeout)?) as Arc<dyn GenerationGateway>;
        let nutrition = Arc::new(HttpNutritionLookup::new(&config.nutrition, timeout)?)
            as Arc<dyn NutritionLookup>;

        Ok(Self::from_parts(generation, nutrition))
    }

    pub fn from_parts(
        generation: Arc<dyn GenerationGateway>,
        nutrition: Arc<dyn NutritionLookup>,
    ) -> Self {
        Self {
            generation,
            nutrition,
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::AppState;
    use crate::generation::client::GenerationGateway;
    use crate::nutrition::client::NutritionLookup;
    use crate::nutrition::dto::{Macros, NutritionBreakdown};

    /// Replies with a canned answer and remembers every prompt.
    pub struct ScriptedGeneration {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGeneration {
        pub fn replying(reply: impl Into<String>) -> Self {
            Self {
                reply: Ok(reply.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn unreachable(message: impl Into<String>) -> Self {
            Self {
                reply: Err(message.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationGateway for ScriptedGeneration {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(msg) => Err(anyhow::anyhow!(msg.clone())),
            }
        }
    }

    /// Returns the same breakdown for every meal; can be told to fail on one ingredient.
    pub struct FakeNutrition {
        breakdown: NutritionBreakdown,
        fail_on: Option<String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeNutrition {
        pub fn fixed(calories: f64, protein_g: f64, carbohydrates_g: f64, fat_g: f64) -> Self {
            Self {
                breakdown: NutritionBreakdown {
                    calories,
                    macros: Macros {
                        protein_g,
                        carbohydrates_g,
                        fat_g,
                    },
                },
                fail_on: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_on(mut self, ingredient: &str) -> Self {
            self.fail_on = Some(ingredient.to_string());
            self
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NutritionLookup for FakeNutrition {
        async fn lookup(&self, ingredients: &[String]) -> anyhow::Result<NutritionBreakdown> {
            self.calls.lock().unwrap().push(ingredients.to_vec());
            if let Some(bad) = &self.fail_on {
                if ingredients.iter().any(|i| i == bad) {
                    anyhow::bail!("unknown ingredient: {bad}");
                }
            }
            Ok(self.breakdown)
        }
    }

    pub fn fake_state(
        generation: ScriptedGeneration,
        nutrition: FakeNutrition,
    ) -> (AppState, Arc<ScriptedGeneration>, Arc<FakeNutrition>) {
        let generation = Arc::new(generation);
        let nutrition = Arc::new(nutrition);
        let state = AppState::from_parts(generation.clone(), nutrition.clone());
        (state, generation, nutrition)
    }
}
