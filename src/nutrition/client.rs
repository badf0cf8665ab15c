use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::NutritionConfig;
use crate::nutrition::dto::NutritionBreakdown;

/// Maps an ordered ingredient list ("2 cups spinach", ...) to one breakdown.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup(&self, ingredients: &[String]) -> anyhow::Result<NutritionBreakdown>;
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    ingredients: &'a [String],
}

/// Nutrition service reached over HTTP: `POST {base_url}/nutrition`.
pub struct HttpNutritionLookup {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpNutritionLookup {
    pub fn new(config: &NutritionConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("build nutrition http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/nutrition", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl NutritionLookup for HttpNutritionLookup {
    async fn lookup(&self, ingredients: &[String]) -> anyhow::Result<NutritionBreakdown> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&LookupRequest { ingredients });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await.context("nutrition lookup request")?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("nutrition service returned {status}: {text}");
        }

        let breakdown: NutritionBreakdown = res
            .json()
            .await
            .context("decode nutrition lookup response")?;
        debug!(
            ingredients = ingredients.len(),
            calories = breakdown.calories,
            "nutrition looked up"
        );
        Ok(breakdown)
    }
}
