use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct NutritionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub nutrition: NutritionConfig,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
        };
        let generation = GenerationConfig {
            base_url: std::env::var("GENERATION_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("GENERATION_API_KEY").context("GENERATION_API_KEY is not set")?,
            model: std::env::var("GENERATION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            temperature: std::env::var("GENERATION_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(0.7),
        };
        let nutrition = NutritionConfig {
            base_url: std::env::var("NUTRITION_BASE_URL").context("NUTRITION_BASE_URL is not set")?,
            api_key: std::env::var("NUTRITION_API_KEY").ok().filter(|v| !v.is_empty()),
        };
        let http_timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);
        Ok(Self {
            server,
            generation,
            nutrition,
            http_timeout_secs,
        })
    }
}
