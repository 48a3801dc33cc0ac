use crate::error::ConfigError;
use crate::model::gemini::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::model::GenerationParams;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Parser, Debug, Clone)]
#[command(name = "latent-jokes", version, about = "AI joke generator web UI")]
pub struct Config {
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    #[arg(long, env, default_value = DEFAULT_MODEL)]
    pub gemini_model: String,
    #[arg(long, env, default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,
    #[arg(long, env = "BIND_HOST", default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, env, default_value_t = 7860)]
    pub port: u16,
    /// Listen on all interfaces instead of loopback only
    #[arg(long, env, default_value_t = false)]
    pub share: bool,
    #[arg(long, env, default_value_t = 1.2)]
    pub temperature: f32,
    #[arg(long, env, default_value_t = 0.9)]
    pub top_p: f32,
    #[arg(long, env, default_value_t = 100)]
    pub max_output_tokens: u32,
    #[arg(long, env, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn gemini(&self) -> Result<GeminiConfig, ConfigError> {
        let api_key = self
            .gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey { var: API_KEY_VAR })?;

        Ok(GeminiConfig {
            api_key: api_key.to_string(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.trim_end_matches('/').to_string(),
            timeout: self.request_timeout(),
        })
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = if self.share { "0.0.0.0" } else { self.host.as_str() };
        let addr = format!("{host}:{}", self.port);
        addr.parse()
            .map_err(|source| ConfigError::BindAddr { addr, source })
    }
}
