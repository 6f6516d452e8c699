use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub llm_api_url: String,
    pub host: String,
    pub port: u16,
    pub answers_file: PathBuf,
    pub debug: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let debug = std::env::var("APP_DEBUG")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        let default_level = if debug { "debug" } else { "info" };

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            llm_api_url: std::env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            answers_file: std::env::var("ANSWERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("answers.json")),
            debug,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
