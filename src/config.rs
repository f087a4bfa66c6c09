use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Process-wide settings. Built once in `main` and handed to constructors;
/// nothing reads the environment after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_fallback_model: String,
    pub openai_temperature: f32,
    pub openai_max_tokens: u32,
    pub openai_reasoning_max_tokens: u32,
    pub openai_reasoning_effort: String,
    pub openai_timeout: Duration,
    pub session_ttl: Duration,
    pub max_upload_bytes: usize,
    pub max_image_dimension: u32,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub log_dir: PathBuf,
    /// Problems found while loading, logged once logging is up.
    pub load_warnings: Vec<String>,
}

const MAX_SESSION_TTL_MINUTES: u64 = 7 * 24 * 60;

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<f32>().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn normalize_reasoning_effort(value: &str, warnings: &mut Vec<String>) -> String {
    let lowered = value.trim().to_lowercase();
    match lowered.as_str() {
        "minimal" | "low" | "medium" | "high" => lowered,
        "" => "minimal".to_string(),
        _ => {
            warnings.push(format!(
                "Unknown OPENAI_REASONING_EFFORT value '{value}'; defaulting to minimal."
            ));
            "minimal".to_string()
        }
    }
}

fn session_ttl_from_minutes(minutes: u64, warnings: &mut Vec<String>) -> Duration {
    if minutes > MAX_SESSION_TTL_MINUTES {
        warnings.push(format!(
            "SESSION_TTL_MINUTES={minutes} is above the {MAX_SESSION_TTL_MINUTES} minute cap; using the cap."
        ));
    }
    Duration::from_secs(minutes.clamp(1, MAX_SESSION_TTL_MINUTES) * 60)
}

impl Config {
    pub fn load() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        if openai_api_key.trim().is_empty() {
            return Err(anyhow!("OPENAI_API_KEY is required"));
        }

        let bind_addr_raw = env_string("BIND_ADDR", "0.0.0.0:8000");
        let bind_addr = bind_addr_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| anyhow!("Invalid BIND_ADDR value '{bind_addr_raw}': {err}"))?;

        let openai_model = env_string("OPENAI_MODEL", "gpt-4o-mini").trim().to_string();
        let openai_fallback_model = env_string("OPENAI_FALLBACK_MODEL", "gpt-4o-mini")
            .trim()
            .to_string();
        if openai_model.is_empty() || openai_fallback_model.is_empty() {
            return Err(anyhow!(
                "OPENAI_MODEL and OPENAI_FALLBACK_MODEL must not be empty"
            ));
        }

        let mut load_warnings = Vec::new();
        let openai_reasoning_effort = normalize_reasoning_effort(
            &env_string("OPENAI_REASONING_EFFORT", "minimal"),
            &mut load_warnings,
        );
        let session_ttl =
            session_ttl_from_minutes(env_u64("SESSION_TTL_MINUTES", 30), &mut load_warnings);

        Ok(Config {
            openai_api_key,
            openai_base_url: env_string("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model,
            openai_fallback_model,
            openai_temperature: env_f32("OPENAI_TEMPERATURE", 0.4),
            openai_max_tokens: env_u32("OPENAI_MAX_TOKENS", 4000).max(1),
            openai_reasoning_max_tokens: env_u32("OPENAI_REASONING_MAX_TOKENS", 16000).max(1),
            openai_reasoning_effort,
            openai_timeout: Duration::from_secs(env_u64("OPENAI_TIMEOUT_SECONDS", 120).max(1)),
            session_ttl,
            max_upload_bytes: env_usize("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            max_image_dimension: env_u32("MAX_IMAGE_DIMENSION", 2048).max(64),
            bind_addr,
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            log_dir: PathBuf::from(env_string("LOG_DIR", "logs")),
            load_warnings,
        })
    }

    /// Settings used by unit tests; never touches the environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_base_url: "http://127.0.0.1:9/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_fallback_model: "gpt-4o-mini".to_string(),
            openai_temperature: 0.4,
            openai_max_tokens: 4000,
            openai_reasoning_max_tokens: 16000,
            openai_reasoning_effort: "minimal".to_string(),
            openai_timeout: Duration::from_secs(5),
            session_ttl: Duration::from_secs(30 * 60),
            max_upload_bytes: 10 * 1024 * 1024,
            max_image_dimension: 2048,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            load_warnings: Vec::new(),
        }
    }
}
