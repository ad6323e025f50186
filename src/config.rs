use std::env;
use std::str::FromStr;

use anyhow::Context;

use crate::models::AssistantProfile;
use crate::services::ai::GenerationParams;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub jwt_secret: String,
    pub llm_provider: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub generation: GenerationParams,
    pub assistant_profile: AssistantProfile,
    pub session_ttl_minutes: i64,
    pub appointment_duration_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = GenerationParams::default();

        let assistant_profile = match env::var("ASSISTANT_PROFILE") {
            Ok(raw) if !raw.trim().is_empty() => {
                AssistantProfile::from_json(&raw).context("ASSISTANT_PROFILE is not valid JSON")?
            }
            _ => AssistantProfile::default(),
        };

        Ok(Self {
            port: parsed("PORT", 8002),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            jwt_secret: env::var("JWT_SECRET_KEY")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            llm_provider: env::var("LLM_PROVIDER")
                .map(|v| v.to_ascii_lowercase())
                .unwrap_or_else(|_| "gemini".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            gemini_api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
            generation: GenerationParams {
                temperature: parsed("LLM_TEMPERATURE", defaults.temperature),
                top_k: parsed("LLM_TOP_K", defaults.top_k),
                top_p: parsed("LLM_TOP_P", defaults.top_p),
                max_output_tokens: parsed("LLM_MAX_OUTPUT_TOKENS", defaults.max_output_tokens),
            },
            assistant_profile,
            session_ttl_minutes: parsed("SESSION_TTL_MINUTES", 30),
            appointment_duration_minutes: parsed("APPOINTMENT_DURATION_MINUTES", 30),
        })
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
