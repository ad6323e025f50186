use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vira::config::AppConfig;
use vira::handlers;
use vira::services::ai::gemini::GeminiProvider;
use vira::services::ai::ollama::OllamaProvider;
use vira::services::ai::LlmProvider;
use vira::services::backend::rest::RestBackend;
use vira::services::conversation::SessionDeps;
use vira::services::temporal::SystemClock;
use vira::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let llm: Arc<dyn LlmProvider> = match config.llm_provider.as_str() {
        "ollama" => {
            tracing::info!(
                "using Ollama LLM provider (url: {}, model: {})",
                config.ollama_url,
                config.ollama_model
            );
            Arc::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            ))
        }
        _ => {
            anyhow::ensure!(
                !config.gemini_api_key.is_empty(),
                "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini"
            );
            tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);
            Arc::new(GeminiProvider::new(
                config.gemini_api_base.clone(),
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            ))
        }
    };

    let backend = Arc::new(RestBackend::new(config.backend_url.clone()));
    tracing::info!("appointment backend at {}", config.backend_url);

    let deps = SessionDeps {
        llm,
        directory: backend.clone(),
        appointments: backend,
        clock: Arc::new(SystemClock),
        profile: Arc::new(config.assistant_profile.clone()),
        params: config.generation,
    };
    let state = Arc::new(AppState::new(config.clone(), deps));

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
