use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mechanic_assist::config::AppConfig;
use mechanic_assist::services::ai::gemini::GeminiProvider;
use mechanic_assist::services::notify::LogNotifier;
use mechanic_assist::services::payments::SimulatedGateway;
use mechanic_assist::services::store::memory::MemoryStore;
use mechanic_assist::services::store::postgrest::PostgrestStore;
use mechanic_assist::services::store::DataStore;
use mechanic_assist::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    anyhow::ensure!(!config.gemini_api_key.is_empty(), "GEMINI_API_KEY must be set");
    let llm = GeminiProvider::new(config.gemini_api_key.clone(), config.gemini_base_url.clone());
    tracing::info!("using Gemini provider (text model: {})", config.text_model);

    let store: Box<dyn DataStore> = if config.supabase_url.is_empty() {
        tracing::warn!("SUPABASE_URL not set, using an empty in-memory store");
        Box::new(MemoryStore::new())
    } else {
        anyhow::ensure!(
            !config.supabase_key.is_empty(),
            "SUPABASE_KEY or SUPABASE_ANON_KEY must be set when SUPABASE_URL is set"
        );
        tracing::info!("using data service at {}", config.supabase_url);
        Box::new(PostgrestStore::new(config.supabase_url.clone(), config.supabase_key.clone()))
    };

    if config.admin_token.is_empty() {
        tracing::warn!("ADMIN_TOKEN not set, /admin-ai is unauthenticated");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        llm: Box::new(llm),
        store,
        notifier: Box::new(LogNotifier),
        payments: Box::new(SimulatedGateway),
    });

    let app = mechanic_assist::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
