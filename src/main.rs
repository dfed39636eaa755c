use std::sync::Arc;
use rawi_studio_backend::infrastructure::config::{Config, LogFormat};
use rawi_studio_backend::infrastructure::http::start_http_server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Rawi Studio Backend on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);
    let http_client = reqwest::Client::new();

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (in-memory stores + provider clients)
    tracing::info!("Instantiating repositories...");
    let project_repo = Arc::new(rawi_studio_backend::infrastructure::repositories::ProjectRepository::new());
    let session_repo = Arc::new(rawi_studio_backend::infrastructure::repositories::SessionRepository::new());
    let artifact_repo = Arc::new(rawi_studio_backend::infrastructure::repositories::ArtifactRepository::new());
    let speech_repo = Arc::new(rawi_studio_backend::infrastructure::repositories::GeminiSpeechRepository::new(
        http_client.clone(),
        config.gemini_api_base.clone(),
        config.gemini_api_key.clone(),
        config.speech_model.clone(),
    ));
    let script_repo = Arc::new(rawi_studio_backend::infrastructure::repositories::GeminiScriptRepository::new(
        http_client,
        config.gemini_api_base.clone(),
        config.gemini_api_key.clone(),
        config.text_model.clone(),
    ));

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let synthesis_service = Arc::new(rawi_studio_backend::domain::synthesis::SynthesisService::new(
        speech_repo,
        config.pilot_cache_enabled,
    ));
    let project_service = Arc::new(rawi_studio_backend::domain::project::ProjectService::new(
        project_repo.clone(),
        script_repo.clone(),
    ));
    let production_service = Arc::new(rawi_studio_backend::domain::synthesis::ProductionService::new(
        project_repo,
        artifact_repo.clone(),
        synthesis_service.clone(),
    ));
    let podcast_service = Arc::new(rawi_studio_backend::domain::podcast::PodcastService::new(
        session_repo,
        artifact_repo.clone(),
        script_repo,
        synthesis_service,
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let project_controller = Arc::new(rawi_studio_backend::controllers::project::ProjectController::new(project_service));
    let synthesis_controller = Arc::new(rawi_studio_backend::controllers::synthesis::SynthesisController::new(
        production_service,
        artifact_repo,
    ));
    let podcast_controller = Arc::new(rawi_studio_backend::controllers::podcast::PodcastController::new(podcast_service));

    // Start HTTP server with all routes
    start_http_server(config, project_controller, synthesis_controller, podcast_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "rawi_studio_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "rawi_studio_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
