use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health, podcast::PodcastController, project::ProjectController,
    synthesis::SynthesisController, voices,
};
use crate::infrastructure::config::Config;

/// Assemble the full application router. Split out from the server start
/// so tests can drive the same routes in-process.
pub fn build_router(
    config: Arc<Config>,
    project_controller: Arc<ProjectController>,
    synthesis_controller: Arc<SynthesisController>,
    podcast_controller: Arc<PodcastController>,
) -> Router {
    let voice_routes = Router::new()
        .route("/api/voices", get(voices::list_voices))
        .route("/api/voices/dialects", get(voices::list_dialects));

    let project_routes = Router::new()
        .route(
            "/api/projects",
            get(ProjectController::list_projects).post(ProjectController::create_project),
        )
        .route(
            "/api/projects/:projectId",
            get(ProjectController::get_project).patch(ProjectController::update_project),
        )
        .route(
            "/api/projects/:projectId/advance",
            post(ProjectController::advance_stage),
        )
        .route(
            "/api/projects/:projectId/reset",
            post(ProjectController::reset_project),
        )
        .route(
            "/api/projects/:projectId/script/enhance",
            post(ProjectController::enhance_script),
        )
        .route(
            "/api/projects/:projectId/segments",
            post(ProjectController::insert_segment),
        )
        .route(
            "/api/projects/:projectId/segments/split",
            post(ProjectController::split_into_paragraphs),
        )
        .route(
            "/api/projects/:projectId/segments/:segmentId",
            axum::routing::patch(ProjectController::update_segment)
                .delete(ProjectController::remove_segment),
        )
        .route(
            "/api/projects/:projectId/segments/:segmentId/merge-next",
            post(ProjectController::merge_segment_with_next),
        )
        .route(
            "/api/projects/:projectId/distribute",
            post(ProjectController::auto_distribute),
        )
        .with_state(project_controller);

    let synthesis_routes = Router::new()
        .route(
            "/api/projects/:projectId/segments/:segmentId/pilot",
            post(SynthesisController::generate_pilot),
        )
        .route(
            "/api/projects/:projectId/master",
            post(SynthesisController::produce_master),
        )
        .route(
            "/api/projects/:projectId/progress",
            get(SynthesisController::get_progress),
        )
        .route(
            "/api/artifacts/:artifactId",
            get(SynthesisController::get_artifact),
        )
        .with_state(synthesis_controller);

    let podcast_routes = Router::new()
        .route("/api/podcasts", post(PodcastController::create_session))
        .route(
            "/api/podcasts/:sessionId",
            get(PodcastController::get_session),
        )
        .route(
            "/api/podcasts/:sessionId/script",
            post(PodcastController::generate_script),
        )
        .route(
            "/api/podcasts/:sessionId/speakers",
            post(PodcastController::add_speaker),
        )
        .route(
            "/api/podcasts/:sessionId/distribution/mode",
            put(PodcastController::set_distribution_mode),
        )
        .route(
            "/api/podcasts/:sessionId/distribution/assignments",
            put(PodcastController::assign_voice),
        )
        .route(
            "/api/podcasts/:sessionId/produce",
            post(PodcastController::produce),
        )
        .route(
            "/api/podcasts/:sessionId/progress",
            get(PodcastController::get_progress),
        )
        .with_state(podcast_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config)
        .merge(voice_routes)
        .merge(project_routes)
        .merge(synthesis_routes)
        .merge(podcast_routes)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    project_controller: Arc<ProjectController>,
    synthesis_controller: Arc<SynthesisController>,
    podcast_controller: Arc<PodcastController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(
        config.clone(),
        project_controller,
        synthesis_controller,
        podcast_controller,
    );

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
