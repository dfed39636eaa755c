use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::podcast::{
        AddSpeakerRequest, AssignVoiceRequest, CreateSessionRequest, GenerateScriptRequest,
        PodcastService, PodcastServiceApi, PodcastSession, SetDistributionModeRequest,
    },
    error::{AppError, AppResult},
};

use super::synthesis::{MasterResponse, ProgressResponse, SynthesisRequest};

pub struct PodcastController {
    podcast_service: Arc<PodcastService>,
}

impl PodcastController {
    pub fn new(podcast_service: Arc<PodcastService>) -> Self {
        Self { podcast_service }
    }

    /// POST /api/podcasts - open a new session
    pub async fn create_session(
        State(controller): State<Arc<PodcastController>>,
        Json(request): Json<CreateSessionRequest>,
    ) -> AppResult<(StatusCode, Json<PodcastSession>)> {
        let session = controller
            .podcast_service
            .create_session(request)
            .await
            .map_err(AppError::from)?;
        Ok((StatusCode::CREATED, Json(session)))
    }

    /// GET /api/podcasts/:sessionId
    pub async fn get_session(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<PodcastSession>> {
        let session = controller
            .podcast_service
            .get_session(session_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(session))
    }

    /// POST /api/podcasts/:sessionId/script - analyze content into turns
    pub async fn generate_script(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<GenerateScriptRequest>,
    ) -> AppResult<Json<PodcastSession>> {
        let session = controller
            .podcast_service
            .generate_script(session_id, request.content)
            .await
            .map_err(AppError::from)?;
        Ok(Json(session))
    }

    /// POST /api/podcasts/:sessionId/speakers - declare a speaker manually
    pub async fn add_speaker(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<AddSpeakerRequest>,
    ) -> AppResult<Json<PodcastSession>> {
        let session = controller
            .podcast_service
            .add_speaker(session_id, request)
            .await
            .map_err(AppError::from)?;
        Ok(Json(session))
    }

    /// PUT /api/podcasts/:sessionId/distribution/mode
    pub async fn set_distribution_mode(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<SetDistributionModeRequest>,
    ) -> AppResult<Json<PodcastSession>> {
        let session = controller
            .podcast_service
            .set_distribution_mode(session_id, request.mode)
            .await
            .map_err(AppError::from)?;
        Ok(Json(session))
    }

    /// PUT /api/podcasts/:sessionId/distribution/assignments
    pub async fn assign_voice(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<AssignVoiceRequest>,
    ) -> AppResult<Json<PodcastSession>> {
        let session = controller
            .podcast_service
            .assign_voice(session_id, request.speaker_id, request.voice_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(session))
    }

    /// POST /api/podcasts/:sessionId/produce - batch-produce the master
    pub async fn produce(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<Json<MasterResponse>> {
        let artifact_id = controller
            .podcast_service
            .produce(session_id, request.controls)
            .await
            .map_err(AppError::from)?;
        Ok(Json(MasterResponse {
            artifact_id,
            progress: controller.podcast_service.progress_of(session_id),
        }))
    }

    /// GET /api/podcasts/:sessionId/progress
    pub async fn get_progress(
        State(controller): State<Arc<PodcastController>>,
        Path(session_id): Path<Uuid>,
    ) -> Json<ProgressResponse> {
        Json(ProgressResponse {
            progress: controller.podcast_service.progress_of(session_id),
        })
    }
}
