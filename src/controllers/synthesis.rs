use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::synthesis::{ProductionService, VoiceControls},
    error::{AppError, AppResult},
    infrastructure::repositories::ArtifactRepository,
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SynthesisRequest {
    #[serde(default)]
    pub controls: VoiceControls,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PilotResponse {
    pub artifact_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasterResponse {
    pub artifact_id: Uuid,
    pub progress: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub progress: u8,
}

pub struct SynthesisController {
    production: Arc<ProductionService>,
    artifact_repo: Arc<ArtifactRepository>,
}

impl SynthesisController {
    pub fn new(production: Arc<ProductionService>, artifact_repo: Arc<ArtifactRepository>) -> Self {
        Self {
            production,
            artifact_repo,
        }
    }

    /// POST /api/projects/:projectId/segments/:segmentId/pilot
    pub async fn generate_pilot(
        State(controller): State<Arc<SynthesisController>>,
        Path((project_id, segment_id)): Path<(Uuid, u32)>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<Json<PilotResponse>> {
        let artifact_id = controller
            .production
            .produce_pilot(project_id, segment_id, request.controls)
            .await
            .map_err(AppError::from)?;
        Ok(Json(PilotResponse { artifact_id }))
    }

    /// POST /api/projects/:projectId/master - full batch production
    pub async fn produce_master(
        State(controller): State<Arc<SynthesisController>>,
        Path(project_id): Path<Uuid>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<Json<MasterResponse>> {
        let artifact_id = controller
            .production
            .produce_master(project_id, request.controls)
            .await
            .map_err(AppError::from)?;
        Ok(Json(MasterResponse {
            artifact_id,
            progress: controller.production.progress_of(project_id),
        }))
    }

    /// GET /api/projects/:projectId/progress
    pub async fn get_progress(
        State(controller): State<Arc<SynthesisController>>,
        Path(project_id): Path<Uuid>,
    ) -> Json<ProgressResponse> {
        Json(ProgressResponse {
            progress: controller.production.progress_of(project_id),
        })
    }

    /// GET /api/artifacts/:artifactId - serve a finished WAV
    pub async fn get_artifact(
        State(controller): State<Arc<SynthesisController>>,
        Path(artifact_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let artifact = controller
            .artifact_repo
            .find(artifact_id)
            .ok_or_else(|| AppError::NotFound("artifact".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, artifact.content_type.parse().unwrap());
        headers.insert(
            header::CONTENT_LENGTH,
            artifact.data.len().to_string().parse().unwrap(),
        );

        Ok((StatusCode::OK, headers, Body::from(artifact.data)))
    }
}
