use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::project::{
        AdvanceStageRequest, CreateProjectRequest, InsertSegmentRequest, ProjectResponse,
        ProjectService, ProjectServiceApi, UpdateProjectRequest, UpdateSegmentRequest,
    },
    error::{AppError, AppResult},
};

pub struct ProjectController {
    project_service: Arc<ProjectService>,
}

impl ProjectController {
    pub fn new(project_service: Arc<ProjectService>) -> Self {
        Self { project_service }
    }

    /// POST /api/projects - create a fresh draft project
    pub async fn create_project(
        State(controller): State<Arc<ProjectController>>,
        Json(request): Json<CreateProjectRequest>,
    ) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
        let project = controller
            .project_service
            .create_project(request)
            .await
            .map_err(AppError::from)?;
        Ok((StatusCode::CREATED, Json(project.into())))
    }

    /// GET /api/projects - list projects in creation order
    pub async fn list_projects(
        State(controller): State<Arc<ProjectController>>,
    ) -> AppResult<Json<Vec<ProjectResponse>>> {
        let projects = controller
            .project_service
            .list_projects()
            .await
            .map_err(AppError::from)?;
        Ok(Json(projects.into_iter().map(Into::into).collect()))
    }

    /// GET /api/projects/:projectId
    pub async fn get_project(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .get_project(project_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// PATCH /api/projects/:projectId - update project fields
    pub async fn update_project(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
        Json(request): Json<UpdateProjectRequest>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .update_project(project_id, request)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/advance - enter a workflow stage
    pub async fn advance_stage(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
        Json(request): Json<AdvanceStageRequest>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .advance_stage(project_id, request.stage)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/reset - start over
    pub async fn reset_project(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .reset_project(project_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/script/enhance - dialect adaptation
    pub async fn enhance_script(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .enhance_script(project_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/segments/split - one segment per paragraph
    pub async fn split_into_paragraphs(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .split_into_paragraphs(project_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/segments - insert a blank segment
    pub async fn insert_segment(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
        Json(request): Json<InsertSegmentRequest>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .insert_segment(project_id, request.after_segment_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// PATCH /api/projects/:projectId/segments/:segmentId
    pub async fn update_segment(
        State(controller): State<Arc<ProjectController>>,
        Path((project_id, segment_id)): Path<(Uuid, u32)>,
        Json(request): Json<UpdateSegmentRequest>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .update_segment(project_id, segment_id, request)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// DELETE /api/projects/:projectId/segments/:segmentId
    pub async fn remove_segment(
        State(controller): State<Arc<ProjectController>>,
        Path((project_id, segment_id)): Path<(Uuid, u32)>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .remove_segment(project_id, segment_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/segments/:segmentId/merge-next
    pub async fn merge_segment_with_next(
        State(controller): State<Arc<ProjectController>>,
        Path((project_id, segment_id)): Path<(Uuid, u32)>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .merge_segment_with_next(project_id, segment_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }

    /// POST /api/projects/:projectId/distribute - auto role/voice distribution
    pub async fn auto_distribute(
        State(controller): State<Arc<ProjectController>>,
        Path(project_id): Path<Uuid>,
    ) -> AppResult<Json<ProjectResponse>> {
        let project = controller
            .project_service
            .auto_distribute(project_id)
            .await
            .map_err(AppError::from)?;
        Ok(Json(project.into()))
    }
}
