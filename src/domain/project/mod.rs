pub mod error;
pub mod model;
pub mod service;
pub mod workflow;

pub use error::ProjectServiceError;
pub use model::{Project, ProjectStatus, Segment, SegmentSuggestion};
pub use service::{ProjectService, ProjectServiceApi};
pub use workflow::WorkflowStage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a new project
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub dialect_id: Option<String>,
}

/// Partial update of project fields
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub dialect_id: Option<String>,
    pub content: Option<String>,
    pub enhanced_content: Option<String>,
}

/// Partial update of one segment
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSegmentRequest {
    pub label: Option<String>,
    pub role: Option<String>,
    pub selected_voice: Option<String>,
    pub content: Option<String>,
}

/// Request to insert a fresh segment after an existing one (appended at
/// the end when no anchor is given)
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InsertSegmentRequest {
    pub after_segment_id: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvanceStageRequest {
    pub stage: WorkflowStage,
}

/// Response for project endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub dialect_id: String,
    pub stage: WorkflowStage,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
    pub content: String,
    pub enhanced_content: String,
    pub segments: Vec<Segment>,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_artifact_id: Option<Uuid>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            dialect_id: project.dialect_id,
            stage: project.stage,
            status: project.status,
            created_at: project.created_at,
            last_edited: project.last_edited,
            content: project.content,
            enhanced_content: project.enhanced_content,
            segments: project.segments,
            locked: project.locked,
            master_artifact_id: project.master_artifact_id,
        }
    }
}
