use super::error::ProjectServiceError;
use super::model::{Project, ProjectStatus, Segment, SegmentSuggestion};
use super::workflow::{self, WorkflowStage};
use super::{CreateProjectRequest, UpdateProjectRequest, UpdateSegmentRequest};
use crate::domain::voice::{assigner, catalog};
use crate::infrastructure::repositories::{ProjectRepository, ScriptRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound on imported text, in characters.
const MAX_CONTENT_CHARS: usize = 50_000;

pub struct ProjectService {
    project_repo: Arc<ProjectRepository>,
    script_repo: Arc<dyn ScriptRepository>,
}

impl ProjectService {
    pub fn new(project_repo: Arc<ProjectRepository>, script_repo: Arc<dyn ScriptRepository>) -> Self {
        Self {
            project_repo,
            script_repo,
        }
    }
}

#[async_trait]
pub trait ProjectServiceApi: Send + Sync {
    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<Project, ProjectServiceError>;

    async fn get_project(&self, id: Uuid) -> Result<Project, ProjectServiceError>;

    async fn list_projects(&self) -> Result<Vec<Project>, ProjectServiceError>;

    async fn update_project(
        &self,
        id: Uuid,
        request: UpdateProjectRequest,
    ) -> Result<Project, ProjectServiceError>;

    /// User-triggered stage transition, gated on the prerequisite data of
    /// the preceding stage.
    async fn advance_stage(
        &self,
        id: Uuid,
        target: WorkflowStage,
    ) -> Result<Project, ProjectServiceError>;

    /// Explicit start-over: discards the project state and replaces it
    /// with a fresh draft under the same id.
    async fn reset_project(&self, id: Uuid) -> Result<Project, ProjectServiceError>;

    /// Run the original content through the text provider's dialect
    /// adaptation; provider failure keeps the text unchanged.
    async fn enhance_script(&self, id: Uuid) -> Result<Project, ProjectServiceError>;

    /// Replace the segment list with one segment per paragraph of the
    /// source text, all narrated by the dialect's first voice.
    async fn split_into_paragraphs(&self, id: Uuid) -> Result<Project, ProjectServiceError>;

    async fn insert_segment(
        &self,
        id: Uuid,
        after_segment_id: Option<u32>,
    ) -> Result<Project, ProjectServiceError>;

    async fn update_segment(
        &self,
        id: Uuid,
        segment_id: u32,
        request: UpdateSegmentRequest,
    ) -> Result<Project, ProjectServiceError>;

    async fn remove_segment(&self, id: Uuid, segment_id: u32)
        -> Result<Project, ProjectServiceError>;

    async fn merge_segment_with_next(
        &self,
        id: Uuid,
        segment_id: u32,
    ) -> Result<Project, ProjectServiceError>;

    /// Ask the segmentation provider for narrative segments and assign a
    /// voice per role, deterministically, within the project's dialect.
    async fn auto_distribute(&self, id: Uuid) -> Result<Project, ProjectServiceError>;
}

#[async_trait]
impl ProjectServiceApi for ProjectService {
    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<Project, ProjectServiceError> {
        let dialect_id = match request.dialect_id {
            Some(id) => {
                catalog::dialect_by_id(&id)
                    .ok_or_else(|| ProjectServiceError::Invalid(format!("unknown dialect '{id}'")))?;
                id
            }
            None => catalog::default_dialect().id.clone(),
        };

        let project = Project::new(Uuid::new_v4(), request.name.unwrap_or_default(), dialect_id);

        tracing::info!(
            project_id = %project.id,
            dialect = %project.dialect_id,
            "project created"
        );

        self.project_repo.insert(project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, ProjectServiceError> {
        self.load(id)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.project_repo.list())
    }

    async fn update_project(
        &self,
        id: Uuid,
        request: UpdateProjectRequest,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "update_project"));
        }

        let mut updated = project;
        if let Some(name) = request.name {
            updated.name = name;
        }
        if let Some(dialect_id) = request.dialect_id {
            catalog::dialect_by_id(&dialect_id).ok_or_else(|| {
                ProjectServiceError::Invalid(format!("unknown dialect '{dialect_id}'"))
            })?;
            updated.dialect_id = dialect_id;
        }
        if let Some(content) = request.content {
            guard_text_size(&content)?;
            updated.content = content;
        }
        if let Some(enhanced) = request.enhanced_content {
            guard_text_size(&enhanced)?;
            updated.enhanced_content = enhanced;
        }

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn advance_stage(
        &self,
        id: Uuid,
        target: WorkflowStage,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "advance_stage"));
        }

        workflow::can_enter(&project, target)
            .map_err(|violation| ProjectServiceError::Invalid(violation.to_string()))?;

        let mut updated = project;
        updated.stage = target;
        if target.position() >= WorkflowStage::Script.position() {
            updated.status = ProjectStatus::InPreparation;
        }

        tracing::info!(project_id = %id, stage = ?target, "workflow stage entered");

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn reset_project(&self, id: Uuid) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "reset_project"));
        }

        let fresh = Project::new(id, String::new(), project.dialect_id);
        tracing::info!(project_id = %id, "project reset to a fresh draft");
        self.project_repo.save(fresh.clone());
        Ok(fresh)
    }

    async fn enhance_script(&self, id: Uuid) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "enhance_script"));
        }
        if project.content.trim().is_empty() {
            return Err(ProjectServiceError::Invalid(
                "project has no content to enhance".to_string(),
            ));
        }

        let dialect = catalog::dialect_by_id(&project.dialect_id)
            .unwrap_or_else(catalog::default_dialect);

        let enhanced = match self.script_repo.enhance_text(&project.content, dialect).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(project_id = %id, "enhancement returned nothing, keeping original text");
                project.content.clone()
            }
            Err(e) => {
                tracing::warn!(project_id = %id, error = %e, "enhancement failed, keeping original text");
                project.content.clone()
            }
        };

        let mut updated = project;
        updated.enhanced_content = enhanced;
        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn split_into_paragraphs(&self, id: Uuid) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "split_into_paragraphs"));
        }

        let text = project.source_text().to_string();
        if text.trim().is_empty() {
            return Err(ProjectServiceError::Invalid(
                "project has no text to split".to_string(),
            ));
        }

        let pool = catalog::pool_for_dialect(&project.dialect_id);
        let default_voice = pool
            .first()
            .map(|p| p.name.clone())
            .ok_or_else(|| ProjectServiceError::Invalid("voice pool is empty".to_string()))?;

        let paragraph_pattern = regex::Regex::new(r"\n+").unwrap();
        let paragraphs: Vec<&str> = paragraph_pattern
            .split(&text)
            .filter(|p| !p.trim().is_empty())
            .collect();
        if paragraphs.is_empty() {
            return Err(ProjectServiceError::Invalid(
                "project has no text to split".to_string(),
            ));
        }

        let mut updated = project;
        let mut segments = Vec::with_capacity(paragraphs.len());
        for (index, paragraph) in paragraphs.iter().enumerate() {
            segments.push(Segment {
                id: updated.allocate_segment_id(),
                label: format!("فقرة {}", index + 1),
                role: "الراوي".to_string(),
                selected_voice: Some(default_voice.clone()),
                content: paragraph.to_string(),
                pilot_artifact_id: None,
                final_artifact_id: None,
            });
        }
        updated.segments = segments;

        tracing::info!(
            project_id = %id,
            segment_count = updated.segments.len(),
            "source text split into paragraphs"
        );

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn insert_segment(
        &self,
        id: Uuid,
        after_segment_id: Option<u32>,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "insert_segment"));
        }

        let mut updated = project;
        let position = match after_segment_id {
            Some(anchor) => updated
                .segment_position(anchor)
                .ok_or(ProjectServiceError::SegmentNotFound)?
                + 1,
            None => updated.segments.len(),
        };
        let segment = updated.blank_segment();
        updated.segments.insert(position, segment);

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn update_segment(
        &self,
        id: Uuid,
        segment_id: u32,
        request: UpdateSegmentRequest,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "update_segment"));
        }

        if let Some(voice) = request.selected_voice.as_deref() {
            if !voice.trim().is_empty() && catalog::profile_by_name(voice).is_none() {
                return Err(ProjectServiceError::Invalid(format!(
                    "unknown voice '{voice}'"
                )));
            }
        }

        let mut updated = project;
        let position = updated
            .segment_position(segment_id)
            .ok_or(ProjectServiceError::SegmentNotFound)?;
        let segment = &mut updated.segments[position];
        if let Some(label) = request.label {
            segment.label = label;
        }
        if let Some(role) = request.role {
            segment.role = role;
        }
        if let Some(voice) = request.selected_voice {
            segment.selected_voice = if voice.trim().is_empty() {
                None
            } else {
                Some(voice)
            };
        }
        if let Some(content) = request.content {
            segment.content = content;
        }

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn remove_segment(
        &self,
        id: Uuid,
        segment_id: u32,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "remove_segment"));
        }
        if project.segments.len() <= 1 {
            return Err(ProjectServiceError::Invalid(
                "a project must keep at least one segment".to_string(),
            ));
        }

        let mut updated = project;
        let position = updated
            .segment_position(segment_id)
            .ok_or(ProjectServiceError::SegmentNotFound)?;
        updated.segments.remove(position);

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn merge_segment_with_next(
        &self,
        id: Uuid,
        segment_id: u32,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "merge_segment_with_next"));
        }

        let mut updated = project;
        let position = updated
            .segment_position(segment_id)
            .ok_or(ProjectServiceError::SegmentNotFound)?;
        if position + 1 >= updated.segments.len() {
            return Err(ProjectServiceError::Invalid(
                "the last segment has no successor to merge with".to_string(),
            ));
        }

        let next = updated.segments.remove(position + 1);
        let segment = &mut updated.segments[position];
        segment.content = format!("{}\n\n{}", segment.content, next.content);

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }

    async fn auto_distribute(&self, id: Uuid) -> Result<Project, ProjectServiceError> {
        let project = self.load(id)?;
        if project.locked {
            return Ok(self.reject_locked(project, "auto_distribute"));
        }

        let source = project.source_text().trim().to_string();
        if source.is_empty() {
            return Err(ProjectServiceError::Invalid(
                "no text available to distribute voices over".to_string(),
            ));
        }

        let suggestions = match self.script_repo.analyze_segments(&source).await {
            Ok(suggestions) if !suggestions.is_empty() => suggestions,
            Ok(_) => {
                tracing::warn!(project_id = %id, "provider returned no segments, using a single default segment");
                default_suggestions(&source)
            }
            Err(e) => {
                tracing::warn!(project_id = %id, error = %e, "segmentation failed, using a single default segment");
                default_suggestions(&source)
            }
        };

        let pool = catalog::pool_for_dialect(&project.dialect_id);
        let mut assignments: HashMap<String, String> = HashMap::new();

        let mut updated = project;
        let mut segments = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            let voice = assigner::assign_voice_for_role(&suggestion.role, pool, &mut assignments)
                .map_err(|e| ProjectServiceError::Invalid(e.to_string()))?;
            segments.push(Segment {
                id: updated.allocate_segment_id(),
                label: suggestion.label,
                role: suggestion.role,
                selected_voice: Some(voice),
                content: suggestion.text,
                pilot_artifact_id: None,
                final_artifact_id: None,
            });
        }
        updated.segments = segments;

        tracing::info!(
            project_id = %id,
            segment_count = updated.segments.len(),
            role_count = assignments.len(),
            "voices distributed over narrative segments"
        );

        let updated = updated.touched();
        self.project_repo.save(updated.clone());
        Ok(updated)
    }
}

impl ProjectService {
    fn load(&self, id: Uuid) -> Result<Project, ProjectServiceError> {
        self.project_repo
            .find_by_id(id)
            .ok_or(ProjectServiceError::NotFound)
    }

    /// Mutations against a locked project are silently rejected: the
    /// caller gets the current state back, untouched.
    fn reject_locked(&self, project: Project, operation: &str) -> Project {
        tracing::debug!(
            project_id = %project.id,
            operation = operation,
            "project is locked by an in-flight batch, mutation rejected"
        );
        project
    }
}

fn guard_text_size(text: &str) -> Result<(), ProjectServiceError> {
    let chars = text.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(ProjectServiceError::TooLarge(format!(
            "text of {chars} characters exceeds the {MAX_CONTENT_CHARS} character limit"
        )));
    }
    Ok(())
}

fn default_suggestions(source: &str) -> Vec<SegmentSuggestion> {
    vec![SegmentSuggestion {
        label: "مقطع افتراضي".to_string(),
        role: "الراوي".to_string(),
        text: source.to_string(),
    }]
}
