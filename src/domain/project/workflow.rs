use super::model::Project;
use serde::{Deserialize, Serialize};

/// Workflow stages in strict forward order. Entering a stage requires the
/// prerequisite data of the preceding one; transitions are always
/// user-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStage {
    New,
    Import,
    Script,
    Distribute,
    Pilot,
    Production,
    Completed,
}

impl WorkflowStage {
    pub fn position(self) -> usize {
        match self {
            WorkflowStage::New => 0,
            WorkflowStage::Import => 1,
            WorkflowStage::Script => 2,
            WorkflowStage::Distribute => 3,
            WorkflowStage::Pilot => 4,
            WorkflowStage::Production => 5,
            WorkflowStage::Completed => 6,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StageViolation {
    #[error("project content is empty")]
    EmptyContent,
    #[error("no segment has any content")]
    NoSegmentContent,
    #[error("segment '{0}' has no content")]
    EmptySegment(String),
    #[error("segment '{0}' has no assigned voice")]
    MissingVoice(String),
    #[error("the completed stage is reached through production, not directly")]
    CompletedIsInternal,
}

/// Check whether `target` may be entered given the project's data.
pub fn can_enter(project: &Project, target: WorkflowStage) -> Result<(), StageViolation> {
    match target {
        WorkflowStage::New | WorkflowStage::Import => Ok(()),
        WorkflowStage::Script => {
            if project.content.trim().is_empty() {
                Err(StageViolation::EmptyContent)
            } else {
                Ok(())
            }
        }
        WorkflowStage::Distribute => {
            if project.source_text().trim().is_empty() {
                Err(StageViolation::EmptyContent)
            } else {
                Ok(())
            }
        }
        WorkflowStage::Pilot => {
            if project.segments.iter().any(|s| !s.content.trim().is_empty()) {
                Ok(())
            } else {
                Err(StageViolation::NoSegmentContent)
            }
        }
        WorkflowStage::Production => {
            for segment in &project.segments {
                if segment.content.trim().is_empty() {
                    return Err(StageViolation::EmptySegment(segment.label.clone()));
                }
                if !segment.has_voice() {
                    return Err(StageViolation::MissingVoice(segment.label.clone()));
                }
            }
            Ok(())
        }
        WorkflowStage::Completed => Err(StageViolation::CompletedIsInternal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn project() -> Project {
        Project::new(Uuid::new_v4(), "مشروع".to_string(), "egyptian".to_string())
    }

    #[test]
    fn test_import_is_open_to_fresh_projects() {
        assert_eq!(can_enter(&project(), WorkflowStage::Import), Ok(()));
    }

    #[test]
    fn test_script_requires_content() {
        let mut p = project();
        assert_eq!(
            can_enter(&p, WorkflowStage::Script),
            Err(StageViolation::EmptyContent)
        );
        p.content = "نص".to_string();
        assert_eq!(can_enter(&p, WorkflowStage::Script), Ok(()));
    }

    #[test]
    fn test_pilot_requires_segment_content() {
        let mut p = project();
        p.content = "نص".to_string();
        assert_eq!(
            can_enter(&p, WorkflowStage::Pilot),
            Err(StageViolation::NoSegmentContent)
        );
        p.segments[0].content = "نص المقطع".to_string();
        assert_eq!(can_enter(&p, WorkflowStage::Pilot), Ok(()));
    }

    #[test]
    fn test_production_requires_every_voice_assigned() {
        let mut p = project();
        p.segments[0].content = "نص المقطع".to_string();
        assert_eq!(
            can_enter(&p, WorkflowStage::Production),
            Err(StageViolation::MissingVoice("مقدمة الراوي".to_string()))
        );
        p.segments[0].selected_voice = Some("كريم".to_string());
        assert_eq!(can_enter(&p, WorkflowStage::Production), Ok(()));
    }

    #[test]
    fn test_production_rejects_empty_segment_content() {
        let mut p = project();
        p.segments[0].selected_voice = Some("كريم".to_string());
        assert!(matches!(
            can_enter(&p, WorkflowStage::Production),
            Err(StageViolation::EmptySegment(_))
        ));
    }

    #[test]
    fn test_completed_cannot_be_entered_manually() {
        assert_eq!(
            can_enter(&project(), WorkflowStage::Completed),
            Err(StageViolation::CompletedIsInternal)
        );
    }

    #[test]
    fn test_stage_order_is_strictly_forward() {
        let stages = [
            WorkflowStage::New,
            WorkflowStage::Import,
            WorkflowStage::Script,
            WorkflowStage::Distribute,
            WorkflowStage::Pilot,
            WorkflowStage::Production,
            WorkflowStage::Completed,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0].position() < pair[1].position());
        }
    }
}
