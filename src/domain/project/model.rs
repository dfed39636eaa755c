use super::workflow::WorkflowStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of narration: a stretch of text bound to a narrative role and
/// (once distribution ran) a voice. Owned exclusively by its project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub label: String,
    pub role: String,
    pub selected_voice: Option<String>,
    pub content: String,
    pub pilot_artifact_id: Option<Uuid>,
    pub final_artifact_id: Option<Uuid>,
}

impl Segment {
    pub fn has_voice(&self) -> bool {
        self.selected_voice
            .as_deref()
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    InPreparation,
}

/// Ordered segmentation suggestion coming back from the text-analysis
/// provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSuggestion {
    pub label: String,
    pub role: String,
    pub text: String,
}

/// The audiobook aggregate. Single-writer: the service layer clones it,
/// mutates the clone and stores it back wholesale, so segment order (the
/// final audio's temporal order) is never shared mid-edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
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
    pub master_artifact_id: Option<Uuid>,
    next_segment_id: u32,
}

impl Project {
    pub fn new(id: Uuid, name: String, dialect_id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            dialect_id,
            stage: WorkflowStage::New,
            status: ProjectStatus::Draft,
            created_at: now,
            last_edited: now,
            content: String::new(),
            enhanced_content: String::new(),
            segments: vec![Segment {
                id: 1,
                label: "مقدمة الراوي".to_string(),
                role: "الراوي".to_string(),
                selected_voice: None,
                content: String::new(),
                pilot_artifact_id: None,
                final_artifact_id: None,
            }],
            locked: false,
            master_artifact_id: None,
            next_segment_id: 2,
        }
    }

    /// The text the pipeline works on: the enhanced script when present,
    /// the original import otherwise.
    pub fn source_text(&self) -> &str {
        if self.enhanced_content.trim().is_empty() {
            &self.content
        } else {
            &self.enhanced_content
        }
    }

    /// Refresh the edit timestamp; call on every stored mutation.
    pub fn touched(mut self) -> Self {
        self.last_edited = Utc::now();
        self
    }

    pub fn allocate_segment_id(&mut self) -> u32 {
        let id = self.next_segment_id;
        self.next_segment_id += 1;
        id
    }

    pub fn segment_position(&self, segment_id: u32) -> Option<usize> {
        self.segments.iter().position(|s| s.id == segment_id)
    }

    pub fn blank_segment(&mut self) -> Segment {
        Segment {
            id: self.allocate_segment_id(),
            label: "مقطع جديد".to_string(),
            role: "شخصية".to_string(),
            selected_voice: None,
            content: String::new(),
            pilot_artifact_id: None,
            final_artifact_id: None,
        }
    }
}
