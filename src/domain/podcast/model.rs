use crate::domain::voice::model::{Gender, VoiceCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Gender a speaker declares; `any` matches every voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerGender {
    Male,
    Female,
    Any,
}

impl SpeakerGender {
    pub fn accepts(self, gender: Gender) -> bool {
        match self {
            SpeakerGender::Any => true,
            SpeakerGender::Male => gender == Gender::Male,
            SpeakerGender::Female => gender == Gender::Female,
        }
    }
}

/// Role descriptor for one podcast participant. Field names follow the
/// provider's JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerProfile {
    pub id: String,
    pub role: String,
    pub tone: String,
    pub style: String,
    pub gender: SpeakerGender,
    pub category_hint: VoiceCategory,
    pub description: String,
    #[serde(default)]
    pub reasoning: String,
}

/// One line of dialogue bound to a speaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastTurn {
    pub speaker_id: String,
    pub text: String,
}

/// Script provider result: ordered turns plus the speaker roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastScript {
    pub turns: Vec<PodcastTurn>,
    pub speakers: Vec<SpeakerProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    Smart,
    Manual,
}

/// The podcast aggregate. The distribution map is a side table keyed by
/// speaker id, never embedded in the turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastSession {
    pub id: Uuid,
    pub dialect_id: String,
    pub source_text: String,
    pub turns: Vec<PodcastTurn>,
    pub speakers: Vec<SpeakerProfile>,
    pub voice_map: HashMap<String, String>,
    pub mode: DistributionMode,
    pub locked: bool,
    pub master_artifact_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl PodcastSession {
    pub fn new(id: Uuid, dialect_id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            dialect_id,
            source_text: String::new(),
            turns: Vec::new(),
            speakers: Vec::new(),
            voice_map: HashMap::new(),
            mode: DistributionMode::Smart,
            locked: false,
            master_artifact_id: None,
            created_at: now,
            last_edited: now,
        }
    }

    pub fn touched(mut self) -> Self {
        self.last_edited = Utc::now();
        self
    }
}
