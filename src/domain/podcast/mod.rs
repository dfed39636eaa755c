pub mod error;
pub mod model;
pub mod service;

pub use error::PodcastServiceError;
pub use model::{
    DistributionMode, PodcastScript, PodcastSession, PodcastTurn, SpeakerGender, SpeakerProfile,
};
pub use service::{PodcastService, PodcastServiceApi};

use crate::domain::voice::model::VoiceCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub dialect_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateScriptRequest {
    pub content: String,
}

/// Manually declared speaker; everything but the role is optional.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddSpeakerRequest {
    pub role: String,
    pub tone: Option<String>,
    pub style: Option<String>,
    pub gender: Option<SpeakerGender>,
    pub category_hint: Option<VoiceCategory>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetDistributionModeRequest {
    pub mode: DistributionMode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignVoiceRequest {
    pub speaker_id: String,
    pub voice_id: String,
}
