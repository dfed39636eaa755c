use crate::domain::voice::model::{BaseVoice, VoiceProfile};
use serde::{Deserialize, Serialize};

/// Studio performance controls carried verbatim into every provider
/// request. Values are the studio's Arabic control labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceControls {
    pub temp: String,
    pub emotion: String,
    pub speed: String,
    pub depth: String,
    pub pitch: String,
    pub drama: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl Default for VoiceControls {
    fn default() -> Self {
        Self {
            temp: "متوازن".to_string(),
            emotion: "متوسط".to_string(),
            speed: "متوسطة".to_string(),
            depth: "متوسطة".to_string(),
            pitch: "متوسطة".to_string(),
            drama: "متوسط".to_string(),
            purpose: None,
        }
    }
}

/// One unit of synthesis work, tagged with the index of the segment (or
/// turn) it originates from so results can be ordered explicitly before
/// assembly.
#[derive(Debug, Clone)]
pub struct SynthesisUnit {
    pub segment_index: usize,
    pub text: String,
    pub profile: VoiceProfile,
    pub base_voice: BaseVoice,
    pub performance_note: String,
}

/// Immutable snapshot of everything a batch needs, captured when the
/// batch starts. Edits made while the batch is in flight cannot reach an
/// already-frozen plan.
#[derive(Debug, Clone)]
pub struct SynthesisPlan {
    pub units: Vec<SynthesisUnit>,
    pub controls: VoiceControls,
    pub dialect_id: String,
}

/// Fully resolved provider request for a single unit.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub base_voice: BaseVoice,
    pub profile: VoiceProfile,
    pub controls: VoiceControls,
    pub dialect_id: String,
    pub performance_note: String,
}
