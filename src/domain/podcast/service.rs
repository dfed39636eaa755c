use super::error::PodcastServiceError;
use super::model::{DistributionMode, PodcastSession, SpeakerGender, SpeakerProfile};
use super::{AddSpeakerRequest, CreateSessionRequest};
use crate::domain::audio::assembler;
use crate::domain::synthesis::error::SynthesisServiceError;
use crate::domain::synthesis::model::{SynthesisPlan, SynthesisUnit, VoiceControls};
use crate::domain::synthesis::service::SynthesisServiceApi;
use crate::domain::voice::model::{base_voice_for, VoiceCategory};
use crate::domain::voice::{assigner, catalog};
use crate::infrastructure::repositories::{ArtifactRepository, ScriptRepository, SessionRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub struct PodcastService {
    session_repo: Arc<SessionRepository>,
    artifact_repo: Arc<ArtifactRepository>,
    script_repo: Arc<dyn ScriptRepository>,
    synthesis: Arc<dyn SynthesisServiceApi>,
    progress: RwLock<HashMap<Uuid, u8>>,
}

impl PodcastService {
    pub fn new(
        session_repo: Arc<SessionRepository>,
        artifact_repo: Arc<ArtifactRepository>,
        script_repo: Arc<dyn ScriptRepository>,
        synthesis: Arc<dyn SynthesisServiceApi>,
    ) -> Self {
        Self {
            session_repo,
            artifact_repo,
            script_repo,
            synthesis,
            progress: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
pub trait PodcastServiceApi: Send + Sync {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<PodcastSession, PodcastServiceError>;

    async fn get_session(&self, id: Uuid) -> Result<PodcastSession, PodcastServiceError>;

    /// Analyze the content into turns and speakers, keeping user-defined
    /// speakers intact and smart-assigning voices only to newcomers.
    async fn generate_script(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<PodcastSession, PodcastServiceError>;

    async fn add_speaker(
        &self,
        id: Uuid,
        request: AddSpeakerRequest,
    ) -> Result<PodcastSession, PodcastServiceError>;

    /// `manual` disables automatic assignment; switching back to `smart`
    /// recomputes the whole map from scratch, dropping manual overrides.
    async fn set_distribution_mode(
        &self,
        id: Uuid,
        mode: DistributionMode,
    ) -> Result<PodcastSession, PodcastServiceError>;

    async fn assign_voice(
        &self,
        id: Uuid,
        speaker_id: String,
        voice_id: String,
    ) -> Result<PodcastSession, PodcastServiceError>;

    /// Batch-synthesize all turns in order and store the merged master.
    async fn produce(
        &self,
        id: Uuid,
        controls: VoiceControls,
    ) -> Result<Uuid, PodcastServiceError>;

    fn progress_of(&self, id: Uuid) -> u8;
}

#[async_trait]
impl PodcastServiceApi for PodcastService {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<PodcastSession, PodcastServiceError> {
        let dialect_id = match request.dialect_id {
            Some(id) => {
                catalog::dialect_by_id(&id)
                    .ok_or_else(|| PodcastServiceError::Invalid(format!("unknown dialect '{id}'")))?;
                id
            }
            None => "egyptian".to_string(),
        };

        let session = PodcastSession::new(Uuid::new_v4(), dialect_id);
        tracing::info!(session_id = %session.id, dialect = %session.dialect_id, "podcast session created");
        self.session_repo.insert(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<PodcastSession, PodcastServiceError> {
        self.load(id)
    }

    async fn generate_script(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<PodcastSession, PodcastServiceError> {
        let session = self.load(id)?;
        if session.locked {
            return Ok(self.reject_locked(session, "generate_script"));
        }
        if content.trim().is_empty() {
            return Err(PodcastServiceError::Invalid(
                "no content available to analyze".to_string(),
            ));
        }

        let dialect =
            catalog::dialect_by_id(&session.dialect_id).unwrap_or_else(catalog::default_dialect);

        let script = self
            .script_repo
            .generate_podcast_script(&content, dialect, &session.speakers)
            .await
            .map_err(PodcastServiceError::Dependency)?;

        tracing::info!(
            session_id = %id,
            turn_count = script.turns.len(),
            speaker_count = script.speakers.len(),
            "podcast script generated"
        );

        let mut updated = session;
        updated.source_text = content;
        updated.turns = script.turns;
        // Merge: a speaker the user already has wins over the provider's copy.
        for speaker in script.speakers {
            if !updated.speakers.iter().any(|s| s.id == speaker.id) {
                updated.speakers.push(speaker);
            }
        }
        // A new script invalidates any previously produced master.
        updated.master_artifact_id = None;
        // Smart-assign voices, keeping every existing mapping and its
        // used voice intact.
        let pool = catalog::pool_for_dialect(&updated.dialect_id);
        updated.voice_map = assigner::smart_distribution(&updated.speakers, pool, &updated.voice_map);
        updated.mode = DistributionMode::Smart;

        let updated = updated.touched();
        self.session_repo.save(updated.clone());
        Ok(updated)
    }

    async fn add_speaker(
        &self,
        id: Uuid,
        request: AddSpeakerRequest,
    ) -> Result<PodcastSession, PodcastServiceError> {
        let session = self.load(id)?;
        if session.locked {
            return Ok(self.reject_locked(session, "add_speaker"));
        }
        if request.role.trim().is_empty() {
            return Err(PodcastServiceError::Invalid(
                "a speaker needs a role".to_string(),
            ));
        }

        let mut updated = session;
        let mut counter = updated.speakers.len() + 1;
        let mut speaker_id = format!("manual_speaker_{counter}");
        while updated.speakers.iter().any(|s| s.id == speaker_id) {
            counter += 1;
            speaker_id = format!("manual_speaker_{counter}");
        }

        updated.speakers.push(SpeakerProfile {
            id: speaker_id,
            role: request.role,
            tone: request.tone.unwrap_or_else(|| "هادئ".to_string()),
            style: request.style.unwrap_or_else(|| "حواري".to_string()),
            gender: request.gender.unwrap_or(SpeakerGender::Any),
            category_hint: request.category_hint.unwrap_or(VoiceCategory::Podcast),
            description: request.description.unwrap_or_default(),
            reasoning: String::new(),
        });

        let updated = updated.touched();
        self.session_repo.save(updated.clone());
        Ok(updated)
    }

    async fn set_distribution_mode(
        &self,
        id: Uuid,
        mode: DistributionMode,
    ) -> Result<PodcastSession, PodcastServiceError> {
        let session = self.load(id)?;
        if session.locked {
            return Ok(self.reject_locked(session, "set_distribution_mode"));
        }

        let mut updated = session;
        updated.mode = mode;
        if mode == DistributionMode::Smart && !updated.speakers.is_empty() {
            // From scratch: manual overrides do not survive the switch.
            let pool = catalog::pool_for_dialect(&updated.dialect_id);
            updated.voice_map =
                assigner::smart_distribution(&updated.speakers, pool, &HashMap::new());
        }

        tracing::info!(session_id = %id, mode = ?mode, "distribution mode set");

        let updated = updated.touched();
        self.session_repo.save(updated.clone());
        Ok(updated)
    }

    async fn assign_voice(
        &self,
        id: Uuid,
        speaker_id: String,
        voice_id: String,
    ) -> Result<PodcastSession, PodcastServiceError> {
        let session = self.load(id)?;
        if session.locked {
            return Ok(self.reject_locked(session, "assign_voice"));
        }
        if !session.speakers.iter().any(|s| s.id == speaker_id) {
            return Err(PodcastServiceError::Invalid(format!(
                "unknown speaker '{speaker_id}'"
            )));
        }
        if catalog::profile_by_id(&voice_id).is_none() {
            return Err(PodcastServiceError::Invalid(format!(
                "unknown voice '{voice_id}'"
            )));
        }

        let mut updated = session;
        updated.voice_map.insert(speaker_id, voice_id);
        let updated = updated.touched();
        self.session_repo.save(updated.clone());
        Ok(updated)
    }

    async fn produce(
        &self,
        id: Uuid,
        controls: VoiceControls,
    ) -> Result<Uuid, PodcastServiceError> {
        let session = self.load(id)?;
        if session.locked {
            return Err(PodcastServiceError::Invalid(
                "a production batch is already in flight".to_string(),
            ));
        }
        if session.turns.is_empty() {
            return Err(PodcastServiceError::Invalid(
                "no script available to produce".to_string(),
            ));
        }

        // In manual mode the user owns the mapping; it must be complete
        // before anything reaches the provider.
        if session.mode == DistributionMode::Manual {
            for turn in &session.turns {
                if !session.voice_map.contains_key(&turn.speaker_id) {
                    return Err(PodcastServiceError::Invalid(format!(
                        "manual distribution is missing a voice for speaker '{}'",
                        turn.speaker_id
                    )));
                }
            }
        }

        // Freeze the plan from the current snapshot before locking.
        let mut units = Vec::with_capacity(session.turns.len());
        for (index, turn) in session.turns.iter().enumerate() {
            let voice_id = session.voice_map.get(&turn.speaker_id).ok_or_else(|| {
                PodcastServiceError::Invalid(format!(
                    "speaker '{}' has no assigned voice",
                    turn.speaker_id
                ))
            })?;
            let profile = catalog::profile_by_id(voice_id).ok_or_else(|| {
                PodcastServiceError::Invalid(format!(
                    "every speaker needs a valid voice; '{voice_id}' is unknown"
                ))
            })?;
            units.push(SynthesisUnit {
                segment_index: index,
                text: turn.text.clone(),
                profile: profile.clone(),
                base_voice: base_voice_for(&profile.voice_type, profile.gender),
                performance_note: "Podcast Audio Production".to_string(),
            });
        }
        let plan = SynthesisPlan {
            units,
            controls,
            dialect_id: session.dialect_id.clone(),
        };

        let mut locked = session;
        locked.locked = true;
        self.session_repo.save(locked.clone());
        self.set_progress(id, 0);

        let batch = self
            .synthesis
            .synthesize_batch(&plan, &|progress| self.set_progress(id, progress))
            .await;

        let artifacts = match batch {
            Ok(artifacts) => artifacts,
            Err(e) => {
                self.unlock(id);
                self.set_progress(id, 0);
                return Err(match e {
                    SynthesisServiceError::Dependency(msg) => PodcastServiceError::Dependency(msg),
                    SynthesisServiceError::Invalid(msg) => PodcastServiceError::Invalid(msg),
                });
            }
        };

        let master = match assembler::merge(&artifacts) {
            Ok(master) => master,
            Err(e) => {
                self.unlock(id);
                self.set_progress(id, 0);
                return Err(PodcastServiceError::Assembly(e));
            }
        };
        let artifact_id = self.artifact_repo.store(master);

        let mut completed = locked;
        completed.locked = false;
        completed.master_artifact_id = Some(artifact_id);
        let completed = completed.touched();
        self.session_repo.save(completed);

        tracing::info!(session_id = %id, artifact_id = %artifact_id, "podcast master produced");

        Ok(artifact_id)
    }

    fn progress_of(&self, id: Uuid) -> u8 {
        self.progress
            .read()
            .expect("progress table poisoned")
            .get(&id)
            .copied()
            .unwrap_or(0)
    }
}

impl PodcastService {
    fn load(&self, id: Uuid) -> Result<PodcastSession, PodcastServiceError> {
        self.session_repo
            .find_by_id(id)
            .ok_or(PodcastServiceError::NotFound)
    }

    fn reject_locked(&self, session: PodcastSession, operation: &str) -> PodcastSession {
        tracing::debug!(
            session_id = %session.id,
            operation = operation,
            "session is locked by an in-flight batch, mutation rejected"
        );
        session
    }

    fn set_progress(&self, id: Uuid, progress: u8) {
        self.progress
            .write()
            .expect("progress table poisoned")
            .insert(id, progress);
    }

    fn unlock(&self, id: Uuid) {
        if let Some(session) = self.session_repo.find_by_id(id) {
            let mut unlocked = session;
            unlocked.locked = false;
            self.session_repo.save(unlocked);
        }
    }
}
