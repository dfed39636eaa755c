use super::error::ProductionError;
use super::model::{SynthesisPlan, SynthesisUnit, VoiceControls};
use super::service::SynthesisServiceApi;
use crate::domain::audio::assembler;
use crate::domain::project::model::Project;
use crate::domain::project::workflow::{self, WorkflowStage};
use crate::domain::voice::model::base_voice_for;
use crate::domain::voice::catalog;
use crate::infrastructure::repositories::{ArtifactRepository, ProjectRepository};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// A pilot reads only the head of the segment.
const PILOT_PREVIEW_CHARS: usize = 100;

/// Drives audiobook synthesis against a project: gates the workflow,
/// freezes the plan, locks the aggregate for the duration of the batch
/// and turns the results into stored WAV artifacts.
pub struct ProductionService {
    project_repo: Arc<ProjectRepository>,
    artifact_repo: Arc<ArtifactRepository>,
    synthesis: Arc<dyn SynthesisServiceApi>,
    progress: RwLock<HashMap<Uuid, u8>>,
}

impl ProductionService {
    pub fn new(
        project_repo: Arc<ProjectRepository>,
        artifact_repo: Arc<ArtifactRepository>,
        synthesis: Arc<dyn SynthesisServiceApi>,
    ) -> Self {
        Self {
            project_repo,
            artifact_repo,
            synthesis,
            progress: RwLock::new(HashMap::new()),
        }
    }

    /// Produce the full master: every segment in order, fail-fast, merged
    /// into one WAV. On success the project carries the master artifact
    /// and moves to `completed`; on failure it is unlocked and left where
    /// it was, with nothing stored.
    pub async fn produce_master(
        &self,
        project_id: Uuid,
        controls: VoiceControls,
    ) -> Result<Uuid, ProductionError> {
        let project = self.load(project_id)?;
        if project.locked {
            return Err(ProductionError::Invalid(
                "a production batch is already in flight".to_string(),
            ));
        }

        // Gate before anything external happens.
        workflow::can_enter(&project, WorkflowStage::Production)
            .map_err(|violation| ProductionError::Invalid(violation.to_string()))?;

        let plan = freeze_plan(&project, &controls)?;

        let mut locked = project;
        locked.locked = true;
        locked.stage = WorkflowStage::Production;
        self.project_repo.save(locked.clone());
        self.set_progress(project_id, 0);

        tracing::info!(
            project_id = %project_id,
            segment_count = plan.units.len(),
            "master production started"
        );

        let batch = self
            .synthesis
            .synthesize_batch(&plan, &|progress| self.set_progress(project_id, progress))
            .await;

        let artifacts = match batch {
            Ok(artifacts) => artifacts,
            Err(e) => {
                self.abort(project_id);
                return Err(e.into());
            }
        };

        // Per-segment WAVs first, then the master from the same artifacts.
        let mut completed = locked;
        let mut segment_artifacts = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            match assembler::merge(std::slice::from_ref(artifact)) {
                Ok(wav) => segment_artifacts.push(self.artifact_repo.store(wav)),
                Err(e) => {
                    self.abort(project_id);
                    return Err(e.into());
                }
            }
        }
        let master = match assembler::merge(&artifacts) {
            Ok(master) => master,
            Err(e) => {
                self.abort(project_id);
                return Err(e.into());
            }
        };
        let master_id = self.artifact_repo.store(master);

        for (segment, artifact_id) in completed.segments.iter_mut().zip(segment_artifacts) {
            segment.final_artifact_id = Some(artifact_id);
        }
        completed.master_artifact_id = Some(master_id);
        completed.stage = WorkflowStage::Completed;
        completed.locked = false;
        let completed = completed.touched();
        self.project_repo.save(completed);

        tracing::info!(
            project_id = %project_id,
            artifact_id = %master_id,
            "master production completed"
        );

        Ok(master_id)
    }

    /// Produce an isolated pilot clip for one segment: the first
    /// `PILOT_PREVIEW_CHARS` characters, stored as its own WAV artifact.
    pub async fn produce_pilot(
        &self,
        project_id: Uuid,
        segment_id: u32,
        controls: VoiceControls,
    ) -> Result<Uuid, ProductionError> {
        let project = self.load(project_id)?;
        if project.locked {
            return Err(ProductionError::Invalid(
                "a production batch is already in flight".to_string(),
            ));
        }

        let position = project
            .segment_position(segment_id)
            .ok_or(ProductionError::SegmentNotFound)?;
        let segment = &project.segments[position];

        let voice_name = segment
            .selected_voice
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                ProductionError::Invalid(format!("segment '{}' has no assigned voice", segment.label))
            })?;
        if segment.content.trim().is_empty() {
            return Err(ProductionError::Invalid(format!(
                "segment '{}' has no content",
                segment.label
            )));
        }
        let profile = catalog::profile_by_name(voice_name).ok_or_else(|| {
            ProductionError::Invalid(format!(
                "segment '{}' references an unknown voice '{}'",
                segment.label, voice_name
            ))
        })?;

        let unit = SynthesisUnit {
            segment_index: position,
            text: segment.content.chars().take(PILOT_PREVIEW_CHARS).collect(),
            profile: profile.clone(),
            base_voice: base_voice_for(&profile.voice_type, profile.gender),
            performance_note: "Pilot Lock".to_string(),
        };

        let artifact = self
            .synthesis
            .synthesize_pilot(&unit, &controls, &project.dialect_id)
            .await?;
        let wav = assembler::merge(std::slice::from_ref(&artifact))?;
        let artifact_id = self.artifact_repo.store(wav);

        let mut updated = project;
        updated.segments[position].pilot_artifact_id = Some(artifact_id);
        let updated = updated.touched();
        self.project_repo.save(updated);

        tracing::info!(
            project_id = %project_id,
            segment_id = segment_id,
            artifact_id = %artifact_id,
            "pilot clip produced"
        );

        Ok(artifact_id)
    }

    pub fn progress_of(&self, project_id: Uuid) -> u8 {
        self.progress
            .read()
            .expect("progress table poisoned")
            .get(&project_id)
            .copied()
            .unwrap_or(0)
    }
}

impl ProductionService {
    fn load(&self, project_id: Uuid) -> Result<Project, ProductionError> {
        self.project_repo
            .find_by_id(project_id)
            .ok_or(ProductionError::NotFound)
    }

    fn set_progress(&self, project_id: Uuid, progress: u8) {
        self.progress
            .write()
            .expect("progress table poisoned")
            .insert(project_id, progress);
    }

    /// Failed batch: unlock the project, keep its stage, drop progress.
    /// Nothing has been stored at this point.
    fn abort(&self, project_id: Uuid) {
        if let Some(project) = self.project_repo.find_by_id(project_id) {
            let mut unlocked = project;
            unlocked.locked = false;
            self.project_repo.save(unlocked);
        }
        self.set_progress(project_id, 0);
        tracing::warn!(project_id = %project_id, "master production aborted, partial results discarded");
    }
}

/// Capture the immutable batch plan from the project's current state.
fn freeze_plan(project: &Project, controls: &VoiceControls) -> Result<SynthesisPlan, ProductionError> {
    let mut units = Vec::with_capacity(project.segments.len());
    for (index, segment) in project.segments.iter().enumerate() {
        let voice_name = segment
            .selected_voice
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                ProductionError::Invalid(format!("segment '{}' has no assigned voice", segment.label))
            })?;
        let profile = catalog::profile_by_name(voice_name).ok_or_else(|| {
            ProductionError::Invalid(format!(
                "segment '{}' references an unknown voice '{}'",
                segment.label, voice_name
            ))
        })?;
        units.push(SynthesisUnit {
            segment_index: index,
            text: segment.content.clone(),
            profile: profile.clone(),
            base_voice: base_voice_for(&profile.voice_type, profile.gender),
            performance_note: format!("Full Production: Segment {}", index + 1),
        });
    }
    Ok(SynthesisPlan {
        units,
        controls: controls.clone(),
        dialect_id: project.dialect_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioArtifact;
    use crate::domain::project::model::Segment;
    use crate::domain::synthesis::error::SynthesisServiceError;
    use crate::domain::synthesis::service::ProgressFn;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSynthesis {
        pilot_calls: AtomicUsize,
        fail_batch: bool,
        fail_pilot: bool,
    }

    impl StubSynthesis {
        fn ok() -> Self {
            Self {
                pilot_calls: AtomicUsize::new(0),
                fail_batch: false,
                fail_pilot: false,
            }
        }

        fn failing_batch() -> Self {
            Self {
                fail_batch: true,
                ..Self::ok()
            }
        }

        fn failing_pilot() -> Self {
            Self {
                fail_pilot: true,
                ..Self::ok()
            }
        }
    }

    #[async_trait]
    impl SynthesisServiceApi for StubSynthesis {
        async fn synthesize_batch(
            &self,
            plan: &SynthesisPlan,
            on_progress: &ProgressFn<'_>,
        ) -> Result<Vec<AudioArtifact>, SynthesisServiceError> {
            if self.fail_batch {
                on_progress(50);
                return Err(SynthesisServiceError::Dependency(
                    "provider unavailable".to_string(),
                ));
            }
            on_progress(100);
            Ok(plan
                .units
                .iter()
                .map(|_| AudioArtifact {
                    data: vec![0; 200], // 100 samples
                    sample_rate: 24_000,
                    channels: 1,
                })
                .collect())
        }

        async fn synthesize_pilot(
            &self,
            unit: &SynthesisUnit,
            _controls: &VoiceControls,
            _dialect_id: &str,
        ) -> Result<AudioArtifact, SynthesisServiceError> {
            self.pilot_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_pilot {
                return Err(SynthesisServiceError::Dependency(
                    "provider unavailable".to_string(),
                ));
            }
            assert!(unit.text.chars().count() <= PILOT_PREVIEW_CHARS);
            Ok(AudioArtifact {
                data: vec![0; 20],
                sample_rate: 24_000,
                channels: 1,
            })
        }
    }

    fn voiced_segment(id: u32, content: &str) -> Segment {
        Segment {
            id,
            label: format!("مقطع {id}"),
            role: "الراوي".to_string(),
            selected_voice: Some(catalog::all_profiles()[0].name.clone()),
            content: content.to_string(),
            pilot_artifact_id: None,
            final_artifact_id: None,
        }
    }

    fn ready_project() -> Project {
        let mut project = Project::new(Uuid::new_v4(), "كتاب".to_string(), "egyptian".to_string());
        project.content = "نص".to_string();
        project.segments = vec![
            voiced_segment(1, "المقطع الأول"),
            voiced_segment(2, "المقطع الثاني"),
            voiced_segment(3, "المقطع الثالث"),
        ];
        project
    }

    fn harness(synthesis: StubSynthesis) -> (ProductionService, Arc<ProjectRepository>) {
        let project_repo = Arc::new(ProjectRepository::new());
        let service = ProductionService::new(
            project_repo.clone(),
            Arc::new(ArtifactRepository::new()),
            Arc::new(synthesis),
        );
        (service, project_repo)
    }

    #[tokio::test]
    async fn test_master_success_completes_project() {
        let (service, repo) = harness(StubSynthesis::ok());
        let project = ready_project();
        repo.insert(project.clone());

        let master_id = service
            .produce_master(project.id, VoiceControls::default())
            .await
            .unwrap();

        let after = repo.find_by_id(project.id).unwrap();
        assert_eq!(after.stage, WorkflowStage::Completed);
        assert_eq!(after.master_artifact_id, Some(master_id));
        assert!(!after.locked);
        assert!(after.segments.iter().all(|s| s.final_artifact_id.is_some()));
        assert_eq!(service.progress_of(project.id), 100);

        // 3 segments of 100 samples each → 300-sample master WAV.
        let master = service.artifact_repo.find(master_id).unwrap();
        assert_eq!(master.data.len(), 44 + 2 * 300);
    }

    #[tokio::test]
    async fn test_master_failure_discards_everything() {
        let (service, repo) = harness(StubSynthesis::failing_batch());
        let project = ready_project();
        repo.insert(project.clone());

        let err = service
            .produce_master(project.id, VoiceControls::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductionError::Dependency(_)));

        let after = repo.find_by_id(project.id).unwrap();
        assert!(after.master_artifact_id.is_none());
        assert!(!after.locked);
        assert_ne!(after.stage, WorkflowStage::Completed);
        assert_ne!(service.progress_of(project.id), 100);
    }

    #[tokio::test]
    async fn test_master_rejects_missing_voice_before_any_call() {
        let (service, repo) = harness(StubSynthesis::ok());
        let mut project = ready_project();
        project.segments[1].selected_voice = None;
        repo.insert(project.clone());

        let err = service
            .produce_master(project.id, VoiceControls::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductionError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_master_rejects_when_already_locked() {
        let (service, repo) = harness(StubSynthesis::ok());
        let mut project = ready_project();
        project.locked = true;
        repo.insert(project.clone());

        let err = service
            .produce_master(project.id, VoiceControls::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductionError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_pilot_truncates_and_stores_artifact() {
        let (service, repo) = harness(StubSynthesis::ok());
        let mut project = ready_project();
        project.segments[0].content = "ن".repeat(500);
        repo.insert(project.clone());

        let artifact_id = service
            .produce_pilot(project.id, 1, VoiceControls::default())
            .await
            .unwrap();

        let after = repo.find_by_id(project.id).unwrap();
        assert_eq!(after.segments[0].pilot_artifact_id, Some(artifact_id));
        assert!(service.artifact_repo.find(artifact_id).is_some());
    }

    #[tokio::test]
    async fn test_pilot_failure_keeps_other_pilots() {
        let (service, repo) = harness(StubSynthesis::ok());
        let project = ready_project();
        repo.insert(project.clone());
        service
            .produce_pilot(project.id, 1, VoiceControls::default())
            .await
            .unwrap();

        let (failing, failing_repo) = harness(StubSynthesis::failing_pilot());
        let current = repo.find_by_id(project.id).unwrap();
        failing_repo.insert(current.clone());

        let err = failing
            .produce_pilot(project.id, 2, VoiceControls::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductionError::Dependency(_)));

        let after = failing_repo.find_by_id(project.id).unwrap();
        assert!(after.segments[0].pilot_artifact_id.is_some());
        assert!(after.segments[1].pilot_artifact_id.is_none());
    }

    #[tokio::test]
    async fn test_pilot_requires_voice_and_content() {
        let (service, repo) = harness(StubSynthesis::ok());
        let mut project = ready_project();
        project.segments[0].selected_voice = None;
        project.segments[1].content = String::new();
        repo.insert(project.clone());

        let err = service
            .produce_pilot(project.id, 1, VoiceControls::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductionError::Invalid(_)));

        let err = service
            .produce_pilot(project.id, 2, VoiceControls::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductionError::Invalid(_)));
    }
}
