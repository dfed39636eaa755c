use super::error::SynthesisServiceError;
use super::model::{SpeechRequest, SynthesisPlan, SynthesisUnit, VoiceControls};
use crate::domain::audio::AudioArtifact;
use crate::infrastructure::repositories::SpeechRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Progress callback: receives the rounded percentage after each unit.
pub type ProgressFn<'a> = dyn Fn(u8) + Send + Sync + 'a;

pub struct SynthesisService {
    speech_repo: Arc<dyn SpeechRepository>,
    pilot_cache: Option<Cache<String, AudioArtifact>>,
}

impl SynthesisService {
    pub fn new(speech_repo: Arc<dyn SpeechRepository>, pilot_cache_enabled: bool) -> Self {
        let pilot_cache = if pilot_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self {
            speech_repo,
            pilot_cache,
        }
    }

    fn request_for(&self, unit: &SynthesisUnit, controls: &VoiceControls, dialect_id: &str) -> SpeechRequest {
        SpeechRequest {
            text: unit.text.clone(),
            base_voice: unit.base_voice,
            profile: unit.profile.clone(),
            controls: controls.clone(),
            dialect_id: dialect_id.to_string(),
            performance_note: unit.performance_note.clone(),
        }
    }
}

#[async_trait]
pub trait SynthesisServiceApi: Send + Sync {
    /// Run a frozen plan to completion, strictly in order, one request in
    /// flight at a time.
    ///
    /// Progress is reported as `round(100·k/N)` after each unit; emitted
    /// values strictly increase and hit exactly 100 only when the last
    /// unit has succeeded. Any unit failure aborts the whole batch and
    /// discards every result gathered so far. Returned artifacts are
    /// ordered by their originating segment index.
    async fn synthesize_batch(
        &self,
        plan: &SynthesisPlan,
        on_progress: &ProgressFn<'_>,
    ) -> Result<Vec<AudioArtifact>, SynthesisServiceError>;

    /// Synthesize one unit in isolation. Failure here has no effect on
    /// any other unit's previously generated audio.
    async fn synthesize_pilot(
        &self,
        unit: &SynthesisUnit,
        controls: &VoiceControls,
        dialect_id: &str,
    ) -> Result<AudioArtifact, SynthesisServiceError>;
}

#[async_trait]
impl SynthesisServiceApi for SynthesisService {
    async fn synthesize_batch(
        &self,
        plan: &SynthesisPlan,
        on_progress: &ProgressFn<'_>,
    ) -> Result<Vec<AudioArtifact>, SynthesisServiceError> {
        let total = plan.units.len();
        if total == 0 {
            return Err(SynthesisServiceError::Invalid(
                "synthesis plan contains no units".to_string(),
            ));
        }

        tracing::info!(unit_count = total, dialect = %plan.dialect_id, "starting synthesis batch");

        let mut results: Vec<(usize, AudioArtifact)> = Vec::with_capacity(total);
        let mut last_progress = 0u8;

        for (completed, unit) in plan.units.iter().enumerate() {
            tracing::info!(
                segment_index = unit.segment_index,
                voice = %unit.profile.name,
                text_length = unit.text.len(),
                "synthesizing unit"
            );

            let request = self.request_for(unit, &plan.controls, &plan.dialect_id);
            let artifact = self
                .speech_repo
                .synthesize(&request)
                .await
                .map_err(SynthesisServiceError::Dependency)?;

            results.push((unit.segment_index, artifact));

            let progress = (((completed + 1) as f64 / total as f64) * 100.0).round() as u8;
            if progress > last_progress {
                last_progress = progress;
                on_progress(progress);
            }
        }

        // Explicit ordering by origin, independent of arrival order.
        results.sort_by_key(|(index, _)| *index);

        tracing::info!(unit_count = total, "synthesis batch completed");

        Ok(results.into_iter().map(|(_, artifact)| artifact).collect())
    }

    async fn synthesize_pilot(
        &self,
        unit: &SynthesisUnit,
        controls: &VoiceControls,
        dialect_id: &str,
    ) -> Result<AudioArtifact, SynthesisServiceError> {
        if unit.text.trim().is_empty() {
            return Err(SynthesisServiceError::Invalid(
                "pilot text is empty".to_string(),
            ));
        }

        let cache_key = format!("{}:{}", unit.profile.id, unit.text);
        if let Some(cache) = &self.pilot_cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::info!(
                    voice = %unit.profile.name,
                    cached_bytes = cached.data.len(),
                    "pilot cache hit"
                );
                return Ok(cached);
            }
        }

        let request = self.request_for(unit, controls, dialect_id);
        let artifact = self
            .speech_repo
            .synthesize(&request)
            .await
            .map_err(SynthesisServiceError::Dependency)?;

        if let Some(cache) = &self.pilot_cache {
            cache.insert(cache_key, artifact.clone()).await;
        }

        Ok(artifact)
    }
}
