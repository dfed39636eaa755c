use crate::domain::podcast::model::{PodcastScript, SpeakerProfile};
use crate::domain::project::model::SegmentSuggestion;
use crate::domain::voice::model::Dialect;
use async_trait::async_trait;

/// Repository for text understanding: narrative segmentation, dialect
/// adaptation and podcast script generation. The core only checks the
/// results for non-emptiness, never for semantic correctness.
#[async_trait]
pub trait ScriptRepository: Send + Sync {
    /// Split a text into ordered narrative segments with suggested roles.
    async fn analyze_segments(&self, text: &str) -> Result<Vec<SegmentSuggestion>, String>;

    /// Rewrite a text to fit the dialect's register.
    async fn enhance_text(&self, text: &str, dialect: &Dialect) -> Result<String, String>;

    /// Turn raw content into podcast turns plus a speaker roster. Already
    /// defined speakers must survive the re-analysis untouched.
    async fn generate_podcast_script(
        &self,
        content: &str,
        dialect: &Dialect,
        existing_speakers: &[SpeakerProfile],
    ) -> Result<PodcastScript, String>;
}
