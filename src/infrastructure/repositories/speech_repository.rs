use crate::domain::audio::AudioArtifact;
use crate::domain::synthesis::model::SpeechRequest;
use async_trait::async_trait;

/// Repository for speech synthesis.
/// Abstracts the underlying provider behind one opaque call.
///
/// Implementations are responsible for:
/// - Building the provider-specific performance directive
/// - Provider-specific voice selection
/// - Decoding the provider payload into raw PCM
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Synthesize one unit of text with the requested voice and controls.
    ///
    /// Returns a raw mono PCM16 artifact at the provider's sample rate.
    ///
    /// # Errors
    /// Returns error if synthesis fails or the provider returns no usable
    /// audio payload.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioArtifact, String>;
}
