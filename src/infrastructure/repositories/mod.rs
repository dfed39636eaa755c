pub mod artifact_repository;
pub mod gemini_script_repository;
pub mod gemini_speech_repository;
pub mod project_repository;
pub mod script_repository;
pub mod session_repository;
pub mod speech_repository;

pub use artifact_repository::{ArtifactRepository, StoredArtifact};
pub use gemini_script_repository::GeminiScriptRepository;
pub use gemini_speech_repository::GeminiSpeechRepository;
pub use project_repository::ProjectRepository;
pub use script_repository::ScriptRepository;
pub use session_repository::SessionRepository;
pub use speech_repository::SpeechRepository;
