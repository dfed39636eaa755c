pub mod error;
pub mod model;
pub mod production;
pub mod service;

pub use error::{ProductionError, SynthesisServiceError};
pub use model::{SpeechRequest, SynthesisPlan, SynthesisUnit, VoiceControls};
pub use production::ProductionService;
pub use service::{SynthesisService, SynthesisServiceApi};
