use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// One finished, downloadable audio file.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub created_at: DateTime<Utc>,
}

/// In-memory store for finished WAV artifacts, keyed by id and served
/// over the artifact endpoint for playback and download.
pub struct ArtifactRepository {
    artifacts: RwLock<HashMap<Uuid, StoredArtifact>>,
}

impl ArtifactRepository {
    pub fn new() -> Self {
        Self {
            artifacts: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self, data: Vec<u8>) -> Uuid {
        let id = Uuid::new_v4();
        let artifact = StoredArtifact {
            data,
            content_type: "audio/wav",
            created_at: Utc::now(),
        };
        self.artifacts
            .write()
            .expect("artifact store poisoned")
            .insert(id, artifact);
        id
    }

    pub fn find(&self, id: Uuid) -> Option<StoredArtifact> {
        self.artifacts
            .read()
            .expect("artifact store poisoned")
            .get(&id)
            .cloned()
    }
}

impl Default for ArtifactRepository {
    fn default() -> Self {
        Self::new()
    }
}
