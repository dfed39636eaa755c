use crate::domain::podcast::model::PodcastSession;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory podcast session store, same wholesale-replacement contract
/// as the project store.
pub struct SessionRepository {
    sessions: RwLock<HashMap<Uuid, PodcastSession>>,
}

impl SessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, session: PodcastSession) {
        self.sessions
            .write()
            .expect("session store poisoned")
            .insert(session.id, session);
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<PodcastSession> {
        self.sessions
            .read()
            .expect("session store poisoned")
            .get(&id)
            .cloned()
    }

    pub fn save(&self, session: PodcastSession) {
        self.insert(session);
    }
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new()
    }
}
