use crate::domain::project::model::Project;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory project store. Projects live for one service lifetime; no
/// durable persistence is in scope. Every save replaces the aggregate
/// wholesale, which together with the service-layer copy-on-write keeps
/// the store the single point of truth.
pub struct ProjectRepository {
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl ProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, project: Project) {
        self.projects
            .write()
            .expect("project store poisoned")
            .insert(project.id, project);
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Project> {
        self.projects
            .read()
            .expect("project store poisoned")
            .get(&id)
            .cloned()
    }

    /// Replace the stored aggregate with this new version.
    pub fn save(&self, project: Project) {
        self.insert(project);
    }

    pub fn list(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .expect("project store poisoned")
            .values()
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.created_at);
        projects
    }
}

impl Default for ProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}
