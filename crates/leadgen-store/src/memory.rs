//! # In-Memory Store
//!
//! `LeadStore` kept in process memory. Used by tests and for running the
//! API locally without Postgres. Same ordering and cascade rules as the
//! Postgres schema.

use async_trait::async_trait;
use leadgen_core::{
    Interaction, LeadResult, LeadStore, NewInteraction, NewProject, Project, ProjectUpdate,
    RedditAuth, SchedulerConfig,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    projects: HashMap<Uuid, Project>,
    schedulers: HashMap<Uuid, SchedulerConfig>,
    reddit_auth: HashMap<Uuid, RedditAuth>,
    interactions: Vec<Interaction>,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn create_project(&self, owner_id: &str, input: NewProject) -> LeadResult<Project> {
        let project = Project::new(owner_id, input);
        self.tables
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> LeadResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self, owner_id: &str) -> LeadResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| p.is_owned_by(owner_id))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: Uuid,
        update: ProjectUpdate,
    ) -> LeadResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.get_mut(&id).map(|project| {
            project.apply(update);
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> LeadResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.projects.remove(&id).is_some();
        if removed {
            tables.schedulers.remove(&id);
            tables.reddit_auth.remove(&id);
            tables.interactions.retain(|i| i.project_id != id);
        }
        Ok(removed)
    }

    async fn get_scheduler(&self, project_id: Uuid) -> LeadResult<Option<SchedulerConfig>> {
        Ok(self.tables.read().await.schedulers.get(&project_id).cloned())
    }

    async fn upsert_scheduler(&self, config: SchedulerConfig) -> LeadResult<SchedulerConfig> {
        self.tables
            .write()
            .await
            .schedulers
            .insert(config.project_id, config.clone());
        Ok(config)
    }

    async fn delete_scheduler(&self, project_id: Uuid) -> LeadResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .schedulers
            .remove(&project_id)
            .is_some())
    }

    async fn get_reddit_auth(&self, project_id: Uuid) -> LeadResult<Option<RedditAuth>> {
        Ok(self.tables.read().await.reddit_auth.get(&project_id).cloned())
    }

    async fn save_reddit_auth(&self, auth: RedditAuth) -> LeadResult<RedditAuth> {
        self.tables
            .write()
            .await
            .reddit_auth
            .insert(auth.project_id, auth.clone());
        Ok(auth)
    }

    async fn delete_reddit_auth(&self, project_id: Uuid) -> LeadResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .reddit_auth
            .remove(&project_id)
            .is_some())
    }

    async fn record_interaction(&self, interaction: NewInteraction) -> LeadResult<Interaction> {
        let interaction = interaction.into_interaction();
        self.tables
            .write()
            .await
            .interactions
            .push(interaction.clone());
        Ok(interaction)
    }

    async fn list_interactions(
        &self,
        project_id: Uuid,
        limit: u32,
    ) -> LeadResult<Vec<Interaction>> {
        let tables = self.tables.read().await;
        // Appended in time order, so newest first is a reverse walk
        Ok(tables
            .interactions
            .iter()
            .rev()
            .filter(|i| i.project_id == project_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> LeadResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
