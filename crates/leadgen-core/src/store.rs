//! # Storage Trait
//!
//! Persistence for projects and everything hanging off them. Implementations
//! live in `leadgen-store` (Postgres and in-memory).

use crate::error::LeadResult;
use crate::interaction::{Interaction, NewInteraction};
use crate::project::{NewProject, Project, ProjectUpdate};
use crate::reddit::RedditAuth;
use crate::scheduler::SchedulerConfig;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait LeadStore: Send + Sync {
    // Projects
    async fn create_project(&self, owner_id: &str, input: NewProject) -> LeadResult<Project>;
    async fn get_project(&self, id: Uuid) -> LeadResult<Option<Project>>;
    /// Projects of an owner, newest first
    async fn list_projects(&self, owner_id: &str) -> LeadResult<Vec<Project>>;
    async fn update_project(&self, id: Uuid, update: ProjectUpdate)
        -> LeadResult<Option<Project>>;
    /// Deletes the project and everything that belongs to it
    async fn delete_project(&self, id: Uuid) -> LeadResult<bool>;

    // Scheduler
    async fn get_scheduler(&self, project_id: Uuid) -> LeadResult<Option<SchedulerConfig>>;
    async fn upsert_scheduler(&self, config: SchedulerConfig) -> LeadResult<SchedulerConfig>;
    async fn delete_scheduler(&self, project_id: Uuid) -> LeadResult<bool>;

    // Reddit credentials
    async fn get_reddit_auth(&self, project_id: Uuid) -> LeadResult<Option<RedditAuth>>;
    async fn save_reddit_auth(&self, auth: RedditAuth) -> LeadResult<RedditAuth>;
    async fn delete_reddit_auth(&self, project_id: Uuid) -> LeadResult<bool>;

    // Send history
    async fn record_interaction(&self, interaction: NewInteraction) -> LeadResult<Interaction>;
    /// Newest first
    async fn list_interactions(&self, project_id: Uuid, limit: u32)
        -> LeadResult<Vec<Interaction>>;

    /// Check the backend is reachable
    async fn health_check(&self) -> LeadResult<()>;

    /// Backend name (for logging and /health)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared store (dynamic dispatch)
pub type BoxedLeadStore = Arc<dyn LeadStore>;
