//! # Lead Discovery Workflow
//!
//! Subreddit discovery, user scoring and message drafting happen in an
//! external workflow engine. This module defines the payload we send it and
//! the shape of what comes back.

use crate::error::LeadResult;
use crate::project::Project;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Payload posted to the workflow webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryRequest {
    pub project_id: Uuid,
    pub product_name: String,
    pub product_url: String,
    pub pitch: String,
    pub message_template: String,
}

impl From<&Project> for DiscoveryRequest {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.id,
            product_name: project.product_name.clone(),
            product_url: project.product_url.clone(),
            pitch: project.pitch.clone(),
            message_template: project.message_template.clone(),
        }
    }
}

/// A subreddit the workflow suggests targeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditSuggestion {
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub subscribers: Option<u64>,
}

/// A scored user with a drafted outreach message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub username: String,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub post_url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Workflow output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    #[serde(default)]
    pub subreddits: Vec<SubredditSuggestion>,
    #[serde(default)]
    pub leads: Vec<LeadDraft>,
}

/// External lead-generation workflow
#[async_trait]
pub trait LeadWorkflow: Send + Sync {
    async fn discover(&self, request: &DiscoveryRequest) -> LeadResult<DiscoveryResult>;
}

/// Type alias for a shared workflow client (dynamic dispatch)
pub type BoxedLeadWorkflow = Arc<dyn LeadWorkflow>;
