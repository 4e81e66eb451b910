//! # Interaction Log
//!
//! One row per message send attempt.

use crate::error::{LeadError, LeadResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStatus {
    Sent,
    Failed,
}

impl InteractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionStatus::Sent => "sent",
            InteractionStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> LeadResult<Self> {
        match value {
            "sent" => Ok(InteractionStatus::Sent),
            "failed" => Ok(InteractionStatus::Failed),
            other => Err(LeadError::Serialization(format!(
                "unknown interaction status: {}",
                other
            ))),
        }
    }
}

/// A recorded send attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Sending Reddit account
    pub reddit_username: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: InteractionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an interaction
#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub project_id: Uuid,
    pub reddit_username: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: InteractionStatus,
    pub error: Option<String>,
}

impl NewInteraction {
    pub fn into_interaction(self) -> Interaction {
        Interaction {
            id: Uuid::new_v4(),
            project_id: self.project_id,
            reddit_username: self.reddit_username,
            recipient: self.recipient,
            subject: self.subject,
            body: self.body,
            status: self.status,
            error: self.error,
            created_at: Utc::now(),
        }
    }
}

/// Default page size for interaction history
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
/// Maximum page size for interaction history
pub const MAX_HISTORY_LIMIT: u32 = 200;

/// Clamp a requested page size into `1..=MAX_HISTORY_LIMIT`
pub fn history_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}
