//! # Project Types
//!
//! A project describes one product a founder wants to find leads for:
//! the product name, its URL, the pitch describing the ICP, and the
//! outreach message template.

use crate::error::{LeadError, LeadResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum product name length
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
/// Maximum product URL length
pub const MAX_PRODUCT_URL_LEN: usize = 2048;
/// Maximum pitch length
pub const MAX_PITCH_LEN: usize = 5000;
/// Maximum message template length (Reddit's private message body limit)
pub const MAX_TEMPLATE_LEN: usize = 10_000;

/// A persisted project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    pub id: Uuid,

    /// Firebase uid of the owner
    pub owner_id: String,

    /// Product name
    pub product_name: String,

    /// Product landing page
    pub product_url: String,

    /// Free-form pitch / ICP description
    #[serde(default)]
    pub pitch: String,

    /// Outreach message template (see `template::render_template`)
    #[serde(default)]
    pub message_template: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a new project from validated input
    pub fn new(owner_id: impl Into<String>, input: NewProject) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            product_name: input.product_name.trim().to_string(),
            product_url: input.product_url.trim().to_string(),
            pitch: input.pitch,
            message_template: input.message_template,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check ownership
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: ProjectUpdate) {
        if let Some(name) = update.product_name {
            self.product_name = name.trim().to_string();
        }
        if let Some(url) = update.product_url {
            self.product_url = url.trim().to_string();
        }
        if let Some(pitch) = update.pitch {
            self.pitch = pitch;
        }
        if let Some(template) = update.message_template {
            self.message_template = template;
        }
        self.updated_at = Utc::now();
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    pub product_name: String,
    pub product_url: String,
    #[serde(default)]
    pub pitch: String,
    #[serde(default)]
    pub message_template: String,
}

impl NewProject {
    /// Validate all fields
    pub fn validate(&self) -> LeadResult<()> {
        validate_product_name(&self.product_name)?;
        validate_product_url(&self.product_url)?;
        validate_len("pitch", &self.pitch, MAX_PITCH_LEN)?;
        validate_len("message_template", &self.message_template, MAX_TEMPLATE_LEN)
    }
}

/// Partial update for a project; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub pitch: Option<String>,
    #[serde(default)]
    pub message_template: Option<String>,
}

impl ProjectUpdate {
    /// Validate the fields that are present
    pub fn validate(&self) -> LeadResult<()> {
        if self.is_empty() {
            return Err(LeadError::InvalidRequest(
                "update contains no fields".to_string(),
            ));
        }
        if let Some(ref name) = self.product_name {
            validate_product_name(name)?;
        }
        if let Some(ref url) = self.product_url {
            validate_product_url(url)?;
        }
        if let Some(ref pitch) = self.pitch {
            validate_len("pitch", pitch, MAX_PITCH_LEN)?;
        }
        if let Some(ref template) = self.message_template {
            validate_len("message_template", template, MAX_TEMPLATE_LEN)?;
        }
        Ok(())
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.product_url.is_none()
            && self.pitch.is_none()
            && self.message_template.is_none()
    }
}

fn validate_product_name(name: &str) -> LeadResult<()> {
    if name.trim().is_empty() {
        return Err(LeadError::InvalidRequest(
            "product_name is required".to_string(),
        ));
    }
    validate_len("product_name", name.trim(), MAX_PRODUCT_NAME_LEN)
}

fn validate_product_url(url: &str) -> LeadResult<()> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            LeadError::InvalidRequest("product_url must start with http:// or https://".to_string())
        })?;
    if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
        return Err(LeadError::InvalidRequest(format!(
            "product_url is not a valid URL: {}",
            url
        )));
    }
    validate_len("product_url", url, MAX_PRODUCT_URL_LEN)
}

pub(crate) fn validate_len(field: &str, value: &str, max: usize) -> LeadResult<()> {
    if value.chars().count() > max {
        return Err(LeadError::InvalidRequest(format!(
            "{} exceeds {} characters",
            field, max
        )));
    }
    Ok(())
}
