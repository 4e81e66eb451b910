//! # Scheduler Configuration
//!
//! Per-project send schedule. Stored one-to-one with a project; nothing in
//! this service acts on it in the background.

use crate::error::{LeadError, LeadResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on messages sent per scheduled run
pub const MAX_MESSAGES_PER_RUN: u32 = 50;

/// How often scheduled sends happen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendFrequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
}

impl SendFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendFrequency::Hourly => "hourly",
            SendFrequency::Daily => "daily",
            SendFrequency::Weekly => "weekly",
        }
    }

    /// Parse the persisted representation
    pub fn parse(value: &str) -> LeadResult<Self> {
        match value {
            "hourly" => Ok(SendFrequency::Hourly),
            "daily" => Ok(SendFrequency::Daily),
            "weekly" => Ok(SendFrequency::Weekly),
            other => Err(LeadError::Serialization(format!(
                "unknown send frequency: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SendFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduler settings for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub project_id: Uuid,
    pub enabled: bool,
    pub frequency: SendFrequency,
    pub messages_per_run: u32,
    pub updated_at: DateTime<Utc>,
}

impl SchedulerConfig {
    /// Settings reported for a project that has none stored
    pub fn default_for(project_id: Uuid) -> Self {
        Self {
            project_id,
            enabled: false,
            frequency: SendFrequency::default(),
            messages_per_run: 5,
            updated_at: Utc::now(),
        }
    }

    /// Build a config from a validated update request
    pub fn from_update(project_id: Uuid, update: SchedulerUpdate) -> Self {
        Self {
            project_id,
            enabled: update.enabled,
            frequency: update.frequency,
            messages_per_run: update.messages_per_run,
            updated_at: Utc::now(),
        }
    }
}

/// Body of a scheduler PUT
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerUpdate {
    pub enabled: bool,
    #[serde(default)]
    pub frequency: SendFrequency,
    pub messages_per_run: u32,
}

impl SchedulerUpdate {
    pub fn validate(&self) -> LeadResult<()> {
        if self.messages_per_run == 0 || self.messages_per_run > MAX_MESSAGES_PER_RUN {
            return Err(LeadError::InvalidRequest(format!(
                "messages_per_run must be between 1 and {}",
                MAX_MESSAGES_PER_RUN
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse() {
        for freq in [SendFrequency::Hourly, SendFrequency::Daily, SendFrequency::Weekly] {
            assert_eq!(SendFrequency::parse(freq.as_str()).unwrap(), freq);
        }
        assert!(SendFrequency::parse("monthly").is_err());
    }

    #[test]
    fn test_update_bounds() {
        let mut update = SchedulerUpdate {
            enabled: true,
            frequency: SendFrequency::Hourly,
            messages_per_run: 0,
        };
        assert!(update.validate().is_err());

        update.messages_per_run = MAX_MESSAGES_PER_RUN;
        assert!(update.validate().is_ok());

        update.messages_per_run = MAX_MESSAGES_PER_RUN + 1;
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_frequency_defaults_to_daily() {
        let update: SchedulerUpdate =
            serde_json::from_str(r#"{"enabled": true, "messages_per_run": 3}"#).unwrap();
        assert_eq!(update.frequency, SendFrequency::Daily);
        assert_eq!(SendFrequency::default(), SendFrequency::Daily);
    }

    #[test]
    fn test_default_config_is_disabled() {
        let config = SchedulerConfig::default_for(Uuid::new_v4());
        assert!(!config.enabled);
        assert_eq!(config.messages_per_run, 5);
        assert_eq!(config.frequency, SendFrequency::Daily);
    }
}
