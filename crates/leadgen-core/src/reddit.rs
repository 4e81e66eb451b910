//! # Reddit Types
//!
//! OAuth credentials stored per project and the `RedditGateway` trait the
//! HTTP layer talks to. The concrete client lives in `leadgen-reddit`.

use crate::error::{LeadError, LeadResult};
use crate::project::validate_len;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Seconds of remaining lifetime below which an access token is refreshed
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

/// Reddit's subject length limit for private messages
pub const MAX_SUBJECT_LEN: usize = 100;

/// Reddit OAuth credentials for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditAuth {
    pub project_id: Uuid,

    /// Reddit account the tokens belong to
    pub reddit_username: String,

    /// Long-lived refresh token (`duration=permanent`)
    #[serde(skip_serializing)]
    pub refresh_token: String,

    /// Current access token, if any
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    pub access_token_expires_at: Option<DateTime<Utc>>,

    /// Granted scopes, space separated
    pub scope: String,

    pub updated_at: DateTime<Utc>,
}

impl RedditAuth {
    /// Build credentials from a freshly exchanged grant
    pub fn from_grant(
        project_id: Uuid,
        reddit_username: impl Into<String>,
        grant: TokenGrant,
        now: DateTime<Utc>,
    ) -> LeadResult<Self> {
        let refresh_token = grant.refresh_token.clone().ok_or_else(|| {
            LeadError::provider("reddit", "authorization grant is missing a refresh token")
        })?;

        Ok(Self {
            project_id,
            reddit_username: reddit_username.into(),
            refresh_token,
            access_token_expires_at: Some(grant.expires_at(now)),
            access_token: Some(grant.access_token),
            scope: grant.scope,
            updated_at: now,
        })
    }

    /// The access token, if it is still usable at `now`
    pub fn usable_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.access_token.as_deref()?;
        let expires_at = self.access_token_expires_at?;
        if expires_at - Duration::seconds(TOKEN_EXPIRY_SKEW_SECS) > now {
            Some(token)
        } else {
            None
        }
    }

    /// Store a refreshed grant. Reddit may omit the refresh token on
    /// refresh, in which case the current one is kept.
    pub fn apply_refresh(&mut self, grant: TokenGrant, now: DateTime<Utc>) {
        self.access_token_expires_at = Some(grant.expires_at(now));
        self.access_token = Some(grant.access_token);
        if let Some(refresh) = grant.refresh_token {
            self.refresh_token = refresh;
        }
        if !grant.scope.is_empty() {
            self.scope = grant.scope;
        }
        self.updated_at = now;
    }
}

/// Token response from Reddit's `/api/v1/access_token`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}

impl TokenGrant {
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::seconds(self.expires_in)
    }
}

/// A private message to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeMessage {
    /// Recipient username without the `u/` prefix
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl ComposeMessage {
    pub fn new(
        to: &str,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> LeadResult<Self> {
        let message = Self {
            to: normalize_recipient(to)?,
            subject: subject.into(),
            text: text.into(),
        };
        message.validate()?;
        Ok(message)
    }

    fn validate(&self) -> LeadResult<()> {
        if self.subject.trim().is_empty() {
            return Err(LeadError::InvalidRequest("subject is required".to_string()));
        }
        if self.text.trim().is_empty() {
            return Err(LeadError::InvalidRequest(
                "message body is empty".to_string(),
            ));
        }
        validate_len("subject", &self.subject, MAX_SUBJECT_LEN)?;
        validate_len("body", &self.text, crate::project::MAX_TEMPLATE_LEN)
    }
}

/// Strip `u/` or `/u/` and check Reddit's username rules
pub fn normalize_recipient(raw: &str) -> LeadResult<String> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix("/u/")
        .or_else(|| trimmed.strip_prefix("u/"))
        .unwrap_or(trimmed);

    let valid_len = (3..=20).contains(&name.len());
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if !valid_len || !valid_chars {
        return Err(LeadError::InvalidRequest(format!(
            "invalid Reddit username: {}",
            raw
        )));
    }
    Ok(name.to_string())
}

/// Reddit OAuth and messaging operations
#[async_trait]
pub trait RedditGateway: Send + Sync {
    /// URL the user is sent to for granting access
    fn authorize_url(&self, state: &str) -> LeadResult<String>;

    /// Exchange an authorization code for tokens
    async fn exchange_code(&self, code: &str) -> LeadResult<TokenGrant>;

    /// Get a new access token from a refresh token
    async fn refresh_access_token(&self, refresh_token: &str) -> LeadResult<TokenGrant>;

    /// Username of the account owning the access token
    async fn identity(&self, access_token: &str) -> LeadResult<String>;

    /// Send a private message
    async fn send_message(&self, access_token: &str, message: &ComposeMessage) -> LeadResult<()>;
}

/// Type alias for a shared Reddit gateway (dynamic dispatch)
pub type BoxedRedditGateway = Arc<dyn RedditGateway>;

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(expires_in: i64, refresh: Option<&str>) -> TokenGrant {
        TokenGrant {
            access_token: "access-1".to_string(),
            refresh_token: refresh.map(String::from),
            expires_in,
            scope: "identity privatemessages".to_string(),
        }
    }

    #[test]
    fn test_from_grant_requires_refresh_token() {
        let now = Utc::now();
        assert!(RedditAuth::from_grant(Uuid::new_v4(), "founder", grant(3600, None), now).is_err());

        let auth =
            RedditAuth::from_grant(Uuid::new_v4(), "founder", grant(3600, Some("r-1")), now)
                .unwrap();
        assert_eq!(auth.refresh_token, "r-1");
        assert_eq!(auth.usable_access_token(now), Some("access-1"));
    }

    #[test]
    fn test_token_expiry_with_skew() {
        let now = Utc::now();
        let auth =
            RedditAuth::from_grant(Uuid::new_v4(), "founder", grant(3600, Some("r-1")), now)
                .unwrap();

        assert!(auth.usable_access_token(now + Duration::seconds(3500)).is_some());
        // Inside the skew window
        assert!(auth.usable_access_token(now + Duration::seconds(3550)).is_none());
        assert!(auth.usable_access_token(now + Duration::seconds(7200)).is_none());
    }

    #[test]
    fn test_apply_refresh_keeps_refresh_token() {
        let now = Utc::now();
        let mut auth =
            RedditAuth::from_grant(Uuid::new_v4(), "founder", grant(10, Some("r-1")), now)
                .unwrap();

        let later = now + Duration::hours(2);
        let mut refreshed = grant(3600, None);
        refreshed.access_token = "access-2".to_string();
        auth.apply_refresh(refreshed, later);

        assert_eq!(auth.refresh_token, "r-1");
        assert_eq!(auth.usable_access_token(later), Some("access-2"));

        let mut rotated = grant(3600, Some("r-2"));
        rotated.access_token = "access-3".to_string();
        auth.apply_refresh(rotated, later);
        assert_eq!(auth.refresh_token, "r-2");
    }

    #[test]
    fn test_tokens_not_serialized() {
        let auth = RedditAuth::from_grant(
            Uuid::new_v4(),
            "founder",
            grant(3600, Some("secret-refresh")),
            Utc::now(),
        )
        .unwrap();
        let json = serde_json::to_string(&auth).unwrap();
        assert!(!json.contains("secret-refresh"));
        assert!(!json.contains("access-1"));
        assert!(json.contains("founder"));
    }

    #[test]
    fn test_normalize_recipient() {
        assert_eq!(normalize_recipient("u/spez").unwrap(), "spez");
        assert_eq!(normalize_recipient("/u/some_user-1").unwrap(), "some_user-1");
        assert_eq!(normalize_recipient(" founder ").unwrap(), "founder");
        assert!(normalize_recipient("ab").is_err());
        assert!(normalize_recipient("has space").is_err());
        assert!(normalize_recipient("a".repeat(21).as_str()).is_err());
    }

    #[test]
    fn test_compose_validation() {
        assert!(ComposeMessage::new("u/spez", "Hi", "Hello there").is_ok());
        assert!(ComposeMessage::new("u/spez", "", "Hello there").is_err());
        assert!(ComposeMessage::new("u/spez", "x".repeat(101), "Hello").is_err());
        assert!(ComposeMessage::new("u/spez", "Hi", "   ").is_err());
    }
}
