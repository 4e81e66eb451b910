//! # Application State
//!
//! Shared state for the Axum application.

use crate::auth::{BoxedTokenVerifier, FirebaseVerifier};
use crate::oauth_state::OAuthStateSigner;
use leadgen_core::{
    BillingProvider, BoxedBillingProvider, BoxedLeadStore, BoxedLeadWorkflow, BoxedRedditGateway,
    LeadError, LeadResult,
};
use leadgen_reddit::RedditClient;
use leadgen_store::{MemoryStore, PgStore, StoreConfig};
use leadgen_stripe::StripeBilling;
use leadgen_workflow::WorkflowClient;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Minimum OAuth state secret length in production
pub const MIN_STATE_SECRET_LEN: usize = 32;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Public base URL of this API
    pub base_url: String,

    /// Frontend URL; checkout and OAuth redirects land here
    pub app_url: String,

    /// Environment (development, staging, production)
    pub environment: String,

    /// Gate discovery and sending on an active subscription
    pub require_subscription: bool,

    /// HMAC key for the Reddit OAuth `state` parameter
    pub oauth_state_secret: String,
}

impl AppConfig {
    /// Load from environment
    pub fn from_env() -> LeadResult<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let oauth_state_secret = env::var("OAUTH_STATE_SECRET")
            .map_err(|_| LeadError::Configuration("OAUTH_STATE_SECRET not set".to_string()))?;

        let config = Self {
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://{}:{}", host, port)),
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            require_subscription: env::var("REQUIRE_SUBSCRIPTION")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            host,
            port,
            environment,
            oauth_state_secret,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(app_url: impl Into<String>, oauth_state_secret: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: "http://127.0.0.1:8080".to_string(),
            app_url: app_url.into(),
            environment: "development".to_string(),
            require_subscription: true,
            oauth_state_secret: oauth_state_secret.into(),
        }
    }

    /// Builder: toggle the subscription gate
    pub fn with_require_subscription(mut self, require: bool) -> Self {
        self.require_subscription = require;
        self
    }

    pub fn validate(&self) -> LeadResult<()> {
        if self.oauth_state_secret.is_empty() {
            return Err(LeadError::Configuration(
                "OAUTH_STATE_SECRET is empty".to_string(),
            ));
        }
        if self.is_production() && self.oauth_state_secret.len() < MIN_STATE_SECRET_LEN {
            return Err(LeadError::Configuration(format!(
                "OAUTH_STATE_SECRET must be at least {} bytes in production",
                MIN_STATE_SECRET_LEN
            )));
        }
        Ok(())
    }

    /// Get socket address
    pub fn socket_addr(&self) -> LeadResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| LeadError::Configuration(format!("Invalid HOST/PORT: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Stripe success redirect
    pub fn checkout_success_url(&self) -> String {
        format!(
            "{}/billing/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.app_url
        )
    }

    /// Stripe cancel redirect
    pub fn checkout_cancel_url(&self) -> String {
        format!("{}/billing/cancel", self.app_url)
    }

    /// Frontend page for a project, with the Reddit connection outcome
    pub fn reddit_redirect_url(&self, project_id: Option<Uuid>, outcome: &str) -> String {
        match project_id {
            Some(id) => format!("{}/projects/{}?reddit={}", self.app_url, id, outcome),
            None => format!("{}/?reddit={}", self.app_url, outcome),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Persistence
    pub store: BoxedLeadStore,

    /// Subscription billing
    pub billing: BoxedBillingProvider,

    /// Lead discovery workflow
    pub workflow: BoxedLeadWorkflow,

    /// Reddit OAuth and messaging
    pub reddit: BoxedRedditGateway,

    /// ID token verification
    pub verifier: BoxedTokenVerifier,

    /// OAuth `state` signing
    pub oauth_state: OAuthStateSigner,
}

impl AppState {
    /// Wire the state from explicit collaborators
    pub fn new(
        config: AppConfig,
        store: BoxedLeadStore,
        billing: BoxedBillingProvider,
        workflow: BoxedLeadWorkflow,
        reddit: BoxedRedditGateway,
        verifier: BoxedTokenVerifier,
    ) -> Self {
        let oauth_state = OAuthStateSigner::new(config.oauth_state_secret.as_bytes());
        Self {
            config,
            store,
            billing,
            workflow,
            reddit,
            verifier,
            oauth_state,
        }
    }

    /// Build the production state from environment variables.
    ///
    /// Falls back to the in-memory store when `DATABASE_URL` is unset
    /// outside production.
    pub async fn from_env() -> LeadResult<Self> {
        let config = AppConfig::from_env()?;

        let store: BoxedLeadStore = match StoreConfig::from_env() {
            Ok(store_config) => {
                let store = PgStore::connect(&store_config).await?;
                store.migrate().await?;
                Arc::new(store)
            }
            Err(e) if config.is_production() => return Err(e),
            Err(e) => {
                warn!("{}; using in-memory store", e);
                Arc::new(MemoryStore::new())
            }
        };

        let billing = Arc::new(StripeBilling::from_env()?);
        let workflow = Arc::new(WorkflowClient::from_env()?);
        let reddit = Arc::new(RedditClient::from_env()?);
        let verifier = Arc::new(FirebaseVerifier::from_env()?);

        let stripe_mode = billing.config().mode();
        if config.is_production() && !billing.config().is_live_mode() {
            warn!("Stripe is in {} mode in production", stripe_mode);
        }

        info!(
            "Store: {}, billing: {} ({} mode), reddit user agent: {}",
            store.backend_name(),
            billing.provider_name(),
            stripe_mode,
            reddit.config().user_agent
        );

        Ok(Self::new(config, store, billing, workflow, reddit, verifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::new("http://localhost:3000", "secret");
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_short_secret_rejected_in_production() {
        let mut config = AppConfig::new("http://localhost:3000", "short");
        assert!(config.validate().is_ok());

        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.oauth_state_secret = "x".repeat(MIN_STATE_SECRET_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redirect_urls() {
        let config = AppConfig::new("https://app.example.com", "secret");
        let id = Uuid::nil();
        assert_eq!(
            config.reddit_redirect_url(Some(id), "connected"),
            format!("https://app.example.com/projects/{}?reddit=connected", id)
        );
        assert_eq!(
            config.reddit_redirect_url(None, "error"),
            "https://app.example.com/?reddit=error"
        );
        assert!(config
            .checkout_success_url()
            .ends_with("session_id={CHECKOUT_SESSION_ID}"));
    }
}
