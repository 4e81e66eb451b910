//! # Reddit Configuration
//!
//! OAuth application credentials, loaded from environment variables.

use leadgen_core::LeadError;
use std::env;

const DEFAULT_AUTH_BASE_URL: &str = "https://www.reddit.com";
const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";
const DEFAULT_SCOPES: &str = "identity privatemessages";

/// Reddit OAuth application configuration
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// OAuth app client id
    pub client_id: String,

    /// OAuth app secret
    pub client_secret: String,

    /// Callback URL registered with the app
    pub redirect_uri: String,

    /// Reddit requires a descriptive User-Agent on every call
    pub user_agent: String,

    /// Host for authorize/token endpoints (for testing/mocking)
    pub auth_base_url: String,

    /// Host for authenticated API calls (for testing/mocking)
    pub api_base_url: String,

    /// Requested scopes, space separated
    pub scopes: String,
}

impl RedditConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `REDDIT_CLIENT_ID`
    /// - `REDDIT_CLIENT_SECRET`
    /// - `REDDIT_REDIRECT_URI`
    ///
    /// Optional:
    /// - `REDDIT_USER_AGENT`
    pub fn from_env() -> Result<Self, LeadError> {
        dotenvy::dotenv().ok();

        let client_id = required("REDDIT_CLIENT_ID")?;
        let client_secret = required("REDDIT_CLIENT_SECRET")?;
        let redirect_uri = required("REDDIT_REDIRECT_URI")?;

        if !redirect_uri.starts_with("http://") && !redirect_uri.starts_with("https://") {
            return Err(LeadError::Configuration(
                "REDDIT_REDIRECT_URI must be an absolute http(s) URL".to_string(),
            ));
        }

        let mut config = Self::new(client_id, client_secret, redirect_uri);
        if let Ok(user_agent) = env::var("REDDIT_USER_AGENT") {
            config.user_agent = user_agent;
        }
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            user_agent: format!("server:leadgen:v{}", env!("CARGO_PKG_VERSION")),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            scopes: DEFAULT_SCOPES.to_string(),
        }
    }

    /// Builder: point both hosts at one base URL (for testing)
    pub fn with_base_urls(mut self, auth: impl Into<String>, api: impl Into<String>) -> Self {
        self.auth_base_url = auth.into();
        self.api_base_url = api.into();
        self
    }
}

fn required(name: &str) -> Result<String, LeadError> {
    env::var(name).map_err(|_| LeadError::Configuration(format!("{} not set", name)))
}
