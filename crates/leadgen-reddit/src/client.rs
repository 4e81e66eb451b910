//! # Reddit Client
//!
//! OAuth code flow, token refresh, identity lookup and private message
//! compose against Reddit's HTTP API.

use crate::config::RedditConfig;
use async_trait::async_trait;
use leadgen_core::{ComposeMessage, LeadError, LeadResult, RedditGateway, TokenGrant};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

const PROVIDER: &str = "reddit";

/// Reddit OAuth + messaging client
pub struct RedditClient {
    config: RedditConfig,
    client: Client,
}

impl RedditClient {
    /// Create a new Reddit client
    pub fn new(config: RedditConfig) -> LeadResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LeadError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> LeadResult<Self> {
        Self::new(RedditConfig::from_env()?)
    }

    pub fn config(&self) -> &RedditConfig {
        &self.config
    }

    /// POST to the token endpoint with client credentials
    async fn token_request(&self, form: &[(&str, &str)]) -> LeadResult<TokenGrant> {
        let url = format!("{}/api/v1/access_token", self.config.auth_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        let body = read_body(response).await?;

        // Reddit reports grant errors as 200 with an `error` field
        if let Ok(err) = serde_json::from_str::<OAuthErrorResponse>(&body) {
            warn!("Reddit token endpoint returned error: {}", err.error);
            return Err(LeadError::provider(
                PROVIDER,
                format!("token request rejected: {}", err.error),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            LeadError::Serialization(format!("Failed to parse Reddit token response: {}", e))
        })
    }
}

#[async_trait]
impl RedditGateway for RedditClient {
    fn authorize_url(&self, state: &str) -> LeadResult<String> {
        let url = Url::parse_with_params(
            &format!("{}/api/v1/authorize", self.config.auth_base_url),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("state", state),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("duration", "permanent"),
                ("scope", self.config.scopes.as_str()),
            ],
        )
        .map_err(|e| LeadError::Configuration(format!("invalid Reddit auth URL: {}", e)))?;

        Ok(url.to_string())
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> LeadResult<TokenGrant> {
        let grant = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;

        info!("Exchanged Reddit authorization code (scope={})", grant.scope);
        Ok(grant)
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_access_token(&self, refresh_token: &str) -> LeadResult<TokenGrant> {
        let grant = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        debug!("Refreshed Reddit access token, expires_in={}", grant.expires_in);
        Ok(grant)
    }

    #[instrument(skip(self, access_token))]
    async fn identity(&self, access_token: &str) -> LeadResult<String> {
        let response = self
            .client
            .get(format!("{}/api/v1/me", self.config.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        let body = read_body(response).await?;
        let me: MeResponse = serde_json::from_str(&body).map_err(|e| {
            LeadError::Serialization(format!("Failed to parse Reddit identity: {}", e))
        })?;

        Ok(me.name)
    }

    #[instrument(skip(self, access_token, message), fields(to = %message.to))]
    async fn send_message(&self, access_token: &str, message: &ComposeMessage) -> LeadResult<()> {
        let response = self
            .client
            .post(format!("{}/api/compose", self.config.api_base_url))
            .bearer_auth(access_token)
            .form(&[
                ("api_type", "json"),
                ("to", message.to.as_str()),
                ("subject", message.subject.as_str()),
                ("text", message.text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        let body = read_body(response).await?;
        let compose: ComposeResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unreadable compose response: {}", e);
            LeadError::provider(PROVIDER, format!("unexpected compose response: {}", e))
        })?;

        compose.into_result()?;

        info!("Sent Reddit message");
        Ok(())
    }
}

/// Read the body of a Reddit response, mapping HTTP failures
async fn read_body(response: Response) -> LeadResult<String> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<f64>().ok())
            .map(|secs| secs.ceil() as u64)
            .unwrap_or(60);
        return Err(LeadError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after_secs,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| LeadError::NetworkError(e.to_string()))?;

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        error!("Reddit rejected credentials: status={}", status);
        return Err(LeadError::provider(
            PROVIDER,
            format!("credentials rejected (HTTP {})", status.as_u16()),
        ));
    }

    if !status.is_success() {
        error!("Reddit API error: status={}, body={}", status, body);
        return Err(LeadError::provider(
            PROVIDER,
            format!("HTTP {}: {}", status, body),
        ));
    }

    Ok(body)
}

// =============================================================================
// Reddit API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    name: String,
}

/// `api_type=json` envelope; a body without `json` is not a confirmed send
#[derive(Debug, Deserialize)]
struct ComposeResponse {
    json: ComposeJson,
}

#[derive(Debug, Deserialize)]
struct ComposeJson {
    /// Each entry is `[CODE, message, field]`
    #[serde(default)]
    errors: Vec<Vec<serde_json::Value>>,
}

impl ComposeResponse {
    fn error_message(&self) -> Option<String> {
        let first = self.json.errors.first()?;
        let parts: Vec<&str> = first.iter().filter_map(|v| v.as_str()).take(2).collect();
        if parts.is_empty() {
            Some("unknown compose error".to_string())
        } else {
            Some(parts.join(": "))
        }
    }

    fn is_rate_limited(&self) -> bool {
        self.json
            .errors
            .first()
            .and_then(|e| e.first())
            .and_then(|code| code.as_str())
            == Some("RATELIMIT")
    }

    fn into_result(self) -> LeadResult<()> {
        let Some(message) = self.error_message() else {
            return Ok(());
        };

        warn!("Reddit rejected message: {}", message);
        if self.is_rate_limited() {
            return Err(LeadError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after_secs: retry_after_from_message(&message),
            });
        }
        Err(LeadError::provider(PROVIDER, message))
    }
}

/// Seconds from "... try again in 6 minutes." style messages, 60 when absent
fn retry_after_from_message(message: &str) -> u64 {
    let Some((_, rest)) = message.split_once("try again in ") else {
        return 60;
    };
    let mut words = rest.split_whitespace();
    let amount = words.next().and_then(|n| n.parse::<u64>().ok());
    let unit = words.next().unwrap_or("");

    match amount {
        Some(n) if unit.starts_with("minute") => n * 60,
        Some(n) if unit.starts_with("second") => n,
        Some(n) if unit.starts_with("hour") => n * 3600,
        _ => 60,
    }
}
