//! # leadgen-workflow
//!
//! Client for the external workflow engine that discovers subreddits,
//! scores users and drafts outreach messages. We POST the project and get
//! the results back in the same response.

use async_trait::async_trait;
use leadgen_core::{DiscoveryRequest, DiscoveryResult, LeadError, LeadResult, LeadWorkflow};
use reqwest::Client;
use std::env;
use std::time::Duration;
use tracing::{error, info, instrument};

const PROVIDER: &str = "workflow";

/// Header carrying the shared webhook secret
pub const SECRET_HEADER: &str = "X-Webhook-Secret";

/// Default request timeout; discovery runs an LLM pipeline and is slow
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Workflow webhook configuration
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Webhook URL that starts the discovery workflow
    pub webhook_url: String,

    /// Optional shared secret sent in `X-Webhook-Secret`
    pub webhook_secret: Option<String>,

    /// Request timeout
    pub timeout: Duration,
}

impl WorkflowConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `WORKFLOW_WEBHOOK_URL`
    ///
    /// Optional:
    /// - `WORKFLOW_WEBHOOK_SECRET`
    /// - `WORKFLOW_TIMEOUT_SECS` (default 120)
    pub fn from_env() -> Result<Self, LeadError> {
        dotenvy::dotenv().ok();

        let webhook_url = env::var("WORKFLOW_WEBHOOK_URL")
            .map_err(|_| LeadError::Configuration("WORKFLOW_WEBHOOK_URL not set".to_string()))?;

        if !webhook_url.starts_with("http://") && !webhook_url.starts_with("https://") {
            return Err(LeadError::Configuration(
                "WORKFLOW_WEBHOOK_URL must be an http(s) URL".to_string(),
            ));
        }

        let timeout_secs = env::var("WORKFLOW_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            webhook_url,
            webhook_secret: env::var("WORKFLOW_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            webhook_secret: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builder: set shared secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }
}

/// Workflow webhook client
pub struct WorkflowClient {
    config: WorkflowConfig,
    client: Client,
}

impl WorkflowClient {
    pub fn new(config: WorkflowConfig) -> LeadResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LeadError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> LeadResult<Self> {
        Self::new(WorkflowConfig::from_env()?)
    }
}

#[async_trait]
impl LeadWorkflow for WorkflowClient {
    #[instrument(skip(self, request), fields(project_id = %request.project_id))]
    async fn discover(&self, request: &DiscoveryRequest) -> LeadResult<DiscoveryResult> {
        let mut builder = self.client.post(&self.config.webhook_url).json(request);
        if let Some(ref secret) = self.config.webhook_secret {
            builder = builder.header(SECRET_HEADER, secret);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LeadError::provider(PROVIDER, "workflow timed out")
            } else {
                LeadError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Workflow webhook error: status={}, body={}", status, body);
            return Err(LeadError::provider(
                PROVIDER,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let result: DiscoveryResult = serde_json::from_str(&body).map_err(|e| {
            LeadError::provider(PROVIDER, format!("unexpected response body: {}", e))
        })?;

        info!(
            "Workflow returned {} subreddits, {} leads",
            result.subreddits.len(),
            result.leads.len()
        );
        Ok(result)
    }
}
