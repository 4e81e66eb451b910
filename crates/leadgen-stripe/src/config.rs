//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.

use leadgen_core::LeadError;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Recurring price the checkout subscribes to (price_...)
    pub price_id: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_PRICE_ID`
    pub fn from_env() -> Result<Self, LeadError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| LeadError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?;

        let price_id = env::var("STRIPE_PRICE_ID")
            .map_err(|_| LeadError::Configuration("STRIPE_PRICE_ID not set".to_string()))?;

        let config = Self::new(secret_key, price_id);
        config.validate()?;

        match env::var("STRIPE_API_BASE_URL") {
            Ok(url) => Ok(config.with_api_base_url(url)),
            Err(_) => Ok(config),
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>, price_id: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            price_id: price_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Check key formats
    pub fn validate(&self) -> Result<(), LeadError> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(LeadError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if !self.price_id.starts_with("price_") {
            return Err(LeadError::Configuration(
                "STRIPE_PRICE_ID must start with price_".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.starts_with("sk_live_")
    }

    /// "live", "test", or "unknown" for restricted and other key types
    pub fn mode(&self) -> &'static str {
        if self.is_live_mode() {
            "live"
        } else if self.is_test_mode() {
            "test"
        } else {
            "unknown"
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
