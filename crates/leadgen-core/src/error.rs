//! # Error Types
//!
//! Typed error handling for the leadgen service.
//! Every fallible domain operation returns `Result<T, LeadError>`.

use thiserror::Error;

/// Core error type for all leadgen operations
#[derive(Debug, Error)]
pub enum LeadError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed (e.g. no active subscription)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Caller has no active subscription
    #[error("An active subscription is required")]
    SubscriptionRequired,

    /// Entity not found (or not owned by the caller)
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Request conflicts with current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Upstream API error (Stripe, Reddit, workflow engine)
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with a provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Rate limited by provider
    #[error("Rate limited by {provider}, retry after {retry_after_secs} seconds")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// Database failure
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LeadError {
    /// Shorthand for a not-found error
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LeadError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        LeadError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LeadError::NetworkError(_)
                | LeadError::RateLimited { .. }
                | LeadError::ProviderError { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            LeadError::Configuration(_) => 500,
            LeadError::InvalidRequest(_) => 400,
            LeadError::Unauthorized(_) => 401,
            LeadError::SubscriptionRequired => 402,
            LeadError::Forbidden(_) => 403,
            LeadError::NotFound { .. } => 404,
            LeadError::Conflict(_) => 409,
            LeadError::RateLimited { .. } => 429,
            LeadError::ProviderError { .. } => 502,
            LeadError::NetworkError(_) => 503,
            LeadError::Database(_) => 500,
            LeadError::Serialization(_) => 500,
            LeadError::Internal(_) => 500,
        }
    }

    /// Whether the message is safe to show to API callers
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500 && !self.is_retryable()
    }
}

/// Result type alias for leadgen operations
pub type LeadResult<T> = Result<T, LeadError>;
