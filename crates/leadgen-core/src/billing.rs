//! # Billing Strategy Trait
//!
//! Subscription billing is delegated to a provider (Stripe). The HTTP layer
//! only needs two things: a hosted checkout URL, and whether a customer
//! currently pays.
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │          BillingProvider (trait)          │
//! │  ├── create_checkout()                    │
//! │  ├── subscription_status()                │
//! │  └── provider_name()                      │
//! └───────────────────────────────────────────┘
//!                      ▲
//!              ┌───────┴───────┐
//!              │ StripeBilling │
//!              └───────────────┘
//! ```

use crate::error::LeadResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request for a subscription checkout session
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Prefilled customer email
    pub customer_email: Option<String>,
    /// Our user id, echoed back by the provider
    pub client_reference_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A hosted checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    /// Redirect the user here
    pub checkout_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Subscription state for a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub active: bool,
    /// Provider status string (`active`, `trialing`, `past_due`, ..., or `none`)
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<DateTime<Utc>>,
}

impl SubscriptionStatus {
    /// No customer record exists
    pub fn none() -> Self {
        Self {
            active: false,
            status: "none".to_string(),
            customer_id: None,
            current_period_end: None,
        }
    }

    /// Whether a provider status grants access
    pub fn is_active_status(status: &str) -> bool {
        matches!(status, "active" | "trialing")
    }
}

/// Core trait for billing provider implementations.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Create a subscription checkout session and return the redirect URL.
    async fn create_checkout(&self, request: &CheckoutRequest) -> LeadResult<CheckoutSession>;

    /// Look up the subscription state of the customer with this email.
    async fn subscription_status(&self, email: &str) -> LeadResult<SubscriptionStatus>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared billing provider (dynamic dispatch)
pub type BoxedBillingProvider = Arc<dyn BillingProvider>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(SubscriptionStatus::is_active_status("active"));
        assert!(SubscriptionStatus::is_active_status("trialing"));
        assert!(!SubscriptionStatus::is_active_status("past_due"));
        assert!(!SubscriptionStatus::is_active_status("canceled"));
    }

    #[test]
    fn test_none_status() {
        let status = SubscriptionStatus::none();
        assert!(!status.active);
        assert_eq!(status.status, "none");
    }
}
