//! # Stripe Billing
//!
//! Subscription Checkout Sessions and subscription lookup against the
//! Stripe REST API.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadgen_core::{
    BillingProvider, CheckoutRequest, CheckoutSession, LeadError, LeadResult, SubscriptionStatus,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe subscription billing
///
/// Uses Stripe's hosted checkout page, so card data never touches us.
pub struct StripeBilling {
    config: StripeConfig,
    client: Client,
}

impl StripeBilling {
    /// Create a new Stripe billing provider
    pub fn new(config: StripeConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> LeadResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.config.api_base_url, path))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.config.api_base_url, path))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
    }

    /// Form parameters for a subscription Checkout Session
    fn checkout_form(&self, request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            ("line_items[0][price]".to_string(), self.config.price_id.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "client_reference_id".to_string(),
                request.client_reference_id.clone(),
            ),
            (
                "metadata[user_id]".to_string(),
                request.client_reference_id.clone(),
            ),
            (
                "subscription_data[metadata][user_id]".to_string(),
                request.client_reference_id.clone(),
            ),
        ];

        if let Some(ref email) = request.customer_email {
            form_params.push(("customer_email".to_string(), email.clone()));
        }

        form_params
    }

    async fn find_customer(&self, email: &str) -> LeadResult<Option<StripeCustomer>> {
        let response = self
            .get("/v1/customers")
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        let list: StripeList<StripeCustomer> = read_json(response).await?;
        Ok(list.data.into_iter().next())
    }

    async fn list_subscriptions(&self, customer_id: &str) -> LeadResult<Vec<StripeSubscription>> {
        let response = self
            .get("/v1/subscriptions")
            .query(&[("customer", customer_id), ("status", "all"), ("limit", "10")])
            .send()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        let list: StripeList<StripeSubscription> = read_json(response).await?;
        Ok(list.data)
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    #[instrument(skip(self, request), fields(user = %request.client_reference_id))]
    async fn create_checkout(&self, request: &CheckoutRequest) -> LeadResult<CheckoutSession> {
        let form_params = self.checkout_form(request);
        let idempotency_key = Uuid::new_v4().to_string();

        debug!("Creating Stripe subscription checkout session");

        let response = self
            .post("/v1/checkout/sessions")
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| LeadError::NetworkError(e.to_string()))?;

        let session: StripeCheckoutSessionResponse = read_json(response).await?;

        let checkout_url = session.url.ok_or_else(|| {
            LeadError::provider(PROVIDER, "checkout session has no redirect URL")
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    #[instrument(skip(self, email))]
    async fn subscription_status(&self, email: &str) -> LeadResult<SubscriptionStatus> {
        let Some(customer) = self.find_customer(email).await? else {
            debug!("No Stripe customer for email");
            return Ok(SubscriptionStatus::none());
        };

        let subscriptions = self.list_subscriptions(&customer.id).await?;
        Ok(summarize_subscriptions(customer.id, subscriptions))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Pick the subscription that best describes the customer: an active one if
/// any, otherwise the first (Stripe lists newest first).
fn summarize_subscriptions(
    customer_id: String,
    subscriptions: Vec<StripeSubscription>,
) -> SubscriptionStatus {
    let chosen = subscriptions
        .iter()
        .find(|s| SubscriptionStatus::is_active_status(&s.status))
        .or_else(|| subscriptions.first());

    match chosen {
        Some(sub) => SubscriptionStatus {
            active: SubscriptionStatus::is_active_status(&sub.status),
            status: sub.status.clone(),
            customer_id: Some(customer_id),
            current_period_end: sub
                .current_period_end
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        },
        None => SubscriptionStatus {
            customer_id: Some(customer_id),
            ..SubscriptionStatus::none()
        },
    }
}

/// Read a Stripe response, mapping error bodies to `ProviderError`
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> LeadResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LeadError::NetworkError(e.to_string()))?;

    if !status.is_success() {
        error!("Stripe API error: status={}, body={}", status, body);

        if status.as_u16() == 429 {
            return Err(LeadError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after_secs: 1,
            });
        }

        // Parse Stripe error
        if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
            return Err(LeadError::provider(PROVIDER, error_response.error.message));
        }

        return Err(LeadError::provider(
            PROVIDER,
            format!("HTTP {}: {}", status, body),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        LeadError::Serialization(format!("Failed to parse Stripe response: {}", e))
    })
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    status: String,
    #[serde(default)]
    current_period_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
