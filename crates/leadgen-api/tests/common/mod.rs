//! Test harness: the real router over `MemoryStore` with in-process fakes
//! for Firebase, Stripe, Reddit and the workflow engine.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use leadgen_api::{create_router, AppConfig, AppState, TokenVerifier};
use leadgen_core::{
    BillingProvider, CheckoutRequest, CheckoutSession, ComposeMessage, DiscoveryRequest,
    DiscoveryResult, Identity, LeadDraft, LeadError, LeadResult, LeadWorkflow, RedditGateway,
    SubredditSuggestion, SubscriptionStatus, TokenGrant,
};
use leadgen_store::MemoryStore;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const APP_URL: &str = "https://app.leadgen.test";
pub const ALICE: &str = "token-alice";
pub const BOB: &str = "token-bob";
pub const NO_EMAIL: &str = "token-no-email";

pub struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> LeadResult<Identity> {
        match token {
            ALICE => Ok(Identity::new("alice-uid").with_email("alice@example.com")),
            BOB => Ok(Identity::new("bob-uid").with_email("bob@example.com")),
            NO_EMAIL => Ok(Identity::new("anon-uid")),
            _ => Err(LeadError::Unauthorized("invalid ID token".to_string())),
        }
    }
}

pub struct FakeBilling {
    pub active: AtomicBool,
    pub checkouts: Mutex<Vec<CheckoutRequest>>,
}

#[async_trait]
impl BillingProvider for FakeBilling {
    async fn create_checkout(&self, request: &CheckoutRequest) -> LeadResult<CheckoutSession> {
        self.checkouts.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            session_id: "cs_test_123".to_string(),
            checkout_url: "https://checkout.stripe.test/c/pay/cs_test_123".to_string(),
            expires_at: None,
        })
    }

    async fn subscription_status(&self, _email: &str) -> LeadResult<SubscriptionStatus> {
        if self.active.load(Ordering::SeqCst) {
            Ok(SubscriptionStatus {
                active: true,
                status: "active".to_string(),
                customer_id: Some("cus_123".to_string()),
                current_period_end: None,
            })
        } else {
            Ok(SubscriptionStatus::none())
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeWorkflow;

#[async_trait]
impl LeadWorkflow for FakeWorkflow {
    async fn discover(&self, request: &DiscoveryRequest) -> LeadResult<DiscoveryResult> {
        Ok(DiscoveryResult {
            subreddits: vec![SubredditSuggestion {
                name: "SaaS".to_string(),
                reason: Some(format!("people looking for {}", request.product_name)),
                subscribers: Some(300_000),
            }],
            leads: vec![LeadDraft {
                username: "indiehacker42".to_string(),
                subreddit: Some("SaaS".to_string()),
                post_url: None,
                score: Some(0.9),
                message: None,
            }],
        })
    }
}

pub const GOOD_CODE: &str = "good-code";
pub const BOT_USERNAME: &str = "leadgen_bot";
pub const REFRESHED_TOKEN: &str = "refreshed-access";

#[derive(Default)]
pub struct FakeReddit {
    pub refreshes: AtomicUsize,
    pub fail_refresh: AtomicBool,
    pub fail_send: AtomicBool,
    /// (access token used, message)
    pub sent: Mutex<Vec<(String, ComposeMessage)>>,
}

#[async_trait]
impl RedditGateway for FakeReddit {
    fn authorize_url(&self, state: &str) -> LeadResult<String> {
        Ok(format!("https://reddit.test/api/v1/authorize?state={}", state))
    }

    async fn exchange_code(&self, code: &str) -> LeadResult<TokenGrant> {
        if code != GOOD_CODE {
            return Err(LeadError::provider("reddit", "invalid_grant"));
        }
        Ok(TokenGrant {
            access_token: "fresh-access".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_in: 3600,
            scope: "identity privatemessages".to_string(),
        })
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> LeadResult<TokenGrant> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(LeadError::provider("reddit", "invalid_grant"));
        }
        Ok(TokenGrant {
            access_token: REFRESHED_TOKEN.to_string(),
            refresh_token: None,
            expires_in: 3600,
            scope: String::new(),
        })
    }

    async fn identity(&self, _access_token: &str) -> LeadResult<String> {
        Ok(BOT_USERNAME.to_string())
    }

    async fn send_message(&self, access_token: &str, message: &ComposeMessage) -> LeadResult<()> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(LeadError::provider(
                "reddit",
                "USER_DOESNT_EXIST: that user doesn't exist",
            ));
        }
        self.sent
            .lock()
            .unwrap()
            .push((access_token.to_string(), message.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub billing: Arc<FakeBilling>,
    pub reddit: Arc<FakeReddit>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let billing = Arc::new(FakeBilling {
            active: AtomicBool::new(true),
            checkouts: Mutex::new(Vec::new()),
        });
        let reddit = Arc::new(FakeReddit::default());

        let state = AppState::new(
            AppConfig::new(APP_URL, "test-state-secret-0123456789abcdef"),
            store.clone(),
            billing.clone(),
            Arc::new(FakeWorkflow),
            reddit.clone(),
            Arc::new(StaticVerifier),
        );

        Self {
            router: create_router(state.clone()),
            state,
            store,
            billing,
            reddit,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            location,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a project for the token's owner and return its id
    pub async fn create_project(&self, token: &str) -> String {
        let response = self
            .post(
                "/api/v1/projects",
                token,
                serde_json::json!({
                    "product_name": "Acme",
                    "product_url": "https://acme.dev",
                    "pitch": "Outreach for solo founders",
                    "message_template": "Hi {{username}}, try {{ product_name }} at {{product_url}}"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_str().unwrap().to_string()
    }
}
