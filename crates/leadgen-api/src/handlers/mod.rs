//! # Request Handlers
//!
//! Axum request handlers for the leadgen API, grouped by resource.

pub mod billing;
pub mod messages;
pub mod projects;
pub mod reddit;
pub mod scheduler;

pub use billing::{create_checkout, subscription_status};
pub use messages::{list_interactions, send_message};
pub use projects::{
    create_project, delete_project, discover_leads, get_project, list_projects, update_project,
};
pub use reddit::{reddit_callback, reddit_connect, reddit_disconnect, reddit_status};
pub use scheduler::{delete_scheduler, get_scheduler, put_scheduler};

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use leadgen_core::{Identity, LeadError, Project};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

// =============================================================================
// Health
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, store_status) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!("Store health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status.is_success() { "healthy" } else { "degraded" },
            "service": "leadgen",
            "version": env!("CARGO_PKG_VERSION"),
            "store": {
                "backend": state.store.backend_name(),
                "status": store_status,
            }
        })),
    )
}

// =============================================================================
// Shared guards
// =============================================================================

/// Load a project the caller owns. Someone else's project is reported as
/// missing.
pub(crate) async fn load_owned_project(
    state: &AppState,
    identity: &Identity,
    project_id: Uuid,
) -> ApiResult<Project> {
    match state.store.get_project(project_id).await? {
        Some(project) if project.is_owned_by(&identity.uid) => Ok(project),
        Some(_) => {
            warn!(%project_id, uid = %identity.uid, "Project access denied");
            Err(LeadError::not_found("project", project_id).into())
        }
        None => Err(LeadError::not_found("project", project_id).into()),
    }
}

/// Email the billing provider knows the caller by
pub(crate) fn billing_email(identity: &Identity) -> ApiResult<&str> {
    identity.email.as_deref().ok_or_else(|| {
        LeadError::Forbidden("account has no email address for billing".to_string()).into()
    })
}

/// Fail with 402 unless the caller has an active subscription
pub(crate) async fn require_subscription(state: &AppState, identity: &Identity) -> ApiResult<()> {
    if !state.config.require_subscription {
        return Ok(());
    }

    let email = billing_email(identity)?;
    let status = state.billing.subscription_status(email).await?;
    if status.active {
        Ok(())
    } else {
        Err(LeadError::SubscriptionRequired.into())
    }
}
