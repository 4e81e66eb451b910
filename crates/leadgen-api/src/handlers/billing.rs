//! Subscription checkout and status.

use super::billing_email;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use leadgen_core::{CheckoutRequest, CheckoutSession, SubscriptionStatus};
use tracing::{info, instrument};

/// Create a hosted subscription checkout for the caller
#[instrument(skip(state, user), fields(uid = %user.0.uid))]
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<CheckoutSession>> {
    let identity = user.0;
    let email = billing_email(&identity)?;

    let request = CheckoutRequest {
        customer_email: Some(email.to_string()),
        client_reference_id: identity.uid.clone(),
        success_url: state.config.checkout_success_url(),
        cancel_url: state.config.checkout_cancel_url(),
    };

    let session = state.billing.create_checkout(&request).await?;
    info!("Checkout session created: {}", session.session_id);

    Ok(Json(session))
}

/// Subscription status for the caller's email
#[instrument(skip(state, user), fields(uid = %user.0.uid))]
pub async fn subscription_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<SubscriptionStatus>> {
    let email = billing_email(&user.0)?;
    let status = state.billing.subscription_status(email).await?;
    Ok(Json(status))
}
