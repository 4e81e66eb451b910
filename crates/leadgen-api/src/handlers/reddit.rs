//! Reddit account connection (OAuth code flow).

use super::load_owned_project;
use crate::auth::AuthUser;
use crate::error::{ApiResult, PathParam, QueryParams};
use crate::oauth_state::OAuthState;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Redirect, Json};
use chrono::{DateTime, Utc};
use leadgen_core::{LeadError, LeadResult, RedditAuth};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Connection status for a project
#[derive(Debug, Serialize)]
pub struct RedditStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reddit_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Option<RedditAuth>> for RedditStatus {
    fn from(auth: Option<RedditAuth>) -> Self {
        match auth {
            Some(auth) => Self {
                connected: true,
                reddit_username: Some(auth.reddit_username),
                scope: Some(auth.scope),
                updated_at: Some(auth.updated_at),
            },
            None => Self {
                connected: false,
                reddit_username: None,
                scope: None,
                updated_at: None,
            },
        }
    }
}

/// Where to send the user to approve access
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub authorize_url: String,
}

/// Query parameters Reddit appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub async fn reddit_status(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<Json<RedditStatus>> {
    load_owned_project(&state, &identity, project_id).await?;
    let auth = state.store.get_reddit_auth(project_id).await?;
    Ok(Json(auth.into()))
}

/// Start the OAuth flow; the state binds the grant to this project and user
#[instrument(skip(state, identity))]
pub async fn reddit_connect(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<Json<ConnectResponse>> {
    let project = load_owned_project(&state, &identity, project_id).await?;

    let signed = state
        .oauth_state
        .sign(project.id, &identity.uid, Utc::now())?;
    let authorize_url = state.reddit.authorize_url(&signed)?;

    Ok(Json(ConnectResponse { authorize_url }))
}

#[instrument(skip(state, identity))]
pub async fn reddit_disconnect(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    load_owned_project(&state, &identity, project_id).await?;

    if state.store.delete_reddit_auth(project_id).await? {
        info!("Reddit disconnected for project {}", project_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(LeadError::not_found("reddit connection", project_id).into())
    }
}

/// OAuth redirect target. Always answers with a redirect back to the app.
#[instrument(skip(state, params))]
pub async fn reddit_callback(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CallbackParams>,
) -> Redirect {
    let verified = match params.state.as_deref() {
        Some(raw) => state.oauth_state.verify(raw, Utc::now()),
        None => Err(LeadError::InvalidRequest("missing state".to_string())),
    };

    let oauth = match verified {
        Ok(oauth) => oauth,
        Err(e) => {
            warn!("Rejected Reddit callback: {}", e);
            return Redirect::to(&state.config.reddit_redirect_url(None, "error"));
        }
    };

    if let Some(reddit_error) = params.error.as_deref() {
        warn!(project_id = %oauth.project_id, "Reddit authorization declined: {}", reddit_error);
        return redirect_for(&state, &oauth, "error");
    }

    let Some(code) = params.code.as_deref() else {
        warn!(project_id = %oauth.project_id, "Reddit callback without code");
        return redirect_for(&state, &oauth, "error");
    };

    match complete_connection(&state, &oauth, code).await {
        Ok(auth) => {
            info!(
                project_id = %oauth.project_id,
                "Reddit connected as u/{}", auth.reddit_username
            );
            redirect_for(&state, &oauth, "connected")
        }
        Err(e @ LeadError::NotFound { .. }) => {
            warn!("Reddit callback for unavailable project: {}", e);
            Redirect::to(&state.config.reddit_redirect_url(None, "error"))
        }
        Err(e) => {
            error!(project_id = %oauth.project_id, "Reddit connection failed: {}", e);
            redirect_for(&state, &oauth, "error")
        }
    }
}

fn redirect_for(state: &AppState, oauth: &OAuthState, outcome: &str) -> Redirect {
    Redirect::to(
        &state
            .config
            .reddit_redirect_url(Some(oauth.project_id), outcome),
    )
}

/// Exchange the code and store the grant for a project the signer still owns
async fn complete_connection(
    state: &AppState,
    oauth: &OAuthState,
    code: &str,
) -> LeadResult<RedditAuth> {
    match state.store.get_project(oauth.project_id).await? {
        Some(project) if project.is_owned_by(&oauth.uid) => {}
        _ => return Err(LeadError::not_found("project", oauth.project_id)),
    }

    let grant = state.reddit.exchange_code(code).await?;
    let username = state.reddit.identity(&grant.access_token).await?;
    let auth = RedditAuth::from_grant(oauth.project_id, username, grant, Utc::now())?;

    state.store.save_reddit_auth(auth).await
}
