//! Sending private messages and the send history.

use super::{load_owned_project, require_subscription};
use crate::auth::AuthUser;
use crate::error::{ApiResult, JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use leadgen_core::{
    history_limit, normalize_recipient, render_template, ComposeMessage, Interaction,
    InteractionStatus, LeadError, LeadResult, NewInteraction, Project, RedditAuth, TemplateVars,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Send message request
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Reddit username, with or without `u/`
    pub recipient: String,
    /// Overrides the default subject
    #[serde(default)]
    pub subject: Option<String>,
    /// Overrides the project's message template
    #[serde(default)]
    pub body: Option<String>,
    /// Subreddit the lead came from, for `{{subreddit}}`
    #[serde(default)]
    pub subreddit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct InteractionList {
    pub interactions: Vec<Interaction>,
    pub count: usize,
}

/// Render and send one message from the project's connected account
#[instrument(skip(state, identity, request), fields(recipient = %request.recipient))]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> ApiResult<Json<Interaction>> {
    let project = load_owned_project(&state, &identity, project_id).await?;
    require_subscription(&state, &identity).await?;

    let mut auth = state
        .store
        .get_reddit_auth(project_id)
        .await?
        .ok_or_else(|| LeadError::Conflict("project has no connected Reddit account".to_string()))?;

    let message = compose(&project, &request)?;
    let outcome = deliver(&state, &mut auth, &message).await;

    let (status, error) = match &outcome {
        Ok(()) => (InteractionStatus::Sent, None),
        Err(e) => (InteractionStatus::Failed, Some(e.to_string())),
    };

    let interaction = state
        .store
        .record_interaction(NewInteraction {
            project_id,
            reddit_username: auth.reddit_username.clone(),
            recipient: message.to,
            subject: message.subject,
            body: message.text,
            status,
            error,
        })
        .await?;

    match outcome {
        Ok(()) => {
            info!("Message sent: {}", interaction.id);
            Ok(Json(interaction))
        }
        Err(e) => {
            warn!("Message failed: {}: {}", interaction.id, e);
            Err(e.into())
        }
    }
}

pub async fn list_interactions(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
    QueryParams(params): QueryParams<HistoryParams>,
) -> ApiResult<Json<InteractionList>> {
    load_owned_project(&state, &identity, project_id).await?;

    let interactions = state
        .store
        .list_interactions(project_id, history_limit(params.limit))
        .await?;

    Ok(Json(InteractionList {
        count: interactions.len(),
        interactions,
    }))
}

/// Fill in subject and body. Request values override the project template.
fn compose(project: &Project, request: &SendMessageRequest) -> LeadResult<ComposeMessage> {
    let recipient = normalize_recipient(&request.recipient)?;

    let mut vars = TemplateVars::new()
        .username(&recipient)
        .product_name(&project.product_name)
        .product_url(&project.product_url);
    if let Some(ref subreddit) = request.subreddit {
        vars = vars.subreddit(subreddit);
    }

    let subject = request
        .subject
        .as_deref()
        .unwrap_or(project.product_name.as_str());
    let body = request
        .body
        .as_deref()
        .unwrap_or(project.message_template.as_str());

    ComposeMessage::new(
        &recipient,
        render_template(subject, &vars),
        render_template(body, &vars),
    )
}

/// Refresh the access token if needed, then send
async fn deliver(
    state: &AppState,
    auth: &mut RedditAuth,
    message: &ComposeMessage,
) -> LeadResult<()> {
    let now = Utc::now();
    let access_token = match auth.usable_access_token(now) {
        Some(token) => token.to_string(),
        None => {
            let grant = state.reddit.refresh_access_token(&auth.refresh_token).await?;
            auth.apply_refresh(grant, now);
            *auth = state.store.save_reddit_auth(auth.clone()).await?;
            info!("Refreshed Reddit access token for u/{}", auth.reddit_username);
            auth.access_token.clone().unwrap_or_default()
        }
    };

    state.reddit.send_message(&access_token, message).await
}
