//! Per-project scheduler settings.

use super::load_owned_project;
use crate::auth::AuthUser;
use crate::error::{ApiResult, JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use leadgen_core::{LeadError, SchedulerConfig, SchedulerUpdate};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

/// Scheduler settings plus whether they were ever saved
#[derive(Debug, Serialize)]
pub struct SchedulerResponse {
    #[serde(flatten)]
    pub config: SchedulerConfig,
    pub configured: bool,
}

pub async fn get_scheduler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<Json<SchedulerResponse>> {
    load_owned_project(&state, &identity, project_id).await?;

    let response = match state.store.get_scheduler(project_id).await? {
        Some(config) => SchedulerResponse {
            config,
            configured: true,
        },
        None => SchedulerResponse {
            config: SchedulerConfig::default_for(project_id),
            configured: false,
        },
    };

    Ok(Json(response))
}

#[instrument(skip(state, identity, update))]
pub async fn put_scheduler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
    JsonBody(update): JsonBody<SchedulerUpdate>,
) -> ApiResult<Json<SchedulerResponse>> {
    update.validate()?;
    load_owned_project(&state, &identity, project_id).await?;

    let config = state
        .store
        .upsert_scheduler(SchedulerConfig::from_update(project_id, update))
        .await?;

    Ok(Json(SchedulerResponse {
        config,
        configured: true,
    }))
}

#[instrument(skip(state, identity))]
pub async fn delete_scheduler(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    load_owned_project(&state, &identity, project_id).await?;

    if state.store.delete_scheduler(project_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(LeadError::not_found("scheduler", project_id).into())
    }
}
