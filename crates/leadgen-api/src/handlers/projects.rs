//! Project CRUD and lead discovery.

use super::{load_owned_project, require_subscription};
use crate::auth::AuthUser;
use crate::error::{ApiResult, JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use leadgen_core::{DiscoveryResult, LeadError, NewProject, Project, ProjectUpdate};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

/// Project list response
#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<Project>,
    pub count: usize,
}

pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<ProjectList>> {
    let projects = state.store.list_projects(&identity.uid).await?;
    Ok(Json(ProjectList {
        count: projects.len(),
        projects,
    }))
}

#[instrument(skip(state, identity, input), fields(uid = %identity.uid))]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(input): JsonBody<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = state.store.create_project(&identity.uid, input).await?;
    info!("Project created: {}", project.id);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = load_owned_project(&state, &identity, project_id).await?;
    Ok(Json(project))
}

#[instrument(skip(state, identity, update))]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
    JsonBody(update): JsonBody<ProjectUpdate>,
) -> ApiResult<Json<Project>> {
    update.validate()?;
    load_owned_project(&state, &identity, project_id).await?;

    let project = state
        .store
        .update_project(project_id, update)
        .await?
        .ok_or_else(|| LeadError::not_found("project", project_id))?;

    Ok(Json(project))
}

#[instrument(skip(state, identity))]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<StatusCode> {
    load_owned_project(&state, &identity, project_id).await?;

    if !state.store.delete_project(project_id).await? {
        return Err(LeadError::not_found("project", project_id).into());
    }

    info!("Project deleted: {}", project_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Run the discovery workflow for a project
#[instrument(skip(state, identity))]
pub async fn discover_leads(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    PathParam(project_id): PathParam<Uuid>,
) -> ApiResult<Json<DiscoveryResult>> {
    let project = load_owned_project(&state, &identity, project_id).await?;
    require_subscription(&state, &identity).await?;

    let result = state.workflow.discover(&(&project).into()).await?;
    Ok(Json(result))
}
