//! # Postgres Store
//!
//! `LeadStore` backed by a sqlx `PgPool`. Migrations are embedded and run
//! with [`PgStore::migrate`].

use crate::config::StoreConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadgen_core::{
    Interaction, InteractionStatus, LeadError, LeadResult, LeadStore, NewInteraction, NewProject,
    Project, ProjectUpdate, RedditAuth, SchedulerConfig, SendFrequency,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using the given configuration
    pub async fn connect(config: &StoreConfig) -> LeadResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.database_url)
            .await
            .map_err(db_err)?;

        info!(
            "Connected to Postgres (max_connections={})",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Run embedded migrations
    pub async fn migrate(&self) -> LeadResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| LeadError::Database(format!("migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }
}

fn db_err(err: sqlx::Error) -> LeadError {
    LeadError::Database(err.to_string())
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    owner_id: String,
    product_name: String,
    product_url: String,
    pitch: String,
    message_template: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            owner_id: row.owner_id,
            product_name: row.product_name,
            product_url: row.product_url,
            pitch: row.pitch,
            message_template: row.message_template,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SchedulerRow {
    project_id: Uuid,
    enabled: bool,
    frequency: String,
    messages_per_run: i32,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SchedulerRow> for SchedulerConfig {
    type Error = LeadError;

    fn try_from(row: SchedulerRow) -> LeadResult<Self> {
        Ok(SchedulerConfig {
            project_id: row.project_id,
            enabled: row.enabled,
            frequency: SendFrequency::parse(&row.frequency)?,
            messages_per_run: u32::try_from(row.messages_per_run).map_err(|_| {
                LeadError::Serialization(format!(
                    "negative messages_per_run: {}",
                    row.messages_per_run
                ))
            })?,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RedditAuthRow {
    project_id: Uuid,
    reddit_username: String,
    refresh_token: String,
    access_token: Option<String>,
    access_token_expires_at: Option<DateTime<Utc>>,
    scope: String,
    updated_at: DateTime<Utc>,
}

impl From<RedditAuthRow> for RedditAuth {
    fn from(row: RedditAuthRow) -> Self {
        RedditAuth {
            project_id: row.project_id,
            reddit_username: row.reddit_username,
            refresh_token: row.refresh_token,
            access_token: row.access_token,
            access_token_expires_at: row.access_token_expires_at,
            scope: row.scope,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InteractionRow {
    id: Uuid,
    project_id: Uuid,
    reddit_username: String,
    recipient: String,
    subject: String,
    body: String,
    status: String,
    error: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = LeadError;

    fn try_from(row: InteractionRow) -> LeadResult<Self> {
        Ok(Interaction {
            id: row.id,
            project_id: row.project_id,
            reddit_username: row.reddit_username,
            recipient: row.recipient,
            subject: row.subject,
            body: row.body,
            status: InteractionStatus::parse(&row.status)?,
            error: row.error,
            created_at: row.created_at,
        })
    }
}

const PROJECT_COLUMNS: &str =
    "id, owner_id, product_name, product_url, pitch, message_template, created_at, updated_at";

const INTERACTION_COLUMNS: &str =
    "id, project_id, reddit_username, recipient, subject, body, status, error, created_at";

// =============================================================================
// LeadStore
// =============================================================================

#[async_trait]
impl LeadStore for PgStore {
    #[instrument(skip(self, input))]
    async fn create_project(&self, owner_id: &str, input: NewProject) -> LeadResult<Project> {
        let project = Project::new(owner_id, input);

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "INSERT INTO projects ({PROJECT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.id)
        .bind(&project.owner_id)
        .bind(&project.product_name)
        .bind(&project.product_url)
        .bind(&project.pitch)
        .bind(&project.message_template)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        debug!("Inserted project {}", row.id);
        Ok(row.into())
    }

    async fn get_project(&self, id: Uuid) -> LeadResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Project::from))
    }

    async fn list_projects(&self, owner_id: &str) -> LeadResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE owner_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    #[instrument(skip(self, update))]
    async fn update_project(
        &self,
        id: Uuid,
        update: ProjectUpdate,
    ) -> LeadResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "UPDATE projects SET
                product_name     = COALESCE($2, product_name),
                product_url      = COALESCE($3, product_url),
                pitch            = COALESCE($4, pitch),
                message_template = COALESCE($5, message_template),
                updated_at       = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(update.product_name.map(|s| s.trim().to_string()))
        .bind(update.product_url.map(|s| s.trim().to_string()))
        .bind(update.pitch)
        .bind(update.message_template)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Project::from))
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, id: Uuid) -> LeadResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_scheduler(&self, project_id: Uuid) -> LeadResult<Option<SchedulerConfig>> {
        sqlx::query_as::<_, SchedulerRow>(
            "SELECT project_id, enabled, frequency, messages_per_run, updated_at
             FROM scheduler_configs WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(SchedulerConfig::try_from)
        .transpose()
    }

    #[instrument(skip(self, config), fields(project_id = %config.project_id))]
    async fn upsert_scheduler(&self, config: SchedulerConfig) -> LeadResult<SchedulerConfig> {
        let messages_per_run = i32::try_from(config.messages_per_run).map_err(|_| {
            LeadError::InvalidRequest("messages_per_run out of range".to_string())
        })?;

        let row = sqlx::query_as::<_, SchedulerRow>(
            "INSERT INTO scheduler_configs (project_id, enabled, frequency, messages_per_run, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (project_id) DO UPDATE SET
                enabled          = EXCLUDED.enabled,
                frequency        = EXCLUDED.frequency,
                messages_per_run = EXCLUDED.messages_per_run,
                updated_at       = EXCLUDED.updated_at
             RETURNING project_id, enabled, frequency, messages_per_run, updated_at",
        )
        .bind(config.project_id)
        .bind(config.enabled)
        .bind(config.frequency.as_str())
        .bind(messages_per_run)
        .bind(config.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        SchedulerConfig::try_from(row)
    }

    async fn delete_scheduler(&self, project_id: Uuid) -> LeadResult<bool> {
        let result = sqlx::query("DELETE FROM scheduler_configs WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_reddit_auth(&self, project_id: Uuid) -> LeadResult<Option<RedditAuth>> {
        let row = sqlx::query_as::<_, RedditAuthRow>(
            "SELECT project_id, reddit_username, refresh_token, access_token,
                    access_token_expires_at, scope, updated_at
             FROM reddit_auth WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(RedditAuth::from))
    }

    #[instrument(skip(self, auth), fields(project_id = %auth.project_id))]
    async fn save_reddit_auth(&self, auth: RedditAuth) -> LeadResult<RedditAuth> {
        let row = sqlx::query_as::<_, RedditAuthRow>(
            "INSERT INTO reddit_auth (project_id, reddit_username, refresh_token, access_token,
                                      access_token_expires_at, scope, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (project_id) DO UPDATE SET
                reddit_username         = EXCLUDED.reddit_username,
                refresh_token           = EXCLUDED.refresh_token,
                access_token            = EXCLUDED.access_token,
                access_token_expires_at = EXCLUDED.access_token_expires_at,
                scope                   = EXCLUDED.scope,
                updated_at              = EXCLUDED.updated_at
             RETURNING project_id, reddit_username, refresh_token, access_token,
                       access_token_expires_at, scope, updated_at",
        )
        .bind(auth.project_id)
        .bind(&auth.reddit_username)
        .bind(&auth.refresh_token)
        .bind(&auth.access_token)
        .bind(auth.access_token_expires_at)
        .bind(&auth.scope)
        .bind(auth.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn delete_reddit_auth(&self, project_id: Uuid) -> LeadResult<bool> {
        let result = sqlx::query("DELETE FROM reddit_auth WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, interaction), fields(project_id = %interaction.project_id))]
    async fn record_interaction(&self, interaction: NewInteraction) -> LeadResult<Interaction> {
        let interaction = interaction.into_interaction();

        let row = sqlx::query_as::<_, InteractionRow>(&format!(
            "INSERT INTO interactions ({INTERACTION_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {INTERACTION_COLUMNS}"
        ))
        .bind(interaction.id)
        .bind(interaction.project_id)
        .bind(&interaction.reddit_username)
        .bind(&interaction.recipient)
        .bind(&interaction.subject)
        .bind(&interaction.body)
        .bind(interaction.status.as_str())
        .bind(&interaction.error)
        .bind(interaction.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Interaction::try_from(row)
    }

    async fn list_interactions(
        &self,
        project_id: Uuid,
        limit: u32,
    ) -> LeadResult<Vec<Interaction>> {
        let rows = sqlx::query_as::<_, InteractionRow>(&format!(
            "SELECT {INTERACTION_COLUMNS} FROM interactions
             WHERE project_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(project_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Interaction::try_from).collect()
    }

    async fn health_check(&self) -> LeadResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
