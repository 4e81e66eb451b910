//! # leadgen
//!
//! Reddit lead generation and outreach API.
//!
//! ## Usage
//!
//! ```bash
//! export DATABASE_URL=postgres://localhost/leadgen
//! export OAUTH_STATE_SECRET=...
//! export FIREBASE_PROJECT_ID=...
//! export STRIPE_SECRET_KEY=sk_test_... STRIPE_PRICE_ID=price_...
//! export REDDIT_CLIENT_ID=... REDDIT_CLIENT_SECRET=... REDDIT_REDIRECT_URI=...
//! export WORKFLOW_WEBHOOK_URL=...
//!
//! leadgen
//! ```

use leadgen_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    print_banner();

    let state = AppState::from_env().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Subscription required: {}", state.config.require_subscription);

    let app = routes::create_router(state);

    info!("leadgen starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Projects: http://{}/api/v1/projects", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// JSON logs in production, human-readable otherwise
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let production = std::env::var("ENVIRONMENT").is_ok_and(|e| e == "production");

    if production {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
  leadgen
  ━━━━━━━━━━━━━━━━━━━━━━━
  Reddit outreach API
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
