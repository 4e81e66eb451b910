//! # leadgen-reddit
//!
//! Reddit client for leadgen.
//!
//! **RedditClient** implements `RedditGateway`:
//! - Authorization URL for the OAuth code flow (`duration=permanent`)
//! - Code exchange and refresh-token grants
//! - Identity lookup (`/api/v1/me`)
//! - Private message compose (`/api/compose`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leadgen_reddit::RedditClient;
//! use leadgen_core::{ComposeMessage, RedditGateway};
//!
//! let reddit = RedditClient::from_env()?;
//! let grant = reddit.refresh_access_token(&auth.refresh_token).await?;
//! reddit.send_message(&grant.access_token, &ComposeMessage::new("u/spez", "Hi", "Hello")?).await?;
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::RedditClient;
pub use config::RedditConfig;
