//! # leadgen-core
//!
//! Core types and traits for the leadgen Reddit outreach service.
//!
//! This crate provides:
//! - `Project`, `SchedulerConfig`, `RedditAuth` and `Interaction` domain types
//! - `LeadStore` trait for persistence
//! - `BillingProvider`, `LeadWorkflow` and `RedditGateway` traits for the
//!   external collaborators
//! - Message template rendering
//! - `LeadError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use leadgen_core::{NewProject, LeadStore};
//!
//! let project = store.create_project(&identity.uid, NewProject {
//!     product_name: "Acme".into(),
//!     product_url: "https://acme.dev".into(),
//!     ..Default::default()
//! }).await?;
//!
//! let leads = workflow.discover(&(&project).into()).await?;
//! ```

pub mod billing;
pub mod error;
pub mod interaction;
pub mod project;
pub mod reddit;
pub mod scheduler;
pub mod store;
pub mod template;
pub mod user;
pub mod workflow;

// Re-exports for convenience
pub use billing::{
    BillingProvider, BoxedBillingProvider, CheckoutRequest, CheckoutSession, SubscriptionStatus,
};
pub use error::{LeadError, LeadResult};
pub use interaction::{history_limit, Interaction, InteractionStatus, NewInteraction};
pub use project::{NewProject, Project, ProjectUpdate};
pub use reddit::{
    normalize_recipient, BoxedRedditGateway, ComposeMessage, RedditAuth, RedditGateway,
    TokenGrant,
};
pub use scheduler::{SchedulerConfig, SchedulerUpdate, SendFrequency};
pub use store::{BoxedLeadStore, LeadStore};
pub use template::{render_template, TemplateVars};
pub use user::Identity;
pub use workflow::{
    BoxedLeadWorkflow, DiscoveryRequest, DiscoveryResult, LeadDraft, LeadWorkflow,
    SubredditSuggestion,
};
