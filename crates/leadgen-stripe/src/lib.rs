//! # leadgen-stripe
//!
//! Stripe billing for leadgen.
//!
//! **StripeBilling** implements `BillingProvider`:
//! - Subscription Checkout Sessions for the configured price
//! - Subscription lookup by customer email
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leadgen_stripe::StripeBilling;
//! use leadgen_core::{BillingProvider, CheckoutRequest};
//!
//! let billing = StripeBilling::from_env()?;
//!
//! let session = billing.create_checkout(&CheckoutRequest {
//!     customer_email: Some("founder@acme.dev".into()),
//!     client_reference_id: uid,
//!     success_url: "https://app.example.com/billing/success".into(),
//!     cancel_url: "https://app.example.com/billing".into(),
//! }).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeBilling;
pub use config::StripeConfig;
