//! # leadgen-api
//!
//! HTTP API for the leadgen Reddit outreach service.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | /health | Liveness plus store health |
//! | POST | /api/v1/checkout | Start a subscription checkout |
//! | GET | /api/v1/subscription | Caller's subscription status |
//! | GET/POST | /api/v1/projects | List / create projects |
//! | GET/PUT/DELETE | /api/v1/projects/{id} | Read / update / delete |
//! | POST | /api/v1/projects/{id}/discover | Run lead discovery |
//! | GET/PUT/DELETE | /api/v1/projects/{id}/scheduler | Scheduler settings |
//! | GET/DELETE | /api/v1/projects/{id}/reddit | Reddit connection status / disconnect |
//! | POST | /api/v1/projects/{id}/reddit/connect | Reddit authorize URL |
//! | GET | /api/v1/reddit/callback | Reddit OAuth redirect target |
//! | POST | /api/v1/projects/{id}/messages | Send a private message |
//! | GET | /api/v1/projects/{id}/interactions | Send history |
//!
//! Everything under `/api/v1` except the OAuth callback requires a Firebase
//! ID token in `Authorization: Bearer`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod oauth_state;
pub mod routes;
pub mod state;

pub use auth::{AuthUser, BoxedTokenVerifier, FirebaseConfig, FirebaseVerifier, TokenVerifier};
pub use error::{ApiError, ApiResult, ErrorResponse, JsonBody, PathParam, QueryParams};
pub use oauth_state::{OAuthState, OAuthStateSigner};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
