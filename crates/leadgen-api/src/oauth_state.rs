//! # OAuth State
//!
//! The Reddit `state` parameter carries the project and user that started
//! the connection, signed so the callback can trust it without a session:
//!
//! ```text
//! {project_id}.{uid}.{issued_at}.{hex hmac-sha256}
//! ```

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use leadgen_core::{LeadError, LeadResult};
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// How long a signed state stays valid
pub const STATE_MAX_AGE_SECS: i64 = 600;

/// Tolerated clock drift for `issued_at` in the future
const CLOCK_SKEW_SECS: i64 = 60;

/// Verified contents of a state parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthState {
    pub project_id: Uuid,
    pub uid: String,
}

/// Signs and verifies OAuth `state` values
#[derive(Clone)]
pub struct OAuthStateSigner {
    key: Arc<[u8]>,
}

impl OAuthStateSigner {
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.into() }
    }

    pub fn sign(&self, project_id: Uuid, uid: &str, now: DateTime<Utc>) -> LeadResult<String> {
        let payload = format!("{}.{}.{}", project_id, uid, now.timestamp());
        let signature = self.compute(&payload)?;
        Ok(format!("{}.{}", payload, signature))
    }

    /// Check signature and age, returning the project and user it was issued for
    pub fn verify(&self, state: &str, now: DateTime<Utc>) -> LeadResult<OAuthState> {
        let invalid = || LeadError::Unauthorized("invalid OAuth state".to_string());

        let (payload, signature) = state.rsplit_once('.').ok_or_else(invalid)?;
        let expected = self.compute(payload)?;
        if !constant_time_compare(&expected, signature) {
            return Err(invalid());
        }

        // uid sits between the uuid and the timestamp and may itself contain dots
        let (project_id, rest) = payload.split_once('.').ok_or_else(invalid)?;
        let (uid, issued_at) = rest.rsplit_once('.').ok_or_else(invalid)?;

        let project_id = Uuid::parse_str(project_id).map_err(|_| invalid())?;
        let issued_at: i64 = issued_at.parse().map_err(|_| invalid())?;
        if uid.is_empty() {
            return Err(invalid());
        }

        let age = now.timestamp() - issued_at;
        if age > STATE_MAX_AGE_SECS || age < -CLOCK_SKEW_SECS {
            return Err(LeadError::Unauthorized("OAuth state expired".to_string()));
        }

        Ok(OAuthState {
            project_id,
            uid: uid.to_string(),
        })
    }

    fn compute(&self, payload: &str) -> LeadResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| LeadError::Internal(format!("HMAC key rejected: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
