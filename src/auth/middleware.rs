//! Owner extraction.
//!
//! Identity is established upstream; this service trusts the owner id
//! forwarded in the `X-Owner-Id` header and scopes every query by it.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ServiceError;
use crate::state::AppState;

pub const OWNER_HEADER: &str = "x-owner-id";

/// Longest owner id accepted from the header
const OWNER_ID_MAX_LEN: usize = 128;

/// Owner of the current request.
/// Add this as a handler parameter to require an owner; rejects with 401.
#[derive(Clone, Debug)]
pub struct OwnerContext {
    pub owner_id: String,
}

impl FromRequestParts<AppState> for OwnerContext {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let owner_id = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= OWNER_ID_MAX_LEN)
            .ok_or_else(|| {
                tracing::debug!("Rejecting request without a usable {} header", OWNER_HEADER);
                ServiceError::Unauthorized
            })?;

        Ok(OwnerContext {
            owner_id: owner_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<OwnerContext, ServiceError> {
        let mut builder = Request::builder().uri("/api/problems");
        if let Some(value) = header {
            builder = builder.header(OWNER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let state = AppState::new(crate::db::init_memory_db().unwrap());
        OwnerContext::from_request_parts(&mut parts, &state).await
    }

    #[tokio::test]
    async fn test_owner_is_trimmed() {
        let owner = extract(Some("  alice ")).await.unwrap();
        assert_eq!(owner.owner_id, "alice");
    }

    #[tokio::test]
    async fn test_missing_or_blank_owner_is_unauthorized() {
        assert!(matches!(extract(None).await, Err(ServiceError::Unauthorized)));
        assert!(matches!(extract(Some("   ")).await, Err(ServiceError::Unauthorized)));
        let long = "x".repeat(OWNER_ID_MAX_LEN + 1);
        assert!(matches!(extract(Some(&long)).await, Err(ServiceError::Unauthorized)));
    }
}
