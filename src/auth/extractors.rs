use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Verified identity attached to a request once its token validates. Handlers
/// receive it as an argument; identity is never re-derived from headers
/// downstream.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authorization header required".to_string()))?;

        // Tolerant prefix handling: a header without "Bearer " goes to
        // validation as-is and fails there unless it is itself a valid token.
        let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser {
                user_id: claims.user_id,
                email: claims.email,
            }),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::Unauthorized("Invalid token".to_string()))
            }
        }
    }
}
