use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON extractor with the strict input contract of this API: the request
/// must declare `Content-Type: application/json` (compared exactly), and both
/// a wrong content type and a malformed body reject with a 400 JSON error
/// before any handler logic runs.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if content_type != "application/json" {
            return Err(ApiError::BadRequest(
                "Content-Type debe ser application/json".to_string(),
            ));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}
