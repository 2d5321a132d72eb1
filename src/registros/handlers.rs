use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::registros::dto::{
    CreatedRegistroResponse, DeletedRegistroResponse, RegistroForm, RegistroListResponse,
    UpdatedRegistroResponse,
};
use crate::registros::services;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/registros", get(list_registros))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/registros", post(create_registro))
        .route("/registros/:id", patch(edit_registro).delete(delete_registro))
}

/// Path ids arrive as raw strings so an unparseable value maps to the JSON
/// 400 body instead of axum's plain-text rejection.
fn parse_registro_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::BadRequest("ID inválido".to_string())),
    }
}

#[instrument(skip(state, form))]
pub async fn create_registro(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(form): ApiJson<RegistroForm>,
) -> Result<Json<CreatedRegistroResponse>, ApiError> {
    services::create_registro(&state, auth.user_id, form)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn list_registros(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RegistroListResponse>, ApiError> {
    services::list_registros(&state, auth.user_id).await.map(Json)
}

#[instrument(skip(state, form))]
pub async fn edit_registro(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(form): ApiJson<RegistroForm>,
) -> Result<Json<UpdatedRegistroResponse>, ApiError> {
    let id = parse_registro_id(&id)?;
    services::edit_registro(&state, auth.user_id, id, form)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn delete_registro(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedRegistroResponse>, ApiError> {
    let id = parse_registro_id(&id)?;
    services::delete_registro(&state, auth.user_id, id)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_registro_id("1").expect("id"), 1);
        assert_eq!(parse_registro_id("987654").expect("id"), 987654);
    }

    #[test]
    fn non_numeric_zero_and_negative_ids_are_rejected() {
        for raw in ["abc", "", "0", "-3", "1.5", "9999999999999999999999"] {
            match parse_registro_id(raw) {
                Err(ApiError::BadRequest(message)) => assert_eq!(message, "ID inválido"),
                other => panic!("expected bad request for {raw:?}, got {other:?}"),
            }
        }
    }
}
