use axum::extract::{FromRef, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, instrument, warn};

use crate::auth::dto::{AuthResponse, LoginForm, RegisterForm};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::validation::{is_valid_email, max_chars, min_chars, not_blank, Validator};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut form): ApiJson<RegisterForm>,
) -> Result<Json<AuthResponse>, ApiError> {
    form.email = form.email.trim().to_lowercase();

    let mut v = Validator::default();
    v.check_field(not_blank(&form.nombre), "nombre", "Este campo no puede estar en blanco");
    v.check_field(
        max_chars(&form.nombre, 100),
        "nombre",
        "Este campo no puede tener más de 100 caracteres",
    );
    v.check_field(not_blank(&form.apellido), "apellido", "Este campo no puede estar en blanco");
    v.check_field(not_blank(&form.email), "email", "Este campo no puede estar en blanco");
    v.check_field(is_valid_email(&form.email), "email", "Email inválido");
    v.check_field(not_blank(&form.password), "password", "Este campo no puede estar en blanco");
    v.check_field(
        min_chars(&form.password, 6),
        "password",
        "La contraseña debe tener al menos 6 caracteres",
    );
    if !v.is_valid() {
        warn!("register validation failed");
        return Err(v.into_error());
    }

    if User::find_by_email(&state.db, &form.email).await?.is_some() {
        warn!(email = %form.email, "email already registered");
        return Err(ApiError::Conflict("El email ya está registrado".to_string()));
    }

    let hash = hash_password(&form.password)?;
    let user_id =
        User::insert_with_password(&state.db, &form.nombre, &form.apellido, &form.email, &hash)
            .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user_id, &form.email)?;

    info!(user_id, email = %form.email, "user registered");
    Ok(Json(AuthResponse {
        message: "Usuario registrado exitosamente".to_string(),
        user_id,
        token,
    }))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut form): ApiJson<LoginForm>,
) -> Result<Json<AuthResponse>, ApiError> {
    form.email = form.email.trim().to_lowercase();

    let mut v = Validator::default();
    v.check_field(not_blank(&form.email), "email", "Este campo no puede estar en blanco");
    v.check_field(not_blank(&form.password), "password", "Este campo no puede estar en blanco");
    if !v.is_valid() {
        return Err(v.into_error());
    }

    // Unknown email and wrong password answer identically.
    let user = match User::find_by_email(&state.db, &form.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %form.email, "login unknown email");
            return Err(ApiError::Unauthorized("Credenciales inválidas".to_string()));
        }
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Credenciales inválidas".to_string()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login exitoso".to_string(),
        user_id: user.id,
        token,
    }))
}
