use serde::{Deserialize, Serialize};

/// Request body for user registration. Fields default to empty strings so a
/// missing key reports as a blank-field validation error instead of a decode
/// failure.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user_id: i64,
    pub token: String,
}
