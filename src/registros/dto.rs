use serde::{Deserialize, Serialize};

use crate::logros::repo::Logro;
use crate::registros::repo::Registro;

/// Request body shared by create and edit. Dates stay as raw strings here;
/// the service validates and parses them. Fields default to empty strings so
/// a missing key reports as a blank-field validation error.
#[derive(Debug, Deserialize)]
pub struct RegistroForm {
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub inicio_semana: String,
    #[serde(default)]
    pub fin_semana: String,
}

/// One list entry: the registro together with the logro it owns.
#[derive(Debug, Serialize)]
pub struct RegistroWithLogro {
    pub registro: Registro,
    pub logro: Logro,
}

#[derive(Debug, Serialize)]
pub struct RegistroListResponse {
    pub registros: Vec<RegistroWithLogro>,
}

#[derive(Debug, Serialize)]
pub struct CreatedRegistroResponse {
    pub message: String,
    pub id_registro: i64,
    pub id_logro: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdatedRegistroResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeletedRegistroResponse {
    pub message: String,
}
