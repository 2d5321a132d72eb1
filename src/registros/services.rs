use time::Date;
use tracing::info;

use crate::error::ApiError;
use crate::logros::repo::Logro;
use crate::registros::dto::{
    CreatedRegistroResponse, DeletedRegistroResponse, RegistroForm, RegistroListResponse,
    RegistroWithLogro, UpdatedRegistroResponse,
};
use crate::registros::repo::Registro;
use crate::state::AppState;
use crate::validation::{max_chars, not_blank, parse_date, Validator};

const NOT_FOUND: &str = "Registro no encontrado";

/// Validate a create/edit form in a single pass, reporting every failing
/// field at once. Returns the parsed week dates on success.
fn validate_form(form: &RegistroForm) -> Result<(Date, Date), ApiError> {
    let mut v = Validator::default();
    v.check_field(not_blank(&form.titulo), "titulo", "Este campo no puede estar en blanco");
    v.check_field(
        max_chars(&form.titulo, 100),
        "titulo",
        "Este campo no puede tener más de 100 caracteres",
    );
    v.check_field(not_blank(&form.descripcion), "descripcion", "Este campo no puede estar en blanco");
    let inicio = check_week_date(
        &mut v,
        "inicio_semana",
        &form.inicio_semana,
        "La fecha de inicio no puede estar en blanco",
    );
    let fin = check_week_date(
        &mut v,
        "fin_semana",
        &form.fin_semana,
        "La fecha de fin no puede estar en blanco",
    );
    if !v.is_valid() {
        return Err(v.into_error());
    }
    match (inicio, fin) {
        (Some(inicio), Some(fin)) => Ok((inicio, fin)),
        _ => Err(anyhow::anyhow!("week dates missing after validation").into()),
    }
}

fn check_week_date(
    v: &mut Validator,
    field: &str,
    value: &str,
    blank_message: &str,
) -> Option<Date> {
    if !not_blank(value) {
        v.add_field_error(field, blank_message);
        return None;
    }
    match parse_date(value) {
        Some(date) => Some(date),
        None => {
            v.add_field_error(field, "Formato de fecha inválido (usar YYYY-MM-DD)");
            None
        }
    }
}

pub async fn create_registro(
    state: &AppState,
    user_id: i64,
    form: RegistroForm,
) -> Result<CreatedRegistroResponse, ApiError> {
    let (inicio, fin) = validate_form(&form)?;

    // Two inserts, no transaction: a failed registro insert leaves the logro
    // row behind.
    let id_logro = Logro::insert(&state.db, &form.titulo, &form.descripcion).await?;
    let id_registro = Registro::insert(&state.db, user_id, id_logro, inicio, fin).await?;

    info!(user_id, id_registro, id_logro, "registro created");
    Ok(CreatedRegistroResponse {
        message: "Registro creado exitosamente".to_string(),
        id_registro,
        id_logro,
    })
}

pub async fn list_registros(
    state: &AppState,
    user_id: i64,
) -> Result<RegistroListResponse, ApiError> {
    let rows = Registro::latest_for_user(&state.db, user_id).await?;
    let mut registros = Vec::with_capacity(rows.len());
    for registro in rows {
        let logro = Logro::get(&state.db, registro.logro_id).await?.ok_or_else(|| {
            anyhow::anyhow!("logro {} missing for registro {}", registro.logro_id, registro.id)
        })?;
        registros.push(RegistroWithLogro { registro, logro });
    }
    Ok(RegistroListResponse { registros })
}

pub async fn edit_registro(
    state: &AppState,
    user_id: i64,
    id: i64,
    form: RegistroForm,
) -> Result<UpdatedRegistroResponse, ApiError> {
    // Existence resolves before ownership: a nonexistent id is 404 for every
    // caller.
    let existing = Registro::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    if existing.user_id != user_id {
        return Err(ApiError::Forbidden(
            "No tienes permiso para editar este registro".to_string(),
        ));
    }

    let (inicio, fin) = validate_form(&form)?;

    // logro_id carries over unchanged: an edit rewrites the pointed-to logro
    // in place, never repoints it.
    if !Logro::update(&state.db, existing.logro_id, &form.titulo, &form.descripcion).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    if !Registro::update(&state.db, id, user_id, existing.logro_id, inicio, fin).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(user_id, id, "registro updated");
    Ok(UpdatedRegistroResponse {
        message: "Registro actualizado exitosamente".to_string(),
        id,
    })
}

pub async fn delete_registro(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<DeletedRegistroResponse, ApiError> {
    let existing = Registro::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    if existing.user_id != user_id {
        return Err(ApiError::Forbidden(
            "No tienes permiso para eliminar este registro".to_string(),
        ));
    }

    // The registro goes first so a failure between the two deletes never
    // leaves a registro pointing at a missing logro.
    if !Registro::delete(&state.db, id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    if !Logro::delete(&state.db, existing.logro_id).await? {
        return Err(
            anyhow::anyhow!("logro {} already gone for registro {}", existing.logro_id, id).into(),
        );
    }

    info!(user_id, id, "registro deleted");
    Ok(DeletedRegistroResponse {
        message: "Registro eliminado exitosamente".to_string(),
    })
}
