use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;

use super::validation::{count_param, label_field, number_field, FieldError};
use crate::constants::{ERR_DUPLICATE_CODE, ERR_ENTRY_NOT_FOUND, PERMIT_TIMESTAMP_FORMAT};
use crate::db::InsertOutcome;
use crate::error::{AppError, Result};
use crate::models::{Permit, ReportFormat};
use crate::pages;
use crate::AppState;

/// Company permit form; every field optional so missing ones reach validation
#[derive(Debug, Default, Deserialize)]
pub struct PermitForm {
    pub codigo: Option<String>,
    pub empresa: Option<String>,
    pub actividad: Option<String>,
    pub nombre: Option<String>,
    pub edad: Option<String>,
    pub dni: Option<String>,
    pub riesgo: Option<String>,
}

impl PermitForm {
    /// Validate every field; labels are stored upper-cased
    pub fn into_permit(self, issued_at: String) -> std::result::Result<Permit, FieldError> {
        Ok(Permit {
            code: number_field("codigo", self.codigo.as_deref())?,
            company: label_field("empresa", self.empresa.as_deref())?.to_uppercase(),
            activity: label_field("actividad", self.actividad.as_deref())?.to_uppercase(),
            person_name: label_field("nombre", self.nombre.as_deref())?.to_uppercase(),
            age: number_field("edad", self.edad.as_deref())?,
            national_id: number_field("dni", self.dni.as_deref())?,
            issued_at,
            risk: label_field("riesgo", self.riesgo.as_deref())?.to_uppercase(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    pub codigo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub format: Option<String>,
}

/// POST /procesar
///
/// Validates the submitted permit, stores it and echoes it back.
/// A code that is already registered renders the duplicate page (409).
pub async fn submit_permit(
    State(state): State<AppState>,
    Form(form): Form<PermitForm>,
) -> Result<Html<String>> {
    let issued_at = Local::now().format(PERMIT_TIMESTAMP_FORMAT).to_string();

    let permit = form.into_permit(issued_at).map_err(|e| {
        tracing::warn!("Rejected permit submission: {}", e);
        AppError::from(e)
    })?;

    match state.store.insert_validation(&permit).await? {
        InsertOutcome::Inserted => {
            tracing::info!("Permit {} registered for {}", permit.code, permit.company);
            Ok(Html(pages::permit_submitted(&permit)))
        }
        InsertOutcome::AlreadyExists => Err(AppError::Duplicate(ERR_DUPLICATE_CODE.to_string())),
    }
}

/// POST /consulta
///
/// Looks a permit up by code. A hit is mirrored into the check-in table
/// (an existing check-in is left as is); a miss renders the "no records" page.
pub async fn lookup_permit(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> Result<Response> {
    let code = match number_field("codigo", form.codigo.as_deref()) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("Lookup with unusable code: {}", e);
            return Ok(Html(pages::no_records()).into_response());
        }
    };

    let permits = state.store.query_validation(code).await?;

    let Some(permit) = permits.first() else {
        tracing::info!("No permit found for code {}", code);
        return Ok(Html(pages::no_records()).into_response());
    };

    state.store.insert_entry(permit).await?;

    Ok(Html(pages::permit_lookup(&permits)).into_response())
}

/// GET /validaciones_empresa?limit=&offset=&format=
///
/// Registered permits in insertion order, as objects keyed by column name
/// or, with `format=rows`, as arrays.
pub async fn list_permits(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Value>> {
    let limit = count_param(params.limit.as_deref());
    let offset = count_param(params.offset.as_deref());
    let format = ReportFormat::from_param(params.format.as_deref());

    let permits = state.store.list_validations(limit, offset).await?;

    Ok(Json(format.render(&permits)))
}

/// GET /ingresos/:codigo
pub async fn get_entry(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<Json<Permit>> {
    let code = number_field("codigo", Some(&codigo))
        .map_err(|_| AppError::NotFound(ERR_ENTRY_NOT_FOUND.to_string()))?;

    state
        .store
        .query_entry(code)
        .await?
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(ERR_ENTRY_NOT_FOUND.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PermitForm {
        PermitForm {
            codigo: Some("1001".to_string()),
            empresa: Some("Acme".to_string()),
            actividad: Some("mineria".to_string()),
            nombre: Some("Ana Perez".to_string()),
            edad: Some("34".to_string()),
            dni: Some("30123456".to_string()),
            riesgo: Some("alto".to_string()),
        }
    }

    #[test]
    fn test_into_permit_uppercases_labels() {
        let permit = form().into_permit("now".to_string()).unwrap();

        assert_eq!(permit.code, 1001);
        assert_eq!(permit.company, "ACME");
        assert_eq!(permit.activity, "MINERIA");
        assert_eq!(permit.person_name, "ANA PEREZ");
        assert_eq!(permit.age, 34);
        assert_eq!(permit.national_id, 30123456);
        assert_eq!(permit.issued_at, "now");
        assert_eq!(permit.risk, "ALTO");
    }

    #[test]
    fn test_into_permit_rejects_numeric_label() {
        let mut form = form();
        form.empresa = Some("12345".to_string());

        assert_eq!(
            form.into_permit("now".to_string()),
            Err(FieldError::Numeric("empresa"))
        );
    }

    #[test]
    fn test_into_permit_rejects_non_numeric_number() {
        let mut form = form();
        form.edad = Some("treinta".to_string());

        assert_eq!(
            form.into_permit("now".to_string()),
            Err(FieldError::NotNumeric("edad"))
        );
    }

    #[test]
    fn test_into_permit_requires_every_field() {
        let form = PermitForm {
            riesgo: None,
            ..form()
        };

        assert_eq!(
            form.into_permit("now".to_string()),
            Err(FieldError::Missing("riesgo"))
        );
    }
}
