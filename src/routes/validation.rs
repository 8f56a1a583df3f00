use thiserror::Error;

use crate::constants::ERR_INVALID_PERMIT;
use crate::error::AppError;

/// Why a form field was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("falta el campo {0}")]
    Missing(&'static str),

    #[error("el campo {0} debe ser numérico")]
    NotNumeric(&'static str),

    #[error("el campo {0} no puede ser numérico")]
    Numeric(&'static str),
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation(format!("{}: {}", ERR_INVALID_PERMIT, err))
    }
}

/// Non-empty and made only of ASCII digits
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Present after trimming
pub fn text_field(name: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FieldError::Missing(name)),
    }
}

/// Present and all digits, kept as text (e.g. a numeric password)
pub fn digits_field(name: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    let value = text_field(name, value)?;
    if !is_numeric(&value) {
        return Err(FieldError::NotNumeric(name));
    }
    Ok(value)
}

/// Present, all digits and small enough for an INTEGER column
pub fn number_field(name: &'static str, value: Option<&str>) -> Result<i64, FieldError> {
    digits_field(name, value)?
        .parse()
        .map_err(|_| FieldError::NotNumeric(name))
}

/// Present and not all digits (names, labels, categories)
pub fn label_field(name: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    let value = text_field(name, value)?;
    if is_numeric(&value) {
        return Err(FieldError::Numeric(name));
    }
    Ok(value)
}

/// Pagination parameter: non-digit or absent values count as 0
pub fn count_param(value: Option<&str>) -> u64 {
    value
        .map(str::trim)
        .filter(|v| is_numeric(v))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
