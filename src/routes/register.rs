use axum::{extract::State, response::Html, Form};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use super::validation::{digits_field, label_field, text_field, FieldError};
use crate::constants::{ERR_DUPLICATE_USER, ERR_INVALID_USER};
use crate::error::{AppError, Result};
use crate::pages;
use crate::security::start_session;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Validated registration fields
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub password: String,
    pub email: String,
}

impl RegisterForm {
    /// Names must not be numeric; passwords are numeric PINs
    pub fn validate(self) -> std::result::Result<Registration, FieldError> {
        Ok(Registration {
            name: label_field("name", self.name.as_deref())?,
            password: digits_field("password", self.password.as_deref())?,
            email: text_field("email", self.email.as_deref())?,
        })
    }
}

/// GET /registrar
pub async fn users_page() -> Html<&'static str> {
    Html(pages::users())
}

/// POST /registrar
///
/// Creates the user and starts a session for it, then shows the login form
/// again. An email that is already registered renders the duplicate page (409).
pub async fn register_user(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(PrivateCookieJar, Html<&'static str>)> {
    let registration = form.validate().map_err(|e| {
        tracing::warn!("Rejected registration: {}", e);
        AppError::Validation(format!("{}: {}", ERR_INVALID_USER, e))
    })?;

    let Some(user) = state
        .store
        .create_user(
            &registration.email,
            &registration.password,
            &registration.name,
        )
        .await?
    else {
        return Err(AppError::Duplicate(ERR_DUPLICATE_USER.to_string()));
    };

    Ok((start_session(jar, &user.session_token), Html(pages::users())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_registration() {
        let form = RegisterForm {
            name: Some(" Ana ".to_string()),
            password: Some("1234".to_string()),
            email: Some("ana@example.com".to_string()),
        };

        assert_eq!(
            form.validate(),
            Ok(Registration {
                name: "Ana".to_string(),
                password: "1234".to_string(),
                email: "ana@example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_numeric_name_rejected() {
        let form = RegisterForm {
            name: Some("1234".to_string()),
            password: Some("1234".to_string()),
            email: Some("ana@example.com".to_string()),
        };

        assert_eq!(form.validate(), Err(FieldError::Numeric("name")));
    }

    #[test]
    fn test_non_numeric_password_rejected() {
        let form = RegisterForm {
            name: Some("Ana".to_string()),
            password: Some("clave".to_string()),
            email: Some("ana@example.com".to_string()),
        };

        assert_eq!(form.validate(), Err(FieldError::NotNumeric("password")));
    }
}
