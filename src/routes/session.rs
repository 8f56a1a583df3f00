use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use super::validation::text_field;
use crate::error::{AppError, Result};
use crate::pages;
use crate::security::{end_session, session_token, start_session};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub name_login: Option<String>,
    pub password_login: Option<String>,
}

/// POST /ingresar
///
/// Checks the submitted name and password against the stored hashes.
/// On success a session is started and the company form is shown.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(PrivateCookieJar, Html<String>)> {
    let (Ok(name), Ok(password)) = (
        text_field("name_login", form.name_login.as_deref()),
        text_field("password_login", form.password_login.as_deref()),
    ) else {
        return Err(AppError::Unauthorized);
    };

    match state.store.authenticate(&name, &password).await? {
        Some(user) => {
            tracing::info!("User {} logged in", user.id);
            Ok((
                start_session(jar, &user.session_token),
                Html(pages::company_form(Some(&user.name))),
            ))
        }
        None => {
            tracing::warn!("Failed login for {}", name);
            Err(AppError::Unauthorized)
        }
    }
}

/// GET /empresa.html
///
/// Company form, only for a session naming an existing user.
pub async fn company_form(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Html<String>> {
    let Some(token) = session_token(&jar) else {
        return Err(AppError::Unauthorized);
    };

    match state.store.find_user_by_session(&token).await? {
        Some(user) => Ok(Html(pages::company_form(Some(&user.name)))),
        None => {
            tracing::warn!("Session cookie names no current user");
            Err(AppError::Unauthorized)
        }
    }
}

/// GET /logout
pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (end_session(jar), Redirect::to("/registrar"))
}
