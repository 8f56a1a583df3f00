use axum::{extract::State, response::Html};

use crate::error::Result;
use crate::pages;
use crate::AppState;

/// GET /reset
///
/// Drops `validacion`, `ingresado` and `usuario` and recreates them empty.
/// Destructive; meant for administrative resets only.
pub async fn reset_database(State(state): State<AppState>) -> Result<Html<&'static str>> {
    state.store.reset_schema().await?;

    Ok(Html(pages::reset_done()))
}
