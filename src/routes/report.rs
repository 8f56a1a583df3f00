use axum::{extract::State, http::header, response::IntoResponse};

use crate::chart::render_risk_chart;
use crate::error::Result;
use crate::AppState;

/// GET /grafico_riesgo
///
/// Bar chart of permits per risk category, rendered from the current table state.
pub async fn risk_chart(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let png = render_risk_chart(&state.store).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
