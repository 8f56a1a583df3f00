pub mod admin;
pub mod health;
pub mod permits;
pub mod register;
pub mod report;
pub mod session;
pub mod site;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use admin::reset_database;
pub use health::health_check;
pub use permits::{get_entry, list_permits, lookup_permit, submit_permit};
pub use register::{register_user, users_page};
pub use report::risk_chart;
pub use session::{company_form, login, logout};
pub use site::{exit_page, index, lookup_form, menu};

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/reset", get(reset_database))
        .route("/menu.html", get(menu))
        .route("/empresa.html", get(company_form))
        .route("/validar_datos.html", get(lookup_form))
        .route("/salida.html", get(exit_page))
        .route("/procesar", post(submit_permit))
        .route("/consulta", post(lookup_permit))
        .route("/validaciones_empresa", get(list_permits))
        .route("/ingresos/:codigo", get(get_entry))
        .route("/grafico_riesgo", get(risk_chart))
        .route("/registrar", get(users_page).post(register_user))
        .route("/ingresar", post(login))
        .route("/logout", get(logout))
        .with_state(state)
}
