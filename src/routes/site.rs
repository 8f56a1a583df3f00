use axum::response::Html;

use crate::pages;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(pages::index())
}

/// GET /menu.html
pub async fn menu() -> Html<&'static str> {
    Html(pages::menu())
}

/// GET /validar_datos.html
pub async fn lookup_form() -> Html<&'static str> {
    Html(pages::lookup_form())
}

/// GET /salida.html
pub async fn exit_page() -> Html<&'static str> {
    Html(pages::exit())
}
